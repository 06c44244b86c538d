//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep outer layers (HTTP, CLI) decoupled from storage details.

pub mod category_service;
pub mod csv;
pub mod item_service;
pub mod item_transfer;
