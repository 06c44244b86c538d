//! Repository layer: versioned in-memory collections and their guards.
//!
//! # Responsibility
//! - Own the per-kind record collections.
//! - Enforce natural-key uniqueness and optimistic concurrency atomically with
//!   each write.
//!
//! # Invariants
//! - Repository writes validate payloads before touching stored state.
//! - Repository APIs return semantic errors (`NotFound`, `Conflict`,
//!   `PreconditionFailed`) instead of panicking.

pub mod category_repo;
pub mod collection;
pub mod concurrency;
pub mod error;
pub mod item_repo;
pub mod uniqueness;
