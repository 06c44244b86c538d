//! Domain model for catalog categories and inventory items.
//!
//! # Responsibility
//! - Define the canonical records stored by the in-memory repositories.
//! - Define write payloads and their validation/normalization rules.
//!
//! # Invariants
//! - Every record carries a `Version` that starts at 0 and grows by exactly 1
//!   on each successful mutation.
//! - Mutations never edit a stored record in place; they build a new value.
//! - Deletion is immediate; there are no tombstones.

pub mod category;
pub mod item;
pub mod record;
pub mod text;
pub mod validation;
