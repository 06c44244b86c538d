//! Optimistic concurrency gate.
//!
//! # Invariants
//! - A conditional mutation proceeds only when the supplied token equals the
//!   record's current entity tag.
//! - The gate never mutates anything; callers refuse the write on rejection.

use crate::model::record::{EntityTag, Version};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Why a conditional write was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateRejection {
    /// No token was supplied.
    Missing,
    /// Token does not match the current version.
    Stale { current: EntityTag, supplied: String },
}

impl Display for GateRejection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing => write!(f, "version token is required"),
            Self::Stale { current, supplied } => {
                write!(f, "version token `{supplied}` is stale; current is `{current}`")
            }
        }
    }
}

impl Error for GateRejection {}

/// Checks `supplied` against the token derived from `current`.
///
/// Blank tokens count as missing.
pub fn authorize(current: Version, supplied: Option<&str>) -> Result<(), GateRejection> {
    let supplied = match supplied.map(str::trim) {
        None | Some("") => return Err(GateRejection::Missing),
        Some(value) => value,
    };

    let expected = current.entity_tag();
    if expected.matches(supplied) {
        Ok(())
    } else {
        Err(GateRejection::Stale {
            current: expected,
            supplied: supplied.to_string(),
        })
    }
}

/// Precondition attached to a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition<'a> {
    /// Mutation requires the given token to match (`If-Match`).
    IfMatch(Option<&'a str>),
    /// Mutation is not version-checked (category delete, bulk import).
    Unconditional,
}

impl Precondition<'_> {
    pub fn check(self, current: Version) -> Result<(), GateRejection> {
        match self {
            Self::IfMatch(supplied) => authorize(current, supplied),
            Self::Unconditional => Ok(()),
        }
    }
}
