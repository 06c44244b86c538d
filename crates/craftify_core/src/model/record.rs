//! Versioned record contract and weak validator tokens.
//!
//! # Invariants
//! - `Version` never decreases and never skips values.
//! - The entity tag of a record is derived only from its version and has the
//!   form `W/"<version>"`.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::hash::Hash;
use std::time::{SystemTime, UNIX_EPOCH};

/// Optimistic concurrency counter of one record.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Version(u64);

impl Version {
    /// Version assigned at creation time.
    pub const INITIAL: Self = Self(0);

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn get(self) -> u64 {
        self.0
    }

    /// Returns the version that follows this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// Weak validator token for this version.
    pub fn entity_tag(self) -> EntityTag {
        EntityTag::weak(self)
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Weak entity tag (`W/"<version>"`) exposed to callers for conditional writes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityTag(String);

impl EntityTag {
    pub fn weak(version: Version) -> Self {
        Self(format!("W/\"{}\"", version.get()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Whether a caller-supplied token designates this exact tag.
    ///
    /// Surrounding whitespace is ignored; comparison is otherwise exact.
    pub fn matches(&self, supplied: &str) -> bool {
        supplied.trim() == self.0
    }
}

impl Display for EntityTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Shape shared by every record kept in a `Collection`.
///
/// `id` is the opaque storage key; `natural_key` is the human-facing value
/// that must stay unique (case-insensitively) within one collection. The two
/// may coincide, as they do for items.
pub trait Record: Clone {
    type Id: Clone + Eq + Hash + Display;

    fn id(&self) -> &Self::Id;
    fn natural_key(&self) -> &str;
    fn version(&self) -> Version;

    fn entity_tag(&self) -> EntityTag {
        self.version().entity_tag()
    }
}

/// Current wall clock time in epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::{EntityTag, Version};

    #[test]
    fn entity_tag_uses_weak_validator_format() {
        assert_eq!(Version::new(7).entity_tag().as_str(), "W/\"7\"");
        assert_eq!(Version::INITIAL.entity_tag().to_string(), "W/\"0\"");
    }

    #[test]
    fn entity_tag_match_ignores_surrounding_whitespace_only() {
        let tag = EntityTag::weak(Version::new(3));
        assert!(tag.matches(" W/\"3\" "));
        assert!(!tag.matches("W\"3\""));
        assert!(!tag.matches("\"3\""));
        assert!(!tag.matches("W/\"4\""));
    }

    #[test]
    fn next_advances_by_exactly_one() {
        let version = Version::new(41);
        assert_eq!(version.next().get(), 42);
        assert!(version.next() > version);
    }
}
