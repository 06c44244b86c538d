//! Category domain model.
//!
//! # Responsibility
//! - Define the catalog category record and its create/rename payload.
//!
//! # Invariants
//! - `id` is a generated UUID and never reused.
//! - `name` is the natural key: trimmed, non-blank, unique case-insensitively.
//! - `updated_at` never moves backwards across renames.

use crate::model::record::{Record, Version};
use crate::model::validation::{require_text, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum category name length in characters.
pub const CATEGORY_NAME_MAX_CHARS: usize = 100;

/// Stable identifier of a category.
pub type CategoryId = Uuid;

/// Catalog category. Items reference categories by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub version: Version,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds.
    pub updated_at: i64,
}

impl Category {
    /// Creates a category with a generated id at version 0.
    pub fn new(name: impl Into<String>, now_ms: i64) -> Self {
        Self::with_id(Uuid::new_v4(), name, now_ms)
    }

    pub fn with_id(id: CategoryId, name: impl Into<String>, now_ms: i64) -> Self {
        Self {
            id,
            name: name.into(),
            version: Version::INITIAL,
            created_at: now_ms,
            updated_at: now_ms,
        }
    }

    /// Returns the renamed successor of this record, one version later.
    pub fn renamed(&self, name: impl Into<String>, now_ms: i64) -> Self {
        Self {
            name: name.into(),
            version: self.version.next(),
            updated_at: now_ms.max(self.updated_at),
            ..self.clone()
        }
    }
}

impl Record for Category {
    type Id = CategoryId;

    fn id(&self) -> &CategoryId {
        &self.id
    }

    fn natural_key(&self) -> &str {
        self.name.as_str()
    }

    fn version(&self) -> Version {
        self.version
    }
}

/// Create/rename request body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPayload {
    pub name: Option<String>,
}

impl CategoryPayload {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }

    /// Returns the trimmed name or the field error that rejects it.
    pub fn normalized_name(&self) -> Result<String, ValidationError> {
        require_text("name", self.name.as_deref(), CATEGORY_NAME_MAX_CHARS)
    }
}
