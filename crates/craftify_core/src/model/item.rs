//! Item domain model.
//!
//! # Responsibility
//! - Define the inventory item record, its lifecycle status and unit of
//!   measure conversions.
//! - Validate and normalize create/update payloads into `ItemFields`.
//!
//! # Invariants
//! - `id` and `code` are the same value; the code is the natural key and does
//!   not change after creation.
//! - Every stored item passed `ItemPayload::validate_fields`.

use crate::model::record::{Record, Version};
use crate::model::validation::{optional_text, require_text, ValidationError, ValidationReason};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub const ITEM_CODE_MAX_CHARS: usize = 64;
pub const ITEM_NAME_MAX_CHARS: usize = 200;
pub const ITEM_CATEGORY_NAME_MAX_CHARS: usize = 100;
pub const UOM_MAX_CHARS: usize = 16;
pub const ITEM_DESCRIPTION_MAX_CHARS: usize = 4000;
pub const UOM_NOTES_MAX_CHARS: usize = 200;

/// Item identity. Equal to the item code.
pub type ItemId = String;

/// Lifecycle status of an item. Serialized in TitleCase (`"Active"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemStatus {
    Draft,
    Active,
    Hold,
    Discontinued,
}

impl ItemStatus {
    pub const ALL: [ItemStatus; 4] = [
        ItemStatus::Draft,
        ItemStatus::Active,
        ItemStatus::Hold,
        ItemStatus::Discontinued,
    ];

    /// Wire form, e.g. `Active`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Active => "Active",
            Self::Hold => "Hold",
            Self::Discontinued => "Discontinued",
        }
    }

    /// Upper-case constant form used in CSV exports, e.g. `ACTIVE`.
    pub fn constant_name(self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Active => "ACTIVE",
            Self::Hold => "HOLD",
            Self::Discontinued => "DISCONTINUED",
        }
    }

    /// Parses either form, ignoring case and surrounding whitespace.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(value))
    }
}

impl Display for ItemStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Alternate unit of measure with its conversion factor to the base unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemUom {
    pub uom: String,
    pub coef: f64,
    pub notes: Option<String>,
}

/// Inventory item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    pub code: String,
    pub name: String,
    pub status: ItemStatus,
    pub category_name: String,
    pub uom_base: String,
    pub description: Option<String>,
    #[serde(default)]
    pub uoms: Vec<ItemUom>,
    pub version: Version,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds.
    pub updated_at: i64,
}

impl Item {
    /// Creates an item at version 0 whose identity is `code`.
    pub fn create(code: impl Into<String>, fields: ItemFields, now_ms: i64) -> Self {
        let code = code.into();
        Self {
            id: code.clone(),
            code,
            name: fields.name,
            status: fields.status,
            category_name: fields.category_name,
            uom_base: fields.uom_base,
            description: fields.description,
            uoms: fields.uoms,
            version: Version::INITIAL,
            created_at: now_ms,
            updated_at: now_ms,
        }
    }

    /// Returns the successor record carrying `fields`, one version later.
    ///
    /// Identity, code and `created_at` are kept.
    pub fn with_fields(&self, fields: ItemFields, now_ms: i64) -> Self {
        Self {
            id: self.id.clone(),
            code: self.code.clone(),
            name: fields.name,
            status: fields.status,
            category_name: fields.category_name,
            uom_base: fields.uom_base,
            description: fields.description,
            uoms: fields.uoms,
            version: self.version.next(),
            created_at: self.created_at,
            updated_at: now_ms.max(self.updated_at),
        }
    }
}

impl Record for Item {
    type Id = ItemId;

    fn id(&self) -> &ItemId {
        &self.id
    }

    fn natural_key(&self) -> &str {
        self.code.as_str()
    }

    fn version(&self) -> Version {
        self.version
    }
}

/// Unit of measure entry as received from callers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemUomPayload {
    pub uom: Option<String>,
    pub coef: Option<f64>,
    pub notes: Option<String>,
}

impl ItemUomPayload {
    pub fn validate(&self) -> Result<ItemUom, ValidationError> {
        let uom = require_text("uoms.uom", self.uom.as_deref(), UOM_MAX_CHARS)?;
        let coef = self
            .coef
            .ok_or(ValidationError::new("uoms.coef", ValidationReason::Missing))?;
        if !coef.is_finite() || coef <= 0.0 {
            return Err(ValidationError::new(
                "uoms.coef",
                ValidationReason::OutOfRange,
            ));
        }
        let notes = optional_text("uoms.notes", self.notes.as_deref(), UOM_NOTES_MAX_CHARS)?;
        Ok(ItemUom { uom, coef, notes })
    }
}

/// Create/update request body.
///
/// `code` is optional on create (the store generates one) and, when present on
/// update, must name the item being updated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPayload {
    pub code: Option<String>,
    pub name: Option<String>,
    pub status: Option<ItemStatus>,
    pub category_name: Option<String>,
    pub uom_base: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub uoms: Vec<ItemUomPayload>,
}

/// Validated, trimmed item attributes ready to be applied to a record.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemFields {
    pub name: String,
    pub status: ItemStatus,
    pub category_name: String,
    pub uom_base: String,
    pub description: Option<String>,
    pub uoms: Vec<ItemUom>,
}

impl ItemPayload {
    /// Trimmed caller-supplied code, `None` when absent or blank.
    pub fn requested_code(&self) -> Result<Option<String>, ValidationError> {
        optional_text("code", self.code.as_deref(), ITEM_CODE_MAX_CHARS)
    }

    /// Validates every mutable attribute; the first failing field wins.
    pub fn validate_fields(&self) -> Result<ItemFields, ValidationError> {
        let name = require_text("name", self.name.as_deref(), ITEM_NAME_MAX_CHARS)?;
        let status = self
            .status
            .ok_or(ValidationError::new("status", ValidationReason::Missing))?;
        let category_name = require_text(
            "categoryName",
            self.category_name.as_deref(),
            ITEM_CATEGORY_NAME_MAX_CHARS,
        )?;
        let uom_base = require_text("uomBase", self.uom_base.as_deref(), UOM_MAX_CHARS)?;
        let description = optional_text(
            "description",
            self.description.as_deref(),
            ITEM_DESCRIPTION_MAX_CHARS,
        )?;
        let uoms = self
            .uoms
            .iter()
            .map(ItemUomPayload::validate)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ItemFields {
            name,
            status,
            category_name,
            uom_base,
            description,
            uoms,
        })
    }
}
