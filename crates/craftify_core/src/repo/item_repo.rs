//! Item repository contract and in-memory implementation.
//!
//! # Responsibility
//! - Provide CRUD over the item collection plus the bulk paths used by
//!   import and batch delete.
//! - Generate item codes when callers do not supply one.
//!
//! # Invariants
//! - Item codes are unique case-insensitively and never change.
//! - Update and delete are version-gated through `Precondition`.
//! - Generated codes are derived under the write lock and cannot collide.

use crate::config::DEFAULT_ITEM_CODE_PREFIX;
use crate::model::item::{Item, ItemId, ItemPayload};
use crate::model::record::now_epoch_ms;
use crate::model::validation::{ValidationError, ValidationReason};
use crate::repo::collection::{Collection, Records, Upserted};
use crate::repo::concurrency::Precondition;
use crate::repo::error::{StoreError, StoreResult};
use crate::repo::uniqueness::{check_available, keys_equal};
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

static GENERATED_CODE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z0-9]+)-([0-9]+)$").expect("valid generated item code regex")
});

/// Repository interface for item storage.
pub trait ItemRepository {
    /// Point-in-time copy of all items.
    fn snapshot(&self) -> Vec<Item>;
    fn get_item(&self, id: &str) -> Option<Item>;
    /// Creates an item; a blank `code` is replaced by a generated one.
    fn create_item(&self, payload: &ItemPayload) -> StoreResult<Item>;
    fn update_item(
        &self,
        id: &str,
        precondition: Precondition<'_>,
        payload: &ItemPayload,
    ) -> StoreResult<Item>;
    fn delete_item(&self, id: &str, precondition: Precondition<'_>) -> StoreResult<Item>;
    /// Creates the item or replaces the one owning `payload.code`, without a
    /// version check. On replace, an absent description or empty conversion
    /// list keeps the stored value.
    fn upsert_item(&self, payload: &ItemPayload) -> StoreResult<Upserted<Item>>;
    /// Removes every listed item that exists; returns the number removed.
    fn remove_items(&self, ids: &[ItemId]) -> usize;
}

/// Process-local item store.
pub struct InMemoryItemRepository {
    records: Collection<Item>,
    code_prefix: String,
}

impl Default for InMemoryItemRepository {
    fn default() -> Self {
        Self::with_code_prefix(DEFAULT_ITEM_CODE_PREFIX)
    }
}

impl InMemoryItemRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `prefix` for generated codes (`<prefix>-001`).
    pub fn with_code_prefix(prefix: impl Into<String>) -> Self {
        Self {
            records: Collection::new(),
            code_prefix: prefix.into(),
        }
    }

    pub fn code_prefix(&self) -> &str {
        self.code_prefix.as_str()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl ItemRepository for InMemoryItemRepository {
    fn snapshot(&self) -> Vec<Item> {
        self.records.snapshot()
    }

    fn get_item(&self, id: &str) -> Option<Item> {
        self.records.get(id)
    }

    fn create_item(&self, payload: &ItemPayload) -> StoreResult<Item> {
        let now = now_epoch_ms();
        self.records.insert_with(|records| {
            let fields = payload.validate_fields()?;
            let code = match payload.requested_code()? {
                Some(code) => code,
                None => next_item_code(&self.code_prefix, records)?,
            };
            Ok(Item::create(code, fields, now))
        })
    }

    fn update_item(
        &self,
        id: &str,
        precondition: Precondition<'_>,
        payload: &ItemPayload,
    ) -> StoreResult<Item> {
        let now = now_epoch_ms();
        self.records
            .replace_with(id, precondition, |current, records| {
                let fields = payload.validate_fields()?;
                ensure_code_unchanged(current, payload, records)?;
                Ok(current.with_fields(fields, now))
            })
    }

    fn delete_item(&self, id: &str, precondition: Precondition<'_>) -> StoreResult<Item> {
        self.records.remove_with(id, precondition, |_| Ok(()))
    }

    fn upsert_item(&self, payload: &ItemPayload) -> StoreResult<Upserted<Item>> {
        let now = now_epoch_ms();
        let requested = payload.requested_code()?;
        self.records.upsert_by_key(
            requested.as_deref(),
            |records| {
                let fields = payload.validate_fields()?;
                let code = match requested.clone() {
                    Some(code) => code,
                    None => next_item_code(&self.code_prefix, records)?,
                };
                Ok(Item::create(code, fields, now))
            },
            |current, _| {
                let mut fields = payload.validate_fields()?;
                if fields.description.is_none() {
                    fields.description = current.description.clone();
                }
                if fields.uoms.is_empty() {
                    fields.uoms = current.uoms.clone();
                }
                Ok(current.with_fields(fields, now))
            },
        )
    }

    fn remove_items(&self, ids: &[ItemId]) -> usize {
        self.records.remove_many(ids.iter().map(String::as_str))
    }
}

impl<T: ItemRepository + ?Sized> ItemRepository for Arc<T> {
    fn snapshot(&self) -> Vec<Item> {
        (**self).snapshot()
    }

    fn get_item(&self, id: &str) -> Option<Item> {
        (**self).get_item(id)
    }

    fn create_item(&self, payload: &ItemPayload) -> StoreResult<Item> {
        (**self).create_item(payload)
    }

    fn update_item(
        &self,
        id: &str,
        precondition: Precondition<'_>,
        payload: &ItemPayload,
    ) -> StoreResult<Item> {
        (**self).update_item(id, precondition, payload)
    }

    fn delete_item(&self, id: &str, precondition: Precondition<'_>) -> StoreResult<Item> {
        (**self).delete_item(id, precondition)
    }

    fn upsert_item(&self, payload: &ItemPayload) -> StoreResult<Upserted<Item>> {
        (**self).upsert_item(payload)
    }

    fn remove_items(&self, ids: &[ItemId]) -> usize {
        (**self).remove_items(ids)
    }
}

/// Formats a generated item code, e.g. `ITM-007`.
pub fn format_item_code(prefix: &str, sequence: usize) -> String {
    format!("{prefix}-{sequence:03}")
}

/// Sequence number of `code` when it has the generated shape for `prefix`.
pub fn generated_sequence(prefix: &str, code: &str) -> Option<usize> {
    let captures = GENERATED_CODE_RE.captures(code.trim())?;
    if !captures[1].eq_ignore_ascii_case(prefix) {
        return None;
    }
    captures[2].parse().ok()
}

/// Next free generated code.
///
/// Fails with `Conflict` when the highest stored sequence is already
/// `usize::MAX` and cannot be advanced.
fn next_item_code(prefix: &str, records: &Records<Item>) -> StoreResult<String> {
    let highest = records
        .values()
        .filter_map(|item| generated_sequence(prefix, &item.code))
        .max()
        .unwrap_or(0)
        .max(records.len());
    highest
        .checked_add(1)
        .map(|sequence| format_item_code(prefix, sequence))
        .ok_or_else(|| StoreError::Conflict(format_item_code(prefix, highest)))
}

fn ensure_code_unchanged(
    current: &Item,
    payload: &ItemPayload,
    records: &Records<Item>,
) -> StoreResult<()> {
    let Some(code) = payload.requested_code()? else {
        return Ok(());
    };
    if keys_equal(&code, &current.code) {
        return Ok(());
    }
    if !check_available(records.values(), &code, Some(&current.id)) {
        return Err(StoreError::Conflict(code));
    }
    Err(ValidationError::new("code", ValidationReason::Immutable).into())
}
