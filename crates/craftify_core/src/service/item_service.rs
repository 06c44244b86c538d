//! Item use-case service.
//!
//! # Responsibility
//! - Provide list/get/create/update/delete entry points for items.
//! - Translate caller version tokens into repository preconditions.
//!
//! # Invariants
//! - Update and delete require the current version token.
//! - Service APIs never bypass repository validation.

use crate::config::EngineConfig;
use crate::model::item::{Item, ItemPayload};
use crate::query::{run_query, ItemListQuery, Page};
use crate::repo::concurrency::Precondition;
use crate::repo::error::{StoreError, StoreResult};
use crate::repo::item_repo::ItemRepository;
use log::{info, warn};

/// Use-case service wrapper for item operations.
///
/// The code prefix for generated codes belongs to the repository; build it
/// with `InMemoryItemRepository::with_code_prefix(config.item_code_prefix())`
/// to keep both in step.
pub struct ItemService<R: ItemRepository> {
    repo: R,
    config: EngineConfig,
}

impl<R: ItemRepository> ItemService<R> {
    /// Creates a service with default configuration.
    pub fn new(repo: R) -> Self {
        Self::with_config(repo, EngineConfig::default())
    }

    pub fn with_config(repo: R, config: EngineConfig) -> Self {
        Self { repo, config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub(crate) fn repo(&self) -> &R {
        &self.repo
    }

    /// Lists items through the query pipeline.
    pub fn list_items(&self, query: &ItemListQuery) -> Page<Item> {
        run_query(self.repo.snapshot(), query, &self.config)
    }

    /// Gets one item by id (its code).
    ///
    /// # Errors
    /// - `NotFound` when no item has this id.
    pub fn get_item(&self, id: &str) -> StoreResult<Item> {
        self.repo
            .get_item(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Creates an item at version 0, generating a code when none is given.
    ///
    /// # Errors
    /// - `Validation` for missing, blank or overlong fields.
    /// - `Conflict` when the code is taken, ignoring case.
    pub fn create_item(&self, payload: &ItemPayload) -> StoreResult<Item> {
        let result = self.repo.create_item(payload);
        log_write("item_create", None, &result);
        result
    }

    /// Replaces the mutable fields of an item when `if_match` is current.
    ///
    /// # Errors
    /// - `NotFound`, then `PreconditionFailed`, then `Validation` or
    ///   `Conflict`, in that order of checking.
    pub fn update_item(
        &self,
        id: &str,
        if_match: Option<&str>,
        payload: &ItemPayload,
    ) -> StoreResult<Item> {
        let result = self
            .repo
            .update_item(id, Precondition::IfMatch(if_match), payload);
        log_write("item_update", Some(id), &result);
        result
    }

    /// Deletes an item when `if_match` is current.
    ///
    /// # Errors
    /// - `NotFound` when no item has this id.
    /// - `PreconditionFailed` when the token is missing or stale.
    pub fn delete_item(&self, id: &str, if_match: Option<&str>) -> StoreResult<Item> {
        let result = self.repo.delete_item(id, Precondition::IfMatch(if_match));
        log_write("item_delete", Some(id), &result);
        result
    }
}

fn log_write(event: &str, id: Option<&str>, result: &StoreResult<Item>) {
    match result {
        Ok(item) => info!(
            "event={} module=service status=ok id={} version={}",
            event, item.id, item.version
        ),
        Err(err) => warn!(
            "event={} module=service status=error id={} code={}",
            event,
            id.unwrap_or("-"),
            err.code()
        ),
    }
}
