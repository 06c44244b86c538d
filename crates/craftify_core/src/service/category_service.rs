//! Category use-case service.
//!
//! # Responsibility
//! - Provide list/get/create/rename/delete entry points for categories.
//! - Apply the category usage policy before deletion.
//!
//! # Invariants
//! - Rename requires a current version token.
//! - Delete of an in-use category fails with `InUse` unless forced.
//! - Log events carry identifiers and outcome codes only, never names.

use crate::config::EngineConfig;
use crate::model::category::{Category, CategoryId, CategoryPayload};
use crate::model::text::eq_ignore_case;
use crate::query::{run_query, CategoryListQuery, Page};
use crate::repo::category_repo::CategoryRepository;
use crate::repo::concurrency::Precondition;
use crate::repo::error::{StoreError, StoreResult};
use log::{info, warn};

/// Decides whether a category is still referenced and must not be deleted.
pub trait CategoryUsagePolicy: Send + Sync {
    fn in_use(&self, category: &Category) -> bool;
}

/// Treats a fixed set of names (case-insensitive) as always referenced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReservedNamePolicy {
    names: Vec<String>,
}

impl ReservedNamePolicy {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.reserved_category_names().to_vec())
    }
}

impl CategoryUsagePolicy for ReservedNamePolicy {
    fn in_use(&self, category: &Category) -> bool {
        self.names
            .iter()
            .any(|name| eq_ignore_case(name, &category.name))
    }
}

/// Use-case service wrapper for category operations.
pub struct CategoryService<R: CategoryRepository> {
    repo: R,
    config: EngineConfig,
    usage: Box<dyn CategoryUsagePolicy>,
}

impl<R: CategoryRepository> CategoryService<R> {
    /// Creates a service with default configuration.
    pub fn new(repo: R) -> Self {
        Self::with_config(repo, EngineConfig::default())
    }

    /// Creates a service whose usage policy reserves the configured names.
    pub fn with_config(repo: R, config: EngineConfig) -> Self {
        let usage = Box::new(ReservedNamePolicy::from_config(&config));
        Self {
            repo,
            config,
            usage,
        }
    }

    /// Replaces the deletion guard.
    pub fn with_usage_policy(mut self, usage: impl CategoryUsagePolicy + 'static) -> Self {
        self.usage = Box::new(usage);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Lists categories through the query pipeline.
    pub fn list_categories(&self, query: &CategoryListQuery) -> Page<Category> {
        run_query(self.repo.snapshot(), query, &self.config)
    }

    /// Gets one category by id.
    ///
    /// # Errors
    /// - `NotFound` when no category has this id.
    pub fn get_category(&self, id: CategoryId) -> StoreResult<Category> {
        self.repo
            .get_category(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Creates a category at version 0.
    ///
    /// # Errors
    /// - `Validation` for a missing, blank or overlong name.
    /// - `Conflict` when the name is taken, ignoring case.
    pub fn create_category(&self, payload: &CategoryPayload) -> StoreResult<Category> {
        let result = self.repo.create_category(payload);
        match &result {
            Ok(category) => info!(
                "event=category_create module=service status=ok id={} version={}",
                category.id, category.version
            ),
            Err(err) => warn!(
                "event=category_create module=service status=error code={}",
                err.code()
            ),
        }
        result
    }

    /// Renames a category when `if_match` carries its current token.
    ///
    /// # Errors
    /// - `NotFound`, then `PreconditionFailed`, then `Validation`, then
    ///   `Conflict`, in that order of checking.
    pub fn rename_category(
        &self,
        id: CategoryId,
        if_match: Option<&str>,
        payload: &CategoryPayload,
    ) -> StoreResult<Category> {
        let result = self
            .repo
            .rename_category(id, Precondition::IfMatch(if_match), payload);
        match &result {
            Ok(category) => info!(
                "event=category_rename module=service status=ok id={} version={}",
                category.id, category.version
            ),
            Err(err) => warn!(
                "event=category_rename module=service status=error id={} code={}",
                id,
                err.code()
            ),
        }
        result
    }

    /// Deletes a category. `force` skips the usage policy.
    ///
    /// # Errors
    /// - `NotFound` when no category has this id.
    /// - `InUse` when the policy reports the category as referenced.
    pub fn delete_category(&self, id: CategoryId, force: bool) -> StoreResult<Category> {
        let usage = self.usage.as_ref();
        let guard = |category: &Category| -> StoreResult<()> {
            if !force && usage.in_use(category) {
                return Err(StoreError::InUse(category.name.clone()));
            }
            Ok(())
        };
        let result = self.repo.delete_category(id, &guard);
        match &result {
            Ok(_) => info!(
                "event=category_delete module=service status=ok id={} force={}",
                id, force
            ),
            Err(err) => warn!(
                "event=category_delete module=service status=error id={} code={}",
                id,
                err.code()
            ),
        }
        result
    }
}
