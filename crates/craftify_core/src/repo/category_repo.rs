//! Category repository contract and in-memory implementation.
//!
//! # Responsibility
//! - Provide create/get/rename/delete over the category collection.
//! - Validate payloads inside the same critical section as the write.
//!
//! # Invariants
//! - Category names are unique case-insensitively.
//! - Rename is version-gated; delete is guarded only by the caller's hook.

use crate::model::category::{Category, CategoryId, CategoryPayload};
use crate::model::record::now_epoch_ms;
use crate::repo::collection::Collection;
use crate::repo::concurrency::Precondition;
use crate::repo::error::StoreResult;
use std::sync::Arc;

/// Repository interface for category storage.
pub trait CategoryRepository {
    /// Point-in-time copy of all categories.
    fn snapshot(&self) -> Vec<Category>;
    fn get_category(&self, id: CategoryId) -> Option<Category>;
    fn create_category(&self, payload: &CategoryPayload) -> StoreResult<Category>;
    fn rename_category(
        &self,
        id: CategoryId,
        precondition: Precondition<'_>,
        payload: &CategoryPayload,
    ) -> StoreResult<Category>;
    /// Removes a category once `guard` accepts it; `guard` runs under the
    /// write lock.
    fn delete_category(
        &self,
        id: CategoryId,
        guard: &dyn Fn(&Category) -> StoreResult<()>,
    ) -> StoreResult<Category>;
}

/// Process-local category store.
#[derive(Default)]
pub struct InMemoryCategoryRepository {
    records: Collection<Category>,
}

impl InMemoryCategoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl CategoryRepository for InMemoryCategoryRepository {
    fn snapshot(&self) -> Vec<Category> {
        self.records.snapshot()
    }

    fn get_category(&self, id: CategoryId) -> Option<Category> {
        self.records.get(&id)
    }

    fn create_category(&self, payload: &CategoryPayload) -> StoreResult<Category> {
        let now = now_epoch_ms();
        self.records.insert_with(|_| {
            let name = payload.normalized_name()?;
            Ok(Category::new(name, now))
        })
    }

    fn rename_category(
        &self,
        id: CategoryId,
        precondition: Precondition<'_>,
        payload: &CategoryPayload,
    ) -> StoreResult<Category> {
        let now = now_epoch_ms();
        self.records.replace_with(&id, precondition, |current, _| {
            let name = payload.normalized_name()?;
            Ok(current.renamed(name, now))
        })
    }

    fn delete_category(
        &self,
        id: CategoryId,
        guard: &dyn Fn(&Category) -> StoreResult<()>,
    ) -> StoreResult<Category> {
        self.records
            .remove_with(&id, Precondition::Unconditional, |current| guard(current))
    }
}

impl<T: CategoryRepository + ?Sized> CategoryRepository for Arc<T> {
    fn snapshot(&self) -> Vec<Category> {
        (**self).snapshot()
    }

    fn get_category(&self, id: CategoryId) -> Option<Category> {
        (**self).get_category(id)
    }

    fn create_category(&self, payload: &CategoryPayload) -> StoreResult<Category> {
        (**self).create_category(payload)
    }

    fn rename_category(
        &self,
        id: CategoryId,
        precondition: Precondition<'_>,
        payload: &CategoryPayload,
    ) -> StoreResult<Category> {
        (**self).rename_category(id, precondition, payload)
    }

    fn delete_category(
        &self,
        id: CategoryId,
        guard: &dyn Fn(&Category) -> StoreResult<()>,
    ) -> StoreResult<Category> {
        (**self).delete_category(id, guard)
    }
}
