//! Lock-guarded in-memory record collection.
//!
//! # Responsibility
//! - Own every record of one resource kind.
//! - Run check-then-write sequences (uniqueness, version gate) atomically.
//!
//! # Invariants
//! - At most one record per identity and per case-insensitive natural key.
//! - Readers clone records out under the read lock and never observe a
//!   half-applied mutation.
//! - Every accepted replacement carries exactly the next version.

use crate::model::record::Record;
use crate::repo::concurrency::Precondition;
use crate::repo::error::{StoreError, StoreResult};
use crate::repo::uniqueness::{check_available, keys_equal};
use parking_lot::RwLock;
use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;

/// Identity-keyed record map guarded by a collection.
pub type Records<R> = HashMap<<R as Record>::Id, R>;

/// Result of an insert-or-replace keyed by natural key.
#[derive(Debug, Clone, PartialEq)]
pub enum Upserted<R> {
    Created(R),
    Updated(R),
}

impl<R> Upserted<R> {
    pub fn record(&self) -> &R {
        match self {
            Self::Created(record) | Self::Updated(record) => record,
        }
    }

    pub fn into_record(self) -> R {
        match self {
            Self::Created(record) | Self::Updated(record) => record,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

/// In-memory collection of versioned records.
pub struct Collection<R: Record> {
    records: RwLock<Records<R>>,
}

impl<R: Record> Default for Collection<R> {
    fn default() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }
}

impl<R: Record> Collection<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point-in-time copy of every record, in unspecified order.
    pub fn snapshot(&self) -> Vec<R> {
        self.records.read().values().cloned().collect()
    }

    pub fn get<Q>(&self, id: &Q) -> Option<R>
    where
        R::Id: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.records.read().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Inserts the record produced by `build`, which runs under the write lock
    /// and may inspect current records (e.g. to derive a free identity).
    ///
    /// # Errors
    /// - Whatever `build` returns.
    /// - `Conflict` when the identity or natural key is already taken.
    pub fn insert_with<F>(&self, build: F) -> StoreResult<R>
    where
        F: FnOnce(&Records<R>) -> StoreResult<R>,
    {
        let mut records = self.records.write();
        insert_locked(&mut records, build)
    }

    /// Replaces one record with the successor produced by `apply`.
    ///
    /// Order of checks: existence, precondition, `apply`, natural-key
    /// uniqueness (only when the key changed).
    pub fn replace_with<Q, F>(
        &self,
        id: &Q,
        precondition: Precondition<'_>,
        apply: F,
    ) -> StoreResult<R>
    where
        R::Id: Borrow<Q>,
        Q: Hash + Eq + Display + ?Sized,
        F: FnOnce(&R, &Records<R>) -> StoreResult<R>,
    {
        let mut records = self.records.write();
        replace_locked(&mut records, id, precondition, apply)
    }

    /// Removes one record once `precondition` and `guard` accept it.
    pub fn remove_with<Q, F>(
        &self,
        id: &Q,
        precondition: Precondition<'_>,
        guard: F,
    ) -> StoreResult<R>
    where
        R::Id: Borrow<Q>,
        Q: Hash + Eq + Display + ?Sized,
        F: FnOnce(&R) -> StoreResult<()>,
    {
        let mut records = self.records.write();
        let current = records
            .get(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        precondition.check(current.version())?;
        guard(current)?;
        records
            .remove(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Removes every listed identity that exists; returns how many were removed.
    pub fn remove_many<'q, Q, I>(&self, ids: I) -> usize
    where
        R::Id: Borrow<Q>,
        Q: Hash + Eq + ?Sized + 'q,
        I: IntoIterator<Item = &'q Q>,
    {
        let mut records = self.records.write();
        ids.into_iter()
            .filter(|id| records.remove(*id).is_some())
            .count()
    }

    /// Replaces the record owning natural key `key` (without version check) or
    /// inserts a new one when no record owns it.
    pub fn upsert_by_key<C, U>(
        &self,
        key: Option<&str>,
        create: C,
        update: U,
    ) -> StoreResult<Upserted<R>>
    where
        C: FnOnce(&Records<R>) -> StoreResult<R>,
        U: FnOnce(&R, &Records<R>) -> StoreResult<R>,
    {
        let mut records = self.records.write();
        let existing = key.and_then(|key| {
            records
                .values()
                .find(|record| keys_equal(record.natural_key(), key))
                .map(|record| record.id().clone())
        });

        match existing {
            Some(id) => replace_locked(&mut records, &id, Precondition::Unconditional, update)
                .map(Upserted::Updated),
            None => insert_locked(&mut records, create).map(Upserted::Created),
        }
    }
}

fn insert_locked<R, F>(records: &mut Records<R>, build: F) -> StoreResult<R>
where
    R: Record,
    F: FnOnce(&Records<R>) -> StoreResult<R>,
{
    let record = build(records)?;
    if records.contains_key(record.id())
        || !check_available(records.values(), record.natural_key(), None)
    {
        return Err(StoreError::Conflict(record.natural_key().to_string()));
    }

    records.insert(record.id().clone(), record.clone());
    Ok(record)
}

fn replace_locked<R, Q, F>(
    records: &mut Records<R>,
    id: &Q,
    precondition: Precondition<'_>,
    apply: F,
) -> StoreResult<R>
where
    R: Record,
    R::Id: Borrow<Q>,
    Q: Hash + Eq + Display + ?Sized,
    F: FnOnce(&R, &Records<R>) -> StoreResult<R>,
{
    let current = records
        .get(id)
        .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
    precondition.check(current.version())?;

    let next = apply(current, records)?;
    debug_assert!(
        <R::Id as Borrow<Q>>::borrow(next.id()) == id,
        "replacement must keep its identity"
    );
    debug_assert_eq!(next.version(), current.version().next());

    if !keys_equal(current.natural_key(), next.natural_key())
        && !check_available(records.values(), next.natural_key(), Some(next.id()))
    {
        return Err(StoreError::Conflict(next.natural_key().to_string()));
    }

    records.insert(next.id().clone(), next.clone());
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::{Collection, Upserted};
    use crate::model::category::Category;
    use crate::model::record::Version;
    use crate::repo::concurrency::Precondition;
    use crate::repo::error::StoreError;

    #[test]
    fn insert_rejects_case_variant_of_existing_key() {
        let collection = Collection::new();
        collection
            .insert_with(|_| Ok(Category::new("Widgets", 0)))
            .unwrap();
        let err = collection
            .insert_with(|_| Ok(Category::new("WIDGETS", 0)))
            .unwrap_err();
        assert_eq!(err, StoreError::Conflict("WIDGETS".to_string()));
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn failed_replace_leaves_record_untouched() {
        let collection = Collection::new();
        let created = collection
            .insert_with(|_| Ok(Category::new("Kit", 0)))
            .unwrap();

        let err = collection
            .replace_with(&created.id, Precondition::IfMatch(Some("W/\"5\"")), |c, _| {
                Ok(c.renamed("Kits", 1))
            })
            .unwrap_err();
        assert!(matches!(err, StoreError::PreconditionFailed(_)));
        assert_eq!(collection.get(&created.id), Some(created.clone()));

        let renamed = collection
            .replace_with(&created.id, Precondition::IfMatch(Some("W/\"0\"")), |c, _| {
                Ok(c.renamed("Kits", 1))
            })
            .unwrap();
        assert_eq!(renamed.version, Version::new(1));
    }

    #[test]
    fn upsert_matches_existing_key_case_insensitively() {
        let collection = Collection::new();
        collection
            .insert_with(|_| Ok(Category::new("Hardware", 0)))
            .unwrap();

        let outcome = collection
            .upsert_by_key(
                Some("HARDWARE"),
                |_| Ok(Category::new("HARDWARE", 0)),
                |current, _| Ok(current.renamed("Hardware", 1)),
            )
            .unwrap();
        assert!(matches!(outcome, Upserted::Updated(ref c) if c.version == Version::new(1)));
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn remove_many_counts_only_existing_records() {
        let collection = Collection::new();
        let a = collection
            .insert_with(|_| Ok(Category::new("A", 0)))
            .unwrap();
        let missing = uuid::Uuid::new_v4();
        assert_eq!(collection.remove_many([&a.id, &missing]), 1);
        assert!(collection.is_empty());
    }
}
