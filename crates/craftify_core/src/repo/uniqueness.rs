//! Natural-key uniqueness index.
//!
//! The index is a linear scan over the records visible under the collection
//! lock. Callers must hold the write lock across check and insert.

use crate::model::record::Record;
use crate::model::text::{eq_ignore_case, fold_case};

/// Whether two natural keys collide.
pub fn keys_equal(left: &str, right: &str) -> bool {
    eq_ignore_case(left, right)
}

/// Returns `true` when no record other than `exclude` owns `candidate`.
pub fn check_available<'a, R, I>(records: I, candidate: &str, exclude: Option<&R::Id>) -> bool
where
    R: Record + 'a,
    I: IntoIterator<Item = &'a R>,
{
    let candidate = fold_case(candidate);
    !records
        .into_iter()
        .filter(|record| exclude.map_or(true, |id| record.id() != id))
        .any(|record| fold_case(record.natural_key()) == candidate)
}
