//! Case folding helpers shared by uniqueness checks and list queries.

/// Folds text for case-insensitive comparison.
pub fn fold_case(value: &str) -> String {
    value.to_lowercase()
}

/// Case-insensitive equality used for natural keys and exact-match filters.
pub fn eq_ignore_case(left: &str, right: &str) -> bool {
    left.eq_ignore_ascii_case(right) || fold_case(left) == fold_case(right)
}
