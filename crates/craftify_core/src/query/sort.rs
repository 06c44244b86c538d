//! `"field,direction"` sort descriptors.

use crate::model::text::fold_case;
use crate::query::listable::Listable;
use std::borrow::Cow;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// `desc` (any case) selects descending; everything else is ascending.
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("desc") {
            Self::Desc
        } else {
            Self::Asc
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Normalized sort request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: &'static str,
    pub direction: SortDirection,
}

impl SortSpec {
    /// Parses `raw` against the recognized fields of a kind.
    ///
    /// Unknown or missing fields fall back to `default_field`; the direction
    /// defaults to ascending.
    pub fn parse(
        raw: Option<&str>,
        recognized: &'static [&'static str],
        default_field: &'static str,
    ) -> Self {
        let raw = raw.map(str::trim).unwrap_or_default();
        let (field, direction) = match raw.split_once(',') {
            Some((field, direction)) => (field.trim(), SortDirection::parse(direction)),
            None => (raw, SortDirection::Asc),
        };
        let field = recognized
            .iter()
            .copied()
            .find(|candidate| candidate.eq_ignore_ascii_case(field))
            .unwrap_or(default_field);
        Self { field, direction }
    }

    /// Parses `raw` using the sort fields declared by `R`.
    pub fn for_kind<R: Listable>(raw: Option<&str>) -> Self {
        Self::parse(raw, R::SORT_FIELDS, R::DEFAULT_SORT_FIELD)
    }

    /// Canonical `"field,direction"` form echoed back to callers.
    pub fn descriptor(&self) -> String {
        format!("{},{}", self.field, self.direction.as_str())
    }

    /// Total order: sort field (case-insensitive, missing last in both
    /// directions), then the record's tie breaker ascending.
    pub fn compare<R: Listable>(&self, left: &R, right: &R) -> Ordering {
        compare_missing_last(
            left.sort_value(self.field),
            right.sort_value(self.field),
            self.direction,
        )
        .then_with(|| left.tie_breaker().cmp(&right.tie_breaker()))
    }
}

fn compare_missing_last(
    left: Option<Cow<'_, str>>,
    right: Option<Cow<'_, str>>,
    direction: SortDirection,
) -> Ordering {
    match (left, right) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(left), Some(right)) => {
            let ordering = fold_case(&left).cmp(&fold_case(&right));
            match direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        }
    }
}
