//! Per-kind hooks the pipeline needs: searchable text, filters, sort keys.

use crate::model::category::Category;
use crate::model::item::{Item, ItemStatus};
use crate::model::text::{eq_ignore_case, fold_case};
use std::borrow::Cow;

/// Record kind that can be listed through the query pipeline.
pub trait Listable: Clone {
    /// Kind-specific field filters.
    type Filter: Default;

    /// Recognized sort fields, lowercase.
    const SORT_FIELDS: &'static [&'static str];
    /// Sort field used when the requested one is unknown.
    const DEFAULT_SORT_FIELD: &'static str;

    /// Whether `needle` (already case-folded, non-empty) occurs in a searchable field.
    fn matches_text(&self, needle: &str) -> bool;
    fn matches_filter(&self, filter: &Self::Filter) -> bool;
    /// Value of `field` for sorting; `None` sorts last.
    fn sort_value(&self, field: &str) -> Option<Cow<'_, str>>;
    /// Stable secondary key that makes the order total.
    fn tie_breaker(&self) -> Cow<'_, str>;
}

/// Filter type for kinds without field filters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoFilter;

/// Field filters for item lists and exports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemFilter {
    /// Exact status match.
    pub status: Option<ItemStatus>,
    /// Exact base unit match, case-insensitive. Blank means no filter.
    pub uom: Option<String>,
}

impl Listable for Category {
    type Filter = NoFilter;

    const SORT_FIELDS: &'static [&'static str] = &["name", "id"];
    const DEFAULT_SORT_FIELD: &'static str = "name";

    fn matches_text(&self, needle: &str) -> bool {
        fold_case(&self.name).contains(needle)
    }

    fn matches_filter(&self, _filter: &NoFilter) -> bool {
        true
    }

    fn sort_value(&self, field: &str) -> Option<Cow<'_, str>> {
        match field {
            "id" => Some(Cow::Owned(self.id.to_string())),
            _ => Some(Cow::Borrowed(self.name.as_str())),
        }
    }

    fn tie_breaker(&self) -> Cow<'_, str> {
        Cow::Owned(self.id.to_string())
    }
}

impl Listable for Item {
    type Filter = ItemFilter;

    const SORT_FIELDS: &'static [&'static str] = &["name", "code"];
    const DEFAULT_SORT_FIELD: &'static str = "name";

    fn matches_text(&self, needle: &str) -> bool {
        fold_case(&self.code).contains(needle) || fold_case(&self.name).contains(needle)
    }

    fn matches_filter(&self, filter: &ItemFilter) -> bool {
        if let Some(status) = filter.status {
            if self.status != status {
                return false;
            }
        }
        match filter.uom.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(uom) => eq_ignore_case(&self.uom_base, uom),
        }
    }

    fn sort_value(&self, field: &str) -> Option<Cow<'_, str>> {
        match field {
            "code" => Some(Cow::Borrowed(self.code.as_str())),
            _ => Some(Cow::Borrowed(self.name.as_str())),
        }
    }

    fn tie_breaker(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.id.as_str())
    }
}
