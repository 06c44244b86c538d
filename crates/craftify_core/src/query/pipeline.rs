//! Query pipeline over one collection snapshot.
//!
//! Steps, in order: free-text filter, field filters, sort, count, slice.

use crate::config::EngineConfig;
use crate::model::text::fold_case;
use crate::query::listable::{ItemFilter, Listable, NoFilter};
use crate::query::sort::SortSpec;
use serde::Serialize;

/// List request. `F` carries kind-specific field filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery<F = NoFilter> {
    /// Zero-based page index.
    pub page: u32,
    /// Page length; `None` uses the configured default.
    pub size: Option<u32>,
    /// `"field,direction"`.
    pub sort: Option<String>,
    /// Free-text search. Blank means no search.
    pub q: Option<String>,
    pub filter: F,
}

pub type CategoryListQuery = ListQuery<NoFilter>;
pub type ItemListQuery = ListQuery<ItemFilter>;

/// One page of results plus paging metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: u32,
    /// Effective page length after normalization.
    pub size: u32,
    /// Matches after filtering, before paging.
    pub total_elements: usize,
    /// `max(1, ceil(total_elements / size))`.
    pub total_pages: usize,
    /// Normalized sort descriptor, e.g. `name,asc`.
    pub sort: String,
}

/// Runs the full pipeline over `records`.
pub fn run_query<R: Listable>(
    records: Vec<R>,
    query: &ListQuery<R::Filter>,
    config: &EngineConfig,
) -> Page<R> {
    let needle = normalize_needle(query.q.as_deref());
    let sort = SortSpec::for_kind::<R>(query.sort.as_deref());
    let size = config.normalize_page_size(query.size);

    let mut matched: Vec<R> = records
        .into_iter()
        .filter(|record| {
            needle
                .as_deref()
                .map_or(true, |needle| record.matches_text(needle))
        })
        .filter(|record| record.matches_filter(&query.filter))
        .collect();
    matched.sort_by(|left, right| sort.compare(left, right));

    let total = matched.len();
    let (from, to) = page_bounds(query.page, size, total);
    let content = matched.drain(from..to).collect();

    Page {
        content,
        page: query.page,
        size,
        total_elements: total,
        total_pages: total_pages(total, size),
        sort: sort.descriptor(),
    }
}

/// Case-folded search text, or `None` when the query is absent or blank.
pub fn normalize_needle(q: Option<&str>) -> Option<String> {
    q.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(fold_case)
}

/// Slice bounds `[from, to)` of one page, clamped to `total`.
pub fn page_bounds(page: u32, size: u32, total: usize) -> (usize, usize) {
    let size = size.max(1) as usize;
    let from = (page as usize).saturating_mul(size).min(total);
    let to = from.saturating_add(size).min(total);
    (from, to)
}

/// Page count with a floor of 1, so an empty result still has one page.
pub fn total_pages(total: usize, size: u32) -> usize {
    let size = size.max(1) as usize;
    total.div_ceil(size).max(1)
}

#[cfg(test)]
mod tests {
    use super::{normalize_needle, page_bounds, total_pages};

    #[test]
    fn page_bounds_clamp_out_of_range_pages() {
        assert_eq!(page_bounds(0, 2, 5), (0, 2));
        assert_eq!(page_bounds(2, 2, 5), (4, 5));
        assert_eq!(page_bounds(3, 2, 5), (5, 5));
        assert_eq!(page_bounds(u32::MAX, u32::MAX, 5), (5, 5));
    }

    #[test]
    fn total_pages_has_floor_of_one() {
        assert_eq!(total_pages(0, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(2, 1), 2);
    }

    #[test]
    fn blank_needle_is_no_filter() {
        assert_eq!(normalize_needle(Some("   ")), None);
        assert_eq!(normalize_needle(Some(" WiDgEt ")), Some("widget".to_string()));
    }
}
