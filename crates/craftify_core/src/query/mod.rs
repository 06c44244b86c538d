//! List query pipeline: free-text search, field filters, sort, offset paging.
//!
//! # Invariants
//! - Queries run over a snapshot and have no side effects.
//! - Output order is total: ties on the sort field fall back to identity.
//! - Out-of-range pages are empty, never errors.

pub mod listable;
pub mod pipeline;
pub mod sort;

pub use listable::{ItemFilter, Listable, NoFilter};
pub use pipeline::{
    normalize_needle, page_bounds, run_query, total_pages, CategoryListQuery, ItemListQuery,
    ListQuery, Page,
};
pub use sort::{SortDirection, SortSpec};
