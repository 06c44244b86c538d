//! Core resource engine for Craftify.
//! This crate is the single source of truth for catalog invariants: natural-key
//! uniqueness, deterministic listing and version-gated writes.

pub mod config;
pub mod logging;
pub mod model;
pub mod query;
pub mod repo;
pub mod seed;
pub mod service;

pub use config::{known_uoms, EngineConfig};
pub use logging::{default_log_level, init_logging, logging_status, LogSettings, LoggingError};
pub use model::category::{Category, CategoryId, CategoryPayload};
pub use model::item::{Item, ItemId, ItemPayload, ItemStatus, ItemUom, ItemUomPayload};
pub use model::record::{EntityTag, Record, Version};
pub use model::validation::{ValidationError, ValidationReason};
pub use query::{CategoryListQuery, ItemFilter, ItemListQuery, ListQuery, Page};
pub use repo::category_repo::{CategoryRepository, InMemoryCategoryRepository};
pub use repo::concurrency::GateRejection;
pub use repo::error::{StoreError, StoreResult};
pub use repo::item_repo::{InMemoryItemRepository, ItemRepository};
pub use seed::{seed_demo_data, SeedSummary};
pub use service::category_service::{CategoryService, CategoryUsagePolicy, ReservedNamePolicy};
pub use service::item_service::ItemService;
pub use service::item_transfer::{
    ExportFilter, ImportError, ImportMode, ImportResult, ImportRowError,
};
