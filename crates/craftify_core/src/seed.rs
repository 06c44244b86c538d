//! Demo data initialization.
//!
//! # Responsibility
//! - Populate empty stores with a small catalog for local runs.
//!
//! # Invariants
//! - Seeding is explicit; nothing is created at store construction.
//! - Seeding goes through the public services, so every record is validated.

use crate::model::category::CategoryPayload;
use crate::model::item::{ItemPayload, ItemStatus};
use crate::repo::category_repo::CategoryRepository;
use crate::repo::error::StoreResult;
use crate::repo::item_repo::ItemRepository;
use crate::service::category_service::CategoryService;
use crate::service::item_service::ItemService;
use log::info;

const DEMO_CATEGORIES: &[&str] = &[
    "Component",
    "Fabrication",
    "Hardware",
    "Assembly",
    "Finished Good",
    "Consumable",
    "Kit",
];

/// `(code, name, status, category, base unit)`.
const DEMO_ITEMS: &[(&str, &str, ItemStatus, &str, &str)] = &[
    ("ITM-001", "Widget A", ItemStatus::Draft, "Component", "pcs"),
    ("ITM-002", "Gadget B", ItemStatus::Active, "Hardware", "pcs"),
    ("ITM-003", "Assembly C", ItemStatus::Hold, "Assembly", "set"),
];

/// Records created by `seed_demo_data`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub categories: usize,
    pub items: usize,
}

/// Creates the demo categories and items.
///
/// # Errors
/// - `Conflict` when the stores already hold a demo record.
pub fn seed_demo_data<C, I>(
    categories: &CategoryService<C>,
    items: &ItemService<I>,
) -> StoreResult<SeedSummary>
where
    C: CategoryRepository,
    I: ItemRepository,
{
    let mut summary = SeedSummary::default();
    for name in DEMO_CATEGORIES {
        categories.create_category(&CategoryPayload::named(*name))?;
        summary.categories += 1;
    }
    for (code, name, status, category, uom) in DEMO_ITEMS {
        items.create_item(&ItemPayload {
            code: Some(code.to_string()),
            name: Some(name.to_string()),
            status: Some(*status),
            category_name: Some(category.to_string()),
            uom_base: Some(uom.to_string()),
            description: None,
            uoms: Vec::new(),
        })?;
        summary.items += 1;
    }
    info!(
        "event=seed_demo module=seed status=ok categories={} items={}",
        summary.categories, summary.items
    );
    Ok(summary)
}
