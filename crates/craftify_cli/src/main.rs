//! CLI smoke entry point.
//!
//! # Responsibility
//! - Wire logging, stores, services and demo data the way a host process would.
//! - Print a deterministic listing for quick local sanity checks.

use craftify_core::{
    default_log_level, init_logging, seed_demo_data, CategoryListQuery, CategoryService,
    EngineConfig, InMemoryCategoryRepository, InMemoryItemRepository, ItemListQuery, ItemService,
};
use log::{info, warn};
use std::process::ExitCode;
use std::sync::Arc;

fn main() -> ExitCode {
    let log_dir = std::env::temp_dir().join("craftify-cli-logs");
    match log_dir.to_str() {
        Some(dir) => {
            if let Err(err) = init_logging(default_log_level(), dir) {
                eprintln!("logging disabled: {err}");
            }
        }
        None => eprintln!("logging disabled: temp dir is not valid UTF-8"),
    }

    info!(
        "event=cli_start module=cli status=ok version={}",
        env!("CARGO_PKG_VERSION")
    );
    println!("craftify version={}", env!("CARGO_PKG_VERSION"));

    let config = EngineConfig::default();
    let categories = CategoryService::with_config(
        Arc::new(InMemoryCategoryRepository::new()),
        config.clone(),
    );
    let items = ItemService::with_config(
        Arc::new(InMemoryItemRepository::with_code_prefix(
            config.item_code_prefix(),
        )),
        config,
    );

    let summary = match seed_demo_data(&categories, &items) {
        Ok(summary) => summary,
        Err(err) => {
            warn!("event=cli_seed module=cli status=error code={}", err.code());
            eprintln!("seeding failed: {err}");
            return ExitCode::FAILURE;
        }
    };
    info!(
        "event=cli_seed module=cli status=ok categories={} items={}",
        summary.categories, summary.items
    );

    let category_page = categories.list_categories(&CategoryListQuery::default());
    println!(
        "categories total={} sort={}",
        category_page.total_elements, category_page.sort
    );
    for category in &category_page.content {
        println!("  {} etag={}", category.name, category.version.entity_tag());
    }

    let item_page = items.list_items(&ItemListQuery {
        sort: Some("code,asc".to_string()),
        ..ItemListQuery::default()
    });
    println!(
        "items total={} pages={} sort={}",
        item_page.total_elements, item_page.total_pages, item_page.sort
    );
    for item in &item_page.content {
        println!(
            "  {} {} [{}] {} {}",
            item.code, item.name, item.status, item.category_name, item.uom_base
        );
    }

    ExitCode::SUCCESS
}
