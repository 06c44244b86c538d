use craftify_core::{
    ExportFilter, ImportError, ImportMode, InMemoryItemRepository, ItemFilter, ItemListQuery,
    ItemPayload, ItemService, ItemStatus, Version,
};

const BOM: &str = "\u{FEFF}";
const HEADER: &str = "ID,Code,Product name,Status,Category,UoM\n";

fn service() -> ItemService<InMemoryItemRepository> {
    ItemService::new(InMemoryItemRepository::new())
}

fn add(
    service: &ItemService<InMemoryItemRepository>,
    code: &str,
    name: &str,
    status: ItemStatus,
    uom: &str,
) {
    service
        .create_item(&ItemPayload {
            code: Some(code.to_string()),
            name: Some(name.to_string()),
            status: Some(status),
            category_name: Some("Hardware".to_string()),
            uom_base: Some(uom.to_string()),
            description: Some("kept on import".to_string()),
            uoms: Vec::new(),
        })
        .unwrap();
}

fn export_text(service: &ItemService<InMemoryItemRepository>, filter: &ExportFilter) -> String {
    String::from_utf8(service.export_csv(filter)).unwrap()
}

#[test]
fn export_writes_bom_header_and_quoted_rows_sorted_by_code() {
    let service = service();
    add(&service, "ITM-002", "Bolt, \"large\"", ItemStatus::Active, "pcs");
    add(&service, "ITM-001", "Nut", ItemStatus::Draft, "pcs");

    let bytes = service.export_csv(&ExportFilter::default());
    assert!(bytes.starts_with(b"\xEF\xBB\xBF"));

    let text = String::from_utf8(bytes).unwrap();
    let expected = format!(
        "{BOM}{HEADER}ITM-001,ITM-001,Nut,DRAFT,Hardware,pcs\n\
         ITM-002,ITM-002,\"Bolt, \"\"large\"\"\",ACTIVE,Hardware,pcs\n"
    );
    assert_eq!(text, expected);
}

#[test]
fn export_applies_list_predicates_and_id_allow_list() {
    let service = service();
    add(&service, "ITM-001", "Widget", ItemStatus::Active, "pcs");
    add(&service, "ITM-002", "Widget XL", ItemStatus::Hold, "pcs");
    add(&service, "ITM-003", "Flour", ItemStatus::Active, "kg");

    let by_query = export_text(
        &service,
        &ExportFilter {
            q: Some("widget".to_string()),
            filter: ItemFilter {
                status: Some(ItemStatus::Active),
                uom: None,
            },
            ids: Vec::new(),
        },
    );
    assert_eq!(by_query.lines().count(), 2);
    assert!(by_query.contains("ITM-001,ITM-001,Widget,ACTIVE"));

    let by_ids = export_text(
        &service,
        &ExportFilter {
            ids: vec!["ITM-003".to_string(), "ITM-404".to_string()],
            ..ExportFilter::default()
        },
    );
    assert_eq!(by_ids.lines().count(), 2);
    assert!(by_ids.contains("ITM-003,ITM-003,Flour,ACTIVE,Hardware,kg"));

    let empty = export_text(
        &service,
        &ExportFilter {
            q: Some("nothing".to_string()),
            ..ExportFilter::default()
        },
    );
    assert_eq!(empty, format!("{BOM}{HEADER}"));
}

#[test]
fn upsert_import_creates_updates_and_reports_row_errors() {
    let service = service();
    add(&service, "ITM-001", "Widget", ItemStatus::Draft, "pcs");

    let csv = format!(
        "{HEADER}\
         ,itm-001,Widget renamed,ACTIVE,Component,pcs\n\
         ,,New thing,draft,Hardware,kg\n\
         ,ITM-009,Bad status,Retired,Hardware,pcs\n\
         ,ITM-010,,Active,Hardware,pcs\n"
    );
    let result = service
        .import_csv(csv.as_bytes(), ImportMode::Upsert)
        .unwrap();

    assert_eq!(result.created, 1);
    assert_eq!(result.updated, 1);
    assert_eq!(result.errors.len(), 2);
    assert_eq!(result.errors[0].row, 3);
    assert_eq!(result.errors[0].field, "status");
    assert_eq!(result.errors[1].row, 4);
    assert_eq!(result.errors[1].field, "name");

    let updated = service.get_item("ITM-001").unwrap();
    assert_eq!(updated.name, "Widget renamed");
    assert_eq!(updated.status, ItemStatus::Active);
    assert_eq!(updated.version, Version::new(1));
    assert_eq!(updated.description.as_deref(), Some("kept on import"));

    let created = service.get_item("ITM-002").unwrap();
    assert_eq!(created.name, "New thing");
    assert_eq!(created.status, ItemStatus::Draft);
    assert!(service.get_item("ITM-009").is_err());
    assert!(service.get_item("ITM-010").is_err());
}

#[test]
fn create_only_import_reports_existing_codes() {
    let service = service();
    add(&service, "ITM-001", "Widget", ItemStatus::Draft, "pcs");

    let csv = format!(
        "{HEADER},ITM-001,Widget again,Active,Hardware,pcs\n,ITM-005,Fresh,Active,Hardware,pcs\n"
    );
    let result = service
        .import_csv(csv.as_bytes(), ImportMode::CreateOnly)
        .unwrap();

    assert_eq!(result.created, 1);
    assert_eq!(result.updated, 0);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].row, 1);
    assert_eq!(result.errors[0].field, "code");
    assert_eq!(service.get_item("ITM-001").unwrap().name, "Widget");
}

#[test]
fn exported_file_imports_back_as_updates() {
    let service = service();
    add(&service, "ITM-001", "Bolt, \"large\"", ItemStatus::Hold, "pcs");
    add(&service, "ITM-002", "Nut", ItemStatus::Active, "ea");

    let exported = service.export_csv(&ExportFilter::default());
    let result = service.import_csv(&exported, ImportMode::Upsert).unwrap();

    assert_eq!(result.created, 0);
    assert_eq!(result.updated, 2);
    assert!(result.errors.is_empty());
    let bolt = service.get_item("ITM-001").unwrap();
    assert_eq!(bolt.name, "Bolt, \"large\"");
    assert_eq!(bolt.status, ItemStatus::Hold);
}

#[test]
fn malformed_import_payloads_are_rejected_whole() {
    let service = service();
    assert_eq!(
        service.import_csv(b"", ImportMode::Upsert),
        Err(ImportError::MissingHeader)
    );
    assert_eq!(
        service.import_csv(b"\xFF\xFE", ImportMode::Upsert),
        Err(ImportError::InvalidUtf8)
    );
    assert_eq!(
        service.import_csv(b"Code,Product name,Status,Category\n", ImportMode::Upsert),
        Err(ImportError::MissingColumn("UoM"))
    );
    let unterminated = service
        .import_csv(
            format!("{HEADER},\"ITM-001,Open,Active,Hardware,pcs\n").as_bytes(),
            ImportMode::Upsert,
        )
        .unwrap_err();
    assert!(matches!(unterminated, ImportError::Malformed(_)));
    assert_eq!(unterminated.status_code(), 400);
    assert!(service.list_items(&ItemListQuery::default()).content.is_empty());
}

#[test]
fn batch_delete_counts_distinct_non_blank_ids() {
    let service = service();
    add(&service, "ITM-001", "Widget", ItemStatus::Active, "pcs");
    add(&service, "ITM-002", "Gadget", ItemStatus::Active, "pcs");

    let count = service.batch_delete(&[
        Some("ITM-001".to_string()),
        Some(" ITM-001 ".to_string()),
        None,
        Some("   ".to_string()),
        Some("ITM-404".to_string()),
    ]);

    assert_eq!(count, 2);
    assert!(service.get_item("ITM-001").is_err());
    assert!(service.get_item("ITM-002").is_ok());
    assert_eq!(service.batch_delete(&[]), 0);
}
