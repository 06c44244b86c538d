use craftify_core::{
    Category, CategoryListQuery, CategoryPayload, CategoryService, CategoryUsagePolicy,
    GateRejection, InMemoryCategoryRepository, StoreError, ValidationReason, Version,
};
use uuid::Uuid;

fn service() -> CategoryService<InMemoryCategoryRepository> {
    CategoryService::new(InMemoryCategoryRepository::new())
}

fn create(service: &CategoryService<InMemoryCategoryRepository>, name: &str) -> Category {
    service
        .create_category(&CategoryPayload::named(name))
        .unwrap()
}

#[test]
fn create_rejects_case_variant_of_existing_name() {
    let service = service();
    let widgets = create(&service, "Widgets");
    assert_eq!(widgets.version, Version::INITIAL);
    assert_eq!(widgets.version.entity_tag().as_str(), "W/\"0\"");

    let error = service
        .create_category(&CategoryPayload::named("widgets"))
        .unwrap_err();
    assert_eq!(error, StoreError::Conflict("widgets".to_string()));
    assert_eq!(error.status_code(), 409);
    assert_eq!(service.list_categories(&CategoryListQuery::default()).total_elements, 1);
}

#[test]
fn create_trims_and_validates_name() {
    let service = service();
    let created = create(&service, "  Gizmos  ");
    assert_eq!(created.name, "Gizmos");

    let blank = service
        .create_category(&CategoryPayload::named("   "))
        .unwrap_err();
    match blank {
        StoreError::Validation(err) => {
            assert_eq!(err.field, "name");
            assert_eq!(err.reason, ValidationReason::Blank);
        }
        other => panic!("expected validation error, got {other:?}"),
    }

    let missing = service
        .create_category(&CategoryPayload::default())
        .unwrap_err();
    assert_eq!(missing.status_code(), 400);

    let too_long = service
        .create_category(&CategoryPayload::named("x".repeat(101)))
        .unwrap_err();
    assert!(matches!(too_long, StoreError::Validation(_)));
}

#[test]
fn get_unknown_category_is_not_found() {
    let service = service();
    let error = service.get_category(Uuid::new_v4()).unwrap_err();
    assert!(matches!(error, StoreError::NotFound(_)));
    assert_eq!(error.status_code(), 404);
}

#[test]
fn rename_requires_current_token_and_bumps_version() {
    let service = service();
    let category = create(&service, "Widgets");

    let missing = service
        .rename_category(category.id, None, &CategoryPayload::named("Parts"))
        .unwrap_err();
    assert_eq!(
        missing,
        StoreError::PreconditionFailed(GateRejection::Missing)
    );
    assert_eq!(missing.status_code(), 412);

    let renamed = service
        .rename_category(
            category.id,
            Some(" W/\"0\" "),
            &CategoryPayload::named("Parts"),
        )
        .unwrap();
    assert_eq!(renamed.name, "Parts");
    assert_eq!(renamed.version, Version::new(1));
    assert_eq!(renamed.id, category.id);
    assert_eq!(renamed.created_at, category.created_at);

    let stale = service
        .rename_category(category.id, Some("W/\"0\""), &CategoryPayload::named("Bits"))
        .unwrap_err();
    assert!(matches!(
        stale,
        StoreError::PreconditionFailed(GateRejection::Stale { .. })
    ));
    assert_eq!(service.get_category(category.id).unwrap(), renamed);
}

#[test]
fn rename_to_taken_name_conflicts_but_case_change_of_own_name_is_allowed() {
    let service = service();
    let widgets = create(&service, "Widgets");
    create(&service, "Gadgets");

    let error = service
        .rename_category(widgets.id, Some("W/\"0\""), &CategoryPayload::named("GADGETS"))
        .unwrap_err();
    assert!(matches!(error, StoreError::Conflict(_)));
    let unchanged = service.get_category(widgets.id).unwrap();
    assert_eq!(unchanged.version, Version::INITIAL);
    assert_eq!(unchanged.name, "Widgets");

    let recased = service
        .rename_category(widgets.id, Some("W/\"0\""), &CategoryPayload::named("WIDGETS"))
        .unwrap();
    assert_eq!(recased.name, "WIDGETS");
    assert_eq!(recased.version, Version::new(1));
}

#[test]
fn rename_unknown_category_is_not_found_before_token_check() {
    let service = service();
    let error = service
        .rename_category(Uuid::new_v4(), None, &CategoryPayload::named("Parts"))
        .unwrap_err();
    assert!(matches!(error, StoreError::NotFound(_)));
}

#[test]
fn reserved_category_requires_force_to_delete() {
    let service = service();
    let component = create(&service, "Component");
    let hardware = create(&service, "Hardware");

    let error = service.delete_category(component.id, false).unwrap_err();
    assert_eq!(error, StoreError::InUse("Component".to_string()));
    assert_eq!(error.status_code(), 409);
    assert!(service.get_category(component.id).is_ok());

    service.delete_category(component.id, true).unwrap();
    service.delete_category(hardware.id, false).unwrap();
    assert!(matches!(
        service.get_category(component.id),
        Err(StoreError::NotFound(_))
    ));
    assert!(matches!(
        service.delete_category(hardware.id, false),
        Err(StoreError::NotFound(_))
    ));
}

struct BlockEverything;

impl CategoryUsagePolicy for BlockEverything {
    fn in_use(&self, _category: &Category) -> bool {
        true
    }
}

#[test]
fn custom_usage_policy_replaces_reserved_names() {
    let service = service().with_usage_policy(BlockEverything);
    let category = create(&service, "Hardware");
    assert!(matches!(
        service.delete_category(category.id, false),
        Err(StoreError::InUse(_))
    ));
    assert!(service.delete_category(category.id, true).is_ok());
}

#[test]
fn list_filters_sorts_and_pages() {
    let service = service();
    for name in ["beta", "Alpha", "gamma", "Alphabet"] {
        create(&service, name);
    }

    let page = service.list_categories(&CategoryListQuery {
        q: Some("ALPHA".to_string()),
        ..CategoryListQuery::default()
    });
    let names: Vec<&str> = page.content.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Alpha", "Alphabet"]);
    assert_eq!(page.sort, "name,asc");

    let page = service.list_categories(&CategoryListQuery {
        sort: Some("name,desc".to_string()),
        page: 1,
        size: Some(3),
        ..CategoryListQuery::default()
    });
    let names: Vec<&str> = page.content.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Alpha"]);
    assert_eq!(page.total_elements, 4);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.sort, "name,desc");
}
