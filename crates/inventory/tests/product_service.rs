#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::TestApp;
use inventory::{
    abstract_trait::product::service::{ProductCommandServiceTrait, ProductQueryServiceTrait},
    domain::{
        event::{ChangeEvent, ChangeOp},
        requests::product::{
            BulkDeleteProductsRequest, CreateProductRequest, FindAllProducts, ProductFilter,
            UpdateProductRequest,
        },
        status::{ProductStatus, StatusFilter},
    },
};
use shared::errors::{RepositoryError, ServiceError};

fn create(name: &str, quantity: i32) -> CreateProductRequest {
    CreateProductRequest {
        name: name.into(),
        quantity,
    }
}

fn update(id: i32, name: &str, quantity: i32) -> UpdateProductRequest {
    UpdateProductRequest {
        id: Some(id),
        name: name.into(),
        quantity,
    }
}

fn is_duplicate(err: &ServiceError) -> bool {
    matches!(
        err,
        ServiceError::Repo(RepositoryError::AlreadyExists(msg)) if msg == "This product already exists"
    )
}

#[tokio::test]
async fn create_trims_name_and_derives_status() {
    let app = TestApp::new().await;
    let service = &app.state.di_container.product_command;

    let created = service
        .create_product(&create("  Cotton pads  ", 2))
        .await
        .unwrap()
        .data;

    assert_eq!(created.name, "Cotton pads");
    assert_eq!(created.status, ProductStatus::LowStock);
    assert!(created.needs_restock);
    assert_eq!(app.db.product(created.id).unwrap().status, "Low Stock");
}

#[tokio::test]
async fn blank_name_is_rejected() {
    let app = TestApp::new().await;

    let err = app
        .state
        .di_container
        .product_command
        .create_product(&create("   ", 5))
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::Validation(ref m) if m[0] == "Product name is required"));
}

#[tokio::test]
async fn duplicate_names_are_case_insensitive() {
    let app = TestApp::new().await;
    let service = &app.state.di_container.product_command;
    service.create_product(&create("Acetone", 10)).await.unwrap();

    let err = service
        .create_product(&create(" acetone ", 1))
        .await
        .unwrap_err();

    assert!(is_duplicate(&err));
}

#[tokio::test]
async fn update_recomputes_status_and_allows_own_name() {
    let app = TestApp::new().await;
    let product = app.seed_product("Gel base", 10).await;

    let updated = app
        .state
        .di_container
        .product_command
        .update_product(&update(product.id, "GEL BASE", 0))
        .await
        .unwrap()
        .data;

    assert_eq!(updated.name, "GEL BASE");
    assert_eq!(updated.status, ProductStatus::Unavailable);
}

#[tokio::test]
async fn update_to_another_products_name_conflicts() {
    let app = TestApp::new().await;
    app.seed_product("Gel base", 10).await;
    let top = app.seed_product("Top coat", 10).await;

    let err = app
        .state
        .di_container
        .product_command
        .update_product(&update(top.id, "gel base", 4))
        .await
        .unwrap_err();

    assert!(is_duplicate(&err));
    assert_eq!(app.db.product(top.id).unwrap().name, "Top coat");
}

#[tokio::test]
async fn update_and_delete_of_missing_product_are_not_found() {
    let app = TestApp::new().await;
    let service = &app.state.di_container.product_command;

    let err = service
        .update_product(&update(999, "Ghost", 1))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));

    let err = service.delete_product(999).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn bulk_delete_reports_only_existing_ids() {
    let app = TestApp::new().await;
    let a = app.seed_product("Files", 3).await;
    let b = app.seed_product("Buffers", 3).await;
    let keep = app.seed_product("Wipes", 3).await;

    let result = app
        .state
        .di_container
        .product_command
        .delete_products(&BulkDeleteProductsRequest {
            ids: vec![b.id, a.id, a.id, 4242],
        })
        .await
        .unwrap()
        .data;

    assert_eq!(result.deleted, 2);
    assert!(app.db.product(a.id).is_none());
    assert!(app.db.product(b.id).is_none());
    assert!(app.db.product(keep.id).is_some());
}

#[tokio::test]
async fn bulk_delete_requires_ids() {
    let app = TestApp::new().await;

    let err = app
        .state
        .di_container
        .product_command
        .delete_products(&BulkDeleteProductsRequest { ids: vec![] })
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::Validation(_)));
}

#[tokio::test]
async fn writes_publish_product_events() {
    let app = TestApp::new().await;
    let mut rx = inventory::abstract_trait::events::ChangeFeedTrait::subscribe(app.feed.as_ref());
    let service = &app.state.di_container.product_command;

    let product = service.create_product(&create("Towels", 8)).await.unwrap().data;
    service.delete_product(product.id).await.unwrap();

    assert_eq!(
        rx.recv().await.unwrap(),
        ChangeEvent::ProductChanged {
            op: ChangeOp::Insert,
            product_id: product.id
        }
    );
    assert_eq!(
        rx.recv().await.unwrap(),
        ChangeEvent::ProductChanged {
            op: ChangeOp::Delete,
            product_id: product.id
        }
    );
}

#[tokio::test]
async fn listing_searches_filters_and_paginates() {
    let app = TestApp::new().await;
    app.seed_product("nail file", 10).await;
    app.seed_product("Nail polish", 2).await;
    app.seed_product("Cuticle oil", 0).await;
    app.seed_product("Nail glue", 1).await;
    let service = &app.state.di_container.product_query;

    let page = service
        .find_all(&FindAllProducts {
            search: "NAIL".into(),
            page_size: 2,
            ..Default::default()
        })
        .await
        .unwrap();
    let names: Vec<_> = page.data.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["nail file", "Nail glue"]);
    assert_eq!(page.pagination.total_items, 3);
    assert_eq!(page.pagination.total_pages, 2);

    let low = service
        .find_all(&FindAllProducts {
            status: StatusFilter::LowStock,
            ..Default::default()
        })
        .await
        .unwrap();
    let names: Vec<_> = low.data.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Nail glue", "Nail polish"]);
}

#[tokio::test]
async fn page_past_the_end_keeps_totals() {
    let app = TestApp::new().await;
    app.seed_product("Buffer", 10).await;
    app.seed_product("Top coat", 10).await;
    app.seed_product("Base coat", 10).await;

    let page = app
        .state
        .di_container
        .product_query
        .find_all(&FindAllProducts {
            page: 5,
            page_size: 2,
            ..Default::default()
        })
        .await
        .unwrap();

    assert!(page.data.is_empty());
    assert_eq!(page.pagination.page, 5);
    assert_eq!(page.pagination.total_items, 3);
    assert_eq!(page.pagination.total_pages, 2);
}

#[tokio::test]
async fn low_stock_is_ordered_by_quantity() {
    let app = TestApp::new().await;
    app.seed_product("Plenty", 20).await;
    app.seed_product("Few", 3).await;
    app.seed_product("None", 0).await;

    let low = app
        .state
        .di_container
        .product_query
        .find_low_stock()
        .await
        .unwrap()
        .data;

    let names: Vec<_> = low.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["None", "Few"]);
}

#[tokio::test]
async fn find_by_id_of_missing_product_is_not_found() {
    let app = TestApp::new().await;

    let err = app
        .state
        .di_container
        .product_query
        .find_by_id(77)
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::NotFound(ref m) if m == "Product not found"));
}

#[tokio::test]
async fn export_writes_filtered_csv() {
    let app = TestApp::new().await;
    app.seed_product("Cotton \"soft\" pads", 12).await;
    app.seed_product("Remover", 1).await;

    let file = app
        .state
        .di_container
        .product_query
        .export_csv(&ProductFilter {
            search: "cotton".into(),
            status: StatusFilter::All,
        })
        .await
        .unwrap();

    let text = String::from_utf8(file.bytes).unwrap();
    assert!(file.file_name.starts_with("inventory_"));
    assert!(file.file_name.ends_with(".csv"));
    assert!(text.starts_with("\u{feff}ID,Name,Quantity,Status\r\n"));
    assert!(text.contains("\"Cotton \"\"soft\"\" pads\",\"12\",\"Available\""));
    assert!(!text.contains("Remover"));
}

#[tokio::test]
async fn export_with_no_matches_is_rejected() {
    let app = TestApp::new().await;

    let err = app
        .state
        .di_container
        .product_query
        .export_csv(&ProductFilter::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::Validation(ref m) if m[0] == "No products to export"));
}
