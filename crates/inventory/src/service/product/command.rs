use crate::{
    abstract_trait::{
        events::DynChangeFeed,
        product::{
            repository::{DynProductCommandRepository, DynProductQueryRepository},
            service::ProductCommandServiceTrait,
        },
    },
    domain::{
        event::{ChangeEvent, ChangeOp},
        requests::product::{BulkDeleteProductsRequest, CreateProductRequest, UpdateProductRequest},
        response::{
            api::ApiResponse,
            product::{BulkDeleteResponse, ProductResponse},
        },
        status::ProductStatus,
    },
    service::product::PRODUCT_LIST_CACHE_PATTERN,
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use shared::{
    cache::CacheStore,
    errors::{RepositoryError, ServiceError},
    utils::{Method, Metrics, OperationTracer},
};
use std::sync::Arc;
use tracing::{info, warn};

const DUPLICATE_PRODUCT: &str = "This product already exists";

pub struct ProductCommandServiceDeps {
    pub query: DynProductQueryRepository,
    pub command: DynProductCommandRepository,
    pub cache_store: Arc<CacheStore>,
    pub change_feed: DynChangeFeed,
}

#[derive(Clone)]
pub struct ProductCommandService {
    query: DynProductQueryRepository,
    command: DynProductCommandRepository,
    cache_store: Arc<CacheStore>,
    change_feed: DynChangeFeed,
    tracer: OperationTracer,
}

impl ProductCommandService {
    pub fn new(deps: ProductCommandServiceDeps, registry: &mut Registry) -> Self {
        let ProductCommandServiceDeps {
            query,
            command,
            cache_store,
            change_feed,
        } = deps;

        let metrics = Metrics::new();
        metrics.register("product_command_service", "ProductCommandService", registry);

        Self {
            query,
            command,
            cache_store,
            change_feed,
            tracer: OperationTracer::new("product-command-service", metrics),
        }
    }

    fn normalize_name(name: &str) -> Result<&str, ServiceError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ServiceError::validation("Product name is required"));
        }
        Ok(trimmed)
    }

    async fn ensure_unique_name(
        &self,
        name: &str,
        exclude_id: Option<i32>,
    ) -> Result<(), ServiceError> {
        if self.query.find_by_name(name, exclude_id).await?.is_some() {
            return Err(ServiceError::Repo(RepositoryError::AlreadyExists(
                DUPLICATE_PRODUCT.into(),
            )));
        }
        Ok(())
    }

    /// Clears cached listings and tells subscribers what changed.
    async fn after_write(&self, op: ChangeOp, product_ids: &[i32]) {
        self.cache_store
            .delete_by_pattern(PRODUCT_LIST_CACHE_PATTERN)
            .await;

        for &product_id in product_ids {
            self.change_feed
                .publish(ChangeEvent::ProductChanged { op, product_id });
        }
    }
}

/// A unique index backs the name check, so a concurrent insert still
/// surfaces as the same conflict.
fn duplicate_as_conflict(err: RepositoryError) -> ServiceError {
    match err {
        RepositoryError::AlreadyExists(_) => {
            ServiceError::Repo(RepositoryError::AlreadyExists(DUPLICATE_PRODUCT.into()))
        }
        other => ServiceError::Repo(other),
    }
}

#[async_trait]
impl ProductCommandServiceTrait for ProductCommandService {
    async fn create_product(
        &self,
        req: &CreateProductRequest,
    ) -> Result<ApiResponse<ProductResponse>, ServiceError> {
        let name = Self::normalize_name(&req.name)?;
        if req.quantity < 0 {
            return Err(ServiceError::validation("Quantity cannot be negative"));
        }

        info!("🆕 Creating product: {name} (qty {})", req.quantity);

        let method = Method::Post;
        let tracing_ctx = self.tracer.start_tracing(
            "CreateProduct",
            vec![
                KeyValue::new("component", "product"),
                KeyValue::new("product.name", name.to_string()),
                KeyValue::new("product.quantity", req.quantity.to_string()),
            ],
        );

        if let Err(e) = self.ensure_unique_name(name, None).await {
            self.tracer
                .complete_tracing_error(&tracing_ctx, method, DUPLICATE_PRODUCT);
            return Err(e);
        }

        let status = ProductStatus::from_quantity(req.quantity);
        let product = match self.command.create_product(name, req.quantity, status).await {
            Ok(product) => product,
            Err(e) => {
                self.tracer
                    .complete_tracing_error(&tracing_ctx, method, "Failed to create product");
                return Err(duplicate_as_conflict(e));
            }
        };

        self.after_write(ChangeOp::Insert, &[product.id]).await;
        self.tracer
            .complete_tracing_success(&tracing_ctx, method, "Product created");

        Ok(ApiResponse::success(
            "Product created successfully",
            ProductResponse::from(product),
        ))
    }

    async fn update_product(
        &self,
        req: &UpdateProductRequest,
    ) -> Result<ApiResponse<ProductResponse>, ServiceError> {
        let id = req
            .id
            .ok_or_else(|| ServiceError::validation("Product id is required"))?;
        let name = Self::normalize_name(&req.name)?;
        if req.quantity < 0 {
            return Err(ServiceError::validation("Quantity cannot be negative"));
        }

        info!("✏️ Updating product ID {id}: {name} (qty {})", req.quantity);

        let method = Method::Put;
        let tracing_ctx = self.tracer.start_tracing(
            "UpdateProduct",
            vec![
                KeyValue::new("component", "product"),
                KeyValue::new("product.id", id.to_string()),
                KeyValue::new("product.quantity", req.quantity.to_string()),
            ],
        );

        match self.query.find_by_id(id).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                self.tracer
                    .complete_tracing_error(&tracing_ctx, method, "Product not found");
                return Err(ServiceError::NotFound("Product not found".into()));
            }
            Err(e) => {
                self.tracer
                    .complete_tracing_error(&tracing_ctx, method, "Failed to fetch product");
                return Err(ServiceError::Repo(e));
            }
        }

        if let Err(e) = self.ensure_unique_name(name, Some(id)).await {
            self.tracer
                .complete_tracing_error(&tracing_ctx, method, DUPLICATE_PRODUCT);
            return Err(e);
        }

        let status = ProductStatus::from_quantity(req.quantity);
        let product = match self
            .command
            .update_product(id, name, req.quantity, status)
            .await
        {
            Ok(product) => product,
            Err(RepositoryError::NotFound) => {
                self.tracer
                    .complete_tracing_error(&tracing_ctx, method, "Product not found");
                return Err(ServiceError::NotFound("Product not found".into()));
            }
            Err(e) => {
                self.tracer
                    .complete_tracing_error(&tracing_ctx, method, "Failed to update product");
                return Err(duplicate_as_conflict(e));
            }
        };

        self.after_write(ChangeOp::Update, &[product.id]).await;
        self.tracer
            .complete_tracing_success(&tracing_ctx, method, "Product updated");

        Ok(ApiResponse::success(
            "Product updated successfully",
            ProductResponse::from(product),
        ))
    }

    async fn delete_product(&self, id: i32) -> Result<ApiResponse<()>, ServiceError> {
        let method = Method::Delete;
        let tracing_ctx = self.tracer.start_tracing(
            "DeleteProduct",
            vec![
                KeyValue::new("component", "product"),
                KeyValue::new("product.id", id.to_string()),
            ],
        );

        match self.command.delete_product(id).await {
            Ok(()) => {}
            Err(RepositoryError::NotFound) => {
                self.tracer
                    .complete_tracing_error(&tracing_ctx, method, "Product not found");
                return Err(ServiceError::NotFound("Product not found".into()));
            }
            Err(e) => {
                self.tracer
                    .complete_tracing_error(&tracing_ctx, method, "Failed to delete product");
                return Err(ServiceError::Repo(e));
            }
        }

        self.after_write(ChangeOp::Delete, &[id]).await;
        self.tracer
            .complete_tracing_success(&tracing_ctx, method, "Product deleted");

        Ok(ApiResponse::success("Product deleted successfully", ()))
    }

    async fn delete_products(
        &self,
        req: &BulkDeleteProductsRequest,
    ) -> Result<ApiResponse<BulkDeleteResponse>, ServiceError> {
        if req.ids.is_empty() {
            return Err(ServiceError::validation("Select at least one product"));
        }

        let mut ids = req.ids.clone();
        ids.sort_unstable();
        ids.dedup();

        let method = Method::Delete;
        let tracing_ctx = self.tracer.start_tracing(
            "BulkDeleteProducts",
            vec![
                KeyValue::new("component", "product"),
                KeyValue::new("product.count", ids.len().to_string()),
            ],
        );

        let deleted = match self.command.delete_products(&ids).await {
            Ok(deleted) => deleted,
            Err(e) => {
                self.tracer
                    .complete_tracing_error(&tracing_ctx, method, "Failed to delete products");
                return Err(ServiceError::Repo(e));
            }
        };

        if deleted.len() < ids.len() {
            warn!(
                "⚠️ {} of {} requested products did not exist",
                ids.len() - deleted.len(),
                ids.len()
            );
        }

        self.after_write(ChangeOp::Delete, &deleted).await;
        self.tracer
            .complete_tracing_success(&tracing_ctx, method, "Products deleted");

        Ok(ApiResponse::success(
            format!("{} product(s) deleted", deleted.len()),
            BulkDeleteResponse {
                deleted: deleted.len() as u64,
                ids: deleted,
            },
        ))
    }
}
