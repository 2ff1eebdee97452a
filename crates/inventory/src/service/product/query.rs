use crate::{
    abstract_trait::product::{
        repository::DynProductQueryRepository, service::ProductQueryServiceTrait,
    },
    domain::{
        requests::product::{FindAllProducts, ProductFilter},
        response::{
            api::{ApiResponse, ApiResponsePagination},
            export::ExportFile,
            pagination::Pagination,
            product::ProductResponse,
        },
    },
    export::{inventory_csv, inventory_file_name},
};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use shared::{
    cache::CacheStore,
    errors::ServiceError,
    utils::{Method, Metrics, OperationTracer},
};
use std::sync::Arc;
use tracing::info;

const LIST_CACHE_TTL_MINUTES: i64 = 5;

#[derive(Clone)]
pub struct ProductQueryService {
    query: DynProductQueryRepository,
    cache_store: Arc<CacheStore>,
    tracer: OperationTracer,
}

impl ProductQueryService {
    pub fn new(
        query: DynProductQueryRepository,
        cache_store: Arc<CacheStore>,
        registry: &mut Registry,
    ) -> Self {
        let metrics = Metrics::new();
        metrics.register("product_query_service", "ProductQueryService", registry);

        Self {
            query,
            cache_store,
            tracer: OperationTracer::new("product-query-service", metrics),
        }
    }

    fn list_cache_key(req: &FindAllProducts) -> String {
        format!(
            "product:list:page:{}:size:{}:search:{}:status:{}",
            req.page,
            req.page_size,
            req.search.trim().to_lowercase(),
            req.status.as_str()
        )
    }
}

#[async_trait]
impl ProductQueryServiceTrait for ProductQueryService {
    async fn find_all(
        &self,
        req: &FindAllProducts,
    ) -> Result<ApiResponsePagination<Vec<ProductResponse>>, ServiceError> {
        info!(
            "🔍 Finding all products | Page: {}, Size: {}, Search: '{}', Status: {}",
            req.page,
            req.page_size,
            req.search,
            req.status.as_str()
        );

        let method = Method::Get;
        let tracing_ctx = self.tracer.start_tracing(
            "product_find_all",
            vec![
                KeyValue::new("component", "product"),
                KeyValue::new("operation", "find_all"),
                KeyValue::new("page", req.page.to_string()),
                KeyValue::new("page_size", req.page_size.to_string()),
                KeyValue::new("search", req.search.clone()),
                KeyValue::new("status", req.status.as_str()),
            ],
        );

        let cache_key = Self::list_cache_key(req);

        if let Some(cached) = self
            .cache_store
            .get_from_cache::<ApiResponsePagination<Vec<ProductResponse>>>(&cache_key)
            .await
        {
            info!("✅ Found {} products in cache", cached.data.len());
            self.tracer.complete_tracing_success(
                &tracing_ctx,
                method,
                "Products retrieved from cache",
            );
            return Ok(cached);
        }

        let (products, total) = match self.query.find_all(req).await {
            Ok(res) => res,
            Err(e) => {
                self.tracer.complete_tracing_error(
                    &tracing_ctx,
                    method,
                    "Failed to retrieve products",
                );
                return Err(ServiceError::Repo(e));
            }
        };

        info!("✅ Retrieved {} of {} products from DB", products.len(), total);

        let data: Vec<ProductResponse> = products.into_iter().map(ProductResponse::from).collect();
        let response = ApiResponsePagination::success(
            "Products retrieved successfully",
            data,
            Pagination::new(req.page, req.page_size, total),
        );

        self.cache_store
            .set_to_cache(
                &cache_key,
                &response,
                Duration::minutes(LIST_CACHE_TTL_MINUTES),
            )
            .await;

        self.tracer
            .complete_tracing_success(&tracing_ctx, method, "Products retrieved from DB");

        Ok(response)
    }

    async fn find_by_id(&self, id: i32) -> Result<ApiResponse<ProductResponse>, ServiceError> {
        let method = Method::Get;
        let tracing_ctx = self.tracer.start_tracing(
            "product_find_by_id",
            vec![
                KeyValue::new("component", "product"),
                KeyValue::new("product.id", id.to_string()),
            ],
        );

        match self.query.find_by_id(id).await {
            Ok(Some(product)) => {
                self.tracer
                    .complete_tracing_success(&tracing_ctx, method, "Product retrieved");
                Ok(ApiResponse::success(
                    "Product retrieved successfully",
                    ProductResponse::from(product),
                ))
            }
            Ok(None) => {
                self.tracer
                    .complete_tracing_error(&tracing_ctx, method, "Product not found");
                Err(ServiceError::NotFound("Product not found".into()))
            }
            Err(e) => {
                self.tracer
                    .complete_tracing_error(&tracing_ctx, method, "Failed to fetch product");
                Err(ServiceError::Repo(e))
            }
        }
    }

    async fn find_low_stock(&self) -> Result<ApiResponse<Vec<ProductResponse>>, ServiceError> {
        let method = Method::Get;
        let tracing_ctx = self.tracer.start_tracing(
            "product_find_low_stock",
            vec![KeyValue::new("component", "product")],
        );

        match self.query.find_low_stock().await {
            Ok(products) => {
                info!("⚠️ {} products need restocking", products.len());
                self.tracer.complete_tracing_success(
                    &tracing_ctx,
                    method,
                    "Low stock products retrieved",
                );
                let data = products.into_iter().map(ProductResponse::from).collect();
                Ok(ApiResponse::success(
                    "Low stock products retrieved successfully",
                    data,
                ))
            }
            Err(e) => {
                self.tracer.complete_tracing_error(
                    &tracing_ctx,
                    method,
                    "Failed to fetch low stock products",
                );
                Err(ServiceError::Repo(e))
            }
        }
    }

    async fn export_csv(&self, filter: &ProductFilter) -> Result<ExportFile, ServiceError> {
        let method = Method::Get;
        let tracing_ctx = self.tracer.start_tracing(
            "product_export",
            vec![
                KeyValue::new("component", "product"),
                KeyValue::new("search", filter.search.clone()),
                KeyValue::new("status", filter.status.as_str()),
            ],
        );

        let products = match self.query.find_filtered(&filter.search, filter.status).await {
            Ok(products) => products,
            Err(e) => {
                self.tracer.complete_tracing_error(
                    &tracing_ctx,
                    method,
                    "Failed to fetch products for export",
                );
                return Err(ServiceError::Repo(e));
            }
        };

        if products.is_empty() {
            self.tracer
                .complete_tracing_error(&tracing_ctx, method, "No products to export");
            return Err(ServiceError::validation("No products to export"));
        }

        let rows: Vec<ProductResponse> = products.into_iter().map(ProductResponse::from).collect();
        let file = ExportFile::csv(
            inventory_file_name(&Utc::now().naive_utc()),
            inventory_csv(&rows),
        );

        info!("📄 Exported {} products to {}", rows.len(), file.file_name);
        self.tracer
            .complete_tracing_success(&tracing_ctx, method, "Inventory exported");

        Ok(file)
    }
}
