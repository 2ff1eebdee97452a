use crate::domain::{
    requests::product::{FindAllProducts, ProductFilter},
    response::{
        api::{ApiResponse, ApiResponsePagination},
        export::ExportFile,
        product::ProductResponse,
    },
};
use anyhow::Result;
use async_trait::async_trait;
use shared::errors::ServiceError;
use std::sync::Arc;

pub type DynProductQueryService = Arc<dyn ProductQueryServiceTrait + Send + Sync>;

#[async_trait]
pub trait ProductQueryServiceTrait {
    async fn find_all(
        &self,
        req: &FindAllProducts,
    ) -> Result<ApiResponsePagination<Vec<ProductResponse>>, ServiceError>;
    async fn find_by_id(&self, id: i32) -> Result<ApiResponse<ProductResponse>, ServiceError>;
    async fn find_low_stock(&self) -> Result<ApiResponse<Vec<ProductResponse>>, ServiceError>;
    async fn export_csv(&self, filter: &ProductFilter) -> Result<ExportFile, ServiceError>;
}
