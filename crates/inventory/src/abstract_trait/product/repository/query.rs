use crate::{
    domain::{requests::product::FindAllProducts, status::StatusFilter},
    model::product::Product as ProductModel,
};
use anyhow::Result;
use async_trait::async_trait;
use shared::errors::RepositoryError;
use std::sync::Arc;

pub type DynProductQueryRepository = Arc<dyn ProductQueryRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait ProductQueryRepositoryTrait {
    async fn find_all(
        &self,
        req: &FindAllProducts,
    ) -> Result<(Vec<ProductModel>, i64), RepositoryError>;
    async fn find_filtered(
        &self,
        search: &str,
        status: StatusFilter,
    ) -> Result<Vec<ProductModel>, RepositoryError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<ProductModel>, RepositoryError>;
    /// Case-insensitive exact name match, optionally ignoring one product.
    async fn find_by_name(
        &self,
        name: &str,
        exclude_id: Option<i32>,
    ) -> Result<Option<ProductModel>, RepositoryError>;
    async fn find_low_stock(&self) -> Result<Vec<ProductModel>, RepositoryError>;
}
