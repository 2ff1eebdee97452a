use crate::{domain::status::ProductStatus, model::product::Product as ProductModel};
use anyhow::Result;
use async_trait::async_trait;
use shared::errors::RepositoryError;
use std::sync::Arc;

pub type DynProductCommandRepository = Arc<dyn ProductCommandRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait ProductCommandRepositoryTrait {
    async fn create_product(
        &self,
        name: &str,
        quantity: i32,
        status: ProductStatus,
    ) -> Result<ProductModel, RepositoryError>;
    async fn update_product(
        &self,
        id: i32,
        name: &str,
        quantity: i32,
        status: ProductStatus,
    ) -> Result<ProductModel, RepositoryError>;
    async fn delete_product(&self, id: i32) -> Result<(), RepositoryError>;
    /// Returns the ids that were actually deleted.
    async fn delete_products(&self, ids: &[i32]) -> Result<Vec<i32>, RepositoryError>;
}
