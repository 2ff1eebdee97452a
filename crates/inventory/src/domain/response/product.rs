use crate::{
    domain::status::{ProductStatus, needs_restock},
    model::product::Product as ProductModel,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct ProductResponse {
    pub id: i32,
    pub name: String,
    pub quantity: i32,
    pub status: ProductStatus,
    pub needs_restock: bool,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl From<ProductModel> for ProductResponse {
    fn from(value: ProductModel) -> Self {
        ProductResponse {
            id: value.id,
            name: value.name,
            quantity: value.quantity,
            status: ProductStatus::from_quantity(value.quantity),
            needs_restock: needs_restock(value.quantity),
            created_at: value.created_at.map(|dt| dt.to_string()),
            updated_at: value.updated_at.map(|dt| dt.to_string()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct BulkDeleteResponse {
    pub deleted: u64,
    pub ids: Vec<i32>,
}
