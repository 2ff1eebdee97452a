use crate::domain::status::StatusFilter;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema, IntoParams)]
pub struct FindAllProducts {
    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "Page must be at least 1"))]
    pub page: i32,

    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 100, message = "Page size must be between 1 and 100"))]
    pub page_size: i32,

    #[serde(default)]
    pub search: String,

    #[serde(default)]
    #[param(value_type = Option<String>, example = "Low Stock")]
    pub status: StatusFilter,
}

impl Default for FindAllProducts {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
            search: String::new(),
            status: StatusFilter::All,
        }
    }
}

fn default_page() -> i32 {
    1
}

fn default_page_size() -> i32 {
    25
}

/// Filters for the unpaginated inventory export.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, IntoParams)]
pub struct ProductFilter {
    #[serde(default)]
    pub search: String,

    #[serde(default)]
    #[param(value_type = Option<String>, example = "Available")]
    pub status: StatusFilter,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 255, message = "Product name is required"))]
    #[schema(example = "Nail polish remover")]
    pub name: String,

    #[serde(default)]
    #[validate(range(min = 0, message = "Quantity cannot be negative"))]
    #[schema(example = 12)]
    pub quantity: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateProductRequest {
    #[serde(default)]
    pub id: Option<i32>,

    #[validate(length(min = 1, max = 255, message = "Product name is required"))]
    #[schema(example = "Nail polish remover")]
    pub name: String,

    #[validate(range(min = 0, message = "Quantity cannot be negative"))]
    #[schema(example = 8)]
    pub quantity: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct BulkDeleteProductsRequest {
    #[validate(length(min = 1, message = "Select at least one product"))]
    pub ids: Vec<i32>,
}
