use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// At or below this quantity a product needs restocking.
pub const LOW_STOCK_THRESHOLD: i32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum ProductStatus {
    Available,
    #[serde(rename = "Low Stock")]
    LowStock,
    Unavailable,
}

impl ProductStatus {
    pub fn from_quantity(quantity: i32) -> Self {
        if quantity > LOW_STOCK_THRESHOLD {
            ProductStatus::Available
        } else if quantity > 0 {
            ProductStatus::LowStock
        } else {
            ProductStatus::Unavailable
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Available => "Available",
            ProductStatus::LowStock => "Low Stock",
            ProductStatus::Unavailable => "Unavailable",
        }
    }
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn needs_restock(quantity: i32) -> bool {
    quantity <= LOW_STOCK_THRESHOLD
}

/// Status filter accepted by listing and export endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum StatusFilter {
    #[default]
    All,
    Available,
    #[serde(rename = "Low Stock", alias = "LowStock", alias = "low_stock")]
    LowStock,
    Unavailable,
}

impl StatusFilter {
    pub fn as_status(&self) -> Option<ProductStatus> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Available => Some(ProductStatus::Available),
            StatusFilter::LowStock => Some(ProductStatus::LowStock),
            StatusFilter::Unavailable => Some(ProductStatus::Unavailable),
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.as_status().map_or("All", |s| s.as_str())
    }
}
