use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Upper bound for a single line and for the merged total of one product.
pub const MAX_LINE_QUANTITY: i32 = 1_000_000;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct WithdrawalItemRequest {
    #[validate(range(min = 1, message = "Please select a product"))]
    pub product_id: i32,

    #[validate(range(
        min = 1,
        max = MAX_LINE_QUANTITY,
        message = "Quantity must be between 1 and 1000000"
    ))]
    #[schema(example = 1)]
    pub quantity: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateWithdrawalRequest {
    #[validate(required(message = "Please select a staff member"))]
    pub staff_id: Option<i32>,

    #[validate(
        length(min = 1, message = "Please add at least one product"),
        nested
    )]
    pub items: Vec<WithdrawalItemRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema, IntoParams)]
pub struct FindWithdrawalHistory {
    #[serde(default)]
    pub staff_id: Option<i32>,

    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "Page must be at least 1"))]
    pub page: i32,

    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 100, message = "Page size must be between 1 and 100"))]
    pub page_size: i32,
}

impl Default for FindWithdrawalHistory {
    fn default() -> Self {
        Self {
            staff_id: None,
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

fn default_page() -> i32 {
    1
}

fn default_page_size() -> i32 {
    50
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, IntoParams)]
pub struct WithdrawalHistoryFilter {
    #[serde(default)]
    pub staff_id: Option<i32>,
}
