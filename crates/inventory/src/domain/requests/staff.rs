use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateStaffRequest {
    #[validate(length(min = 1, max = 100, message = "Staff name must be 1 to 100 characters"))]
    #[schema(example = "Alex")]
    pub name: String,
}
