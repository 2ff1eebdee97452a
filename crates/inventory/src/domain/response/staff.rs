use crate::model::staff::Staff as StaffModel;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StaffResponse {
    pub id: i32,
    pub name: String,
}

impl From<StaffModel> for StaffResponse {
    fn from(value: StaffModel) -> Self {
        StaffResponse {
            id: value.id,
            name: value.name,
        }
    }
}
