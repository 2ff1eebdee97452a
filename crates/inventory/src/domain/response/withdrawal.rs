use crate::{
    domain::response::product::ProductResponse,
    model::withdrawal::WithdrawalHistory as WithdrawalHistoryModel,
};
use serde::{Deserialize, Serialize};
use shared::utils::format_datetime;
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct WithdrawalHistoryResponse {
    pub withdrawal_id: i32,
    pub created_at: String,
    pub staff_id: i32,
    pub staff_name: String,
    pub product_id: Option<i32>,
    pub product_name: String,
    pub product_status: Option<String>,
    pub quantity: i32,
}

impl From<WithdrawalHistoryModel> for WithdrawalHistoryResponse {
    fn from(value: WithdrawalHistoryModel) -> Self {
        WithdrawalHistoryResponse {
            withdrawal_id: value.withdrawal_id,
            created_at: format_datetime(&value.created_at),
            staff_id: value.staff_id,
            staff_name: value.staff_name,
            product_id: value.product_id,
            product_name: value.product_name,
            product_status: value.product_status,
            quantity: value.quantity,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct WithdrawalResponse {
    pub withdrawal_id: i32,
    pub items: Vec<WithdrawalHistoryResponse>,
    pub products: Vec<ProductResponse>,
}
