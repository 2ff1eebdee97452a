use crate::domain::response::{product::ProductResponse, withdrawal::WithdrawalHistoryResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct DashboardResponse {
    pub low_stock: Vec<ProductResponse>,
    pub recent_withdrawals: Vec<WithdrawalHistoryResponse>,
}
