use crate::domain::{
    requests::withdrawal::CreateWithdrawalRequest,
    response::{api::ApiResponse, withdrawal::WithdrawalResponse},
};
use anyhow::Result;
use async_trait::async_trait;
use shared::errors::ServiceError;
use std::sync::Arc;

pub type DynWithdrawalCommandService = Arc<dyn WithdrawalCommandServiceTrait + Send + Sync>;

#[async_trait]
pub trait WithdrawalCommandServiceTrait {
    async fn create_withdrawal(
        &self,
        req: &CreateWithdrawalRequest,
    ) -> Result<ApiResponse<WithdrawalResponse>, ServiceError>;
}
