use crate::domain::{
    requests::withdrawal::{FindWithdrawalHistory, WithdrawalHistoryFilter},
    response::{
        api::{ApiResponse, ApiResponsePagination},
        export::ExportFile,
        withdrawal::WithdrawalHistoryResponse,
    },
};
use anyhow::Result;
use async_trait::async_trait;
use shared::errors::ServiceError;
use std::sync::Arc;

pub type DynWithdrawalQueryService = Arc<dyn WithdrawalQueryServiceTrait + Send + Sync>;

#[async_trait]
pub trait WithdrawalQueryServiceTrait {
    async fn find_history(
        &self,
        req: &FindWithdrawalHistory,
    ) -> Result<ApiResponsePagination<Vec<WithdrawalHistoryResponse>>, ServiceError>;
    async fn find_recent(
        &self,
        limit: i64,
    ) -> Result<ApiResponse<Vec<WithdrawalHistoryResponse>>, ServiceError>;
    async fn export_xlsx(
        &self,
        filter: &WithdrawalHistoryFilter,
    ) -> Result<ExportFile, ServiceError>;
}
