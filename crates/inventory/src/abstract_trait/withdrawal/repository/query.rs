use crate::{
    domain::requests::withdrawal::FindWithdrawalHistory,
    model::withdrawal::WithdrawalHistory as WithdrawalHistoryModel,
};
use anyhow::Result;
use async_trait::async_trait;
use shared::errors::RepositoryError;
use std::sync::Arc;

pub type DynWithdrawalQueryRepository = Arc<dyn WithdrawalQueryRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait WithdrawalQueryRepositoryTrait {
    async fn find_history(
        &self,
        req: &FindWithdrawalHistory,
    ) -> Result<(Vec<WithdrawalHistoryModel>, i64), RepositoryError>;
    async fn find_recent(&self, limit: i64)
    -> Result<Vec<WithdrawalHistoryModel>, RepositoryError>;
    async fn find_for_export(
        &self,
        staff_id: Option<i32>,
    ) -> Result<Vec<WithdrawalHistoryModel>, RepositoryError>;
}
