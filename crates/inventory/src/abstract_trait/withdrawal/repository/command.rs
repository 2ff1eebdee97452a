use crate::model::withdrawal::{WithdrawalLine, WithdrawalOutcome};
use anyhow::Result;
use async_trait::async_trait;
use shared::errors::RepositoryError;
use std::sync::Arc;

pub type DynWithdrawalCommandRepository =
    Arc<dyn WithdrawalCommandRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait WithdrawalCommandRepositoryTrait {
    /// Records the withdrawal and decrements stock atomically. Fails with
    /// `NotFound` for a missing product and `Conflict` when stock is short;
    /// in both cases nothing is written.
    async fn create_withdrawal(
        &self,
        staff_id: i32,
        lines: &[WithdrawalLine],
    ) -> Result<WithdrawalOutcome, RepositoryError>;
}
