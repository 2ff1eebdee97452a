mod command;
mod query;

pub use self::command::{DynWithdrawalCommandRepository, WithdrawalCommandRepositoryTrait};
pub use self::query::{DynWithdrawalQueryRepository, WithdrawalQueryRepositoryTrait};
