mod command;
mod query;

pub use self::command::{DynWithdrawalCommandService, WithdrawalCommandServiceTrait};
pub use self::query::{DynWithdrawalQueryService, WithdrawalQueryServiceTrait};
