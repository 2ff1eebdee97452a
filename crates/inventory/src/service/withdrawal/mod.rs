mod command;
mod query;

pub use self::command::{WithdrawalCommandService, WithdrawalCommandServiceDeps, merge_lines};
pub use self::query::WithdrawalQueryService;
