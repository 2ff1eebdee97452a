mod command;
mod query;

pub use self::command::{ProductCommandService, ProductCommandServiceDeps};
pub use self::query::ProductQueryService;

/// Every cached product listing lives under this prefix.
pub(crate) const PRODUCT_LIST_CACHE_PATTERN: &str = "product:list:*";
