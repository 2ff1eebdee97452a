mod cache_store;
mod rate_limit;
mod session;

pub use self::cache_store::CacheStore;
pub use self::rate_limit::RateLimiter;
pub use self::session::{Session, SessionStore};
