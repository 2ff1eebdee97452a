use async_trait::async_trait;
use std::sync::Arc;

pub type DynRateLimitMiddleware = Arc<dyn RateLimitMiddlewareTrait + Send + Sync>;

#[async_trait]
pub trait RateLimitMiddlewareTrait {
    /// Counts one hit against `key` and reports whether it is still within
    /// `max_requests` for the window, together with the current count.
    async fn check_rate_limit(&self, key: &str, max_requests: u32, window_seconds: u32)
    -> (bool, u32);
    /// Current count for `key` without counting a hit.
    async fn current_count(&self, key: &str) -> u32;
    async fn reset_limit(&self, key: &str) -> bool;
}
