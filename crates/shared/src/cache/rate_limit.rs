use crate::abstract_trait::RateLimitMiddlewareTrait;
use async_trait::async_trait;
use deadpool_redis::{Connection, Pool};
use std::sync::Arc;
use tracing::{debug, error};

#[derive(Clone)]
pub struct RateLimiter {
    pool: Arc<Pool>,
}

impl RateLimiter {
    pub fn new(pool: Pool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    async fn get_conn(&self) -> Option<Connection> {
        match self.pool.get().await {
            Ok(conn) => Some(conn),
            Err(e) => {
                error!("Failed to get Redis connection from pool: {:?}", e);
                None
            }
        }
    }
}

#[async_trait]
impl RateLimitMiddlewareTrait for RateLimiter {
    async fn check_rate_limit(
        &self,
        key: &str,
        max_requests: u32,
        window_seconds: u32,
    ) -> (bool, u32) {
        // An unreachable Redis lets the request through.
        let Some(mut conn) = self.get_conn().await else {
            return (true, 0);
        };

        let result: redis::RedisResult<(u32,)> = redis::pipe()
            .atomic()
            .cmd("INCR")
            .arg(key)
            .cmd("EXPIRE")
            .arg(key)
            .arg(window_seconds)
            .arg("NX")
            .ignore()
            .query_async(&mut conn)
            .await;

        match result {
            Ok((current,)) if current > max_requests => {
                debug!("Rate limit exceeded for key: {key}");
                (false, current)
            }
            Ok((current,)) => (true, current),
            Err(e) => {
                error!("Failed to update rate limit for {}: {:?}", key, e);
                (true, 0)
            }
        }
    }

    async fn current_count(&self, key: &str) -> u32 {
        let Some(mut conn) = self.get_conn().await else {
            return 0;
        };

        match redis::cmd("GET")
            .arg(key)
            .query_async::<Option<u32>>(&mut conn)
            .await
        {
            Ok(count) => count.unwrap_or(0),
            Err(e) => {
                error!("Failed to read rate limit for {}: {:?}", key, e);
                0
            }
        }
    }

    async fn reset_limit(&self, key: &str) -> bool {
        match self.get_conn().await {
            Some(mut conn) => redis::cmd("DEL")
                .arg(key)
                .query_async::<()>(&mut conn)
                .await
                .is_ok(),
            None => false,
        }
    }
}
