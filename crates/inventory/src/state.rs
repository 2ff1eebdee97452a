use crate::{
    abstract_trait::events::DynChangeFeed,
    di::{DependenciesInject, DependenciesInjectDeps, Repositories},
    events::BroadcastChangeFeed,
};
use anyhow::{Context, Result};
use prometheus_client::registry::Registry;
use shared::{
    abstract_trait::{DynHashing, DynJwtService, DynRateLimitMiddleware, DynSessionMiddleware},
    cache::{CacheStore, RateLimiter, SessionStore},
    config::{ConnectionPool, Hashing, JwtConfig, RedisPool},
    utils::{SystemMetrics, run_metrics_collector},
};
use std::{fmt, sync::Arc};

/// Everything needed to assemble an `AppState`, with storage and Redis
/// concerns already chosen by the caller.
pub struct AppStateParts {
    pub repositories: Repositories,
    pub cache_store: Arc<CacheStore>,
    pub hashing: DynHashing,
    pub jwt: DynJwtService,
    pub session: DynSessionMiddleware,
    pub rate_limit: DynRateLimitMiddleware,
    pub change_feed: DynChangeFeed,
}

#[derive(Clone)]
pub struct AppState {
    pub di_container: DependenciesInject,
    pub jwt_config: DynJwtService,
    pub session: DynSessionMiddleware,
    pub rate_limit: DynRateLimitMiddleware,
    pub change_feed: DynChangeFeed,
    pub registry: Arc<Registry>,
    pub system_metrics: Arc<SystemMetrics>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("di_container", &self.di_container)
            .field("jwt_config", &self.jwt_config)
            .field("registry", &self.registry)
            .field("system_metrics", &self.system_metrics)
            .finish()
    }
}

impl AppState {
    pub async fn new(pool: ConnectionPool, redis: RedisPool, jwt_secret: &str) -> Result<Self> {
        redis.ping().await.context("Failed to ping Redis server")?;

        let parts = AppStateParts {
            repositories: Repositories::postgres(pool),
            cache_store: Arc::new(CacheStore::new(redis.pool.clone())),
            hashing: Arc::new(Hashing::new()),
            jwt: Arc::new(JwtConfig::new(jwt_secret)),
            session: Arc::new(SessionStore::new(redis.pool.clone())),
            rate_limit: Arc::new(RateLimiter::new(redis.pool)),
            change_feed: Arc::new(BroadcastChangeFeed::default()),
        };

        let state = Self::from_parts(parts);

        tokio::spawn(run_metrics_collector(state.system_metrics.clone()));

        Ok(state)
    }

    pub fn from_parts(parts: AppStateParts) -> Self {
        let AppStateParts {
            repositories,
            cache_store,
            hashing,
            jwt,
            session,
            rate_limit,
            change_feed,
        } = parts;

        let mut registry = Registry::default();
        let system_metrics = Arc::new(SystemMetrics::new());

        let deps = DependenciesInjectDeps {
            repositories,
            cache_store,
            change_feed: change_feed.clone(),
            hashing,
            jwt: jwt.clone(),
            session: session.clone(),
            rate_limit: rate_limit.clone(),
        };

        let di_container = DependenciesInject::new(deps, &mut registry);

        registry.register_metrics(&system_metrics);

        Self {
            di_container,
            jwt_config: jwt,
            session,
            rate_limit,
            change_feed,
            registry: Arc::new(registry),
            system_metrics,
        }
    }
}

trait MetricsRegister {
    fn register_metrics(&mut self, metrics: &SystemMetrics);
}

impl MetricsRegister for Registry {
    fn register_metrics(&mut self, metrics: &SystemMetrics) {
        metrics.register(self);
    }
}
