use anyhow::{Context, Result};
use inventory::{handler::AppRouter, state::AppState};
use shared::{
    config::{Config, ConnectionManager, RedisPool},
    utils::{Telemetry, init_logger},
};
use sqlx::{Pool, Postgres};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let config = Config::init().context("Failed to load configuration")?;

    let telemetry = Telemetry::init("inventory-service", &config.otel_endpoint)
        .context("Failed to initialize telemetry")?;

    let _log_guard = init_logger(
        telemetry.logger_provider(),
        "inventory-service",
        config.is_dev,
        config.is_enable_file,
    );

    info!("🚀 Starting Inventory Service initialization...");

    let db_pool =
        ConnectionManager::new_pool(&config.database_url, config.db_min_conn, config.db_max_conn)
            .await
            .context("Failed to initialize database pool")?;

    if config.run_migrations {
        run_migrations(&db_pool)
            .await
            .context("Failed to run database migrations")?;
        info!("✅ Database migrations applied");
    }

    let redis = RedisPool::new(&config.redis).context("Failed to create Redis pool")?;

    let state = AppState::new(db_pool, redis, &config.jwt_secret)
        .await
        .context("Failed to create AppState")?;

    if let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) {
        state
            .di_container
            .auth_service
            .ensure_admin(email, password)
            .await
            .context("Failed to bootstrap admin account")?;
    }

    info!("✅ Application setup completed successfully.");

    let result = AppRouter::serve(config.port, state).await;

    if let Err(e) = telemetry.shutdown() {
        error!("Failed to shutdown telemetry: {e}");
    }

    info!("✅ Inventory Service shutdown complete.");
    result
}

pub async fn run_migrations(pool: &Pool<Postgres>) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
