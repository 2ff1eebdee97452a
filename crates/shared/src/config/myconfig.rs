use crate::config::RedisConfig;
use anyhow::{Context, Result, anyhow};

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub run_migrations: bool,
    pub port: u16,
    pub db_min_conn: u32,
    pub db_max_conn: u32,
    pub redis: RedisConfig,
    pub otel_endpoint: String,
    pub is_dev: bool,
    pub is_enable_file: bool,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("run_migrations", &self.run_migrations)
            .field("port", &self.port)
            .field("db_min_conn", &self.db_min_conn)
            .field("db_max_conn", &self.db_max_conn)
            .field("redis_host", &self.redis.host)
            .field("otel_endpoint", &self.otel_endpoint)
            .field("is_dev", &self.is_dev)
            .field("admin_email", &self.admin_email)
            .finish()
    }
}

impl Config {
    pub fn init() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String> {
            lookup(key).with_context(|| format!("Missing environment variable: {key}"))
        };
        let flag = |key: &str| {
            lookup(key)
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false)
        };

        let database_url = required("DATABASE_URL")?;
        let jwt_secret = required("JWT_SECRET")?;
        let run_migrations_str = required("RUN_MIGRATIONS")?;
        let port_str = required("PORT")?;

        let run_migrations = match run_migrations_str.as_str() {
            "true" => true,
            "false" => false,
            other => {
                return Err(anyhow!(
                    "RUN_MIGRATIONS must be 'true' or 'false', got '{}'",
                    other
                ));
            }
        };

        let port = port_str
            .parse::<u16>()
            .context("PORT must be a valid u16 integer")?;

        let db_min_conn = lookup("DB_MIN_CONN")
            .unwrap_or_else(|| "1".to_string())
            .parse::<u32>()
            .context("DB_MIN_CONN must be a valid u32 integer")?;

        let db_max_conn = lookup("DB_MAX_CONN")
            .unwrap_or_else(|| "5".to_string())
            .parse::<u32>()
            .context("DB_MAX_CONN must be a valid u32 integer")?;

        if db_min_conn > db_max_conn {
            return Err(anyhow!(
                "DB_MIN_CONN ({}) must not exceed DB_MAX_CONN ({})",
                db_min_conn,
                db_max_conn
            ));
        }

        let redis_host = lookup("REDIS_HOST").unwrap_or_else(|| "redis".to_string());
        let redis_port = lookup("REDIS_PORT")
            .unwrap_or_else(|| "6379".to_string())
            .parse::<u16>()
            .context("REDIS_PORT must be a valid u16 integer")?;
        let redis_db = lookup("REDIS_DB")
            .unwrap_or_else(|| "0".to_string())
            .parse::<u8>()
            .context("REDIS_DB must be a valid u8 integer")?;
        let redis_password = lookup("REDIS_PASSWORD").filter(|pw| !pw.is_empty());

        let otel_endpoint =
            lookup("OTEL_ENDPOINT").unwrap_or_else(|| "http://otel-collector:4317".to_string());

        let admin_email = lookup("ADMIN_EMAIL").filter(|v| !v.trim().is_empty());
        let admin_password = lookup("ADMIN_PASSWORD").filter(|v| !v.is_empty());

        Ok(Self {
            database_url,
            jwt_secret,
            run_migrations,
            port,
            db_min_conn,
            db_max_conn,
            redis: RedisConfig::new(redis_host, redis_port, redis_db, redis_password),
            otel_endpoint,
            is_dev: flag("DEV_MODE"),
            is_enable_file: flag("ENABLE_FILE_LOG"),
            admin_email,
            admin_password,
        })
    }
}
