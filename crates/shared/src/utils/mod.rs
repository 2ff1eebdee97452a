mod datetime;
mod gracefulshutdown;
mod logs;
mod metrics;
mod otel;

pub use self::datetime::{format_datetime, format_file_timestamp};
pub use self::gracefulshutdown::shutdown_signal;
pub use self::logs::init_logger;
pub use self::metrics::{Method, Metrics, Status, SystemMetrics, run_metrics_collector};
pub use self::otel::{OperationTracer, Telemetry, TracingContext};
