pub mod api;
pub mod metrics;
pub mod retry;

pub use api::{ApiClient, HealthStatus};
pub use metrics::{ApiMetrics, EndpointMetrics, MetricsCollector, RequestMetrics};
pub use retry::{RetryConfig, RetryExecutor, RetryMetrics};
