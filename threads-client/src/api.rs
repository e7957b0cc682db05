use crate::metrics::{ApiMetrics, MetricsCollector, RequestMetrics};
use crate::retry::{RetryConfig, RetryExecutor, RetryMetrics};
use async_trait::async_trait;
use fortune_core::{
    AnalyticsSummary, ApiConfig, CoreError, DashboardGateway, ErrorExt, GatewayError,
    GeneratedPortrait, Post, ReadingGateway,
};
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};
use url::Url;

pub const POSTS_ENDPOINT: &str = "/api/posts";
pub const ANALYTICS_ENDPOINT: &str = "/api/analytics";
pub const SYNC_ENDPOINT: &str = "/api/sync";
pub const ANALYZE_ENDPOINT: &str = "/api/analyze";
pub const GENERATE_PORTRAIT_ENDPOINT: &str = "/api/generate-portrait";
pub const HEALTH_ENDPOINT: &str = "/health";

const USER_AGENT: &str = concat!("threads-fortune/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy") || self.status.eq_ignore_ascii_case("ok")
    }
}

#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    post_ids: &'a [String],
}

/// HTTP client for the fortune API server.
///
/// Reads (`GET`) go through a [`RetryExecutor`]; writes are sent once.
#[derive(Debug)]
pub struct ApiClient {
    http_client: Client,
    base_url: Url,
    metrics: Arc<MetricsCollector>,
    read_retry: RetryExecutor,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, CoreError> {
        let base_url = config.parsed_base_url()?;

        let http_client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout())
            .build()?;

        info!(
            "API client targeting {} (timeout {:?})",
            base_url,
            config.timeout()
        );

        Ok(Self {
            http_client,
            base_url,
            metrics: Arc::new(MetricsCollector::new()),
            read_retry: RetryExecutor::new(RetryConfig::reads(config.max_read_attempts)),
        })
    }

    /// Replace the retry policy used for reads.
    pub fn with_read_retry(mut self, config: RetryConfig) -> Self {
        self.read_retry = RetryExecutor::new(config);
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url.as_str().trim_end_matches('/'), endpoint)
    }

    pub async fn make_request(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<Response, CoreError> {
        let url = self.endpoint_url(endpoint);
        let start_time = Instant::now();

        let mut request_builder = self.http_client.request(method.clone(), &url);
        if let Some(body) = body {
            request_builder = request_builder.json(body);
        }

        debug!("Fortune API request: {} {}", method, endpoint);
        let result = match request_builder.send().await {
            Ok(response) if response.status().is_success() => {
                debug!("Request successful: {} {}", response.status(), endpoint);
                Ok(response)
            }
            Ok(response) => {
                error!(
                    "Request failed with status: {} for {}",
                    response.status(),
                    endpoint
                );
                Err(CoreError::Gateway(GatewayError::ServerError {
                    endpoint: endpoint.to_string(),
                    status: response.status().as_u16(),
                }))
            }
            Err(e) if e.is_timeout() => {
                error!("Request timed out for {} {}", method, endpoint);
                Err(CoreError::Gateway(GatewayError::RequestTimeout {
                    endpoint: endpoint.to_string(),
                }))
            }
            Err(e) => {
                error!("Network error for {} {}: {}", method, endpoint, e);
                Err(CoreError::Network(e))
            }
        };

        let status_code = match &result {
            Ok(response) => Some(response.status().as_u16()),
            Err(CoreError::Gateway(GatewayError::ServerError { status, .. })) => Some(*status),
            Err(_) => None,
        };
        self.metrics
            .record_request(RequestMetrics {
                endpoint: endpoint.to_string(),
                method: method.to_string(),
                status_code,
                response_time: start_time.elapsed(),
                success: result.is_ok(),
                timed_out: matches!(
                    result,
                    Err(CoreError::Gateway(GatewayError::RequestTimeout { .. }))
                ),
                error_type: result.as_ref().err().map(|e| e.error_code()),
            })
            .await;

        result
    }

    async fn decode<T: DeserializeOwned>(response: Response, endpoint: &str) -> Result<T, CoreError> {
        response.json::<T>().await.map_err(|e| {
            error!("Failed to parse response from {}: {}", endpoint, e);
            CoreError::Gateway(GatewayError::InvalidResponse {
                endpoint: endpoint.to_string(),
                details: e.to_string(),
            })
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, CoreError> {
        self.read_retry
            .execute(endpoint, || async move {
                let response = self.make_request(Method::GET, endpoint, None).await?;
                Self::decode(response, endpoint).await
            })
            .await
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<T, CoreError> {
        let response = self.make_request(Method::POST, endpoint, body).await?;
        Self::decode(response, endpoint).await
    }

    /// Fetch every analysed post. Duplicate identifiers make the whole
    /// response invalid.
    pub async fn fetch_posts(&self) -> Result<Vec<Post>, CoreError> {
        let posts: Vec<Post> = self.get_json(POSTS_ENDPOINT).await?;

        let mut seen = HashSet::with_capacity(posts.len());
        if let Some(duplicate) = posts.iter().find(|post| !seen.insert(post.id.as_str())) {
            error!("Duplicate post id {} in {}", duplicate.id, POSTS_ENDPOINT);
            return Err(CoreError::Gateway(GatewayError::InvalidResponse {
                endpoint: POSTS_ENDPOINT.to_string(),
                details: format!("duplicate post id {}", duplicate.id),
            }));
        }

        info!("Retrieved {} posts", posts.len());
        Ok(posts)
    }

    pub async fn fetch_analytics(&self) -> Result<AnalyticsSummary, CoreError> {
        let summary: AnalyticsSummary = self.get_json(ANALYTICS_ENDPOINT).await?;
        debug!("Retrieved analytics summary");
        Ok(summary)
    }

    pub async fn sync(&self) -> Result<serde_json::Value, CoreError> {
        let result: serde_json::Value = self.post_json(SYNC_ENDPOINT, None).await?;
        info!("Sync result: {}", result);
        Ok(result)
    }

    pub async fn analyze(&self, post_ids: &[String]) -> Result<serde_json::Value, CoreError> {
        let body = serde_json::to_value(AnalyzeRequest { post_ids })?;
        let result: serde_json::Value = self.post_json(ANALYZE_ENDPOINT, Some(&body)).await?;
        info!("Analyzed {} posts", post_ids.len());
        Ok(result)
    }

    pub async fn generate_portrait(&self) -> Result<GeneratedPortrait, CoreError> {
        let generated: GeneratedPortrait = self.post_json(GENERATE_PORTRAIT_ENDPOINT, None).await?;
        info!(
            "Generated portrait: {}",
            generated.portrait.archetype.as_deref().unwrap_or("unnamed")
        );
        Ok(generated)
    }

    pub async fn health(&self) -> Result<HealthStatus, CoreError> {
        self.get_json(HEALTH_ENDPOINT).await
    }

    pub async fn get_metrics(&self) -> ApiMetrics {
        self.metrics.get_metrics().await
    }

    pub fn get_retry_metrics(&self) -> RetryMetrics {
        self.read_retry.get_metrics()
    }
}

#[async_trait]
impl DashboardGateway for ApiClient {
    async fn fetch_posts(&self) -> Result<Vec<Post>, CoreError> {
        ApiClient::fetch_posts(self).await
    }

    async fn fetch_analytics(&self) -> Result<AnalyticsSummary, CoreError> {
        ApiClient::fetch_analytics(self).await
    }

    async fn sync(&self) -> Result<serde_json::Value, CoreError> {
        ApiClient::sync(self).await
    }

    async fn analyze(&self, post_ids: &[String]) -> Result<serde_json::Value, CoreError> {
        ApiClient::analyze(self, post_ids).await
    }
}

#[async_trait]
impl ReadingGateway for ApiClient {
    async fn sync(&self) -> Result<serde_json::Value, CoreError> {
        ApiClient::sync(self).await
    }

    async fn generate_portrait(&self) -> Result<GeneratedPortrait, CoreError> {
        ApiClient::generate_portrait(self).await
    }
}
