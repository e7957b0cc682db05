//! Request/response seams the controllers consume.

use crate::{AnalyticsSummary, CoreError, GeneratedPortrait, Post};
use async_trait::async_trait;

/// Backend operations used by the dashboard.
#[async_trait]
pub trait DashboardGateway: Send + Sync {
    /// `GET /api/posts`
    async fn fetch_posts(&self) -> Result<Vec<Post>, CoreError>;

    /// `GET /api/analytics`
    async fn fetch_analytics(&self) -> Result<AnalyticsSummary, CoreError>;

    /// `POST /api/sync`
    async fn sync(&self) -> Result<serde_json::Value, CoreError>;

    /// `POST /api/analyze` with `{ "post_ids": [...] }`
    async fn analyze(&self, post_ids: &[String]) -> Result<serde_json::Value, CoreError>;
}

/// Backend operations used by the reading flow.
#[async_trait]
pub trait ReadingGateway: Send + Sync {
    /// `POST /api/sync`
    async fn sync(&self) -> Result<serde_json::Value, CoreError>;

    /// `POST /api/generate-portrait`
    async fn generate_portrait(&self) -> Result<GeneratedPortrait, CoreError>;
}
