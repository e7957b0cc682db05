//! Display helpers for the post table.

use chrono::{DateTime, Utc};
use serde::Serialize;

pub const DEFAULT_TRUNCATE_LEN: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EngagementTier {
    High,
    Medium,
    Low,
}

impl EngagementTier {
    pub fn from_rate(rate: f64) -> Self {
        if rate > 5.0 {
            EngagementTier::High
        } else if rate > 2.0 {
            EngagementTier::Medium
        } else {
            EngagementTier::Low
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EngagementTier::High => "high",
            EngagementTier::Medium => "medium",
            EngagementTier::Low => "low",
        }
    }
}

/// Cut `text` to at most `max_chars` characters, appending `...` when
/// anything was removed.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => format!("{}...", &text[..byte_index]),
        None => text.to_string(),
    }
}

/// `YYYY-MM-DD`, or `n/a` for posts without a timestamp.
pub fn format_date(timestamp: Option<DateTime<Utc>>) -> String {
    timestamp
        .map(|ts| ts.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "n/a".to_string())
}
