use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// One analysed post as returned by `/api/posts`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    #[serde(rename = "thread_id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default)]
    pub media_type: Option<String>,
    #[serde(default, with = "timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub views: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub likes: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub replies: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reposts: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub shares: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub engagement_rate: f64,
    #[serde(default)]
    pub analysis_result: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub analysis_cached: bool,
}

/// Nullable columns come through as `null`; read those as the default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl Post {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: String::new(),
            media_type: None,
            created_at: None,
            views: 0,
            likes: 0,
            replies: 0,
            reposts: 0,
            shares: 0,
            engagement_rate: 0.0,
            analysis_result: None,
            analysis_cached: false,
        }
    }

    /// Numeric value of `field`, used by both sorting and charting.
    pub fn metric(&self, field: PostField) -> f64 {
        match field {
            PostField::EngagementRate => self.engagement_rate,
            PostField::Views => self.views as f64,
            PostField::Likes => self.likes as f64,
            PostField::Replies => self.replies as f64,
            PostField::Reposts => self.reposts as f64,
            PostField::Shares => self.shares as f64,
            PostField::CreatedAt => self
                .created_at
                .map(|ts| ts.timestamp_millis() as f64)
                .unwrap_or(0.0),
        }
    }
}

/// Aggregate metrics from `/api/analytics`; the shape belongs to the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalyticsSummary(pub serde_json::Value);

impl AnalyticsSummary {
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        match &self.0 {
            serde_json::Value::Object(map) => map.is_empty(),
            serde_json::Value::Null => true,
            _ => false,
        }
    }
}

impl Default for AnalyticsSummary {
    fn default() -> Self {
        Self(serde_json::Value::Object(serde_json::Map::new()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostField {
    #[default]
    EngagementRate,
    Views,
    Likes,
    Replies,
    Reposts,
    Shares,
    CreatedAt,
}

impl PostField {
    pub const ALL: [PostField; 7] = [
        PostField::EngagementRate,
        PostField::Views,
        PostField::Likes,
        PostField::Replies,
        PostField::Reposts,
        PostField::Shares,
        PostField::CreatedAt,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PostField::EngagementRate => "engagement_rate",
            PostField::Views => "views",
            PostField::Likes => "likes",
            PostField::Replies => "replies",
            PostField::Reposts => "reposts",
            PostField::Shares => "shares",
            PostField::CreatedAt => "created_at",
        }
    }
}

impl fmt::Display for PostField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostField {
    type Err = crate::CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PostField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| crate::CoreError::InvalidInput {
                message: format!("unknown post field '{}'", s),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortConfig {
    pub field: PostField,
    pub descending: bool,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            field: PostField::EngagementRate,
            descending: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    #[default]
    Engagement,
    Views,
    Likes,
}

impl ChartKind {
    pub fn field(self) -> PostField {
        match self {
            ChartKind::Engagement => PostField::EngagementRate,
            ChartKind::Views => PostField::Views,
            ChartKind::Likes => PostField::Likes,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ChartKind::Engagement => "Engagement Rate (%)",
            ChartKind::Views => "Views",
            ChartKind::Likes => "Likes",
        }
    }
}

impl FromStr for ChartKind {
    type Err = crate::CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "engagement" | "engagement_rate" => Ok(ChartKind::Engagement),
            "views" => Ok(ChartKind::Views),
            "likes" => Ok(ChartKind::Likes),
            other => Err(crate::CoreError::InvalidInput {
                message: format!("unknown chart kind '{}'", other),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub timestamp: Option<DateTime<Utc>>,
    pub label: String,
    pub value: f64,
}

/// Chronological projection of the post collection for one chart kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub kind: ChartKind,
    pub label: &'static str,
    pub points: Vec<ChartPoint>,
}

impl ChartSeries {
    pub fn labels(&self) -> Vec<&str> {
        self.points.iter().map(|p| p.label.as_str()).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingStep {
    #[default]
    Landing,
    Connecting,
    Reading,
    Results,
}

impl ReadingStep {
    pub fn as_str(self) -> &'static str {
        match self {
            ReadingStep::Landing => "landing",
            ReadingStep::Connecting => "connecting",
            ReadingStep::Reading => "reading",
            ReadingStep::Results => "results",
        }
    }
}

impl fmt::Display for ReadingStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PortraitSource {
    Generated,
    Demo,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Portrait {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archetype: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub content_dna: BTreeMap<String, f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posting_spirit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engagement_insight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mystical_advice: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shareable_quote: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_posts: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_engagement: Option<f64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Portrait {
    pub fn is_empty(&self) -> bool {
        *self == Portrait::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShareUrls {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threads: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copy_text: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShareableContent {
    /// `data:image/png;base64,...` payload for story-style sharing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ig_story_image: Option<String>,
    #[serde(default)]
    pub share_urls: ShareUrls,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ShareableContent {
    pub fn is_empty(&self) -> bool {
        *self == ShareableContent::default()
    }
}

/// Body of a successful `/api/generate-portrait` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedPortrait {
    pub portrait: Portrait,
    pub shareable_content: ShareableContent,
}

/// Accepts RFC 3339 as well as the naive ISO-8601 form the server emits,
/// reading the latter as UTC.
pub mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn parse(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return Ok(ts.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|naive| naive.and_utc())
    }

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(ts) => serializer.serialize_some(&ts.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        raw.map(|s| parse(&s).map_err(serde::de::Error::custom))
            .transpose()
    }
}
