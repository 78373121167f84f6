//! Instagram Graph API response types.
//!
//! Field lists mirror the `fields=` parameters the client requests. Counters
//! the API omits for some account types default to zero.

use chrono::{DateTime, Utc};
use instametrics_core::{PostSummary, ProfileCounters, ProfileSummary, RecentPost};
use serde::{Deserialize, Deserializer};

/// `GET /me` response.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphProfile {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub account_type: Option<String>,
    #[serde(default)]
    pub media_count: u64,
    #[serde(default)]
    pub followers_count: u64,
    #[serde(default)]
    pub follows_count: u64,
}

impl GraphProfile {
    #[must_use]
    pub fn counters(&self) -> ProfileCounters {
        ProfileCounters {
            followers_count: self.followers_count,
            following_count: self.follows_count,
            media_count: self.media_count,
        }
    }

    #[must_use]
    pub fn summary(&self) -> ProfileSummary {
        ProfileSummary {
            id: self.id.clone(),
            username: self.username.clone(),
            account_type: self.account_type.clone(),
        }
    }
}

/// One item of `GET /{user-id}/media`.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphMedia {
    pub id: String,
    #[serde(default)]
    pub caption: Option<String>,
    pub media_type: String,
    #[serde(default)]
    pub media_url: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub permalink: Option<String>,
    #[serde(deserialize_with = "deserialize_graph_timestamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub like_count: Option<u64>,
    #[serde(default)]
    pub comments_count: Option<u64>,
}

impl GraphMedia {
    #[must_use]
    pub fn to_post_summary(&self) -> PostSummary {
        PostSummary {
            id: self.id.clone(),
            like_count: self.like_count,
            comment_count: self.comments_count,
            timestamp: self.timestamp,
        }
    }

    #[must_use]
    pub fn to_recent_post(&self) -> RecentPost {
        RecentPost {
            id: self.id.clone(),
            caption: self.caption.clone(),
            media_type: self.media_type.clone(),
            media_url: self.media_url.clone(),
            thumbnail_url: self.thumbnail_url.clone(),
            permalink: self.permalink.clone(),
            timestamp: self.timestamp,
            likes: self.like_count.unwrap_or(0),
            comments: self.comments_count.unwrap_or(0),
        }
    }
}

/// Media edge envelope. Items stay raw so one malformed entry can be skipped
/// without failing the page.
#[derive(Debug, Deserialize)]
pub(crate) struct MediaPage {
    #[serde(default)]
    pub data: Vec<serde_json::Value>,
}

/// Graph API error envelope: `{"error": {"message": ..., "type": ..., "code": ...}}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorDetail {
    #[serde(default)]
    pub message: Option<String>,
}

/// Parses Graph timestamps such as `2024-01-15T09:30:00+0000`, falling back
/// to RFC 3339.
#[must_use]
pub fn parse_graph_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z")
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn deserialize_graph_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_graph_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{raw}'")))
}
