use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account counters as reported by the provider at fetch time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProfileCounters {
    pub followers_count: u64,
    pub following_count: u64,
    pub media_count: u64,
}

/// The subset of a media item the metrics depend on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostSummary {
    pub id: String,
    /// `None` when the provider omits the count (hidden likes, some media types).
    pub like_count: Option<u64>,
    pub comment_count: Option<u64>,
    pub timestamp: DateTime<Utc>,
}

impl PostSummary {
    /// Likes plus comments, treating absent counts as zero.
    #[must_use]
    pub fn engagement(&self) -> u64 {
        self.like_count
            .unwrap_or(0)
            .saturating_add(self.comment_count.unwrap_or(0))
    }
}

/// Summary statistics derived from one profile snapshot and its recent posts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    pub followers: u64,
    pub following: u64,
    pub posts: u64,
    /// Average engagement per post as a percentage of followers. `0.0` when
    /// there are no followers or no posts.
    pub engagement_rate_percent: f64,
    /// Posts per week across the fetched batch. `None` when the batch spans
    /// no time (fewer than two posts, or identical timestamps).
    pub posting_frequency_per_week: Option<f64>,
    /// Synthetic twelve-point series. Not measured data.
    pub growth_rate_series: Vec<f64>,
    /// Always `true`: the provider exposes no follower history.
    pub growth_rate_is_placeholder: bool,
}

/// Identity of the account that owns the access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub id: String,
    pub username: String,
    pub account_type: Option<String>,
}

/// A media item shaped for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentPost {
    pub id: String,
    pub caption: Option<String>,
    pub media_type: String,
    pub media_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub permalink: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub likes: u64,
    pub comments: u64,
}

/// Everything the presentation layer needs for one account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub profile: ProfileSummary,
    pub metrics: DerivedMetrics,
    pub recent_posts: Vec<RecentPost>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn engagement_treats_missing_counts_as_zero() {
        let post = PostSummary {
            id: "1".to_string(),
            like_count: None,
            comment_count: Some(7),
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        };
        assert_eq!(post.engagement(), 7);
    }

    #[test]
    fn engagement_saturates_instead_of_overflowing() {
        let post = PostSummary {
            id: "1".to_string(),
            like_count: Some(u64::MAX),
            comment_count: Some(1),
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        };
        assert_eq!(post.engagement(), u64::MAX);
    }

    #[test]
    fn derived_metrics_serializes_missing_frequency_as_null() {
        let metrics = DerivedMetrics {
            followers: 0,
            following: 0,
            posts: 0,
            engagement_rate_percent: 0.0,
            posting_frequency_per_week: None,
            growth_rate_series: vec![0.0; 12],
            growth_rate_is_placeholder: true,
        };
        let json = serde_json::to_value(&metrics).expect("serialize");
        assert!(json["posting_frequency_per_week"].is_null());
        assert_eq!(json["growth_rate_is_placeholder"], true);
        assert_eq!(json["growth_rate_series"].as_array().map(Vec::len), Some(12));
    }
}
