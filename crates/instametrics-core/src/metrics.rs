//! Metric derivation over one profile snapshot and its recent posts.
//!
//! Every function here is total: empty batches, zero followers, and batches
//! that span no time all resolve to sentinels instead of NaN or infinity.

use std::sync::Arc;

use crate::growth::{bound_point, GrowthSeriesSource, RandomGrowth};
use crate::types::{DerivedMetrics, PostSummary, ProfileCounters};

const SECONDS_PER_WEEK: f64 = 7.0 * 24.0 * 3600.0;

/// Turns provider data into [`DerivedMetrics`].
///
/// The growth series comes from an injected [`GrowthSeriesSource`] so tests
/// can pin it; [`MetricsCalculator::default`] uses [`RandomGrowth`].
#[derive(Clone)]
pub struct MetricsCalculator {
    growth: Arc<dyn GrowthSeriesSource>,
}

impl Default for MetricsCalculator {
    fn default() -> Self {
        Self::new(Arc::new(RandomGrowth))
    }
}

impl std::fmt::Debug for MetricsCalculator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricsCalculator").finish_non_exhaustive()
    }
}

impl MetricsCalculator {
    #[must_use]
    pub fn new(growth: Arc<dyn GrowthSeriesSource>) -> Self {
        Self { growth }
    }

    #[must_use]
    pub fn compute(&self, counters: &ProfileCounters, posts: &[PostSummary]) -> DerivedMetrics {
        DerivedMetrics {
            followers: counters.followers_count,
            following: counters.following_count,
            posts: counters.media_count,
            engagement_rate_percent: engagement_rate_percent(counters, posts),
            posting_frequency_per_week: posting_frequency_per_week(posts),
            growth_rate_series: self.growth.series().into_iter().map(bound_point).collect(),
            growth_rate_is_placeholder: true,
        }
    }
}

/// Average likes + comments per post, as a percentage of followers.
///
/// Returns `0.0` when `posts` is empty or `followers_count` is zero.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn engagement_rate_percent(counters: &ProfileCounters, posts: &[PostSummary]) -> f64 {
    if posts.is_empty() || counters.followers_count == 0 {
        return 0.0;
    }

    let total = posts
        .iter()
        .fold(0u64, |acc, post| acc.saturating_add(post.engagement()));
    let average = total as f64 / posts.len() as f64;
    average / counters.followers_count as f64 * 100.0
}

/// Posts per week across the span from the oldest to the newest post.
///
/// Returns `None` for fewer than two posts or when every post shares one
/// timestamp.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn posting_frequency_per_week(posts: &[PostSummary]) -> Option<f64> {
    if posts.len() < 2 {
        return None;
    }

    let oldest = posts.iter().map(|p| p.timestamp).min()?;
    let newest = posts.iter().map(|p| p.timestamp).max()?;
    let span_ms = (newest - oldest).num_milliseconds();
    if span_ms <= 0 {
        return None;
    }

    let weeks = span_ms as f64 / 1000.0 / SECONDS_PER_WEEK;
    Some(posts.len() as f64 / weeks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::growth::{FixedGrowth, FlatGrowth, GROWTH_POINTS};
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn post(id: &str, likes: Option<u64>, comments: Option<u64>, at: DateTime<Utc>) -> PostSummary {
        PostSummary {
            id: id.to_string(),
            like_count: likes,
            comment_count: comments,
            timestamp: at,
        }
    }

    fn counters(followers: u64) -> ProfileCounters {
        ProfileCounters {
            followers_count: followers,
            following_count: 50,
            media_count: 30,
        }
    }

    fn flat() -> MetricsCalculator {
        MetricsCalculator::new(Arc::new(FlatGrowth))
    }

    #[test]
    fn worked_scenario_matches_expected_values() {
        let posts = vec![
            post("a", Some(80), Some(20), t0()),
            post("b", Some(100), Some(0), t0() + Duration::weeks(1)),
        ];
        let metrics = flat().compute(&counters(1000), &posts);

        assert!((metrics.engagement_rate_percent - 10.0).abs() < 1e-9);
        let freq = metrics.posting_frequency_per_week.expect("two distinct posts");
        assert!((freq - 2.0).abs() < 1e-9, "got {freq}");
        assert_eq!(metrics.followers, 1000);
        assert_eq!(metrics.following, 50);
        assert_eq!(metrics.posts, 30);
    }

    #[test]
    fn zero_followers_and_no_posts_yield_sentinels() {
        let metrics = flat().compute(&ProfileCounters::default(), &[]);
        assert_eq!(metrics.engagement_rate_percent, 0.0);
        assert!(metrics.posting_frequency_per_week.is_none());
        assert_eq!(metrics.growth_rate_series.len(), GROWTH_POINTS);
    }

    #[test]
    fn zero_followers_with_posts_is_zero_not_infinite() {
        let posts = vec![post("a", Some(10), Some(5), t0())];
        assert_eq!(engagement_rate_percent(&counters(0), &posts), 0.0);
    }

    #[test]
    fn empty_posts_with_followers_is_zero() {
        assert_eq!(engagement_rate_percent(&counters(500), &[]), 0.0);
    }

    #[test]
    fn engagement_is_finite_and_non_negative() {
        let posts: Vec<_> = (0..25u32)
            .map(|i| {
                post(
                    &i.to_string(),
                    Some(u64::from(i) * 3),
                    None,
                    t0() + Duration::hours(i64::from(i)),
                )
            })
            .collect();
        for followers in [1, 7, 1_000, 5_000_000] {
            let rate = engagement_rate_percent(&counters(followers), &posts);
            assert!(rate.is_finite() && rate >= 0.0, "followers={followers} rate={rate}");
        }
    }

    #[test]
    fn absent_counts_count_as_zero() {
        let posts = vec![
            post("a", None, None, t0()),
            post("b", Some(40), None, t0() + Duration::days(1)),
        ];
        let rate = engagement_rate_percent(&counters(100), &posts);
        assert!((rate - 20.0).abs() < 1e-9, "got {rate}");
    }

    #[test]
    fn single_post_has_no_frequency() {
        assert!(posting_frequency_per_week(&[post("a", Some(1), Some(1), t0())]).is_none());
    }

    #[test]
    fn identical_timestamps_have_no_frequency() {
        let posts = vec![
            post("a", Some(1), None, t0()),
            post("b", Some(2), None, t0()),
            post("c", Some(3), None, t0()),
        ];
        assert!(posting_frequency_per_week(&posts).is_none());
    }

    #[test]
    fn frequency_ignores_input_order() {
        let posts = vec![
            post("newest", None, None, t0() + Duration::weeks(2)),
            post("oldest", None, None, t0()),
            post("middle", None, None, t0() + Duration::weeks(1)),
            post("other", None, None, t0() + Duration::days(3)),
        ];
        let freq = posting_frequency_per_week(&posts).unwrap();
        assert!((freq - 2.0).abs() < 1e-9, "got {freq}");
    }

    #[test]
    fn sub_week_span_yields_higher_frequency() {
        let posts = vec![
            post("a", None, None, t0()),
            post("b", None, None, t0() + Duration::days(1)),
        ];
        let freq = posting_frequency_per_week(&posts).unwrap();
        assert!((freq - 14.0).abs() < 1e-9, "got {freq}");
    }

    #[test]
    fn growth_series_is_clamped_from_custom_source() {
        let mut values = [0.0; GROWTH_POINTS];
        values[0] = 42.0;
        values[1] = f64::NAN;
        values[2] = -3.5;
        let calc = MetricsCalculator::new(Arc::new(FixedGrowth(values)));
        let metrics = calc.compute(&counters(10), &[]);
        assert_eq!(metrics.growth_rate_series[0], 5.0);
        assert_eq!(metrics.growth_rate_series[1], 0.0);
        assert_eq!(metrics.growth_rate_series[2], -3.5);
        assert!(metrics.growth_rate_is_placeholder);
    }

    #[test]
    fn default_calculator_produces_bounded_series() {
        let metrics = MetricsCalculator::default().compute(&counters(10), &[]);
        assert_eq!(metrics.growth_rate_series.len(), GROWTH_POINTS);
        assert!(metrics
            .growth_rate_series
            .iter()
            .all(|v| (-5.0..=5.0).contains(v)));
    }
}
