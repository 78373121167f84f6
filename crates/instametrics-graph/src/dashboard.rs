use instametrics_core::{Dashboard, MetricsCalculator, PostSummary, RecentPost};

use crate::error::GraphError;
use crate::provider::MediaProvider;

/// Fetches the profile and its recent media, then derives metrics.
///
/// Provider failures end the request; there is no partial dashboard.
///
/// # Errors
///
/// Returns the first [`GraphError`] from either provider call.
pub async fn build_dashboard(
    provider: &dyn MediaProvider,
    calculator: &MetricsCalculator,
    media_limit: u32,
) -> Result<Dashboard, GraphError> {
    let profile = provider.fetch_profile().await?;
    let media = provider
        .fetch_recent_media(&profile.id, media_limit)
        .await?;

    let posts: Vec<PostSummary> = media.iter().map(|m| m.to_post_summary()).collect();
    let recent_posts: Vec<RecentPost> = media.iter().map(|m| m.to_recent_post()).collect();
    let metrics = calculator.compute(&profile.counters(), &posts);

    tracing::debug!(
        username = %profile.username,
        posts = posts.len(),
        engagement_rate = metrics.engagement_rate_percent,
        "derived dashboard metrics"
    );

    Ok(Dashboard {
        profile: profile.summary(),
        metrics,
        recent_posts,
    })
}
