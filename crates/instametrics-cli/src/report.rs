//! `report` command: fetch a dashboard and print it.

use std::fmt::Write as _;

use instametrics_core::{AppConfig, Dashboard, MetricsCalculator};
use instametrics_graph::{build_dashboard, GraphClient};

/// Fetches the token owner's dashboard and prints it to stdout.
///
/// # Errors
///
/// Returns an error if the access token is missing, the client cannot be
/// built, or either Graph API call fails.
pub(crate) async fn run_report(
    config: &AppConfig,
    username: &str,
    json: bool,
    limit: Option<u32>,
) -> anyhow::Result<()> {
    let client = GraphClient::from_config(config)?;
    let calculator = MetricsCalculator::default();
    let media_limit = limit.unwrap_or(config.instagram_media_limit);

    let dashboard = build_dashboard(&client, &calculator, media_limit).await?;

    let requested = username.trim_start_matches('@');
    if !dashboard.profile.username.eq_ignore_ascii_case(requested) {
        tracing::warn!(
            requested,
            token_owner = %dashboard.profile.username,
            "access token belongs to a different account; reporting token owner"
        );
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&dashboard)?);
    } else {
        print!("{}", render_dashboard(&dashboard)?);
    }

    Ok(())
}

/// Formats an integer with `,` thousands separators.
pub(crate) fn fmt_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub(crate) fn fmt_engagement(rate: f64) -> String {
    format!("{rate:.2}%")
}

pub(crate) fn fmt_frequency(per_week: Option<f64>) -> String {
    per_week.map_or_else(
        || "insufficient data".to_string(),
        |f| format!("{f:.1} posts/week"),
    )
}

/// Renders the metric cards, growth rows and recent posts as plain text.
///
/// # Errors
///
/// Returns [`std::fmt::Error`] if formatting fails.
pub(crate) fn render_dashboard(dashboard: &Dashboard) -> Result<String, std::fmt::Error> {
    let metrics = &dashboard.metrics;
    let mut out = String::new();

    let account_type = dashboard
        .profile
        .account_type
        .as_deref()
        .map(|t| format!(" ({t})"))
        .unwrap_or_default();
    writeln!(out, "@{}{account_type}", dashboard.profile.username)?;
    writeln!(out)?;
    writeln!(out, "{:<20}{}", "Followers", fmt_count(metrics.followers))?;
    writeln!(out, "{:<20}{}", "Following", fmt_count(metrics.following))?;
    writeln!(out, "{:<20}{}", "Posts", fmt_count(metrics.posts))?;
    writeln!(
        out,
        "{:<20}{}",
        "Engagement rate",
        fmt_engagement(metrics.engagement_rate_percent)
    )?;
    writeln!(
        out,
        "{:<20}{}",
        "Posting frequency",
        fmt_frequency(metrics.posting_frequency_per_week)
    )?;

    writeln!(out)?;
    if metrics.growth_rate_is_placeholder {
        writeln!(out, "Growth rate (placeholder, not measured)")?;
    } else {
        writeln!(out, "Growth rate")?;
    }
    for (i, value) in metrics.growth_rate_series.iter().enumerate() {
        writeln!(out, "  Month {:<4}{value:>6.2}%", i + 1)?;
    }

    if !dashboard.recent_posts.is_empty() {
        writeln!(out)?;
        writeln!(
            out,
            "{:<12}{:<16}{:>8}{:>10}  CAPTION",
            "DATE", "TYPE", "LIKES", "COMMENTS"
        )?;
        for post in &dashboard.recent_posts {
            let caption = post.caption.as_deref().unwrap_or("");
            let caption = if caption.chars().count() > 40 {
                format!("{}...", caption.chars().take(40).collect::<String>())
            } else {
                caption.to_string()
            };
            writeln!(
                out,
                "{:<12}{:<16}{:>8}{:>10}  {}",
                post.timestamp.format("%Y-%m-%d"),
                post.media_type,
                fmt_count(post.likes),
                fmt_count(post.comments),
                caption.replace('\n', " ")
            )?;
        }
    }

    Ok(out)
}
