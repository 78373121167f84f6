use chrono::{TimeZone, Utc};
use clap::Parser;
use instametrics_core::{Dashboard, DerivedMetrics, ProfileSummary, RecentPost};

use super::*;
use crate::report::{fmt_count, fmt_engagement, fmt_frequency, render_dashboard};

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["instametrics-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_report_command_defaults() {
    let cli = Cli::try_parse_from(["instametrics-cli", "report", "coffee.shop"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Report {
            ref username,
            json: false,
            limit: None,
        }) if username == "coffee.shop"
    ));
}

#[test]
fn parses_report_json_and_limit() {
    let cli = Cli::try_parse_from([
        "instametrics-cli",
        "report",
        "coffee.shop",
        "--json",
        "--limit",
        "10",
    ])
    .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Report {
            json: true,
            limit: Some(10),
            ..
        })
    ));
}

#[test]
fn report_requires_username() {
    assert!(Cli::try_parse_from(["instametrics-cli", "report"]).is_err());
}

#[test]
fn report_rejects_out_of_range_limit() {
    assert!(
        Cli::try_parse_from(["instametrics-cli", "report", "x", "--limit", "0"]).is_err()
    );
    assert!(
        Cli::try_parse_from(["instametrics-cli", "report", "x", "--limit", "101"]).is_err()
    );
}

#[test]
fn counts_use_thousands_separators() {
    assert_eq!(fmt_count(0), "0");
    assert_eq!(fmt_count(999), "999");
    assert_eq!(fmt_count(1_000), "1,000");
    assert_eq!(fmt_count(1_234_567), "1,234,567");
}

#[test]
fn engagement_has_two_decimals() {
    assert_eq!(fmt_engagement(10.0), "10.00%");
    assert_eq!(fmt_engagement(3.14159), "3.14%");
}

#[test]
fn frequency_sentinel_reads_as_insufficient_data() {
    assert_eq!(fmt_frequency(Some(2.0)), "2.0 posts/week");
    assert_eq!(fmt_frequency(None), "insufficient data");
}

fn sample_dashboard() -> Dashboard {
    Dashboard {
        profile: ProfileSummary {
            id: "1789".to_string(),
            username: "coffee.shop".to_string(),
            account_type: Some("BUSINESS".to_string()),
        },
        metrics: DerivedMetrics {
            followers: 12_500,
            following: 50,
            posts: 30,
            engagement_rate_percent: 10.0,
            posting_frequency_per_week: None,
            growth_rate_series: vec![1.5; 12],
            growth_rate_is_placeholder: true,
        },
        recent_posts: vec![RecentPost {
            id: "m1".to_string(),
            caption: Some("new blend\nin store".to_string()),
            media_type: "IMAGE".to_string(),
            media_url: None,
            thumbnail_url: None,
            permalink: None,
            timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
            likes: 1_200,
            comments: 20,
        }],
    }
}

#[test]
fn render_includes_cards_growth_and_posts() {
    let text = render_dashboard(&sample_dashboard()).expect("render");

    assert!(text.starts_with("@coffee.shop (BUSINESS)\n"));
    assert!(text.contains("12,500"));
    assert!(text.contains("10.00%"));
    assert!(text.contains("insufficient data"));
    assert!(text.contains("Growth rate (placeholder, not measured)"));
    assert!(text.contains("Month 1 "));
    assert!(text.contains("Month 12"));
    assert!(!text.contains("Month 13"));
    assert!(text.contains("2024-03-01"));
    assert!(text.contains("new blend in store"));
}

#[test]
fn render_without_posts_omits_post_table() {
    let mut dashboard = sample_dashboard();
    dashboard.recent_posts.clear();
    dashboard.metrics.posting_frequency_per_week = Some(2.0);

    let text = render_dashboard(&dashboard).expect("render");

    assert!(text.contains("2.0 posts/week"));
    assert!(!text.contains("CAPTION"));
}
