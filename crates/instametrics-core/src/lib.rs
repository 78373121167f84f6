//! Domain types, configuration, and metric derivation for instametrics.
//!
//! Nothing in this crate performs I/O beyond reading environment variables;
//! the Graph API client lives in `instametrics-graph`.

pub mod app_config;
pub mod config;
pub mod growth;
pub mod metrics;
pub mod types;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use growth::{FixedGrowth, FlatGrowth, GrowthSeriesSource, RandomGrowth, GROWTH_POINTS};
pub use metrics::{engagement_rate_percent, posting_frequency_per_week, MetricsCalculator};
pub use types::{
    Dashboard, DerivedMetrics, PostSummary, ProfileCounters, ProfileSummary, RecentPost,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
