//! Instagram Graph API provider for instametrics dashboards.
//!
//! [`GraphClient`] talks to the Graph API; [`MediaProvider`] abstracts it so
//! [`build_dashboard`] can run against stubs.

pub mod client;
pub mod dashboard;
pub mod error;
pub mod provider;
pub mod types;

mod retry;

pub use client::GraphClient;
pub use dashboard::build_dashboard;
pub use error::GraphError;
pub use provider::MediaProvider;
pub use types::{parse_graph_timestamp, GraphMedia, GraphProfile};
