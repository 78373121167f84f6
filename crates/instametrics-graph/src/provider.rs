use async_trait::async_trait;

use crate::client::GraphClient;
use crate::error::GraphError;
use crate::types::{GraphMedia, GraphProfile};

/// Source of profile counters and recent media for the token owner.
///
/// [`GraphClient`] is the production implementation; tests substitute stubs.
#[async_trait]
pub trait MediaProvider: Send + Sync {
    async fn fetch_profile(&self) -> Result<GraphProfile, GraphError>;

    async fn fetch_recent_media(
        &self,
        user_id: &str,
        limit: u32,
    ) -> Result<Vec<GraphMedia>, GraphError>;
}

#[async_trait]
impl MediaProvider for GraphClient {
    async fn fetch_profile(&self) -> Result<GraphProfile, GraphError> {
        self.get_profile().await
    }

    async fn fetch_recent_media(
        &self,
        user_id: &str,
        limit: u32,
    ) -> Result<Vec<GraphMedia>, GraphError> {
        self.get_recent_media(user_id, limit).await
    }
}
