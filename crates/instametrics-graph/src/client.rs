//! HTTP client for the Instagram Graph API.
//!
//! Wraps `reqwest` with access-token handling, Graph error-envelope parsing,
//! bounded retry, and typed response deserialization. The token is sent as a
//! query parameter and never appears in logs or error contexts.

use std::time::Duration;

use instametrics_core::config::{
    DEFAULT_INSTAGRAM_API_BASE_URL, MAX_INSTAGRAM_RETRIES, MAX_MEDIA_LIMIT,
};
use instametrics_core::AppConfig;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::error::GraphError;
use crate::retry::retry_with_backoff;
use crate::types::{ErrorEnvelope, GraphMedia, GraphProfile, MediaPage};

const PROFILE_FIELDS: &str = "id,username,account_type,media_count,followers_count,follows_count";
const MEDIA_FIELDS: &str =
    "id,caption,media_type,media_url,thumbnail_url,permalink,timestamp,like_count,comments_count";
const FALLBACK_ERROR_MESSAGE: &str = "Instagram API error";

/// Client for the Instagram Graph API.
///
/// Use [`GraphClient::new`] for production or [`GraphClient::with_base_url`]
/// to point at a mock server in tests.
pub struct GraphClient {
    client: Client,
    access_token: String,
    base_url: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl std::fmt::Debug for GraphClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphClient")
            .field("base_url", &self.base_url.as_str())
            .field("access_token", &"[redacted]")
            .field("max_retries", &self.max_retries)
            .field("backoff_base_ms", &self.backoff_base_ms)
            .finish_non_exhaustive()
    }
}

impl GraphClient {
    /// Creates a client pointed at the production Graph API.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::MissingAccessToken`] for a blank token, or
    /// [`GraphError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(access_token: &str, timeout_secs: u64) -> Result<Self, GraphError> {
        Self::with_base_url(access_token, timeout_secs, DEFAULT_INSTAGRAM_API_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::MissingAccessToken`] for a blank token,
    /// [`GraphError::Http`] if the `reqwest::Client` cannot be built, or
    /// [`GraphError::InvalidBaseUrl`] if `base_url` is not a usable URL.
    pub fn with_base_url(
        access_token: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, GraphError> {
        if access_token.trim().is_empty() {
            return Err(GraphError::MissingAccessToken);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("instametrics/0.1 (profile-metrics)")
            .build()?;

        // One trailing slash so path segments append under the version prefix.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised)
            .map_err(|e| GraphError::InvalidBaseUrl(format!("'{base_url}': {e}")))?;
        if parsed.cannot_be_a_base() {
            return Err(GraphError::InvalidBaseUrl(format!(
                "'{base_url}' cannot carry a path"
            )));
        }

        Ok(Self {
            client,
            access_token: access_token.trim().to_owned(),
            base_url: parsed,
            max_retries: MAX_INSTAGRAM_RETRIES,
            backoff_base_ms: 500,
        })
    }

    /// Builds a client from application configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::MissingAccessToken`] when no token is configured,
    /// plus any error from [`GraphClient::with_base_url`].
    pub fn from_config(config: &AppConfig) -> Result<Self, GraphError> {
        let token = config
            .instagram_access_token
            .as_deref()
            .ok_or(GraphError::MissingAccessToken)?;
        Ok(Self::with_base_url(
            token,
            config.instagram_request_timeout_secs,
            &config.instagram_api_base_url,
        )?
        .with_retry_policy(
            config.instagram_max_retries,
            config.instagram_retry_backoff_base_ms,
        ))
    }

    /// Overrides the retry policy. `max_retries` is capped at two.
    #[must_use]
    pub fn with_retry_policy(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries.min(MAX_INSTAGRAM_RETRIES);
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    /// Fetches the token owner's profile and counters from `/me`.
    ///
    /// # Errors
    ///
    /// - [`GraphError::Api`] on a non-2xx response (after retries for 429/5xx).
    /// - [`GraphError::Http`] on network failure after retries.
    /// - [`GraphError::Deserialize`] if the body does not match [`GraphProfile`].
    pub async fn get_profile(&self) -> Result<GraphProfile, GraphError> {
        let url = self.build_url(&["me"], &[("fields", PROFILE_FIELDS)]);
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            self.request_json::<GraphProfile>(&url, "me")
        })
        .await
    }

    /// Fetches up to `limit` recent media items for `user_id`.
    ///
    /// `limit` is clamped to `1..=100`. Items that fail to deserialize (for
    /// example an unparseable timestamp) are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Same as [`GraphClient::get_profile`].
    pub async fn get_recent_media(
        &self,
        user_id: &str,
        limit: u32,
    ) -> Result<Vec<GraphMedia>, GraphError> {
        let limit = limit.clamp(1, MAX_MEDIA_LIMIT).to_string();
        let url = self.build_url(
            &[user_id, "media"],
            &[("fields", MEDIA_FIELDS), ("limit", limit.as_str())],
        );
        let context = format!("{user_id}/media");
        let page = retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            self.request_json::<MediaPage>(&url, &context)
        })
        .await?;

        let media = page
            .data
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<GraphMedia>(item) {
                Ok(media) => Some(media),
                Err(e) => {
                    tracing::warn!(user_id, error = %e, "skipping malformed media item");
                    None
                }
            })
            .collect();

        Ok(media)
    }

    /// Builds a request URL under the base path with percent-encoded query
    /// parameters and the access token appended.
    fn build_url(&self, segments: &[&str], params: &[(&str, &str)]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
            pairs.append_pair("access_token", &self.access_token);
        }
        url
    }

    /// Sends a GET request and decodes a 2xx body as `T`.
    ///
    /// Non-2xx responses become [`GraphError::Api`] carrying the Graph error
    /// message. `context` names the endpoint without exposing the token.
    async fn request_json<T: DeserializeOwned>(
        &self,
        url: &Url,
        context: &str,
    ) -> Result<T, GraphError> {
        // The URL carries the token, so strip it from transport errors.
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| GraphError::Http(e.without_url()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GraphError::Http(e.without_url()))?;

        if !status.is_success() {
            return Err(GraphError::Api {
                status: status.as_u16(),
                message: api_error_message(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| GraphError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }
}

/// Extracts `error.message` from a Graph error body.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| FALLBACK_ERROR_MESSAGE.to_owned())
}
