use thiserror::Error;

/// Errors returned by the Instagram Graph API client.
#[derive(Debug, Error)]
pub enum GraphError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("Instagram API request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response. `message` is taken from the Graph error envelope.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid Instagram API base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("Instagram API access token not configured")]
    MissingAccessToken,
}
