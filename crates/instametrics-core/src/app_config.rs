use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Absent tokens are reported per request, not at startup.
    pub instagram_access_token: Option<String>,
    pub instagram_api_base_url: String,
    pub instagram_media_limit: u32,
    pub instagram_request_timeout_secs: u64,
    pub instagram_max_retries: u32,
    pub instagram_retry_backoff_base_ms: u64,
    pub cache_ttl_secs: u64,
    pub rate_limit_per_minute: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field(
                "instagram_access_token",
                &self.instagram_access_token.as_ref().map(|_| "[redacted]"),
            )
            .field("instagram_api_base_url", &self.instagram_api_base_url)
            .field("instagram_media_limit", &self.instagram_media_limit)
            .field(
                "instagram_request_timeout_secs",
                &self.instagram_request_timeout_secs,
            )
            .field("instagram_max_retries", &self.instagram_max_retries)
            .field(
                "instagram_retry_backoff_base_ms",
                &self.instagram_retry_backoff_base_ms,
            )
            .field("cache_ttl_secs", &self.cache_ttl_secs)
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_redacts_access_token() {
        let cfg = AppConfig {
            env: Environment::Test,
            bind_addr: "127.0.0.1:3000".parse().unwrap(),
            log_level: "info".to_string(),
            instagram_access_token: Some("IGQVJ-secret".to_string()),
            instagram_api_base_url: "https://graph.instagram.com/v18.0".to_string(),
            instagram_media_limit: 25,
            instagram_request_timeout_secs: 30,
            instagram_max_retries: 2,
            instagram_retry_backoff_base_ms: 500,
            cache_ttl_secs: 300,
            rate_limit_per_minute: 120,
        };
        let rendered = format!("{cfg:?}");
        assert!(!rendered.contains("IGQVJ-secret"));
        assert!(rendered.contains("[redacted]"));
    }

    #[test]
    fn environment_display_is_lowercase() {
        assert_eq!(Environment::Production.to_string(), "production");
    }
}
