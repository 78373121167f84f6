mod api;
mod cache;
mod middleware;
mod singleflight;

use std::{sync::Arc, time::Duration};

use instametrics_core::MetricsCalculator;
use instametrics_graph::{GraphClient, MediaProvider};
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState},
    cache::ResponseCache,
    middleware::RateLimitState,
    singleflight::Singleflight,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = instametrics_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let provider: Option<Arc<dyn MediaProvider>> = if config.instagram_access_token.is_some() {
        Some(Arc::new(GraphClient::from_config(&config)?))
    } else {
        tracing::warn!(
            "INSTAGRAM_ACCESS_TOKEN is not set; dashboard requests will fail until it is configured"
        );
        None
    };

    let state = AppState {
        provider,
        calculator: MetricsCalculator::default(),
        cache: ResponseCache::new(Duration::from_secs(config.cache_ttl_secs)),
        media_limit: config.instagram_media_limit,
        flights: Singleflight::new(),
    };
    let app = build_app(
        state,
        RateLimitState::per_minute(config.rate_limit_per_minute),
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(
        addr = %config.bind_addr,
        env = %config.env,
        "instametrics server listening"
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
