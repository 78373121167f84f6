//! `GET /api/v1/instagram/{username}`: profile metrics dashboard.

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use instametrics_core::Dashboard;
use instametrics_graph::{build_dashboard, GraphError};
use serde::Deserialize;

use crate::middleware::RequestId;
use crate::singleflight::FlightError;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

const MAX_USERNAME_LEN: usize = 30;
const MISSING_TOKEN_MESSAGE: &str = "Instagram API access token not configured";

#[derive(Debug, Deserialize)]
pub(super) struct DashboardQuery {
    /// Skip the cache and replace its entry.
    #[serde(default)]
    pub refresh: bool,
}

pub(super) async fn get_dashboard(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(raw_username): Path<String>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<ApiResponse<Dashboard>>, ApiError> {
    let username = normalize_username(&raw_username).ok_or_else(|| {
        ApiError::new(
            req_id.0.clone(),
            "validation_error",
            format!("invalid Instagram username '{raw_username}'"),
        )
    })?;

    let Some(provider) = state.provider.clone() else {
        tracing::error!(username = %username, "Instagram API access token not configured");
        return Err(ApiError::new(
            req_id.0,
            "configuration_error",
            MISSING_TOKEN_MESSAGE,
        ));
    };

    if query.refresh {
        state.cache.invalidate(&username).await;
    } else if let Some(dashboard) = state.cache.get(&username).await {
        tracing::debug!(username = %username, "serving cached dashboard");
        return Ok(Json(ApiResponse {
            data: dashboard,
            meta: ResponseMeta::new(req_id.0).with_cached(true),
        }));
    }

    let calculator = state.calculator.clone();
    let cache = state.cache.clone();
    let media_limit = state.media_limit;
    let cache_key = username.clone();
    let dashboard = state
        .flights
        .run(username.clone(), async move {
            let dashboard = build_dashboard(provider.as_ref(), &calculator, media_limit).await?;
            cache.insert(cache_key, dashboard.clone()).await;
            Ok::<_, GraphError>(dashboard)
        })
        .await
        .map_err(|e| map_flight_error(req_id.0.clone(), &username, e))?;

    if !dashboard.profile.username.eq_ignore_ascii_case(&username) {
        tracing::warn!(
            requested = %username,
            token_owner = %dashboard.profile.username,
            "access token belongs to a different account; returning token owner's data"
        );
    }

    Ok(Json(ApiResponse {
        data: dashboard,
        meta: ResponseMeta::new(req_id.0).with_cached(false),
    }))
}

/// Trims whitespace and a leading `@`, lowercases, and checks Instagram's
/// username alphabet (letters, digits, `.` and `_`, at most 30 characters).
pub(super) fn normalize_username(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let name = trimmed.strip_prefix('@').unwrap_or(trimmed);
    let valid = !name.is_empty()
        && name.len() <= MAX_USERNAME_LEN
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_');
    valid.then(|| name.to_ascii_lowercase())
}

fn map_flight_error(
    request_id: String,
    username: &str,
    error: FlightError<GraphError>,
) -> ApiError {
    match error {
        FlightError::Failed(e) => map_graph_error(request_id, username, &e),
        FlightError::Aborted => {
            tracing::error!(username, "dashboard fetch task aborted");
            ApiError::new(request_id, "internal_error", "dashboard request failed")
        }
    }
}

fn map_graph_error(request_id: String, username: &str, error: &GraphError) -> ApiError {
    match error {
        GraphError::MissingAccessToken => {
            ApiError::new(request_id, "configuration_error", MISSING_TOKEN_MESSAGE)
        }
        other => {
            tracing::error!(username, error = %other, "Instagram provider request failed");
            ApiError::new(request_id, "provider_error", other.to_string())
        }
    }
}
