//! HTTP API routes
//!
//! Defines all REST API endpoints for the server.

use crate::error::Error;
use crate::geo::Region;
use crate::resolve::ResolvedPlace;
use crate::route::{check_point_count, point_from_json, RouteResult};
use crate::server::state::AppState;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::error;

/// Create the API router
///
/// `/api/resolve` and `/api/route` accept POST, answer OPTIONS preflights and
/// reject every other method with 405. All responses allow any origin and
/// are never cached.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/api/resolve",
            post(resolve_handler)
                .options(preflight_handler)
                .fallback(method_not_allowed),
        )
        .route(
            "/api/route",
            post(route_handler)
                .options(preflight_handler)
                .fallback(method_not_allowed),
        )
        .route("/api/status", get(status_handler))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("POST, OPTIONS"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .with_state(state)
}

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub error: String,
}

impl ApiError {
    fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status,
            error: error.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let status = if err.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            error!(error = %err, "request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        };
        ApiError::new(status, err.to_string())
    }
}

/// Parse a JSON body; an empty body counts as `{}`
fn parse_body<T: DeserializeOwned + Default>(body: &Bytes) -> Result<T, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| {
        ApiError::new(StatusCode::BAD_REQUEST, format!("Invalid JSON body: {}", e))
    })
}

/// Resolve request body
///
/// Fields are kept loose so that wrong shapes become validation errors
/// rather than extractor rejections.
#[derive(Debug, Default, Deserialize)]
pub struct ResolveRequest {
    /// Free-text queries (non-strings are coerced to text)
    #[serde(default)]
    pub queries: Value,
    /// Region hint: "il" or anything else
    #[serde(default)]
    pub region: Value,
}

/// Resolve response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ResolveResponse {
    pub resolved: Vec<ResolvedPlace>,
}

/// Text of one query element
fn query_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Resolve places endpoint
///
/// POST /api/resolve
async fn resolve_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<ResolveResponse>, ApiError> {
    let req: ResolveRequest = parse_body(&body)?;

    let queries: Vec<String> = req
        .queries
        .as_array()
        .map(|items| items.iter().map(query_text).collect())
        .unwrap_or_default();
    let region = req.region.as_str().map(Region::from_hint).unwrap_or_default();

    let resolved = state.resolver.resolve(&queries, region).await?;
    Ok(Json(ResolveResponse { resolved }))
}

/// Route request body
#[derive(Debug, Default, Deserialize)]
pub struct RouteRequest {
    /// Ordered waypoints, each `{lat, lng}`
    #[serde(default)]
    pub points: Value,
}

/// Compute route endpoint
///
/// POST /api/route
async fn route_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<RouteResult>, ApiError> {
    let req: RouteRequest = parse_body(&body)?;

    let values = req.points.as_array().map(Vec::as_slice).unwrap_or_default();
    check_point_count(values.len())?;

    let points = values
        .iter()
        .map(point_from_json)
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| Error::Validation("Invalid points".to_string()))?;

    let route = state.planner.plan(&points).await?;
    Ok(Json(route))
}

/// CORS preflight
async fn preflight_handler() -> Json<Value> {
    Json(json!({ "ok": true }))
}

async fn method_not_allowed() -> ApiError {
    ApiError::new(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}

/// Status response
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Server is running
    pub running: bool,
    /// Server version
    pub version: String,
    /// Upstream endpoints in use
    pub providers: ProviderEndpoints,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProviderEndpoints {
    pub photon: String,
    pub nominatim: String,
    pub osrm: String,
}

/// Server status endpoint
///
/// GET /api/status
async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let providers = &state.config.providers;
    Json(StatusResponse {
        running: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        providers: ProviderEndpoints {
            photon: providers.photon_url.clone(),
            nominatim: providers.nominatim_url.clone(),
            osrm: providers.osrm_url.clone(),
        },
    })
}
