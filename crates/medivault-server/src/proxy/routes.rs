// crates/medivault-server/src/proxy/routes.rs
// HTTP route handlers for the query proxy

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use medivault_types::QueryRequest;
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

use super::error::ProxyError;
use super::service::{Action, ProxyService};

/// Create the axum router with all proxy routes
pub fn create_router(service: ProxyService) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/api/query", post(query))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

/// Health check endpoint
async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

/// Single action-routed endpoint.
///
/// The body is parsed by hand so malformed JSON answers 500 with the
/// `{error}` envelope rather than axum's plain-text rejection.
async fn query(State(service): State<ProxyService>, body: Bytes) -> Result<Response, ProxyError> {
    let request: QueryRequest = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, "Rejected unparseable request body");
        ProxyError::MalformedBody
    })?;

    let action = Action::parse(&request.action).ok_or_else(|| {
        debug!(action = %request.action, "Unknown action");
        ProxyError::InvalidAction
    })?;
    debug!(?action, role = ?request.role, "Proxy request");

    let response = match action {
        Action::Search => Json(service.handle_search(&request).await).into_response(),
        Action::Index => Json(service.handle_index(&request).await?).into_response(),
        Action::Generate => Json(service.handle_generate(&request).await?).into_response(),
    };
    Ok(response)
}
