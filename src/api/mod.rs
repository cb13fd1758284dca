//! HTTP surface
//!
//! Router assembly, shared handler state, and the request-id middleware.

pub mod pitch;
pub mod shop;

use crate::agents::{PitchPipeline, ShoppingAssistant};
use crate::commerce::ucp::MerchantRegistry;
use axum::extract::Request;
use axum::http::HeaderValue;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Instrument;
use uuid::Uuid;

/// Shared state every handler receives
pub struct AppContext {
    pub pipeline: PitchPipeline,
    pub assistant: ShoppingAssistant,
    pub registry: Arc<MerchantRegistry>,
    pub pipeline_timeout: Duration,
}

/// Build the full application router
pub fn router(context: Arc<AppContext>) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/pitch", post(pitch::run_pitch))
        .route("/api/shop/search", post(shop::search))
        .route("/api/shop/trending", get(shop::trending))
        .route("/api/shop/recommendations", post(shop::recommendations))
        .route("/api/shop/checkout", post(shop::checkout))
        .route("/api/shop/track", post(shop::track))
        .route("/api/shop/ask", post(shop::ask))
        .layer(middleware::from_fn(attach_request_id))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(context)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Tag every response with a request id for log correlation
async fn attach_request_id(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let span = tracing::info_span!("request", id = %request_id);

    let mut response = next.run(request).instrument(span).await;
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert("x-request-id", value);
    }
    response
}
