//! Shopping endpoints
//!
//! Catalog queries answered from canned data, merchant calls proxied through
//! the registry, and the model-backed assistant.

use crate::agents::ShoppingAnswer;
use crate::api::AppContext;
use crate::commerce::catalog::{self, InteractionRecord, Recommendation, TrendingProduct};
use crate::commerce::ucp::{CheckoutItem, CheckoutSession, FanoutSearch};
use crate::error::AppError;
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub limit: Option<usize>,
}

/// `POST /api/shop/search` - fan a catalog search out to every merchant
pub async fn search(
    State(context): State<Arc<AppContext>>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<FanoutSearch>, AppError> {
    if request.query.trim().is_empty() {
        return Err(AppError::InvalidRequest("query must not be empty".to_string()));
    }
    let outcome = context.registry.search_all(&request.query, request.limit).await;
    Ok(Json(outcome))
}

#[derive(Debug, Deserialize)]
pub struct TrendingParams {
    pub category: Option<String>,
    pub limit: Option<usize>,
}

/// `GET /api/shop/trending` - trending products, optionally by category
pub async fn trending(Query(params): Query<TrendingParams>) -> Json<Vec<TrendingProduct>> {
    let products = catalog::trending(params.category.as_deref(), params.limit.unwrap_or(10));
    Json(products)
}

#[derive(Debug, Deserialize)]
pub struct RecommendationsRequest {
    pub user_id: Option<String>,
}

/// `POST /api/shop/recommendations` - canned per-user recommendations
pub async fn recommendations(
    Json(request): Json<RecommendationsRequest>,
) -> Json<Vec<Recommendation>> {
    let user_id = request.user_id.as_deref().unwrap_or("anonymous");
    Json(catalog::recommendations_for(user_id))
}

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub merchant_id: String,
    pub items: Vec<CheckoutItem>,
}

/// `POST /api/shop/checkout` - create a checkout session with one merchant
pub async fn checkout(
    State(context): State<Arc<AppContext>>,
    Json(request): Json<CheckoutRequest>,
) -> Result<Json<CheckoutSession>, AppError> {
    if request.items.is_empty() {
        return Err(AppError::InvalidRequest("items must not be empty".to_string()));
    }
    let client = context.registry.get(&request.merchant_id)?;
    let session = client.create_checkout_session(request.items).await?;
    Ok(Json(session))
}

#[derive(Debug, Deserialize)]
pub struct TrackRequest {
    pub user_id: String,
    pub product_id: String,
    pub interaction_type: String,
}

/// `POST /api/shop/track` - validate and log a shopper interaction
pub async fn track(Json(request): Json<TrackRequest>) -> Result<Json<InteractionRecord>, AppError> {
    let record = catalog::log_interaction(
        &request.user_id,
        &request.product_id,
        &request.interaction_type,
    )?;
    Ok(Json(record))
}

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

/// `POST /api/shop/ask` - grounded assistant answer over live search results
pub async fn ask(
    State(context): State<Arc<AppContext>>,
    Json(request): Json<AskRequest>,
) -> Result<Json<ShoppingAnswer>, AppError> {
    if request.question.trim().is_empty() {
        return Err(AppError::InvalidRequest("question must not be empty".to_string()));
    }
    let answer = context.assistant.ask(request.question.trim()).await?;
    Ok(Json(answer))
}
