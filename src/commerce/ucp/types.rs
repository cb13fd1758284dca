//! UCP wire types
//!
//! Request and response shapes for the Universal Commerce Protocol endpoints
//! a merchant exposes: capability discovery, catalog search and lookup,
//! checkout sessions, recommendations, and event tracking.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Protocol version sent on every request as `X-UCP-Version`
pub const UCP_VERSION: &str = "1.0";

/// A price in a specific currency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Money {
    pub amount: f64,
    pub currency: String,
}

/// A product as merchants describe it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: Money,
}

/// Capability discovery document served at `/.well-known/ucp.json`
#[derive(Debug, Clone, Deserialize)]
pub struct Discovery {
    #[serde(default)]
    pub capabilities: Vec<String>,
    #[serde(default)]
    pub protocol_version: Option<String>,
}

/// Body for `POST /ucp/catalog/search`
#[derive(Debug, Clone, Serialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

/// Envelope for search results
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub products: Vec<Product>,
}

/// One line item in a checkout session request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutItem {
    pub product_id: String,
    pub quantity: u32,
}

/// Body for `POST /ucp/checkout/sessions`
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutRequest {
    pub items: Vec<CheckoutItem>,
}

/// A created checkout session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub session_id: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkout_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<Money>,
}

/// Body for `POST /ucp/recommendations`
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// Envelope for merchant recommendations
#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationResponse {
    #[serde(default)]
    pub recommendations: Vec<Product>,
}

/// Body for `POST /ucp/events`
#[derive(Debug, Clone, Serialize)]
pub struct TrackedEvent {
    pub event_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

/// Acknowledgement for a tracked event
#[derive(Debug, Clone, Deserialize)]
pub struct EventAck {
    pub status: String,
}
