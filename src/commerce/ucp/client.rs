//! UCP merchant client
//!
//! HTTP client for a single merchant's UCP endpoints. Every failure mode is
//! typed: an unreachable merchant, an error status, and a malformed body are
//! distinct errors, never collapsed into an empty result.

use crate::commerce::ucp::types::{
    CheckoutItem, CheckoutRequest, CheckoutSession, Discovery, EventAck, Product,
    RecommendationRequest, RecommendationResponse, SearchRequest, SearchResponse, TrackedEvent,
    UCP_VERSION,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UcpError {
    /// Merchant id is not in the registry
    #[error("Unknown merchant '{0}'")]
    UnknownMerchant(String),

    /// Request could not reach the merchant at all
    #[error("Merchant unreachable: {0}")]
    Unreachable(String),

    /// Merchant answered with a non-success status
    #[error("Merchant returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// Merchant answered but the body did not decode
    #[error("Merchant returned malformed data: {0}")]
    Malformed(String),
}

/// Client bound to one merchant's base URL
#[derive(Debug, Clone)]
pub struct UcpClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl UcpClient {
    /// Create a client for a merchant
    ///
    /// # Arguments
    /// * `http` - Shared reqwest client
    /// * `base_url` - Merchant root, without a trailing slash
    /// * `api_key` - Optional bearer token for authenticated merchants
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            http,
            base_url,
            api_key,
        }
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut builder = self.http.request(method, url).header("X-UCP-Version", UCP_VERSION);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }
        builder
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, UcpError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| UcpError::Unreachable(e.to_string()))?;

        if !status.is_success() {
            return Err(UcpError::Status {
                status: status.as_u16(),
                body,
            });
        }
        serde_json::from_str(&body).map_err(|e| UcpError::Malformed(e.to_string()))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, UcpError> {
        let response = self
            .request(reqwest::Method::GET, path)
            .send()
            .await
            .map_err(|e| UcpError::Unreachable(e.to_string()))?;
        Self::decode(response).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, UcpError> {
        let response = self
            .request(reqwest::Method::POST, path)
            .json(body)
            .send()
            .await
            .map_err(|e| UcpError::Unreachable(e.to_string()))?;
        Self::decode(response).await
    }

    /// Fetch the merchant's capability discovery document
    pub async fn discover(&self) -> Result<Discovery, UcpError> {
        self.get("/.well-known/ucp.json").await
    }

    /// Search the merchant's catalog
    pub async fn search(&self, query: &str, limit: Option<usize>) -> Result<Vec<Product>, UcpError> {
        let request = SearchRequest {
            query: query.to_string(),
            limit,
        };
        let response: SearchResponse = self.post("/ucp/catalog/search", &request).await?;
        tracing::debug!(
            base_url = %self.base_url,
            query = %query,
            hits = response.products.len(),
            "UCP search completed"
        );
        Ok(response.products)
    }

    /// Look up one product by id
    pub async fn product(&self, product_id: &str) -> Result<Product, UcpError> {
        self.get(&format!("/ucp/catalog/products/{}", product_id)).await
    }

    /// Create a checkout session for the given line items
    pub async fn create_checkout_session(
        &self,
        items: Vec<CheckoutItem>,
    ) -> Result<CheckoutSession, UcpError> {
        let session: CheckoutSession = self
            .post("/ucp/checkout/sessions", &CheckoutRequest { items })
            .await?;
        tracing::info!(
            base_url = %self.base_url,
            session_id = %session.session_id,
            status = %session.status,
            "Checkout session created"
        );
        Ok(session)
    }

    /// Ask the merchant for recommendations
    pub async fn recommendations(
        &self,
        request: &RecommendationRequest,
    ) -> Result<Vec<Product>, UcpError> {
        let response: RecommendationResponse = self.post("/ucp/recommendations", request).await?;
        Ok(response.recommendations)
    }

    /// Report a shopper event to the merchant
    pub async fn track_event(&self, event: &TrackedEvent) -> Result<EventAck, UcpError> {
        self.post("/ucp/events", event).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn client_for(server: &Server) -> UcpClient {
        UcpClient::new(reqwest::Client::new(), server.url(), None)
    }

    #[tokio::test]
    async fn test_search_parses_products() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/ucp/catalog/search")
            .match_header("x-ucp-version", UCP_VERSION)
            .match_body(Matcher::PartialJson(json!({"query": "headphones"})))
            .with_status(200)
            .with_body(
                r#"{
                    "products": [
                        {"id": "M1", "name": "Headphones", "price": {"amount": 199.99, "currency": "USD"}}
                    ]
                }"#,
            )
            .create_async()
            .await;

        let products = client_for(&server).search("headphones", None).await.unwrap();

        mock.assert_async().await;
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id, "M1");
        assert_eq!(products[0].price.amount, 199.99);
    }

    #[tokio::test]
    async fn test_discover_reads_well_known_document() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/.well-known/ucp.json")
            .with_status(200)
            .with_body(r#"{"capabilities": ["catalog", "checkout"], "protocol_version": "1.0"}"#)
            .create_async()
            .await;

        let discovery = client_for(&server).discover().await.unwrap();

        mock.assert_async().await;
        assert_eq!(discovery.capabilities, vec!["catalog", "checkout"]);
        assert_eq!(discovery.protocol_version.as_deref(), Some("1.0"));
    }

    #[tokio::test]
    async fn test_product_lookup() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/ucp/catalog/products/M1")
            .with_status(200)
            .with_body(r#"{"id": "M1", "name": "Headphones", "price": {"amount": 199.99, "currency": "USD"}}"#)
            .create_async()
            .await;

        let product = client_for(&server).product("M1").await.unwrap();

        mock.assert_async().await;
        assert_eq!(product.name, "Headphones");
    }

    #[tokio::test]
    async fn test_checkout_session_created() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/ucp/checkout/sessions")
            .match_body(Matcher::PartialJson(
                json!({"items": [{"product_id": "M1", "quantity": 2}]}),
            ))
            .with_status(200)
            .with_body(r#"{"session_id": "cs_123", "status": "open"}"#)
            .create_async()
            .await;

        let session = client_for(&server)
            .create_checkout_session(vec![CheckoutItem {
                product_id: "M1".to_string(),
                quantity: 2,
            }])
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(session.session_id, "cs_123");
        assert_eq!(session.status, "open");
    }

    #[tokio::test]
    async fn test_error_status_is_typed() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/ucp/catalog/search")
            .with_status(503)
            .with_body("maintenance")
            .create_async()
            .await;

        let err = client_for(&server).search("x", None).await.unwrap_err();

        match err {
            UcpError::Status { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "maintenance");
            }
            other => panic!("Expected Status error, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_typed() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/ucp/catalog/search")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let err = client_for(&server).search("x", None).await.unwrap_err();
        assert!(matches!(err, UcpError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_unreachable_merchant_is_typed() {
        // Nothing listens on this port.
        let client = UcpClient::new(reqwest::Client::new(), "http://127.0.0.1:9", None);
        let err = client.search("x", None).await.unwrap_err();
        assert!(matches!(err, UcpError::Unreachable(_)));
    }

    #[tokio::test]
    async fn test_api_key_sent_as_bearer() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/ucp/events")
            .match_header("authorization", "Bearer secret-key")
            .with_status(200)
            .with_body(r#"{"status": "recorded"}"#)
            .create_async()
            .await;

        let client = UcpClient::new(reqwest::Client::new(), server.url(), Some("secret-key".to_string()));
        let ack = client
            .track_event(&TrackedEvent {
                event_type: "view".to_string(),
                product_id: Some("M1".to_string()),
                metadata: None,
            })
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(ack.status, "recorded");
    }
}
