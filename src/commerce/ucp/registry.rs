//! Merchant registry
//!
//! Holds one [`UcpClient`] per configured merchant. Built once at process
//! start from explicit configuration and passed by reference; there is no
//! lazily-initialized global.

use crate::commerce::ucp::client::{UcpClient, UcpError};
use crate::commerce::ucp::types::Product;
use crate::config::MerchantEntry;
use futures_util::future::join_all;
use serde::Serialize;
use std::collections::HashMap;

/// One merchant's products in a cross-merchant search
#[derive(Debug, Serialize)]
pub struct MerchantProducts {
    pub merchant_id: String,
    pub products: Vec<Product>,
}

/// One merchant's failure in a cross-merchant search
#[derive(Debug, Serialize)]
pub struct MerchantFailure {
    pub merchant_id: String,
    pub error: String,
}

/// Outcome of a search fanned out across all registered merchants
///
/// Successes and failures are reported side by side; a merchant being down
/// never erases another merchant's results.
#[derive(Debug, Serialize)]
pub struct FanoutSearch {
    pub hits: Vec<MerchantProducts>,
    pub failures: Vec<MerchantFailure>,
}

/// Registry of configured merchants and their clients
pub struct MerchantRegistry {
    merchants: HashMap<String, UcpClient>,
}

impl MerchantRegistry {
    /// Build the registry from merchant configuration entries
    pub fn new(http: reqwest::Client, entries: &[MerchantEntry]) -> Self {
        let merchants = entries
            .iter()
            .map(|entry| {
                tracing::info!(
                    merchant_id = %entry.id,
                    base_url = %entry.base_url,
                    capabilities = ?entry.capabilities,
                    "Registering merchant"
                );
                (
                    entry.id.clone(),
                    UcpClient::new(http.clone(), entry.base_url.clone(), entry.api_key.clone()),
                )
            })
            .collect();
        Self { merchants }
    }

    /// Ids of all registered merchants
    pub fn merchant_ids(&self) -> Vec<&str> {
        self.merchants.keys().map(String::as_str).collect()
    }

    /// Client for a specific merchant
    pub fn get(&self, merchant_id: &str) -> Result<&UcpClient, UcpError> {
        self.merchants
            .get(merchant_id)
            .ok_or_else(|| UcpError::UnknownMerchant(merchant_id.to_string()))
    }

    /// Search every registered merchant concurrently
    pub async fn search_all(&self, query: &str, limit: Option<usize>) -> FanoutSearch {
        let searches = self.merchants.iter().map(|(id, client)| async move {
            (id.clone(), client.search(query, limit).await)
        });

        let mut hits = Vec::new();
        let mut failures = Vec::new();
        for (merchant_id, result) in join_all(searches).await {
            match result {
                Ok(products) => hits.push(MerchantProducts {
                    merchant_id,
                    products,
                }),
                Err(e) => {
                    tracing::warn!(merchant_id = %merchant_id, error = %e, "Merchant search failed");
                    failures.push(MerchantFailure {
                        merchant_id,
                        error: e.to_string(),
                    });
                }
            }
        }

        hits.sort_by(|a, b| a.merchant_id.cmp(&b.merchant_id));
        failures.sort_by(|a, b| a.merchant_id.cmp(&b.merchant_id));
        FanoutSearch { hits, failures }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    fn entry(id: &str, base_url: &str) -> MerchantEntry {
        MerchantEntry {
            id: id.to_string(),
            base_url: base_url.to_string(),
            capabilities: vec!["catalog".to_string()],
            api_key: None,
        }
    }

    #[tokio::test]
    async fn test_unknown_merchant_is_an_error() {
        let registry = MerchantRegistry::new(reqwest::Client::new(), &[]);
        let err = registry.get("nowhere").unwrap_err();
        match err {
            UcpError::UnknownMerchant(id) => assert_eq!(id, "nowhere"),
            other => panic!("Expected UnknownMerchant, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_search_all_reports_hits_and_failures_separately() {
        let mut up = Server::new_async().await;
        let _mock = up
            .mock("POST", "/ucp/catalog/search")
            .with_status(200)
            .with_body(
                r#"{"products": [{"id": "M1", "name": "Headphones", "price": {"amount": 10.0, "currency": "USD"}}]}"#,
            )
            .create_async()
            .await;

        let registry = MerchantRegistry::new(
            reqwest::Client::new(),
            &[
                entry("alpha", &up.url()),
                // Nothing listens here.
                entry("beta", "http://127.0.0.1:9"),
            ],
        );

        let outcome = registry.search_all("headphones", None).await;

        assert_eq!(outcome.hits.len(), 1);
        assert_eq!(outcome.hits[0].merchant_id, "alpha");
        assert_eq!(outcome.hits[0].products.len(), 1);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].merchant_id, "beta");
        assert!(outcome.failures[0].error.contains("unreachable") || !outcome.failures[0].error.is_empty());
    }
}
