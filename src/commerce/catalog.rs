//! Canned catalog data
//!
//! Recommendation and trending data served from fixed in-memory tables, plus
//! interaction logging. Stands in for a real catalog service so the shopping
//! endpoints work without any merchant integration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Largest number of trending products a single query may return
pub const MAX_TRENDING_LIMIT: usize = 50;

#[derive(Error, Debug)]
pub enum CatalogError {
    /// Interaction type was not one of the recognized kinds
    #[error("Invalid interaction type '{0}'; expected one of view, click, purchase, add_to_cart, wishlist")]
    InvalidInteraction(String),
}

/// A personalized product recommendation
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub product_id: String,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub reason: String,
}

/// A product currently trending in the catalog
#[derive(Debug, Clone, Serialize)]
pub struct TrendingProduct {
    pub product_id: String,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub trend_score: f64,
}

/// Recognized user-interaction kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    View,
    Click,
    Purchase,
    AddToCart,
    Wishlist,
}

impl FromStr for InteractionKind {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "view" => Ok(Self::View),
            "click" => Ok(Self::Click),
            "purchase" => Ok(Self::Purchase),
            "add_to_cart" => Ok(Self::AddToCart),
            "wishlist" => Ok(Self::Wishlist),
            other => Err(CatalogError::InvalidInteraction(other.to_string())),
        }
    }
}

/// A logged user interaction with a product
#[derive(Debug, Clone, Serialize)]
pub struct InteractionRecord {
    pub user_id: String,
    pub product_id: String,
    pub kind: InteractionKind,
    pub logged_at: DateTime<Utc>,
}

fn recommendation(
    product_id: &str,
    name: &str,
    category: &str,
    price: f64,
    reason: &str,
) -> Recommendation {
    Recommendation {
        product_id: product_id.to_string(),
        name: name.to_string(),
        category: category.to_string(),
        price,
        reason: reason.to_string(),
    }
}

/// Recommendations for a user
///
/// The table is fixed; `user_id` only personalizes the reason strings.
pub fn recommendations_for(user_id: &str) -> Vec<Recommendation> {
    tracing::debug!(user_id = %user_id, "Serving canned recommendations");
    vec![
        recommendation(
            "P001",
            "Noise-Cancelling Headphones",
            "electronics",
            199.99,
            "Popular with users who browsed audio gear",
        ),
        recommendation(
            "P002",
            "Espresso Grinder",
            "kitchen",
            89.50,
            "Frequently bought after coffee-maker views",
        ),
        recommendation(
            "P003",
            "Trail Running Shoes",
            "sports",
            129.00,
            "Top rated in your region",
        ),
        recommendation(
            "P004",
            "Mechanical Keyboard",
            "electronics",
            149.99,
            "Matches your recent electronics purchases",
        ),
        recommendation(
            "P005",
            "Insulated Water Bottle",
            "sports",
            34.95,
            "Often added alongside sportswear",
        ),
    ]
}

fn trending_product(
    product_id: &str,
    name: &str,
    category: &str,
    price: f64,
    trend_score: f64,
) -> TrendingProduct {
    TrendingProduct {
        product_id: product_id.to_string(),
        name: name.to_string(),
        category: category.to_string(),
        price,
        trend_score,
    }
}

/// Trending products, optionally filtered by category
///
/// `limit` is clamped to [`MAX_TRENDING_LIMIT`]; a limit of zero returns an
/// empty list.
pub fn trending(category: Option<&str>, limit: usize) -> Vec<TrendingProduct> {
    let limit = limit.min(MAX_TRENDING_LIMIT);
    let all = vec![
        trending_product("T001", "Smart Fitness Band", "electronics", 79.99, 0.97),
        trending_product("T002", "Cold Brew Maker", "kitchen", 44.00, 0.93),
        trending_product("T003", "Yoga Mat Pro", "sports", 58.25, 0.91),
        trending_product("T004", "Portable Projector", "electronics", 229.00, 0.88),
        trending_product("T005", "Cast Iron Skillet", "kitchen", 39.90, 0.85),
    ];

    all.into_iter()
        .filter(|p| category.map_or(true, |c| p.category.eq_ignore_ascii_case(c)))
        .take(limit)
        .collect()
}

/// Validate and record a user interaction
///
/// The record is returned to the caller rather than persisted; there is no
/// storage behind the catalog.
pub fn log_interaction(
    user_id: &str,
    product_id: &str,
    interaction_type: &str,
) -> Result<InteractionRecord, CatalogError> {
    let kind = interaction_type.parse::<InteractionKind>()?;
    let record = InteractionRecord {
        user_id: user_id.to_string(),
        product_id: product_id.to_string(),
        kind,
        logged_at: Utc::now(),
    };
    tracing::info!(
        user_id = %record.user_id,
        product_id = %record.product_id,
        kind = ?record.kind,
        "Interaction logged"
    );
    Ok(record)
}
