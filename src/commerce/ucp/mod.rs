//! Universal Commerce Protocol integration
//!
//! Typed client for merchant UCP endpoints and the registry that holds one
//! client per configured merchant.

pub mod client;
pub mod registry;
pub mod types;

pub use client::{UcpClient, UcpError};
pub use registry::{FanoutSearch, MerchantFailure, MerchantProducts, MerchantRegistry};
pub use types::{
    CheckoutItem, CheckoutSession, Discovery, Money, Product, RecommendationRequest, TrackedEvent,
    UCP_VERSION,
};
