//! Commerce layer
//!
//! Canned catalog data for the shopping endpoints and the UCP client stack
//! for talking to configured merchants.

pub mod catalog;
pub mod ucp;
