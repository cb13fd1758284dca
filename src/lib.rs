//! Agent workflow backend
//!
//! Composes prompt-driven agents into fixed pipelines (sequential, parallel,
//! bounded loop, conditional) behind an HTTP API. Ships two concrete flows:
//! the movie-pitch pipeline and a shopping assistant backed by a merchant
//! registry speaking the Universal Commerce Protocol.

pub mod agents;
pub mod api;
pub mod commerce;
pub mod config;
pub mod error;
pub mod llm;
pub mod tools;
pub mod workflow;
