//! Model execution layer
//!
//! The [`ModelExecutor`] trait, a scripted implementation for tests and
//! key-less deployments, and the Gemini HTTP client.

pub mod api_client;
pub mod executor;
pub mod gemini_types;

pub use api_client::GeminiClient;
pub use executor::{AgentAction, AgentReply, ExecutorError, ModelExecutor, ScriptedExecutor};
