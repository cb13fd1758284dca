//! Model executor interface
//!
//! The composites never talk to a model directly; agent steps hand a rendered
//! prompt to a [`ModelExecutor`] and apply whatever the reply asks for. How a
//! reply is produced (remote API, canned script) is opaque to the pipeline.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::collections::VecDeque;
use thiserror::Error;
use tokio::sync::Mutex;

/// Errors that can occur while producing a model reply
#[derive(Error, Debug)]
pub enum ExecutorError {
    /// API key was missing or empty
    #[error("API key is empty")]
    EmptyApiKey,

    /// HTTP request could not be sent or completed
    #[error("Failed to reach model API: {0}")]
    Transport(String),

    /// Model API returned an error status
    #[error("Model API returned error status {status}: {body}")]
    Api { status: u16, body: String },

    /// Model API refused the prompt
    #[error("Model API blocked the prompt: {0}")]
    Blocked(String),

    /// Response body could not be parsed or contained no usable content
    #[error("Malformed model API response: {0}")]
    Malformed(String),

    /// Scripted executor had no reply queued for the agent
    #[error("No scripted reply queued for agent '{0}'")]
    ScriptExhausted(String),
}

/// Side effect a reply asks the pipeline to perform
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum AgentAction {
    /// Append a value to a state key (list-accumulating, never overwriting)
    AppendToState { key: String, value: String },
    /// Ask the nearest enclosing loop to stop after this iteration
    ExitLoop,
    /// Write a document to the pipeline's output directory
    WriteFile { filename: String, content: String },
}

/// Reply from a model executor: free text plus requested actions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentReply {
    /// The model's text output
    pub text: String,
    /// Tool-style actions the agent requested
    #[serde(default)]
    pub actions: Vec<AgentAction>,
}

impl AgentReply {
    /// Text-only reply with no actions
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            actions: Vec::new(),
        }
    }

    /// Attach an action to the reply
    pub fn with_action(mut self, action: AgentAction) -> Self {
        self.actions.push(action);
        self
    }
}

/// Produces a reply for a named agent given its rendered prompt
#[async_trait]
pub trait ModelExecutor: Send + Sync {
    /// Produce a reply for `agent_name` from the rendered `prompt`
    async fn reply(&self, agent_name: &str, prompt: &str) -> Result<AgentReply, ExecutorError>;
}

/// Executor that replays queued replies per agent
///
/// Used by tests and by the server when no API key is configured. Each call
/// pops the next queued reply for the agent; an empty queue is an error so a
/// mis-scripted test fails loudly instead of looping forever.
#[derive(Default)]
pub struct ScriptedExecutor {
    scripts: Mutex<HashMap<String, VecDeque<AgentReply>>>,
}

impl ScriptedExecutor {
    /// Create an executor with no queued replies
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply for an agent; calls replay in queue order
    pub async fn enqueue(&self, agent_name: impl Into<String>, reply: AgentReply) {
        self.scripts
            .lock()
            .await
            .entry(agent_name.into())
            .or_default()
            .push_back(reply);
    }

    /// Queue the same reply for every remaining call to an agent
    ///
    /// Implemented as a large finite queue; loops are bounded so this is
    /// indistinguishable from an infinite script.
    pub async fn enqueue_repeating(&self, agent_name: impl Into<String>, reply: AgentReply, copies: usize) {
        let mut scripts = self.scripts.lock().await;
        let queue = scripts.entry(agent_name.into()).or_default();
        for _ in 0..copies {
            queue.push_back(reply.clone());
        }
    }
}

#[async_trait]
impl ModelExecutor for ScriptedExecutor {
    async fn reply(&self, agent_name: &str, _prompt: &str) -> Result<AgentReply, ExecutorError> {
        self.scripts
            .lock()
            .await
            .get_mut(agent_name)
            .and_then(VecDeque::pop_front)
            .ok_or_else(|| ExecutorError::ScriptExhausted(agent_name.to_string()))
    }
}
