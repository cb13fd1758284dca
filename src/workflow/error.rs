//! Workflow-specific error types
//!
//! Errors that can occur while running composites. Composites never swallow a
//! child error: sequential and loop flows propagate the first failure
//! immediately, parallel flows aggregate every failure and surface them
//! together. Each composite prepends its name on the way up so the final
//! error carries the full path to the failing step.

use thiserror::Error;

/// Errors raised while running a workflow
#[derive(Error, Debug)]
pub enum WorkflowError {
    /// A step could not complete; `path` names the composites leading to it
    #[error("Step '{path}' failed: {message}")]
    Step { path: String, message: String },

    /// A conditional's predicate raised instead of returning a boolean
    #[error("Predicate for '{path}' failed: {message}")]
    Predicate { path: String, message: String },

    /// One or more children of a parallel flow failed
    #[error("Parallel flow '{path}' had {} failed child(ren): {}", failures.len(), failures.join("; "))]
    Parallel {
        path: String,
        failures: Vec<String>,
    },
}

impl WorkflowError {
    /// Create a step failure rooted at a single step name
    pub fn step(name: impl Into<String>, message: impl Into<String>) -> Self {
        WorkflowError::Step {
            path: name.into(),
            message: message.into(),
        }
    }

    /// Prepend a composite name to the error's path
    pub fn through(self, name: &str) -> Self {
        match self {
            WorkflowError::Step { path, message } => WorkflowError::Step {
                path: format!("{}/{}", name, path),
                message,
            },
            WorkflowError::Predicate { path, message } => WorkflowError::Predicate {
                path: format!("{}/{}", name, path),
                message,
            },
            WorkflowError::Parallel { path, failures } => WorkflowError::Parallel {
                path: format!("{}/{}", name, path),
                failures,
            },
        }
    }

    /// The composite path this error travelled through
    pub fn path(&self) -> &str {
        match self {
            WorkflowError::Step { path, .. }
            | WorkflowError::Predicate { path, .. }
            | WorkflowError::Parallel { path, .. } => path,
        }
    }
}
