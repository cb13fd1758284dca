//! Parallel composite
//!
//! Runs all children concurrently against the same state store and joins
//! them before returning. Children are expected to write disjoint state keys;
//! that discipline is a caller obligation documented here, not something the
//! flow enforces. If several children fail, every failure is collected and
//! surfaced together rather than only the first.

use crate::workflow::error::WorkflowError;
use crate::workflow::state::StateStore;
use crate::workflow::step::{Step, StepHandle, StepOutcome};
use async_trait::async_trait;
use futures_util::future::join_all;

/// Composite that runs its children concurrently with a join-all barrier
pub struct ParallelFlow {
    name: String,
    children: Vec<StepHandle>,
}

impl ParallelFlow {
    /// Create a parallel flow over the given children
    ///
    /// Children must write disjoint state keys; the store does not arbitrate
    /// same-key writes from concurrent steps.
    pub fn new(name: impl Into<String>, children: Vec<StepHandle>) -> Self {
        Self {
            name: name.into(),
            children,
        }
    }
}

#[async_trait]
impl Step for ParallelFlow {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, state: &StateStore) -> Result<StepOutcome, WorkflowError> {
        tracing::debug!(flow = %self.name, children = self.children.len(), "Starting parallel flow");

        let handles: Vec<_> = self
            .children
            .iter()
            .map(|child| {
                let child = child.clone();
                let state = state.clone();
                tokio::spawn(async move {
                    let name = child.name().to_string();
                    (name, child.run(&state).await)
                })
            })
            .collect();

        let mut outcome = StepOutcome::Continue;
        let mut failures = Vec::new();

        for joined in join_all(handles).await {
            match joined {
                Ok((_, Ok(child_outcome))) => outcome = outcome.merge(child_outcome),
                Ok((child_name, Err(e))) => {
                    tracing::warn!(flow = %self.name, child = %child_name, error = %e, "Parallel child failed");
                    failures.push(format!("{}: {}", child_name, e));
                }
                Err(join_err) => {
                    tracing::error!(flow = %self.name, error = %join_err, "Parallel child task panicked");
                    failures.push(format!("task join error: {}", join_err));
                }
            }
        }

        if failures.is_empty() {
            Ok(outcome)
        } else {
            Err(WorkflowError::Parallel {
                path: self.name.clone(),
                failures,
            })
        }
    }
}
