//! Step trait and outcomes
//!
//! A step is the atomic unit of work in a pipeline: it reads and writes the
//! shared state store and reports whether the enclosing loop (if any) should
//! stop after the current iteration. Composites implement this same trait so
//! flows nest freely.

use crate::workflow::error::WorkflowError;
use crate::workflow::state::StateStore;
use async_trait::async_trait;
use std::sync::Arc;

/// What a step asks of its surroundings after running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Normal completion; the pipeline proceeds
    Continue,
    /// Early-exit request for the nearest enclosing loop
    ///
    /// The signal never interrupts the current iteration: sequential flows
    /// finish their remaining children first, then forward the request.
    RequestExit,
}

impl StepOutcome {
    /// Combine two outcomes; an exit request from either side wins
    pub fn merge(self, other: StepOutcome) -> StepOutcome {
        if self == StepOutcome::RequestExit || other == StepOutcome::RequestExit {
            StepOutcome::RequestExit
        } else {
            StepOutcome::Continue
        }
    }
}

/// Atomic unit of work in a pipeline
///
/// Implementations must be cheap to share (`Arc<dyn Step>`) because parallel
/// flows clone handles into spawned tasks.
#[async_trait]
pub trait Step: Send + Sync {
    /// Name used in logs and error paths
    fn name(&self) -> &str;

    /// Run the step against the shared state store
    async fn run(&self, state: &StateStore) -> Result<StepOutcome, WorkflowError>;
}

/// Convenience alias for a shared step handle
pub type StepHandle = Arc<dyn Step>;

/// Step built from an async closure, mostly for tests and small glue steps
pub struct FnStep<F> {
    name: String,
    body: F,
}

impl<F, Fut> FnStep<F>
where
    F: Fn(StateStore) -> Fut + Send + Sync,
    Fut: std::future::Future<Output = Result<StepOutcome, WorkflowError>> + Send,
{
    /// Wrap an async closure as a step
    pub fn new(name: impl Into<String>, body: F) -> Self {
        Self {
            name: name.into(),
            body,
        }
    }
}

#[async_trait]
impl<F, Fut> Step for FnStep<F>
where
    F: Fn(StateStore) -> Fut + Send + Sync,
    Fut: std::future::Future<Output = Result<StepOutcome, WorkflowError>> + Send,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, state: &StateStore) -> Result<StepOutcome, WorkflowError> {
        (self.body)(state.clone()).await
    }
}
