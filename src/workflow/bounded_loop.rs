//! Bounded loop composite
//!
//! Re-runs an ordered child sequence until a child requests exit or the
//! iteration cap is reached. The cap makes a generate → critique → revise
//! cycle safe to run unattended: critique approval is a best-effort judgment
//! with no convergence guarantee, so an upper bound is mandatory.

use crate::workflow::error::WorkflowError;
use crate::workflow::sequential::SequentialFlow;
use crate::workflow::state::StateStore;
use crate::workflow::step::{Step, StepHandle, StepOutcome};
use async_trait::async_trait;
use serde::Serialize;

/// Why a bounded loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopTermination {
    /// A child raised the exit signal; the iteration it ran in completed
    Exited,
    /// The iteration cap was reached without an exit signal
    ///
    /// This is a normal completion, not an error: the pipeline continues with
    /// whatever state exists.
    Exhausted,
}

/// Completed loop run: how it ended and how many iterations ran
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoopRun {
    pub termination: LoopTermination,
    pub iterations: u32,
}

/// Composite that repeats its children up to `max_iterations` times
pub struct BoundedLoop {
    name: String,
    children: Vec<StepHandle>,
    max_iterations: u32,
}

impl BoundedLoop {
    /// Create a bounded loop over the given children
    pub fn new(name: impl Into<String>, children: Vec<StepHandle>, max_iterations: u32) -> Self {
        Self {
            name: name.into(),
            children,
            max_iterations,
        }
    }

    /// Run the loop and report how it terminated
    ///
    /// Each iteration runs the full child sequence in order. An exit request
    /// raised mid-iteration never interrupts the iteration; it is observed
    /// once the sequence completes, after which no further iteration starts.
    pub async fn run_loop(&self, state: &StateStore) -> Result<LoopRun, WorkflowError> {
        for iteration in 1..=self.max_iterations {
            tracing::debug!(
                flow = %self.name,
                iteration = iteration,
                max_iterations = self.max_iterations,
                "Loop iteration starting"
            );

            let outcome = SequentialFlow::run_children(&self.name, &self.children, state).await?;

            if outcome == StepOutcome::RequestExit {
                tracing::info!(flow = %self.name, iterations = iteration, "Loop exited on signal");
                return Ok(LoopRun {
                    termination: LoopTermination::Exited,
                    iterations: iteration,
                });
            }
        }

        tracing::info!(
            flow = %self.name,
            iterations = self.max_iterations,
            "Loop exhausted its iteration budget"
        );
        Ok(LoopRun {
            termination: LoopTermination::Exhausted,
            iterations: self.max_iterations,
        })
    }
}

#[async_trait]
impl Step for BoundedLoop {
    fn name(&self) -> &str {
        &self.name
    }

    /// Run as a step; the exit signal is consumed here, never re-raised
    async fn run(&self, state: &StateStore) -> Result<StepOutcome, WorkflowError> {
        self.run_loop(state).await?;
        Ok(StepOutcome::Continue)
    }
}
