//! Sequential composite
//!
//! Runs an ordered list of steps one after another against the same state
//! store. Later children observe mutations made by earlier ones. Fail-fast:
//! the first child error aborts the flow and propagates with this flow's
//! name prepended to the path.

use crate::workflow::error::WorkflowError;
use crate::workflow::state::StateStore;
use crate::workflow::step::{Step, StepHandle, StepOutcome};
use async_trait::async_trait;

/// Composite that runs its children in list order
pub struct SequentialFlow {
    name: String,
    children: Vec<StepHandle>,
}

impl SequentialFlow {
    /// Create a sequential flow over the given children
    pub fn new(name: impl Into<String>, children: Vec<StepHandle>) -> Self {
        Self {
            name: name.into(),
            children,
        }
    }

    /// Run a child list in order on behalf of a named composite
    ///
    /// Shared with the conditional flow, which behaves as a sequential flow
    /// over whichever branch its predicate selected. An exit request from any
    /// child does not stop the remaining children; it is merged and forwarded
    /// once the list completes.
    pub(crate) async fn run_children(
        name: &str,
        children: &[StepHandle],
        state: &StateStore,
    ) -> Result<StepOutcome, WorkflowError> {
        let mut outcome = StepOutcome::Continue;
        for child in children {
            tracing::debug!(flow = %name, child = %child.name(), "Running child step");
            let child_outcome = child.run(state).await.map_err(|e| e.through(name))?;
            outcome = outcome.merge(child_outcome);
        }
        Ok(outcome)
    }
}

#[async_trait]
impl Step for SequentialFlow {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, state: &StateStore) -> Result<StepOutcome, WorkflowError> {
        Self::run_children(&self.name, &self.children, state).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::step::FnStep;
    use serde_json::json;
    use std::sync::Arc;

    fn append_step(name: &str, value: &str) -> StepHandle {
        let value = value.to_string();
        Arc::new(FnStep::new(name, move |state: StateStore| {
            let value = value.clone();
            async move {
                state.append("trace", value).await;
                Ok(StepOutcome::Continue)
            }
        }))
    }

    fn failing_step(name: &str) -> StepHandle {
        let name_owned = name.to_string();
        Arc::new(FnStep::new(name, move |_state: StateStore| {
            let name = name_owned.clone();
            async move { Err(WorkflowError::step(name, "boom")) }
        }))
    }

    #[tokio::test]
    async fn test_children_run_in_order() {
        let flow = SequentialFlow::new(
            "team",
            vec![append_step("a", "a"), append_step("b", "b"), append_step("c", "c")],
        );
        let state = StateStore::new();

        let outcome = flow.run(&state).await.unwrap();

        assert_eq!(outcome, StepOutcome::Continue);
        assert_eq!(state.get("trace").await, Some(json!(["a", "b", "c"])));
    }

    #[tokio::test]
    async fn test_fail_fast_skips_later_children() {
        let flow = SequentialFlow::new(
            "team",
            vec![append_step("a", "a"), failing_step("bad"), append_step("c", "c")],
        );
        let state = StateStore::new();

        let err = flow.run(&state).await.unwrap_err();

        assert_eq!(err.path(), "team/bad");
        // The third child never ran, so its write is absent.
        assert_eq!(state.get("trace").await, Some(json!(["a"])));
    }

    #[tokio::test]
    async fn test_exit_request_does_not_interrupt_iteration() {
        let exit_step: StepHandle = Arc::new(FnStep::new("critic", |state: StateStore| async move {
            state.append("trace", "critic").await;
            Ok(StepOutcome::RequestExit)
        }));
        let flow = SequentialFlow::new("team", vec![exit_step, append_step("after", "after")]);
        let state = StateStore::new();

        let outcome = flow.run(&state).await.unwrap();

        // The exit request is forwarded, but the later child still ran.
        assert_eq!(outcome, StepOutcome::RequestExit);
        assert_eq!(state.get("trace").await, Some(json!(["critic", "after"])));
    }
}
