//! Conditional composite
//!
//! A two-way branch over otherwise linear composites. On every activation the
//! predicate is evaluated exactly once against a fresh state snapshot, then
//! exactly one of the two fixed branch lists runs as a sequential flow. The
//! branches are immutable fields of the composite, never a reassigned child
//! list, so nesting the same instance inside a loop re-evaluates the
//! predicate each pass instead of replaying a stale selection.

use crate::workflow::error::WorkflowError;
use crate::workflow::sequential::SequentialFlow;
use crate::workflow::state::{StateSnapshot, StateStore};
use crate::workflow::step::{Step, StepHandle, StepOutcome};
use async_trait::async_trait;
use std::sync::Arc;

/// Error raised by a predicate instead of a boolean
///
/// Predicates should be total over every shape the state store can take
/// (treat "key absent" as falsy rather than raising); this type exists for
/// the ones that are not.
#[derive(Debug, Clone)]
pub struct PredicateError(pub String);

impl std::fmt::Display for PredicateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Pure boolean function over a state snapshot
pub type Predicate = Arc<dyn Fn(&StateSnapshot) -> Result<bool, PredicateError> + Send + Sync>;

/// Composite that dispatches to one of two fixed branch lists
pub struct ConditionalFlow {
    name: String,
    predicate: Predicate,
    if_true: Vec<StepHandle>,
    if_false: Vec<StepHandle>,
}

impl ConditionalFlow {
    /// Create a conditional flow
    ///
    /// `if_true` runs when the predicate holds, `if_false` otherwise; the
    /// unselected branch is never touched.
    pub fn new(
        name: impl Into<String>,
        predicate: Predicate,
        if_true: Vec<StepHandle>,
        if_false: Vec<StepHandle>,
    ) -> Self {
        Self {
            name: name.into(),
            predicate,
            if_true,
            if_false,
        }
    }
}

#[async_trait]
impl Step for ConditionalFlow {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, state: &StateStore) -> Result<StepOutcome, WorkflowError> {
        let snapshot = state.snapshot().await;

        // Evaluated exactly once per activation, with no caching across
        // activations. A failing predicate aborts before either branch runs.
        let selected = (self.predicate)(&snapshot).map_err(|e| WorkflowError::Predicate {
            path: self.name.clone(),
            message: e.to_string(),
        })?;

        let branch = if selected { &self.if_true } else { &self.if_false };
        tracing::info!(
            flow = %self.name,
            predicate = selected,
            branch_len = branch.len(),
            "Conditional branch selected"
        );

        SequentialFlow::run_children(&self.name, branch, state).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::step::FnStep;
    use serde_json::json;

    fn marker_step(name: &'static str) -> StepHandle {
        Arc::new(FnStep::new(name, move |state: StateStore| async move {
            state.append("ran", name).await;
            Ok(StepOutcome::Continue)
        }))
    }

    fn feedback_is_empty() -> Predicate {
        Arc::new(|snapshot: &StateSnapshot| Ok(snapshot.is_blank("feedback")))
    }

    #[tokio::test]
    async fn test_true_branch_runs_exclusively() {
        let flow = ConditionalFlow::new(
            "approval",
            feedback_is_empty(),
            vec![marker_step("finalize")],
            vec![marker_step("revise")],
        );
        let state = StateStore::new();

        flow.run(&state).await.unwrap();

        assert_eq!(state.get("ran").await, Some(json!(["finalize"])));
    }

    #[tokio::test]
    async fn test_false_branch_runs_exclusively() {
        let flow = ConditionalFlow::new(
            "approval",
            feedback_is_empty(),
            vec![marker_step("finalize")],
            vec![marker_step("revise")],
        );
        let state = StateStore::new();
        state.append("feedback", "needs work").await;

        flow.run(&state).await.unwrap();

        assert_eq!(state.get("ran").await, Some(json!(["revise"])));
    }

    #[tokio::test]
    async fn test_reactivation_reevaluates_predicate() {
        let flow = ConditionalFlow::new(
            "approval",
            feedback_is_empty(),
            vec![marker_step("finalize")],
            vec![marker_step("revise")],
        );
        let state = StateStore::new();

        // First activation: no feedback, true branch.
        flow.run(&state).await.unwrap();
        assert_eq!(state.get("ran").await, Some(json!(["finalize"])));

        // State changes between activations; the same instance must pick the
        // other branch, not reuse its prior selection.
        state.append("feedback", "x").await;
        flow.run(&state).await.unwrap();
        assert_eq!(state.get("ran").await, Some(json!(["finalize", "revise"])));
    }

    #[tokio::test]
    async fn test_predicate_failure_runs_neither_branch() {
        let raising: Predicate =
            Arc::new(|_snapshot: &StateSnapshot| Err(PredicateError("missing key".to_string())));
        let flow = ConditionalFlow::new(
            "approval",
            raising,
            vec![marker_step("finalize")],
            vec![marker_step("revise")],
        );
        let state = StateStore::new();

        let err = flow.run(&state).await.unwrap_err();

        match &err {
            WorkflowError::Predicate { path, message } => {
                assert_eq!(path, "approval");
                assert!(message.contains("missing key"));
            }
            other => panic!("Expected Predicate error, got: {:?}", other),
        }
        assert_eq!(state.get("ran").await, None);
    }

    #[tokio::test]
    async fn test_branch_error_carries_conditional_name() {
        let failing: StepHandle = Arc::new(FnStep::new("producer", |_state: StateStore| async move {
            Err(WorkflowError::step("producer", "walked out"))
        }));
        let flow = ConditionalFlow::new(
            "approval",
            Arc::new(|_s: &StateSnapshot| Ok(false)),
            vec![],
            vec![failing],
        );

        let err = flow.run(&StateStore::new()).await.unwrap_err();

        assert_eq!(err.path(), "approval/producer");
    }

    #[tokio::test]
    async fn test_exit_request_forwarded_from_branch() {
        let exiting: StepHandle = Arc::new(FnStep::new("critic", |_state: StateStore| async move {
            Ok(StepOutcome::RequestExit)
        }));
        let flow = ConditionalFlow::new(
            "approval",
            Arc::new(|_s: &StateSnapshot| Ok(true)),
            vec![exiting],
            vec![],
        );

        let outcome = flow.run(&StateStore::new()).await.unwrap();
        assert_eq!(outcome, StepOutcome::RequestExit);
    }
}
