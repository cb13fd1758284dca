//! Integration tests for the pitch workflow end to end
//!
//! These tests drive the full pipeline with a scripted executor:
//! 1. Writers-room loop exiting on approval vs exhausting its budget
//! 2. Conditional branch selection from the critic's verdict
//! 3. Parallel preproduction writes landing on disjoint keys
//! 4. Error propagation with composite-name paths

use agent_workflow_backend::agents::pitch::no_pending_feedback;
use agent_workflow_backend::agents::prompts::{keys, APPROVAL_PHRASE};
use agent_workflow_backend::agents::PitchPipeline;
use agent_workflow_backend::llm::{AgentAction, AgentReply, ScriptedExecutor};
use agent_workflow_backend::workflow::{LoopTermination, StateStore, WorkflowError};
use std::sync::Arc;
use tempfile::tempdir;

fn approval() -> AgentReply {
    AgentReply::text(APPROVAL_PHRASE).with_action(AgentAction::ExitLoop)
}

/// Scripts a crew where the critic rejects `rejections` times, then approves.
async fn crew(rejections: usize) -> Arc<ScriptedExecutor> {
    let executor = Arc::new(ScriptedExecutor::new());
    let rounds = rejections + 1;
    executor
        .enqueue_repeating("researcher", AgentReply::text("Background note."), rounds)
        .await;
    for round in 0..rounds {
        executor
            .enqueue(
                "screenwriter",
                AgentReply::text(format!("Outline v{}.", round + 1)),
            )
            .await;
    }
    for note in 0..rejections {
        executor
            .enqueue("critic", AgentReply::text(format!("1. Note {}.", note + 1)))
            .await;
    }
    executor.enqueue("critic", approval()).await;
    executor
        .enqueue("box_office_analyst", AgentReply::text("Box office report."))
        .await;
    executor
        .enqueue("casting_director", AgentReply::text("Casting report."))
        .await;
    executor
        .enqueue("line_producer", AgentReply::text("Budget estimate."))
        .await;
    executor
        .enqueue(
            "file_writer",
            AgentReply::text("Saved.").with_action(AgentAction::WriteFile {
                filename: "final_pitch.md".to_string(),
                content: "# Final Pitch\n\nOutline and reports.".to_string(),
            }),
        )
        .await;
    executor
}

#[tokio::test]
async fn test_approval_on_third_round_exits_loop_early() {
    let dir = tempdir().unwrap();
    let pipeline = PitchPipeline::new(crew(2).await, dir.path().to_path_buf(), 5);

    let run = pipeline.run("a chess prodigy in exile").await.unwrap();

    // Exit signal on round 3 of a cap of 5.
    assert!(run.approved);
    assert_eq!(run.loop_run.termination, LoopTermination::Exited);
    assert_eq!(run.loop_run.iterations, 3);

    // Every round's draft accumulated; nothing was overwritten.
    let outlines = run.state.get(keys::PLOT_OUTLINE).unwrap().as_array().unwrap();
    assert_eq!(outlines.len(), 3);
    assert_eq!(outlines[0], "Outline v1.");
    assert_eq!(outlines[2], "Outline v3.");

    // The parallel analyses wrote their disjoint keys.
    for key in [
        keys::BOX_OFFICE_REPORT,
        keys::CASTING_REPORT,
        keys::BUDGET_ESTIMATE,
    ] {
        assert!(run.state.get(key).is_some(), "missing {key}");
    }

    let saved = std::fs::read_to_string(dir.path().join("final_pitch.md")).unwrap();
    assert!(saved.starts_with("# Final Pitch"));
}

#[tokio::test]
async fn test_budget_exhaustion_is_not_an_error_and_takes_rejection_branch() {
    let dir = tempdir().unwrap();
    let executor = Arc::new(ScriptedExecutor::new());
    executor
        .enqueue_repeating("researcher", AgentReply::text("Note."), 5)
        .await;
    executor
        .enqueue_repeating("screenwriter", AgentReply::text("Draft."), 5)
        .await;
    executor
        .enqueue_repeating("critic", AgentReply::text("1. Unresolved."), 5)
        .await;
    executor
        .enqueue("producer", AgentReply::text("Producer's final rewrite."))
        .await;
    let pipeline = PitchPipeline::new(executor, dir.path().to_path_buf(), 5);

    let run = pipeline.run("a lighthouse mystery").await.unwrap();

    assert!(!run.approved);
    assert_eq!(run.loop_run.termination, LoopTermination::Exhausted);
    assert_eq!(run.loop_run.iterations, 5);

    // Rejection branch ran; the preproduction branch never did.
    assert!(run.state.get(keys::BOX_OFFICE_REPORT).is_none());
    assert!(run.state.get(keys::CASTING_REPORT).is_none());
    assert!(!dir.path().join("final_pitch.md").exists());

    let outlines = run.state.get(keys::PLOT_OUTLINE).unwrap().as_array().unwrap();
    assert_eq!(outlines.last().unwrap(), "Producer's final rewrite.");
}

#[tokio::test]
async fn test_predicate_reevaluates_across_activations() {
    let predicate = no_pending_feedback();
    let state = StateStore::new();

    assert!(predicate(&state.snapshot().await).unwrap());

    state.append(keys::CRITICAL_FEEDBACK, "1. Open note.").await;
    assert!(!predicate(&state.snapshot().await).unwrap());

    state.append(keys::CRITICAL_FEEDBACK, APPROVAL_PHRASE).await;
    assert!(predicate(&state.snapshot().await).unwrap());
}

#[tokio::test]
async fn test_failing_agent_reports_composite_path() {
    let dir = tempdir().unwrap();
    // Researcher has a script; screenwriter does not, so its first call fails.
    let executor = Arc::new(ScriptedExecutor::new());
    executor
        .enqueue("researcher", AgentReply::text("Note."))
        .await;
    let pipeline = PitchPipeline::new(executor, dir.path().to_path_buf(), 5);

    let err = pipeline.run("doomed from the start").await.unwrap_err();

    match err {
        WorkflowError::Step { path, .. } => assert_eq!(path, "writers_room/screenwriter"),
        other => panic!("Expected Step error, got: {:?}", other),
    }
}

#[tokio::test]
async fn test_parallel_analysis_failure_is_aggregated_with_names() {
    let dir = tempdir().unwrap();
    let executor = Arc::new(ScriptedExecutor::new());
    executor
        .enqueue("researcher", AgentReply::text("Note."))
        .await;
    executor
        .enqueue("screenwriter", AgentReply::text("Draft."))
        .await;
    executor.enqueue("critic", approval()).await;
    // Only two of the three analysts have scripts; the line producer fails.
    executor
        .enqueue("box_office_analyst", AgentReply::text("Report."))
        .await;
    executor
        .enqueue("casting_director", AgentReply::text("Report."))
        .await;
    let pipeline = PitchPipeline::new(executor, dir.path().to_path_buf(), 5);

    let err = pipeline.run("an opera in space").await.unwrap_err();

    match err {
        WorkflowError::Parallel { path, failures } => {
            // The parallel failure surfaces through the approval branch path.
            assert_eq!(path, "approval/preproduction");
            assert_eq!(failures.len(), 1);
            assert!(failures[0].contains("line_producer"));
        }
        other => panic!("Expected parallel failure, got: {:?}", other),
    }
}
