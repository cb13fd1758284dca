//! Agent layer
//!
//! Agent specs and the step that runs them, the instruction templates, and
//! the two concrete flows: the pitch pipeline and the shopping assistant.

pub mod agent;
pub mod pitch;
pub mod prompts;
pub mod shopping;

pub use agent::{AgentSpec, AgentStep};
pub use pitch::{PitchPipeline, PitchRun};
pub use shopping::{ShoppingAnswer, ShoppingAssistant};

use crate::llm::{AgentAction, AgentReply, ScriptedExecutor};
use std::sync::Arc;

/// Fallback executor for deployments without a model API key
///
/// Seeds enough canned replies to drive the pipeline end to end through the
/// approval branch. The queues are finite; a long-lived server without an API
/// key will eventually exhaust them and pitch runs will start failing.
pub async fn demo_executor() -> Arc<ScriptedExecutor> {
    const COPIES: usize = 64;
    let executor = ScriptedExecutor::new();

    executor
        .enqueue_repeating(
            "researcher",
            AgentReply::text("Note: comparable films in this genre opened strongly in spring."),
            COPIES,
        )
        .await;
    executor
        .enqueue_repeating(
            "screenwriter",
            AgentReply::text(
                "Act I: an unlikely hero is pulled in. Act II: the plan unravels. Act III: a costly victory.",
            ),
            COPIES,
        )
        .await;
    executor
        .enqueue_repeating(
            "critic",
            AgentReply::text(prompts::APPROVAL_PHRASE).with_action(AgentAction::ExitLoop),
            COPIES,
        )
        .await;
    executor
        .enqueue_repeating(
            "box_office_analyst",
            AgentReply::text("Mid-budget audience, projected opening in the 20-30M range."),
            COPIES,
        )
        .await;
    executor
        .enqueue_repeating(
            "casting_director",
            AgentReply::text("Two established leads and a breakout supporting cast."),
            COPIES,
        )
        .await;
    executor
        .enqueue_repeating(
            "line_producer",
            AgentReply::text("Estimated INR 45 crore across cast, crew, locations, and post."),
            COPIES,
        )
        .await;
    executor
        .enqueue_repeating(
            "producer",
            AgentReply::text("Rewritten outline resolving the open notes."),
            COPIES,
        )
        .await;
    executor
        .enqueue_repeating(
            "file_writer",
            AgentReply::text("Saved the pitch document.").with_action(AgentAction::WriteFile {
                filename: "final_pitch.md".to_string(),
                content: "# Final Pitch\n\nAssembled from the demo run.".to_string(),
            }),
            COPIES,
        )
        .await;
    executor
        .enqueue_repeating(
            "shopping_assistant",
            AgentReply::text("Here is what the registered merchants returned for your search."),
            COPIES,
        )
        .await;

    Arc::new(executor)
}
