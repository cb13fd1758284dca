//! Pitch pipeline assembly
//!
//! Wires the pitch crew into the fixed two-level composition: a bounded
//! writers-room loop (research, draft, critique) followed by an approval
//! branch. Approval runs the preproduction analyses in parallel and then the
//! file writer; rejection hands the outline to the producer for a final
//! rewrite.

use crate::agents::agent::{AgentSpec, AgentStep};
use crate::agents::prompts::{self, keys};
use crate::llm::ModelExecutor;
use crate::workflow::{
    BoundedLoop, ConditionalFlow, LoopRun, ParallelFlow, Predicate, StateSnapshot, StateStore,
    Step, StepHandle, WorkflowError,
};
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;

/// Result of one end-to-end pitch pipeline run
#[derive(Debug, Serialize)]
pub struct PitchRun {
    /// Whether the critic signed off before the loop budget ran out
    pub approved: bool,
    /// How the writers-room loop terminated
    pub loop_run: LoopRun,
    /// Final pipeline state, keyed as in [`keys`]
    pub state: Value,
}

/// Predicate: the critic has no open notes
///
/// Total over every state shape. The key being absent means the critic never
/// ran, which counts as no pending feedback; otherwise the last entry decides,
/// so notes resolved in an earlier round do not block approval.
pub fn no_pending_feedback() -> Predicate {
    Arc::new(|snapshot: &StateSnapshot| {
        let approved = match snapshot.get(keys::CRITICAL_FEEDBACK) {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => verdict_is_clean(s),
            Some(Value::Array(items)) => items
                .last()
                .map_or(true, |last| last.as_str().is_some_and(verdict_is_clean)),
            Some(_) => false,
        };
        Ok(approved)
    })
}

fn verdict_is_clean(verdict: &str) -> bool {
    let trimmed = verdict.trim();
    trimmed.is_empty() || trimmed.contains(prompts::APPROVAL_PHRASE)
}

/// The full pitch workflow, built once and reusable across runs
pub struct PitchPipeline {
    writers_room: BoundedLoop,
    approval: ConditionalFlow,
}

impl PitchPipeline {
    /// Assemble the pipeline for the given executor and output directory
    ///
    /// # Arguments
    /// * `executor` - Produces every agent's reply; scripted or live
    /// * `output_dir` - Where the file writer saves the final pitch
    /// * `max_iterations` - Writers-room iteration cap
    pub fn new(
        executor: Arc<dyn ModelExecutor>,
        output_dir: PathBuf,
        max_iterations: u32,
    ) -> Self {
        let agent = |spec: AgentSpec| -> StepHandle {
            Arc::new(AgentStep::new(spec, executor.clone(), output_dir.clone()))
        };

        let researcher = agent(
            AgentSpec::new(
                "researcher",
                "Gathers factual background for the topic",
                prompts::RESEARCHER_INSTRUCTION,
            )
            .with_output_key(keys::RESEARCH),
        );
        let screenwriter = agent(
            AgentSpec::new(
                "screenwriter",
                "Drafts the plot outline, folding in feedback",
                prompts::SCREENWRITER_INSTRUCTION,
            )
            .with_output_key(keys::PLOT_OUTLINE),
        );
        let critic = agent(
            AgentSpec::new(
                "critic",
                "Reviews the outline; approves or lists notes",
                prompts::CRITIC_INSTRUCTION,
            )
            .with_output_key(keys::CRITICAL_FEEDBACK),
        );

        let writers_room = BoundedLoop::new(
            "writers_room",
            vec![researcher, screenwriter, critic],
            max_iterations,
        );

        // Preproduction analyses write disjoint keys, which is what makes
        // them safe to run in parallel against the shared store.
        let preproduction: StepHandle = Arc::new(ParallelFlow::new(
            "preproduction",
            vec![
                agent(
                    AgentSpec::new(
                        "box_office_analyst",
                        "Estimates commercial prospects",
                        prompts::BOX_OFFICE_INSTRUCTION,
                    )
                    .with_output_key(keys::BOX_OFFICE_REPORT),
                ),
                agent(
                    AgentSpec::new(
                        "casting_director",
                        "Suggests a lead cast",
                        prompts::CASTING_INSTRUCTION,
                    )
                    .with_output_key(keys::CASTING_REPORT),
                ),
                agent(
                    AgentSpec::new(
                        "line_producer",
                        "Costs an Indian production",
                        prompts::LINE_PRODUCER_INSTRUCTION,
                    )
                    .with_output_key(keys::BUDGET_ESTIMATE),
                ),
            ],
        ));

        let file_writer = agent(AgentSpec::new(
            "file_writer",
            "Saves the assembled pitch document",
            prompts::FILE_WRITER_INSTRUCTION,
        ));

        let producer = agent(
            AgentSpec::new(
                "producer",
                "Rewrites the outline when notes are still open",
                prompts::PRODUCER_INSTRUCTION,
            )
            .with_output_key(keys::PLOT_OUTLINE),
        );

        let approval = ConditionalFlow::new(
            "approval",
            no_pending_feedback(),
            vec![preproduction, file_writer],
            vec![producer],
        );

        Self {
            writers_room,
            approval,
        }
    }

    /// Run the pipeline for one topic on a fresh state store
    pub async fn run(&self, topic: &str) -> Result<PitchRun, WorkflowError> {
        let state = StateStore::new();
        state.set(keys::PROMPT, topic).await;

        tracing::info!(topic = %topic, "Pitch pipeline starting");
        let loop_run = self.writers_room.run_loop(&state).await?;

        let approved = (no_pending_feedback())(&state.snapshot().await)
            .map_err(|e| WorkflowError::Predicate {
                path: "approval".to_string(),
                message: e.to_string(),
            })?;

        self.approval.run(&state).await?;

        tracing::info!(
            approved = approved,
            iterations = loop_run.iterations,
            "Pitch pipeline finished"
        );
        Ok(PitchRun {
            approved,
            loop_run,
            state: state.snapshot().await.into_json(),
        })
    }
}
