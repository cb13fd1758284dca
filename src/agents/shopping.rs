//! Shopping assistant
//!
//! Answers a shopper's question by fanning a catalog search out across the
//! registered merchants and handing the results to a model-backed assistant
//! step for a grounded summary.

use crate::agents::agent::{AgentSpec, AgentStep};
use crate::agents::prompts;
use crate::commerce::ucp::MerchantRegistry;
use crate::llm::ModelExecutor;
use crate::workflow::{FnStep, SequentialFlow, StateStore, Step, StepHandle, StepOutcome, WorkflowError};
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;

const SEARCH_LIMIT: usize = 10;
const RESULTS_KEY: &str = "catalog_results";
const ANSWER_KEY: &str = "assistant_answer";

/// Assistant reply plus the raw search evidence it was grounded on
#[derive(Debug, Serialize)]
pub struct ShoppingAnswer {
    pub answer: String,
    pub results: Value,
}

/// The shopping assistant flow: search step followed by a summarizing agent
pub struct ShoppingAssistant {
    registry: Arc<MerchantRegistry>,
    executor: Arc<dyn ModelExecutor>,
    output_dir: PathBuf,
}

impl ShoppingAssistant {
    pub fn new(
        registry: Arc<MerchantRegistry>,
        executor: Arc<dyn ModelExecutor>,
        output_dir: PathBuf,
    ) -> Self {
        Self {
            registry,
            executor,
            output_dir,
        }
    }

    /// Answer one shopper question on a fresh state store
    pub async fn ask(&self, question: &str) -> Result<ShoppingAnswer, WorkflowError> {
        let registry = self.registry.clone();
        let query = question.to_string();
        let search_step: StepHandle = Arc::new(FnStep::new("catalog_search", move |state: StateStore| {
            let registry = registry.clone();
            let query = query.clone();
            async move {
                let outcome = registry.search_all(&query, Some(SEARCH_LIMIT)).await;
                let rendered = serde_json::to_value(&outcome)
                    .map_err(|e| WorkflowError::step("catalog_search", e.to_string()))?;
                state.set(RESULTS_KEY, rendered.to_string()).await;
                state.set("search_evidence", rendered).await;
                Ok(StepOutcome::Continue)
            }
        }));

        let assistant: StepHandle = Arc::new(AgentStep::new(
            AgentSpec::new(
                "shopping_assistant",
                "Summarizes catalog results for the shopper",
                prompts::SHOPPING_ASSISTANT_INSTRUCTION,
            )
            .with_output_key(ANSWER_KEY),
            self.executor.clone(),
            self.output_dir.clone(),
        ));

        let state = StateStore::new();
        SequentialFlow::new("shopping", vec![search_step, assistant])
            .run(&state)
            .await?;

        let snapshot = state.snapshot().await;
        Ok(ShoppingAnswer {
            answer: snapshot.render(ANSWER_KEY),
            results: snapshot
                .get("search_evidence")
                .cloned()
                .unwrap_or(Value::Null),
        })
    }
}
