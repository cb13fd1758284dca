//! Agent step
//!
//! An agent is an atomic step whose work is one model call: render the
//! instruction against the current state, hand the prompt to the executor,
//! then apply the reply (append text to the output key, perform any requested
//! actions). Agents never see each other; collaboration happens entirely
//! through state keys.

use crate::llm::{AgentAction, ModelExecutor};
use crate::tools;
use crate::workflow::{StateSnapshot, StateStore, Step, StepOutcome, WorkflowError};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

/// Static description of one agent
#[derive(Debug, Clone)]
pub struct AgentSpec {
    /// Unique name, used in error paths and executor dispatch
    pub name: String,
    /// One-line role description, included in API summaries
    pub description: String,
    /// Instruction template; `{ KEY }` and `{ KEY? }` placeholders are
    /// substituted from state at run time
    pub instruction: String,
    /// State key the reply text is appended to, if any
    pub output_key: Option<String>,
}

impl AgentSpec {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        instruction: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            instruction: instruction.into(),
            output_key: None,
        }
    }

    /// Set the state key the reply text is appended to
    pub fn with_output_key(mut self, key: impl Into<String>) -> Self {
        self.output_key = Some(key.into());
        self
    }
}

/// Substitute `{ KEY }` placeholders in an instruction template
///
/// `{ KEY? }` renders a missing key as the empty string; `{ KEY }` without
/// the marker is an error when the key is absent. Braced text that is not a
/// plain key name (JSON examples, prose) passes through untouched.
fn render_instruction(template: &str, snapshot: &StateSnapshot) -> Result<String, String> {
    fn is_key(token: &str) -> bool {
        !token.is_empty() && token.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    }

    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after_open = &rest[open + 1..];
        let Some(close) = after_open.find('}') else {
            out.push_str(&rest[open..]);
            return Ok(out);
        };

        let token = after_open[..close].trim();
        let (key, optional) = match token.strip_suffix('?') {
            Some(stripped) => (stripped.trim_end(), true),
            None => (token, false),
        };

        if is_key(key) {
            if !optional && snapshot.get(key).is_none() {
                return Err(format!("instruction references missing state key '{key}'"));
            }
            out.push_str(&snapshot.render(key));
        } else {
            out.push_str(&rest[open..open + 1 + close + 1]);
        }

        rest = &after_open[close + 1..];
    }

    out.push_str(rest);
    Ok(out)
}

/// Atomic step that performs one model call for an [`AgentSpec`]
pub struct AgentStep {
    spec: AgentSpec,
    executor: Arc<dyn ModelExecutor>,
    output_dir: PathBuf,
}

impl AgentStep {
    pub fn new(spec: AgentSpec, executor: Arc<dyn ModelExecutor>, output_dir: PathBuf) -> Self {
        Self {
            spec,
            executor,
            output_dir,
        }
    }

    pub fn spec(&self) -> &AgentSpec {
        &self.spec
    }
}

#[async_trait]
impl Step for AgentStep {
    fn name(&self) -> &str {
        &self.spec.name
    }

    async fn run(&self, state: &StateStore) -> Result<StepOutcome, WorkflowError> {
        let snapshot = state.snapshot().await;
        let prompt = render_instruction(&self.spec.instruction, &snapshot)
            .map_err(|message| WorkflowError::step(&self.spec.name, message))?;

        tracing::info!(agent = %self.spec.name, "Agent running");
        let reply = self
            .executor
            .reply(&self.spec.name, &prompt)
            .await
            .map_err(|e| WorkflowError::step(&self.spec.name, e.to_string()))?;

        if let Some(output_key) = &self.spec.output_key {
            if !reply.text.is_empty() {
                state.append(output_key.clone(), reply.text.clone()).await;
            }
        }

        let mut outcome = StepOutcome::Continue;
        for action in &reply.actions {
            match action {
                AgentAction::AppendToState { key, value } => {
                    state.append(key.clone(), value.clone()).await;
                }
                AgentAction::ExitLoop => {
                    tracing::info!(agent = %self.spec.name, "Agent requested loop exit");
                    outcome = StepOutcome::RequestExit;
                }
                AgentAction::WriteFile { filename, content } => {
                    tools::write_file(&self.output_dir, filename, content)
                        .await
                        .map_err(|e| WorkflowError::step(&self.spec.name, e.to_string()))?;
                }
            }
        }

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{AgentReply, ScriptedExecutor};
    use serde_json::json;
    use tempfile::tempdir;

    fn snapshot_with(entries: &[(&str, serde_json::Value)]) -> StateSnapshot {
        let state = StateStore::new();
        let rt = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        rt.block_on(async {
            for (key, value) in entries {
                state.set(*key, value.clone()).await;
            }
            state.snapshot().await
        })
    }

    #[test]
    fn test_render_substitutes_keys() {
        let snapshot = snapshot_with(&[("PROMPT", json!("Ada Lovelace"))]);
        let rendered = render_instruction("Write about { PROMPT }.", &snapshot).unwrap();
        assert_eq!(rendered, "Write about Ada Lovelace.");
    }

    #[test]
    fn test_render_optional_missing_key_is_empty() {
        let snapshot = snapshot_with(&[]);
        let rendered =
            render_instruction("Feedback so far: { CRITICAL_FEEDBACK? }", &snapshot).unwrap();
        assert_eq!(rendered, "Feedback so far: ");
    }

    #[test]
    fn test_render_required_missing_key_is_error() {
        let snapshot = snapshot_with(&[]);
        let err = render_instruction("Write about { PROMPT }.", &snapshot).unwrap_err();
        assert!(err.contains("PROMPT"));
    }

    #[test]
    fn test_render_leaves_non_key_braces_alone() {
        let snapshot = snapshot_with(&[]);
        let template = r#"Reply as JSON: {"verdict": "ok"}"#;
        assert_eq!(render_instruction(template, &snapshot).unwrap(), template);
    }

    #[test]
    fn test_render_joins_list_values() {
        let snapshot = snapshot_with(&[("research", json!(["fact one", "fact two"]))]);
        let rendered = render_instruction("{ research }", &snapshot).unwrap();
        assert_eq!(rendered, "fact one\n\nfact two");
    }

    #[tokio::test]
    async fn test_agent_step_appends_reply_to_output_key() {
        let dir = tempdir().unwrap();
        let executor = Arc::new(ScriptedExecutor::new());
        executor
            .enqueue("screenwriter", AgentReply::text("Act one: a garret in Paris."))
            .await;

        let spec = AgentSpec::new("screenwriter", "Drafts outlines", "Draft an outline.")
            .with_output_key("PLOT_OUTLINE");
        let step = AgentStep::new(spec, executor, dir.path().to_path_buf());
        let state = StateStore::new();

        let outcome = step.run(&state).await.unwrap();

        assert_eq!(outcome, StepOutcome::Continue);
        assert_eq!(
            state.get("PLOT_OUTLINE").await,
            Some(json!(["Act one: a garret in Paris."]))
        );
    }

    #[tokio::test]
    async fn test_agent_step_applies_actions() {
        let dir = tempdir().unwrap();
        let executor = Arc::new(ScriptedExecutor::new());
        executor
            .enqueue(
                "critic",
                AgentReply::text("Approved.")
                    .with_action(AgentAction::AppendToState {
                        key: "verdict".to_string(),
                        value: "approved".to_string(),
                    })
                    .with_action(AgentAction::ExitLoop),
            )
            .await;

        let spec = AgentSpec::new("critic", "Reviews drafts", "Review the draft.");
        let step = AgentStep::new(spec, executor, dir.path().to_path_buf());
        let state = StateStore::new();

        let outcome = step.run(&state).await.unwrap();

        assert_eq!(outcome, StepOutcome::RequestExit);
        assert_eq!(state.get("verdict").await, Some(json!(["approved"])));
    }

    #[tokio::test]
    async fn test_agent_step_writes_file_action() {
        let dir = tempdir().unwrap();
        let executor = Arc::new(ScriptedExecutor::new());
        executor
            .enqueue(
                "file_writer",
                AgentReply::text("Saved.").with_action(AgentAction::WriteFile {
                    filename: "pitch.md".to_string(),
                    content: "# Pitch".to_string(),
                }),
            )
            .await;

        let spec = AgentSpec::new("file_writer", "Persists documents", "Save the pitch.");
        let step = AgentStep::new(spec, executor, dir.path().to_path_buf());

        step.run(&StateStore::new()).await.unwrap();

        let written = tokio::fs::read_to_string(dir.path().join("pitch.md"))
            .await
            .unwrap();
        assert_eq!(written, "# Pitch");
    }

    #[tokio::test]
    async fn test_agent_step_executor_failure_names_agent() {
        let dir = tempdir().unwrap();
        let executor = Arc::new(ScriptedExecutor::new());
        let spec = AgentSpec::new("researcher", "Gathers facts", "Research { PROMPT? }.");
        let step = AgentStep::new(spec, executor, dir.path().to_path_buf());

        let err = step.run(&StateStore::new()).await.unwrap_err();
        assert_eq!(err.path(), "researcher");
    }
}
