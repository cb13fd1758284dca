//! Pitch pipeline endpoint

use crate::agents::PitchRun;
use crate::api::AppContext;
use crate::error::AppError;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct PitchRequest {
    pub topic: String,
}

/// `POST /api/pitch` - run the full pitch workflow for a topic
pub async fn run_pitch(
    State(context): State<Arc<AppContext>>,
    Json(request): Json<PitchRequest>,
) -> Result<Json<PitchRun>, AppError> {
    let topic = request.topic.trim();
    if topic.is_empty() {
        return Err(AppError::InvalidRequest("topic must not be empty".to_string()));
    }

    let run = tokio::time::timeout(context.pipeline_timeout, context.pipeline.run(topic))
        .await
        .map_err(|_| AppError::Timeout(context.pipeline_timeout.as_secs()))??;

    Ok(Json(run))
}
