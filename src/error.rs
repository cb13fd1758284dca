//! Application-level error handling
//!
//! Every module's error type converges here so axum handlers can return a
//! single error and get a consistent JSON body and status code.

use crate::commerce::catalog::CatalogError;
use crate::commerce::ucp::UcpError;
use crate::workflow::WorkflowError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    #[error(transparent)]
    Ucp(#[from] UcpError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Pipeline timed out after {0} seconds")]
    Timeout(u64),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Workflow(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Ucp(UcpError::UnknownMerchant(_)) => StatusCode::NOT_FOUND,
            AppError::Ucp(_) => StatusCode::BAD_GATEWAY,
            AppError::Catalog(_) | AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(status = %status, error = %self, "Request failed");
        } else {
            tracing::warn!(status = %status, error = %self, "Request rejected");
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
