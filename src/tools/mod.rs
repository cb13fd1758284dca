//! Agent tools
//!
//! Side-effecting helpers that agent actions map onto. Currently a single
//! tool: writing a finished document under the pipeline's output directory.

use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Errors from tool execution
#[derive(Error, Debug)]
pub enum ToolError {
    /// Filename failed validation before any I/O happened
    #[error("Invalid filename '{filename}': {reason}")]
    InvalidFilename { filename: String, reason: String },

    /// Underlying filesystem operation failed
    #[error("Failed to write '{filename}': {source}")]
    Io {
        filename: String,
        #[source]
        source: std::io::Error,
    },
}

/// Validate a relative filename for use under the output directory
///
/// Rejects absolute paths, parent-directory components, and control
/// characters so an agent reply can never escape the output root.
fn validate_filename(filename: &str) -> Result<(), ToolError> {
    let invalid = |reason: &str| ToolError::InvalidFilename {
        filename: filename.to_string(),
        reason: reason.to_string(),
    };

    if filename.is_empty() {
        return Err(invalid("filename is empty"));
    }
    if filename.chars().any(|c| c.is_control()) {
        return Err(invalid("filename contains control characters"));
    }

    let path = Path::new(filename);
    if path.is_absolute() {
        return Err(invalid("absolute paths are not allowed"));
    }
    for component in path.components() {
        match component {
            Component::Normal(_) => {}
            Component::ParentDir => return Err(invalid("parent directory components are not allowed")),
            _ => return Err(invalid("path component is not a plain name")),
        }
    }
    Ok(())
}

/// Write `content` to `filename` under `output_dir`, creating parents
///
/// # Arguments
/// * `output_dir` - Root directory all writes are confined to
/// * `filename` - Relative path under the root; validated first
/// * `content` - File contents, written whole
///
/// # Returns
/// The absolute path of the written file
pub async fn write_file(
    output_dir: &Path,
    filename: &str,
    content: &str,
) -> Result<PathBuf, ToolError> {
    validate_filename(filename)?;

    let target = output_dir.join(filename);
    if let Some(parent) = target.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| ToolError::Io {
                filename: filename.to_string(),
                source: e,
            })?;
    }

    tokio::fs::write(&target, content)
        .await
        .map_err(|e| ToolError::Io {
            filename: filename.to_string(),
            source: e,
        })?;

    tracing::info!(path = %target.display(), bytes = content.len(), "Wrote output file");
    Ok(target)
}
