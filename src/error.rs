use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// Failures that stop the pipeline. Anything else (I/O, transport) travels
/// as a plain `anyhow` error with context attached.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid dataset request: {0}")]
    InvalidRequest(String),

    #[error("dataset request failed with status {status}")]
    Status { status: StatusCode },

    #[error("{path:?} is not a zip archive")]
    NotAnArchive { path: PathBuf },

    #[error("failed to extract archive: {reason}")]
    Extraction { reason: String },
}
