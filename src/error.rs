// src/error.rs

//! Error types shared across the pipeline stages.
//!
//! Two classes of failure exist: fatal errors (this enum), which abort the
//! run immediately, and advisory conditions, which are carried as
//! [`StageOutcome::Warning`](crate::stage::StageOutcome) and logged without
//! stopping the pipeline.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("download failed: {0}")]
    Download(String),

    #[error("extraction failed: {0}")]
    Extract(String),

    #[error("required tool not found: {0}")]
    ToolMissing(String),

    #[error("{tool} exited with status {status}: {stderr}")]
    CommandFailed {
        tool: String,
        status: i32,
        stderr: String,
    },

    #[error("{stage} stage failed: {detail}")]
    Stage { stage: &'static str, detail: String },

    /// The build nominally succeeded but the install tree holds no usable
    /// shared library. Mapped to a distinct process exit status (3) so
    /// callers can tell "tool failed" from "tool lied".
    #[error("expected artifact missing from install tree: {0}")]
    ArtifactMissing(String),
}
