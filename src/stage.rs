// src/stage.rs

//! Tagged per-stage outcome inspected by the pipeline orchestrator.

use std::fmt;

/// Result of one stage step.
///
/// `Warning` covers the advisory conditions (a patch pattern that no longer
/// matches, an optional test binary that was not built): the run continues
/// and downstream steps are expected to surface real breakage. `Fatal`
/// aborts the whole run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    Ok,
    Warning(String),
    Fatal(String),
}

impl StageOutcome {
    pub fn is_fatal(&self) -> bool {
        matches!(self, StageOutcome::Fatal(_))
    }

    pub fn is_warning(&self) -> bool {
        matches!(self, StageOutcome::Warning(_))
    }
}

impl fmt::Display for StageOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageOutcome::Ok => write!(f, "ok"),
            StageOutcome::Warning(detail) => write!(f, "warning: {}", detail),
            StageOutcome::Fatal(detail) => write!(f, "fatal: {}", detail),
        }
    }
}
