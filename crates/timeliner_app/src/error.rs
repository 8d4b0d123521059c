// SPDX-License-Identifier: MIT OR Apache-2.0
//! Harness errors.

use thiserror::Error;
use timeliner_model::ModelError;
use timeliner_view::ViewError;

/// Errors raised while replaying a script
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Script or output file I/O failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Script could not be parsed
    #[error("Script parse error: {0}")]
    Script(#[from] ron::error::SpannedError),

    /// Scene could not be written as RON
    #[error("Scene output error: {0}")]
    SceneOutput(#[from] ron::Error),

    /// Summary could not be written as JSON
    #[error("Summary output error: {0}")]
    SummaryOutput(#[from] serde_json::Error),

    /// Document error while building the initial tracks
    #[error(transparent)]
    Model(#[from] ModelError),

    /// View error while replaying a step
    #[error(transparent)]
    View(#[from] ViewError),

    /// Step refers to a track slot that does not exist
    #[error("Step {step}: no track at slot {slot}")]
    NoTrackAt {
        /// Step index
        step: usize,
        /// Track slot
        slot: usize,
    },
}

/// Result type for the harness
pub type Result<T> = std::result::Result<T, HarnessError>;
