// SPDX-License-Identifier: MIT OR Apache-2.0
//! View errors.

use thiserror::Error;
use timeliner_model::{ModelError, TrackId};

/// Errors raised by the timeline view
#[derive(Debug, Error)]
pub enum ViewError {
    /// Document or history error
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Track has no view
    #[error("No view for track {0}")]
    NoTrackView(TrackId),

    /// Config file could not be read
    #[error("Config I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file could not be parsed
    #[error("Config parse error: {0}")]
    Config(#[from] ron::error::SpannedError),
}

/// Result type for view operations
pub type Result<T> = std::result::Result<T, ViewError>;
