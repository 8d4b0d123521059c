// SPDX-License-Identifier: MIT OR Apache-2.0
//! Model errors.

use crate::keyframe::KeyframeId;
use crate::track::TrackId;
use thiserror::Error;

/// Errors raised by document, history and command operations
#[derive(Debug, Error)]
pub enum ModelError {
    /// Track not in the document
    #[error("Track not found: {0}")]
    TrackNotFound(TrackId),

    /// Keyframe not in the given track
    #[error("Keyframe not found: {0:?}")]
    KeyframeNotFound(KeyframeId),

    /// Track with this id already exists
    #[error("Track already exists: {0}")]
    DuplicateTrack(TrackId),

    /// Nothing to undo
    #[error("Nothing to undo")]
    NothingToUndo,

    /// Nothing to redo
    #[error("Nothing to redo")]
    NothingToRedo,

    /// Snapshot serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),
}

/// Result type for model operations
pub type Result<T> = std::result::Result<T, ModelError>;
