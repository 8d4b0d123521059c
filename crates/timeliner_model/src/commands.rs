// SPDX-License-Identifier: MIT OR Apache-2.0
//! Reversible document commands.
//!
//! Commands encapsulate document edits and integrate with the
//! [`History`](crate::history::History) system.

use crate::document::Document;
use crate::error::{ModelError, Result};
use crate::history::StateSnapshot;
use crate::keyframe::KeyframeId;
use crate::track::{Track, TrackId};
use serde::{Deserialize, Serialize};

/// Trait for document commands that can be undone/redone
pub trait DocumentCommand: Send + Sync {
    /// Get a description of this command
    fn description(&self) -> &str;

    /// Apply the command (also used for redo)
    fn execute(&mut self, document: &mut Document) -> Result<()>;

    /// Revert the command
    fn undo(&mut self, document: &mut Document) -> Result<()>;
}

/// Command to add a track
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackCommand {
    track: Track,
}

impl AddTrackCommand {
    /// Create a new add command
    pub fn new(track: Track) -> Self {
        Self { track }
    }

    /// Id of the track being added
    pub fn track_id(&self) -> TrackId {
        self.track.id
    }
}

impl DocumentCommand for AddTrackCommand {
    fn description(&self) -> &str {
        "Add Track"
    }

    fn execute(&mut self, document: &mut Document) -> Result<()> {
        document.insert_track(self.track.clone())?;
        Ok(())
    }

    fn undo(&mut self, document: &mut Document) -> Result<()> {
        // Keep whatever edits happened after the add for a later redo
        self.track = document.remove_track(self.track.id)?;
        Ok(())
    }
}

/// Command to remove a track
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveTrackCommand {
    track_id: TrackId,
    /// Removed track, filled on execute
    removed: Option<StateSnapshot>,
}

impl RemoveTrackCommand {
    /// Create a new remove command
    pub fn new(track_id: TrackId) -> Self {
        Self {
            track_id,
            removed: None,
        }
    }
}

impl DocumentCommand for RemoveTrackCommand {
    fn description(&self) -> &str {
        "Remove Track"
    }

    fn execute(&mut self, document: &mut Document) -> Result<()> {
        let track = document.remove_track(self.track_id)?;
        self.removed = Some(StateSnapshot::from_value(&track)?);
        Ok(())
    }

    fn undo(&mut self, document: &mut Document) -> Result<()> {
        let snapshot = self
            .removed
            .as_ref()
            .ok_or(ModelError::TrackNotFound(self.track_id))?;
        let track: Track = snapshot.to_value()?;
        document.insert_track(track)?;
        Ok(())
    }
}

/// Time and value of a keyframe
pub type KeyframePlacement = (f32, f32);

/// Command to move keyframes of one track
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveKeyframesCommand {
    track_id: TrackId,
    /// (keyframe, before, after)
    moves: Vec<(KeyframeId, KeyframePlacement, KeyframePlacement)>,
}

impl MoveKeyframesCommand {
    /// Create a new move command
    pub fn new(
        track_id: TrackId,
        moves: Vec<(KeyframeId, KeyframePlacement, KeyframePlacement)>,
    ) -> Self {
        Self { track_id, moves }
    }

    fn apply(&self, document: &mut Document, forward: bool) -> Result<()> {
        let track = document
            .track_mut(self.track_id)
            .and_then(Track::as_value_mut)
            .ok_or(ModelError::TrackNotFound(self.track_id))?;

        for (id, before, after) in &self.moves {
            let (time, value) = if forward { *after } else { *before };
            if !track.move_keyframe(*id, time, value) {
                return Err(ModelError::KeyframeNotFound(*id));
            }
        }
        Ok(())
    }
}

impl DocumentCommand for MoveKeyframesCommand {
    fn description(&self) -> &str {
        "Move Keyframes"
    }

    fn execute(&mut self, document: &mut Document) -> Result<()> {
        self.apply(document, true)
    }

    fn undo(&mut self, document: &mut Document) -> Result<()> {
        self.apply(document, false)
    }
}
