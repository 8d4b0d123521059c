// SPDX-License-Identifier: MIT OR Apache-2.0
//! Track definitions.

use crate::keyframe::{Keyframe, KeyframeId};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackId(pub Uuid);

impl TrackId {
    /// Create a new random track ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TrackId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Runtime kind of a track, used to pick the matching view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackKind {
    /// Keyframed value curve
    Value,
    /// Audio file lane
    Audio,
}

impl TrackKind {
    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Value => "Value",
            Self::Audio => "Audio",
        }
    }
}

/// Keyframed value curve with a display range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueTrack {
    /// Keyframes sorted by time
    keyframes: Vec<Keyframe>,
    /// Lowest value shown in the track
    pub minimum: f32,
    /// Highest value shown in the track
    pub maximum: f32,
}

impl ValueTrack {
    /// Create an empty value track with the range `0..=1`
    pub fn new() -> Self {
        Self {
            keyframes: Vec::new(),
            minimum: 0.0,
            maximum: 1.0,
        }
    }

    /// Add a keyframe, keeping time order
    pub fn add_keyframe(&mut self, keyframe: Keyframe) -> KeyframeId {
        let id = keyframe.id;
        self.keyframes.push(keyframe);
        self.sort_keyframes();
        id
    }

    /// Get keyframe by ID
    pub fn keyframe(&self, keyframe_id: KeyframeId) -> Option<&Keyframe> {
        self.keyframes.iter().find(|k| k.id == keyframe_id)
    }

    /// Move a keyframe to a new time and value.
    ///
    /// Time is clamped at zero and the value to the track range.
    pub fn move_keyframe(&mut self, keyframe_id: KeyframeId, time: f32, value: f32) -> bool {
        let (minimum, maximum) = self.range();
        let Some(kf) = self.keyframes.iter_mut().find(|k| k.id == keyframe_id) else {
            return false;
        };
        kf.time = time.max(0.0);
        kf.value = value.clamp(minimum, maximum);
        self.sort_keyframes();
        true
    }

    /// All keyframes in time order
    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    /// The display range as `(low, high)`
    pub fn range(&self) -> (f32, f32) {
        if self.minimum <= self.maximum {
            (self.minimum, self.maximum)
        } else {
            (self.maximum, self.minimum)
        }
    }

    /// Evaluate the curve at a given time
    pub fn evaluate(&self, time: f32) -> Option<f32> {
        let next_idx = self.keyframes.iter().position(|k| k.time >= time);

        match next_idx {
            None => self.keyframes.last().map(|k| k.value),
            Some(0) => self.keyframes.first().map(|k| k.value),
            Some(idx) => {
                let a = &self.keyframes[idx - 1];
                let b = &self.keyframes[idx];
                Some(a.interpolate(b, time))
            }
        }
    }

    fn sort_keyframes(&mut self) {
        self.keyframes.sort_by(|a, b| a.time.total_cmp(&b.time));
    }
}

impl Default for ValueTrack {
    fn default() -> Self {
        Self::new()
    }
}

/// Audio lane referencing a sound file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AudioTrack {
    /// Path to the audio file
    pub path: String,
}

/// Kind-specific track content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TrackContent {
    /// Keyframed value curve
    Value(ValueTrack),
    /// Audio lane
    Audio(AudioTrack),
}

/// A track in the timeline document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Unique track ID
    pub id: TrackId,
    /// Track label
    pub label: String,
    /// Slot in the vertical track list.
    ///
    /// Assign through [`crate::Document::assign_order`] so observers get notified.
    pub(crate) order: usize,
    /// Kind-specific content
    pub content: TrackContent,
}

impl Track {
    /// Create a new, empty value track
    pub fn value(label: impl Into<String>, order: usize) -> Self {
        Self::with_content(label, order, TrackContent::Value(ValueTrack::new()))
    }

    /// Create a new audio track
    pub fn audio(label: impl Into<String>, order: usize, path: impl Into<String>) -> Self {
        Self::with_content(
            label,
            order,
            TrackContent::Audio(AudioTrack { path: path.into() }),
        )
    }

    fn with_content(label: impl Into<String>, order: usize, content: TrackContent) -> Self {
        Self {
            id: TrackId::new(),
            label: label.into(),
            order,
            content,
        }
    }

    /// Current order value
    pub fn order(&self) -> usize {
        self.order
    }

    /// Runtime kind of this track
    pub fn kind(&self) -> TrackKind {
        match self.content {
            TrackContent::Value(_) => TrackKind::Value,
            TrackContent::Audio(_) => TrackKind::Audio,
        }
    }

    /// Value content, if this is a value track
    pub fn as_value(&self) -> Option<&ValueTrack> {
        match &self.content {
            TrackContent::Value(v) => Some(v),
            TrackContent::Audio(_) => None,
        }
    }

    /// Mutable value content, if this is a value track
    pub fn as_value_mut(&mut self) -> Option<&mut ValueTrack> {
        match &mut self.content {
            TrackContent::Value(v) => Some(v),
            TrackContent::Audio(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyframes_stay_sorted() {
        let mut track = ValueTrack::new();
        track.add_keyframe(Keyframe::new(2.0, 0.5));
        let early = track.add_keyframe(Keyframe::new(0.5, 0.1));
        track.add_keyframe(Keyframe::new(1.0, 0.2));
        assert_eq!(track.keyframes()[0].id, early);

        track.move_keyframe(early, 3.0, 0.3);
        let times: Vec<f32> = track.keyframes().iter().map(|k| k.time).collect();
        assert_eq!(times, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_move_clamps_to_range() {
        let mut track = ValueTrack::new();
        let id = track.add_keyframe(Keyframe::new(1.0, 0.5));
        assert!(track.move_keyframe(id, -4.0, 7.0));
        let kf = track.keyframe(id).unwrap();
        assert_eq!(kf.time, 0.0);
        assert_eq!(kf.value, 1.0);
        assert!(!track.move_keyframe(KeyframeId::new(), 0.0, 0.0));
    }

    #[test]
    fn test_evaluate_between_and_outside() {
        let mut track = ValueTrack::new();
        assert_eq!(track.evaluate(1.0), None);
        track.add_keyframe(Keyframe::new(1.0, 0.0));
        track.add_keyframe(Keyframe::new(3.0, 1.0));
        assert_eq!(track.evaluate(0.0), Some(0.0));
        assert_eq!(track.evaluate(2.0), Some(0.5));
        assert_eq!(track.evaluate(9.0), Some(1.0));
    }

    #[test]
    fn test_track_kind() {
        assert_eq!(Track::value("a", 0).kind(), TrackKind::Value);
        let audio = Track::audio("b", 1, "loop.wav");
        assert_eq!(audio.kind(), TrackKind::Audio);
        assert!(audio.as_value().is_none());
    }
}
