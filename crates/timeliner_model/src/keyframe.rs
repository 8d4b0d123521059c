// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyframes of value tracks.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a keyframe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyframeId(pub Uuid);

impl KeyframeId {
    /// Create a new random keyframe ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for KeyframeId {
    fn default() -> Self {
        Self::new()
    }
}

/// Interpolation towards the next keyframe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum InterpolationMode {
    /// Hold the value until the next keyframe
    Constant,
    /// Straight line to the next keyframe
    #[default]
    Linear,
}

/// A keyframe in a value track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    /// Unique keyframe ID
    pub id: KeyframeId,
    /// Time in seconds
    pub time: f32,
    /// Value at this keyframe
    pub value: f32,
    /// Interpolation mode to next keyframe
    pub interpolation: InterpolationMode,
}

impl Keyframe {
    /// Create a new linear keyframe
    pub fn new(time: f32, value: f32) -> Self {
        Self {
            id: KeyframeId::new(),
            time,
            value,
            interpolation: InterpolationMode::Linear,
        }
    }

    /// Set interpolation mode
    pub fn with_interpolation(mut self, mode: InterpolationMode) -> Self {
        self.interpolation = mode;
        self
    }

    /// Value between this keyframe and `next` at `time`.
    pub fn interpolate(&self, next: &Keyframe, time: f32) -> f32 {
        let span = next.time - self.time;
        if span.abs() < 0.0001 {
            return next.value;
        }
        match self.interpolation {
            InterpolationMode::Constant => self.value,
            InterpolationMode::Linear => {
                let t = ((time - self.time) / span).clamp(0.0, 1.0);
                lerp(self.value, next.value, t)
            }
        }
    }
}

/// Linear interpolation between two floats
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
