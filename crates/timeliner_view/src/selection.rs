// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyframe selection.

use std::collections::HashSet;
use timeliner_model::{Document, KeyframeId, TrackId};

/// Selected keyframes as (`track_id`, `keyframe_id`)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    keyframes: HashSet<(TrackId, KeyframeId)>,
}

impl Selection {
    /// Whether a keyframe is selected
    pub fn contains(&self, track: TrackId, keyframe: KeyframeId) -> bool {
        self.keyframes.contains(&(track, keyframe))
    }

    /// Add a keyframe
    pub fn select(&mut self, track: TrackId, keyframe: KeyframeId) {
        self.keyframes.insert((track, keyframe));
    }

    /// Replace the selection with the given keyframes
    pub fn replace(&mut self, keyframes: impl IntoIterator<Item = (TrackId, KeyframeId)>) {
        self.keyframes = keyframes.into_iter().collect();
    }

    /// Deselect everything
    pub fn clear(&mut self) {
        self.keyframes.clear();
    }

    /// Selected keyframes
    pub fn iter(&self) -> impl Iterator<Item = &(TrackId, KeyframeId)> {
        self.keyframes.iter()
    }

    /// Number of selected keyframes
    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    /// Whether nothing is selected
    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    /// Drop entries whose track or keyframe no longer exists
    pub fn retain_existing(&mut self, document: &Document) {
        self.keyframes.retain(|(track, keyframe)| {
            document
                .track(*track)
                .and_then(|t| t.as_value())
                .is_some_and(|v| v.keyframe(*keyframe).is_some())
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use timeliner_model::{Keyframe, Track};

    #[test]
    fn test_retain_existing() {
        let mut doc = Document::new("doc");
        let mut track = Track::value("v", 0);
        let kf = track.as_value_mut().unwrap().add_keyframe(Keyframe::new(0.0, 0.0));
        let id = doc.insert_track(track).unwrap();

        let mut selection = Selection::default();
        selection.select(id, kf);
        selection.select(TrackId::new(), KeyframeId::new());
        assert_eq!(selection.len(), 2);

        selection.retain_existing(&doc);
        assert_eq!(selection.len(), 1);
        assert!(selection.contains(id, kf));
    }
}
