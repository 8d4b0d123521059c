// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timeline document and order change notification.

use crate::error::{ModelError, Result};
use crate::ruler::Ruler;
use crate::track::{Track, TrackId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// An order assignment that actually changed a value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderChange {
    /// Track whose order was assigned
    pub track: TrackId,
    /// Order after the assignment
    pub new: usize,
    /// Order before the assignment
    pub old: usize,
}

/// Subscriber to track order changes.
///
/// Called synchronously from [`Document::assign_order`], before it returns,
/// so an observer that assigns orders itself is re-entered.
pub trait OrderObserver {
    /// An order value changed
    fn order_changed(&mut self, document: &mut Document, change: OrderChange);
}

impl OrderObserver for () {
    fn order_changed(&mut self, _document: &mut Document, _change: OrderChange) {}
}

/// The timeline document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Document name, also the prefix of scene element ids
    pub name: String,
    /// Tracks in insertion order
    tracks: IndexMap<TrackId, Track>,
    /// Loop region and viewport
    pub ruler: Ruler,
    /// Counter for scene element ids
    next_element: u64,
}

impl Document {
    /// Create an empty document
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tracks: IndexMap::new(),
            ruler: Ruler::default(),
            next_element: 0,
        }
    }

    /// Hand out a fresh scene element id
    pub fn next_element_id(&mut self) -> String {
        self.next_element += 1;
        format!("{}/{}", self.name, self.next_element)
    }

    /// Insert a track. Orders are not touched here.
    pub fn insert_track(&mut self, track: Track) -> Result<TrackId> {
        let id = track.id;
        if self.tracks.contains_key(&id) {
            return Err(ModelError::DuplicateTrack(id));
        }
        tracing::debug!(track = %id, order = track.order, "insert track");
        self.tracks.insert(id, track);
        Ok(id)
    }

    /// Remove a track. Orders of the remaining tracks are not touched here.
    pub fn remove_track(&mut self, track_id: TrackId) -> Result<Track> {
        let track = self
            .tracks
            .shift_remove(&track_id)
            .ok_or(ModelError::TrackNotFound(track_id))?;
        tracing::debug!(track = %track_id, order = track.order, "remove track");
        Ok(track)
    }

    /// Get a track
    pub fn track(&self, track_id: TrackId) -> Option<&Track> {
        self.tracks.get(&track_id)
    }

    /// Get a mutable track
    pub fn track_mut(&mut self, track_id: TrackId) -> Option<&mut Track> {
        self.tracks.get_mut(&track_id)
    }

    /// Check whether a track exists
    pub fn contains(&self, track_id: TrackId) -> bool {
        self.tracks.contains_key(&track_id)
    }

    /// Get all tracks in insertion order
    pub fn tracks(&self) -> impl Iterator<Item = &Track> {
        self.tracks.values()
    }

    /// Get track count
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// Order of a track
    pub fn order_of(&self, track_id: TrackId) -> Option<usize> {
        self.tracks.get(&track_id).map(Track::order)
    }

    /// Track ids sorted by order
    pub fn ids_by_order(&self) -> Vec<TrackId> {
        let mut ids: Vec<(usize, TrackId)> = self.tracks.values().map(|t| (t.order, t.id)).collect();
        ids.sort_by_key(|(order, _)| *order);
        ids.into_iter().map(|(_, id)| id).collect()
    }

    /// Whether the orders are exactly `0..track_count()`
    pub fn orders_contiguous(&self) -> bool {
        let mut orders: Vec<usize> = self.tracks.values().map(Track::order).collect();
        orders.sort_unstable();
        orders.iter().copied().eq(0..orders.len())
    }

    /// Assign a track's order and notify `observer` if the value changed.
    pub fn assign_order(
        &mut self,
        track_id: TrackId,
        value: usize,
        observer: &mut dyn OrderObserver,
    ) -> Result<()> {
        let track = self
            .tracks
            .get_mut(&track_id)
            .ok_or(ModelError::TrackNotFound(track_id))?;
        let old = track.order;
        if old == value {
            return Ok(());
        }
        track.order = value;
        observer.order_changed(
            self,
            OrderChange {
                track: track_id,
                new: value,
                old,
            },
        );
        Ok(())
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("Timeline")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        changes: Vec<OrderChange>,
    }

    impl OrderObserver for Recorder {
        fn order_changed(&mut self, _document: &mut Document, change: OrderChange) {
            self.changes.push(change);
        }
    }

    #[test]
    fn test_assign_order_notifies_only_on_change() {
        let mut doc = Document::new("doc");
        let id = doc.insert_track(Track::value("a", 0)).unwrap();
        let mut recorder = Recorder::default();

        doc.assign_order(id, 0, &mut recorder).unwrap();
        assert!(recorder.changes.is_empty());

        doc.assign_order(id, 3, &mut recorder).unwrap();
        assert_eq!(
            recorder.changes,
            vec![OrderChange { track: id, new: 3, old: 0 }]
        );
        assert_eq!(doc.order_of(id), Some(3));
    }

    #[test]
    fn test_assign_order_unknown_track() {
        let mut doc = Document::new("doc");
        let err = doc.assign_order(TrackId::new(), 1, &mut ()).unwrap_err();
        assert!(matches!(err, ModelError::TrackNotFound(_)));
    }

    #[test]
    fn test_duplicate_insert_rejected() {
        let mut doc = Document::new("doc");
        let track = Track::value("a", 0);
        doc.insert_track(track.clone()).unwrap();
        assert!(matches!(doc.insert_track(track), Err(ModelError::DuplicateTrack(_))));
    }

    #[test]
    fn test_element_ids_are_unique() {
        let mut doc = Document::new("doc");
        let a = doc.next_element_id();
        let b = doc.next_element_id();
        assert_ne!(a, b);
        assert!(a.starts_with("doc/"));
    }

    #[test]
    fn test_orders_contiguous() {
        let mut doc = Document::new("doc");
        doc.insert_track(Track::value("a", 1)).unwrap();
        assert!(!doc.orders_contiguous());
        doc.insert_track(Track::value("b", 0)).unwrap();
        assert!(doc.orders_contiguous());
    }

    #[test]
    fn test_document_ron_roundtrip() {
        let mut doc = Document::new("doc");
        doc.insert_track(Track::audio("music", 0, "a.wav")).unwrap();
        let text = ron::to_string(&doc).unwrap();
        let loaded: Document = ron::from_str(&text).unwrap();
        assert_eq!(loaded.track_count(), 1);
        assert_eq!(loaded.name, "doc");
    }
}
