// SPDX-License-Identifier: MIT OR Apache-2.0
//! Visual track list.
//!
//! Kept structurally identical to the document's tracks by
//! [`TrackList::sync`](crate::sync) and ordered by the reconciler in
//! [`reorder`](crate::reorder).

use crate::track_view::TrackView;
use timeliner_model::{Document, TrackId};

/// Track views sorted by order
#[derive(Debug, Clone)]
pub struct TrackList {
    pub(crate) views: Vec<TrackView>,
    /// Set while orders are being shifted; suppresses nested reconciliation
    pub(crate) reordering: bool,
    pub(crate) track_height: f32,
}

impl TrackList {
    /// Create an empty list laying tracks out `track_height` apart
    pub fn new(track_height: f32) -> Self {
        Self {
            views: Vec::new(),
            reordering: false,
            track_height,
        }
    }

    /// Views in order
    pub fn views(&self) -> &[TrackView] {
        &self.views
    }

    /// Views in order, mutable
    pub fn views_mut(&mut self) -> impl Iterator<Item = &mut TrackView> {
        self.views.iter_mut()
    }

    /// View of a track
    pub fn get(&self, track: TrackId) -> Option<&TrackView> {
        self.views.iter().find(|v| v.track == track)
    }

    /// Mutable view of a track
    pub fn get_mut(&mut self, track: TrackId) -> Option<&mut TrackView> {
        self.views.iter_mut().find(|v| v.track == track)
    }

    /// Number of views
    pub fn len(&self) -> usize {
        self.views.len()
    }

    /// Whether there are no views
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// Track ids in visual order
    pub fn track_ids(&self) -> Vec<TrackId> {
        self.views.iter().map(|v| v.track).collect()
    }

    /// Whether a reconciliation is running
    pub fn is_reordering(&self) -> bool {
        self.reordering
    }

    /// Hide every track menu. Returns whether any was open.
    pub fn hide_menus(&mut self) -> bool {
        self.views
            .iter_mut()
            .fold(false, |any, v| v.menu.hide() || any)
    }

    /// Recompute every view's position from its model order
    pub fn refresh_layout(&mut self, document: &Document) {
        for view in &mut self.views {
            match document.order_of(view.track) {
                Some(order) => view.update_height_and_pos(order, self.track_height),
                None => tracing::warn!(track = %view.track, "layout of a track missing from the document"),
            }
        }
    }

    /// Sort views ascending by model order
    pub fn sort_by_order(&mut self, document: &Document) {
        self.views
            .sort_by_key(|v| document.order_of(v.track).unwrap_or(usize::MAX));
    }

    /// Total height of all tracks
    pub fn content_height(&self) -> f32 {
        self.views.len() as f32 * self.track_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ViewConfig;
    use egui::Pos2;
    use timeliner_model::Track;

    #[test]
    fn test_hide_menus_reports_open_ones() {
        let config = ViewConfig::default();
        let mut list = TrackList::new(config.track_height);
        let track = Track::value("v", 0);
        list.views.push(TrackView::new(&track, "t".into(), &config));

        assert!(!list.hide_menus());
        list.views[0].menu.show_at(Pos2::new(1.0, 1.0));
        assert!(list.hide_menus());
        assert!(!list.hide_menus());
    }

    #[test]
    fn test_content_height() {
        let config = ViewConfig::default();
        let mut list = TrackList::new(config.track_height);
        let a = Track::value("a", 0);
        let b = Track::value("b", 1);
        list.views.push(TrackView::new(&a, "a".into(), &config));
        list.views.push(TrackView::new(&b, "b".into(), &config));

        assert_eq!(list.track_ids(), vec![a.id, b.id]);
        assert_eq!(list.views[1].top(), 50.0);
        assert_eq!(list.content_height(), 100.0);
    }
}
