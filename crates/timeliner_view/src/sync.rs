// SPDX-License-Identifier: MIT OR Apache-2.0
//! Track list synchronization.
//!
//! The view list is diffed against the document by track identity: views of
//! removed tracks are disposed and the gap they leave is closed, new tracks
//! get a view of the matching kind and a free slot.

use crate::config::ViewConfig;
use crate::router::TargetMap;
use crate::track_view::TrackView;
use crate::tracks::TrackList;
use crate::view::SvgBuild;
use std::cmp::Reverse;
use timeliner_model::{Document, TrackId};

/// What a sync pass changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Tracks that got a view
    pub added: Vec<TrackId>,
    /// Tracks whose view was disposed
    pub removed: Vec<TrackId>,
}

impl SyncReport {
    /// Whether nothing changed
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

impl TrackList {
    /// Bring the view list in line with the document's tracks.
    pub fn sync(&mut self, document: &mut Document, targets: &mut TargetMap, config: &ViewConfig) -> SyncReport {
        let mut report = SyncReport::default();

        let (kept, mut gone): (Vec<TrackView>, Vec<TrackView>) = std::mem::take(&mut self.views)
            .into_iter()
            .partition(|v| document.contains(v.track));
        self.views = kept;

        // Highest first, so each gap is closed against final neighbours
        gone.sort_by_key(|v| Reverse(v.order()));
        for mut view in gone {
            let order = view.order();
            view.unbuild_svg(targets);
            tracing::debug!(track = %view.track, order, "track view disposed");
            self.close_gap(document, order);
            report.removed.push(view.track);
        }

        let mut added: Vec<(usize, TrackId)> = document
            .tracks()
            .filter(|t| self.get(t.id).is_none())
            .map(|t| (t.order(), t.id))
            .collect();
        added.sort_by_key(|(order, _)| *order);

        for (order, track) in added {
            self.open_slot(document, track, order);
            let id = document.next_element_id();
            let Some(model) = document.track(track) else {
                continue;
            };
            let view = TrackView::new(model, id, config);
            tracing::debug!(track = %track, kind = view.kind.name(), order = view.order(), "track view created");
            self.views.push(view);
            report.added.push(track);
        }

        if !report.is_empty() {
            self.refresh_layout(document);
            self.sort_by_order(document);
        }
        report
    }

    /// Shift every track after `removed_order` up by one slot.
    fn close_gap(&mut self, document: &mut Document, removed_order: usize) {
        let after: Vec<(TrackId, usize)> = self
            .views
            .iter()
            .filter_map(|v| document.order_of(v.track).map(|order| (v.track, order)))
            .filter(|(_, order)| *order > removed_order)
            .collect();

        self.reordering = true;
        for (track, order) in after {
            if let Err(err) = document.assign_order(track, order - 1, self) {
                tracing::warn!("Failed to close order gap: {err}");
            }
        }
        self.reordering = false;
        self.refresh_layout(document);
    }

    /// Make room for `track` at `order`, clamped to the end of the list.
    fn open_slot(&mut self, document: &mut Document, track: TrackId, order: usize) {
        let slot = order.min(self.views.len());
        let at_or_after: Vec<(TrackId, usize)> = self
            .views
            .iter()
            .filter_map(|v| document.order_of(v.track).map(|order| (v.track, order)))
            .filter(|(_, order)| *order >= slot)
            .collect();

        self.reordering = true;
        for (other, order) in at_or_after {
            if let Err(err) = document.assign_order(other, order + 1, self) {
                tracing::warn!("Failed to open order slot: {err}");
            }
        }
        if let Err(err) = document.assign_order(track, slot, self) {
            tracing::warn!("Failed to place inserted track: {err}");
        }
        self.reordering = false;
    }
}
