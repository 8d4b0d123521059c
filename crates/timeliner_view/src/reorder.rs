// SPDX-License-Identifier: MIT OR Apache-2.0
//! Track order reconciliation.
//!
//! When one track's order changes from `old` to `new`, the tracks in
//! between shift by one towards the gap so the orders stay exactly
//! `0..N`. The shifts are order assignments themselves and re-enter the
//! observer; the `reordering` flag turns those nested calls into no-ops.

use crate::error::Result;
use crate::tracks::TrackList;
use timeliner_model::{Document, OrderChange, OrderObserver, TrackId};

impl TrackList {
    /// Move a track to slot `order` (clamped to the last slot) and reconcile.
    pub fn move_track(&mut self, document: &mut Document, track: TrackId, order: usize) -> Result<()> {
        let last = document.track_count().saturating_sub(1);
        document.assign_order(track, order.min(last), self)?;
        Ok(())
    }
}

/// New order of a track at `order` after another track moved `old -> new`
fn shifted_order(order: usize, old: usize, new: usize) -> Option<usize> {
    if new > old {
        (order > old && order <= new).then(|| order - 1)
    } else {
        (order >= new && order < old).then(|| order + 1)
    }
}

impl OrderObserver for TrackList {
    fn order_changed(&mut self, document: &mut Document, change: OrderChange) {
        if self.reordering {
            return;
        }
        self.reordering = true;
        tracing::debug!(track = %change.track, old = change.old, new = change.new, "reorder tracks");

        let others: Vec<(TrackId, usize)> = self
            .views
            .iter()
            .filter(|v| v.track != change.track)
            .filter_map(|v| document.order_of(v.track).map(|order| (v.track, order)))
            .collect();

        for (track, order) in others {
            if let Some(value) = shifted_order(order, change.old, change.new) {
                if let Err(err) = document.assign_order(track, value, self) {
                    tracing::warn!("Failed to shift track order: {err}");
                }
            }
        }

        self.refresh_layout(document);
        self.sort_by_order(document);

        self.reordering = false;
    }
}
