// SPDX-License-Identifier: MIT OR Apache-2.0
//! Document summary printed with `--json`.

use serde::Serialize;
use timeliner_model::{TrackId, TrackKind};
use timeliner_view::TimelineView;

/// One track, top to bottom
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackSummary {
    /// Track id
    pub id: TrackId,
    /// Label
    pub label: String,
    /// Slot in the list
    pub order: usize,
    /// Value or audio
    pub kind: TrackKind,
    /// Number of keyframes
    pub keyframes: usize,
    /// Value at the current time
    pub value: Option<String>,
}

/// State of a timeline after a replay
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentSummary {
    /// Document name
    pub name: String,
    /// Timer position
    pub time: f32,
    /// Whether the timer runs
    pub is_running: bool,
    /// Loop region as (start, end)
    pub loop_region: (f32, f32),
    /// Tracks in order
    pub tracks: Vec<TrackSummary>,
    /// Number of selected keyframes
    pub selected: usize,
    /// Undo steps available
    pub undo_count: usize,
    /// Redo steps available
    pub redo_count: usize,
    /// Open pointer sessions
    pub open_sessions: usize,
}

impl DocumentSummary {
    /// Summarize a view
    pub fn of(view: &TimelineView) -> Self {
        let state = view.state();
        let document = &state.document;
        let stats = state.history.stats();

        let tracks = state
            .tracks()
            .views()
            .iter()
            .filter_map(|track_view| {
                let track = document.track(track_view.track)?;
                Some(TrackSummary {
                    id: track.id,
                    label: track.label.clone(),
                    order: track.order(),
                    kind: track.kind(),
                    keyframes: track.as_value().map_or(0, |v| v.keyframes().len()),
                    value: track_view.value_label().map(str::to_owned),
                })
            })
            .collect();

        Self {
            name: document.name.clone(),
            time: state.timer.time,
            is_running: state.timer.is_running,
            loop_region: (document.ruler.loop_start(), document.ruler.loop_end()),
            tracks,
            selected: state.selection.len(),
            undo_count: stats.undo_count,
            redo_count: stats.redo_count,
            open_sessions: view.sessions().len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use timeliner_model::{Document, History, Keyframe, Timer, Track};
    use timeliner_view::ViewConfig;

    #[test]
    fn test_summary_lists_tracks_in_order() {
        let mut doc = Document::new("doc");
        let mut value = Track::value("v", 1);
        value.as_value_mut().unwrap().add_keyframe(Keyframe::new(0.0, 0.75));
        doc.insert_track(value).unwrap();
        doc.insert_track(Track::audio("a", 0, "a.wav")).unwrap();

        let view = TimelineView::new(doc, History::new(), Timer::new(), ViewConfig::default());
        let summary = DocumentSummary::of(&view);

        assert_eq!(summary.tracks.len(), 2);
        assert_eq!(summary.tracks[0].label, "a");
        assert_eq!(summary.tracks[1].keyframes, 1);
        assert_eq!(summary.tracks[1].value.as_deref(), Some("0.750"));
        assert_eq!(summary.loop_region, (0.0, 10.0));

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["tracks"][0]["kind"], "Audio");
        assert_eq!(json["name"], "doc");
    }
}
