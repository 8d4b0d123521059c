// SPDX-License-Identifier: MIT OR Apache-2.0
//! Interaction handlers.
//!
//! A handler is created on mouse-down by the router and receives the move
//! and up events of its pointer session until the session ends.

use crate::error::{Result, ViewError};
use crate::router::{ActiveHandler, HandlerKind, MouseArg, BUTTON_RIGHT};
use crate::timeline::TimelineState;
use egui::{Pos2, Rect};
use std::collections::HashMap;
use timeliner_model::{KeyframeId, LoopEdge, MoveKeyframesCommand, TrackId};

/// Receiver of the move and up events of one pointer session
pub trait MouseHandler {
    /// Handler name for logging
    fn name(&self) -> &'static str;

    /// Pointer moved
    fn mouse_move(&mut self, state: &mut TimelineState, arg: &MouseArg);

    /// Button released; the session ends afterwards
    fn mouse_up(&mut self, state: &mut TimelineState, arg: &MouseArg);
}

/// Instantiate the handler for a routed mouse-down and apply its press effects.
pub fn create_handler(kind: HandlerKind, state: &mut TimelineState, arg: &MouseArg) -> Result<ActiveHandler> {
    let handler: Box<dyn MouseHandler> = match kind {
        HandlerKind::Widget(action) => {
            state.apply_action(action)?;
            return Ok(ActiveHandler::Widget(action));
        }
        HandlerKind::Selection(track) => Box::new(SelectionHandler {
            track,
            start: arg.pos,
        }),
        HandlerKind::TrackMenu(track) => {
            let view = state.tracks.get_mut(track).ok_or(ViewError::NoTrackView(track))?;
            view.menu.show_at(arg.pos);
            Box::new(TrackMenuHandler)
        }
        HandlerKind::TrackPan => Box::new(TrackPanHandler { last: arg.pos }),
        HandlerKind::Seek => {
            let time = state.time_at(arg.pos.x);
            state.timer.seek(time);
            Box::new(SeekHandler)
        }
        HandlerKind::LoopRegion(edge) => Box::new(LoopRegionHandler { edge }),
        HandlerKind::Keyframe { track, keyframe } => Box::new(KeyframeHandler::new(state, track, keyframe, arg.pos)),
        HandlerKind::TimeBar => Box::new(TimeBarHandler {
            grab_offset: arg.pos.x - state.time_bar_x(),
        }),
        HandlerKind::MainMenu => {
            if arg.button == BUTTON_RIGHT {
                state.main_menu.show_at(arg.pos);
            } else {
                state.selection.clear();
            }
            Box::new(MainMenuHandler)
        }
    };
    Ok(ActiveHandler::Handler(handler))
}

/// Rubber band selection of keyframes in one value track
#[derive(Debug)]
pub struct SelectionHandler {
    track: TrackId,
    start: Pos2,
}

impl SelectionHandler {
    fn keyframes_in(&self, state: &TimelineState, rect: Rect) -> Vec<(TrackId, KeyframeId)> {
        let Some(view) = state.tracks.get(self.track) else {
            return Vec::new();
        };
        let Some(values) = state.document.track(self.track).and_then(|t| t.as_value()) else {
            return Vec::new();
        };
        let top = state.tracks_top() + view.top();
        values
            .keyframes()
            .iter()
            .filter(|kf| {
                let x = state.document.ruler.time_to_x(kf.time);
                let y = top + view.value_to_y(kf.value, values);
                rect.contains(Pos2::new(x, y))
            })
            .map(|kf| (self.track, kf.id))
            .collect()
    }
}

impl MouseHandler for SelectionHandler {
    fn name(&self) -> &'static str {
        "Selection"
    }

    fn mouse_move(&mut self, state: &mut TimelineState, arg: &MouseArg) {
        state.set_selection_rect(Some(Rect::from_two_pos(self.start, arg.pos)));
    }

    fn mouse_up(&mut self, state: &mut TimelineState, arg: &MouseArg) {
        let rect = Rect::from_two_pos(self.start, arg.pos);
        let hits = self.keyframes_in(state, rect);
        tracing::debug!(track = %self.track, selected = hits.len(), "selection");
        state.selection.replace(hits);
        state.set_selection_rect(None);
    }
}

/// Drag to pan the time axis and scroll the tracks
#[derive(Debug)]
pub struct TrackPanHandler {
    last: Pos2,
}

impl MouseHandler for TrackPanHandler {
    fn name(&self) -> &'static str {
        "TrackPan"
    }

    fn mouse_move(&mut self, state: &mut TimelineState, arg: &MouseArg) {
        let delta = arg.pos - self.last;
        self.last = arg.pos;
        state.document.ruler.pan(delta.x);
        state.scroll_tracks(-delta.y);
    }

    fn mouse_up(&mut self, _state: &mut TimelineState, _arg: &MouseArg) {}
}

/// Drag one edge of the loop region
#[derive(Debug)]
pub struct LoopRegionHandler {
    edge: LoopEdge,
}

impl MouseHandler for LoopRegionHandler {
    fn name(&self) -> &'static str {
        "LoopRegion"
    }

    fn mouse_move(&mut self, state: &mut TimelineState, arg: &MouseArg) {
        let time = state.time_at(arg.pos.x);
        state.document.ruler.set_loop_edge(self.edge, time);
    }

    fn mouse_up(&mut self, _state: &mut TimelineState, _arg: &MouseArg) {}
}

/// Drag the selected keyframes
#[derive(Debug)]
pub struct KeyframeHandler {
    start: Pos2,
    /// (track, keyframe, time, value) at press
    origins: Vec<(TrackId, KeyframeId, f32, f32)>,
    moved: bool,
}

impl KeyframeHandler {
    fn new(state: &mut TimelineState, track: TrackId, keyframe: KeyframeId, start: Pos2) -> Self {
        if !state.selection.contains(track, keyframe) {
            state.selection.replace([(track, keyframe)]);
        }

        let origins = state
            .selection
            .iter()
            .filter_map(|(track, keyframe)| {
                let kf = state.document.track(*track)?.as_value()?.keyframe(*keyframe)?;
                Some((*track, *keyframe, kf.time, kf.value))
            })
            .collect();

        Self {
            start,
            origins,
            moved: false,
        }
    }
}

impl MouseHandler for KeyframeHandler {
    fn name(&self) -> &'static str {
        "Keyframe"
    }

    fn mouse_move(&mut self, state: &mut TimelineState, arg: &MouseArg) {
        let delta = arg.pos - self.start;
        let dt = state.document.ruler.x_to_duration(delta.x);

        for (track, keyframe, time, value) in &self.origins {
            let Some(view) = state.tracks.get(*track) else {
                continue;
            };
            let Some(values) = state.document.track_mut(*track).and_then(|t| t.as_value_mut()) else {
                continue;
            };
            let dv = view.dy_to_value(delta.y, values);
            values.move_keyframe(*keyframe, time + dt, value + dv);
        }
        self.moved = true;
    }

    fn mouse_up(&mut self, state: &mut TimelineState, _arg: &MouseArg) {
        if !self.moved {
            return;
        }

        let mut per_track: HashMap<TrackId, Vec<_>> = HashMap::new();
        for (track, keyframe, time, value) in &self.origins {
            let Some(kf) = state
                .document
                .track(*track)
                .and_then(|t| t.as_value())
                .and_then(|v| v.keyframe(*keyframe))
            else {
                continue;
            };
            per_track
                .entry(*track)
                .or_default()
                .push((*keyframe, (*time, *value), (kf.time, kf.value)));
        }

        for (track, moves) in per_track {
            let command = MoveKeyframesCommand::new(track, moves);
            if let Err(err) = state.history.insert(Box::new(command), &mut state.document) {
                tracing::warn!("Failed to record keyframe move: {err}");
            }
        }
    }
}

/// Seek by pressing or dragging on the ruler
#[derive(Debug)]
pub struct SeekHandler;

impl MouseHandler for SeekHandler {
    fn name(&self) -> &'static str {
        "Seek"
    }

    fn mouse_move(&mut self, state: &mut TimelineState, arg: &MouseArg) {
        let time = state.time_at(arg.pos.x);
        state.timer.seek(time);
    }

    fn mouse_up(&mut self, _state: &mut TimelineState, _arg: &MouseArg) {}
}

/// Drag the time cursor
#[derive(Debug)]
pub struct TimeBarHandler {
    grab_offset: f32,
}

impl MouseHandler for TimeBarHandler {
    fn name(&self) -> &'static str {
        "TimeBar"
    }

    fn mouse_move(&mut self, state: &mut TimelineState, arg: &MouseArg) {
        let time = state.time_at(arg.pos.x - self.grab_offset);
        state.timer.seek(time);
    }

    fn mouse_up(&mut self, _state: &mut TimelineState, _arg: &MouseArg) {}
}

/// Session of a right click on a track; the menu was opened on press
#[derive(Debug)]
pub struct TrackMenuHandler;

impl MouseHandler for TrackMenuHandler {
    fn name(&self) -> &'static str {
        "TrackMenu"
    }

    fn mouse_move(&mut self, _state: &mut TimelineState, _arg: &MouseArg) {}

    fn mouse_up(&mut self, _state: &mut TimelineState, _arg: &MouseArg) {}
}

/// Session of a press on the background
#[derive(Debug)]
pub struct MainMenuHandler;

impl MouseHandler for MainMenuHandler {
    fn name(&self) -> &'static str {
        "MainMenu"
    }

    fn mouse_move(&mut self, _state: &mut TimelineState, _arg: &MouseArg) {}

    fn mouse_up(&mut self, _state: &mut TimelineState, _arg: &MouseArg) {}
}
