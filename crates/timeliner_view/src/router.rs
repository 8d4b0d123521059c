// SPDX-License-Identifier: MIT OR Apache-2.0
//! Pointer dispatch.
//!
//! A mouse-down is resolved to a [`HitTarget`] from the element it landed on,
//! then [`route`] picks the one interaction handler that owns the rest of
//! that pointer session.

use crate::handlers::MouseHandler;
use crate::widgets::ButtonAction;
use egui::Pos2;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use timeliner_model::{KeyframeId, LoopEdge, TrackId, TrackKind};

/// Primary (left) mouse button
pub const BUTTON_LEFT: u8 = 1;
/// Secondary (right) mouse button
pub const BUTTON_RIGHT: u8 = 2;
/// Middle mouse button
pub const BUTTON_MIDDLE: u8 = 3;

/// Host supplied id of one mouse-down-to-mouse-up interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(pub u32);

/// A mouse event as reported by the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseArg {
    /// Button number, 1 = left, 2 = right, 3 = middle
    pub button: u8,
    /// Pointer session
    pub session: SessionId,
    /// Pointer position in scene coordinates
    pub pos: Pos2,
}

impl MouseArg {
    /// Create a mouse event
    pub fn new(session: SessionId, button: u8, x: f32, y: f32) -> Self {
        Self {
            button,
            session,
            pos: Pos2::new(x, y),
        }
    }
}

/// Category of the element under the pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HitTarget {
    /// A widget that handles its own presses
    Button(ButtonAction),
    /// Track background
    Track {
        /// Track
        track: TrackId,
        /// Runtime kind of the track
        kind: TrackKind,
    },
    /// Ruler strip
    Ruler,
    /// Loop start marker
    LoopStart,
    /// Loop end marker
    LoopEnd,
    /// Keyframe marker
    Keyframe {
        /// Owning track
        track: TrackId,
        /// Keyframe
        keyframe: KeyframeId,
    },
    /// Time cursor
    TimeBar,
    /// Anything else
    Background,
}

/// Element id to hit target, rebuilt with the scene
pub type TargetMap = HashMap<String, HitTarget>;

/// Interaction handler chosen for a mouse-down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerKind {
    /// The widget itself handles the press
    Widget(ButtonAction),
    /// Rubber band keyframe selection
    Selection(TrackId),
    /// Track context menu
    TrackMenu(TrackId),
    /// Pan the view
    TrackPan,
    /// Seek the timer
    Seek,
    /// Drag a loop edge
    LoopRegion(LoopEdge),
    /// Drag keyframes
    Keyframe {
        /// Owning track
        track: TrackId,
        /// Grabbed keyframe
        keyframe: KeyframeId,
    },
    /// Drag the time cursor
    TimeBar,
    /// Main menu / deselect
    MainMenu,
}

/// Routing decision for a mouse-down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    /// Close open menus before creating the handler
    pub hide_menus: bool,
    /// Handler owning the session, `None` for a no-op
    pub handler: Option<HandlerKind>,
}

impl Route {
    fn hiding(handler: Option<HandlerKind>) -> Self {
        Self {
            hide_menus: true,
            handler,
        }
    }
}

/// Pick the handler for a mouse-down on `target` with `button`.
pub fn route(target: &HitTarget, button: u8) -> Route {
    match *target {
        HitTarget::Button(action) => Route {
            hide_menus: false,
            handler: Some(HandlerKind::Widget(action)),
        },
        HitTarget::Track { track, kind } => Route::hiding(match button {
            BUTTON_LEFT if kind == TrackKind::Value => Some(HandlerKind::Selection(track)),
            BUTTON_RIGHT => Some(HandlerKind::TrackMenu(track)),
            BUTTON_MIDDLE => Some(HandlerKind::TrackPan),
            _ => None,
        }),
        HitTarget::Ruler => Route::hiding(match button {
            BUTTON_LEFT => Some(HandlerKind::Seek),
            BUTTON_MIDDLE => Some(HandlerKind::TrackPan),
            _ => None,
        }),
        HitTarget::LoopStart => Route::hiding(
            (button == BUTTON_LEFT).then_some(HandlerKind::LoopRegion(LoopEdge::Start)),
        ),
        HitTarget::LoopEnd => Route::hiding(
            (button == BUTTON_LEFT).then_some(HandlerKind::LoopRegion(LoopEdge::End)),
        ),
        HitTarget::Keyframe { track, keyframe } => {
            Route::hiding(Some(HandlerKind::Keyframe { track, keyframe }))
        }
        HitTarget::TimeBar => Route::hiding(Some(HandlerKind::TimeBar)),
        HitTarget::Background => Route::hiding(Some(HandlerKind::MainMenu)),
    }
}

/// Handler owning a pointer session
pub enum ActiveHandler {
    /// Press went to a widget; later events are swallowed
    Widget(ButtonAction),
    /// Interaction handler
    Handler(Box<dyn MouseHandler>),
}

impl std::fmt::Debug for ActiveHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Widget(action) => f.debug_tuple("Widget").field(action).finish(),
            Self::Handler(h) => f.debug_tuple("Handler").field(&h.name()).finish(),
        }
    }
}

/// Active pointer sessions
#[derive(Debug, Default)]
pub struct Sessions {
    active: HashMap<SessionId, ActiveHandler>,
}

impl Sessions {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session. A handler still open on the same session is dropped.
    pub fn begin(&mut self, session: SessionId, handler: ActiveHandler) {
        if let Some(old) = self.active.insert(session, handler) {
            tracing::debug!(?session, ?old, "session restarted, dropping previous handler");
        }
    }

    /// Take the handler out for an event; hand it back with [`restore`](Self::restore).
    pub fn take(&mut self, session: SessionId) -> Option<ActiveHandler> {
        self.active.remove(&session)
    }

    /// Put a handler back after an event
    pub fn restore(&mut self, session: SessionId, handler: ActiveHandler) {
        self.active.insert(session, handler);
    }

    /// End a session without notifying its handler
    pub fn cancel(&mut self, session: SessionId) -> bool {
        self.active.remove(&session).is_some()
    }

    /// Whether a session is open
    pub fn is_active(&self, session: SessionId) -> bool {
        self.active.contains_key(&session)
    }

    /// Name of the handler owning a session
    pub fn handler_name(&self, session: SessionId) -> Option<&'static str> {
        self.active.get(&session).map(|h| match h {
            ActiveHandler::Widget(_) => "Widget",
            ActiveHandler::Handler(h) => h.name(),
        })
    }

    /// Number of open sessions
    pub fn len(&self) -> usize {
        self.active.len()
    }

    /// Whether no session is open
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_targets() -> Vec<HitTarget> {
        let track = TrackId::new();
        vec![
            HitTarget::Button(ButtonAction::AddTrack),
            HitTarget::Track { track, kind: TrackKind::Value },
            HitTarget::Track { track, kind: TrackKind::Audio },
            HitTarget::Ruler,
            HitTarget::LoopStart,
            HitTarget::LoopEnd,
            HitTarget::Keyframe { track, keyframe: KeyframeId::new() },
            HitTarget::TimeBar,
            HitTarget::Background,
        ]
    }

    #[test]
    fn test_track_routes() {
        let track = TrackId::new();
        let value = HitTarget::Track { track, kind: TrackKind::Value };
        let audio = HitTarget::Track { track, kind: TrackKind::Audio };

        assert_eq!(route(&value, 1).handler, Some(HandlerKind::Selection(track)));
        assert_eq!(route(&audio, 1).handler, None);
        assert_eq!(route(&audio, 2).handler, Some(HandlerKind::TrackMenu(track)));
        assert_eq!(route(&value, 3).handler, Some(HandlerKind::TrackPan));
        assert_eq!(route(&value, 4).handler, None);
        assert!(route(&audio, 4).hide_menus);
    }

    #[test]
    fn test_ruler_and_loop_routes() {
        assert_eq!(route(&HitTarget::Ruler, 1).handler, Some(HandlerKind::Seek));
        assert_eq!(route(&HitTarget::Ruler, 2).handler, None);
        assert_eq!(route(&HitTarget::Ruler, 3).handler, Some(HandlerKind::TrackPan));
        assert_eq!(
            route(&HitTarget::LoopStart, 1).handler,
            Some(HandlerKind::LoopRegion(LoopEdge::Start))
        );
        assert_eq!(
            route(&HitTarget::LoopEnd, 1).handler,
            Some(HandlerKind::LoopRegion(LoopEdge::End))
        );
        assert_eq!(route(&HitTarget::LoopEnd, 3).handler, None);
    }

    #[test]
    fn test_button_independent_routes() {
        let track = TrackId::new();
        let keyframe = KeyframeId::new();
        for button in 0..=5 {
            assert_eq!(
                route(&HitTarget::Keyframe { track, keyframe }, button).handler,
                Some(HandlerKind::Keyframe { track, keyframe })
            );
            assert_eq!(route(&HitTarget::TimeBar, button).handler, Some(HandlerKind::TimeBar));
            assert_eq!(route(&HitTarget::Background, button).handler, Some(HandlerKind::MainMenu));
            assert_eq!(
                route(&HitTarget::Button(ButtonAction::Stop), button).handler,
                Some(HandlerKind::Widget(ButtonAction::Stop))
            );
        }
    }

    #[test]
    fn test_only_widgets_keep_menus() {
        for target in all_targets() {
            for button in 0..=4 {
                let r = route(&target, button);
                let is_widget = matches!(target, HitTarget::Button(_));
                assert_eq!(r.hide_menus, !is_widget, "{target:?} button {button}");
                if is_widget {
                    assert!(matches!(r.handler, Some(HandlerKind::Widget(_))));
                }
            }
        }
    }

    #[test]
    fn test_sessions_are_independent() {
        let mut sessions = Sessions::new();
        sessions.begin(SessionId(1), ActiveHandler::Widget(ButtonAction::Stop));
        sessions.begin(SessionId(2), ActiveHandler::Widget(ButtonAction::AddTrack));
        assert_eq!(sessions.len(), 2);

        let Some(ActiveHandler::Widget(action)) = sessions.take(SessionId(2)) else {
            panic!("session 2 missing");
        };
        assert_eq!(action, ButtonAction::AddTrack);
        assert!(sessions.is_active(SessionId(1)));
        assert!(!sessions.is_active(SessionId(2)));

        assert!(sessions.cancel(SessionId(1)));
        assert!(!sessions.cancel(SessionId(1)));
        assert!(sessions.is_empty());
    }
}
