// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timeline view for Timeliner.
//!
//! Renders a [`timeliner_model::Document`] into a retained scene graph and
//! turns host pointer events into edits:
//! - Pointer routing and per-session interaction handlers
//! - Track views kept in step with the document's tracks and their order
//! - Ruler, time bar, menus and transport buttons

pub mod config;
pub mod error;
pub mod handlers;
pub mod reorder;
pub mod router;
pub mod ruler_view;
pub mod scene;
pub mod selection;
pub mod sync;
pub mod timeline;
pub mod track_view;
pub mod tracks;
pub mod view;
pub mod widgets;

pub use config::{Palette, ViewConfig};
pub use error::{Result, ViewError};
pub use handlers::MouseHandler;
pub use router::{
    route, ActiveHandler, HandlerKind, HitTarget, MouseArg, Route, SessionId, Sessions, TargetMap,
    BUTTON_LEFT, BUTTON_MIDDLE, BUTTON_RIGHT,
};
pub use ruler_view::RulerView;
pub use scene::{MouseEvents, NodeKind, SceneNode};
pub use selection::Selection;
pub use sync::SyncReport;
pub use timeline::{TimelineState, TimelineView};
pub use track_view::TrackView;
pub use tracks::TrackList;
pub use view::{BuildContext, SvgBuild};
pub use widgets::{ButtonAction, ButtonWidget, IconButton, MenuWidget};
