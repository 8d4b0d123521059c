// SPDX-License-Identifier: MIT OR Apache-2.0
//! Document model for Timeliner.
//!
//! This crate holds everything a timeline shows, independent of drawing:
//! - Value tracks with keyframes and audio tracks
//! - Track order with synchronous change notification
//! - Ruler with loop region and viewport
//! - Transport timer
//! - Undoable commands and history

pub mod commands;
pub mod document;
pub mod error;
pub mod history;
pub mod keyframe;
pub mod ruler;
pub mod timer;
pub mod track;

pub use commands::{AddTrackCommand, DocumentCommand, MoveKeyframesCommand, RemoveTrackCommand};
pub use document::{Document, OrderChange, OrderObserver};
pub use error::{ModelError, Result};
pub use history::{History, HistoryStats, StateSnapshot};
pub use keyframe::{InterpolationMode, Keyframe, KeyframeId};
pub use ruler::{LoopEdge, Ruler};
pub use timer::Timer;
pub use track::{AudioTrack, Track, TrackContent, TrackId, TrackKind, ValueTrack};
