// SPDX-License-Identifier: MIT OR Apache-2.0
//! Pointer scripts.
//!
//! A script describes an initial document and a list of host events. The
//! replayer feeds those events to a [`TimelineView`] exactly as a UI host
//! would.

use crate::error::{HarnessError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use timeliner_model::{Document, History, InterpolationMode, Keyframe, ModelError, Timer, Track};
use timeliner_view::{MouseArg, SessionId, TimelineView, ViewConfig, ViewError, BUTTON_LEFT};

/// Initial track of a script document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TrackSpec {
    /// Value track with (time, value) keyframes
    Value {
        /// Label
        label: String,
        /// Keyframes as (time, value)
        #[serde(default)]
        keyframes: Vec<(f32, f32)>,
        /// Display range, `0..=1` when absent
        #[serde(default)]
        range: Option<(f32, f32)>,
        /// Interpolation of every keyframe, linear when absent
        #[serde(default)]
        interpolation: InterpolationMode,
    },
    /// Audio track
    Audio {
        /// Label
        label: String,
        /// Audio file path
        path: String,
    },
}

impl TrackSpec {
    fn build(&self, order: usize) -> Track {
        match self {
            Self::Value {
                label,
                keyframes,
                range,
                interpolation,
            } => {
                let mut track = Track::value(label.clone(), order);
                if let Some(values) = track.as_value_mut() {
                    if let Some((minimum, maximum)) = range {
                        values.minimum = *minimum;
                        values.maximum = *maximum;
                    }
                    for (time, value) in keyframes {
                        values.add_keyframe(Keyframe::new(*time, *value).with_interpolation(*interpolation));
                    }
                }
                track
            }
            Self::Audio { label, path } => Track::audio(label.clone(), order, path.clone()),
        }
    }
}

/// What a mouse-down lands on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Target {
    /// Scene element id
    Element(String),
    /// Background of the track in this visual slot
    Track(usize),
}

/// One host event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Step {
    /// Button pressed
    Down {
        /// Element under the pointer
        target: Target,
        /// Button number
        #[serde(default = "default_button")]
        button: u8,
        /// Pointer session
        #[serde(default)]
        session: u32,
        /// Scene x
        x: f32,
        /// Scene y
        y: f32,
    },
    /// Pointer moved
    Move {
        /// Pointer session
        #[serde(default)]
        session: u32,
        /// Scene x
        x: f32,
        /// Scene y
        y: f32,
    },
    /// Button released
    Up {
        /// Pointer session
        #[serde(default)]
        session: u32,
        /// Scene x
        x: f32,
        /// Scene y
        y: f32,
    },
    /// Session lost by the host
    Cancel {
        /// Pointer session
        #[serde(default)]
        session: u32,
    },
    /// Advance time
    Tick(f32),
    /// Undo the last edit
    Undo,
    /// Redo the last undone edit
    Redo,
    /// Append a value track
    AddTrack,
}

fn default_button() -> u8 {
    BUTTON_LEFT
}

/// A replayable session against one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    /// Document name, also the prefix of every element id
    #[serde(default = "default_document")]
    pub document: String,
    /// Initial tracks, top to bottom
    #[serde(default)]
    pub tracks: Vec<TrackSpec>,
    /// Host events
    #[serde(default)]
    pub steps: Vec<Step>,
}

fn default_document() -> String {
    Document::default().name
}

impl Script {
    /// Parse from RON text
    pub fn from_ron(text: &str) -> Result<Self> {
        Ok(ron::from_str(text)?)
    }

    /// Load from a RON file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_ron(&text)
    }

    /// Build the initial document
    pub fn document(&self) -> Result<Document> {
        let mut document = Document::new(self.document.clone());
        for (order, spec) in self.tracks.iter().enumerate() {
            document.insert_track(spec.build(order))?;
        }
        Ok(document)
    }

    /// Create a view over the initial document and replay every step
    pub fn replay(&self, config: ViewConfig) -> Result<TimelineView> {
        let mut document = self.document()?;
        document.ruler.set_pixels_per_second(config.pixels_per_second);
        let mut view = TimelineView::new(document, History::new(), Timer::new(), config);

        let mut buttons: HashMap<u32, u8> = HashMap::new();
        for (index, step) in self.steps.iter().enumerate() {
            tracing::debug!(index, ?step, "replay");
            match step {
                Step::Down {
                    target,
                    button,
                    session,
                    x,
                    y,
                } => {
                    let element = match target {
                        Target::Element(id) => id.clone(),
                        Target::Track(slot) => view
                            .state()
                            .tracks()
                            .views()
                            .get(*slot)
                            .map(|v| v.id.clone())
                            .ok_or(HarnessError::NoTrackAt { step: index, slot: *slot })?,
                    };
                    buttons.insert(*session, *button);
                    view.mouse_down(&element, MouseArg::new(SessionId(*session), *button, *x, *y))?;
                }
                Step::Move { session, x, y } => {
                    let button = buttons.get(session).copied().unwrap_or(BUTTON_LEFT);
                    view.mouse_move(MouseArg::new(SessionId(*session), button, *x, *y));
                }
                Step::Up { session, x, y } => {
                    let button = buttons.remove(session).unwrap_or(BUTTON_LEFT);
                    view.mouse_up(MouseArg::new(SessionId(*session), button, *x, *y));
                }
                Step::Cancel { session } => {
                    buttons.remove(session);
                    view.cancel_session(SessionId(*session));
                }
                Step::Tick(seconds) => view.evaluate(*seconds),
                Step::Undo => tolerate_empty_history(view.undo())?,
                Step::Redo => tolerate_empty_history(view.redo())?,
                Step::AddTrack => {
                    view.add_track()?;
                }
            }
        }

        Ok(view)
    }
}

/// Undo/redo past the end of the history is reported, not fatal
fn tolerate_empty_history(result: timeliner_view::Result<String>) -> Result<()> {
    match result {
        Ok(_) => Ok(()),
        Err(ViewError::Model(err @ (ModelError::NothingToUndo | ModelError::NothingToRedo))) => {
            tracing::warn!("{err}");
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCRIPT: &str = r#"
        Script(
            document: "doc",
            tracks: [
                Value(label: "Opacity", keyframes: [(1.0, 0.5)]),
                Audio(label: "Music", path: "music.wav"),
                Value(label: "Scale", range: Some((0.0, 2.0))),
            ],
            steps: [
                Down(target: Track(0), button: 2, session: 1, x: 20.0, y: 60.0),
                Up(session: 1, x: 20.0, y: 60.0),
                Down(target: Element("doc/1/Menu/1"), session: 2, x: 25.0, y: 80.0),
                Up(session: 2, x: 25.0, y: 80.0),
                Down(target: Element("doc/Play"), session: 3, x: 5.0, y: 5.0),
                Tick(0.25),
                AddTrack,
                Undo,
                Undo,
                Redo,
                Undo,
            ],
        )
    "#;

    #[test]
    fn test_parse_script() {
        let script = Script::from_ron(SCRIPT).unwrap();
        assert_eq!(script.document, "doc");
        assert_eq!(script.tracks.len(), 3);
        assert_eq!(script.steps.len(), 11);
        assert!(matches!(
            script.steps[2],
            Step::Down { button: BUTTON_LEFT, session: 2, .. }
        ));
    }

    #[test]
    fn test_document_from_specs() {
        let script = Script::from_ron(SCRIPT).unwrap();
        let doc = script.document().unwrap();
        let ids = doc.ids_by_order();
        assert_eq!(ids.len(), 3);

        let scale = doc.track(ids[2]).unwrap().as_value().unwrap();
        assert_eq!(scale.range(), (0.0, 2.0));
        let opacity = doc.track(ids[0]).unwrap().as_value().unwrap();
        assert_eq!(opacity.keyframes().len(), 1);
    }

    #[test]
    fn test_constant_interpolation_holds_values() {
        let script = Script::from_ron(
            "Script(tracks: [Value(label: \"Step\", keyframes: [(0.0, 0.2), (2.0, 1.0)], interpolation: Constant)])",
        )
        .unwrap();
        let doc = script.document().unwrap();
        let step = doc.track(doc.ids_by_order()[0]).unwrap().as_value().unwrap();
        assert_eq!(step.evaluate(1.5), Some(0.2));

        let linear = Script::from_ron(SCRIPT).unwrap().document().unwrap();
        let opacity = linear.track(linear.ids_by_order()[0]).unwrap().as_value().unwrap();
        assert_eq!(opacity.keyframes()[0].interpolation, InterpolationMode::Linear);
    }

    #[test]
    fn test_replay() {
        let script = Script::from_ron(SCRIPT).unwrap();
        let view = script.replay(ViewConfig::default()).unwrap();
        let doc = view.document();

        // "Move Down" moved the first track below the audio track
        let labels: Vec<&str> = doc
            .ids_by_order()
            .into_iter()
            .map(|id| doc.track(id).unwrap().label.as_str())
            .collect();
        assert_eq!(labels, vec!["Music", "Opacity", "Scale"]);

        assert!(view.timer().is_running);
        assert_eq!(view.timer().time, 0.25);
        assert_eq!(doc.track_count(), 3);
        assert!(view.state().history.can_redo());
        assert!(view.sessions().len() <= 1);
    }

    #[test]
    fn test_missing_track_slot_is_error() {
        let script = Script::from_ron(
            "Script(steps: [Down(target: Track(4), x: 0.0, y: 0.0)])",
        )
        .unwrap();
        let err = script.replay(ViewConfig::default()).unwrap_err();
        assert!(matches!(err, HarnessError::NoTrackAt { step: 0, slot: 4 }));
    }
}
