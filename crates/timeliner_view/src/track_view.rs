// SPDX-License-Identifier: MIT OR Apache-2.0
//! Visual counterpart of a document track.

use crate::config::{Palette, ViewConfig};
use crate::router::{HitTarget, TargetMap};
use crate::scene::{MouseEvents, SceneNode};
use crate::view::{BuildContext, SvgBuild};
use crate::widgets::{ButtonAction, MenuWidget};
use egui::{Pos2, Rect, Vec2};
use timeliner_model::{Track, TrackContent, TrackId, TrackKind, ValueTrack};

const KEYFRAME_SIZE: f32 = 10.0;
const LABEL_FONT_SIZE: f32 = 12.0;

/// View of one track
#[derive(Debug, Clone)]
pub struct TrackView {
    /// Model track
    pub track: TrackId,
    /// Kind of the model track
    pub kind: TrackKind,
    /// Element id of the track background
    pub id: String,
    /// Context menu
    pub menu: MenuWidget,
    order: usize,
    top: f32,
    height: f32,
    value_label: Option<String>,
    built_ids: Vec<String>,
}

impl TrackView {
    /// Create the view for `track`, laid out at its current order
    pub fn new(track: &Track, id: String, config: &ViewConfig) -> Self {
        let mut menu = MenuWidget::new(format!("{id}/Menu"), config.menu_width, config.menu_item_height);
        menu.add_item("Move Up", ButtonAction::MoveTrackUp(track.id));
        menu.add_item("Move Down", ButtonAction::MoveTrackDown(track.id));
        menu.add_item("Remove Track", ButtonAction::RemoveTrack(track.id));

        let mut view = Self {
            track: track.id,
            kind: track.kind(),
            id,
            menu,
            order: track.order(),
            top: 0.0,
            height: config.track_height,
            value_label: None,
            built_ids: Vec::new(),
        };
        view.update_height_and_pos(track.order(), config.track_height);
        view
    }

    /// Lay the track out at slot `order`
    pub fn update_height_and_pos(&mut self, order: usize, track_height: f32) {
        self.order = order;
        self.height = track_height;
        self.top = order as f32 * track_height;
    }

    /// Order the view was last laid out at
    pub fn order(&self) -> usize {
        self.order
    }

    /// Top edge inside the track group
    pub fn top(&self) -> f32 {
        self.top
    }

    /// Current value text of a value track
    pub fn value_label(&self) -> Option<&str> {
        self.value_label.as_deref()
    }

    /// Refresh the current value from the model at `time`
    pub fn evaluate(&mut self, track: &Track, time: f32) {
        self.value_label = track
            .as_value()
            .and_then(|v| v.evaluate(time))
            .map(|v| format!("{v:.3}"));
    }

    /// Y of `value` inside this track
    pub fn value_to_y(&self, value: f32, track: &ValueTrack) -> f32 {
        let (low, high) = track.range();
        let span = high - low;
        if span <= f32::EPSILON {
            return self.height * 0.5;
        }
        self.height * (1.0 - (value - low) / span)
    }

    /// Value change for a vertical pixel delta (down is negative)
    pub fn dy_to_value(&self, dy: f32, track: &ValueTrack) -> f32 {
        let (low, high) = track.range();
        -dy * (high - low) / self.height
    }

    fn keyframe_id(&self, keyframe: &timeliner_model::Keyframe) -> String {
        format!("{}/Keyframe/{}", self.id, keyframe.id.0)
    }

    fn register(&mut self, targets: &mut TargetMap, id: String, target: HitTarget) {
        targets.insert(id.clone(), target);
        self.built_ids.push(id);
    }
}

impl SvgBuild for TrackView {
    fn build_svg(&mut self, ctx: &mut BuildContext<'_>) -> SceneNode {
        self.built_ids.clear();
        let mut group = SceneNode::group(format!("{}/Group", self.id)).with_translate(0.0, self.top);

        let Some(track) = ctx.document.track(self.track) else {
            tracing::warn!(track = %self.track, "track view without model");
            return group;
        };
        let colors = &ctx.config.colors;

        let background = SceneNode::rect(
            self.id.clone(),
            Rect::from_min_size(Pos2::ZERO, Vec2::new(ctx.config.width, self.height)),
        )
        .with_fill(Palette::color(colors.track))
        .with_stroke(Palette::color(colors.black))
        .listening(MouseEvents::DRAG);
        self.register(
            ctx.targets,
            self.id.clone(),
            HitTarget::Track {
                track: self.track,
                kind: self.kind,
            },
        );
        group.push(background);

        group.push(
            SceneNode::text(
                format!("{}/Label", self.id),
                4.0,
                LABEL_FONT_SIZE + 2.0,
                track.label.clone(),
                LABEL_FONT_SIZE,
            )
            .without_pointer(),
        );

        match &track.content {
            TrackContent::Value(values) => {
                if let Some(label) = &self.value_label {
                    group.push(
                        SceneNode::text(
                            format!("{}/Value", self.id),
                            4.0,
                            self.height - 4.0,
                            label.clone(),
                            LABEL_FONT_SIZE,
                        )
                        .without_pointer(),
                    );
                }

                let half = KEYFRAME_SIZE / 2.0;
                for keyframe in values.keyframes() {
                    let x = ctx.document.ruler.time_to_x(keyframe.time);
                    if x < -half || x > ctx.config.width + half {
                        continue;
                    }
                    let y = self.value_to_y(keyframe.value, values);
                    let selected = ctx.selection.contains(self.track, keyframe.id);
                    let fill = if selected { colors.selected } else { colors.keyframe };

                    let id = self.keyframe_id(keyframe);
                    let diamond = SceneNode::polygon(
                        id.clone(),
                        vec![[x, y - half], [x + half, y], [x, y + half], [x - half, y]],
                    )
                    .with_fill(Palette::color(fill))
                    .listening(MouseEvents::DRAG);
                    self.register(
                        ctx.targets,
                        id,
                        HitTarget::Keyframe {
                            track: self.track,
                            keyframe: keyframe.id,
                        },
                    );
                    group.push(diamond);
                }
            }
            TrackContent::Audio(audio) => {
                group.push(
                    SceneNode::text(
                        format!("{}/File", self.id),
                        4.0,
                        self.height - 4.0,
                        audio.path.clone(),
                        LABEL_FONT_SIZE,
                    )
                    .without_pointer(),
                );
            }
        }

        group
    }

    fn unbuild_svg(&mut self, targets: &mut TargetMap) {
        for id in self.built_ids.drain(..) {
            targets.remove(&id);
        }
        self.menu.hide();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::Selection;
    use timeliner_model::{Document, Keyframe};

    #[test]
    fn test_layout_follows_order() {
        let config = ViewConfig::default();
        let track = Track::value("v", 2);
        let mut view = TrackView::new(&track, "t".into(), &config);
        assert_eq!(view.top(), 100.0);
        view.update_height_and_pos(0, 30.0);
        assert_eq!(view.top(), 0.0);
        assert_eq!(view.value_to_y(0.0, track.as_value().unwrap()), 30.0);
        assert_eq!(view.order(), 0);
    }

    #[test]
    fn test_value_mapping() {
        let config = ViewConfig::default();
        let track = Track::value("v", 0);
        let view = TrackView::new(&track, "t".into(), &config);
        let values = track.as_value().unwrap();
        assert_eq!(view.value_to_y(1.0, values), 0.0);
        assert_eq!(view.value_to_y(0.0, values), 50.0);
        assert_eq!(view.dy_to_value(-25.0, values), 0.5);
    }

    #[test]
    fn test_build_and_unbuild_targets() {
        let config = ViewConfig::default();
        let mut doc = Document::new("doc");
        let mut track = Track::value("v", 0);
        let kf = track.as_value_mut().unwrap().add_keyframe(Keyframe::new(1.0, 0.5));
        let id = doc.insert_track(track).unwrap();

        let mut view = TrackView::new(doc.track(id).unwrap(), "doc/1".into(), &config);
        let selection = Selection::default();
        let mut targets = TargetMap::new();
        let node = {
            let mut ctx = BuildContext {
                document: &doc,
                selection: &selection,
                config: &config,
                targets: &mut targets,
            };
            view.build_svg(&mut ctx)
        };

        assert_eq!(targets.len(), 2);
        let kf_id = format!("doc/1/Keyframe/{}", kf.0);
        assert_eq!(
            targets.get(&kf_id),
            Some(&HitTarget::Keyframe { track: id, keyframe: kf })
        );
        assert!(node.find(&kf_id).is_some());

        view.unbuild_svg(&mut targets);
        assert!(targets.is_empty());
    }

    #[test]
    fn test_evaluate_sets_value_label() {
        let config = ViewConfig::default();
        let mut track = Track::value("v", 0);
        track.as_value_mut().unwrap().add_keyframe(Keyframe::new(0.0, 0.25));
        let mut view = TrackView::new(&track, "t".into(), &config);
        view.evaluate(&track, 3.0);
        assert_eq!(view.value_label(), Some("0.250"));

        let audio = Track::audio("a", 1, "x.wav");
        let mut audio_view = TrackView::new(&audio, "a".into(), &config);
        audio_view.evaluate(&audio, 3.0);
        assert_eq!(audio_view.value_label(), None);
    }
}
