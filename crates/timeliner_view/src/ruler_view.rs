// SPDX-License-Identifier: MIT OR Apache-2.0
//! Time ruler with loop region markers.

use crate::config::Palette;
use crate::router::{HitTarget, TargetMap};
use crate::scene::{MouseEvents, SceneNode};
use crate::view::{BuildContext, SvgBuild};
use egui::{Pos2, Rect, Vec2};

const MARKER_SIZE: f32 = 8.0;
const TICK_FONT_SIZE: f32 = 9.0;
/// Upper bound on ticks per build
const MAX_TICKS: usize = 256;

/// Ruler strip above the tracks
#[derive(Debug, Clone)]
pub struct RulerView {
    /// Element id of the ruler background
    pub id: String,
    /// Element id of the loop start marker
    pub loop_start_id: String,
    /// Element id of the loop end marker
    pub loop_end_id: String,
}

impl RulerView {
    /// Create the ruler view with ids under `prefix`
    pub fn new(prefix: &str) -> Self {
        Self {
            id: format!("{prefix}/Ruler"),
            loop_start_id: format!("{prefix}/LoopStart"),
            loop_end_id: format!("{prefix}/LoopEnd"),
        }
    }

    /// Seconds between ticks so that labels stay at least 50px apart
    pub fn tick_interval(pixels_per_second: f32) -> f32 {
        const STEPS: [f32; 8] = [0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0];
        STEPS
            .iter()
            .copied()
            .find(|step| step * pixels_per_second >= 50.0)
            .unwrap_or(60.0)
    }
}

impl SvgBuild for RulerView {
    fn build_svg(&mut self, ctx: &mut BuildContext<'_>) -> SceneNode {
        let config = ctx.config;
        let ruler = &ctx.document.ruler;
        let black = Palette::color(config.colors.black);
        let height = config.ruler_height;

        let mut group = SceneNode::group(format!("{}/Group", self.id));

        ctx.targets.insert(self.id.clone(), HitTarget::Ruler);
        group.push(
            SceneNode::rect(
                self.id.clone(),
                Rect::from_min_size(Pos2::ZERO, Vec2::new(config.width, height)),
            )
            .with_fill(Palette::color(config.colors.light_gray))
            .listening(MouseEvents::DRAG),
        );

        let start_x = ruler.time_to_x(ruler.loop_start());
        let end_x = ruler.time_to_x(ruler.loop_end());
        group.push(
            SceneNode::rect(
                format!("{}/LoopRegion", self.id),
                Rect::from_min_max(Pos2::new(start_x, 0.0), Pos2::new(end_x, height)),
            )
            .with_fill(Palette::color(config.colors.loop_region))
            .with_attr("fill-opacity", "0.3")
            .without_pointer(),
        );

        let interval = Self::tick_interval(ruler.pixels_per_second());
        let first = (ruler.view_start / interval).floor().max(0.0) as i64;
        for index in (first..).take(MAX_TICKS) {
            let time = index as f32 * interval;
            let x = ruler.time_to_x(time);
            if x.is_nan() || x > config.width {
                break;
            }
            if x >= 0.0 {
                group.push(
                    SceneNode::line(format!("{}/Tick/{index}", self.id), x, height * 0.5, x, height)
                        .with_stroke(black)
                        .without_pointer(),
                );
                group.push(
                    SceneNode::text(
                        format!("{}/TickLabel/{index}", self.id),
                        x + 2.0,
                        TICK_FONT_SIZE,
                        format!("{time:.1}"),
                        TICK_FONT_SIZE,
                    )
                    .without_pointer(),
                );
            }
        }

        let half = MARKER_SIZE / 2.0;
        ctx.targets.insert(self.loop_start_id.clone(), HitTarget::LoopStart);
        group.push(
            SceneNode::polygon(
                self.loop_start_id.clone(),
                vec![[start_x, height], [start_x, height - MARKER_SIZE], [start_x + half, height]],
            )
            .with_fill(black)
            .with_attr("style", "cursor:col-resize")
            .listening(MouseEvents::DRAG),
        );
        ctx.targets.insert(self.loop_end_id.clone(), HitTarget::LoopEnd);
        group.push(
            SceneNode::polygon(
                self.loop_end_id.clone(),
                vec![[end_x, height], [end_x, height - MARKER_SIZE], [end_x - half, height]],
            )
            .with_fill(black)
            .with_attr("style", "cursor:col-resize")
            .listening(MouseEvents::DRAG),
        );

        group
    }

    fn unbuild_svg(&mut self, targets: &mut TargetMap) {
        targets.remove(&self.id);
        targets.remove(&self.loop_start_id);
        targets.remove(&self.loop_end_id);
    }
}
