// SPDX-License-Identifier: MIT OR Apache-2.0
//! Building blocks shared by the views.

use crate::config::ViewConfig;
use crate::router::TargetMap;
use crate::scene::SceneNode;
use crate::selection::Selection;
use timeliner_model::Document;

/// Everything a view needs to build its scene subtree
pub struct BuildContext<'a> {
    /// Document being shown
    pub document: &'a Document,
    /// Selected keyframes
    pub selection: &'a Selection,
    /// Layout and colors
    pub config: &'a ViewConfig,
    /// Element id to hit target table, filled while building
    pub targets: &'a mut TargetMap,
}

/// A view that draws itself into the scene
pub trait SvgBuild {
    /// Build this view's scene subtree and register its hit targets
    fn build_svg(&mut self, ctx: &mut BuildContext<'_>) -> SceneNode;

    /// Release this view's scene subtree and hit targets
    fn unbuild_svg(&mut self, targets: &mut TargetMap);
}
