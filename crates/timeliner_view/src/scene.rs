// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scene graph handed to the host for drawing.
//!
//! Nodes are plain data: geometry, style attributes, the mouse events the
//! host should report for them, and a stable element id.

use egui::{Color32, Rect};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Mouse events a node wants reported
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MouseEvents {
    /// Button pressed
    pub down: bool,
    /// Pointer moved
    pub moved: bool,
    /// Button released
    pub up: bool,
    /// Pointer entered
    pub over: bool,
    /// Pointer left
    pub out: bool,
}

impl MouseEvents {
    /// No events
    pub const NONE: Self = Self {
        down: false,
        moved: false,
        up: false,
        over: false,
        out: false,
    };

    /// Down, move and up: everything a drag needs
    pub const DRAG: Self = Self {
        down: true,
        moved: true,
        up: true,
        over: false,
        out: false,
    };

    /// Press plus hover feedback, for buttons
    pub const BUTTON: Self = Self {
        down: true,
        moved: false,
        up: false,
        over: true,
        out: true,
    };
}

/// Drawable content of a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Container for children
    Group,
    /// Axis aligned rectangle
    Rect {
        /// Left
        x: f32,
        /// Top
        y: f32,
        /// Width
        width: f32,
        /// Height
        height: f32,
    },
    /// Straight line
    Line {
        /// Start x
        x1: f32,
        /// Start y
        y1: f32,
        /// End x
        x2: f32,
        /// End y
        y2: f32,
    },
    /// Text run
    Text {
        /// Baseline x
        x: f32,
        /// Baseline y
        y: f32,
        /// Content
        text: String,
        /// Font size in pixels
        font_size: f32,
    },
    /// Closed polygon
    Polygon {
        /// Corner points
        points: Vec<[f32; 2]>,
    },
    /// Embedded icon document
    Icon {
        /// Path of the icon file
        href: String,
        /// Left
        x: f32,
        /// Width
        width: f32,
        /// Height
        height: f32,
    },
}

/// A node of the scene tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneNode {
    /// Stable element id
    pub id: String,
    /// Drawable content
    pub kind: NodeKind,
    /// Translation applied to this node and its children
    pub translate: Option<[f32; 2]>,
    /// Style and custom attributes
    pub attributes: IndexMap<String, String>,
    /// Child nodes, drawn in order
    pub children: Vec<SceneNode>,
    /// Mouse events to report
    pub listens: MouseEvents,
}

impl SceneNode {
    fn new(id: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            kind,
            translate: None,
            attributes: IndexMap::new(),
            children: Vec::new(),
            listens: MouseEvents::NONE,
        }
    }

    /// Empty group
    pub fn group(id: impl Into<String>) -> Self {
        Self::new(id, NodeKind::Group)
    }

    /// Rectangle covering `rect`
    pub fn rect(id: impl Into<String>, rect: Rect) -> Self {
        Self::new(
            id,
            NodeKind::Rect {
                x: rect.min.x,
                y: rect.min.y,
                width: rect.width(),
                height: rect.height(),
            },
        )
    }

    /// Line from `(x1, y1)` to `(x2, y2)`
    pub fn line(id: impl Into<String>, x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self::new(id, NodeKind::Line { x1, y1, x2, y2 })
    }

    /// Text with its baseline at `(x, y)`
    pub fn text(id: impl Into<String>, x: f32, y: f32, text: impl Into<String>, font_size: f32) -> Self {
        Self::new(
            id,
            NodeKind::Text {
                x,
                y,
                text: text.into(),
                font_size,
            },
        )
    }

    /// Closed polygon
    pub fn polygon(id: impl Into<String>, points: Vec<[f32; 2]>) -> Self {
        Self::new(id, NodeKind::Polygon { points })
    }

    /// Icon document loaded by the host from `href`
    pub fn icon(id: impl Into<String>, href: impl Into<String>, x: f32, width: f32, height: f32) -> Self {
        Self::new(
            id,
            NodeKind::Icon {
                href: href.into(),
                x,
                width,
                height,
            },
        )
    }

    /// Set the translation
    pub fn with_translate(mut self, x: f32, y: f32) -> Self {
        self.translate = Some([x, y]);
        self
    }

    /// Set an attribute
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Set the fill color
    pub fn with_fill(self, color: Color32) -> Self {
        self.with_attr("fill", hex(color))
    }

    /// Set the stroke color
    pub fn with_stroke(self, color: Color32) -> Self {
        self.with_attr("stroke", hex(color))
    }

    /// Set the mouse events to report
    pub fn listening(mut self, events: MouseEvents) -> Self {
        self.listens = events;
        self
    }

    /// Make the node transparent to the pointer
    pub fn without_pointer(self) -> Self {
        self.with_attr("pointer-events", "none")
    }

    /// Hide the node (and its children)
    pub fn hidden(self) -> Self {
        self.with_attr("display", "none")
    }

    /// Append a child
    pub fn push(&mut self, child: SceneNode) {
        self.children.push(child);
    }

    /// Builder form of [`push`](Self::push)
    pub fn with_child(mut self, child: SceneNode) -> Self {
        self.children.push(child);
        self
    }

    /// Whether the node is drawn
    pub fn is_visible(&self) -> bool {
        self.attributes.get("display").map(String::as_str) != Some("none")
    }

    /// Find a node by id in this subtree
    pub fn find(&self, id: &str) -> Option<&SceneNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }

    /// Visit every node of this subtree, parents first
    pub fn walk(&self, f: &mut impl FnMut(&SceneNode)) {
        f(self);
        for child in &self.children {
            child.walk(f);
        }
    }

    /// Number of nodes in this subtree
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(SceneNode::count).sum::<usize>()
    }
}

/// CSS hex notation of a color
pub fn hex(color: Color32) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r(), color.g(), color.b())
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::Pos2;

    #[test]
    fn test_find_and_count() {
        let mut root = SceneNode::group("root");
        let mut group = SceneNode::group("g");
        group.push(SceneNode::line("l", 0.0, 0.0, 1.0, 1.0));
        root.push(group);
        root.push(SceneNode::rect("r", Rect::from_min_max(Pos2::ZERO, Pos2::new(2.0, 3.0))));

        assert_eq!(root.count(), 4);
        assert!(root.find("l").is_some());
        assert!(root.find("missing").is_none());

        let mut ids = Vec::new();
        root.walk(&mut |n| ids.push(n.id.clone()));
        assert_eq!(ids, vec!["root", "g", "l", "r"]);
    }

    #[test]
    fn test_hex_and_visibility() {
        assert_eq!(hex(Color32::from_rgb(255, 0, 16)), "#ff0010");
        let node = SceneNode::group("g");
        assert!(node.is_visible());
        assert!(!node.hidden().is_visible());
    }
}
