// SPDX-License-Identifier: MIT OR Apache-2.0
//! Button, menu and icon widgets.
//!
//! Widgets handle their own presses: the router hands a press straight to
//! the widget, which answers with the [`ButtonAction`] to perform.

use crate::router::{HitTarget, TargetMap};
use crate::scene::{MouseEvents, SceneNode};
use egui::{Color32, Pos2, Rect, Vec2};
use timeliner_model::TrackId;

const LABEL_FONT_SIZE: f32 = 12.0;

/// What pressing a widget does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonAction {
    /// Start or pause the timer
    TogglePlay,
    /// Stop and rewind the timer
    Stop,
    /// Append a value track
    AddTrack,
    /// Remove a track
    RemoveTrack(TrackId),
    /// Move a track one slot up
    MoveTrackUp(TrackId),
    /// Move a track one slot down
    MoveTrackDown(TrackId),
}

/// Labelled push button
#[derive(Debug, Clone, PartialEq)]
pub struct ButtonWidget {
    /// Element id of the button background
    pub id: String,
    /// Label text
    pub label: String,
    /// Action on press
    pub action: ButtonAction,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl ButtonWidget {
    /// Create a button
    pub fn new(id: impl Into<String>, label: impl Into<String>, action: ButtonAction, size: Vec2) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            action,
            width: size.x,
            height: size.y,
        }
    }

    /// Build the button at vertical offset `y`
    pub fn build(&self, y: f32, targets: &mut TargetMap) -> SceneNode {
        targets.insert(self.id.clone(), HitTarget::Button(self.action));

        let background = SceneNode::rect(
            self.id.clone(),
            Rect::from_min_size(Pos2::ZERO, Vec2::new(self.width, self.height)),
        )
        .with_attr("class", "menu")
        .listening(MouseEvents::BUTTON);

        let label = SceneNode::text(
            format!("{}/Label", self.id),
            2.0,
            LABEL_FONT_SIZE + 2.0,
            self.label.clone(),
            LABEL_FONT_SIZE,
        )
        .with_attr("class", "menufont")
        .without_pointer();

        SceneNode::group(format!("{}/Button", self.id))
            .with_translate(0.0, y)
            .with_child(background)
            .with_child(label)
    }
}

/// Popup menu: a vertical stack of buttons
#[derive(Debug, Clone, PartialEq)]
pub struct MenuWidget {
    /// Element id
    pub id: String,
    /// Width of the entries
    pub width: f32,
    /// Height of one entry
    pub item_height: f32,
    items: Vec<ButtonWidget>,
    visible: bool,
    position: Pos2,
}

impl MenuWidget {
    /// Create a hidden, empty menu
    pub fn new(id: impl Into<String>, width: f32, item_height: f32) -> Self {
        Self {
            id: id.into(),
            width,
            item_height,
            items: Vec::new(),
            visible: false,
            position: Pos2::ZERO,
        }
    }

    /// Append an entry
    pub fn add_item(&mut self, label: impl Into<String>, action: ButtonAction) {
        let id = format!("{}/{}", self.id, self.items.len());
        let size = Vec2::new(self.width, self.item_height);
        self.items.push(ButtonWidget::new(id, label, action, size));
    }

    /// Show the menu with its top left corner at `position`
    pub fn show_at(&mut self, position: Pos2) {
        self.position = position;
        self.visible = true;
    }

    /// Hide the menu. Returns whether it was visible.
    pub fn hide(&mut self) -> bool {
        std::mem::replace(&mut self.visible, false)
    }

    /// Whether the menu is shown
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Where the menu was last shown
    pub fn position(&self) -> Pos2 {
        self.position
    }

    /// Build the menu. Entries are only hit targets while it is visible.
    pub fn build(&self, targets: &mut TargetMap) -> SceneNode {
        let mut group = SceneNode::group(self.id.clone()).with_translate(self.position.x, self.position.y);
        if !self.visible {
            return group.hidden();
        }
        for (i, item) in self.items.iter().enumerate() {
            group.push(item.build(i as f32 * self.item_height, targets));
        }
        group
    }
}

/// Button drawn from an icon document
#[derive(Debug, Clone, PartialEq)]
pub struct IconButton {
    /// Element id
    pub id: String,
    /// Icon file path
    pub href: String,
    /// Left edge
    pub x: f32,
    /// Square size
    pub size: f32,
    /// Action on press
    pub action: ButtonAction,
    back_color: Color32,
}

impl IconButton {
    /// Create an icon button
    pub fn new(id: impl Into<String>, href: impl Into<String>, x: f32, size: f32, action: ButtonAction) -> Self {
        Self {
            id: id.into(),
            href: href.into(),
            x,
            size,
            action,
            back_color: Color32::LIGHT_GRAY,
        }
    }

    /// Change the background color
    pub fn set_back_color(&mut self, color: Color32) {
        self.back_color = color;
    }

    /// Current background color
    pub fn back_color(&self) -> Color32 {
        self.back_color
    }

    /// Build the icon
    pub fn build(&self, targets: &mut TargetMap) -> SceneNode {
        targets.insert(self.id.clone(), HitTarget::Button(self.action));
        SceneNode::icon(self.id.clone(), self.href.clone(), self.x, self.size, self.size)
            .with_fill(self.back_color)
            .listening(MouseEvents::BUTTON)
    }
}
