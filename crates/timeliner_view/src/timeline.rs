// SPDX-License-Identifier: MIT OR Apache-2.0
//! Root timeline view.
//!
//! [`TimelineView`] owns the document, its history and every child view,
//! builds the scene and dispatches host pointer events through the router.

use crate::config::{Palette, ViewConfig};
use crate::error::Result;
use crate::handlers::create_handler;
use crate::router::{route, ActiveHandler, HitTarget, MouseArg, SessionId, Sessions, TargetMap};
use crate::ruler_view::RulerView;
use crate::scene::{MouseEvents, SceneNode};
use crate::selection::Selection;
use crate::sync::SyncReport;
use crate::tracks::TrackList;
use crate::view::{BuildContext, SvgBuild};
use crate::widgets::{ButtonAction, IconButton, MenuWidget};
use egui::{Pos2, Rect, Vec2};
use timeliner_model::{
    AddTrackCommand, Document, History, ModelError, RemoveTrackCommand, Timer, Track, TrackId,
};

const STOP_BUTTON_X: f32 = 50.0;
const TIME_BAR_WIDTH: f32 = 2.0;

/// Shared state of a timeline: model, child views and scene
#[derive(Debug)]
pub struct TimelineState {
    /// Document being edited
    pub document: Document,
    /// Undo history of the document
    pub history: History,
    /// Playback transport
    pub timer: Timer,
    /// Layout and colors
    pub config: ViewConfig,
    /// Selected keyframes
    pub selection: Selection,
    pub(crate) tracks: TrackList,
    pub(crate) ruler: RulerView,
    pub(crate) main_menu: MenuWidget,
    pub(crate) play_button: IconButton,
    pub(crate) stop_button: IconButton,
    selection_rect: Option<Rect>,
    vertical_scroll: f32,
    targets: TargetMap,
    root: SceneNode,
}

impl TimelineState {
    fn new(document: Document, history: History, timer: Timer, config: ViewConfig) -> Self {
        let name = document.name.clone();

        let mut main_menu = MenuWidget::new(format!("{name}/MainMenu"), config.menu_width, config.menu_item_height);
        main_menu.add_item("Add Track", ButtonAction::AddTrack);

        let play_button = IconButton::new(
            format!("{name}/Play"),
            config.resource_path("PlayButton.svg").to_string_lossy(),
            0.0,
            config.button_size,
            ButtonAction::TogglePlay,
        );
        let stop_button = IconButton::new(
            format!("{name}/Stop"),
            config.resource_path("StopButton.svg").to_string_lossy(),
            STOP_BUTTON_X,
            config.button_size,
            ButtonAction::Stop,
        );

        let mut state = Self {
            tracks: TrackList::new(config.track_height),
            ruler: RulerView::new(&name),
            main_menu,
            play_button,
            stop_button,
            selection_rect: None,
            vertical_scroll: 0.0,
            targets: TargetMap::new(),
            root: SceneNode::group(format!("{name}/Root")),
            selection: Selection::default(),
            document,
            history,
            timer,
            config,
        };
        state.update_play_color();
        state
    }

    /// Child track views in order
    pub fn tracks(&self) -> &TrackList {
        &self.tracks
    }

    /// Ruler view
    pub fn ruler(&self) -> &RulerView {
        &self.ruler
    }

    /// Background menu
    pub fn main_menu(&self) -> &MenuWidget {
        &self.main_menu
    }

    /// Play/pause button
    pub fn play_button(&self) -> &IconButton {
        &self.play_button
    }

    /// Stop button
    pub fn stop_button(&self) -> &IconButton {
        &self.stop_button
    }

    /// Rubber band currently shown
    pub fn selection_rect(&self) -> Option<Rect> {
        self.selection_rect
    }

    /// Vertical scroll of the track group
    pub fn vertical_scroll(&self) -> f32 {
        self.vertical_scroll
    }

    /// Element id to hit target table of the last build
    pub fn targets(&self) -> &TargetMap {
        &self.targets
    }

    /// Scene of the last build
    pub fn root(&self) -> &SceneNode {
        &self.root
    }

    /// Element id of the background behind the tracks
    pub fn background_id(&self) -> String {
        format!("{}/Background", self.document.name)
    }

    /// Element id of the time cursor
    pub fn time_bar_id(&self) -> String {
        format!("{}/TimeBar", self.document.name)
    }

    /// Element id of the rubber band rectangle
    pub fn selection_id(&self) -> String {
        format!("{}/Selection", self.document.name)
    }

    /// Time under scene x
    pub fn time_at(&self, x: f32) -> f32 {
        self.document.ruler.x_to_time(x)
    }

    /// Scene x of the time cursor
    pub fn time_bar_x(&self) -> f32 {
        self.document.ruler.time_to_x(self.timer.time)
    }

    /// Scene y of the top of the track group
    pub fn tracks_top(&self) -> f32 {
        self.config.tracks_offset() - self.vertical_scroll
    }

    /// Scroll the track group by `dy`, never above the first track
    pub fn scroll_tracks(&mut self, dy: f32) {
        self.vertical_scroll = (self.vertical_scroll + dy).max(0.0);
    }

    /// Hide every menu. Returns whether any was open.
    pub fn hide_menus(&mut self) -> bool {
        let main = self.main_menu.hide();
        self.tracks.hide_menus() || main
    }

    /// Show or clear the rubber band rectangle
    pub fn set_selection_rect(&mut self, rect: Option<Rect>) {
        self.selection_rect = rect;
    }

    /// Reconcile the track views with the document
    pub fn sync_tracks(&mut self) -> SyncReport {
        let report = self.tracks.sync(&mut self.document, &mut self.targets, &self.config);
        if !report.is_empty() {
            self.selection.retain_existing(&self.document);
            self.evaluate_tracks();
        }
        report
    }

    /// Append a value track through the history
    pub fn add_track(&mut self) -> Result<TrackId> {
        let count = self.document.track_count();
        let command = AddTrackCommand::new(Track::value(count.to_string(), count));
        let track = command.track_id();
        self.history.insert(Box::new(command), &mut self.document)?;
        self.sync_tracks();
        Ok(track)
    }

    /// Remove a track through the history
    pub fn remove_track(&mut self, track: TrackId) -> Result<()> {
        self.history
            .insert(Box::new(RemoveTrackCommand::new(track)), &mut self.document)?;
        self.sync_tracks();
        Ok(())
    }

    /// Move a track to slot `order`, clamped to the last slot
    pub fn set_track_order(&mut self, track: TrackId, order: usize) -> Result<()> {
        self.tracks.move_track(&mut self.document, track, order)
    }

    /// Undo the last document command
    pub fn undo(&mut self) -> Result<String> {
        let description = self.history.undo(&mut self.document)?;
        tracing::info!("Undo: {description}");
        self.sync_tracks();
        Ok(description)
    }

    /// Redo the last undone document command
    pub fn redo(&mut self) -> Result<String> {
        let description = self.history.redo(&mut self.document)?;
        tracing::info!("Redo: {description}");
        self.sync_tracks();
        Ok(description)
    }

    /// Perform a widget action
    pub fn apply_action(&mut self, action: ButtonAction) -> Result<()> {
        tracing::debug!(?action, "button pressed");
        match action {
            ButtonAction::TogglePlay => {
                self.timer.toggle();
                self.update_play_color();
            }
            ButtonAction::Stop => {
                self.timer.stop();
                self.update_play_color();
            }
            ButtonAction::AddTrack => {
                self.hide_menus();
                self.add_track()?;
            }
            ButtonAction::RemoveTrack(track) => {
                self.hide_menus();
                self.remove_track(track)?;
            }
            ButtonAction::MoveTrackUp(track) => {
                self.hide_menus();
                let order = self.order_of(track)?;
                if order > 0 {
                    self.set_track_order(track, order - 1)?;
                }
            }
            ButtonAction::MoveTrackDown(track) => {
                self.hide_menus();
                let order = self.order_of(track)?;
                self.set_track_order(track, order + 1)?;
            }
        }
        Ok(())
    }

    /// Advance the timer and refresh the current value of every track
    pub fn evaluate(&mut self, delta_time: f32) {
        self.timer.update(delta_time, &self.document.ruler);
        self.evaluate_tracks();
    }

    fn evaluate_tracks(&mut self) {
        let time = self.timer.time;
        for view in self.tracks.views_mut() {
            if let Some(track) = self.document.track(view.track) {
                view.evaluate(track, time);
            }
        }
    }

    fn order_of(&self, track: TrackId) -> Result<usize> {
        self.document
            .order_of(track)
            .ok_or_else(|| ModelError::TrackNotFound(track).into())
    }

    fn update_play_color(&mut self) {
        let colors = &self.config.colors;
        let rgb = if self.timer.is_running { colors.red } else { colors.light_gray };
        self.play_button.set_back_color(Palette::color(rgb));
    }

    /// Rebuild the scene and the hit target table
    pub fn build_svg_root(&mut self) -> &SceneNode {
        self.targets.clear();
        let name = self.document.name.clone();
        let config = &self.config;
        let black = Palette::color(config.colors.black);
        let mut root = SceneNode::group(format!("{name}/Root"));

        root.push(self.play_button.build(&mut self.targets));
        root.push(self.stop_button.build(&mut self.targets));

        let mut ctx = BuildContext {
            document: &self.document,
            selection: &self.selection,
            config,
            targets: &mut self.targets,
        };

        root.push(
            SceneNode::group(format!("{name}/RulerGroup"))
                .with_translate(0.0, config.ruler_offset())
                .with_child(self.ruler.build_svg(&mut ctx)),
        );

        let content_height = self.tracks.content_height();
        let mut tracks = SceneNode::group(format!("{name}/Tracks"))
            .with_translate(0.0, config.tracks_offset() - self.vertical_scroll);
        let background_id = format!("{name}/Background");
        ctx.targets.insert(background_id.clone(), HitTarget::Background);
        tracks.push(
            SceneNode::rect(
                background_id,
                Rect::from_min_size(Pos2::ZERO, Vec2::new(config.width, content_height.max(config.track_height))),
            )
            .with_attr("fill", "none")
            .with_attr("pointer-events", "all")
            .listening(MouseEvents::BUTTON),
        );
        for view in self.tracks.views_mut() {
            tracks.push(view.build_svg(&mut ctx));
        }
        root.push(tracks);

        let mut overlays = SceneNode::group(format!("{name}/Overlays"));

        let selection_id = format!("{name}/Selection");
        overlays.push(match self.selection_rect {
            Some(rect) => SceneNode::rect(selection_id, rect)
                .with_attr("fill", "none")
                .with_stroke(black)
                .with_attr("stroke-dasharray", "4")
                .without_pointer(),
            None => SceneNode::rect(selection_id, Rect::ZERO).hidden(),
        });

        let x = self.document.ruler.time_to_x(self.timer.time);
        let time_bar_id = format!("{name}/TimeBar");
        ctx.targets.insert(time_bar_id.clone(), HitTarget::TimeBar);
        overlays.push(
            SceneNode::line(
                time_bar_id,
                x,
                config.ruler_offset(),
                x,
                config.tracks_offset() + content_height - self.vertical_scroll,
            )
            .with_stroke(black)
            .with_attr("stroke-width", TIME_BAR_WIDTH.to_string())
            .with_attr("style", "cursor:col-resize")
            .listening(MouseEvents::DRAG),
        );

        overlays.push(self.main_menu.build(ctx.targets));
        for view in self.tracks.views() {
            overlays.push(view.menu.build(ctx.targets));
        }
        root.push(overlays);

        self.root = root;
        &self.root
    }
}

/// The timeline widget
#[derive(Debug)]
pub struct TimelineView {
    state: TimelineState,
    sessions: Sessions,
}

impl TimelineView {
    /// Create the view, synchronize its tracks and build the scene
    pub fn new(document: Document, history: History, timer: Timer, config: ViewConfig) -> Self {
        let mut view = Self {
            state: TimelineState::new(document, history, timer, config),
            sessions: Sessions::new(),
        };
        let report = view.state.sync_tracks();
        tracing::info!(
            document = %view.state.document.name,
            tracks = report.added.len(),
            "timeline created"
        );
        view.state.build_svg_root();
        view
    }

    /// Shared state
    pub fn state(&self) -> &TimelineState {
        &self.state
    }

    /// Shared state, mutable. Call [`build_svg_root`](Self::build_svg_root) after editing.
    pub fn state_mut(&mut self) -> &mut TimelineState {
        &mut self.state
    }

    /// Document being edited
    pub fn document(&self) -> &Document {
        &self.state.document
    }

    /// Playback transport
    pub fn timer(&self) -> &Timer {
        &self.state.timer
    }

    /// Active pointer sessions
    pub fn sessions(&self) -> &Sessions {
        &self.sessions
    }

    /// Rebuild the scene
    pub fn build_svg_root(&mut self) -> &SceneNode {
        self.state.build_svg_root()
    }

    /// Advance by `delta_time` seconds and rebuild
    pub fn evaluate(&mut self, delta_time: f32) {
        self.state.evaluate(delta_time);
        self.state.build_svg_root();
    }

    /// Append a value track (undoable)
    pub fn add_track(&mut self) -> Result<TrackId> {
        let track = self.state.add_track()?;
        self.state.build_svg_root();
        Ok(track)
    }

    /// Remove a track (undoable)
    pub fn remove_track(&mut self, track: TrackId) -> Result<()> {
        self.state.remove_track(track)?;
        self.state.build_svg_root();
        Ok(())
    }

    /// Move a track to slot `order`
    pub fn set_track_order(&mut self, track: TrackId, order: usize) -> Result<()> {
        self.state.set_track_order(track, order)?;
        self.state.build_svg_root();
        Ok(())
    }

    /// Undo the last document command
    pub fn undo(&mut self) -> Result<String> {
        let description = self.state.undo()?;
        self.state.build_svg_root();
        Ok(description)
    }

    /// Redo the last undone document command
    pub fn redo(&mut self) -> Result<String> {
        let description = self.state.redo()?;
        self.state.build_svg_root();
        Ok(description)
    }

    /// Hide every menu. Returns whether any was open.
    pub fn hide_menus(&mut self) -> bool {
        let hidden = self.state.hide_menus();
        if hidden {
            self.state.build_svg_root();
        }
        hidden
    }

    /// Show or clear the rubber band rectangle
    pub fn set_selection_rect(&mut self, rect: Option<Rect>) {
        self.state.set_selection_rect(rect);
        self.state.build_svg_root();
    }

    /// Host mouse-down on the element `element_id`.
    ///
    /// Unknown ids are treated as the background.
    pub fn mouse_down(&mut self, element_id: &str, arg: MouseArg) -> Result<()> {
        let target = self
            .state
            .targets
            .get(element_id)
            .copied()
            .unwrap_or(HitTarget::Background);
        let decision = route(&target, arg.button);
        tracing::debug!(element_id, ?target, button = arg.button, session = arg.session.0, "mouse down");

        if decision.hide_menus {
            self.state.hide_menus();
        }

        match decision.handler {
            Some(kind) => match create_handler(kind, &mut self.state, &arg) {
                Ok(handler) => self.sessions.begin(arg.session, handler),
                Err(err) => {
                    self.sessions.cancel(arg.session);
                    self.state.build_svg_root();
                    return Err(err);
                }
            },
            None => {
                self.sessions.cancel(arg.session);
            }
        }

        self.state.build_svg_root();
        Ok(())
    }

    /// Host mouse-move. Returns whether a handler received it.
    pub fn mouse_move(&mut self, arg: MouseArg) -> bool {
        match self.sessions.take(arg.session) {
            Some(ActiveHandler::Handler(mut handler)) => {
                handler.mouse_move(&mut self.state, &arg);
                self.sessions.restore(arg.session, ActiveHandler::Handler(handler));
                self.state.build_svg_root();
                true
            }
            Some(widget) => {
                self.sessions.restore(arg.session, widget);
                false
            }
            None => false,
        }
    }

    /// Host mouse-up; ends the session. Returns whether a handler received it.
    pub fn mouse_up(&mut self, arg: MouseArg) -> bool {
        match self.sessions.take(arg.session) {
            Some(ActiveHandler::Handler(mut handler)) => {
                handler.mouse_up(&mut self.state, &arg);
                tracing::debug!(session = arg.session.0, handler = handler.name(), "session ended");
                self.state.build_svg_root();
                true
            }
            Some(ActiveHandler::Widget(_)) | None => false,
        }
    }

    /// Drop a session without delivering mouse-up
    pub fn cancel_session(&mut self, session: SessionId) -> bool {
        let cancelled = self.sessions.cancel(session);
        if cancelled {
            tracing::debug!(session = session.0, "session cancelled");
        }
        cancelled
    }
}

impl SvgBuild for TimelineView {
    fn build_svg(&mut self, _ctx: &mut BuildContext<'_>) -> SceneNode {
        panic!("TimelineView is a root; use build_svg_root");
    }

    fn unbuild_svg(&mut self, _targets: &mut TargetMap) {
        panic!("TimelineView is a root and is never unbuilt");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view_with_tracks(count: usize) -> (TimelineView, Vec<TrackId>) {
        let mut doc = Document::new("doc");
        let ids = (0..count)
            .map(|i| doc.insert_track(Track::value(i.to_string(), i)).unwrap())
            .collect();
        let view = TimelineView::new(doc, History::new(), Timer::new(), ViewConfig::default());
        (view, ids)
    }

    #[test]
    fn test_new_builds_scene() {
        let (view, ids) = view_with_tracks(2);
        let state = view.state();
        assert_eq!(state.tracks().len(), 2);
        assert!(state.root().find("doc/Play").is_some());
        assert!(state.root().find("doc/Background").is_some());
        assert_eq!(state.targets().get("doc/TimeBar"), Some(&HitTarget::TimeBar));

        let track_view = state.tracks().get(ids[1]).unwrap();
        assert!(matches!(
            state.targets().get(&track_view.id),
            Some(HitTarget::Track { track, .. }) if *track == ids[1]
        ));
    }

    #[test]
    fn test_time_bar_is_black_column_cursor() {
        let (view, _) = view_with_tracks(1);
        let bar = view.state().root().find("doc/TimeBar").unwrap();
        assert_eq!(bar.attributes.get("stroke").map(String::as_str), Some("#000000"));
        assert_eq!(bar.attributes.get("style").map(String::as_str), Some("cursor:col-resize"));
    }

    #[test]
    fn test_zero_zoom_document_still_builds() {
        let mut doc = Document::new("doc");
        doc.ruler = ron::from_str(
            "(loop_start: 0.0, loop_end: 10.0, view_start: 0.0, pixels_per_second: 0.0)",
        )
        .unwrap();
        doc.insert_track(Track::value("0", 0)).unwrap();

        let mut view = TimelineView::new(doc, History::new(), Timer::new(), ViewConfig::default());
        assert!(view.state().time_at(100.0).is_finite());
        assert!(view.build_svg_root().find("doc/Ruler").is_some());
    }

    #[test]
    fn test_track_group_offset_follows_scroll() {
        let (mut view, _) = view_with_tracks(3);
        view.state_mut().scroll_tracks(20.0);
        view.state_mut().scroll_tracks(-50.0);
        assert_eq!(view.state().vertical_scroll(), 0.0);

        view.state_mut().scroll_tracks(10.0);
        let root = view.build_svg_root();
        assert_eq!(root.find("doc/Tracks").unwrap().translate, Some([0.0, 44.0]));
        assert_eq!(root.find("doc/RulerGroup").unwrap().translate, Some([0.0, 33.0]));
    }

    #[test]
    fn test_add_track_labels_with_count() {
        let (mut view, _) = view_with_tracks(2);
        let added = view.add_track().unwrap();
        let track = view.document().track(added).unwrap();
        assert_eq!(track.label, "2");
        assert_eq!(track.order(), 2);
        assert!(view.state().tracks().get(added).is_some());
    }

    #[test]
    fn test_move_up_at_top_is_noop() {
        let (mut view, ids) = view_with_tracks(2);
        view.state_mut().apply_action(ButtonAction::MoveTrackUp(ids[0])).unwrap();
        assert_eq!(view.document().order_of(ids[0]), Some(0));

        view.state_mut().apply_action(ButtonAction::MoveTrackDown(ids[0])).unwrap();
        assert_eq!(view.document().order_of(ids[0]), Some(1));
        assert_eq!(view.document().order_of(ids[1]), Some(0));
    }

    #[test]
    fn test_menu_action_on_missing_track_fails() {
        let (mut view, _) = view_with_tracks(1);
        let result = view.state_mut().apply_action(ButtonAction::MoveTrackUp(TrackId::new()));
        assert!(result.is_err());
    }
}
