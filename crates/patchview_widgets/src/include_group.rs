//! Include group (`pd name` / `restore ... pd name`)
//!
//! A group inlines the widgets of another patch file. Children keep the
//! position they were declared at (their local position) and are placed at
//! `local + offset` in host coordinates, so re-applying an offset never
//! accumulates. The group itself draws nothing and forwards pointer events
//! to its children.

use std::path::{Path, PathBuf};

use patchview_core::{DrawContext, MouseButton, Point, Size, Vec2};
use tracing::{debug, info};

use crate::base::WidgetBase;
use crate::patch::{Diagnostic, PatchDecoder};
use crate::sink::SharedSink;
use crate::style::Palette;
use crate::widget::{PatchWidget, Widget, WidgetKind};

/// Size reported for the group's own bounds
pub const DEFAULT_GROUP_SIZE: Size = Size::new(100.0, 100.0);

#[derive(Debug)]
struct GroupChild {
    local: Point,
    widget: PatchWidget,
}

#[derive(Debug)]
pub struct IncludeGroup {
    base: WidgetBase,
    name: String,
    source_path: PathBuf,
    offset: Vec2,
    children: Vec<GroupChild>,
    /// Child that accepted the current press
    captured: Option<usize>,
}

impl IncludeGroup {
    /// An empty group for `name`, placed (and offset) at `position`
    pub fn new(name: impl Into<String>, position: Point, source_path: impl Into<PathBuf>) -> Self {
        let name = name.into();
        let base = WidgetBase::new(position, DEFAULT_GROUP_SIZE)
            .with_symbols(format!("{name}_out"), format!("{name}_in"));
        Self {
            base,
            name,
            source_path: source_path.into(),
            offset: position - Point::ZERO,
            children: Vec::new(),
            captured: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn children(&self) -> impl Iterator<Item = &PatchWidget> {
        self.children.iter().map(|c| &c.widget)
    }

    pub fn children_mut(&mut self) -> impl Iterator<Item = &mut PatchWidget> {
        self.children.iter_mut().map(|c| &mut c.widget)
    }

    pub fn child(&self, index: usize) -> Option<&PatchWidget> {
        self.children.get(index).map(|c| &c.widget)
    }

    /// Position a child was declared at, before the offset
    pub fn local_position(&self, index: usize) -> Option<Point> {
        self.children.get(index).map(|c| c.local)
    }

    /// Adopt a widget declared at its current position
    pub fn add_child(&mut self, mut widget: PatchWidget) {
        let local = widget.base().position();
        widget.set_position(local + self.offset);
        widget.set_sink(self.base.sink().clone());
        self.children.push(GroupChild { local, widget });
        self.base.mark_dirty();
    }

    pub fn clear_children(&mut self) {
        self.children.clear();
        self.captured = None;
        self.base.mark_dirty();
    }

    /// Place every child at its local position plus `offset`
    pub fn set_offset(&mut self, offset: Vec2) {
        self.offset = offset;
        for child in &mut self.children {
            child.widget.set_position(child.local + offset);
        }
        debug!(
            group = %self.name,
            dx = offset.x,
            dy = offset.y,
            children = self.children.len(),
            "applied group offset"
        );
    }

    /// Drop all children and decode the source file again
    pub fn reload(&mut self, decoder: &PatchDecoder) -> Vec<Diagnostic> {
        self.clear_children();
        let output = decoder.decode_include(&self.source_path);
        for widget in output.widgets {
            self.add_child(widget);
        }
        info!(
            group = %self.name,
            path = %self.source_path.display(),
            children = self.children.len(),
            "reloaded include group"
        );
        output.diagnostics
    }

    fn child_at(&self, point: Point) -> Option<usize> {
        self.children
            .iter()
            .position(|c| c.widget.bounds().contains(point))
    }

    fn child_accepts(&self, index: usize) -> bool {
        self.children[index].widget.base().is_enabled()
    }
}

impl Widget for IncludeGroup {
    fn kind(&self) -> WidgetKind {
        WidgetKind::IncludeGroup
    }

    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn update(&mut self) {
        for child in &mut self.children {
            let base = child.widget.base();
            if base.is_visible() && base.is_enabled() {
                child.widget.update();
            }
        }
    }

    /// The group has no visuals of its own
    fn draw(&self, _ctx: &mut dyn DrawContext, _palette: &Palette) {}

    fn paint(&self, ctx: &mut dyn DrawContext, palette: &Palette) {
        if !self.base.is_visible() {
            return;
        }
        for child in &self.children {
            child.widget.paint(ctx, palette);
        }
    }

    fn on_press(&mut self, point: Point, button: MouseButton) -> bool {
        if !self.base.accepts_input() {
            return false;
        }
        let Some(index) = self.child_at(point) else {
            return false;
        };
        if !self.child_accepts(index) {
            return false;
        }
        let handled = self.children[index].widget.on_press(point, button);
        if handled {
            self.captured = Some(index);
        }
        handled
    }

    fn on_drag(&mut self, point: Point, button: MouseButton) -> bool {
        if !self.base.accepts_input() {
            return false;
        }
        match self.captured.or_else(|| self.child_at(point)) {
            Some(index) if self.child_accepts(index) => {
                self.children[index].widget.on_drag(point, button)
            }
            _ => false,
        }
    }

    fn on_release(&mut self, point: Point, button: MouseButton) -> bool {
        if !self.base.accepts_input() {
            return false;
        }
        match self.captured.take().or_else(|| self.child_at(point)) {
            Some(index) if self.child_accepts(index) => {
                self.children[index].widget.on_release(point, button)
            }
            _ => false,
        }
    }

    fn on_move(&mut self, point: Point) -> bool {
        if !self.base.accepts_input() {
            return false;
        }
        let mut handled = false;
        for child in &mut self.children {
            if child.widget.base().is_enabled() && child.widget.on_move(point) {
                handled = true;
            }
        }
        handled
    }

    fn set_position(&mut self, position: Point) {
        let delta = position - self.base.position();
        self.base.set_position(position);
        self.set_offset(self.offset + delta);
    }

    fn set_visible(&mut self, visible: bool) {
        self.base.set_visible(visible);
        for child in &mut self.children {
            child.widget.set_visible(visible);
        }
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.base.set_enabled(enabled);
        if !enabled {
            self.captured = None;
        }
        for child in &mut self.children {
            child.widget.set_enabled(enabled);
        }
    }

    fn set_sink(&mut self, sink: SharedSink) {
        for child in &mut self.children {
            child.widget.set_sink(sink.clone());
        }
        self.base.set_sink(sink);
    }

    fn needs_redraw(&self) -> bool {
        self.base.needs_redraw() || self.children.iter().any(|c| c.widget.needs_redraw())
    }

    fn clear_dirty(&mut self) {
        self.base.clear_dirty();
        for child in &mut self.children {
            child.widget.clear_dirty();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::RecordingSink;
    use crate::toggle::Toggle;
    use std::sync::Arc;

    fn group_with_two_toggles() -> IncludeGroup {
        let mut group = IncludeGroup::new("sub", Point::new(100.0, 50.0), "sub.pd");
        group.add_child(Toggle::new(Point::new(0.0, 0.0), 20.0).with_symbols("a", "a_in").into());
        group.add_child(Toggle::new(Point::new(40.0, 0.0), 20.0).with_symbols("b", "b_in").into());
        group
    }

    #[test]
    fn test_defaults() {
        let group = IncludeGroup::new("synth", Point::new(10.0, 20.0), "synth.pd");
        assert_eq!(group.base().output_symbol(), "synth_out");
        assert_eq!(group.base().input_symbol(), "synth_in");
        assert_eq!(group.base().size(), DEFAULT_GROUP_SIZE);
        assert_eq!(group.offset(), Vec2::new(10.0, 20.0));
        assert!(group.is_empty());
    }

    #[test]
    fn test_children_are_offset() {
        let group = group_with_two_toggles();
        assert_eq!(group.child(0).unwrap().base().position(), Point::new(100.0, 50.0));
        assert_eq!(group.child(1).unwrap().base().position(), Point::new(140.0, 50.0));
        assert_eq!(group.local_position(1), Some(Point::new(40.0, 0.0)));
    }

    #[test]
    fn test_set_offset_is_idempotent() {
        let mut group = group_with_two_toggles();

        group.set_offset(Vec2::new(5.0, 7.0));
        let once: Vec<Point> = group.children().map(|c| c.base().position()).collect();
        group.set_offset(Vec2::new(5.0, 7.0));
        let twice: Vec<Point> = group.children().map(|c| c.base().position()).collect();

        assert_eq!(once, twice);
        assert_eq!(once, vec![Point::new(5.0, 7.0), Point::new(45.0, 7.0)]);
    }

    #[test]
    fn test_moving_group_moves_children() {
        let mut group = group_with_two_toggles();
        group.set_position(Point::new(110.0, 50.0));
        assert_eq!(group.child(0).unwrap().base().position(), Point::new(110.0, 50.0));
        assert_eq!(group.offset(), Vec2::new(110.0, 50.0));
    }

    #[test]
    fn test_press_goes_to_first_hit_child() {
        let sink = Arc::new(RecordingSink::new());
        let mut group = group_with_two_toggles();
        group.set_sink(sink.clone());

        assert!(group.on_press(Point::new(145.0, 55.0), MouseButton::Left));
        assert!(group.on_release(Point::new(145.0, 55.0), MouseButton::Left));
        assert_eq!(sink.values(), vec![("b".to_string(), 1.0)]);

        assert!(!group.on_press(Point::new(130.0, 55.0), MouseButton::Left));
    }

    #[test]
    fn test_release_reaches_captured_child_outside_bounds() {
        let mut group = group_with_two_toggles();

        assert!(group.on_press(Point::new(105.0, 55.0), MouseButton::Left));
        assert!(group.child(0).unwrap().base().is_pressed());

        assert!(group.on_release(Point::new(300.0, 300.0), MouseButton::Left));
        assert!(!group.child(0).unwrap().base().is_pressed());
    }

    #[test]
    fn test_move_reaches_all_children() {
        let mut group = group_with_two_toggles();

        assert!(group.on_move(Point::new(105.0, 55.0)));
        assert!(group.child(0).unwrap().base().is_hovered());

        assert!(!group.on_move(Point::new(0.0, 0.0)));
        assert!(!group.child(0).unwrap().base().is_hovered());
    }

    #[test]
    fn test_visibility_and_enabled_propagate() {
        let mut group = group_with_two_toggles();
        group.clear_dirty();

        group.set_enabled(false);
        assert!(group.children().all(|c| !c.base().is_enabled()));
        assert!(group.needs_redraw());
        assert!(!group.on_press(Point::new(105.0, 55.0), MouseButton::Left));

        group.set_visible(false);
        assert!(group.children().all(|c| !c.base().is_visible()));
    }
}
