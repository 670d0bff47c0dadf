//! The widget capability trait and the closed set of variants

use std::fmt;

use patchview_core::{DrawContext, MouseButton, Point, PointerEvent, PointerEventKind, Rect};

use crate::base::WidgetBase;
use crate::include_group::IncludeGroup;
use crate::label::Label;
use crate::number_entry::NumberEntry;
use crate::sink::SharedSink;
use crate::slider::Slider;
use crate::style::Palette;
use crate::toggle::Toggle;
use crate::trigger::Trigger;

/// Slider axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// What a widget is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    Trigger,
    Toggle,
    Slider(Orientation),
    NumberEntry,
    Label,
    IncludeGroup,
    Unknown,
}

impl WidgetKind {
    /// Map a patch object class (`tgl`, `hsl`, ...) to a widget kind
    pub fn from_class(class: &str) -> Self {
        match class {
            "bng" => WidgetKind::Trigger,
            "tgl" => WidgetKind::Toggle,
            "hsl" => WidgetKind::Slider(Orientation::Horizontal),
            "vsl" => WidgetKind::Slider(Orientation::Vertical),
            "cnv" => WidgetKind::Label,
            "floatatom" => WidgetKind::NumberEntry,
            "pd" => WidgetKind::IncludeGroup,
            _ => WidgetKind::Unknown,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            WidgetKind::Trigger => "trigger",
            WidgetKind::Toggle => "toggle",
            WidgetKind::Slider(Orientation::Horizontal) => "hslider",
            WidgetKind::Slider(Orientation::Vertical) => "vslider",
            WidgetKind::NumberEntry => "number",
            WidgetKind::Label => "label",
            WidgetKind::IncludeGroup => "group",
            WidgetKind::Unknown => "unknown",
        }
    }

    /// Kinds that react to the pointer themselves
    pub fn is_interactive(&self) -> bool {
        matches!(
            self,
            WidgetKind::Trigger
                | WidgetKind::Toggle
                | WidgetKind::Slider(_)
                | WidgetKind::NumberEntry
        )
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Capabilities shared by every widget
///
/// Pointer handlers take host coordinates and return whether the event was
/// handled. They are no-ops returning `false` while the widget is hidden or
/// disabled.
pub trait Widget {
    fn kind(&self) -> WidgetKind;

    fn base(&self) -> &WidgetBase;

    fn base_mut(&mut self) -> &mut WidgetBase;

    /// Per-frame tick
    fn update(&mut self) {}

    /// Paint in widget-local coordinates (origin at the widget position)
    fn draw(&self, ctx: &mut dyn DrawContext, palette: &Palette);

    fn on_press(&mut self, point: Point, button: MouseButton) -> bool;

    fn on_drag(&mut self, point: Point, button: MouseButton) -> bool;

    fn on_release(&mut self, point: Point, button: MouseButton) -> bool;

    fn on_move(&mut self, point: Point) -> bool;

    /// Paint at the widget position, skipping hidden widgets
    fn paint(&self, ctx: &mut dyn DrawContext, palette: &Palette) {
        let base = self.base();
        if !base.is_visible() {
            return;
        }
        ctx.push_translate(base.position() - Point::ZERO);
        self.draw(ctx, palette);
        ctx.pop_translate();
    }

    fn handle_event(&mut self, event: &PointerEvent) -> bool {
        match event.kind {
            PointerEventKind::Press => self.on_press(event.position, event.button),
            PointerEventKind::Drag => self.on_drag(event.position, event.button),
            PointerEventKind::Release => self.on_release(event.position, event.button),
            PointerEventKind::Move => self.on_move(event.position),
        }
    }

    fn value(&self) -> f32 {
        self.base().value()
    }

    /// Clamp, store and emit (epsilon-gated); returns whether it changed
    fn set_value(&mut self, value: f32) -> bool {
        self.base_mut().set_value(value)
    }

    fn bounds(&self) -> Rect {
        self.base().bounds()
    }

    fn set_position(&mut self, position: Point) {
        self.base_mut().set_position(position);
    }

    fn set_visible(&mut self, visible: bool) {
        self.base_mut().set_visible(visible);
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.base_mut().set_enabled(enabled);
    }

    fn set_sink(&mut self, sink: SharedSink) {
        self.base_mut().set_sink(sink);
    }

    fn needs_redraw(&self) -> bool {
        self.base().needs_redraw()
    }

    fn clear_dirty(&mut self) {
        self.base_mut().clear_dirty();
    }
}

/// A decoded widget of any kind
#[derive(Debug)]
pub enum PatchWidget {
    Trigger(Trigger),
    Toggle(Toggle),
    Slider(Slider),
    NumberEntry(NumberEntry),
    Label(Label),
    IncludeGroup(IncludeGroup),
}

macro_rules! delegate {
    ($self:ident, $w:ident => $body:expr) => {
        match $self {
            PatchWidget::Trigger($w) => $body,
            PatchWidget::Toggle($w) => $body,
            PatchWidget::Slider($w) => $body,
            PatchWidget::NumberEntry($w) => $body,
            PatchWidget::Label($w) => $body,
            PatchWidget::IncludeGroup($w) => $body,
        }
    };
}

impl Widget for PatchWidget {
    fn kind(&self) -> WidgetKind {
        delegate!(self, w => w.kind())
    }

    fn base(&self) -> &WidgetBase {
        delegate!(self, w => w.base())
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        delegate!(self, w => w.base_mut())
    }

    fn update(&mut self) {
        delegate!(self, w => w.update())
    }

    fn draw(&self, ctx: &mut dyn DrawContext, palette: &Palette) {
        delegate!(self, w => w.draw(ctx, palette))
    }

    fn on_press(&mut self, point: Point, button: MouseButton) -> bool {
        delegate!(self, w => w.on_press(point, button))
    }

    fn on_drag(&mut self, point: Point, button: MouseButton) -> bool {
        delegate!(self, w => w.on_drag(point, button))
    }

    fn on_release(&mut self, point: Point, button: MouseButton) -> bool {
        delegate!(self, w => w.on_release(point, button))
    }

    fn on_move(&mut self, point: Point) -> bool {
        delegate!(self, w => w.on_move(point))
    }

    fn paint(&self, ctx: &mut dyn DrawContext, palette: &Palette) {
        delegate!(self, w => w.paint(ctx, palette))
    }

    fn set_value(&mut self, value: f32) -> bool {
        delegate!(self, w => w.set_value(value))
    }

    fn set_position(&mut self, position: Point) {
        delegate!(self, w => w.set_position(position))
    }

    fn set_visible(&mut self, visible: bool) {
        delegate!(self, w => w.set_visible(visible))
    }

    fn set_enabled(&mut self, enabled: bool) {
        delegate!(self, w => w.set_enabled(enabled))
    }

    fn set_sink(&mut self, sink: SharedSink) {
        delegate!(self, w => w.set_sink(sink))
    }

    fn needs_redraw(&self) -> bool {
        delegate!(self, w => w.needs_redraw())
    }

    fn clear_dirty(&mut self) {
        delegate!(self, w => w.clear_dirty())
    }
}

impl PatchWidget {
    pub fn output_symbol(&self) -> &str {
        self.base().output_symbol()
    }

    pub fn input_symbol(&self) -> &str {
        self.base().input_symbol()
    }

    pub fn as_trigger(&self) -> Option<&Trigger> {
        match self {
            PatchWidget::Trigger(w) => Some(w),
            _ => None,
        }
    }

    pub fn as_trigger_mut(&mut self) -> Option<&mut Trigger> {
        match self {
            PatchWidget::Trigger(w) => Some(w),
            _ => None,
        }
    }

    pub fn as_toggle(&self) -> Option<&Toggle> {
        match self {
            PatchWidget::Toggle(w) => Some(w),
            _ => None,
        }
    }

    pub fn as_toggle_mut(&mut self) -> Option<&mut Toggle> {
        match self {
            PatchWidget::Toggle(w) => Some(w),
            _ => None,
        }
    }

    pub fn as_slider(&self) -> Option<&Slider> {
        match self {
            PatchWidget::Slider(w) => Some(w),
            _ => None,
        }
    }

    pub fn as_number_entry(&self) -> Option<&NumberEntry> {
        match self {
            PatchWidget::NumberEntry(w) => Some(w),
            _ => None,
        }
    }

    pub fn as_label(&self) -> Option<&Label> {
        match self {
            PatchWidget::Label(w) => Some(w),
            _ => None,
        }
    }

    pub fn as_group(&self) -> Option<&IncludeGroup> {
        match self {
            PatchWidget::IncludeGroup(w) => Some(w),
            _ => None,
        }
    }

    pub fn as_group_mut(&mut self) -> Option<&mut IncludeGroup> {
        match self {
            PatchWidget::IncludeGroup(w) => Some(w),
            _ => None,
        }
    }

    /// Visit every non-group widget, descending into include groups
    pub fn for_each_leaf<'a>(&'a self, f: &mut dyn FnMut(&'a PatchWidget)) {
        match self {
            PatchWidget::IncludeGroup(group) => {
                for child in group.children() {
                    child.for_each_leaf(f);
                }
            }
            leaf => f(leaf),
        }
    }

    /// Mutable counterpart of [`for_each_leaf`](Self::for_each_leaf)
    pub fn for_each_leaf_mut(&mut self, f: &mut dyn FnMut(&mut PatchWidget)) {
        match self {
            PatchWidget::IncludeGroup(group) => {
                for child in group.children_mut() {
                    child.for_each_leaf_mut(f);
                }
            }
            leaf => f(leaf),
        }
    }
}

impl From<Trigger> for PatchWidget {
    fn from(w: Trigger) -> Self {
        PatchWidget::Trigger(w)
    }
}

impl From<Toggle> for PatchWidget {
    fn from(w: Toggle) -> Self {
        PatchWidget::Toggle(w)
    }
}

impl From<Slider> for PatchWidget {
    fn from(w: Slider) -> Self {
        PatchWidget::Slider(w)
    }
}

impl From<NumberEntry> for PatchWidget {
    fn from(w: NumberEntry) -> Self {
        PatchWidget::NumberEntry(w)
    }
}

impl From<Label> for PatchWidget {
    fn from(w: Label) -> Self {
        PatchWidget::Label(w)
    }
}

impl From<IncludeGroup> for PatchWidget {
    fn from(w: IncludeGroup) -> Self {
        PatchWidget::IncludeGroup(w)
    }
}
