//! State shared by every widget variant
//!
//! [`WidgetBase`] owns geometry, the clamped value, the communication
//! symbols, the interaction flags and the dirty region. Variants embed one
//! and build their pointer handling on its `begin_press` / `track_drag` /
//! `end_press` / `track_hover` primitives.

use patchview_core::{Color, DrawContext, Point, Rect, Size, TextStyle};

use crate::sink::{NullSink, SharedSink};

/// Changes at or below this magnitude are neither stored nor emitted
pub const VALUE_EPSILON: f32 = 0.001;

/// Pointer travel (px) before a press becomes a drag
pub const DRAG_THRESHOLD: f32 = 3.0;

/// Symbol sentinel meaning "not wired"
pub const EMPTY_SYMBOL: &str = "empty";

/// Whether a symbol addresses anything on the bus
pub fn is_wired(symbol: &str) -> bool {
    !symbol.is_empty() && symbol != EMPTY_SYMBOL
}

/// Closed value interval; constructing with `min > max` swaps the ends
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValueRange {
    min: f32,
    max: f32,
}

impl ValueRange {
    pub fn new(a: f32, b: f32) -> Self {
        if a <= b {
            Self { min: a, max: b }
        } else {
            Self { min: b, max: a }
        }
    }

    pub fn min(&self) -> f32 {
        self.min
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn span(&self) -> f32 {
        self.max - self.min
    }

    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }

    /// Position of `value` within the range as 0..=1; a zero-width range maps to 0
    pub fn normalize(&self, value: f32) -> f32 {
        let span = self.span();
        if span <= 0.0 {
            0.0
        } else {
            ((value - self.min) / span).clamp(0.0, 1.0)
        }
    }

    /// Inverse of [`normalize`](Self::normalize)
    pub fn denormalize(&self, t: f32) -> f32 {
        self.min + t.clamp(0.0, 1.0) * self.span()
    }
}

impl Default for ValueRange {
    fn default() -> Self {
        Self::new(0.0, 127.0)
    }
}

/// Rectangle + flag marking what must be repainted
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DirtyRegion {
    rect: Rect,
    dirty: bool,
}

impl DirtyRegion {
    /// A region that starts dirty
    pub fn new(rect: Rect) -> Self {
        Self { rect, dirty: true }
    }

    /// Mark `rect` for repaint, growing any pending region to cover it
    pub fn mark(&mut self, rect: Rect) {
        self.rect = if self.dirty {
            self.rect.union(&rect)
        } else {
            rect
        };
        self.dirty = true;
    }

    pub fn clear(&mut self) {
        self.dirty = false;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }
}

/// Interaction state, derived from the pointer flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Hovered,
    Pressed,
    Dragging,
}

/// Fields and behaviour common to all widgets
#[derive(Clone)]
pub struct WidgetBase {
    position: Point,
    size: Size,
    value: f32,
    range: ValueRange,
    output_symbol: String,
    input_symbol: String,

    visible: bool,
    enabled: bool,
    hovered: bool,
    pressed: bool,
    dragging: bool,
    last_pointer: Point,
    press_origin: Point,

    dirty: DirtyRegion,
    sink: SharedSink,
}

impl std::fmt::Debug for WidgetBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetBase")
            .field("position", &self.position)
            .field("size", &self.size)
            .field("value", &self.value)
            .field("range", &self.range)
            .field("output_symbol", &self.output_symbol)
            .field("input_symbol", &self.input_symbol)
            .field("state", &self.interaction_state())
            .finish_non_exhaustive()
    }
}

impl WidgetBase {
    pub fn new(position: Point, size: Size) -> Self {
        let range = ValueRange::default();
        Self {
            position,
            size,
            value: range.min(),
            range,
            output_symbol: String::new(),
            input_symbol: String::new(),
            visible: true,
            enabled: true,
            hovered: false,
            pressed: false,
            dragging: false,
            last_pointer: Point::ZERO,
            press_origin: Point::ZERO,
            dirty: DirtyRegion::new(Rect::from_origin_size(position, size)),
            sink: NullSink::shared(),
        }
    }

    /// Set the communication symbols
    pub fn with_symbols(mut self, output: impl Into<String>, input: impl Into<String>) -> Self {
        self.output_symbol = output.into();
        self.input_symbol = input.into();
        self
    }

    /// Set the range and the starting value without emitting anything
    pub fn with_range(mut self, range: ValueRange, initial: f32) -> Self {
        self.range = range;
        self.value = range.clamp(initial);
        self
    }

    // Geometry

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }

    /// Inclusive hit test in host coordinates
    pub fn contains(&self, point: Point) -> bool {
        self.bounds().contains(point)
    }

    pub fn set_position(&mut self, position: Point) {
        if position != self.position {
            self.mark_dirty();
            self.position = position;
            self.mark_dirty();
        }
    }

    pub fn set_size(&mut self, size: Size) {
        if size != self.size {
            self.mark_dirty();
            self.size = size;
            self.mark_dirty();
        }
    }

    /// Convert a host point into widget-local coordinates
    pub fn to_local(&self, point: Point) -> Point {
        Point::new(point.x - self.position.x, point.y - self.position.y)
    }

    // Value

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn range(&self) -> ValueRange {
        self.range
    }

    pub fn min(&self) -> f32 {
        self.range.min()
    }

    pub fn max(&self) -> f32 {
        self.range.max()
    }

    /// Clamp and store `value`; emits when it moved by more than
    /// [`VALUE_EPSILON`]. Returns whether the stored value changed.
    pub fn set_value(&mut self, value: f32) -> bool {
        if value.is_nan() {
            return false;
        }
        let clamped = self.range.clamp(value);
        if (clamped - self.value).abs() > VALUE_EPSILON {
            self.value = clamped;
            self.mark_dirty();
            self.emit(clamped);
            true
        } else {
            false
        }
    }

    /// Replace the range and re-clamp the current value silently
    pub fn set_range(&mut self, range: ValueRange) {
        self.range = range;
        let clamped = range.clamp(self.value);
        if clamped != self.value {
            self.value = clamped;
        }
        self.mark_dirty();
    }

    // Communication

    pub fn output_symbol(&self) -> &str {
        &self.output_symbol
    }

    pub fn input_symbol(&self) -> &str {
        &self.input_symbol
    }

    pub fn set_sink(&mut self, sink: SharedSink) {
        self.sink = sink;
    }

    pub fn sink(&self) -> &SharedSink {
        &self.sink
    }

    /// Publish `value` on the output symbol, if wired
    pub fn emit(&self, value: f32) {
        if is_wired(&self.output_symbol) {
            self.sink.value_changed(&self.output_symbol, value);
        }
    }

    // Visibility

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Hiding drops any press in progress
    pub fn set_visible(&mut self, visible: bool) {
        if self.visible != visible {
            self.visible = visible;
            if !visible {
                self.cancel_interaction();
            }
            self.mark_dirty();
        }
    }

    /// Disabling drops any press in progress
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled {
            self.enabled = enabled;
            if !enabled {
                self.cancel_interaction();
            }
            self.mark_dirty();
        }
    }

    fn cancel_interaction(&mut self) {
        self.hovered = false;
        self.pressed = false;
        self.dragging = false;
    }

    /// Visible and enabled
    pub fn accepts_input(&self) -> bool {
        self.visible && self.enabled
    }

    // Interaction

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn last_pointer(&self) -> Point {
        self.last_pointer
    }

    pub fn press_origin(&self) -> Point {
        self.press_origin
    }

    pub fn interaction_state(&self) -> InteractionState {
        if self.dragging {
            InteractionState::Dragging
        } else if self.pressed {
            InteractionState::Pressed
        } else if self.hovered {
            InteractionState::Hovered
        } else {
            InteractionState::Idle
        }
    }

    /// Pointer-down; claims the press when it lands inside the bounds
    pub fn begin_press(&mut self, point: Point) -> bool {
        if !self.accepts_input() || !self.contains(point) {
            return false;
        }
        self.pressed = true;
        self.dragging = false;
        self.press_origin = point;
        self.last_pointer = point;
        self.mark_dirty();
        true
    }

    /// Pointer motion while held. Flips into dragging once the pointer is
    /// further than `threshold` from the press origin and returns whether
    /// the widget is dragging.
    pub fn track_drag(&mut self, point: Point, threshold: f32) -> bool {
        if !self.accepts_input() || !self.pressed {
            return false;
        }
        if !self.dragging && self.press_origin.distance(point) > threshold {
            self.dragging = true;
            self.mark_dirty();
        }
        if self.dragging {
            self.last_pointer = point;
        }
        self.dragging
    }

    /// Enter the dragging state without a distance check
    pub fn start_dragging(&mut self) {
        if !self.dragging {
            self.dragging = true;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_last_pointer(&mut self, point: Point) {
        self.last_pointer = point;
    }

    /// Pointer-up; hover is re-evaluated from the release position
    pub fn end_press(&mut self, point: Point) -> bool {
        if !self.accepts_input() {
            return false;
        }
        let was_pressed = self.pressed;
        let hovered = self.contains(point);
        let changed = was_pressed || hovered != self.hovered;
        self.pressed = false;
        self.dragging = false;
        self.last_pointer = point;
        self.hovered = hovered;
        if changed {
            self.mark_dirty();
        }
        was_pressed
    }

    /// Pointer motion with no button held; returns whether the pointer is over
    pub fn track_hover(&mut self, point: Point) -> bool {
        if !self.accepts_input() {
            return false;
        }
        self.last_pointer = point;
        let over = self.contains(point);
        if over != self.hovered {
            self.hovered = over;
            self.mark_dirty();
        }
        over
    }

    // Dirty tracking

    pub fn mark_dirty(&mut self) {
        let bounds = self.bounds();
        self.dirty.mark(bounds);
    }

    pub fn needs_redraw(&self) -> bool {
        self.dirty.is_dirty()
    }

    pub fn dirty_region(&self) -> DirtyRegion {
        self.dirty
    }

    pub fn clear_dirty(&mut self) {
        self.dirty.clear();
    }

    // Drawing helpers

    /// `S:` / `R:` annotations under the widget, in local coordinates
    pub fn draw_symbols(&self, ctx: &mut dyn DrawContext, color: Color) {
        let style = TextStyle::new(10.0).with_color(color);
        if is_wired(&self.output_symbol) {
            ctx.draw_text(
                &format!("S:{}", self.output_symbol),
                Point::new(2.0, self.size.height + 12.0),
                &style,
            );
        }
        if is_wired(&self.input_symbol) {
            ctx.draw_text(
                &format!("R:{}", self.input_symbol),
                Point::new(2.0, self.size.height + 24.0),
                &style,
            );
        }
    }
}
