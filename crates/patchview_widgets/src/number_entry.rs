//! Numeric entry (`floatatom`)
//!
//! Dragging vertically changes the value relative to what it was at press
//! time: up increases. Every step is quantized to the display precision
//! before it is clamped and emitted.

use patchview_core::{DrawContext, MouseButton, Point, Rect, Size, Stroke, TextStyle};

use crate::base::{ValueRange, WidgetBase};
use crate::style::{dim_if_disabled, Palette};
use crate::widget::{Widget, WidgetKind};

pub const DEFAULT_DRAG_SENSITIVITY: f32 = 0.5;
pub const MIN_DRAG_SENSITIVITY: f32 = 0.01;
pub const MAX_PRECISION: u32 = 10;

/// Vertical travel (px) before a press becomes a value drag
pub const VALUE_DRAG_THRESHOLD: f32 = 2.0;

/// Approximate glyph box used to center the value text
const GLYPH_WIDTH: f32 = 8.0;
const GLYPH_HEIGHT: f32 = 8.0;

/// Round `value` to `precision` decimal places, half away from zero
pub fn quantize(value: f32, precision: u32) -> f32 {
    let scale = 10f64.powi(precision.min(MAX_PRECISION) as i32);
    ((value as f64 * scale).round() / scale) as f32
}

#[derive(Debug, Clone)]
pub struct NumberEntry {
    base: WidgetBase,
    precision: u32,
    sensitivity: f32,
    drag_start_value: f32,
    drag_start_y: f32,
    value_dragging: bool,
}

impl NumberEntry {
    pub fn new(position: Point, size: Size, range: ValueRange, initial: f32, precision: u32) -> Self {
        Self {
            base: WidgetBase::new(position, size).with_range(range, initial),
            precision: precision.min(MAX_PRECISION),
            sensitivity: DEFAULT_DRAG_SENSITIVITY,
            drag_start_value: 0.0,
            drag_start_y: 0.0,
            value_dragging: false,
        }
    }

    pub fn with_symbols(mut self, output: impl Into<String>, input: impl Into<String>) -> Self {
        self.base = self.base.with_symbols(output, input);
        self
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    /// Clamped to 0..=10
    pub fn set_precision(&mut self, precision: i32) {
        self.precision = precision.clamp(0, MAX_PRECISION as i32) as u32;
        self.base.mark_dirty();
    }

    pub fn drag_sensitivity(&self) -> f32 {
        self.sensitivity
    }

    /// Value units per pixel of vertical travel, at least 0.01
    pub fn set_drag_sensitivity(&mut self, sensitivity: f32) {
        self.sensitivity = sensitivity.max(MIN_DRAG_SENSITIVITY);
    }

    pub fn set_range(&mut self, min: f32, max: f32) {
        self.base.set_range(ValueRange::new(min, max));
    }

    pub fn is_value_dragging(&self) -> bool {
        self.value_dragging
    }

    /// The value as displayed
    pub fn format_value(&self) -> String {
        let value = self.base.value();
        if self.precision == 0 {
            format!("{}", value.round() as i64)
        } else {
            format!("{:.*}", self.precision as usize, value)
        }
    }

    fn apply_drag(&mut self, y: f32) {
        let raw = self.drag_start_value + (self.drag_start_y - y) * self.sensitivity;
        self.base.set_value(quantize(raw, self.precision));
    }
}

impl Widget for NumberEntry {
    fn kind(&self) -> WidgetKind {
        WidgetKind::NumberEntry
    }

    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn draw(&self, ctx: &mut dyn DrawContext, palette: &Palette) {
        let base = &self.base;
        let size = base.size();
        let local = Rect::from_origin_size(Point::ZERO, size);
        let enabled = base.is_enabled();

        let background = if self.value_dragging {
            dim_if_disabled(palette.number_drag_background, enabled)
        } else {
            palette.surface(base.is_pressed(), base.is_hovered(), enabled)
        };
        ctx.fill_rect(local, background);

        let text = self.format_value();
        let color = if self.value_dragging {
            palette.number_drag_text
        } else {
            dim_if_disabled(palette.foreground, enabled)
        };
        let text_width = text.len() as f32 * GLYPH_WIDTH;
        let origin = Point::new(
            ((size.width - text_width) * 0.5).max(2.0),
            ((size.height + GLYPH_HEIGHT) * 0.5).max(GLYPH_HEIGHT),
        );
        ctx.draw_text(&text, origin, &TextStyle::new(12.0).with_color(color));

        ctx.stroke_rect(local, &Stroke::new(1.0), palette.border);
        base.draw_symbols(ctx, palette.foreground);
    }

    fn on_press(&mut self, point: Point, _button: MouseButton) -> bool {
        if !self.base.begin_press(point) {
            return false;
        }
        self.drag_start_value = self.base.value();
        self.drag_start_y = point.y;
        self.value_dragging = false;
        true
    }

    fn on_drag(&mut self, point: Point, _button: MouseButton) -> bool {
        if !self.base.accepts_input() || !self.base.is_pressed() {
            return false;
        }

        if !self.value_dragging && (point.y - self.drag_start_y).abs() > VALUE_DRAG_THRESHOLD {
            self.value_dragging = true;
            self.base.start_dragging();
        }

        if self.value_dragging {
            self.base.set_last_pointer(point);
            self.apply_drag(point.y);
            true
        } else {
            false
        }
    }

    fn on_release(&mut self, point: Point, _button: MouseButton) -> bool {
        self.value_dragging = false;
        self.base.end_press(point)
    }

    fn on_move(&mut self, point: Point) -> bool {
        self.base.track_hover(point)
    }

    fn set_visible(&mut self, visible: bool) {
        self.base.set_visible(visible);
        if !visible {
            self.value_dragging = false;
        }
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.base.set_enabled(enabled);
        if !enabled {
            self.value_dragging = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::RecordingSink;
    use std::sync::Arc;

    fn entry(initial: f32, precision: u32) -> (NumberEntry, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::new());
        let mut entry = NumberEntry::new(
            Point::new(0.0, 40.0),
            Size::new(40.0, 20.0),
            ValueRange::new(-1e6, 1e6),
            initial,
            precision,
        )
        .with_symbols("num", "num");
        entry.set_sink(sink.clone());
        (entry, sink)
    }

    #[test]
    fn test_quantize() {
        assert_eq!(quantize(2.346, 2), 2.35);
        assert_eq!(quantize(2.344, 2), 2.34);
        assert_eq!(quantize(2.5, 0), 3.0);
        assert_eq!(quantize(-2.5, 0), -3.0);
        assert_eq!(quantize(7.0, 25), 7.0);
    }

    #[test]
    fn test_drag_quantizes_to_two_places() {
        let (mut entry, sink) = entry(2.0, 2);
        entry.set_drag_sensitivity(0.01);

        assert!(entry.on_press(Point::new(10.0, 50.0), MouseButton::Left));
        assert!(entry.on_drag(Point::new(10.0, 15.4), MouseButton::Left));
        assert_eq!(entry.value(), 2.35);
        assert_eq!(entry.format_value(), "2.35");
        assert_eq!(sink.values(), vec![("num".to_string(), 2.35)]);
    }

    #[test]
    fn test_drag_rounds_to_integer_at_precision_zero() {
        let (mut entry, _sink) = entry(0.0, 0);

        entry.on_press(Point::new(10.0, 50.0), MouseButton::Left);
        // 5.2 px up at 0.5 per px is 2.6
        entry.on_drag(Point::new(10.0, 44.8), MouseButton::Left);
        assert_eq!(entry.value(), 3.0);
        assert_eq!(entry.format_value(), "3");

        // Down is negative
        entry.on_drag(Point::new(10.0, 60.0), MouseButton::Left);
        assert_eq!(entry.value(), -5.0);
    }

    #[test]
    fn test_small_vertical_motion_does_not_drag() {
        let (mut entry, sink) = entry(1.0, 0);

        entry.on_press(Point::new(10.0, 50.0), MouseButton::Left);
        assert!(!entry.on_drag(Point::new(30.0, 48.5), MouseButton::Left));
        assert!(!entry.is_value_dragging());
        assert_eq!(entry.value(), 1.0);
        assert!(sink.is_empty());

        assert!(entry.on_release(Point::new(30.0, 48.5), MouseButton::Left));
        assert!(!entry.on_release(Point::new(30.0, 48.5), MouseButton::Left));
    }

    #[test]
    fn test_hiding_ends_value_drag() {
        let (mut entry, _sink) = entry(1.0, 0);

        entry.on_press(Point::new(10.0, 50.0), MouseButton::Left);
        assert!(entry.on_drag(Point::new(10.0, 40.0), MouseButton::Left));
        assert!(entry.is_value_dragging());

        entry.set_visible(false);
        assert!(!entry.is_value_dragging());
        entry.set_visible(true);
        assert!(!entry.base().is_pressed());
        assert!(!entry.on_drag(Point::new(10.0, 20.0), MouseButton::Left));
    }

    #[test]
    fn test_setters_clamp() {
        let (mut entry, _sink) = entry(1.0, 0);

        entry.set_precision(42);
        assert_eq!(entry.precision(), 10);
        entry.set_precision(-3);
        assert_eq!(entry.precision(), 0);

        entry.set_drag_sensitivity(0.0);
        assert_eq!(entry.drag_sensitivity(), 0.01);
    }

    #[test]
    fn test_drag_respects_range() {
        let (mut entry, _sink) = entry(0.0, 0);
        entry.set_range(0.0, 10.0);

        entry.on_press(Point::new(10.0, 50.0), MouseButton::Left);
        entry.on_drag(Point::new(10.0, -1000.0), MouseButton::Left);
        assert_eq!(entry.value(), 10.0);
    }
}
