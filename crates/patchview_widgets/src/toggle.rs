//! Binary toggle (`tgl`)

use patchview_core::{DrawContext, MouseButton, Point, Rect, Size, Stroke};

use crate::base::{ValueRange, WidgetBase, DRAG_THRESHOLD};
use crate::style::{dim_if_disabled, Palette};
use crate::widget::{Widget, WidgetKind};

/// Inset of the "on" square from the border
const ON_MARGIN: f32 = 2.0;

/// A toggle's value is always exactly 0.0 or 1.0
#[derive(Debug, Clone)]
pub struct Toggle {
    base: WidgetBase,
}

impl Toggle {
    /// New toggles start off
    pub fn new(position: Point, side: f32) -> Self {
        Self {
            base: WidgetBase::new(position, Size::square(side))
                .with_range(ValueRange::new(0.0, 1.0), 0.0),
        }
    }

    pub fn with_symbols(mut self, output: impl Into<String>, input: impl Into<String>) -> Self {
        self.base = self.base.with_symbols(output, input);
        self
    }

    pub fn is_on(&self) -> bool {
        self.base.value() > 0.5
    }

    pub fn set_on(&mut self, on: bool) -> bool {
        self.base.set_value(if on { 1.0 } else { 0.0 })
    }

    /// Flip the state and emit the new value
    pub fn toggle(&mut self) {
        let next = !self.is_on();
        self.set_on(next);
    }
}

impl Widget for Toggle {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Toggle
    }

    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    /// Any nonzero value switches the toggle on
    fn set_value(&mut self, value: f32) -> bool {
        if value.is_nan() {
            return false;
        }
        self.set_on(value != 0.0)
    }

    fn draw(&self, ctx: &mut dyn DrawContext, palette: &Palette) {
        let base = &self.base;
        let local = Rect::from_origin_size(Point::ZERO, base.size());
        let face = if self.is_on() {
            palette.toggle_on
        } else {
            palette.toggle_off
        };

        ctx.fill_rect(
            local,
            palette.face(face, base.is_pressed(), base.is_hovered(), base.is_enabled()),
        );

        if self.is_on() {
            let inner = Rect::new(
                ON_MARGIN,
                ON_MARGIN,
                (local.width() - 2.0 * ON_MARGIN).max(0.0),
                (local.height() - 2.0 * ON_MARGIN).max(0.0),
            );
            ctx.fill_rect(
                inner,
                dim_if_disabled(palette.toggle_on.scale(0.7), base.is_enabled()),
            );
        }

        ctx.stroke_rect(
            local,
            &Stroke::new(1.0),
            palette.outline(base.is_hovered(), base.is_enabled()),
        );
        base.draw_symbols(ctx, palette.foreground);
    }

    fn on_press(&mut self, point: Point, _button: MouseButton) -> bool {
        if !self.base.begin_press(point) {
            return false;
        }
        self.toggle();
        true
    }

    fn on_drag(&mut self, point: Point, _button: MouseButton) -> bool {
        self.base.track_drag(point, DRAG_THRESHOLD)
    }

    fn on_release(&mut self, point: Point, _button: MouseButton) -> bool {
        self.base.end_press(point)
    }

    fn on_move(&mut self, point: Point) -> bool {
        self.base.track_hover(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::RecordingSink;
    use std::sync::Arc;

    #[test]
    fn test_press_flips_and_emits() {
        let sink = Arc::new(RecordingSink::new());
        let mut toggle = Toggle::new(Point::new(20.0, 30.0), 20.0).with_symbols("s1", "r1");
        toggle.set_sink(sink.clone());

        assert!(toggle.on_press(Point::new(30.0, 40.0), MouseButton::Left));
        assert!(toggle.is_on());
        assert!(toggle.on_release(Point::new(30.0, 40.0), MouseButton::Left));

        assert!(toggle.on_press(Point::new(20.0, 30.0), MouseButton::Left));
        assert!(!toggle.is_on());

        assert_eq!(
            sink.values(),
            vec![("s1".to_string(), 1.0), ("s1".to_string(), 0.0)]
        );
    }

    #[test]
    fn test_value_is_binary() {
        let mut toggle = Toggle::new(Point::ZERO, 15.0);
        for v in [0.3, -4.0, 0.0, 127.0, 1e-6, 0.0] {
            toggle.set_value(v);
            let value = toggle.value();
            assert!(value == 0.0 || value == 1.0);
        }
        toggle.set_value(0.3);
        assert_eq!(toggle.value(), 1.0);
        toggle.set_value(0.0);
        assert_eq!(toggle.value(), 0.0);
    }

    #[test]
    fn test_hidden_toggle_ignores_press() {
        let mut toggle = Toggle::new(Point::ZERO, 15.0);
        toggle.set_visible(false);
        assert!(!toggle.on_press(Point::new(5.0, 5.0), MouseButton::Left));
        assert!(!toggle.is_on());
    }
}
