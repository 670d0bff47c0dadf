//! Continuous slider (`hsl` / `vsl`)
//!
//! The knob position is derived from the value on every query; only the
//! drag anchor is stored. Vertical sliders grow upwards.

use patchview_core::{
    Color, DrawContext, MouseButton, Point, Rect, Size, Stroke, TextStyle, Vec2,
};

use crate::base::{ValueRange, WidgetBase, DRAG_THRESHOLD};
use crate::style::{dim_if_disabled, Palette};
use crate::widget::{Orientation, Widget, WidgetKind};

pub const DEFAULT_KNOB_SIZE: f32 = 8.0;

#[derive(Debug, Clone)]
pub struct Slider {
    base: WidgetBase,
    orientation: Orientation,
    knob_size: f32,
    show_value: bool,
    knob_grabbed: bool,
    drag_offset: Vec2,
}

impl Slider {
    pub fn new(
        position: Point,
        size: Size,
        orientation: Orientation,
        range: ValueRange,
        initial: f32,
    ) -> Self {
        Self {
            base: WidgetBase::new(position, size).with_range(range, initial),
            orientation,
            knob_size: DEFAULT_KNOB_SIZE,
            show_value: true,
            knob_grabbed: false,
            drag_offset: Vec2::ZERO,
        }
    }

    pub fn with_symbols(mut self, output: impl Into<String>, input: impl Into<String>) -> Self {
        self.base = self.base.with_symbols(output, input);
        self
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn knob_size(&self) -> f32 {
        self.knob_size
    }

    pub fn shows_value(&self) -> bool {
        self.show_value
    }

    pub fn set_style(&mut self, knob_size: f32, show_value: bool) {
        self.knob_size = knob_size.max(0.0);
        self.show_value = show_value;
        self.base.mark_dirty();
    }

    pub fn set_range(&mut self, min: f32, max: f32) {
        self.base.set_range(ValueRange::new(min, max));
    }

    fn release_knob(&mut self) {
        self.knob_grabbed = false;
        self.drag_offset = Vec2::ZERO;
    }

    /// Whether a press grabbed the knob and drags are being applied
    pub fn is_knob_grabbed(&self) -> bool {
        self.knob_grabbed
    }

    /// Track rectangle in local coordinates
    pub fn track_rect(&self) -> Rect {
        let size = self.base.size();
        let margin = self.knob_size * 0.5 + 2.0;
        match self.orientation {
            Orientation::Horizontal => Rect::new(
                margin,
                size.height * 0.4,
                size.width - 2.0 * margin,
                size.height * 0.2,
            ),
            Orientation::Vertical => Rect::new(
                size.width * 0.4,
                margin,
                size.width * 0.2,
                size.height - 2.0 * margin,
            ),
        }
    }

    /// Knob center in local coordinates
    pub fn knob_center(&self) -> Point {
        let track = self.track_rect();
        let t = self.base.range().normalize(self.base.value());
        match self.orientation {
            Orientation::Horizontal => Point::new(
                track.x() + t * track.width(),
                track.y() + track.height() * 0.5,
            ),
            Orientation::Vertical => Point::new(
                track.x() + track.width() * 0.5,
                track.bottom() - t * track.height(),
            ),
        }
    }

    pub fn knob_rect(&self) -> Rect {
        let center = self.knob_center();
        let half = self.knob_size * 0.5;
        Rect::new(
            center.x - half,
            center.y - half,
            self.knob_size,
            self.knob_size,
        )
    }

    /// Value under a local position, projected onto the track axis
    pub fn value_at(&self, local: Point) -> f32 {
        let track = self.track_rect();
        let t = match self.orientation {
            Orientation::Horizontal if track.width() > 0.0 => {
                (local.x - track.x()) / track.width()
            }
            Orientation::Vertical if track.height() > 0.0 => {
                1.0 - (local.y - track.y()) / track.height()
            }
            _ => 0.0,
        };
        self.base.range().denormalize(t)
    }

    fn value_text(&self) -> String {
        format!("{:.1}", self.base.value())
    }
}

impl Widget for Slider {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Slider(self.orientation)
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
        let thin = Stroke::new(1.0);

        ctx.fill_rect(
            local,
            palette.surface(base.is_pressed(), base.is_hovered(), enabled),
        );

        let track = self.track_rect();
        ctx.fill_rect(
            track,
            Color::lerp(&palette.background, &Color::BLACK, 0.1),
        );
        ctx.stroke_rect(track, &thin, palette.border);

        let knob = if base.is_pressed() && self.knob_grabbed {
            palette.pressed
        } else if base.is_hovered() {
            palette.hover
        } else {
            palette.foreground
        };
        let center = self.knob_center();
        let radius = self.knob_size * 0.5;
        ctx.fill_circle(center, radius, dim_if_disabled(knob, enabled));
        ctx.stroke_circle(center, radius, &thin, palette.border);

        if self.show_value {
            let text = self.value_text();
            let origin = match self.orientation {
                Orientation::Horizontal => Point::new(
                    size.width * 0.5 - text.len() as f32 * 3.0,
                    size.height * 0.7,
                ),
                Orientation::Vertical => Point::new(size.width * 0.7, size.height * 0.5),
            };
            ctx.draw_text(
                &text,
                origin,
                &TextStyle::new(10.0).with_color(palette.foreground),
            );
        }

        ctx.stroke_rect(local, &thin, palette.border);
        base.draw_symbols(ctx, palette.foreground);
    }

    fn on_press(&mut self, point: Point, _button: MouseButton) -> bool {
        if !self.base.begin_press(point) {
            return false;
        }

        let local = self.base.to_local(point);
        if self.knob_rect().contains(local) {
            self.drag_offset = local - self.knob_center();
        } else {
            self.drag_offset = Vec2::ZERO;
            let value = self.value_at(local);
            self.base.set_value(value);
        }
        self.knob_grabbed = true;
        true
    }

    fn on_drag(&mut self, point: Point, _button: MouseButton) -> bool {
        if !self.base.accepts_input() || !self.base.is_pressed() || !self.knob_grabbed {
            return false;
        }

        self.base.track_drag(point, DRAG_THRESHOLD);
        self.base.set_last_pointer(point);

        let local = self.base.to_local(point);
        let anchored = Point::new(local.x - self.drag_offset.x, local.y - self.drag_offset.y);
        let value = self.value_at(anchored);
        self.base.set_value(value);
        true
    }

    fn on_release(&mut self, point: Point, _button: MouseButton) -> bool {
        let was_pressed = self.base.is_pressed();
        let handled = self.base.end_press(point);
        if was_pressed {
            self.release_knob();
        }
        handled
    }

    fn on_move(&mut self, point: Point) -> bool {
        self.base.track_hover(point)
    }

    fn set_visible(&mut self, visible: bool) {
        self.base.set_visible(visible);
        if !visible {
            self.release_knob();
        }
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.base.set_enabled(enabled);
        if !enabled {
            self.release_knob();
        }
    }
}
