//! Momentary trigger (`bng`)
//!
//! A press flashes the trigger and emits `1.0`. The flash is a polled
//! condition against the injected clock: [`Trigger::is_active`] reads false
//! as soon as the hold time has elapsed, and the next [`Widget::update`]
//! clears the flag and schedules a repaint.

use patchview_core::{DrawContext, MouseButton, Point, Rect, SharedClock, Size, Stroke};

use crate::base::{ValueRange, WidgetBase, DRAG_THRESHOLD};
use crate::style::{dim_if_disabled, Palette};
use crate::widget::{Widget, WidgetKind};

/// Default flash duration
pub const DEFAULT_HOLD_MS: u64 = 300;

pub struct Trigger {
    base: WidgetBase,
    clock: SharedClock,
    active: bool,
    activated_at: u64,
    hold_ms: u64,
}

impl std::fmt::Debug for Trigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Trigger")
            .field("base", &self.base)
            .field("active", &self.active)
            .field("activated_at", &self.activated_at)
            .field("hold_ms", &self.hold_ms)
            .finish_non_exhaustive()
    }
}

impl Trigger {
    pub fn new(position: Point, side: f32, clock: SharedClock) -> Self {
        Self {
            base: WidgetBase::new(position, Size::square(side))
                .with_range(ValueRange::new(0.0, 1.0), 0.0),
            clock,
            active: false,
            activated_at: 0,
            hold_ms: DEFAULT_HOLD_MS,
        }
    }

    pub fn with_symbols(mut self, output: impl Into<String>, input: impl Into<String>) -> Self {
        self.base = self.base.with_symbols(output, input);
        self
    }

    pub fn with_hold_ms(mut self, hold_ms: u64) -> Self {
        self.hold_ms = hold_ms;
        self
    }

    pub fn hold_ms(&self) -> u64 {
        self.hold_ms
    }

    /// Flash and emit `1.0`
    pub fn trigger(&mut self) {
        self.active = true;
        self.activated_at = self.clock.now_ms();
        self.base.mark_dirty();
        self.base.emit(1.0);
    }

    /// True until the hold time has elapsed since the last trigger
    pub fn is_active(&self) -> bool {
        self.active && !self.expired()
    }

    fn expired(&self) -> bool {
        self.clock.now_ms().saturating_sub(self.activated_at) >= self.hold_ms
    }
}

impl Widget for Trigger {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Trigger
    }

    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn update(&mut self) {
        if self.active && self.expired() {
            self.active = false;
            self.base.mark_dirty();
        }
    }

    fn draw(&self, ctx: &mut dyn DrawContext, palette: &Palette) {
        let base = &self.base;
        let size = base.size();
        let local = Rect::from_origin_size(Point::ZERO, size);

        ctx.fill_rect(
            local,
            palette.face(
                palette.trigger_background,
                base.is_pressed(),
                base.is_hovered(),
                base.is_enabled(),
            ),
        );

        let radius = (size.width.min(size.height) / 2.0 - 2.0).max(0.0);
        let center = local.center();
        let flash = dim_if_disabled(palette.trigger_flash, base.is_enabled());
        if self.is_active() {
            ctx.fill_circle(center, radius, flash);
        } else {
            ctx.stroke_circle(center, radius, &Stroke::new(1.0), flash);
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
        self.trigger();
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
