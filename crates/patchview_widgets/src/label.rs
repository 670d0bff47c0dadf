//! Static label / background canvas (`cnv`)
//!
//! Labels are never interactive: every pointer handler reports "not handled".

use patchview_core::{Color, DrawContext, MouseButton, Point, Rect, Size, TextStyle};

use crate::base::{WidgetBase, EMPTY_SYMBOL};
use crate::style::Palette;
use crate::widget::{Widget, WidgetKind};

pub const DEFAULT_FONT_SIZE: f32 = 12.0;

#[derive(Debug, Clone)]
pub struct Label {
    base: WidgetBase,
    text: String,
    background: Color,
    text_color: Color,
    font_size: f32,
}

impl Label {
    pub fn new(position: Point, size: Size) -> Self {
        let palette = Palette::default();
        let mut base = WidgetBase::new(position, size).with_symbols(EMPTY_SYMBOL, EMPTY_SYMBOL);
        base.set_enabled(false);
        Self {
            base,
            text: String::new(),
            background: palette.label_background,
            text_color: palette.label_text,
            font_size: DEFAULT_FONT_SIZE,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_colors(mut self, background: Color, text_color: Color) -> Self {
        self.background = background;
        self.text_color = text_color;
        self
    }

    pub fn with_font_size(mut self, font_size: f32) -> Self {
        self.font_size = font_size;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn text_color(&self) -> Color {
        self.text_color
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.base.mark_dirty();
    }

    pub fn set_colors(&mut self, background: Color, text_color: Color) {
        self.background = background;
        self.text_color = text_color;
        self.base.mark_dirty();
    }

    pub fn set_font_size(&mut self, font_size: f32) {
        self.font_size = font_size;
        self.base.mark_dirty();
    }
}

impl Widget for Label {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Label
    }

    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn draw(&self, ctx: &mut dyn DrawContext, _palette: &Palette) {
        ctx.fill_rect(
            Rect::from_origin_size(Point::ZERO, self.base.size()),
            self.background,
        );
        if !self.text.is_empty() {
            ctx.draw_text(
                &self.text,
                Point::new(4.0, self.font_size + 2.0),
                &TextStyle::new(self.font_size).with_color(self.text_color),
            );
        }
    }

    fn on_press(&mut self, _point: Point, _button: MouseButton) -> bool {
        false
    }

    fn on_drag(&mut self, _point: Point, _button: MouseButton) -> bool {
        false
    }

    fn on_release(&mut self, _point: Point, _button: MouseButton) -> bool {
        false
    }

    fn on_move(&mut self, _point: Point) -> bool {
        false
    }
}
