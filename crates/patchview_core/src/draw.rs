//! Draw context API
//!
//! Widgets paint themselves through the [`DrawContext`] trait by passing
//! explicit style values on every call. There is no ambient "current color"
//! state to leak between widgets.
//!
//! # Example
//!
//! ```ignore
//! fn paint(ctx: &mut dyn DrawContext) {
//!     ctx.fill_rect(Rect::new(0.0, 0.0, 20.0, 20.0), Color::GRAY);
//!     ctx.stroke_rect(Rect::new(0.0, 0.0, 20.0, 20.0), &Stroke::new(1.0), Color::BLACK);
//!     ctx.draw_text("S:vol", Point::new(2.0, 32.0), &TextStyle::new(10.0));
//! }
//! ```

use crate::color::Color;
use crate::geometry::{Point, Rect, Size, Vec2};

// ─────────────────────────────────────────────────────────────────────────────
// Stroke Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Line cap style
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

/// Stroke style configuration
#[derive(Clone, Debug, PartialEq)]
pub struct Stroke {
    /// Line width
    pub width: f32,
    /// Line cap style
    pub cap: LineCap,
}

impl Default for Stroke {
    fn default() -> Self {
        Self {
            width: 1.0,
            cap: LineCap::Butt,
        }
    }
}

impl Stroke {
    pub fn new(width: f32) -> Self {
        Self {
            width,
            ..Default::default()
        }
    }

    pub fn with_cap(mut self, cap: LineCap) -> Self {
        self.cap = cap;
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Text Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Horizontal text alignment relative to the draw origin
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Text style configuration
#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    /// Font size in pixels
    pub size: f32,
    /// Text color
    pub color: Color,
    /// Text alignment
    pub align: TextAlign,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            size: 12.0,
            color: Color::BLACK,
            align: TextAlign::Left,
        }
    }
}

impl TextStyle {
    pub fn new(size: f32) -> Self {
        Self {
            size,
            ..Default::default()
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Draw Context Trait
// ─────────────────────────────────────────────────────────────────────────────

/// The immediate-mode drawing surface widgets paint onto
pub trait DrawContext {
    // State

    /// Push a translation; subsequent coordinates are shifted by `offset`
    fn push_translate(&mut self, offset: Vec2);

    /// Pop the last pushed translation
    fn pop_translate(&mut self);

    /// Restrict drawing to `rect` until the matching `pop_clip`
    fn push_clip(&mut self, rect: Rect);

    fn pop_clip(&mut self);

    // 2D drawing

    fn fill_rect(&mut self, rect: Rect, color: Color);

    fn stroke_rect(&mut self, rect: Rect, stroke: &Stroke, color: Color);

    fn fill_circle(&mut self, center: Point, radius: f32, color: Color);

    fn stroke_circle(&mut self, center: Point, radius: f32, stroke: &Stroke, color: Color);

    fn line(&mut self, from: Point, to: Point, stroke: &Stroke, color: Color);

    fn draw_text(&mut self, text: &str, origin: Point, style: &TextStyle);

    /// Replace the pixels of `rect` with `color`, ignoring blending
    fn clear_rect(&mut self, rect: Rect, color: Color);

    /// The size of the drawing surface
    fn viewport_size(&self) -> Size;
}

// ─────────────────────────────────────────────────────────────────────────────
// Recording Draw Context
// ─────────────────────────────────────────────────────────────────────────────

/// A draw command that can be recorded and replayed
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    // State
    PushTranslate(Vec2),
    PopTranslate,
    PushClip(Rect),
    PopClip,

    // 2D Drawing
    FillRect {
        rect: Rect,
        color: Color,
    },
    StrokeRect {
        rect: Rect,
        stroke: Stroke,
        color: Color,
    },
    FillCircle {
        center: Point,
        radius: f32,
        color: Color,
    },
    StrokeCircle {
        center: Point,
        radius: f32,
        stroke: Stroke,
        color: Color,
    },
    Line {
        from: Point,
        to: Point,
        stroke: Stroke,
        color: Color,
    },
    DrawText {
        text: String,
        origin: Point,
        style: TextStyle,
    },
    ClearRect {
        rect: Rect,
        color: Color,
    },
}

impl DrawCommand {
    /// Short lowercase name of the command, used by listings
    pub fn name(&self) -> &'static str {
        match self {
            DrawCommand::PushTranslate(_) => "push_translate",
            DrawCommand::PopTranslate => "pop_translate",
            DrawCommand::PushClip(_) => "push_clip",
            DrawCommand::PopClip => "pop_clip",
            DrawCommand::FillRect { .. } => "fill_rect",
            DrawCommand::StrokeRect { .. } => "stroke_rect",
            DrawCommand::FillCircle { .. } => "fill_circle",
            DrawCommand::StrokeCircle { .. } => "stroke_circle",
            DrawCommand::Line { .. } => "line",
            DrawCommand::DrawText { .. } => "text",
            DrawCommand::ClearRect { .. } => "clear_rect",
        }
    }
}

impl std::fmt::Display for DrawCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = self.name();
        match self {
            DrawCommand::PushTranslate(v) => write!(f, "{name} ({}, {})", v.x, v.y),
            DrawCommand::PopTranslate | DrawCommand::PopClip => write!(f, "{name}"),
            DrawCommand::PushClip(r) => write_rect(f, name, r),
            DrawCommand::FillRect { rect, color } | DrawCommand::ClearRect { rect, color } => {
                write_rect(f, name, rect)?;
                write!(f, " {color}")
            }
            DrawCommand::StrokeRect {
                rect,
                stroke,
                color,
            } => {
                write_rect(f, name, rect)?;
                write!(f, " {color} w={}", stroke.width)
            }
            DrawCommand::FillCircle {
                center,
                radius,
                color,
            } => write!(f, "{name} ({}, {}) r={radius} {color}", center.x, center.y),
            DrawCommand::StrokeCircle {
                center,
                radius,
                stroke,
                color,
            } => write!(
                f,
                "{name} ({}, {}) r={radius} {color} w={}",
                center.x, center.y, stroke.width
            ),
            DrawCommand::Line {
                from, to, color, ..
            } => write!(
                f,
                "{name} ({}, {}) -> ({}, {}) {color}",
                from.x, from.y, to.x, to.y
            ),
            DrawCommand::DrawText {
                text,
                origin,
                style,
            } => write!(
                f,
                "{name} {text:?} at ({}, {}) size={} {}",
                origin.x, origin.y, style.size, style.color
            ),
        }
    }
}

fn write_rect(f: &mut std::fmt::Formatter<'_>, name: &str, r: &Rect) -> std::fmt::Result {
    write!(
        f,
        "{name} [{}, {}, {}x{}]",
        r.x(),
        r.y(),
        r.width(),
        r.height()
    )
}

/// A draw context that records commands for later inspection
#[derive(Debug, Default)]
pub struct RecordingContext {
    commands: Vec<DrawCommand>,
    translate_stack: Vec<Vec2>,
    clip_depth: usize,
    viewport: Size,
}

impl RecordingContext {
    pub fn new(viewport: Size) -> Self {
        Self {
            commands: Vec::new(),
            translate_stack: vec![Vec2::ZERO],
            clip_depth: 0,
            viewport,
        }
    }

    /// Get the recorded commands
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Take the recorded commands
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Clear all recorded commands and reset the state stacks
    pub fn clear(&mut self) {
        self.commands.clear();
        self.translate_stack = vec![Vec2::ZERO];
        self.clip_depth = 0;
    }

    /// Accumulated translation currently in effect
    pub fn current_translate(&self) -> Vec2 {
        self.translate_stack.last().copied().unwrap_or_default()
    }

    /// Texts drawn so far, in order
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::DrawText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl DrawContext for RecordingContext {
    fn push_translate(&mut self, offset: Vec2) {
        self.commands.push(DrawCommand::PushTranslate(offset));
        let current = self.current_translate();
        self.translate_stack.push(current + offset);
    }

    fn pop_translate(&mut self) {
        self.commands.push(DrawCommand::PopTranslate);
        if self.translate_stack.len() > 1 {
            self.translate_stack.pop();
        }
    }

    fn push_clip(&mut self, rect: Rect) {
        self.commands.push(DrawCommand::PushClip(rect));
        self.clip_depth += 1;
    }

    fn pop_clip(&mut self) {
        self.commands.push(DrawCommand::PopClip);
        self.clip_depth = self.clip_depth.saturating_sub(1);
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn stroke_rect(&mut self, rect: Rect, stroke: &Stroke, color: Color) {
        self.commands.push(DrawCommand::StrokeRect {
            rect,
            stroke: stroke.clone(),
            color,
        });
    }

    fn fill_circle(&mut self, center: Point, radius: f32, color: Color) {
        self.commands.push(DrawCommand::FillCircle {
            center,
            radius,
            color,
        });
    }

    fn stroke_circle(&mut self, center: Point, radius: f32, stroke: &Stroke, color: Color) {
        self.commands.push(DrawCommand::StrokeCircle {
            center,
            radius,
            stroke: stroke.clone(),
            color,
        });
    }

    fn line(&mut self, from: Point, to: Point, stroke: &Stroke, color: Color) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            stroke: stroke.clone(),
            color,
        });
    }

    fn draw_text(&mut self, text: &str, origin: Point, style: &TextStyle) {
        self.commands.push(DrawCommand::DrawText {
            text: text.to_string(),
            origin,
            style: style.clone(),
        });
    }

    fn clear_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::ClearRect { rect, color });
    }

    fn viewport_size(&self) -> Size {
        self.viewport
    }
}
