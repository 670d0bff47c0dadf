//! Widget palette
//!
//! Every color a widget paints with comes from here and is passed explicitly
//! to the draw context.

use patchview_core::Color;

/// Colors shared by all widget variants
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    pub background: Color,
    pub foreground: Color,
    pub border: Color,
    pub hover: Color,
    pub pressed: Color,

    /// Trigger face and its flash circle
    pub trigger_background: Color,
    pub trigger_flash: Color,

    /// Toggle face when on/off, and the highlight it is lerped towards on hover
    pub toggle_on: Color,
    pub toggle_off: Color,
    pub highlight: Color,

    /// Number entry while a drag is in progress
    pub number_drag_text: Color,
    pub number_drag_background: Color,

    /// Label defaults
    pub label_background: Color,
    pub label_text: Color,

    /// Substituted for malformed `#RRGGBB` literals
    pub color_fallback: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Color::from_rgb8(220, 220, 220),
            foreground: Color::from_rgb8(50, 50, 50),
            border: Color::from_rgb8(100, 100, 100),
            hover: Color::from_rgb8(240, 240, 240),
            pressed: Color::from_rgb8(180, 180, 180),
            trigger_background: Color::from_rgb8(240, 240, 240),
            trigger_flash: Color::from_rgb8(200, 50, 50),
            toggle_on: Color::from_rgb8(200, 50, 50),
            toggle_off: Color::from_rgb8(220, 220, 220),
            highlight: Color::from_rgb8(250, 250, 250),
            number_drag_text: Color::from_rgb8(0, 100, 200),
            number_drag_background: Color::from_rgb8(230, 240, 255),
            label_background: Color::from_rgb8(224, 224, 224),
            label_text: Color::BLACK,
            color_fallback: Color::from_rgb8(128, 128, 128),
        }
    }
}

impl Palette {
    /// Face color of a momentary/binary widget for the given interaction flags
    pub fn face(&self, base: Color, pressed: bool, hovered: bool, enabled: bool) -> Color {
        let color = if pressed {
            base.scale(0.8)
        } else if hovered {
            Color::lerp(&base, &self.highlight, 0.3)
        } else {
            base
        };
        dim_if_disabled(color, enabled)
    }

    /// Border color, darkened under hover
    pub fn outline(&self, hovered: bool, enabled: bool) -> Color {
        let color = if hovered {
            self.border.scale(0.7)
        } else {
            self.border
        };
        dim_if_disabled(color, enabled)
    }

    /// Generic background used by sliders and number entries
    pub fn surface(&self, pressed: bool, hovered: bool, enabled: bool) -> Color {
        let color = if pressed {
            self.pressed
        } else if hovered {
            self.hover
        } else {
            self.background
        };
        dim_if_disabled(color, enabled)
    }
}

pub(crate) fn dim_if_disabled(color: Color, enabled: bool) -> Color {
    if enabled {
        color
    } else {
        color.scale(0.5)
    }
}
