//! RGBA colors

use thiserror::Error;

/// Error returned when a `#RRGGBB` literal cannot be decoded
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    /// The literal does not start with `#`
    #[error("color literal `{0}` does not start with '#'")]
    MissingHash(String),

    /// The literal is not exactly seven characters long
    #[error("color literal `{0}` should be '#' followed by 6 hex digits")]
    WrongLength(String),

    /// One of the six digits is not hexadecimal
    #[error("color literal `{0}` contains a non-hex digit")]
    InvalidDigit(String),
}

/// RGBA color, components in 0.0..=1.0
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    pub const GRAY: Color = Color::rgb(0.5, 0.5, 0.5);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Build an opaque color from 8-bit channels
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    pub fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xFF) as u8;
        let g = ((hex >> 8) & 0xFF) as u8;
        let b = (hex & 0xFF) as u8;
        Self::from_rgb8(r, g, b)
    }

    /// Parse a `#RRGGBB` literal.
    ///
    /// Only the exact seven-character shape is accepted; shorthand and alpha
    /// forms are rejected.
    pub fn parse_hex(literal: &str) -> Result<Self, ColorParseError> {
        let Some(digits) = literal.strip_prefix('#') else {
            return Err(ColorParseError::MissingHash(literal.to_string()));
        };
        if literal.len() != 7 {
            return Err(ColorParseError::WrongLength(literal.to_string()));
        }
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorParseError::InvalidDigit(literal.to_string()));
        }

        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| ColorParseError::InvalidDigit(literal.to_string()))
        };
        Ok(Self::from_rgb8(channel(0)?, channel(2)?, channel(4)?))
    }

    /// 8-bit channels, rounded
    pub fn to_rgb8(&self) -> [u8; 3] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b)]
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.a = alpha;
        self
    }

    /// Multiply the RGB channels, keeping alpha
    pub fn scale(&self, factor: f32) -> Color {
        Color {
            r: (self.r * factor).clamp(0.0, 1.0),
            g: (self.g * factor).clamp(0.0, 1.0),
            b: (self.b * factor).clamp(0.0, 1.0),
            a: self.a,
        }
    }

    /// Linear interpolation between two colors
    pub fn lerp(a: &Color, b: &Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        Color {
            r: a.r + (b.r - a.r) * t,
            g: a.g + (b.g - a.g) * t,
            b: a.b + (b.b - a.b) * t,
            a: a.a + (b.a - a.a) * t,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [r, g, b] = self.to_rgb8();
        write!(f, "#{:02x}{:02x}{:02x}", r, g, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_valid() {
        let color = Color::parse_hex("#ff0400").unwrap();
        assert_eq!(color.to_rgb8(), [255, 4, 0]);
        assert_eq!(Color::parse_hex("#FCFCFC").unwrap().to_rgb8(), [252, 252, 252]);
    }

    #[test]
    fn test_parse_hex_rejects_other_shapes() {
        assert!(matches!(
            Color::parse_hex("ff0400"),
            Err(ColorParseError::MissingHash(_))
        ));
        assert!(matches!(
            Color::parse_hex("#fff"),
            Err(ColorParseError::WrongLength(_))
        ));
        assert!(matches!(
            Color::parse_hex("#ff04000"),
            Err(ColorParseError::WrongLength(_))
        ));
        assert!(matches!(
            Color::parse_hex("#gg0000"),
            Err(ColorParseError::InvalidDigit(_))
        ));
        assert!(matches!(
            Color::parse_hex("#+f0000"),
            Err(ColorParseError::InvalidDigit(_))
        ));
    }

    #[test]
    fn test_display_round_trips_channels() {
        assert_eq!(Color::from_rgb8(224, 224, 224).to_string(), "#e0e0e0");
    }

    #[test]
    fn test_scale_clamps() {
        let c = Color::from_rgb8(200, 50, 50).scale(2.0);
        assert_eq!(c.r, 1.0);
        assert_eq!(c.a, 1.0);
    }
}
