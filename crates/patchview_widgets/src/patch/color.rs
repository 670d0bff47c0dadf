//! Color fields of label declarations

use patchview_core::{Color, ColorParseError};

/// Outcome of reading an optional color token
#[derive(Debug, Clone, PartialEq)]
pub enum ColorField {
    /// No token, or a legacy numeric encoding; use the default
    Absent,
    Parsed(Color),
    /// A `#...` token that is not `#RRGGBB`; use the fallback and warn
    Invalid(ColorParseError),
}

impl ColorField {
    pub fn read(token: Option<&str>) -> Self {
        match token {
            Some(t) if t.starts_with('#') => match Color::parse_hex(t) {
                Ok(color) => ColorField::Parsed(color),
                Err(err) => ColorField::Invalid(err),
            },
            _ => ColorField::Absent,
        }
    }

    /// Resolve against the default and fallback colors
    pub fn resolve(&self, default: Color, fallback: Color) -> Color {
        match self {
            ColorField::Absent => default,
            ColorField::Parsed(color) => *color,
            ColorField::Invalid(_) => fallback,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read() {
        assert_eq!(ColorField::read(None), ColorField::Absent);
        assert_eq!(ColorField::read(Some("-233017")), ColorField::Absent);
        assert_eq!(
            ColorField::read(Some("#000000")),
            ColorField::Parsed(Color::BLACK)
        );
        assert!(matches!(
            ColorField::read(Some("#12345")),
            ColorField::Invalid(ColorParseError::WrongLength(_))
        ));
    }

    #[test]
    fn test_resolve() {
        let default = Color::WHITE;
        let fallback = Color::GRAY;
        assert_eq!(ColorField::Absent.resolve(default, fallback), default);
        assert_eq!(
            ColorField::read(Some("#zzzzzz")).resolve(default, fallback),
            fallback
        );
    }
}
