//! Positional grammar of patch declarations
//!
//! Every field the decoder reads lives at a fixed token index. The indices
//! are collected here, one table per object class, so supporting another
//! layout means adding a table rather than touching the dispatch code.
//!
//! Token 0 is the record marker (`#X`) and token 1 the statement keyword.

use crate::widget::{Orientation, WidgetKind};

/// Indices shared by every `#X obj` / `#X floatatom` / `#X restore` line
pub const X: usize = 2;
pub const Y: usize = 3;
pub const CLASS: usize = 4;

/// Record marker the decoder handles
pub const RECORD: &str = "#X";

/// Statement keywords
pub const OBJ: &str = "obj";
pub const FLOATATOM: &str = "floatatom";
pub const RESTORE: &str = "restore";

/// Field layout of one `#X obj` class with send/receive symbols
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectGrammar {
    pub class: &'static str,
    pub kind: WidgetKind,
    /// Lines shorter than this are skipped
    pub min_tokens: usize,
    pub send: usize,
    pub receive: usize,
}

/// `#X obj x y hsl width height min max log init send receive label ... [value]`
pub const HSL: ObjectGrammar = ObjectGrammar {
    class: "hsl",
    kind: WidgetKind::Slider(Orientation::Horizontal),
    min_tokens: 12,
    send: 11,
    receive: 12,
};

/// `#X obj x y vsl width height min max log init send receive label ... [value]`
pub const VSL: ObjectGrammar = ObjectGrammar {
    class: "vsl",
    kind: WidgetKind::Slider(Orientation::Vertical),
    min_tokens: 12,
    send: 11,
    receive: 12,
};

/// `#X obj x y tgl size init send receive label ...`
pub const TGL: ObjectGrammar = ObjectGrammar {
    class: "tgl",
    kind: WidgetKind::Toggle,
    min_tokens: 10,
    send: 7,
    receive: 8,
};

/// `#X obj x y bng size hold interrupt init send receive label ...`
///
/// Pd writes hold, interrupt and init ahead of the symbols, so tokens 7/8
/// are numbers here and send/receive sit at 9/10, not at tgl's 7/8.
pub const BNG: ObjectGrammar = ObjectGrammar {
    class: "bng",
    kind: WidgetKind::Trigger,
    min_tokens: 9,
    send: 9,
    receive: 10,
};

/// Classes whose send/receive layout is table driven
pub const OBJECT_GRAMMARS: [ObjectGrammar; 4] = [HSL, VSL, TGL, BNG];

pub fn object_grammar(class: &str) -> Option<&'static ObjectGrammar> {
    OBJECT_GRAMMARS.iter().find(|g| g.class == class)
}

/// Slider geometry and range
pub mod slider {
    pub const WIDTH: usize = 5;
    pub const HEIGHT: usize = 6;
    pub const MIN: usize = 7;
    pub const MAX: usize = 8;
    /// Lines longer than this carry the initial value as their last token
    pub const VALUE_AFTER: usize = 20;
}

/// Toggle / trigger edge length
pub const SQUARE_SIZE: usize = 5;

/// `#X obj x y cnv selectable width height send receive text xoff yoff font fontsize bg fg ...`
pub mod label {
    pub const CLASS: &str = "cnv";
    pub const MIN_TOKENS: usize = 7;
    pub const WIDTH: usize = 6;
    pub const HEIGHT: usize = 7;
    pub const TEXT: usize = 10;
    pub const FONT_SIZE: usize = 14;
    pub const BACKGROUND: usize = 15;
    pub const FOREGROUND: usize = 16;
}

/// `#X floatatom x y width min max flag label send receive ...`
pub mod floatatom {
    pub const MIN_TOKENS: usize = 4;
    /// Ranges are read only from lines at least this long
    pub const RANGE_TOKENS: usize = 7;
    pub const WIDTH: usize = 4;
    pub const MIN: usize = 5;
    pub const MAX: usize = 6;
    pub const SEND: usize = 9;
    pub const RECEIVE: usize = 10;
    /// Lines longer than this carry the initial value as their last token
    pub const VALUE_AFTER: usize = 11;
    /// Symbol placeholder meaning "absent"
    pub const ABSENT: &str = "-";
    /// Pixel width of one character cell
    pub const CHAR_WIDTH: f32 = 8.0;
    pub const HEIGHT: f32 = 20.0;
    /// Width used when the declared width is 0 (auto)
    pub const AUTO_WIDTH_CHARS: f32 = 5.0;
    /// Substituted when both range ends are 0
    pub const UNBOUNDED: f32 = 1_000_000.0;
    /// Precision used for non-integral initial values
    pub const FRACTIONAL_PRECISION: u32 = 2;
}

/// `#X obj x y pd name` and `#X restore x y pd name`
pub mod include {
    pub const CLASS: &str = "pd";
    pub const MIN_TOKENS: usize = 5;
    pub const NAME: usize = 5;
    pub const EXTENSION: &str = "pd";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        assert_eq!(object_grammar("tgl"), Some(&TGL));
        assert_eq!(object_grammar("bng").map(|g| g.kind), Some(WidgetKind::Trigger));
        assert!(object_grammar("cnv").is_none());
    }

    #[test]
    fn test_symbol_offsets_follow_class_fields() {
        // send/receive come right after the class specific numeric fields
        assert_eq!(TGL.send, CLASS + 3);
        assert_eq!(HSL.send, CLASS + 7);
        assert_eq!(BNG.send, CLASS + 5);
        for g in OBJECT_GRAMMARS {
            assert_eq!(g.receive, g.send + 1);
            assert_eq!(WidgetKind::from_class(g.class), g.kind);
        }
    }
}
