//! patchview Widget Library
//!
//! The widget model for Pure Data style patches, plus the decoder that builds
//! it from `.pd` files.
//!
//! # Architecture
//!
//! 1. **Shared base state**: every widget embeds a [`WidgetBase`] holding its
//!    bounds, clamped value, bus symbols, interaction flags and dirty region.
//!    Value changes larger than [`VALUE_EPSILON`] are emitted through an
//!    injected [`OutputSink`].
//!
//! 2. **Closed set of variants**: [`PatchWidget`] is an enum over the
//!    concrete widgets and implements [`Widget`] by delegation. An
//!    [`IncludeGroup`] owns the widgets of another patch file.
//!
//! 3. **Explicit drawing**: widgets draw through
//!    [`DrawContext`](patchview_core::DrawContext) with colors taken from a
//!    [`Palette`]; no ambient drawing state is involved.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use patchview_core::ManualClock;
//! use patchview_widgets::{MemorySource, PatchDecoder, Widget};
//!
//! let decoder = PatchDecoder::new(Arc::new(MemorySource::new()), Arc::new(ManualClock::new(0)));
//! let widgets = decoder.decode("#X obj 20 30 tgl 20 0 s1 r1 empty 0 -10 0 12 #fcfcfc #000000 #000000 0 1;");
//! assert_eq!(widgets.len(), 1);
//! assert_eq!(widgets[0].output_symbol(), "s1");
//! assert_eq!(widgets[0].value(), 0.0);
//! ```

pub mod base;
pub mod error;
pub mod include_group;
pub mod label;
pub mod number_entry;
pub mod patch;
pub mod sink;
pub mod slider;
pub mod style;
pub mod toggle;
pub mod trigger;
pub mod widget;

pub use base::{
    is_wired, DirtyRegion, InteractionState, ValueRange, WidgetBase, DRAG_THRESHOLD, EMPTY_SYMBOL,
    VALUE_EPSILON,
};
pub use error::{PatchError, Result};
pub use include_group::IncludeGroup;
pub use label::Label;
pub use number_entry::{quantize, NumberEntry};
pub use patch::{
    DecodeOptions, DecodeOutput, Diagnostic, FsSource, MemorySource, PatchDecoder, PatchSource,
    Severity, SharedSource,
};
pub use sink::{CallbackSink, LogSink, NullSink, OutputEvent, OutputSink, RecordingSink, SharedSink};
pub use slider::Slider;
pub use style::Palette;
pub use toggle::Toggle;
pub use trigger::Trigger;
pub use widget::{Orientation, PatchWidget, Widget, WidgetKind};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::patch::{DecodeOutput, PatchDecoder};
    pub use crate::sink::{OutputSink, SharedSink};
    pub use crate::style::Palette;
    pub use crate::widget::{PatchWidget, Widget, WidgetKind};
}
