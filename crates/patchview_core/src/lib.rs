//! patchview core primitives
//!
//! This crate provides the foundational types shared by the widget layer and
//! the presentation shell:
//!
//! - **Geometry**: points, sizes and axis-aligned rectangles
//! - **Color**: RGBA colors with `#RRGGBB` parsing
//! - **Draw Context**: an explicit-style drawing API and a recording
//!   implementation for headless hosts and tests
//! - **Events**: pointer buttons and pointer event records
//! - **Clock**: an injectable millisecond clock for polled timeouts
//!
//! # Example
//!
//! ```rust
//! use patchview_core::{Color, DrawContext, Point, RecordingContext, Rect, Size};
//!
//! let mut ctx = RecordingContext::new(Size::new(640.0, 480.0));
//! ctx.fill_rect(Rect::new(10.0, 10.0, 20.0, 20.0), Color::GRAY);
//! ctx.fill_circle(Point::new(20.0, 20.0), 8.0, Color::RED);
//! assert_eq!(ctx.commands().len(), 2);
//! ```

pub mod clock;
pub mod color;
pub mod draw;
pub mod events;
pub mod geometry;

pub use clock::{Clock, ManualClock, SharedClock, SystemClock};
pub use color::{Color, ColorParseError};
pub use draw::{DrawCommand, DrawContext, RecordingContext, Stroke, TextAlign, TextStyle};
pub use events::{MouseButton, PointerEvent, PointerEventKind};
pub use geometry::{Point, Rect, Size, Vec2};
