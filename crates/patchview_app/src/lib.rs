//! patchview presentation shell
//!
//! Hosts a decoded patch: loads it with settings from `patchview.toml`,
//! forwards pointer and key input, drives per-frame ticks and redraws, and
//! offers the demo operations (reset, maximize, random trigger).
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use patchview_app::PatchView;
//! use patchview_core::{ManualClock, RecordingContext, Size};
//!
//! let mut view = PatchView::new(Arc::new(ManualClock::new(0)));
//! let mut ctx = RecordingContext::new(Size::new(320.0, 240.0));
//! view.tick();
//! view.draw(&mut ctx);
//! assert_eq!(ctx.commands().len(), 1);
//! ```

pub mod config;
pub mod error;
pub mod script;
pub mod view;

pub use config::{ViewerConfig, CONFIG_FILE_NAME};
pub use error::{AppError, Result};
pub use script::{parse_script, play, PlayReport, ScriptStep};
pub use view::PatchView;
