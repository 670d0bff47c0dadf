//! `.pd` patch decoding
//!
//! - [`tokens`]: statement assembly and tokenization
//! - [`grammar`]: token offsets per object class
//! - [`decoder`]: turns statements into widgets, following includes
//! - [`source`]: where patch text is read from

pub mod color;
pub mod decoder;
pub mod diagnostics;
pub mod grammar;
pub mod source;
pub mod tokens;

pub use color::ColorField;
pub use decoder::{DecodeOptions, PatchDecoder, DEFAULT_MAX_INCLUDE_DEPTH};
pub use diagnostics::{DecodeOutput, Diagnostic, Severity};
pub use source::{normalize_path, FsSource, MemorySource, PatchSource, SharedSource};
pub use tokens::{statements, tokenize, Statement};
