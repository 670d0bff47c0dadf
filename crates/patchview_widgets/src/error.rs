//! Error types for patchview_widgets

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the checked patch loading API
///
/// The lenient entry points never return these: they degrade to an empty
/// widget list (or an empty include group) and record a diagnostic instead.
#[derive(Error, Debug)]
pub enum PatchError {
    /// The patch source could not be read
    #[error("failed to read patch {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The patch source exists but holds no text
    #[error("patch {0} is empty")]
    EmptySource(PathBuf),

    /// An include refers back to a file that is already being decoded
    #[error("include cycle detected at {0}")]
    IncludeCycle(PathBuf),

    /// Includes nest deeper than the configured limit
    #[error("include depth limit of {limit} exceeded at {path}")]
    IncludeDepth { path: PathBuf, limit: usize },

    /// A line could not be decoded
    #[error("line {line}: {message}")]
    Format { line: usize, message: String },
}

/// Result type for patchview_widgets operations
pub type Result<T> = std::result::Result<T, PatchError>;
