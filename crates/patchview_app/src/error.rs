//! Error types for patchview_app

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur in the patchview shell
#[derive(Error, Debug)]
pub enum AppError {
    /// Failed to read the configuration file
    #[error("failed to read config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for the expected schema
    #[error("failed to parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A configured value is out of range
    #[error("invalid config value for {key}: {message}")]
    InvalidConfig { key: &'static str, message: String },

    /// Loading the patch failed
    #[error(transparent)]
    Patch(#[from] patchview_widgets::PatchError),

    /// A line of an event script could not be parsed
    #[error("script line {line}: {message}")]
    Script { line: usize, message: String },
}

/// Result type for patchview_app operations
pub type Result<T> = std::result::Result<T, AppError>;
