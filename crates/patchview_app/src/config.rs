//! Viewer configuration (`patchview.toml`)
//!
//! ```toml
//! [viewer]
//! width = 1024
//! height = 768
//! background = "#323232"
//! log_filter = "info"
//!
//! [patch]
//! include_root = "."
//! max_include_depth = 16
//!
//! [interaction]
//! trigger_hold_ms = 300
//! number_drag_sensitivity = 0.5
//! ```
//!
//! Every section and key is optional.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use patchview_core::{Color, SharedClock, Size};
use patchview_widgets::{DecodeOptions, FsSource, PatchDecoder};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AppError, Result};

/// File name searched for next to a patch
pub const CONFIG_FILE_NAME: &str = "patchview.toml";

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ViewerConfig {
    #[serde(default)]
    pub viewer: ViewerSection,
    #[serde(default)]
    pub patch: PatchSection,
    #[serde(default)]
    pub interaction: InteractionSection,
}

/// Window and logging settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ViewerSection {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    /// `#RRGGBB`
    #[serde(default = "default_background")]
    pub background: String,
    /// tracing filter directive used when `RUST_LOG` is not set
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

impl Default for ViewerSection {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            background: default_background(),
            log_filter: default_log_filter(),
        }
    }
}

fn default_width() -> u32 {
    1024
}

fn default_height() -> u32 {
    768
}

fn default_background() -> String {
    "#323232".to_string()
}

fn default_log_filter() -> String {
    "info".to_string()
}

/// Patch loading settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PatchSection {
    /// Directory includes resolve against; defaults to the patch's directory
    #[serde(default)]
    pub include_root: Option<PathBuf>,
    #[serde(default = "default_max_include_depth")]
    pub max_include_depth: usize,
}

impl Default for PatchSection {
    fn default() -> Self {
        Self {
            include_root: None,
            max_include_depth: default_max_include_depth(),
        }
    }
}

fn default_max_include_depth() -> usize {
    patchview_widgets::patch::DEFAULT_MAX_INCLUDE_DEPTH
}

/// Widget behaviour settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct InteractionSection {
    #[serde(default = "default_trigger_hold_ms")]
    pub trigger_hold_ms: u64,
    #[serde(default = "default_number_drag_sensitivity")]
    pub number_drag_sensitivity: f32,
}

impl Default for InteractionSection {
    fn default() -> Self {
        Self {
            trigger_hold_ms: default_trigger_hold_ms(),
            number_drag_sensitivity: default_number_drag_sensitivity(),
        }
    }
}

fn default_trigger_hold_ms() -> u64 {
    patchview_widgets::trigger::DEFAULT_HOLD_MS
}

fn default_number_drag_sensitivity() -> f32 {
    patchview_widgets::number_entry::DEFAULT_DRAG_SENSITIVITY
}

impl ViewerConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| AppError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content, path)
    }

    /// Load `patchview.toml` from `dir`, falling back to defaults when absent
    pub fn discover(dir: impl AsRef<Path>) -> Result<Self> {
        let path = dir.as_ref().join(CONFIG_FILE_NAME);
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Parse configuration text; `path` is only used for error messages
    pub fn from_toml(content: &str, path: &Path) -> Result<Self> {
        let config: ViewerConfig =
            toml::from_str(content).map_err(|source| AppError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.background_color()?;
        if self.viewer.width == 0 || self.viewer.height == 0 {
            return Err(AppError::InvalidConfig {
                key: "viewer.width/height",
                message: "viewport must not be empty".to_string(),
            });
        }
        if !self.interaction.number_drag_sensitivity.is_finite() {
            return Err(AppError::InvalidConfig {
                key: "interaction.number_drag_sensitivity",
                message: "must be a finite number".to_string(),
            });
        }
        Ok(())
    }

    pub fn background_color(&self) -> Result<Color> {
        Color::parse_hex(&self.viewer.background).map_err(|err| AppError::InvalidConfig {
            key: "viewer.background",
            message: err.to_string(),
        })
    }

    pub fn viewport(&self) -> Size {
        Size::new(self.viewer.width as f32, self.viewer.height as f32)
    }

    pub fn decode_options(&self) -> DecodeOptions {
        DecodeOptions {
            max_include_depth: self.patch.max_include_depth,
            trigger_hold_ms: self.interaction.trigger_hold_ms,
            number_drag_sensitivity: self.interaction.number_drag_sensitivity,
        }
    }

    /// Include root for a patch at `patch_path`
    pub fn include_root_for(&self, patch_path: &Path) -> PathBuf {
        match &self.patch.include_root {
            Some(root) => root.clone(),
            None => patch_path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default(),
        }
    }

    /// Decoder for the patch at `patch_path`, and the path to load through it
    ///
    /// The decoder reads below the include root; the returned path is the
    /// patch relative to that root when it lies inside it.
    pub fn patch_decoder(&self, patch_path: &Path, clock: SharedClock) -> (PatchDecoder, PathBuf) {
        let root = self.include_root_for(patch_path);
        let relative = match &self.patch.include_root {
            Some(root) => patch_path
                .strip_prefix(root)
                .unwrap_or(patch_path)
                .to_path_buf(),
            None => patch_path
                .file_name()
                .map(PathBuf::from)
                .unwrap_or_else(|| patch_path.to_path_buf()),
        };
        let decoder = PatchDecoder::new(Arc::new(FsSource::new(root)), clock)
            .with_options(self.decode_options());
        (decoder, relative)
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
