//! Canvas configuration.

use crate::color::{DEFAULT_PALETTE, Rgba};
use crate::history::MAX_HISTORY_DEPTH;
use crate::tools::StrokeWidth;
use kurbo::Size;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid canvas size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
    #[error("History limit must be at least 1")]
    InvalidHistoryLimit,
    #[error("Palette is empty")]
    EmptyPalette,
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Drawing surface configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CanvasConfig {
    /// Logical canvas width in pixels.
    pub width: u32,
    /// Logical canvas height in pixels.
    pub height: u32,
    pub background_color: Rgba,
    /// Initial pen color.
    pub stroke_color: Rgba,
    /// Initial pen width.
    pub stroke_width: StrokeWidth,
    /// Identifier passed to the save handler. Autosave is off without one.
    pub document_id: Option<String>,
    pub history_limit: usize,
    /// Commit on gesture end even if the pointer never moved.
    pub commit_empty_gestures: bool,
    /// Swatches offered by hosts.
    pub palette: Vec<Rgba>,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 600,
            height: 400,
            background_color: Rgba::white(),
            stroke_color: Rgba::black(),
            stroke_width: StrokeWidth::default(),
            document_id: None,
            history_limit: MAX_HISTORY_DEPTH,
            commit_empty_gestures: true,
            palette: DEFAULT_PALETTE.to_vec(),
        }
    }
}

impl CanvasConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidSize {
                width: self.width,
                height: self.height,
            });
        }
        if self.history_limit == 0 {
            return Err(ConfigError::InvalidHistoryLimit);
        }
        if self.palette.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        Ok(())
    }

    pub fn logical_size(&self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }
}
