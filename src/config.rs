use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// How the reduced-resolution buffer is sampled from the decoded pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Sampling {
    /// Take every `s`-th pixel along each axis.
    #[default]
    Stride,
    /// Average each `s`x`s` block.
    Area,
}

/// Resolution of the image used as the rendering canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DisplayResolution {
    #[default]
    FullResolution,
    /// Display a copy of the downsampled buffer.
    Normalized,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    /// Halving stops once either side would fall below this.
    pub target_min_dimension: u32,
    pub max_input_bytes: usize,
    pub max_dimension: u32,
    pub sampling: Sampling,
    pub display: DisplayResolution,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            target_min_dimension: 640,
            max_input_bytes: 50 * 1024 * 1024,
            max_dimension: 15_000,
            sampling: Sampling::Stride,
            display: DisplayResolution::FullResolution,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayStyle {
    pub stroke_width: f32,
    pub text_size: f32,
    pub text_color: [u8; 3],
    pub background_color: [u8; 3],
    /// TrueType font used for labels. The bundled DejaVu Sans is used when unset.
    pub font_path: Option<PathBuf>,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            stroke_width: 4.0,
            text_size: 26.0,
            text_color: [0, 0, 0],
            background_color: [255, 255, 255],
            font_path: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub normalize: NormalizeConfig,
    pub overlay: OverlayStyle,
    /// Refuse to call the detector after a failed `initialize`.
    pub strict_detector: bool,
}

impl SessionConfig {
    /// Load a config from a JSON file. Missing fields take their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config: SessionConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.normalize.target_min_dimension == 0 {
            return Err(ConfigError::Invalid("target_min_dimension must be at least 1"));
        }
        if self.normalize.max_dimension == 0 {
            return Err(ConfigError::Invalid("max_dimension must be at least 1"));
        }
        if !(self.overlay.stroke_width.is_finite() && self.overlay.stroke_width > 0.0) {
            return Err(ConfigError::Invalid("stroke_width must be positive"));
        }
        if !(self.overlay.text_size.is_finite() && self.overlay.text_size > 0.0) {
            return Err(ConfigError::Invalid("text_size must be positive"));
        }
        Ok(())
    }
}
