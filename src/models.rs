use image::{RgbImage, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::error::DetectorError;
use crate::preprocessing::Rotation;

/// Encoded image bytes as selected by the user. Read once, never modified.
#[derive(Debug, Clone)]
pub struct SourceImage {
    bytes: Vec<u8>,
}

impl SourceImage {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> std::io::Result<Self> {
        Ok(Self::new(std::fs::read(path)?))
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Reduced-resolution, upright buffer handed to the detector.
#[derive(Debug, Clone)]
pub struct NormalizedImage {
    pub pixels: RgbImage,
    /// Power-of-two divisor applied to both source dimensions.
    pub factor: u32,
    pub rotation: Rotation,
}

impl NormalizedImage {
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Rescale a detection reported against this buffer into the pixel space
    /// of a display image of the given size.
    pub fn to_display_space(&self, detection: &Detection, display_width: u32, display_height: u32) -> Detection {
        let sx = display_width as f32 / self.width().max(1) as f32;
        let sy = display_height as f32 / self.height().max(1) as f32;
        Detection {
            x: detection.x * sx,
            y: detection.y * sy,
            w: detection.w * sx,
            h: detection.h * sy,
            label: detection.label.clone(),
            confidence: detection.confidence,
        }
    }
}

/// Upright canvas shown to the user and drawn on by the overlay renderer.
#[derive(Debug, Clone)]
pub struct DisplayImage {
    pub pixels: RgbaImage,
    pub rotation: Rotation,
}

impl DisplayImage {
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}

/// One object reported by the detector, in pixel units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub label: String,
    /// Score in `[0, 1]`.
    pub confidence: f32,
}

impl Detection {
    pub fn new(
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        label: impl Into<String>,
        confidence: f32,
    ) -> Result<Self, DetectorError> {
        let detection = Self {
            x,
            y,
            w,
            h,
            label: label.into(),
            confidence,
        };
        detection.validate(0)?;
        Ok(detection)
    }

    pub(crate) fn validate(&self, index: usize) -> Result<(), DetectorError> {
        if !self.has_finite_geometry() {
            return Err(DetectorError::InvalidDetection {
                index,
                reason: "box contains NaN or infinite value",
            });
        }
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(DetectorError::InvalidDetection {
                index,
                reason: "confidence outside [0, 1]",
            });
        }
        Ok(())
    }

    pub fn has_finite_geometry(&self) -> bool {
        [self.x, self.y, self.w, self.h].iter().all(|v| v.is_finite())
    }

    /// Caption drawn above the box, e.g. `person = 87.6%`.
    ///
    /// The percentage rounds half-up to one decimal, so `0.0625` reads `6.3%`.
    pub fn label_text(&self) -> String {
        let percent = f64::from(self.confidence * 100.0);
        let rounded = (percent * 10.0).round() / 10.0;
        format!("{} = {:.1}%", self.label, rounded)
    }
}
