use std::path::Path;
use tracing::{debug, info};

use crate::detection::Detector;
use crate::error::DetectorError;
use crate::models::{Detection, NormalizedImage};

/// Detector that returns a fixed, pre-recorded list of detections.
///
/// Coordinates are in the pixel space of the normalized image, exactly as a
/// real model would report them. An instance created with `unavailable()`
/// fails to initialize and never produces results.
#[derive(Debug, Clone, Default)]
pub struct ReplayDetector {
    detections: Option<Vec<Detection>>,
    calls: usize,
}

impl ReplayDetector {
    pub fn new(detections: Vec<Detection>) -> Self {
        Self {
            detections: Some(detections),
            calls: 0,
        }
    }

    pub fn unavailable() -> Self {
        Self::default()
    }

    /// Parse a JSON array of `{x, y, w, h, label, confidence}` objects.
    pub fn from_json(json: &str) -> Result<Self, DetectorError> {
        let detections: Vec<Detection> = serde_json::from_str(json)?;
        for (index, detection) in detections.iter().enumerate() {
            detection.validate(index)?;
        }
        Ok(Self::new(detections))
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, DetectorError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Number of `detect` calls served.
    pub fn calls(&self) -> usize {
        self.calls
    }
}

impl Detector for ReplayDetector {
    fn initialize(&mut self) -> bool {
        let ready = self.detections.is_some();
        info!(ready, "replay detector initialized");
        ready
    }

    fn detect(&mut self, image: &NormalizedImage, use_acceleration: bool) -> Option<Vec<Detection>> {
        self.calls += 1;
        debug!(
            width = image.width(),
            height = image.height(),
            use_acceleration,
            "replaying detections"
        );
        self.detections.clone()
    }
}
