use tracing::{info, instrument, warn};

use crate::config::SessionConfig;
use crate::detection::Detector;
use crate::error::{DecodeError, SessionError};
use crate::models::{Detection, DisplayImage, NormalizedImage, SourceImage};
use crate::overlay::{AnnotatedImage, OverlayRenderer};
use crate::preprocessing::ImageNormalizer;

/// Everything derived from one user selection. Replaced as a whole.
#[derive(Debug, Clone)]
pub struct Selection {
    pub source: SourceImage,
    pub normalized: NormalizedImage,
    pub display: DisplayImage,
    /// `None` until detection has run on this image.
    pub detections: Option<Vec<Detection>>,
}

/// Owns the current image, its detections, and the detector.
///
/// All operations are blocking and must not be called concurrently.
#[derive(Debug)]
pub struct Session<D: Detector> {
    config: SessionConfig,
    normalizer: ImageNormalizer,
    renderer: OverlayRenderer,
    detector: D,
    detector_ready: bool,
    current: Option<Selection>,
}

impl<D: Detector> Session<D> {
    /// Build a session and initialize the detector once.
    pub fn new(config: SessionConfig, mut detector: D) -> Result<Self, SessionError> {
        config.validate()?;
        let renderer = OverlayRenderer::new(config.overlay.clone())?;
        let detector_ready = detector.initialize();
        if !detector_ready {
            warn!("detector failed to initialize");
        }
        Ok(Self {
            normalizer: ImageNormalizer::new(config.normalize.clone()),
            renderer,
            config,
            detector,
            detector_ready,
            current: None,
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn detector_ready(&self) -> bool {
        self.detector_ready
    }

    pub fn detector(&self) -> &D {
        &self.detector
    }

    pub fn renderer(&self) -> &OverlayRenderer {
        &self.renderer
    }

    pub fn current(&self) -> Option<&Selection> {
        self.current.as_ref()
    }

    /// Normalize `source` and make it the current image.
    ///
    /// On failure the previous selection stays in place untouched.
    #[instrument(skip_all, fields(input_size = source.len()))]
    pub fn select_image(&mut self, source: SourceImage) -> Result<&Selection, DecodeError> {
        let (normalized, shown) = match self.normalizer.normalize(&source) {
            Ok(images) => images,
            Err(e) => {
                warn!(error = %e, kept_previous = self.current.is_some(), "image selection failed");
                return Err(e);
            }
        };
        info!(
            width = shown.width(),
            height = shown.height(),
            factor = normalized.factor,
            "selected image"
        );
        Ok(self.current.insert(Selection {
            source,
            normalized,
            display: shown,
            detections: None,
        }))
    }

    /// Run the detector on the current image and keep its results in
    /// display coordinates.
    ///
    /// Returns `Ok(None)` when the detector reported that it did not run.
    #[instrument(skip(self))]
    pub fn detect(&mut self, use_acceleration: bool) -> Result<Option<&[Detection]>, SessionError> {
        let selection = self.current.as_mut().ok_or(SessionError::NoImageSelected)?;

        if !self.detector_ready {
            if self.config.strict_detector {
                return Err(SessionError::DetectorUnavailable);
            }
            warn!("running detector that failed to initialize");
        }

        let (display_width, display_height) = (selection.display.width(), selection.display.height());
        selection.detections = self
            .detector
            .detect(&selection.normalized, use_acceleration)
            .map(|found| {
                found
                    .iter()
                    .map(|d| selection.normalized.to_display_space(d, display_width, display_height))
                    .collect()
            });

        match &selection.detections {
            Some(found) => info!(count = found.len(), "detection finished"),
            None => warn!("detector did not run"),
        }
        Ok(selection.detections.as_deref())
    }

    /// Draw the current detections onto the current display image.
    pub fn render(&self) -> Result<AnnotatedImage<'_>, SessionError> {
        let selection = self.current.as_ref().ok_or(SessionError::NoImageSelected)?;
        Ok(self
            .renderer
            .render(&selection.display, selection.detections.as_deref()))
    }
}
