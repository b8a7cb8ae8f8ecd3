//! Turns an arbitrary encoded photo into an upright inference buffer plus an
//! upright display canvas.
//!
//! Steps:
//! 1. Probe dimensions without decoding pixels
//! 2. Pick a power-of-two downsample factor
//! 3. Decode the pixels and sample the reduced buffer
//! 4. Read EXIF orientation (failures mean "upright")
//! 5. Rotate both buffers

pub mod downsample;
pub mod orientation;

pub use downsample::downsample_factor;
pub use orientation::Rotation;

use image::buffer::ConvertBuffer;
use image::{DynamicImage, ImageReader, Limits, RgbImage};
use std::io::Cursor;
use tracing::{debug, instrument};

use crate::config::{DisplayResolution, NormalizeConfig};
use crate::error::DecodeError;
use crate::models::{DisplayImage, NormalizedImage, SourceImage};

#[derive(Debug, Clone, Default)]
pub struct ImageNormalizer {
    config: NormalizeConfig,
}

impl ImageNormalizer {
    pub fn new(config: NormalizeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NormalizeConfig {
        &self.config
    }

    /// Produce the detector input and the display canvas from one source.
    ///
    /// Both outputs share the same orientation correction. Orientation
    /// metadata problems are never fatal; anything that prevents decoding
    /// the pixels is.
    #[instrument(skip(self, source), fields(input_size = source.len()))]
    pub fn normalize(&self, source: &SourceImage) -> Result<(NormalizedImage, DisplayImage), DecodeError> {
        let bytes = source.bytes();
        let (width, height) = probe_dimensions(&self.config, bytes)?;
        let factor = downsample_factor(width, height, self.config.target_min_dimension);
        debug!(width, height, factor, "computed downsample factor");

        let decoded = decode_pixels(&self.config, bytes)?.to_rgba8();
        let reduced = downsample::sample(&decoded, factor, self.config.sampling);
        let rotation = orientation::detect_rotation(bytes);

        let normalized_pixels: RgbImage = reduced.convert();
        let normalized = NormalizedImage {
            pixels: rotation.apply(normalized_pixels),
            factor,
            rotation,
        };

        let display_base = match self.config.display {
            DisplayResolution::FullResolution => decoded,
            DisplayResolution::Normalized => reduced,
        };
        let shown = DisplayImage {
            pixels: rotation.apply(display_base),
            rotation,
        };

        let normalized_size = format!("{}x{}", normalized.width(), normalized.height());
        let display_size = format!("{}x{}", shown.width(), shown.height());
        debug!(
            normalized = %normalized_size,
            display = %display_size,
            degrees = rotation.degrees(),
            "normalized image"
        );

        Ok((normalized, shown))
    }
}

fn check_input(config: &NormalizeConfig, bytes: &[u8]) -> Result<(), DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::EmptySource);
    }
    if bytes.len() > config.max_input_bytes {
        return Err(DecodeError::SourceTooLarge {
            size: bytes.len(),
            max_size: config.max_input_bytes,
        });
    }
    Ok(())
}

fn reader(bytes: &[u8]) -> Result<ImageReader<Cursor<&[u8]>>, DecodeError> {
    let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
    if reader.format().is_none() {
        return Err(DecodeError::UnsupportedFormat);
    }
    Ok(reader)
}

/// Read only the header to learn the image dimensions.
fn probe_dimensions(config: &NormalizeConfig, bytes: &[u8]) -> Result<(u32, u32), DecodeError> {
    check_input(config, bytes)?;
    let (width, height) = reader(bytes)?.into_dimensions()?;

    if width == 0 || height == 0 {
        return Err(DecodeError::ZeroDimension { width, height });
    }
    if width > config.max_dimension || height > config.max_dimension {
        return Err(DecodeError::DimensionsTooLarge {
            width,
            height,
            max: config.max_dimension,
        });
    }
    Ok((width, height))
}

fn decode_pixels(config: &NormalizeConfig, bytes: &[u8]) -> Result<DynamicImage, DecodeError> {
    let mut limits = Limits::default();
    limits.max_image_width = Some(config.max_dimension);
    limits.max_image_height = Some(config.max_dimension);

    let mut reader = reader(bytes)?;
    reader.limits(limits);
    Ok(reader.decode()?)
}
