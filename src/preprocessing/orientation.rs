use image::{imageops, ImageBuffer, Pixel};
use std::io::Cursor;
use tracing::{debug, warn};

use crate::error::MetadataReadError;

/// Clockwise rotation needed to display an image upright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    #[default]
    None,
    Cw90,
    Cw180,
    Cw270,
}

impl Rotation {
    /// Map an EXIF orientation value. Only the pure rotations are honoured;
    /// mirrored and unknown values fall back to no rotation.
    pub fn from_exif(orientation: u32) -> Self {
        match orientation {
            6 => Rotation::Cw90,
            3 => Rotation::Cw180,
            8 => Rotation::Cw270,
            _ => Rotation::None,
        }
    }

    pub fn degrees(self) -> u32 {
        match self {
            Rotation::None => 0,
            Rotation::Cw90 => 90,
            Rotation::Cw180 => 180,
            Rotation::Cw270 => 270,
        }
    }

    pub fn apply<P>(self, image: ImageBuffer<P, Vec<P::Subpixel>>) -> ImageBuffer<P, Vec<P::Subpixel>>
    where
        P: Pixel + 'static,
    {
        match self {
            Rotation::None => image,
            Rotation::Cw90 => imageops::rotate90(&image),
            Rotation::Cw180 => imageops::rotate180(&image),
            Rotation::Cw270 => imageops::rotate270(&image),
        }
    }
}

/// Read the raw EXIF orientation tag (0x0112) from encoded image bytes.
pub fn read_exif_orientation(bytes: &[u8]) -> Result<u32, MetadataReadError> {
    let mut cursor = Cursor::new(bytes);
    let exif = exif::Reader::new().read_from_container(&mut cursor)?;
    let field = exif
        .get_field(exif::Tag::Orientation, exif::In::PRIMARY)
        .ok_or(MetadataReadError::MissingTag)?;
    field
        .value
        .get_uint(0)
        .ok_or(MetadataReadError::UnexpectedValue)
}

/// Rotation for the given bytes; unreadable metadata is logged and means no rotation.
pub fn detect_rotation(bytes: &[u8]) -> Rotation {
    match read_exif_orientation(bytes) {
        Ok(value) => {
            let rotation = Rotation::from_exif(value);
            debug!(orientation = value, degrees = rotation.degrees(), "read exif orientation");
            rotation
        }
        Err(MetadataReadError::Container(exif::Error::NotFound(_))) | Err(MetadataReadError::MissingTag) => {
            debug!("no exif orientation, assuming upright");
            Rotation::None
        }
        Err(e) => {
            warn!(error = %e, "failed to read exif orientation, assuming upright");
            Rotation::None
        }
    }
}
