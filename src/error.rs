use thiserror::Error;

/// The source bytes could not be turned into an image.
///
/// Normalization never produces a partial result: any of these leaves the
/// caller's previous state untouched.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("source image is empty")]
    EmptySource,

    #[error("source image too large: {size} bytes, max {max_size}")]
    SourceTooLarge { size: usize, max_size: usize },

    #[error("unrecognized image format")]
    UnsupportedFormat,

    #[error("image dimensions too large: {width}x{height}, max {max} per side")]
    DimensionsTooLarge { width: u32, height: u32, max: u32 },

    #[error("image has a zero dimension: {width}x{height}")]
    ZeroDimension { width: u32, height: u32 },

    #[error("failed to decode image: {0}")]
    Image(#[from] image::ImageError),

    #[error("failed to read image: {0}")]
    Io(#[from] std::io::Error),
}

/// Orientation metadata could not be read. Recovered locally as "no rotation".
#[derive(Debug, Error)]
pub enum MetadataReadError {
    #[error("no readable exif container: {0}")]
    Container(#[from] exif::Error),

    #[error("orientation tag not present")]
    MissingTag,

    #[error("orientation tag has a non-integer value")]
    UnexpectedValue,
}

#[derive(Debug, Error)]
pub enum DetectorError {
    #[error("failed to read detections: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse detections: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid detection at index {index}: {reason}")]
    InvalidDetection { index: usize, reason: &'static str },
}

#[derive(Debug, Error)]
pub enum FontError {
    #[error("failed to read font file: {0}")]
    Io(#[from] std::io::Error),

    #[error("font data could not be parsed")]
    Invalid,
}

impl From<ab_glyph::InvalidFont> for FontError {
    fn from(_: ab_glyph::InvalidFont) -> Self {
        FontError::Invalid
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(&'static str),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no image selected")]
    NoImageSelected,

    #[error("detector failed to initialize")]
    DetectorUnavailable,

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Font(#[from] FontError),
}
