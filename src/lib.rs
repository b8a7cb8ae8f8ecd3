pub mod config;
pub mod detection;
pub mod error;
pub mod models;
pub mod overlay;
pub mod pipeline;
pub mod preprocessing;
pub mod session;

pub use config::{DisplayResolution, NormalizeConfig, OverlayStyle, Sampling, SessionConfig};
pub use detection::{Detector, ReplayDetector};
pub use error::{ConfigError, DecodeError, DetectorError, FontError, MetadataReadError, SessionError};
pub use models::{Detection, DisplayImage, NormalizedImage, SourceImage};
pub use overlay::{AnnotatedImage, ColorPalette, LabelLayout, OverlayRenderer};
pub use pipeline::{DebugConfig, Pipeline};
pub use preprocessing::{ImageNormalizer, Rotation, downsample_factor};
pub use session::{Selection, Session};
