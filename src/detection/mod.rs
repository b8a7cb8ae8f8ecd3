pub mod replay;

pub use replay::ReplayDetector;

use crate::models::{Detection, NormalizedImage};

/// Object detector behind the normalization and overlay stages.
///
/// Implementations are opaque inference engines. Callers must call
/// `initialize` once before `detect` and serialize all calls.
pub trait Detector {
    /// Returns `false` when detection is unavailable for the rest of the session.
    fn initialize(&mut self) -> bool;

    /// Run detection on `image`.
    ///
    /// Coordinates are in the pixel space of `image`. `None` means detection
    /// did not run; an empty list means it ran and found nothing.
    fn detect(&mut self, image: &NormalizedImage, use_acceleration: bool) -> Option<Vec<Detection>>;
}

impl<D: Detector + ?Sized> Detector for Box<D> {
    fn initialize(&mut self) -> bool {
        (**self).initialize()
    }

    fn detect(&mut self, image: &NormalizedImage, use_acceleration: bool) -> Option<Vec<Detection>> {
        (**self).detect(image, use_acceleration)
    }
}
