use std::path::Path;

use crate::shared::face_location::FaceLocation;

/// Domain interface for face detection over an image file.
///
/// Backends hold whatever handle they need to issue repeated detections
/// without re-initialising (resolved interpreter callables, a loaded
/// model), hence `&mut self`. An empty result means no faces were found
/// and is distinct from an error.
pub trait FaceDetector: Send {
    /// Short backend name used in logs and reports.
    fn name(&self) -> &'static str;

    fn detect(&mut self, image_path: &Path) -> Result<Vec<FaceLocation>, Box<dyn std::error::Error>>;
}
