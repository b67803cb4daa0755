use std::path::Path;

use crate::shared::face_image::FaceImage;

/// Writes a single face image to a file.
pub trait ImageWriter: Send + Sync {
    /// Writes the image to the given path.
    fn write(&self, path: &Path, image: &FaceImage) -> Result<(), Box<dyn std::error::Error>>;
}
