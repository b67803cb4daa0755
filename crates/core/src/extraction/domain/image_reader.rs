use std::path::Path;

use crate::extraction::domain::ExtractionError;
use crate::shared::face_image::FaceImage;

/// Decodes a source image file into an RGB raster.
///
/// Implementations handle format details; the pipeline only sees
/// [`FaceImage`].
pub trait ImageReader: Send + Sync {
    fn read(&self, path: &Path) -> Result<FaceImage, ExtractionError>;
}
