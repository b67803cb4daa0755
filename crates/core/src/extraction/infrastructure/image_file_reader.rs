use std::path::Path;

use crate::extraction::domain::image_reader::ImageReader;
use crate::extraction::domain::ExtractionError;
use crate::shared::face_image::FaceImage;

/// Decodes image files with the `image` crate, converting everything
/// to 8-bit RGB.
pub struct ImageFileReader;

impl ImageFileReader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageFileReader {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageReader for ImageFileReader {
    fn read(&self, path: &Path) -> Result<FaceImage, ExtractionError> {
        let rgb = image::open(path)?.to_rgb8();
        let (width, height) = rgb.dimensions();
        Ok(FaceImage::new(rgb.into_raw(), width, height))
    }
}
