use std::path::Path;

use crate::output::domain::image_writer::ImageWriter;
use crate::shared::face_image::FaceImage;

/// Writes a face image to an image file using the `image` crate.
pub struct ImageFileWriter;

impl ImageFileWriter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageFileWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageWriter for ImageFileWriter {
    fn write(&self, path: &Path, image: &FaceImage) -> Result<(), Box<dyn std::error::Error>> {
        // Ensure parent directory exists (infrastructure concern)
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let img = image::RgbImage::from_raw(image.width(), image.height(), image.data().to_vec())
            .ok_or("Failed to create image from face data")?;
        img.save(path)?;
        Ok(())
    }
}
