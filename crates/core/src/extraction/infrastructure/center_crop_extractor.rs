use crate::extraction::domain::face_extractor::FaceExtractor;
use crate::extraction::domain::ExtractionError;
use crate::shared::constants::DEFAULT_TARGET_SIZE;
use crate::shared::face_image::{FaceImage, CHANNELS};

/// Detector stand-in that treats the largest centered square of the
/// source image as a single face region.
///
/// Useful when sources are already portrait-framed and for wiring the
/// pipeline without a classifier model; a real detector plugs in
/// behind the same [`FaceExtractor`] trait.
pub struct CenterCropExtractor {
    target_size: u32,
}

impl CenterCropExtractor {
    pub fn new(target_size: u32) -> Self {
        Self { target_size }
    }
}

impl Default for CenterCropExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_TARGET_SIZE)
    }
}

impl FaceExtractor for CenterCropExtractor {
    fn extract(&self, image: &FaceImage) -> Result<Vec<FaceImage>, ExtractionError> {
        if image.width() == 0 || image.height() == 0 {
            return Err("source image has zero width or height".into());
        }
        let crop = center_square(image);
        Ok(vec![crop.resample_to(self.target_size, self.target_size)])
    }
}

/// Extracts the largest square centered in the raster.
fn center_square(image: &FaceImage) -> FaceImage {
    let side = image.width().min(image.height()) as usize;
    let x0 = (image.width() as usize - side) / 2;
    let y0 = (image.height() as usize - side) / 2;

    let src = image.as_ndarray();
    let mut data = Vec::with_capacity(side * side * CHANNELS);
    for row in y0..y0 + side {
        for col in x0..x0 + side {
            for c in 0..CHANNELS {
                data.push(src[[row, col, c]]);
            }
        }
    }
    FaceImage::new(data, side as u32, side as u32)
}
