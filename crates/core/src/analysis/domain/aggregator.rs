//! Pixelwise averaging of a batch of face rasters.

use std::borrow::Cow;

use thiserror::Error;

use crate::shared::face_image::FaceImage;

#[derive(Error, Debug)]
#[error("cannot average an empty batch of faces")]
pub struct EmptyBatchError;

/// Computes the elementwise mean raster of a non-empty batch.
///
/// Channel sums accumulate in f64, then each mean is clamped to
/// [0, 255] and rounded to the nearest integer sample. The result has
/// the dimensions of the first face; a face with different dimensions
/// is resampled to them before accumulation (the extraction boundary
/// normally guarantees a fixed target size, so this path is a
/// fallback).
pub fn average(faces: &[FaceImage]) -> Result<FaceImage, EmptyBatchError> {
    let first = faces.first().ok_or(EmptyBatchError)?;
    let width = first.width();
    let height = first.height();

    let mut sums = vec![0.0f64; first.data().len()];
    for face in faces {
        let face: Cow<'_, FaceImage> = if face.width() == width && face.height() == height {
            Cow::Borrowed(face)
        } else {
            Cow::Owned(face.resample_to(width, height))
        };
        for (sum, &sample) in sums.iter_mut().zip(face.data()) {
            *sum += sample as f64;
        }
    }

    let count = faces.len() as f64;
    let data = sums
        .iter()
        .map(|&sum| (sum / count).clamp(0.0, 255.0).round() as u8)
        .collect();
    Ok(FaceImage::new(data, width, height))
}
