//! Descriptor similarity scoring.

use crate::analysis::domain::descriptor::{self, Descriptor, DescriptorConfig, InvalidImageError};
use crate::shared::face_image::FaceImage;

/// Rescaled cosine similarity of two descriptors, in [0, 1].
///
/// 1 means identical direction, 0.5 orthogonal, 0 opposite.
pub fn similarity(a: &Descriptor, b: &Descriptor) -> f64 {
    (cosine(a.as_slice(), b.as_slice()) + 1.0) / 2.0
}

/// Scores every face against the average face.
///
/// The average's descriptor is extracted once. The returned scores
/// match the input order exactly.
pub fn batch_similarity(
    faces: &[FaceImage],
    average: &FaceImage,
    config: &DescriptorConfig,
) -> Result<Vec<f64>, InvalidImageError> {
    let average_descriptor = descriptor::extract(average, config)?;
    faces
        .iter()
        .map(|face| {
            let face_descriptor = descriptor::extract(face, config)?;
            Ok(similarity(&face_descriptor, &average_descriptor))
        })
        .collect()
}

/// Cosine of the angle between two vectors.
///
/// Returns 0.0 when either vector has zero magnitude (undefined angle,
/// treated as orthogonal) so callers never see NaN.
fn cosine(a: &[f64], b: &[f64]) -> f64 {
    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;
    for (&x, &y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = (norm_a * norm_b).sqrt();
    if denom < f64::EPSILON {
        return 0.0;
    }
    dot / denom
}
