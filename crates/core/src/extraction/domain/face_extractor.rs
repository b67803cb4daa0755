use crate::extraction::domain::ExtractionError;
use crate::shared::face_image::FaceImage;

/// Boundary to an external face classifier.
///
/// Given one decoded source image, returns zero or more face crops,
/// each already resized to the configured target size, in a stable
/// intra-source order. Implementations are stateless transforms and
/// may be shared across worker threads.
pub trait FaceExtractor: Send + Sync {
    fn extract(&self, image: &FaceImage) -> Result<Vec<FaceImage>, ExtractionError>;
}
