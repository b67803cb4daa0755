use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::pipeline::batch_result::BatchResult;
use crate::shared::face_image::FaceImage;

/// Raised when an analysis artifact cannot be written.
#[derive(Error, Debug)]
#[error("failed to write {}: {cause}", path.display())]
pub struct PersistenceError {
    pub path: PathBuf,
    #[source]
    pub cause: Box<dyn std::error::Error + Send + Sync>,
}

/// Persists a completed batch analysis to some destination.
pub trait ResultWriter: Send {
    /// Writes the average face and all per-face artifacts for `result`.
    fn write(
        &self,
        output_dir: &Path,
        average: &FaceImage,
        result: &BatchResult,
    ) -> Result<(), PersistenceError>;
}
