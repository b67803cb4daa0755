use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::extraction::domain::face_extractor::FaceExtractor;
use crate::extraction::domain::image_reader::ImageReader;
use crate::shared::face_image::FaceImage;

/// Progress callback: `(sources_completed, sources_total)`.
/// Returning `false` cancels the run.
pub type ProgressFn = Box<dyn Fn(usize, usize) -> bool + Send>;

/// Failure while extracting faces from a single source. Never fatal to
/// the run; the orchestrator records it and skips the source.
#[derive(Error, Debug)]
#[error("failed to process source {}: {cause}", source.display())]
pub struct SourceProcessingError {
    pub source: PathBuf,
    #[source]
    pub cause: Box<dyn std::error::Error + Send + Sync>,
}

/// Per-source outcome: the extracted faces, or the recorded failure.
pub type SourceOutcome = Result<Vec<FaceImage>, SourceProcessingError>;

/// Abstracts how per-source extraction runs (port).
///
/// Implementations may process sources concurrently, but the returned
/// outcomes are always in source order, one per input path, so the
/// final face ordering is independent of completion order.
pub trait SourceExecutor: Send {
    fn run(
        &self,
        sources: &[PathBuf],
        reader: &dyn ImageReader,
        extractor: &dyn FaceExtractor,
        on_progress: Option<&ProgressFn>,
    ) -> Result<Vec<SourceOutcome>, Box<dyn std::error::Error>>;
}

/// Reads and extracts one source, mapping any failure into a
/// [`SourceProcessingError`] tagged with the source path.
pub fn process_source(
    reader: &dyn ImageReader,
    extractor: &dyn FaceExtractor,
    path: &Path,
) -> SourceOutcome {
    let run = || {
        let image = reader.read(path)?;
        extractor.extract(&image)
    };
    run().map_err(|cause| SourceProcessingError {
        source: path.to_path_buf(),
        cause,
    })
}
