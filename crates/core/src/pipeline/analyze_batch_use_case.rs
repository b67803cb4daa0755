use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::analysis::domain::aggregator;
use crate::analysis::domain::descriptor::DescriptorConfig;
use crate::analysis::domain::similarity;
use crate::extraction::domain::face_extractor::FaceExtractor;
use crate::extraction::domain::image_reader::ImageReader;
use crate::output::domain::result_writer::ResultWriter;
use crate::pipeline::batch_result::{BatchResult, FaceRecord};
use crate::pipeline::source_executor::{ProgressFn, SourceExecutor, SourceProcessingError};
use crate::shared::face_image::FaceImage;

/// Raised when every source has been processed and zero faces were
/// collected. Fatal to the run.
#[derive(Error, Debug)]
#[error("no faces were found in any of the {sources} sources")]
pub struct NoFacesFoundError {
    pub sources: usize,
}

/// Completed analysis: the average face plus the scored batch.
#[derive(Debug)]
pub struct BatchAnalysis {
    pub average_face: FaceImage,
    pub result: BatchResult,
}

/// End-to-end batch pipeline: extract → aggregate → score → persist.
///
/// Per-source extraction failures are recorded and skipped; the run
/// only fails outright when no faces were collected at all or when
/// writing the results fails.
pub struct AnalyzeBatchUseCase {
    reader: Box<dyn ImageReader>,
    extractor: Box<dyn FaceExtractor>,
    executor: Box<dyn SourceExecutor>,
    result_writer: Box<dyn ResultWriter>,
    descriptor_config: DescriptorConfig,
    on_progress: Option<ProgressFn>,
}

impl AnalyzeBatchUseCase {
    pub fn new(
        reader: Box<dyn ImageReader>,
        extractor: Box<dyn FaceExtractor>,
        executor: Box<dyn SourceExecutor>,
        result_writer: Box<dyn ResultWriter>,
        descriptor_config: DescriptorConfig,
        on_progress: Option<ProgressFn>,
    ) -> Self {
        Self {
            reader,
            extractor,
            executor,
            result_writer,
            descriptor_config,
            on_progress,
        }
    }

    /// Runs the full pipeline over `sources` and writes artifacts to
    /// `output_dir`.
    ///
    /// Faces keep discovery order: source order first, intra-source
    /// face index second. Aggregation starts only after every source
    /// has finished or been skipped.
    pub fn execute(
        &mut self,
        sources: &[PathBuf],
        output_dir: &Path,
    ) -> Result<BatchAnalysis, Box<dyn std::error::Error>> {
        let outcomes = self.executor.run(
            sources,
            &*self.reader,
            &*self.extractor,
            self.on_progress.as_ref(),
        )?;

        let mut faces: Vec<FaceImage> = Vec::new();
        let mut provenance: Vec<(PathBuf, usize)> = Vec::new();
        let mut skipped: Vec<SourceProcessingError> = Vec::new();

        for (source, outcome) in sources.iter().zip(outcomes) {
            match outcome {
                Ok(source_faces) => {
                    for (face_index, face) in source_faces.into_iter().enumerate() {
                        faces.push(face);
                        provenance.push((source.clone(), face_index));
                    }
                }
                Err(err) => {
                    log::warn!("skipping source {}: {}", err.source.display(), err.cause);
                    skipped.push(err);
                }
            }
        }

        if faces.is_empty() {
            return Err(Box::new(NoFacesFoundError {
                sources: sources.len(),
            }));
        }
        log::info!("collected {} faces from {} sources", faces.len(), sources.len());

        let average_face = aggregator::average(&faces)?;
        let similarities =
            similarity::batch_similarity(&faces, &average_face, &self.descriptor_config)?;

        let records = provenance
            .into_iter()
            .zip(faces)
            .zip(similarities)
            .map(|(((source, face_index), face), similarity)| FaceRecord {
                source,
                face_index,
                face,
                similarity,
            })
            .collect();

        let result = BatchResult::new(records, skipped);
        self.result_writer.write(output_dir, &average_face, &result)?;

        Ok(BatchAnalysis {
            average_face,
            result,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use crate::extraction::domain::ExtractionError;
    use crate::output::domain::result_writer::PersistenceError;
    use crate::pipeline::source_executor::{process_source, SourceOutcome};

    // --- Stubs ---

    /// Sequential in-test executor, simply mapping over sources.
    struct InlineExecutor;

    impl SourceExecutor for InlineExecutor {
        fn run(
            &self,
            sources: &[PathBuf],
            reader: &dyn ImageReader,
            extractor: &dyn FaceExtractor,
            _on_progress: Option<&ProgressFn>,
        ) -> Result<Vec<SourceOutcome>, Box<dyn std::error::Error>> {
            Ok(sources
                .iter()
                .map(|path| process_source(reader, extractor, path))
                .collect())
        }
    }

    /// Reader producing a solid raster whose level is the first byte of
    /// the file name, or failing for names starting with "bad".
    struct StubReader;

    impl ImageReader for StubReader {
        fn read(&self, path: &Path) -> Result<FaceImage, ExtractionError> {
            let name = path.file_name().unwrap().to_str().unwrap();
            if name.starts_with("bad") {
                return Err("unreadable source".into());
            }
            let level = name.bytes().next().unwrap();
            Ok(FaceImage::new(vec![level; 4 * 4 * 3], 4, 4))
        }
    }

    /// Extractor emitting a fixed number of faces per source.
    struct FixedCountExtractor {
        faces_per_source: usize,
    }

    impl FaceExtractor for FixedCountExtractor {
        fn extract(&self, image: &FaceImage) -> Result<Vec<FaceImage>, ExtractionError> {
            Ok(vec![image.clone(); self.faces_per_source])
        }
    }

    #[derive(Default)]
    struct StubResultWriter {
        written: Arc<Mutex<Vec<(PathBuf, usize)>>>,
        fail: bool,
    }

    impl ResultWriter for StubResultWriter {
        fn write(
            &self,
            output_dir: &Path,
            _average: &FaceImage,
            result: &BatchResult,
        ) -> Result<(), PersistenceError> {
            if self.fail {
                return Err(PersistenceError {
                    path: output_dir.to_path_buf(),
                    cause: "disk full".into(),
                });
            }
            self.written
                .lock()
                .unwrap()
                .push((output_dir.to_path_buf(), result.face_count()));
            Ok(())
        }
    }

    // --- Helpers ---

    fn use_case(extractor_faces: usize, writer: StubResultWriter) -> AnalyzeBatchUseCase {
        AnalyzeBatchUseCase::new(
            Box::new(StubReader),
            Box::new(FixedCountExtractor {
                faces_per_source: extractor_faces,
            }),
            Box::new(InlineExecutor),
            Box::new(writer),
            DescriptorConfig::default(),
            None,
        )
    }

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    // --- Tests ---

    #[test]
    fn test_happy_path_produces_records_and_writes() {
        let writer = StubResultWriter::default();
        let written = writer.written.clone();
        let mut uc = use_case(1, writer);

        let analysis = uc
            .execute(&paths(&["a.png", "b.png"]), Path::new("out"))
            .unwrap();

        assert_eq!(analysis.result.face_count(), 2);
        assert!(analysis.result.skipped.is_empty());
        assert_eq!(analysis.average_face.width(), 4);

        let written = written.lock().unwrap();
        assert_eq!(written.len(), 1);
        assert_eq!(written[0], (PathBuf::from("out"), 2));
    }

    #[test]
    fn test_failing_source_is_skipped_and_run_continues() {
        let mut uc = use_case(1, StubResultWriter::default());

        let analysis = uc
            .execute(&paths(&["a.png", "bad.png", "c.png"]), Path::new("out"))
            .unwrap();

        assert_eq!(analysis.result.face_count(), 2);
        assert_eq!(analysis.result.skipped.len(), 1);
        assert_eq!(analysis.result.skipped[0].source, PathBuf::from("bad.png"));
        let sources: Vec<&str> = analysis
            .result
            .records
            .iter()
            .map(|r| r.source.to_str().unwrap())
            .collect();
        assert_eq!(sources, vec!["a.png", "c.png"]);
    }

    #[test]
    fn test_every_source_failing_reports_no_faces() {
        let mut uc = use_case(1, StubResultWriter::default());

        let err = uc
            .execute(&paths(&["bad1.png", "bad2.png"]), Path::new("out"))
            .unwrap_err();

        let no_faces = err.downcast_ref::<NoFacesFoundError>().unwrap();
        assert_eq!(no_faces.sources, 2);
    }

    #[test]
    fn test_sources_without_faces_report_no_faces() {
        let mut uc = use_case(0, StubResultWriter::default());

        let err = uc
            .execute(&paths(&["a.png", "b.png"]), Path::new("out"))
            .unwrap_err();
        assert!(err.downcast_ref::<NoFacesFoundError>().is_some());
    }

    #[test]
    fn test_persistence_failure_is_fatal() {
        let writer = StubResultWriter {
            fail: true,
            ..StubResultWriter::default()
        };
        let mut uc = use_case(1, writer);

        let err = uc.execute(&paths(&["a.png"]), Path::new("out")).unwrap_err();
        assert!(err.downcast_ref::<PersistenceError>().is_some());
    }

    #[test]
    fn test_discovery_order_preserved_across_sources() {
        let mut uc = use_case(2, StubResultWriter::default());

        let analysis = uc
            .execute(&paths(&["a.png", "b.png"]), Path::new("out"))
            .unwrap();

        let order: Vec<(&str, usize)> = analysis
            .result
            .records
            .iter()
            .map(|r| (r.source.to_str().unwrap(), r.face_index))
            .collect();
        assert_eq!(
            order,
            vec![("a.png", 0), ("a.png", 1), ("b.png", 0), ("b.png", 1)]
        );
    }

    #[test]
    fn test_single_face_scores_one_against_average() {
        let mut uc = use_case(1, StubResultWriter::default());

        let analysis = uc.execute(&paths(&["a.png"]), Path::new("out")).unwrap();

        assert_eq!(analysis.result.face_count(), 1);
        assert!((analysis.result.records[0].similarity - 1.0).abs() < 1e-12);
        // A single-face batch averages to the face itself.
        assert_eq!(analysis.average_face, analysis.result.records[0].face);
    }
}
