use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::output::domain::image_writer::ImageWriter;
use crate::output::domain::result_writer::{PersistenceError, ResultWriter};
use crate::pipeline::batch_result::BatchResult;
use crate::shared::face_image::FaceImage;

pub const AVERAGE_FACE_FILENAME: &str = "average_face.png";
pub const STATS_FILENAME: &str = "similarity_stats.txt";
pub const DETAILS_FILENAME: &str = "detailed_results.txt";

/// Name of the artifact written for the face at `index` in discovery order.
pub fn face_filename(index: usize, similarity: f64) -> String {
    format!("face_{index:03}_similarity_{similarity:.3}.png")
}

/// Persists a batch analysis as files in a directory: the average face,
/// every scored face, a statistics summary, and a detailed report.
pub struct DirectoryResultWriter {
    image_writer: Box<dyn ImageWriter>,
}

impl DirectoryResultWriter {
    pub fn new(image_writer: Box<dyn ImageWriter>) -> Self {
        Self { image_writer }
    }

    fn write_image(&self, path: &Path, image: &FaceImage) -> Result<(), PersistenceError> {
        self.image_writer
            .write(path, image)
            .map_err(|cause| PersistenceError {
                path: path.to_path_buf(),
                cause: cause.to_string().into(),
            })
    }

    fn write_text(&self, path: &Path, contents: &str) -> Result<(), PersistenceError> {
        std::fs::write(path, contents).map_err(|cause| PersistenceError {
            path: path.to_path_buf(),
            cause: Box::new(cause),
        })
    }
}

impl ResultWriter for DirectoryResultWriter {
    fn write(
        &self,
        output_dir: &Path,
        average: &FaceImage,
        result: &BatchResult,
    ) -> Result<(), PersistenceError> {
        std::fs::create_dir_all(output_dir).map_err(|cause| PersistenceError {
            path: output_dir.to_path_buf(),
            cause: Box::new(cause),
        })?;

        self.write_image(&output_dir.join(AVERAGE_FACE_FILENAME), average)?;

        for (index, record) in result.records.iter().enumerate() {
            let path = output_dir.join(face_filename(index, record.similarity));
            self.write_image(&path, &record.face)?;
        }

        self.write_text(&output_dir.join(STATS_FILENAME), &stats_report(result))?;
        self.write_text(&output_dir.join(DETAILS_FILENAME), &detailed_report(result))?;

        log::info!(
            "wrote {} faces and reports to {}",
            result.face_count(),
            output_dir.display()
        );
        Ok(())
    }
}

fn stats_report(result: &BatchResult) -> String {
    let mut report = String::new();
    let stats = &result.stats;
    report.push_str("Similarity statistics\n");
    report.push_str(&"=".repeat(20));
    report.push('\n');
    let _ = writeln!(report, "Mean similarity: {:.4}", stats.mean);
    let _ = writeln!(report, "Max similarity: {:.4}", stats.max);
    let _ = writeln!(report, "Min similarity: {:.4}", stats.min);
    let _ = writeln!(report, "Standard deviation: {:.4}", stats.std_dev);
    report.push_str("\nIndividual similarities:\n");
    for (index, record) in result.records.iter().enumerate() {
        let _ = writeln!(report, "Face {index:03}: {:.4}", record.similarity);
    }
    report
}

fn detailed_report(result: &BatchResult) -> String {
    let mut report = String::new();
    report.push_str("Detailed results\n");
    report.push_str(&"=".repeat(50));
    report.push_str("\n\n");

    report.push_str("Per-face information:\n");
    report.push_str(&"-".repeat(30));
    report.push('\n');
    for (index, record) in result.records.iter().enumerate() {
        let _ = writeln!(report, "Face {index:03}:");
        let _ = writeln!(report, "  Source: {}", record.source.display());
        let _ = writeln!(report, "  Face index: {}", record.face_index);
        let _ = writeln!(report, "  Similarity: {:.4}", record.similarity);
        let _ = writeln!(report, "  Saved as: {}", face_filename(index, record.similarity));
        report.push('\n');
    }

    report.push_str("\nSimilarity ranking:\n");
    report.push_str(&"-".repeat(30));
    report.push('\n');
    for (rank, record) in result.ranked().enumerate() {
        let _ = writeln!(
            report,
            "{:2}. {} (face {}) - similarity: {:.4}",
            rank + 1,
            record.source.display(),
            record.face_index,
            record.similarity
        );
    }

    if !result.skipped.is_empty() {
        report.push_str("\nSkipped sources:\n");
        report.push_str(&"-".repeat(30));
        report.push('\n');
        for err in &result.skipped {
            let _ = writeln!(report, "{}: {}", err.source.display(), err.cause);
        }
    }

    report
}
