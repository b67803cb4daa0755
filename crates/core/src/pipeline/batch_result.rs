use std::cmp::Ordering;
use std::path::PathBuf;

use crate::pipeline::source_executor::SourceProcessingError;
use crate::shared::face_image::FaceImage;

/// One collected face with its provenance and score.
#[derive(Clone, Debug)]
pub struct FaceRecord {
    /// Source image the face was extracted from.
    pub source: PathBuf,
    /// Position of the face within its source.
    pub face_index: usize,
    pub face: FaceImage,
    /// Rescaled cosine similarity to the average face, in [0, 1].
    pub similarity: f64,
}

/// Aggregate statistics over all similarity scores in a batch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimilarityStats {
    pub mean: f64,
    pub max: f64,
    pub min: f64,
    /// Population standard deviation.
    pub std_dev: f64,
}

/// Finalized outcome of one batch run.
///
/// Records keep the discovery order (source order, then intra-source
/// face index); `ranking` holds record indices sorted by descending
/// similarity, with ties in discovery order.
#[derive(Debug)]
pub struct BatchResult {
    pub records: Vec<FaceRecord>,
    /// Sources that failed and were skipped, in discovery order.
    pub skipped: Vec<SourceProcessingError>,
    pub stats: SimilarityStats,
    pub ranking: Vec<usize>,
}

impl BatchResult {
    pub fn new(records: Vec<FaceRecord>, skipped: Vec<SourceProcessingError>) -> Self {
        let scores: Vec<f64> = records.iter().map(|r| r.similarity).collect();
        let stats = SimilarityStats::from_scores(&scores);
        let ranking = descending_ranking(&scores);
        Self {
            records,
            skipped,
            stats,
            ranking,
        }
    }

    pub fn face_count(&self) -> usize {
        self.records.len()
    }

    /// Records in ranking order, best first.
    pub fn ranked(&self) -> impl Iterator<Item = &FaceRecord> {
        self.ranking.iter().map(|&i| &self.records[i])
    }
}

impl SimilarityStats {
    fn from_scores(scores: &[f64]) -> Self {
        if scores.is_empty() {
            return Self {
                mean: 0.0,
                max: 0.0,
                min: 0.0,
                std_dev: 0.0,
            };
        }
        let n = scores.len() as f64;
        let mean = scores.iter().sum::<f64>() / n;
        let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min = scores.iter().copied().fold(f64::INFINITY, f64::min);
        let variance = scores.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n;
        Self {
            mean,
            max,
            min,
            std_dev: variance.sqrt(),
        }
    }
}

/// Indices sorted by descending score. The sort is stable, so equal
/// scores keep their original relative order.
fn descending_ranking(scores: &[f64]) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..scores.len()).collect();
    indices.sort_by(|&a, &b| {
        scores[b]
            .partial_cmp(&scores[a])
            .unwrap_or(Ordering::Equal)
    });
    indices
}
