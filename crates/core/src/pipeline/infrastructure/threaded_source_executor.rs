use std::path::PathBuf;

use crate::extraction::domain::face_extractor::FaceExtractor;
use crate::extraction::domain::image_reader::ImageReader;
use crate::pipeline::source_executor::{
    process_source, ProgressFn, SourceExecutor, SourceOutcome,
};

const DEFAULT_CHANNEL_CAPACITY: usize = 8;

/// Runs per-source extraction on a pool of worker threads.
///
/// Layout: `feeder → workers → collector (caller thread)`. Workers
/// share the stateless reader and extractor; completed outcomes are
/// reordered by source index before returning, so the output ordering
/// matches source discovery order regardless of scheduling.
///
/// `workers = 1` degenerates to sequential execution.
pub struct ThreadedSourceExecutor {
    workers: usize,
    channel_capacity: usize,
}

impl ThreadedSourceExecutor {
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl Default for ThreadedSourceExecutor {
    fn default() -> Self {
        let workers = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self::new(workers)
    }
}

impl SourceExecutor for ThreadedSourceExecutor {
    fn run(
        &self,
        sources: &[PathBuf],
        reader: &dyn ImageReader,
        extractor: &dyn FaceExtractor,
        on_progress: Option<&ProgressFn>,
    ) -> Result<Vec<SourceOutcome>, Box<dyn std::error::Error>> {
        if sources.is_empty() {
            return Ok(Vec::new());
        }

        let total = sources.len();
        let workers = self.workers.min(total);
        let cap = self.channel_capacity;

        let (job_tx, job_rx) = crossbeam_channel::bounded::<(usize, PathBuf)>(cap);
        let (done_tx, done_rx) = crossbeam_channel::bounded::<(usize, SourceOutcome)>(cap);

        let mut slots: Vec<Option<SourceOutcome>> = (0..total).map(|_| None).collect();
        let mut cancelled = false;

        std::thread::scope(|scope| {
            for _ in 0..workers {
                let job_rx = job_rx.clone();
                let done_tx = done_tx.clone();
                scope.spawn(move || {
                    for (index, path) in job_rx {
                        let outcome = process_source(reader, extractor, &path);
                        if done_tx.send((index, outcome)).is_err() {
                            break;
                        }
                    }
                });
            }
            drop(job_rx);
            drop(done_tx);

            scope.spawn(move || {
                for (index, path) in sources.iter().cloned().enumerate() {
                    if job_tx.send((index, path)).is_err() {
                        break;
                    }
                }
            });

            let mut completed = 0usize;
            for (index, outcome) in done_rx {
                slots[index] = Some(outcome);
                completed += 1;
                if let Some(callback) = on_progress {
                    if !callback(completed, total) {
                        cancelled = true;
                        break;
                    }
                }
            }
            // Dropping the receiver here unblocks any worker still
            // sending; workers then drain the job channel and exit.
        });

        if cancelled {
            return Err("Cancelled".into());
        }

        let outcomes = slots
            .into_iter()
            .map(|slot| slot.expect("every source index receives exactly one outcome"))
            .collect();
        Ok(outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use crate::extraction::domain::ExtractionError;
    use crate::shared::face_image::FaceImage;

    /// Reader whose "decoded image" encodes the source name so outcomes
    /// can be traced back to their source.
    struct TaggingReader {
        fail_on: Option<&'static str>,
    }

    impl ImageReader for TaggingReader {
        fn read(&self, path: &Path) -> Result<FaceImage, ExtractionError> {
            let name = path.file_name().unwrap().to_str().unwrap();
            if Some(name) == self.fail_on {
                return Err(format!("cannot decode {name}").into());
            }
            let tag = name.bytes().next().unwrap_or(0);
            Ok(FaceImage::new(vec![tag; 12], 2, 2))
        }
    }

    struct PassthroughExtractor;

    impl FaceExtractor for PassthroughExtractor {
        fn extract(&self, image: &FaceImage) -> Result<Vec<FaceImage>, ExtractionError> {
            Ok(vec![image.clone()])
        }
    }

    fn sources(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn test_empty_sources_return_empty() {
        let executor = ThreadedSourceExecutor::new(4);
        let outcomes = executor
            .run(&[], &TaggingReader { fail_on: None }, &PassthroughExtractor, None)
            .unwrap();
        assert!(outcomes.is_empty());
    }

    #[test]
    fn test_outcomes_follow_source_order() {
        let executor = ThreadedSourceExecutor::new(4);
        let srcs = sources(&["a.png", "b.png", "c.png", "d.png", "e.png"]);
        let outcomes = executor
            .run(&srcs, &TaggingReader { fail_on: None }, &PassthroughExtractor, None)
            .unwrap();

        assert_eq!(outcomes.len(), 5);
        for (src, outcome) in srcs.iter().zip(&outcomes) {
            let faces = outcome.as_ref().unwrap();
            let expected_tag = src.to_str().unwrap().bytes().next().unwrap();
            assert_eq!(faces[0].data()[0], expected_tag);
        }
    }

    #[test]
    fn test_failed_source_isolated_in_its_slot() {
        let executor = ThreadedSourceExecutor::new(2);
        let srcs = sources(&["a.png", "bad.png", "c.png"]);
        let outcomes = executor
            .run(
                &srcs,
                &TaggingReader {
                    fail_on: Some("bad.png"),
                },
                &PassthroughExtractor,
                None,
            )
            .unwrap();

        assert!(outcomes[0].is_ok());
        assert!(outcomes[2].is_ok());
        let err = outcomes[1].as_ref().unwrap_err();
        assert_eq!(err.source, PathBuf::from("bad.png"));
    }

    #[test]
    fn test_single_worker_sequential() {
        let executor = ThreadedSourceExecutor::new(1);
        let srcs = sources(&["a.png", "b.png"]);
        let outcomes = executor
            .run(&srcs, &TaggingReader { fail_on: None }, &PassthroughExtractor, None)
            .unwrap();
        assert_eq!(outcomes.len(), 2);
    }

    #[test]
    fn test_progress_reports_every_completion() {
        let executor = ThreadedSourceExecutor::new(3);
        let srcs = sources(&["a.png", "b.png", "c.png", "d.png"]);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        let progress: ProgressFn = Box::new(move |current, total| {
            seen_clone.lock().unwrap().push((current, total));
            true
        });

        executor
            .run(
                &srcs,
                &TaggingReader { fail_on: None },
                &PassthroughExtractor,
                Some(&progress),
            )
            .unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 4);
        assert_eq!(*seen.last().unwrap(), (4, 4));
    }

    #[test]
    fn test_cancel_via_progress() {
        let executor = ThreadedSourceExecutor::new(2);
        let srcs = sources(&["a.png", "b.png", "c.png", "d.png"]);
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();
        let progress: ProgressFn = Box::new(move |_, _| {
            // cancel on the second call
            calls_clone.fetch_add(1, Ordering::SeqCst) < 1
        });

        let result = executor.run(
            &srcs,
            &TaggingReader { fail_on: None },
            &PassthroughExtractor,
            Some(&progress),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_more_workers_than_sources() {
        let executor = ThreadedSourceExecutor::new(16);
        let srcs = sources(&["a.png"]);
        let outcomes = executor
            .run(&srcs, &TaggingReader { fail_on: None }, &PassthroughExtractor, None)
            .unwrap();
        assert_eq!(outcomes.len(), 1);
    }
}
