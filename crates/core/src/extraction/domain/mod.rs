pub mod face_extractor;
pub mod image_reader;

/// Boundary error type. `Send + Sync` so per-source failures can cross
/// worker threads intact.
pub type ExtractionError = Box<dyn std::error::Error + Send + Sync>;
