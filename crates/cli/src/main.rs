use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use faceaverage_core::analysis::domain::descriptor::DescriptorConfig;
use faceaverage_core::extraction::domain::face_extractor::FaceExtractor;
use faceaverage_core::extraction::domain::image_reader::ImageReader;
use faceaverage_core::extraction::infrastructure::center_crop_extractor::CenterCropExtractor;
use faceaverage_core::extraction::infrastructure::image_file_reader::ImageFileReader;
use faceaverage_core::output::domain::image_writer::ImageWriter;
use faceaverage_core::output::domain::result_writer::ResultWriter;
use faceaverage_core::output::infrastructure::directory_result_writer::DirectoryResultWriter;
use faceaverage_core::output::infrastructure::image_file_writer::ImageFileWriter;
use faceaverage_core::pipeline::analyze_batch_use_case::{AnalyzeBatchUseCase, BatchAnalysis};
use faceaverage_core::pipeline::infrastructure::threaded_source_executor::ThreadedSourceExecutor;
use faceaverage_core::pipeline::source_executor::SourceExecutor;
use faceaverage_core::shared::constants::{DEFAULT_TARGET_SIZE, IMAGE_EXTENSIONS};

/// Computes an average face from a directory of images and ranks each
/// face by similarity to it.
#[derive(Parser)]
#[command(name = "faceaverage")]
struct Cli {
    /// Directory containing the input images.
    input_dir: PathBuf,

    /// Directory to write the average face, scored faces and reports to.
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,

    /// Side length of the square face crops in pixels.
    #[arg(long, default_value_t = DEFAULT_TARGET_SIZE)]
    target_size: u32,

    /// Texture sampling radius in pixels.
    #[arg(long, default_value = "1")]
    texture_radius: u32,

    /// Texture sampling points per pixel (max 16).
    #[arg(long, default_value = "8")]
    texture_points: u32,

    /// Number of gradient orientation bins.
    #[arg(long, default_value = "9")]
    gradient_bins: usize,

    /// Worker threads (defaults to the number of CPU cores).
    #[arg(long)]
    workers: Option<usize>,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let sources = collect_sources(&cli.input_dir)?;
    if sources.is_empty() {
        return Err(format!("No images found in {}", cli.input_dir.display()).into());
    }
    log::info!("found {} images in {}", sources.len(), cli.input_dir.display());

    let reader: Box<dyn ImageReader> = Box::new(ImageFileReader::new());
    let extractor: Box<dyn FaceExtractor> = Box::new(CenterCropExtractor::new(cli.target_size));
    let executor: Box<dyn SourceExecutor> = match cli.workers {
        Some(workers) => Box::new(ThreadedSourceExecutor::new(workers)),
        None => Box::new(ThreadedSourceExecutor::default()),
    };
    let image_writer: Box<dyn ImageWriter> = Box::new(ImageFileWriter::new());
    let result_writer: Box<dyn ResultWriter> = Box::new(DirectoryResultWriter::new(image_writer));

    let config = DescriptorConfig {
        texture_radius: cli.texture_radius,
        texture_points: cli.texture_points,
        gradient_bins: cli.gradient_bins,
    };

    let progress: Box<dyn Fn(usize, usize) -> bool + Send> = Box::new(|current, total| {
        eprint!("\rProcessing image {current}/{total}");
        true
    });

    let mut use_case = AnalyzeBatchUseCase::new(
        reader,
        extractor,
        executor,
        result_writer,
        config,
        Some(progress),
    );
    let analysis = use_case.execute(&sources, &cli.output_dir)?;
    eprintln!();

    print_summary(&analysis, &cli.output_dir);
    Ok(())
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.input_dir.is_dir() {
        return Err(format!("Input directory not found: {}", cli.input_dir.display()).into());
    }
    if cli.target_size == 0 {
        return Err("Target size must be positive".into());
    }
    if cli.texture_radius == 0 {
        return Err("Texture radius must be positive".into());
    }
    if cli.texture_points == 0 || cli.texture_points > 16 {
        return Err(format!(
            "Texture points must be between 1 and 16, got {}",
            cli.texture_points
        )
        .into());
    }
    if cli.gradient_bins == 0 {
        return Err("Gradient bins must be positive".into());
    }
    if let Some(workers) = cli.workers {
        if workers == 0 {
            return Err("Workers must be positive".into());
        }
    }
    Ok(())
}

/// Lists image files in the directory, sorted by file name for a
/// deterministic processing order.
fn collect_sources(dir: &Path) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let mut sources: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_image(path))
        .collect();
    sources.sort();
    Ok(sources)
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn print_summary(analysis: &BatchAnalysis, output_dir: &Path) {
    let result = &analysis.result;
    let stats = &result.stats;

    println!("Analyzed {} faces", result.face_count());
    if !result.skipped.is_empty() {
        println!("Skipped {} sources (see detailed report)", result.skipped.len());
    }
    println!("Mean similarity: {:.4}", stats.mean);
    println!("Standard deviation: {:.4}", stats.std_dev);

    let mut ranked = result.ranked();
    if let Some(best) = ranked.next() {
        println!(
            "Most similar: {} (face {}) - {:.4}",
            best.source.display(),
            best.face_index,
            best.similarity
        );
    }
    if let Some(worst) = ranked.last() {
        println!(
            "Least similar: {} (face {}) - {:.4}",
            worst.source.display(),
            worst.face_index,
            worst.similarity
        );
    }
    println!("Results written to {}", output_dir.display());
}
