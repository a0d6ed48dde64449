use std::path::PathBuf;
use std::process;

use clap::Parser;

use facebench_core::benchmark::benchmark_reporter::WriterBenchmarkReporter;
use facebench_core::benchmark::run_benchmark_use_case::BenchmarkUseCase;
use facebench_core::detection::domain::detection_model::DetectionModel;
use facebench_core::detection::infrastructure::detector_factory::{
    create_detector, BackendKind, DetectorConfig,
};
use facebench_core::shared::constants::{
    DEFAULT_IMAGE_PATH, DEFAULT_ITERATIONS, DEFAULT_MODEL_DIR, FACE_DETECTION_PROGRAM,
    PYTHON_MODULE,
};

/// Benchmark face detection through an embedded interpreter, a subprocess,
/// or a native library.
#[derive(Parser)]
#[command(name = "facebench")]
struct Cli {
    /// Backend: python, cmd, or native.
    #[arg(long, default_value = "native")]
    backend: String,

    /// Image to run detection on.
    #[arg(long, default_value = DEFAULT_IMAGE_PATH)]
    image: PathBuf,

    /// Number of detect calls.
    #[arg(long, default_value_t = DEFAULT_ITERATIONS)]
    iterations: usize,

    /// Detection model: hog or cnn (cnn is not available for native).
    #[arg(long, default_value = "hog")]
    model: String,

    /// Detector executable for the cmd backend.
    #[arg(long, default_value = FACE_DETECTION_PROGRAM)]
    program: PathBuf,

    /// Argument passed to the detector executable before the image path
    /// (repeatable).
    #[arg(long = "program-arg")]
    program_args: Vec<String>,

    /// Python module for the python backend.
    #[arg(long, default_value = PYTHON_MODULE)]
    python_module: String,

    /// Directory holding the native model bundle.
    #[arg(long, default_value = DEFAULT_MODEL_DIR)]
    model_dir: PathBuf,

    /// Download the native model into the user cache if it is missing.
    #[arg(long)]
    download: bool,
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
    let (kind, model) = validate(&cli)?;

    let config = DetectorConfig {
        model,
        program: cli.program,
        program_args: cli.program_args,
        python_module: cli.python_module,
        model_dir: cli.model_dir,
        allow_download: cli.download,
        download_progress: Some(Box::new(download_progress)),
    };
    let detector = create_detector(kind, config)?;

    let mut reporter = WriterBenchmarkReporter::stdout();
    let mut use_case = BenchmarkUseCase::new(detector, &cli.image, cli.iterations);
    let report = use_case.execute(&mut reporter)?;
    if report.failures() == report.outcomes.len() {
        log::warn!("Every {} call failed; timings reflect error paths only", report.backend);
    }
    Ok(())
}

fn validate(cli: &Cli) -> Result<(BackendKind, DetectionModel), Box<dyn std::error::Error>> {
    let kind: BackendKind = cli.backend.parse()?;
    let model: DetectionModel = cli.model.parse()?;
    if cli.iterations == 0 {
        return Err("Iterations must be at least 1".into());
    }
    Ok((kind, model))
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading face detection model... {pct}%");
    } else {
        eprint!("\rDownloading face detection model... {downloaded} bytes");
    }
    if total > 0 && downloaded >= total {
        eprintln!();
    }
}
