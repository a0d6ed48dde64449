use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::benchmark::benchmark_reporter::BenchmarkReporter;
use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::face_location::FaceLocation;

/// Result of a single `detect` call.
#[derive(Clone, Debug, PartialEq)]
pub enum IterationOutcome {
    Detected(usize),
    Failed(String),
}

#[derive(Clone, Debug)]
pub struct BenchmarkReport {
    pub backend: &'static str,
    pub outcomes: Vec<IterationOutcome>,
    /// Locations returned by iteration 0, empty if it failed.
    pub first_locations: Vec<FaceLocation>,
    pub elapsed: Duration,
}

impl BenchmarkReport {
    pub fn successes(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, IterationOutcome::Detected(_)))
            .count()
    }

    pub fn failures(&self) -> usize {
        self.outcomes.len() - self.successes()
    }

    pub fn mean_per_iteration(&self) -> Duration {
        match u32::try_from(self.outcomes.len()) {
            Ok(0) | Err(_) => Duration::ZERO,
            Ok(n) => self.elapsed / n,
        }
    }
}

/// Repeatedly runs one detector over one image and times the whole loop.
///
/// Calls are sequential; a failed call is reported and the loop moves on.
/// There is no pass/fail verdict, only observational output.
pub struct BenchmarkUseCase {
    detector: Box<dyn FaceDetector>,
    image_path: PathBuf,
    iterations: usize,
}

impl BenchmarkUseCase {
    pub fn new(detector: Box<dyn FaceDetector>, image_path: &Path, iterations: usize) -> Self {
        Self {
            detector,
            image_path: image_path.to_path_buf(),
            iterations,
        }
    }

    pub fn execute(
        &mut self,
        reporter: &mut dyn BenchmarkReporter,
    ) -> Result<BenchmarkReport, Box<dyn std::error::Error>> {
        let backend = self.detector.name();
        log::info!(
            "Benchmarking {backend} backend: {} iteration(s) over {}",
            self.iterations,
            self.image_path.display()
        );

        let mut outcomes = Vec::with_capacity(self.iterations);
        let mut first_locations = Vec::new();
        let start = Instant::now();

        for i in 0..self.iterations {
            match self.detector.detect(&self.image_path) {
                Ok(locations) => {
                    reporter.iteration(i, locations.len(), None)?;
                    if i == 0 {
                        for location in &locations {
                            reporter.location(location)?;
                        }
                        first_locations = locations.clone();
                    }
                    outcomes.push(IterationOutcome::Detected(locations.len()));
                }
                Err(e) => {
                    let message = e.to_string();
                    log::warn!("{backend} iteration {i} failed: {message}");
                    reporter.iteration(i, 0, Some(&message))?;
                    outcomes.push(IterationOutcome::Failed(message));
                }
            }
        }

        let elapsed = start.elapsed();
        reporter.finished(elapsed)?;

        let report = BenchmarkReport {
            backend,
            outcomes,
            first_locations,
            elapsed,
        };
        log::info!(
            "{backend}: {} ok, {} failed, mean {:?} per call",
            report.successes(),
            report.failures(),
            report.mean_per_iteration()
        );
        Ok(report)
    }
}
