use std::io::{self, Write};
use std::time::Duration;

use crate::shared::face_location::FaceLocation;

/// Placeholder printed for an iteration that succeeded.
pub const NO_ERROR: &str = "<nil>";

/// Observer for benchmark progress.
///
/// Decouples the harness from where its observational output goes, so the
/// CLI can print to stdout while tests capture or discard it.
pub trait BenchmarkReporter {
    /// One `detect` call finished. `count` is 0 when `error` is set.
    fn iteration(&mut self, index: usize, count: usize, error: Option<&str>) -> io::Result<()>;

    /// A location returned by the first iteration.
    fn location(&mut self, location: &FaceLocation) -> io::Result<()>;

    /// All iterations finished after `elapsed` wall-clock time.
    fn finished(&mut self, elapsed: Duration) -> io::Result<()>;
}

/// Discards all events.
pub struct NullBenchmarkReporter;

impl BenchmarkReporter for NullBenchmarkReporter {
    fn iteration(&mut self, _index: usize, _count: usize, _error: Option<&str>) -> io::Result<()> {
        Ok(())
    }

    fn location(&mut self, _location: &FaceLocation) -> io::Result<()> {
        Ok(())
    }

    fn finished(&mut self, _elapsed: Duration) -> io::Result<()> {
        Ok(())
    }
}

/// Plain-text reporter, one line per event:
///
/// ```text
/// 0 2 <nil>
/// 362 266 448 179
/// 50 120 110 60
/// 1 2 <nil>
/// ...
/// 1834512093
/// ```
///
/// The last line is the total elapsed time in nanoseconds.
pub struct WriterBenchmarkReporter<W: Write> {
    out: W,
}

impl<W: Write> WriterBenchmarkReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl WriterBenchmarkReporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> BenchmarkReporter for WriterBenchmarkReporter<W> {
    fn iteration(&mut self, index: usize, count: usize, error: Option<&str>) -> io::Result<()> {
        writeln!(self.out, "{index} {count} {}", error.unwrap_or(NO_ERROR))
    }

    fn location(&mut self, location: &FaceLocation) -> io::Result<()> {
        writeln!(self.out, "{location}")
    }

    fn finished(&mut self, elapsed: Duration) -> io::Result<()> {
        writeln!(self.out, "{}", elapsed.as_nanos())?;
        self.out.flush()
    }
}
