use std::ffi::OsString;
use std::num::ParseIntError;
use std::path::Path;
use std::process::{Command, ExitStatus};

use thiserror::Error;

use crate::detection::domain::detection_model::DetectionModel;
use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::constants::FACE_DETECTION_PROGRAM;
use crate::shared::face_location::FaceLocation;

/// Minimum comma-separated fields for a line to count as a detection:
/// `path,top,right,bottom,left`.
const MIN_FIELDS: usize = 5;

const FIELD_NAMES: [&str; 4] = ["top", "right", "bottom", "left"];

#[derive(Error, Debug)]
pub enum CommandDetectorError {
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} exited with {status}: {stderr}")]
    Exit {
        program: String,
        status: ExitStatus,
        stderr: String,
    },
    #[error("invalid {field} value '{value}' on output line {line}: {source}")]
    Parse {
        line: usize,
        field: &'static str,
        value: String,
        #[source]
        source: ParseIntError,
    },
}

/// Runs an external detector executable once per call and parses its
/// line-oriented output.
///
/// The program is invoked as `<program> [args..] [--model cnn] <image>`
/// and is expected to print one `path,top,right,bottom,left` line per face.
pub struct CommandFaceDetector {
    program: OsString,
    args: Vec<OsString>,
    model: DetectionModel,
}

impl CommandFaceDetector {
    pub fn new() -> Self {
        Self::with_program(FACE_DETECTION_PROGRAM)
    }

    pub fn with_program(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            model: DetectionModel::Hog,
        }
    }

    /// Arguments placed before the model flag and image path.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_model(mut self, model: DetectionModel) -> Self {
        self.model = model;
        self
    }

    fn program_name(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }

    fn run(&self, image_path: &Path) -> Result<String, CommandDetectorError> {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        if self.model == DetectionModel::Cnn {
            command.args(["--model", DetectionModel::Cnn.as_str()]);
        }
        command.arg(image_path);

        let output = command.output().map_err(|e| CommandDetectorError::Spawn {
            program: self.program_name(),
            source: e,
        })?;
        if !output.status.success() {
            return Err(CommandDetectorError::Exit {
                program: self.program_name(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for CommandFaceDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl FaceDetector for CommandFaceDetector {
    fn name(&self) -> &'static str {
        "cmd"
    }

    fn detect(&mut self, image_path: &Path) -> Result<Vec<FaceLocation>, Box<dyn std::error::Error>> {
        let stdout = self.run(image_path)?;
        let locations = parse_detector_output(&stdout)?;
        log::debug!(
            "{} reported {} face(s) for {}",
            self.program_name(),
            locations.len(),
            image_path.display()
        );
        Ok(locations)
    }
}

/// Parses detector output into locations, in line order.
///
/// Lines with fewer than five fields are skipped. A coordinate that fails
/// to parse aborts the whole parse; no partial result is returned.
pub fn parse_detector_output(output: &str) -> Result<Vec<FaceLocation>, CommandDetectorError> {
    let mut locations = Vec::new();
    for (index, line) in output.lines().enumerate() {
        let parts: Vec<&str> = line.split(',').collect();
        if parts.len() < MIN_FIELDS {
            continue;
        }

        let mut coords = [0i32; 4];
        for (i, (coord, field)) in coords.iter_mut().zip(FIELD_NAMES).enumerate() {
            let raw = parts[i + 1].trim();
            *coord = raw.parse().map_err(|e| CommandDetectorError::Parse {
                line: index + 1,
                field,
                value: raw.to_string(),
                source: e,
            })?;
        }
        let [top, right, bottom, left] = coords;
        locations.push(FaceLocation::new(top, right, bottom, left));
    }
    Ok(locations)
}
