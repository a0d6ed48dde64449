use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::detection::domain::detection_model::DetectionModel;
use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::constants::{
    DEFAULT_MODEL_DIR, FACE_DETECTION_PROGRAM, PYTHON_MODULE, SEETA_MODEL_NAME, SEETA_MODEL_URL,
};

use super::command_face_detector::CommandFaceDetector;
use super::model_resolver::{self, ProgressFn};
use super::native_face_detector::{NativeDetectorError, NativeFaceDetector, Recognizer};

/// Which backend answers `detect`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackendKind {
    /// Embedded interpreter calling `face_recognition`.
    Python,
    /// External `face_detection` executable.
    Command,
    /// Statically linked SeetaFace engine.
    Native,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Python => "python",
            BackendKind::Command => "cmd",
            BackendKind::Native => "native",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "python" | "py" => Ok(BackendKind::Python),
            "cmd" | "command" => Ok(BackendKind::Command),
            "native" => Ok(BackendKind::Native),
            other => Err(format!(
                "Backend must be one of: python, cmd, native, got '{other}'"
            )),
        }
    }
}

/// Settings shared by all backends; each backend reads only its own.
pub struct DetectorConfig {
    pub model: DetectionModel,
    pub program: PathBuf,
    /// Extra arguments placed before the image path, e.g. a script name.
    pub program_args: Vec<String>,
    pub python_module: String,
    pub model_dir: PathBuf,
    /// Fetch the native model into the user cache when it is not found locally.
    pub allow_download: bool,
    pub download_progress: Option<ProgressFn>,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            model: DetectionModel::Hog,
            program: PathBuf::from(FACE_DETECTION_PROGRAM),
            program_args: Vec::new(),
            python_module: PYTHON_MODULE.to_string(),
            model_dir: PathBuf::from(DEFAULT_MODEL_DIR),
            allow_download: false,
            download_progress: None,
        }
    }
}

/// Builds the requested backend once; the returned detector is reused for
/// every benchmark iteration.
pub fn create_detector(
    kind: BackendKind,
    config: DetectorConfig,
) -> Result<Box<dyn FaceDetector>, Box<dyn std::error::Error>> {
    log::info!("Creating {kind} backend (model={})", config.model);
    match kind {
        BackendKind::Python => create_python_detector(&config),
        BackendKind::Command => Ok(Box::new(
            CommandFaceDetector::with_program(&config.program)
                .with_args(&config.program_args)
                .with_model(config.model),
        )),
        BackendKind::Native => create_native_detector(config),
    }
}

#[cfg(feature = "embedded-python")]
fn create_python_detector(
    config: &DetectorConfig,
) -> Result<Box<dyn FaceDetector>, Box<dyn std::error::Error>> {
    use super::python_face_detector::PythonFaceDetector;

    Ok(Box::new(PythonFaceDetector::with_module(
        &config.python_module,
        config.model,
    )?))
}

#[cfg(not(feature = "embedded-python"))]
fn create_python_detector(
    _config: &DetectorConfig,
) -> Result<Box<dyn FaceDetector>, Box<dyn std::error::Error>> {
    Err("the python backend requires building with the `embedded-python` feature".into())
}

fn create_native_detector(
    config: DetectorConfig,
) -> Result<Box<dyn FaceDetector>, Box<dyn std::error::Error>> {
    if config.model != DetectionModel::Hog {
        return Err(NativeDetectorError::UnsupportedModel(config.model).into());
    }
    let url = config.allow_download.then_some(SEETA_MODEL_URL);
    let model_path = model_resolver::resolve(
        SEETA_MODEL_NAME,
        &config.model_dir,
        url,
        config.download_progress,
    )?;
    let recognizer = Recognizer::from_model_file(&model_path)?;
    Ok(Box::new(NativeFaceDetector::with_recognizer(recognizer)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    #[rstest]
    #[case("python", BackendKind::Python)]
    #[case("cmd", BackendKind::Command)]
    #[case("command", BackendKind::Command)]
    #[case("Native", BackendKind::Native)]
    fn test_parse_backend_kind(#[case] input: &str, #[case] expected: BackendKind) {
        assert_eq!(input.parse::<BackendKind>().unwrap(), expected);
    }

    #[test]
    fn test_parse_unknown_backend_errors() {
        let err = "grpc".parse::<BackendKind>().unwrap_err();

        assert!(err.contains("grpc"));
    }

    #[test]
    fn test_backend_kind_display_round_trips() {
        for kind in [BackendKind::Python, BackendKind::Command, BackendKind::Native] {
            assert_eq!(kind.to_string().parse::<BackendKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_create_command_detector() {
        let detector = create_detector(BackendKind::Command, DetectorConfig::default()).unwrap();

        assert_eq!(detector.name(), "cmd");
    }

    #[test]
    fn test_create_native_without_model_errors() {
        let tmp = TempDir::new().unwrap();
        let config = DetectorConfig {
            model_dir: tmp.path().join("models"),
            ..DetectorConfig::default()
        };

        let cached = model_resolver::model_cache_dir()
            .map(|dir| dir.join(SEETA_MODEL_NAME).is_file())
            .unwrap_or(false);

        let result = create_detector(BackendKind::Native, config);

        // A model already in the user cache is a valid fallback.
        if !cached {
            let err = result.err().unwrap();
            let err = err.downcast::<model_resolver::ModelResolveError>().unwrap();
            assert!(matches!(
                *err,
                model_resolver::ModelResolveError::NotFound { .. }
            ));
        }
    }

    #[test]
    fn test_create_native_rejects_cnn() {
        let config = DetectorConfig {
            model: DetectionModel::Cnn,
            ..DetectorConfig::default()
        };

        let err = create_detector(BackendKind::Native, config).err().unwrap();

        assert!(err.downcast_ref::<NativeDetectorError>().is_some());
    }

    #[cfg(not(feature = "embedded-python"))]
    #[test]
    fn test_create_python_without_feature_errors() {
        let err = create_detector(BackendKind::Python, DetectorConfig::default())
            .err()
            .unwrap();

        assert!(err.to_string().contains("embedded-python"));
    }
}
