//! Face detector that calls into an embedded Python interpreter.
//!
//! The interpreter is process-global: it is initialised once, on the first
//! construction, and never finalised. Only one `PythonFaceDetector` per
//! process is supported.
use std::path::Path;
use std::sync::Once;

use pyo3::prelude::*;
use thiserror::Error;

use crate::detection::domain::detection_model::DetectionModel;
use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::constants::{PYTHON_FACE_LOCATIONS_FN, PYTHON_LOAD_IMAGE_FN, PYTHON_MODULE};
use crate::shared::face_location::FaceLocation;

/// Upsample count passed alongside an explicit model name.
const UPSAMPLE_TIMES: u32 = 1;

static INTERPRETER: Once = Once::new();

#[derive(Error, Debug)]
pub enum PythonDetectorError {
    #[error("failed to import Python module {module}: {source}")]
    Import {
        module: String,
        #[source]
        source: PyErr,
    },
    #[error("module {module} has no attribute {function}: {source}")]
    MissingFunction {
        module: String,
        function: &'static str,
        #[source]
        source: PyErr,
    },
    #[error("{function} raised: {source}")]
    Call {
        function: &'static str,
        #[source]
        source: PyErr,
    },
    #[error("{function} returned something other than (top, right, bottom, left) tuples: {source}")]
    Conversion {
        function: &'static str,
        #[source]
        source: PyErr,
    },
}

fn ensure_interpreter() {
    INTERPRETER.call_once(pyo3::prepare_freethreaded_python);
}

/// Resolved `load_image_file` / `face_locations` handles from a
/// `face_recognition`-compatible module.
pub struct PythonFaceDetector {
    load_image_file: Py<PyAny>,
    face_locations: Py<PyAny>,
    model: DetectionModel,
}

impl PythonFaceDetector {
    pub fn new(model: DetectionModel) -> Result<Self, PythonDetectorError> {
        Self::with_module(PYTHON_MODULE, model)
    }

    pub fn with_module(module: &str, model: DetectionModel) -> Result<Self, PythonDetectorError> {
        ensure_interpreter();
        Python::with_gil(|py| {
            let imported = py.import(module).map_err(|e| PythonDetectorError::Import {
                module: module.to_string(),
                source: e,
            })?;
            let resolve = |function: &'static str| {
                imported
                    .getattr(function)
                    .map(Bound::unbind)
                    .map_err(|e| PythonDetectorError::MissingFunction {
                        module: module.to_string(),
                        function,
                        source: e,
                    })
            };
            let load_image_file = resolve(PYTHON_LOAD_IMAGE_FN)?;
            let face_locations = resolve(PYTHON_FACE_LOCATIONS_FN)?;
            log::info!("Resolved {module}.{PYTHON_LOAD_IMAGE_FN} and {module}.{PYTHON_FACE_LOCATIONS_FN}");
            Ok(Self {
                load_image_file,
                face_locations,
                model,
            })
        })
    }

    /// Every intermediate object is a `Bound` owned by this frame, so its
    /// reference is released on return, including early `?` exits.
    fn locate(&self, py: Python<'_>, image_path: &Path) -> Result<Vec<FaceLocation>, PythonDetectorError> {
        let image = self
            .load_image_file
            .bind(py)
            .call1((image_path,))
            .map_err(|e| PythonDetectorError::Call {
                function: PYTHON_LOAD_IMAGE_FN,
                source: e,
            })?;

        let face_locations = self.face_locations.bind(py);
        let locations = match self.model {
            DetectionModel::Hog => face_locations.call1((&image,)),
            DetectionModel::Cnn => {
                face_locations.call1((&image, UPSAMPLE_TIMES, DetectionModel::Cnn.as_str()))
            }
        }
        .map_err(|e| PythonDetectorError::Call {
            function: PYTHON_FACE_LOCATIONS_FN,
            source: e,
        })?;

        let tuples: Vec<(i32, i32, i32, i32)> =
            locations
                .extract()
                .map_err(|e| PythonDetectorError::Conversion {
                    function: PYTHON_FACE_LOCATIONS_FN,
                    source: e,
                })?;

        Ok(tuples
            .into_iter()
            .map(|(top, right, bottom, left)| FaceLocation::new(top, right, bottom, left))
            .collect())
    }
}

impl FaceDetector for PythonFaceDetector {
    fn name(&self) -> &'static str {
        "python"
    }

    fn detect(&mut self, image_path: &Path) -> Result<Vec<FaceLocation>, Box<dyn std::error::Error>> {
        let locations = Python::with_gil(|py| self.locate(py, image_path))?;
        log::debug!("python reported {} face(s) for {}", locations.len(), image_path.display());
        Ok(locations)
    }
}
