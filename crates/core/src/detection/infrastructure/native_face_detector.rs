//! Native face detector backed by the statically linked `rustface`
//! (SeetaFace) engine.
//!
//! The [`Recognizer`] owns the loaded model bundle; [`NativeFaceDetector`]
//! adapts its rectangles to the domain's `FaceLocation`.
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use image::GrayImage;
use thiserror::Error;

use crate::detection::domain::detection_model::DetectionModel;
use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::constants::{
    SEETA_MIN_FACE_SIZE, SEETA_MODEL_NAME, SEETA_PYRAMID_SCALE_FACTOR, SEETA_SCORE_THRESH,
    SEETA_WINDOW_STEP,
};
use crate::shared::face_location::FaceLocation;

#[derive(Error, Debug)]
pub enum NativeDetectorError {
    #[error("model not found at {0}")]
    ModelMissing(PathBuf),
    #[error("failed to load model {path}: {reason}")]
    Model { path: PathBuf, reason: String },
    #[error("failed to read image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("the native recognizer does not support the {0} model")]
    UnsupportedModel(DetectionModel),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

/// Axis-aligned rectangle; `max` is exclusive of the face's far edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rectangle {
    pub min: Point,
    pub max: Point,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Face {
    pub rectangle: Rectangle,
    pub score: f64,
}

/// Locates faces in an image file.
pub trait FaceRecognizer: Send {
    fn recognize_file(&self, path: &Path) -> Result<Vec<Face>, NativeDetectorError>;
}

/// Loaded SeetaFace model, able to locate faces in image files.
pub struct Recognizer {
    model: rustface::Model,
}

impl Recognizer {
    /// Loads `seeta_fd_frontal_v1.0.bin` from `model_dir`.
    pub fn new(model_dir: &Path) -> Result<Self, NativeDetectorError> {
        Self::from_model_file(&model_dir.join(SEETA_MODEL_NAME))
    }

    pub fn from_model_file(path: &Path) -> Result<Self, NativeDetectorError> {
        if !path.is_file() {
            return Err(NativeDetectorError::ModelMissing(path.to_path_buf()));
        }
        let file = File::open(path).map_err(|e| NativeDetectorError::Model {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let model = rustface::read_model(BufReader::new(file)).map_err(|e| {
            NativeDetectorError::Model {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        })?;
        log::info!("Loaded SeetaFace model from {}", path.display());
        Ok(Self { model })
    }
}

impl FaceRecognizer for Recognizer {
    fn recognize_file(&self, path: &Path) -> Result<Vec<Face>, NativeDetectorError> {
        let gray = load_gray(path)?;
        let (width, height) = gray.dimensions();

        let mut detector = rustface::create_detector_with_model(self.model.clone());
        detector.set_min_face_size(SEETA_MIN_FACE_SIZE);
        detector.set_score_thresh(SEETA_SCORE_THRESH);
        detector.set_pyramid_scale_factor(SEETA_PYRAMID_SCALE_FACTOR);
        detector.set_slide_window_step(SEETA_WINDOW_STEP, SEETA_WINDOW_STEP);

        let faces = detector.detect(&rustface::ImageData::new(gray.as_raw(), width, height));

        Ok(faces
            .iter()
            .map(|face| {
                let bbox = face.bbox();
                Face {
                    rectangle: Rectangle {
                        min: Point {
                            x: bbox.x(),
                            y: bbox.y(),
                        },
                        max: Point {
                            x: bbox.x() + bbox.width() as i32,
                            y: bbox.y() + bbox.height() as i32,
                        },
                    },
                    score: face.score(),
                }
            })
            .collect())
    }
}

fn load_gray(path: &Path) -> Result<GrayImage, NativeDetectorError> {
    image::open(path)
        .map(|img| img.to_luma8())
        .map_err(|e| NativeDetectorError::Image {
            path: path.to_path_buf(),
            source: e,
        })
}

/// Top and bottom come from the Y extent, left and right from the X extent.
pub fn face_location(rectangle: &Rectangle) -> FaceLocation {
    FaceLocation::from_corners(
        rectangle.min.x,
        rectangle.min.y,
        rectangle.max.x,
        rectangle.max.y,
    )
}

pub struct NativeFaceDetector {
    recognizer: Box<dyn FaceRecognizer>,
}

impl NativeFaceDetector {
    pub fn new(model_dir: &Path) -> Result<Self, NativeDetectorError> {
        Ok(Self::with_recognizer(Recognizer::new(model_dir)?))
    }

    pub fn with_recognizer(recognizer: impl FaceRecognizer + 'static) -> Self {
        Self {
            recognizer: Box::new(recognizer),
        }
    }
}

impl FaceDetector for NativeFaceDetector {
    fn name(&self) -> &'static str {
        "native"
    }

    fn detect(&mut self, image_path: &Path) -> Result<Vec<FaceLocation>, Box<dyn std::error::Error>> {
        let faces = self.recognizer.recognize_file(image_path)?;
        Ok(faces.iter().map(|f| face_location(&f.rectangle)).collect())
    }
}
