pub const DEFAULT_IMAGE_PATH: &str = "images/1.jpg";

/// Number of `detect` calls per benchmark run.
pub const DEFAULT_ITERATIONS: usize = 10;

pub const FACE_DETECTION_PROGRAM: &str = "face_detection";

pub const PYTHON_MODULE: &str = "face_recognition";
pub const PYTHON_LOAD_IMAGE_FN: &str = "load_image_file";
pub const PYTHON_FACE_LOCATIONS_FN: &str = "face_locations";

pub const DEFAULT_MODEL_DIR: &str = "models";
pub const SEETA_MODEL_NAME: &str = "seeta_fd_frontal_v1.0.bin";
pub const SEETA_MODEL_URL: &str =
    "https://github.com/atomashpolskiy/rustface/raw/master/model/seeta_fd_frontal_v1.0.bin";

/// Minimum face size (pixels) the native recognizer searches for.
pub const SEETA_MIN_FACE_SIZE: u32 = 20;
pub const SEETA_SCORE_THRESH: f64 = 2.0;
pub const SEETA_PYRAMID_SCALE_FACTOR: f32 = 0.8;
pub const SEETA_WINDOW_STEP: u32 = 4;
