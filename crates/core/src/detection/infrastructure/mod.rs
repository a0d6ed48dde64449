pub mod command_face_detector;
pub mod detector_factory;
pub mod model_resolver;
pub mod native_face_detector;
#[cfg(feature = "embedded-python")]
pub mod python_face_detector;
