//! Core age/gender inference primitives.
//!
//! This crate loads a YOLOv8 ONNX export, runs inference with `tract-onnx`,
//! decodes the ranked detections, and turns the top class label into the
//! age bracket, gender, and confidence shown to the user.

/// Single-image classification pipeline.
pub mod classify;
/// High-level detection runner.
pub mod detector;
/// Class label interpretation.
pub mod interpret;
/// Class-name tables.
pub mod labels;
/// ONNX model loading and execution.
pub mod model;
/// Detection post-processing (decoding, score filtering, NMS).
pub mod postprocess;
/// Image pre-processing (letterbox, tensor conversion).
pub mod preprocess;

pub use classify::{Classification, ClassifyError, classify_image};
pub use detector::{AgeGenderDetector, FaceClassifier};
pub use interpret::{InterpretError, LabelShape, NormalizedResult, interpret, interpret_with};
pub use labels::ClassNames;
pub use model::YoloModel;
pub use postprocess::{BoundingBox, Detection, PostprocessConfig, apply_postprocess};
pub use preprocess::{
    InputSize, PreprocessConfig, PreprocessOutput, preprocess_dynamic_image, preprocess_image,
};
