//! Single-image classification: predict, keep the top detection, interpret it.

use std::path::Path;

use agesight_utils::LabelVocabulary;
use log::info;
use thiserror::Error;

use crate::detector::FaceClassifier;
use crate::interpret::{InterpretError, NormalizedResult, interpret_with};
use crate::postprocess::Detection;

/// Why an image could not be classified.
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("No face detected")]
    NoDetection,
    #[error(transparent)]
    Unrecognized(#[from] InterpretError),
    #[error(transparent)]
    Inference(#[from] anyhow::Error),
}

/// The top detection together with its display fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub detection: Detection,
    pub result: NormalizedResult,
}

/// Classify the most confident face in the image at `path`.
pub fn classify_image(
    classifier: &dyn FaceClassifier,
    path: &Path,
    vocabulary: &LabelVocabulary,
) -> Result<Classification, ClassifyError> {
    let detections = classifier.predict(path)?;
    let detection = detections
        .into_iter()
        .next()
        .ok_or(ClassifyError::NoDetection)?;

    info!(
        "Detected class: {}, Detection confidence: {:.4}",
        detection.label, detection.score
    );
    let result = interpret_with(vocabulary, &detection.label, detection.score)?;
    Ok(Classification { detection, result })
}
