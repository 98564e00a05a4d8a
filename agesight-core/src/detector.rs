//! Detector wiring the YOLOv8 model to pre- and postprocessing.

use std::path::Path;

use agesight_utils::{AppSettings, timing_guard};
use anyhow::Result;
use log::info;

use crate::labels::ClassNames;
use crate::model::YoloModel;
use crate::postprocess::{Detection, PostprocessConfig, apply_postprocess};
use crate::preprocess::{PreprocessConfig, PreprocessOutput, preprocess_image};

/// Anything that can turn an image path into ranked detections.
///
/// The GUI and CLI hold the detector behind this trait so tests can swap in a
/// canned classifier without loading a model.
pub trait FaceClassifier: Send + Sync + std::fmt::Debug {
    fn predict(&self, path: &Path) -> Result<Vec<Detection>>;
}

/// YOLOv8 age/gender detector: model plus pre- and postprocessing settings.
///
/// This is the main entry point for running inference.
#[derive(Debug)]
pub struct AgeGenderDetector {
    model: YoloModel,
    class_names: ClassNames,
    preprocess: PreprocessConfig,
    postprocess: PostprocessConfig,
}

impl AgeGenderDetector {
    /// Construct a detector from a model path and configuration.
    ///
    /// Class names come from `class_names` when given, otherwise from the
    /// `names` metadata embedded in the ONNX export.
    pub fn new<P: AsRef<Path>>(
        model_path: P,
        class_names: Option<ClassNames>,
        preprocess: PreprocessConfig,
        postprocess: PostprocessConfig,
    ) -> Result<Self> {
        let path = model_path.as_ref();
        info!("Loading model {}", path.display());
        let _guard = timing_guard("agesight_core::load_model", log::Level::Info);

        let model = YoloModel::load(path, preprocess.input_size)?;
        let class_names = match class_names {
            Some(names) if !names.is_empty() => names,
            _ => model.class_names_metadata().cloned().ok_or_else(|| {
                anyhow::anyhow!(
                    "model {} does not declare class names; set `class_names` in the settings file",
                    path.display()
                )
            })?,
        };
        info!("Model ready with classes: {class_names}");

        Ok(Self {
            model,
            class_names,
            preprocess,
            postprocess,
        })
    }

    /// Construct a detector from application settings.
    pub fn from_settings(settings: &AppSettings) -> Result<Self> {
        let class_names = settings.class_names.clone().map(ClassNames::new);
        Self::new(
            &settings.model_path,
            class_names,
            settings.input.into(),
            (&settings.detection).into(),
        )
    }

    /// Run detection on an image file path.
    ///
    /// Detections are ranked by descending confidence.
    pub fn detect_path<P: AsRef<Path>>(&self, path: P) -> Result<Vec<Detection>> {
        let _guard = timing_guard("agesight_core::detect_path", log::Level::Debug);
        let prep = preprocess_image(path, &self.preprocess)?;
        self.run_preprocessed(prep)
    }

    pub fn class_names(&self) -> &ClassNames {
        &self.class_names
    }

    fn run_preprocessed(&self, prep: PreprocessOutput) -> Result<Vec<Detection>> {
        let _guard = timing_guard("agesight_core::run_preprocessed", log::Level::Trace);

        let raw = {
            let _guard = timing_guard("agesight_core::onnx_inference", log::Level::Debug);
            self.model.run(prep.tensor)?
        };

        let _guard = timing_guard("agesight_core::postprocess", log::Level::Debug);
        apply_postprocess(
            &raw,
            &prep.letterbox,
            prep.original_size,
            &self.class_names,
            &self.postprocess,
        )
    }
}

impl FaceClassifier for AgeGenderDetector {
    fn predict(&self, path: &Path) -> Result<Vec<Detection>> {
        self.detect_path(path)
    }
}
