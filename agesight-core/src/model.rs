use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, warn};
use tract_onnx::pb::ModelProto;
use tract_onnx::prelude::*;

use crate::labels::ClassNames;
use crate::preprocess::InputSize;

type RunnableModel = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// Metadata key Ultralytics uses for the class table.
const NAMES_METADATA_KEY: &str = "names";

/// Wrapper around a YOLOv8 ONNX runnable model.
///
/// Loads the graph, pins its input to `[1, 3, H, W]`, and keeps the class
/// table embedded in the export's metadata when one is present.
#[derive(Debug)]
pub struct YoloModel {
    runnable: RunnableModel,
    class_names: Option<ClassNames>,
}

impl YoloModel {
    /// Load and optimize the YOLOv8 ONNX graph for a specific input size.
    pub fn load<P: AsRef<Path>>(model_path: P, input_size: InputSize) -> Result<Self> {
        let path = model_path.as_ref();
        anyhow::ensure!(path.exists(), "model file not found: {}", path.display());

        let proto = tract_onnx::onnx()
            .proto_model_for_path(path)
            .map_err(|e| anyhow::anyhow!("failed to parse ONNX graph from {}: {e}", path.display()))?;
        let class_names = read_class_names(&proto, path);

        let runnable = load_runnable_model(&proto, input_size, true).or_else(|opt_err| {
            warn!(
                "optimizing {} failed, using the decluttered graph instead: {opt_err:#}",
                path.display()
            );
            load_runnable_model(&proto, input_size, false)
                .context("decluttered YOLO graph failed to load as well")
        })?;
        debug!(
            "YOLO model {} ready at {}x{}",
            path.display(),
            input_size.width,
            input_size.height
        );

        Ok(Self {
            runnable,
            class_names,
        })
    }

    /// Execute the model on a `[1, 3, H, W]` tensor.
    ///
    /// Returns the raw prediction tensor, `[1, 4 + C, N]` for standard exports.
    pub fn run(&self, input: Tensor) -> Result<Tensor> {
        let mut outputs = self
            .runnable
            .run(tvec![input.into()])
            .map_err(|e| anyhow::anyhow!("YOLO execution failed: {e}"))?;

        anyhow::ensure!(!outputs.is_empty(), "YOLO model produced no outputs");
        if outputs.len() > 1 {
            debug!(
                "YOLO model produced {} outputs; using the first",
                outputs.len()
            );
        }
        Ok(outputs.swap_remove(0).into_tensor())
    }

    /// Class table found in the ONNX metadata, if any.
    pub fn class_names_metadata(&self) -> Option<&ClassNames> {
        self.class_names.as_ref()
    }
}

fn read_class_names(proto: &ModelProto, path: &Path) -> Option<ClassNames> {
    let entry = proto
        .metadata_props
        .iter()
        .find(|prop| prop.key == NAMES_METADATA_KEY)?;
    match ClassNames::parse_ultralytics(&entry.value) {
        Ok(names) => {
            debug!("{} declares classes: {}", path.display(), names);
            Some(names)
        }
        Err(err) => {
            warn!(
                "ignoring unreadable class names in {}: {err:#}",
                path.display()
            );
            None
        }
    }
}

fn load_runnable_model(
    proto: &ModelProto,
    input_size: InputSize,
    optimized: bool,
) -> Result<RunnableModel> {
    let shape = [
        1usize,
        3,
        input_size.height as usize,
        input_size.width as usize,
    ];
    let model = tract_onnx::onnx()
        .model_for_proto_model(proto)
        .map_err(|e| anyhow::anyhow!("failed to build YOLO graph: {e}"))?
        .with_input_fact(0, f32::fact(shape).into())
        .map_err(|e| anyhow::anyhow!("unable to set YOLO input shape {shape:?}: {e}"))?;

    if optimized {
        model
            .into_optimized()
            .map_err(|e| anyhow::anyhow!("unable to optimize YOLO graph: {e}"))?
            .into_runnable()
            .map_err(|e| anyhow::anyhow!("unable to make YOLO graph runnable: {e}"))
    } else {
        model
            .into_typed()
            .map_err(|e| anyhow::anyhow!("unable to type-check YOLO graph: {e}"))?
            .into_decluttered()
            .map_err(|e| anyhow::anyhow!("unable to declutter YOLO graph: {e}"))?
            .into_runnable()
            .map_err(|e| anyhow::anyhow!("unable to make YOLO graph runnable: {e}"))
    }
}
