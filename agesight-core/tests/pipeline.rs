use std::path::{Path, PathBuf};

use agesight_core::{AgeGenderDetector, ClassifyError, FaceClassifier, classify_image};
use agesight_utils::{AppSettings, InputDimensions, LabelVocabulary, ResizeQuality};
use image::{Rgb, RgbImage};
use prost::Message;
use tract_onnx::pb::{
    GraphProto, ModelProto, NodeProto, OperatorSetIdProto, StringStringEntryProto, TensorProto,
    TypeProto, ValueInfoProto, type_proto,
};

const SIDE: u32 = 8;

fn workspace_model() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(agesight_utils::config::DEFAULT_MODEL_PATH)
}

fn float_value(name: &str) -> ValueInfoProto {
    ValueInfoProto {
        name: name.into(),
        r#type: Some(TypeProto {
            value: Some(type_proto::Value::TensorType(type_proto::Tensor {
                elem_type: 1,
                shape: None,
            })),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Encode a two-class "detector" that reshapes `[1, 3, 8, 8]` into `[1, 6, 32]`.
///
/// Anchor `a` reads its box from the red and green channels and its class
/// scores from the blue channel: class 0 from pixel `a`, class 1 from pixel
/// `32 + a`.
fn reshape_model(names: &str) -> Vec<u8> {
    let shape = TensorProto {
        name: "shape".into(),
        dims: vec![3],
        data_type: 7,
        int64_data: vec![1, 6, -1],
        ..Default::default()
    };
    let node = NodeProto {
        name: "reshape".into(),
        op_type: "Reshape".into(),
        input: vec!["images".into(), "shape".into()],
        output: vec!["output0".into()],
        ..Default::default()
    };
    let graph = GraphProto {
        name: "age_gender".into(),
        node: vec![node],
        initializer: vec![shape],
        input: vec![float_value("images")],
        output: vec![float_value("output0")],
        ..Default::default()
    };
    ModelProto {
        ir_version: 7,
        opset_import: vec![OperatorSetIdProto {
            domain: String::new(),
            version: 13,
        }],
        graph: Some(graph),
        metadata_props: vec![StringStringEntryProto {
            key: "names".into(),
            value: names.into(),
        }],
        ..Default::default()
    }
    .encode_to_vec()
}

/// Every anchor gets a unit box centred at (1, 1). Anchor 3 scores 1.0 for
/// class 1 and anchor 10 scores 0.8 for class 0; the rest score zero.
fn write_face(path: &Path) {
    let mut image = RgbImage::from_pixel(SIDE, SIDE, Rgb([255, 255, 0]));
    image.put_pixel(2, 1, Rgb([255, 255, 204]));
    image.put_pixel(3, 4, Rgb([255, 255, 255]));
    image.save(path).expect("write face image");
}

fn settings_for(model_path: &Path) -> AppSettings {
    AppSettings {
        model_path: model_path.to_string_lossy().into_owned(),
        input: InputDimensions {
            width: SIDE,
            height: SIDE,
            resize_quality: ResizeQuality::Speed,
        },
        ..AppSettings::default()
    }
}

#[test]
fn missing_model_is_fatal_at_load() {
    let settings = AppSettings {
        model_path: "does/not/exist.onnx".into(),
        ..AppSettings::default()
    };
    let err = AgeGenderDetector::from_settings(&settings).expect_err("missing model");
    assert!(format!("{err:#}").contains("model file not found"));
}

#[test]
fn synthetic_model_runs_end_to_end() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let model_path = dir.path().join("best.onnx");
    std::fs::write(
        &model_path,
        reshape_model("{0: 'adult male', 1: 'female young'}"),
    )?;
    let image_path = dir.path().join("face.png");
    write_face(&image_path);

    let detector = AgeGenderDetector::from_settings(&settings_for(&model_path))?;
    assert_eq!(detector.class_names().get(0), Some("adult male"));
    assert_eq!(detector.class_names().get(1), Some("female young"));

    let detections = detector.predict(&image_path)?;
    assert_eq!(detections.len(), 2);
    assert_eq!(detections[0].class_id, 1);
    assert_eq!(detections[0].label, "female young");
    assert!((detections[0].score - 1.0).abs() < 1e-6);
    assert_eq!(detections[1].class_id, 0);
    assert!((detections[1].score - 0.8).abs() < 1e-6);

    let bbox = detections[0].bbox;
    assert!((bbox.x - 0.5).abs() < 1e-5 && (bbox.y - 0.5).abs() < 1e-5);
    assert!((bbox.width - 1.0).abs() < 1e-5 && (bbox.height - 1.0).abs() < 1e-5);

    let classification = classify_image(&detector, &image_path, &LabelVocabulary::default())?;
    assert_eq!(classification.result.gender, "female");
    assert_eq!(classification.result.age_bracket, "young");
    assert!((classification.result.confidence_percent - 100.0).abs() < 1e-4);
    Ok(())
}

#[test]
fn configured_class_names_override_metadata() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let model_path = dir.path().join("best.onnx");
    std::fs::write(&model_path, reshape_model("{0: 'x y', 1: 'z w'}"))?;
    let image_path = dir.path().join("face.png");
    write_face(&image_path);

    let mut settings = settings_for(&model_path);
    settings.class_names = Some(vec!["senior female".into(), "adult male".into()]);
    let detector = AgeGenderDetector::from_settings(&settings)?;

    let classification = classify_image(&detector, &image_path, &LabelVocabulary::default())?;
    assert_eq!(classification.detection.label, "adult male");
    assert_eq!(classification.result.age_bracket, "adult");
    assert_eq!(classification.result.gender, "male");
    Ok(())
}

#[test]
fn unreadable_names_metadata_requires_configured_names() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let model_path = dir.path().join("best.onnx");
    std::fs::write(&model_path, reshape_model("not a class table"))?;

    let err = AgeGenderDetector::from_settings(&settings_for(&model_path))
        .expect_err("no usable class names");
    assert!(format!("{err:#}").contains("does not declare class names"));
    Ok(())
}

#[test]
fn blank_image_classifies_or_reports_no_face() -> anyhow::Result<()> {
    let model_path = workspace_model();
    if !model_path.exists() {
        eprintln!(
            "skipping pipeline test; model missing at {}",
            model_path.display()
        );
        return Ok(());
    }

    let settings = AppSettings {
        model_path: model_path.to_string_lossy().into_owned(),
        ..AppSettings::default()
    };
    let detector = AgeGenderDetector::from_settings(&settings)?;
    assert!(!detector.class_names().is_empty());

    let dir = tempfile::tempdir()?;
    let image_path = dir.path().join("blank.jpg");
    RgbImage::from_pixel(320, 240, Rgb([128, 128, 128])).save(&image_path)?;

    let detections = detector.predict(&image_path)?;
    for pair in detections.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }

    match classify_image(&detector, &image_path, &LabelVocabulary::default()) {
        Ok(classification) => {
            let percent = classification.result.confidence_percent;
            assert!((0.0..=100.0).contains(&percent));
        }
        Err(ClassifyError::NoDetection) | Err(ClassifyError::Unrecognized(_)) => {}
        Err(other) => return Err(other.into()),
    }
    Ok(())
}
