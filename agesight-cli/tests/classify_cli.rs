use std::error::Error;
use std::path::{Path, PathBuf};

use agesight_utils::normalize_path;
use assert_cmd::cargo::cargo_bin_cmd;
use image::{ImageBuffer, Rgb};
use predicates::prelude::*;
use prost::Message;
use serde_json::Value;
use tempfile::tempdir;
use tract_onnx::pb::{
    GraphProto, ModelProto, NodeProto, OperatorSetIdProto, StringStringEntryProto, TensorProto,
    TypeProto, ValueInfoProto, type_proto,
};

const MODEL_REL_PATH: &str = "../models/best.onnx";

fn write_sample_image(dir: &Path) -> Result<PathBuf, Box<dyn Error>> {
    let image_path = dir.join("face.jpg");
    let img = ImageBuffer::from_fn(64, 64, |x, y| {
        let r = ((x * 3 + y) % 255) as u8;
        Rgb([r, 140, 255u8.saturating_sub(r)])
    });
    img.save(&image_path)?;
    Ok(image_path)
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

/// Tiny two-class model: reshapes the `[1, 3, 8, 8]` input into `[1, 6, 32]`
/// predictions, so the blue channel carries the class scores.
fn write_reshape_model(dir: &Path) -> Result<PathBuf, Box<dyn Error>> {
    let graph = GraphProto {
        name: "age_gender".into(),
        node: vec![NodeProto {
            name: "reshape".into(),
            op_type: "Reshape".into(),
            input: vec!["images".into(), "shape".into()],
            output: vec!["output0".into()],
            ..Default::default()
        }],
        initializer: vec![TensorProto {
            name: "shape".into(),
            dims: vec![3],
            data_type: 7,
            int64_data: vec![1, 6, -1],
            ..Default::default()
        }],
        input: vec![float_value("images")],
        output: vec![float_value("output0")],
        ..Default::default()
    };
    let model = ModelProto {
        ir_version: 7,
        opset_import: vec![OperatorSetIdProto {
            domain: String::new(),
            version: 13,
        }],
        graph: Some(graph),
        metadata_props: vec![StringStringEntryProto {
            key: "names".into(),
            value: "{0: 'female young', 1: 'adult male'}".into(),
        }],
        ..Default::default()
    };
    let path = dir.join("best.onnx");
    std::fs::write(&path, model.encode_to_vec())?;
    Ok(path)
}

/// Unit boxes everywhere; only anchor 5 scores, 0.6 for class 1.
fn write_scored_face(dir: &Path) -> Result<PathBuf, Box<dyn Error>> {
    let path = dir.join("face.png");
    let mut img = ImageBuffer::from_pixel(8, 8, Rgb([255u8, 255, 0]));
    img.put_pixel(5, 4, Rgb([255, 255, 153]));
    img.save(&path)?;
    Ok(path)
}

fn ensure_model_path() -> Option<PathBuf> {
    let path = Path::new(MODEL_REL_PATH);
    if !path.exists() {
        eprintln!(
            "skipping test because the model is missing at {}",
            path.display()
        );
        return None;
    }
    Some(normalize_path(path).expect("normalize_path should succeed"))
}

#[test]
fn help_lists_the_classification_flags() {
    cargo_bin_cmd!("agesight-cli")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--input"))
        .stdout(predicate::str::contains("--model"))
        .stdout(predicate::str::contains("--iou-threshold"));
}

#[test]
fn missing_input_is_rejected() {
    cargo_bin_cmd!("agesight-cli")
        .args(["--input", "definitely/not/here.jpg"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("path does not exist"));
}

#[test]
fn missing_model_exits_non_zero() -> Result<(), Box<dyn Error>> {
    let work_dir = tempdir()?;
    let image_path = write_sample_image(work_dir.path())?;
    let model_path = work_dir.path().join("absent.onnx");

    cargo_bin_cmd!("agesight-cli")
        .arg("--input")
        .arg(&image_path)
        .arg("--model")
        .arg(&model_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("model file not found"));
    Ok(())
}

#[test]
fn invalid_model_exits_non_zero() -> Result<(), Box<dyn Error>> {
    let work_dir = tempdir()?;
    let image_path = write_sample_image(work_dir.path())?;
    let model_path = work_dir.path().join("broken.onnx");
    std::fs::write(&model_path, b"not an onnx graph")?;

    cargo_bin_cmd!("agesight-cli")
        .arg("--input")
        .arg(&image_path)
        .arg("--model")
        .arg(&model_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load model"));
    Ok(())
}

#[test]
fn synthetic_model_prints_result_lines() -> Result<(), Box<dyn Error>> {
    let work_dir = tempdir()?;
    let model_path = write_reshape_model(work_dir.path())?;
    let image_path = write_scored_face(work_dir.path())?;

    cargo_bin_cmd!("agesight-cli")
        .arg("--input")
        .arg(&image_path)
        .arg("--model")
        .arg(&model_path)
        .args(["--width", "8", "--height", "8", "--resize-quality", "speed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Gender: male"))
        .stdout(predicate::str::contains("Age: adult"))
        .stdout(predicate::str::contains("Confidence: 60.00%"));
    Ok(())
}

#[test]
fn synthetic_model_writes_json_record() -> Result<(), Box<dyn Error>> {
    let work_dir = tempdir()?;
    let model_path = write_reshape_model(work_dir.path())?;
    let image_path = write_scored_face(work_dir.path())?;
    let json_path = work_dir.path().join("out").join("result.json");

    cargo_bin_cmd!("agesight-cli")
        .arg("--input")
        .arg(&image_path)
        .arg("--model")
        .arg(&model_path)
        .args(["--width", "8", "--height", "8"])
        .arg("--json")
        .arg(&json_path)
        .assert()
        .success();

    let record: Value = serde_json::from_str(&std::fs::read_to_string(&json_path)?)?;
    assert_eq!(record["label"].as_str(), Some("adult male"));
    assert_eq!(record["gender"].as_str(), Some("male"));
    assert_eq!(record["age"].as_str(), Some("adult"));
    let confidence = record["confidence_percent"].as_f64().unwrap_or(-1.0);
    assert!((confidence - 60.0).abs() < 1e-3);
    Ok(())
}

#[test]
fn classify_writes_json_record() -> Result<(), Box<dyn Error>> {
    let Some(model) = ensure_model_path() else {
        return Ok(());
    };

    let work_dir = tempdir()?;
    let image_path = write_sample_image(work_dir.path())?;
    let json_path = work_dir.path().join("out").join("result.json");

    let output = cargo_bin_cmd!("agesight-cli")
        .arg("--input")
        .arg(&image_path)
        .arg("--model")
        .arg(&model)
        .arg("--score-threshold")
        .arg("0.0")
        .arg("--json")
        .arg(&json_path)
        .output()?;
    if !output.status.success() {
        // A synthetic image may still yield an unrecognized label.
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(
            stderr.contains("No face detected") || stderr.contains("Unrecognized result"),
            "unexpected failure: {stderr}"
        );
        return Ok(());
    }

    let record: Value = serde_json::from_str(&std::fs::read_to_string(&json_path)?)?;
    assert_eq!(
        record["image"].as_str(),
        Some(image_path.canonicalize()?.display().to_string().as_str())
    );
    let confidence = record["confidence_percent"].as_f64().unwrap_or(-1.0);
    assert!((0.0..=100.0).contains(&confidence));
    assert!(record["gender"].is_string());
    assert!(record["age"].is_string());
    Ok(())
}
