mod args;
mod config;

use std::{
    fs::{self, File},
    path::Path,
};

use agesight_core::{AgeGenderDetector, Classification, classify_image};
use agesight_utils::{configure_telemetry, init_logging, normalize_path};
use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use serde::Serialize;

use crate::args::ClassifyArgs;
use crate::config::{apply_cli_overrides, load_settings};

#[derive(Debug, Serialize)]
struct ClassificationRecord {
    image: String,
    label: String,
    gender: String,
    age: String,
    confidence_percent: f32,
    /// `[x, y, width, height]` in source pixels.
    bbox: [f32; 4],
}

impl ClassificationRecord {
    fn new(image: &Path, classification: &Classification) -> Self {
        let Classification { detection, result } = classification;
        Self {
            image: image.display().to_string(),
            label: detection.label.clone(),
            gender: result.gender.clone(),
            age: result.age_bracket.clone(),
            confidence_percent: result.confidence_percent,
            bbox: [
                detection.bbox.x,
                detection.bbox.y,
                detection.bbox.width,
                detection.bbox.height,
            ],
        }
    }
}

fn main() -> Result<()> {
    init_logging(log::LevelFilter::Info)?;
    let args = ClassifyArgs::parse();

    let input_path = normalize_path(&args.input)?;

    let mut settings = load_settings(args.config.as_ref())?;
    apply_cli_overrides(&mut settings, &args);
    configure_telemetry(
        settings.telemetry.enabled,
        settings.telemetry.level_filter(),
    );

    let detector = AgeGenderDetector::from_settings(&settings)
        .with_context(|| format!("failed to load model {}", settings.model_path))?;

    let classification = classify_image(&detector, &input_path, &settings.vocabulary)
        .with_context(|| format!("failed to classify {}", input_path.display()))?;
    let record = ClassificationRecord::new(&input_path, &classification);

    if let Some(json_path) = args.json.as_ref() {
        if let Some(dir) = json_path.parent()
            && !dir.as_os_str().is_empty()
        {
            fs::create_dir_all(dir)
                .with_context(|| format!("failed to create directory {}", dir.display()))?;
        }
        let file = File::create(json_path)
            .with_context(|| format!("failed to create {}", json_path.display()))?;
        serde_json::to_writer_pretty(file, &record)
            .with_context(|| format!("failed to write result JSON to {}", json_path.display()))?;
        info!("Wrote result to {}", json_path.display());
    } else {
        println!("Gender: {}", record.gender);
        println!("Age: {}", record.age);
        println!("Confidence: {:.2}%", record.confidence_percent);
    }

    Ok(())
}
