//! Command-line argument definitions for agesight-cli.

use clap::{ArgAction, Parser};
use std::path::PathBuf;

use agesight_utils::config::ResizeQuality;

/// Classify the age bracket and gender of the face in an image.
#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct ClassifyArgs {
    /// Path to a cropped face image.
    #[arg(short, long)]
    pub input: PathBuf,

    /// Path to the YOLOv8 ONNX model (defaults to the settings file, then `models/best.onnx`).
    #[arg(short, long)]
    pub model: Option<PathBuf>,

    /// Optional settings JSON. Defaults to `config/agesight_settings.json` when present.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable telemetry timing logs (defaults to settings file).
    #[arg(long, action = ArgAction::SetTrue)]
    pub telemetry: bool,

    /// Override telemetry logging level (error, warn, info, debug, trace).
    #[arg(long, value_name = "LEVEL")]
    pub telemetry_level: Option<String>,

    /// Override model input width (pixels).
    #[arg(long)]
    pub width: Option<u32>,

    /// Override model input height (pixels).
    #[arg(long)]
    pub height: Option<u32>,

    /// Resize quality mode: `quality` (Triangle) or `speed` (Nearest).
    #[arg(long, value_name = "MODE")]
    pub resize_quality: Option<ResizeQuality>,

    /// Override score threshold.
    #[arg(long)]
    pub score_threshold: Option<f32>,

    /// Override NMS IoU threshold.
    #[arg(long)]
    pub iou_threshold: Option<f32>,

    /// Override the maximum number of detections kept.
    #[arg(long)]
    pub max_detections: Option<usize>,

    /// Write the result to a JSON file instead of printing it.
    #[arg(long)]
    pub json: Option<PathBuf>,
}
