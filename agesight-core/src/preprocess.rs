//! Preprocessing utilities for preparing images for YOLOv8 inference.
//!
//! Images are letterboxed into the model's square input, converted to RGB CHW
//! scaled to `[0, 1]`, and returned together with the letterbox geometry needed
//! to map detections back to the source image.

use std::path::Path;

use agesight_utils::{
    InputDimensions, Letterbox, ResizeQuality, letterbox_image, load_image,
    rgb_to_chw_normalized, timing_guard,
};
use anyhow::{Context, Result};
use image::{DynamicImage, imageops::FilterType};
use tract_onnx::prelude::Tensor;

/// Model input resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputSize {
    pub width: u32,
    pub height: u32,
}

impl InputSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for InputSize {
    fn default() -> Self {
        Self::new(640, 640)
    }
}

/// Configuration for preprocessing an image before inference.
#[derive(Debug, Clone, Default)]
pub struct PreprocessConfig {
    pub input_size: InputSize,
    pub resize_quality: ResizeQuality,
}

impl PreprocessConfig {
    fn resize_filter(&self) -> FilterType {
        match self.resize_quality {
            ResizeQuality::Quality => FilterType::Triangle,
            ResizeQuality::Speed => FilterType::Nearest,
        }
    }
}

impl From<InputDimensions> for PreprocessConfig {
    fn from(dimensions: InputDimensions) -> Self {
        PreprocessConfig {
            input_size: InputSize::new(dimensions.width, dimensions.height),
            resize_quality: dimensions.resize_quality,
        }
    }
}

/// Output of preprocessing: tensor plus the metadata to undo the letterbox.
#[derive(Debug)]
pub struct PreprocessOutput {
    /// `[1, 3, H, W]` RGB tensor in `[0, 1]`.
    pub tensor: Tensor,
    pub letterbox: Letterbox,
    /// Dimensions of the source image.
    pub original_size: (u32, u32),
}

/// Load and preprocess an image file.
pub fn preprocess_image<P: AsRef<Path>>(
    path: P,
    config: &PreprocessConfig,
) -> Result<PreprocessOutput> {
    let _guard = timing_guard("agesight_core::preprocess_image", log::Level::Debug);
    let path_ref = path.as_ref();
    anyhow::ensure!(
        path_ref.exists(),
        "input image does not exist: {}",
        path_ref.display()
    );

    let image = load_image(path_ref)
        .with_context(|| format!("failed to load image from {}", path_ref.display()))?;
    preprocess_dynamic_image(&image, config)
}

/// Preprocess an in-memory image.
pub fn preprocess_dynamic_image(
    image: &DynamicImage,
    config: &PreprocessConfig,
) -> Result<PreprocessOutput> {
    let InputSize { width, height } = config.input_size;
    anyhow::ensure!(
        width > 0 && height > 0,
        "input dimensions must be greater than zero"
    );

    let original_size = (image.width(), image.height());
    let (canvas, letterbox) = letterbox_image(image, width, height, config.resize_filter())?;
    let chw = rgb_to_chw_normalized(&canvas);

    let shape = [1usize, 3, height as usize, width as usize];
    let (data, offset) = chw.into_raw_vec_and_offset();
    debug_assert_eq!(offset, Some(0), "expected contiguous array");
    let tensor = Tensor::from_shape(&shape, &data)
        .map_err(|e| anyhow::anyhow!("failed to build tensor: {e}"))?;

    Ok(PreprocessOutput {
        tensor,
        letterbox,
        original_size,
    })
}
