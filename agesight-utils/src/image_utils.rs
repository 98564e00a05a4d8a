use std::path::Path;

use anyhow::{Context, Result};
use image::{DynamicImage, Rgb, RgbImage, imageops, imageops::FilterType};
use ndarray::Array3;

/// Gray used by Ultralytics to pad letterboxed inputs.
pub const LETTERBOX_FILL: u8 = 114;

/// Load an image from disk into memory.
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<DynamicImage> {
    let path_ref = path.as_ref();
    image::open(path_ref).with_context(|| format!("failed to open image {}", path_ref.display()))
}

/// Geometry of an aspect-preserving resize into a padded canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Letterbox {
    /// Uniform scale applied to the source image.
    pub scale: f32,
    /// Horizontal padding on the left edge, in canvas pixels.
    pub pad_x: f32,
    /// Vertical padding on the top edge, in canvas pixels.
    pub pad_y: f32,
}

impl Letterbox {
    /// Compute the letterbox that fits `source` inside `target`.
    pub fn compute(source: (u32, u32), target: (u32, u32)) -> Result<Self> {
        let (src_w, src_h) = source;
        let (dst_w, dst_h) = target;
        anyhow::ensure!(
            src_w > 0 && src_h > 0,
            "source dimensions must be non-zero"
        );
        anyhow::ensure!(
            dst_w > 0 && dst_h > 0,
            "target dimensions must be non-zero"
        );

        let scale = (dst_w as f32 / src_w as f32).min(dst_h as f32 / src_h as f32);
        let (new_w, new_h) = scaled_size(source, scale);
        let pad_x = ((dst_w - new_w) as f32 / 2.0 - 0.1).round().max(0.0);
        let pad_y = ((dst_h - new_h) as f32 / 2.0 - 0.1).round().max(0.0);
        Ok(Self {
            scale,
            pad_x,
            pad_y,
        })
    }

    /// Map a point from canvas coordinates back to source-image coordinates.
    pub fn to_source(&self, x: f32, y: f32) -> (f32, f32) {
        ((x - self.pad_x) / self.scale, (y - self.pad_y) / self.scale)
    }
}

fn scaled_size(source: (u32, u32), scale: f32) -> (u32, u32) {
    let w = ((source.0 as f32 * scale).round() as u32).max(1);
    let h = ((source.1 as f32 * scale).round() as u32).max(1);
    (w, h)
}

/// Resize `image` into a `width`×`height` canvas, keeping its aspect ratio and
/// padding the remainder with [`LETTERBOX_FILL`].
pub fn letterbox_image(
    image: &DynamicImage,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<(RgbImage, Letterbox)> {
    let source = (image.width(), image.height());
    let letterbox = Letterbox::compute(source, (width, height))?;
    let (new_w, new_h) = scaled_size(source, letterbox.scale);
    let new_w = new_w.min(width);
    let new_h = new_h.min(height);

    let resized = if (new_w, new_h) == source {
        image.to_rgb8()
    } else {
        image.resize_exact(new_w, new_h, filter).to_rgb8()
    };

    let mut canvas = RgbImage::from_pixel(width, height, Rgb([LETTERBOX_FILL; 3]));
    imageops::replace(
        &mut canvas,
        &resized,
        letterbox.pad_x as i64,
        letterbox.pad_y as i64,
    );
    Ok((canvas, letterbox))
}

/// Convert an RGB image into a CHW array scaled to `[0, 1]`.
pub fn rgb_to_chw_normalized(image: &RgbImage) -> Array3<f32> {
    let (width, height) = image.dimensions();
    let mut array = Array3::<f32>::zeros((3, height as usize, width as usize));
    for (x, y, pixel) in image.enumerate_pixels() {
        let (xi, yi) = (x as usize, y as usize);
        for channel in 0..3 {
            array[(channel, yi, xi)] = pixel[channel] as f32 / 255.0;
        }
    }
    array
}

/// Largest size with the aspect ratio of `size` that fits inside `bounds`.
pub fn fit_within(size: (u32, u32), bounds: (u32, u32)) -> (u32, u32) {
    let (w, h) = size;
    let (max_w, max_h) = bounds;
    if w == 0 || h == 0 || max_w == 0 || max_h == 0 {
        return (0, 0);
    }
    let scale = (max_w as f64 / w as f64).min(max_h as f64 / h as f64);
    let fitted_w = ((w as f64 * scale).round() as u32).clamp(1, max_w);
    let fitted_h = ((h as f64 * scale).round() as u32).clamp(1, max_h);
    (fitted_w, fitted_h)
}
