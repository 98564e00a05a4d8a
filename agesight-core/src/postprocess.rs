use std::cmp::Ordering;

use agesight_utils::{DetectionSettings, Letterbox};
use anyhow::Result;
use tract_onnx::prelude::Tensor;

use crate::labels::ClassNames;

/// Filtering parameters applied to raw YOLOv8 predictions.
#[derive(Debug, Clone)]
pub struct PostprocessConfig {
    /// Minimum class confidence for a detection to be considered valid.
    pub score_threshold: f32,
    /// IoU above which a lower-scored box of the same class is suppressed.
    pub iou_threshold: f32,
    /// Maximum number of detections returned.
    pub max_detections: usize,
}

impl Default for PostprocessConfig {
    fn default() -> Self {
        DetectionSettings::default().into()
    }
}

impl From<DetectionSettings> for PostprocessConfig {
    fn from(settings: DetectionSettings) -> Self {
        PostprocessConfig {
            score_threshold: settings.score_threshold,
            iou_threshold: settings.iou_threshold,
            max_detections: settings.max_detections,
        }
    }
}

impl From<&DetectionSettings> for PostprocessConfig {
    fn from(settings: &DetectionSettings) -> Self {
        settings.clone().into()
    }
}

/// Axis-aligned bounding box in source-image pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// The x-coordinate of the top-left corner.
    pub x: f32,
    /// The y-coordinate of the top-left corner.
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    pub fn area(&self) -> f32 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Intersection over Union with another box.
    pub fn iou(&self, other: &Self) -> f32 {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = (self.x + self.width).min(other.x + other.width);
        let y2 = (self.y + self.height).min(other.y + other.height);

        let intersection = (x2 - x1).max(0.0) * (y2 - y1).max(0.0);
        if intersection <= 0.0 {
            return 0.0;
        }

        let union = self.area() + other.area() - intersection;
        if union <= 0.0 {
            0.0
        } else {
            intersection / union
        }
    }
}

/// One predicted face with its class label and confidence.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub class_id: usize,
    /// Class label, e.g. `"adult male"`.
    pub label: String,
    /// Confidence score in `[0, 1]`.
    pub score: f32,
    pub bbox: BoundingBox,
}

/// Decode a YOLOv8 output tensor into ranked detections.
///
/// The tensor holds one `[cx, cy, w, h, class scores...]` column per anchor,
/// either as `[1, 4 + C, N]` (the Ultralytics export layout) or transposed as
/// `[1, N, 4 + C]`. Candidates below the score threshold are dropped, boxes are
/// mapped through `letterbox` to source pixels and clipped to `original_size`,
/// and same-class overlaps are suppressed. The result is sorted by descending
/// score, so the first entry is the most confident detection.
pub fn apply_postprocess(
    output: &Tensor,
    letterbox: &Letterbox,
    original_size: (u32, u32),
    names: &ClassNames,
    config: &PostprocessConfig,
) -> Result<Vec<Detection>> {
    let predictions = Predictions::from_tensor(output, names.len())?;
    let (max_x, max_y) = (original_size.0 as f32, original_size.1 as f32);

    let mut detections = Vec::new();
    for anchor in 0..predictions.anchors {
        let Some((class_id, score)) = predictions.best_class(anchor) else {
            continue;
        };
        if !score.is_finite() || score < config.score_threshold {
            continue;
        }

        let cx = predictions.value(0, anchor);
        let cy = predictions.value(1, anchor);
        let w = predictions.value(2, anchor);
        let h = predictions.value(3, anchor);
        let (x1, y1) = letterbox.to_source(cx - w / 2.0, cy - h / 2.0);
        let (x2, y2) = letterbox.to_source(cx + w / 2.0, cy + h / 2.0);
        let (x1, y1) = (x1.clamp(0.0, max_x), y1.clamp(0.0, max_y));
        let (x2, y2) = (x2.clamp(0.0, max_x), y2.clamp(0.0, max_y));

        let bbox = BoundingBox {
            x: x1,
            y: y1,
            width: x2 - x1,
            height: y2 - y1,
        };
        if bbox.width <= 0.0 || bbox.height <= 0.0 {
            continue;
        }

        detections.push(Detection {
            class_id,
            label: names.name_or_placeholder(class_id),
            score,
            bbox,
        });
    }

    detections.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    let mut detections = non_max_suppression(detections, config.iou_threshold);
    if config.max_detections > 0 {
        detections.truncate(config.max_detections);
    }
    Ok(detections)
}

/// Borrowed view over the prediction matrix, hiding the tensor layout.
struct Predictions<'a> {
    data: &'a [f32],
    anchors: usize,
    channels: usize,
    channels_first: bool,
}

impl<'a> Predictions<'a> {
    fn from_tensor(output: &'a Tensor, class_count: usize) -> Result<Self> {
        let (dim_a, dim_b) = match output.shape() {
            [1, a, b] | [a, b] => (*a, *b),
            other => anyhow::bail!(
                "YOLOv8 output must have shape [1, 4 + C, N] or [1, N, 4 + C] (got {:?})",
                other
            ),
        };
        let data = output
            .as_slice::<f32>()
            .map_err(|e| anyhow::anyhow!("YOLOv8 output is not f32: {e}"))?;

        let channels_first = if class_count == 0 {
            // Without a class table assume the export layout.
            dim_a < dim_b
        } else {
            let expected = 4 + class_count;
            if dim_a == expected {
                true
            } else if dim_b == expected {
                false
            } else {
                anyhow::bail!(
                    "YOLOv8 output {:?} does not match {} class name(s)",
                    output.shape(),
                    class_count
                );
            }
        };

        let (channels, anchors) = if channels_first {
            (dim_a, dim_b)
        } else {
            (dim_b, dim_a)
        };
        anyhow::ensure!(
            channels > 4,
            "YOLOv8 output has no class scores ({channels} channels)"
        );

        Ok(Self {
            data,
            anchors,
            channels,
            channels_first,
        })
    }

    fn value(&self, channel: usize, anchor: usize) -> f32 {
        if self.channels_first {
            self.data[channel * self.anchors + anchor]
        } else {
            self.data[anchor * self.channels + channel]
        }
    }

    fn best_class(&self, anchor: usize) -> Option<(usize, f32)> {
        (4..self.channels)
            .map(|channel| (channel - 4, self.value(channel, anchor)))
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal))
    }
}

/// Greedy per-class non-maximum suppression over score-sorted detections.
fn non_max_suppression(detections: Vec<Detection>, threshold: f32) -> Vec<Detection> {
    if threshold <= 0.0 {
        return detections;
    }
    let mut kept: Vec<Detection> = Vec::with_capacity(detections.len());
    for detection in detections {
        let suppressed = kept.iter().any(|other| {
            other.class_id == detection.class_id && detection.bbox.iou(&other.bbox) > threshold
        });
        if !suppressed {
            kept.push(detection);
        }
    }
    kept
}
