//! Detection pipeline: decode, select, rescale, suppress.

use crate::decode::decode_grid;
use crate::filter::select_candidates;
use crate::grid::GridLayout;
use crate::nms::nms;
use crate::tensor::Predictions;
use crate::trace::{trace_event, trace_span};
use crate::util::{YoloPostError, YoloPostResult};
#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Tunable thresholds for [`detect`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetectConfig {
    /// Minimum combined (objectness times class) score; strict comparison.
    pub conf_threshold: f32,
    /// IoU above which an overlapping lower-score box is suppressed.
    pub iou_threshold: f32,
}

impl Default for DetectConfig {
    fn default() -> Self {
        Self {
            conf_threshold: 0.3,
            iou_threshold: 0.45,
        }
    }
}

/// One detection kept after suppression, in original-image pixel space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Detection {
    /// Left edge.
    pub x1: f32,
    /// Top edge.
    pub y1: f32,
    /// Right edge.
    pub x2: f32,
    /// Bottom edge.
    pub y2: f32,
    /// Combined confidence score.
    pub score: f32,
    /// Selected class index, in `[0, C)`.
    pub class_idx: usize,
}

/// Runs the full post-processing pipeline on one raw prediction buffer.
///
/// `pred` is the detector output, row-major `[N, 4 + 1 + C]` where N is fixed
/// by `input_shape` and the stride grids; C is derived from the buffer
/// length. Both shapes are `(height, width)`: `input_shape` is the network
/// input resolution, `image_shape` the original image the boxes are rescaled
/// to.
///
/// Returns `Ok(None)` when no candidate clears the confidence threshold, and
/// otherwise the kept detections ordered by descending score. Shape mismatches
/// are errors; NaN/Inf values are not.
pub fn detect(
    pred: &[f32],
    input_shape: (usize, usize),
    image_shape: (usize, usize),
    cfg: &DetectConfig,
) -> YoloPostResult<Option<Vec<Detection>>> {
    let layout = GridLayout::new(input_shape.0, input_shape.1);
    if layout.num_cells() == 0 {
        return Err(YoloPostError::EmptyGrid {
            height: input_shape.0,
            width: input_shape.1,
        });
    }
    let preds = Predictions::from_flat(pred, layout.num_cells())?;

    let _span = trace_span!(
        "detect",
        rows = preds.rows(),
        classes = preds.num_classes()
    )
    .entered();

    let decoded = decode_grid(&preds, &layout)?;
    let candidates = select_candidates(&decoded, preds.cols(), cfg.conf_threshold);
    trace_event!("candidates", count = candidates.len());
    if candidates.is_empty() {
        return Ok(None);
    }

    // Center-to-corner conversion and rescale to the original image. The
    // reference divides x by input height and y by input width while applying
    // the image width to x and height to y; this cross mapping is kept as-is
    // for parity with models tuned against it.
    let in_h = input_shape.0 as f32;
    let in_w = input_shape.1 as f32;
    let img_h = image_shape.0 as f32;
    let img_w = image_shape.1 as f32;

    let mut boxes = Vec::with_capacity(candidates.len());
    let mut scores = Vec::with_capacity(candidates.len());
    for c in &candidates {
        let half_w = c.w / 2.0;
        let half_h = c.h / 2.0;
        boxes.push([
            (c.cx - half_w) / in_h * img_w,
            (c.cy - half_h) / in_w * img_h,
            (c.cx + half_w) / in_h * img_w,
            (c.cy + half_h) / in_w * img_h,
        ]);
        scores.push(c.score);
    }

    let keep = nms(&boxes, &scores, cfg.iou_threshold)?;
    trace_event!("kept", count = keep.len());

    let detections = keep
        .into_iter()
        .map(|i| Detection {
            x1: boxes[i][0],
            y1: boxes[i][1],
            x2: boxes[i][2],
            y2: boxes[i][3],
            score: scores[i],
            class_idx: candidates[i].class_idx,
        })
        .collect();
    Ok(Some(detections))
}

/// Runs [`detect`] over a batch of independent images in parallel.
///
/// Results keep the batch order. Each buffer shares the same shapes and
/// thresholds; the first shape error aborts the batch.
#[cfg(feature = "rayon")]
pub fn detect_batch(
    preds: &[&[f32]],
    input_shape: (usize, usize),
    image_shape: (usize, usize),
    cfg: &DetectConfig,
) -> YoloPostResult<Vec<Option<Vec<Detection>>>> {
    preds
        .par_iter()
        .map(|pred| detect(pred, input_shape, image_shape, cfg))
        .collect()
}
