//! Greedy class-agnostic non-maximum suppression.

use crate::util::{YoloPostError, YoloPostResult};

/// Suppresses overlapping boxes, keeping the highest-scoring of each cluster.
///
/// Boxes are corner-format `[x1, y1, x2, y2]` with inclusive pixel
/// coordinates: areas and intersections use the `+ 1` convention of the
/// reference detectors, so a single-pixel box has area 1. Candidates are
/// visited in descending score order; each kept box removes every remaining
/// box whose IoU with it is strictly greater than `iou_threshold`. Applied
/// once across all classes.
///
/// Returns the kept indices in take order, so scores along the keep list are
/// non-increasing. O(n²) in the candidate count, which is small after
/// confidence filtering. Degenerate (negative-size) boxes give undefined
/// results.
pub fn nms(boxes: &[[f32; 4]], scores: &[f32], iou_threshold: f32) -> YoloPostResult<Vec<usize>> {
    if boxes.len() != scores.len() {
        return Err(YoloPostError::LengthMismatch {
            boxes: boxes.len(),
            scores: scores.len(),
        });
    }

    let areas: Vec<f32> = boxes
        .iter()
        .map(|b| (b[2] - b[0] + 1.0) * (b[3] - b[1] + 1.0))
        .collect();

    let mut order: Vec<usize> = (0..boxes.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

    let mut suppressed = vec![false; boxes.len()];
    let mut keep = Vec::new();
    for pos in 0..order.len() {
        let i = order[pos];
        if suppressed[i] {
            continue;
        }
        keep.push(i);
        for &j in &order[pos + 1..] {
            if suppressed[j] {
                continue;
            }
            let inter_w = (boxes[i][2].min(boxes[j][2]) - boxes[i][0].max(boxes[j][0]) + 1.0).max(0.0);
            let inter_h = (boxes[i][3].min(boxes[j][3]) - boxes[i][1].max(boxes[j][1]) + 1.0).max(0.0);
            let inter = inter_w * inter_h;
            let iou = inter / (areas[i] + areas[j] - inter);
            if iou > iou_threshold {
                suppressed[j] = true;
            }
        }
    }
    Ok(keep)
}
