//! Class selection and confidence filtering.

use crate::tensor::{BOX_COLS, OBJ_COL};

/// A decoded detection candidate that cleared the confidence threshold.
///
/// The box is still in center format and network-input pixel space; the
/// pipeline converts to corners and rescales before suppression.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    /// Box center x in network-input pixels.
    pub cx: f32,
    /// Box center y in network-input pixels.
    pub cy: f32,
    /// Box width in network-input pixels.
    pub w: f32,
    /// Box height in network-input pixels.
    pub h: f32,
    /// Combined confidence: objectness times best class probability.
    pub score: f32,
    /// Index of the best class, ties broken by lowest index.
    pub class_idx: usize,
}

/// Reduces each decoded row to its best class and keeps confident rows.
///
/// `decoded` is a row-major buffer of `cols` columns per row, as produced by
/// [`crate::decode::decode_grid`]. Rows survive only with a combined score
/// strictly greater than `conf_threshold`; an empty result means no
/// detections.
pub fn select_candidates(decoded: &[f32], cols: usize, conf_threshold: f32) -> Vec<Candidate> {
    debug_assert!(cols > BOX_COLS + 1);
    let mut out = Vec::new();
    for row in decoded.chunks_exact(cols) {
        let (class_idx, class_prob) = argmax(&row[OBJ_COL + 1..]);
        let score = row[OBJ_COL] * class_prob;
        if score > conf_threshold {
            out.push(Candidate {
                cx: row[0],
                cy: row[1],
                w: row[2],
                h: row[3],
                score,
                class_idx,
            });
        }
    }
    out
}

// First occurrence wins on ties: only a strictly greater value replaces.
fn argmax(values: &[f32]) -> (usize, f32) {
    let mut best_idx = 0;
    let mut best = values[0];
    for (idx, &value) in values.iter().enumerate().skip(1) {
        if value > best {
            best_idx = idx;
            best = value;
        }
    }
    (best_idx, best)
}
