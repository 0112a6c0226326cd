//! Grid decoding of raw detector head outputs.
//!
//! The head predicts box centers as offsets within a feature-map cell and box
//! sizes in log space. Decoding maps both to absolute pixels of the network
//! input: `center = (offset + cell) * stride`, `size = exp(log_size) * stride`.
//! Objectness and class columns pass through unchanged.

use crate::grid::GridLayout;
use crate::tensor::{Predictions, BOX_COLS};
use crate::util::{YoloPostError, YoloPostResult};

/// Decodes grid-relative predictions into absolute pixel coordinates.
///
/// Returns a new buffer with the same shape as the input view. The view's
/// row count must equal `layout.num_cells()`; rows are paired with cells in
/// buffer order. Pure function, the input is left untouched.
pub fn decode_grid(preds: &Predictions<'_>, layout: &GridLayout) -> YoloPostResult<Vec<f32>> {
    let expected = layout.num_cells();
    if preds.rows() != expected {
        return Err(YoloPostError::RowCountMismatch {
            expected,
            got: preds.rows(),
        });
    }

    let mut out = Vec::with_capacity(preds.rows() * preds.cols());
    for (row, cell) in preds.iter_rows().zip(layout.cells()) {
        let stride = cell.stride as f32;
        out.push((row[0] + cell.x as f32) * stride);
        out.push((row[1] + cell.y as f32) * stride);
        out.push(row[2].exp() * stride);
        out.push(row[3].exp() * stride);
        out.extend_from_slice(&row[BOX_COLS..]);
    }
    Ok(out)
}
