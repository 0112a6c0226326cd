//! Borrowed prediction tensor view.
//!
//! `Predictions` is a borrowed 2D row-major view into a flat buffer of shape
//! `[N, 4 + 1 + C]`: box fields, one objectness scalar, then C class
//! probabilities per row. Construction validates the shape; element values
//! are never validated.

use crate::util::{YoloPostError, YoloPostResult};

/// Number of leading box columns (cx, cy, w, h) per row.
pub const BOX_COLS: usize = 4;
/// Column index of the objectness scalar.
pub const OBJ_COL: usize = 4;
// box + objectness + at least one class
const MIN_COLS: usize = 6;

/// Borrowed row-major view over a detector output buffer.
#[derive(Copy, Clone, Debug)]
pub struct Predictions<'a> {
    data: &'a [f32],
    rows: usize,
    cols: usize,
}

impl<'a> Predictions<'a> {
    /// Creates a view with an explicit row and column count.
    pub fn new(data: &'a [f32], rows: usize, cols: usize) -> YoloPostResult<Self> {
        if cols < MIN_COLS {
            return Err(YoloPostError::InvalidShape { rows, cols });
        }
        let needed = rows
            .checked_mul(cols)
            .ok_or(YoloPostError::InvalidShape { rows, cols })?;
        if data.len() < needed {
            return Err(YoloPostError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self { data, rows, cols })
    }

    /// Creates a view deriving the column count from the buffer length.
    pub fn from_flat(data: &'a [f32], rows: usize) -> YoloPostResult<Self> {
        if rows == 0 {
            return Err(YoloPostError::InvalidShape { rows, cols: 0 });
        }
        if data.len() % rows != 0 {
            return Err(YoloPostError::RaggedBuffer {
                len: data.len(),
                rows,
            });
        }
        Self::new(data, rows, data.len() / rows)
    }

    /// Returns the number of detection candidate rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Returns the number of columns per row (`4 + 1 + C`).
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns the number of class-probability columns C.
    pub fn num_classes(&self) -> usize {
        self.cols - OBJ_COL - 1
    }

    /// Returns the backing slice.
    pub fn as_slice(&self) -> &'a [f32] {
        self.data
    }

    /// Returns row `r` if it is within bounds.
    pub fn row(&self, r: usize) -> Option<&'a [f32]> {
        if r >= self.rows {
            return None;
        }
        let start = r * self.cols;
        self.data.get(start..start + self.cols)
    }

    /// Iterates over all rows in order.
    pub fn iter_rows(&self) -> impl Iterator<Item = &'a [f32]> {
        self.data.chunks_exact(self.cols).take(self.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::Predictions;
    use crate::util::YoloPostError;

    #[test]
    fn rejects_too_few_columns() {
        let data = [0.0f32; 10];
        let err = Predictions::new(&data, 2, 5).err().unwrap();
        assert_eq!(err, YoloPostError::InvalidShape { rows: 2, cols: 5 });
    }

    #[test]
    fn rejects_short_buffer() {
        let data = [0.0f32; 11];
        let err = Predictions::new(&data, 2, 6).err().unwrap();
        assert_eq!(err, YoloPostError::BufferTooSmall { needed: 12, got: 11 });
    }

    #[test]
    fn from_flat_rejects_ragged_length() {
        let data = [0.0f32; 13];
        let err = Predictions::from_flat(&data, 2).err().unwrap();
        assert_eq!(err, YoloPostError::RaggedBuffer { len: 13, rows: 2 });
    }

    #[test]
    fn rows_and_classes_derive_from_shape() {
        let data: Vec<f32> = (0..14).map(|v| v as f32).collect();
        let preds = Predictions::from_flat(&data, 2).unwrap();
        assert_eq!(preds.rows(), 2);
        assert_eq!(preds.cols(), 7);
        assert_eq!(preds.num_classes(), 2);
        assert_eq!(preds.row(1).unwrap(), &data[7..14]);
        assert!(preds.row(2).is_none());
        assert_eq!(preds.iter_rows().count(), 2);
    }
}
