//! Error types for yolopost.

use thiserror::Error;

/// Result alias for yolopost operations.
pub type YoloPostResult<T> = std::result::Result<T, YoloPostError>;

/// Errors that can occur when validating prediction buffers and layouts.
///
/// Numeric garbage (NaN/Inf) in an otherwise well-shaped buffer is not an
/// error; it flows through the pipeline unvalidated.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum YoloPostError {
    /// The prediction buffer holds fewer elements than its shape requires.
    #[error("prediction buffer too small: needed {needed}, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// The tensor shape cannot hold a box, objectness and at least one class.
    #[error("invalid prediction shape: {rows} rows x {cols} columns")]
    InvalidShape { rows: usize, cols: usize },
    /// The flat buffer length is not a multiple of the row count.
    #[error("buffer length {len} is not a multiple of {rows} rows")]
    RaggedBuffer { len: usize, rows: usize },
    /// The input resolution is smaller than the coarsest stride grid.
    #[error("input shape {height}x{width} yields an empty grid")]
    EmptyGrid { height: usize, width: usize },
    /// The tensor row count does not match the grid layout's cell count.
    #[error("row count {got} does not match grid cell count {expected}")]
    RowCountMismatch { expected: usize, got: usize },
    /// Parallel box and score slices differ in length.
    #[error("parallel inputs differ in length: {boxes} boxes, {scores} scores")]
    LengthMismatch { boxes: usize, scores: usize },
}
