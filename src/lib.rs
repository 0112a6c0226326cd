//! Post-processing for anchor-free YOLOX-style object detector outputs.
//!
//! The crate turns a raw dense prediction tensor into a filtered set of
//! bounding boxes in three stages: grid decoding to absolute pixels, per-row
//! class selection with confidence filtering, and greedy class-agnostic
//! non-maximum suppression. [`detect`] composes the stages and rescales the
//! kept boxes to the original image resolution. Model inference and image
//! handling are the caller's concern.
//!
//! Optional parallelism over image batches is available via the `rayon`
//! feature, and pipeline spans/events via the `tracing` feature.

mod decode;
mod filter;
pub mod grid;
mod nms;
mod pipeline;
mod tensor;
mod trace;
pub mod util;

pub use decode::decode_grid;
pub use filter::{select_candidates, Candidate};
pub use grid::{GridCell, GridLayout, STRIDES};
pub use nms::nms;
#[cfg(feature = "rayon")]
pub use pipeline::detect_batch;
pub use pipeline::{detect, DetectConfig, Detection};
pub use tensor::{Predictions, BOX_COLS, OBJ_COL};
pub use util::{YoloPostError, YoloPostResult};
