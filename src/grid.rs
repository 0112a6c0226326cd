//! Multi-stride grid layout for anchor-free detector heads.
//!
//! A detector head emits one prediction row per feature-map cell, with the
//! three stride levels concatenated in order 8, 16, 32 and each level's cells
//! enumerated row-major (y outer, x inner). `GridLayout` makes that implicit
//! buffer layout an explicit, queryable type so the row-index-to-cell mapping
//! can be tested independently of decoding.

/// Downsampling factors of the three detector head levels, in buffer order.
pub const STRIDES: [usize; 3] = [8, 16, 32];

/// A single feature-map cell: grid coordinate plus its level's stride.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridCell {
    /// Column within the stride level's grid.
    pub x: usize,
    /// Row within the stride level's grid.
    pub y: usize,
    /// Downsampling factor of the level this cell belongs to.
    pub stride: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct GridLevel {
    stride: usize,
    width: usize,
    height: usize,
}

impl GridLevel {
    fn num_cells(&self) -> usize {
        self.width * self.height
    }
}

/// Grid layout derived from the network input resolution.
///
/// Input dimensions that are not evenly divisible by a stride truncate via
/// integer division, matching the reference head's cell-count semantics; no
/// error is raised for such inputs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridLayout {
    levels: [GridLevel; 3],
    input_height: usize,
    input_width: usize,
}

impl GridLayout {
    /// Builds the layout for a network input of `(input_height, input_width)`.
    pub fn new(input_height: usize, input_width: usize) -> Self {
        let levels = STRIDES.map(|stride| GridLevel {
            stride,
            width: input_width / stride,
            height: input_height / stride,
        });
        Self {
            levels,
            input_height,
            input_width,
        }
    }

    /// Returns the network input height this layout was built for.
    pub fn input_height(&self) -> usize {
        self.input_height
    }

    /// Returns the network input width this layout was built for.
    pub fn input_width(&self) -> usize {
        self.input_width
    }

    /// Total number of cells across all stride levels.
    ///
    /// This is the row count a matching prediction tensor must have.
    pub fn num_cells(&self) -> usize {
        self.levels.iter().map(GridLevel::num_cells).sum()
    }

    /// Enumerates all cells in buffer order: strides 8, 16, 32, each level
    /// row-major with y outer and x inner.
    pub fn cells(&self) -> impl Iterator<Item = GridCell> + '_ {
        self.levels.iter().flat_map(|level| {
            let level = *level;
            (0..level.height).flat_map(move |y| {
                (0..level.width).map(move |x| GridCell {
                    x,
                    y,
                    stride: level.stride,
                })
            })
        })
    }

    /// Maps a flat prediction row index back to its cell.
    ///
    /// Returns `None` when `index >= num_cells()`.
    pub fn cell(&self, index: usize) -> Option<GridCell> {
        let mut rest = index;
        for level in &self.levels {
            let count = level.num_cells();
            if rest < count {
                return Some(GridCell {
                    x: rest % level.width,
                    y: rest / level.width,
                    stride: level.stride,
                });
            }
            rest -= count;
        }
        None
    }
}
