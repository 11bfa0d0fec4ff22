//! Mapping between grid indices and world coordinates.
//!
//! Row 0 is the north edge of the grid and rows increase southward, so the
//! Y mapping is flipped relative to the world axis. Grid indices are obtained
//! by truncating toward zero, which differs from `floor` for coordinates west
//! of or south of the origin.

use crate::RasterHeader;

/// The header values needed to convert between grid and world coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridTransform {
    /// World X of the lower-left corner.
    pub minx: f64,
    /// World Y of the lower-left corner.
    pub miny: f64,
    /// Cell size in world units.
    pub cell_size: f64,
    /// Number of grid rows.
    pub nrows: i32,
}

impl GridTransform {
    /// Column index containing `world_x`.
    pub fn to_grid_column(self, world_x: f64) -> i32 {
        ((world_x - self.minx) / self.cell_size) as i32
    }

    /// Row index for `world_y`, counted down from the north edge.
    ///
    /// Casts saturate and the subtraction wraps, so far-away coordinates give
    /// a meaningless index rather than a panic.
    pub fn to_grid_row(self, world_y: f64) -> i32 {
        self.nrows
            .wrapping_sub(((world_y - self.miny) / self.cell_size) as i32)
    }

    /// World X of the west edge of `grid_column`.
    pub fn to_world_x(self, grid_column: f64) -> f64 {
        self.minx + grid_column * self.cell_size
    }

    /// World Y of the north edge of `grid_row`.
    pub fn to_world_y(self, grid_row: f64) -> f64 {
        self.miny + (f64::from(self.nrows) - grid_row) * self.cell_size
    }
}

impl From<&RasterHeader> for GridTransform {
    fn from(header: &RasterHeader) -> Self {
        Self {
            minx: header.minx,
            miny: header.miny,
            cell_size: header.cell_size,
            nrows: header.nrows,
        }
    }
}
