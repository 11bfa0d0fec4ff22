//! # flt-raster
//!
//! Reader for float grid rasters stored as a `.hdr`/`.flt` file pair.
//!
//! ## Format
//!
//! - The `.hdr` file is text with one `key value` pair per line. Recognized
//!   keys are `ncols`, `nrows`, `xllcorner`, `yllcorner`, `cellsize`,
//!   `nodata_value` and `byteorder` (matched case-insensitively).
//! - The `.flt` file is a bare array of `ncols * nrows` IEEE-754 32-bit
//!   floats, row-major with row 0 at the north edge, in the byte order named
//!   by the header (`LSBFIRST` for little-endian, anything else big-endian).
//!
//! Loading a raster decodes the grid and computes summary statistics over
//! the samples that are not the no-data value in the same pass.
//!
//! ## Example
//!
//! ```no_run
//! use flt_raster::load_raster;
//!
//! let raster = load_raster("data/elevation.flt")?;
//! let stats = raster.statistics();
//! println!(
//!     "range {} to {}, one-sigma band {} to {}",
//!     stats.min_data(),
//!     stats.max_data(),
//!     stats.min_limit(),
//!     stats.max_limit()
//! );
//!
//! // Locate the highest cell in world coordinates
//! let transform = raster.transform();
//! let x = transform.to_world_x(stats.max_col() as f64);
//! let y = transform.to_world_y(stats.max_row() as f64);
//! println!("peak near ({x}, {y})");
//! # Ok::<(), flt_raster::RasterError>(())
//! ```

mod error;
mod grid;
mod header;
mod options;
mod raster;
mod stats;
mod transform;

pub use error::RasterError;
pub use grid::{read_grid, ByteOrder, RasterGrid};
pub use header::{header_path_for, RasterHeader};
pub use options::{HeaderPathRule, LoadOptions, DEFAULT_BUFFER_CAPACITY};
pub use raster::{
    load_raster, load_raster_data, load_raster_data_with, load_raster_header,
    load_raster_header_with, load_raster_with, Raster,
};
pub use stats::{RasterStatistics, StatisticsAccumulator};
pub use transform::GridTransform;

/// Result type for raster operations.
pub type Result<T> = std::result::Result<T, RasterError>;
