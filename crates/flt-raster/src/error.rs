//! Error types for the raster crate.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when loading a float grid raster.
#[derive(Debug, Error)]
pub enum RasterError {
    /// I/O error opening or reading the header or grid file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The grid file ended before every expected sample was read.
    #[error("Grid file truncated: expected {expected} samples, decoded {decoded}")]
    Truncated {
        /// Number of samples the header promises (`ncols * nrows`).
        expected: usize,
        /// Number of complete samples decoded before the stream ended.
        decoded: usize,
    },

    /// A recognized header key holds a value of the wrong type.
    #[error("Invalid value {value:?} for header key {key:?} on line {line}: {reason}")]
    InvalidValue {
        /// 1-based line number in the header file.
        line: usize,
        /// Key as written in the header.
        key: String,
        /// Offending value token.
        value: String,
        /// Underlying parse failure.
        reason: String,
    },

    /// Grid dimensions are negative, or their product overflows.
    #[error("Invalid grid dimensions: {ncols} columns x {nrows} rows")]
    InvalidDimensions {
        /// Column count from the header.
        ncols: i32,
        /// Row count from the header.
        nrows: i32,
    },

    /// The header path could not be derived because the grid path is not UTF-8.
    #[error("Grid path is not valid UTF-8: {}", .0.display())]
    NonUtf8Path(PathBuf),
}
