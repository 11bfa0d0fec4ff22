//! Binary grid decoding for `.flt` files.
//!
//! A grid file is a headerless run of IEEE-754 32-bit floats, row-major with
//! row 0 first. The byte order comes from the header's `byteorder` key.

use crate::{RasterError, Result};
use std::io::{ErrorKind, Read};

/// Upper bound on the up-front allocation for a grid, so a bogus header
/// cannot trigger a huge allocation before the file proves it has the data.
const MAX_INITIAL_CAPACITY: usize = 1 << 22;

/// Byte order of the samples in a grid file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ByteOrder {
    /// Most significant byte first (`MSBFIRST`, or any value other than `LSBFIRST`).
    #[default]
    BigEndian,
    /// Least significant byte first (`LSBFIRST`).
    LittleEndian,
}

impl ByteOrder {
    /// Interpret a `byteorder` header value. Only `lsbfirst` (any case) is
    /// little-endian.
    pub fn from_header_value(value: &str) -> Self {
        if value.eq_ignore_ascii_case("lsbfirst") {
            ByteOrder::LittleEndian
        } else {
            ByteOrder::BigEndian
        }
    }

    /// The canonical header spelling of this byte order.
    pub fn header_value(self) -> &'static str {
        match self {
            ByteOrder::BigEndian => "MSBFIRST",
            ByteOrder::LittleEndian => "LSBFIRST",
        }
    }

    /// The sample decoder for this byte order.
    pub fn decoder(self) -> fn([u8; 4]) -> f32 {
        match self {
            ByteOrder::BigEndian => decode_msb_first,
            ByteOrder::LittleEndian => decode_lsb_first,
        }
    }

    /// Decode one sample stored in this byte order.
    pub fn decode_f32(self, bytes: [u8; 4]) -> f32 {
        (self.decoder())(bytes)
    }
}

/// Reassemble `b0 b1 b2 b3` (file order) as `b3 b2 b1 b0` and reinterpret the bits.
fn decode_lsb_first(bytes: [u8; 4]) -> f32 {
    let [b0, b1, b2, b3] = bytes.map(u32::from);
    f32::from_bits((b3 << 24) | (b2 << 16) | (b1 << 8) | b0)
}

fn decode_msb_first(bytes: [u8; 4]) -> f32 {
    f32::from_bits(u32::from_be_bytes(bytes))
}

/// A decoded grid of samples.
///
/// Samples are stored row-major (row 0 first, columns varying fastest) and
/// include no-data cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RasterGrid {
    data: Vec<f32>,
    ncols: usize,
    nrows: usize,
}

impl RasterGrid {
    /// Number of columns.
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Number of rows.
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Total number of samples (`ncols * nrows`).
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the grid holds no samples.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Sample at `(row, col)`, or `None` if either index is out of range.
    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row >= self.nrows || col >= self.ncols {
            return None;
        }
        self.data.get(row * self.ncols + col).copied()
    }

    /// Iterate over rows, north to south.
    pub fn rows(&self) -> impl Iterator<Item = &[f32]> + '_ {
        (0..self.nrows).map(move |row| &self.data[row * self.ncols..(row + 1) * self.ncols])
    }

    /// All samples in row-major order.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Take ownership of the sample buffer.
    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }
}

/// Decode `ncols * nrows` samples from `reader`.
///
/// `visit` is called with `(row, col, value)` for every sample in scan order
/// as soon as it is decoded. Bytes after the last expected sample are never
/// read.
///
/// # Errors
/// [`RasterError::Truncated`] if the stream ends early, or
/// [`RasterError::Io`] for any other read failure.
pub fn read_grid<R, F>(
    mut reader: R,
    byte_order: ByteOrder,
    ncols: usize,
    nrows: usize,
    mut visit: F,
) -> Result<RasterGrid>
where
    R: Read,
    F: FnMut(usize, usize, f32),
{
    let expected = ncols
        .checked_mul(nrows)
        .ok_or(RasterError::InvalidDimensions {
            ncols: i32::try_from(ncols).unwrap_or(i32::MAX),
            nrows: i32::try_from(nrows).unwrap_or(i32::MAX),
        })?;
    let decode = byte_order.decoder();
    let mut data = Vec::with_capacity(expected.min(MAX_INITIAL_CAPACITY));
    let mut buf = [0u8; 4];

    for row in 0..nrows {
        for col in 0..ncols {
            if let Err(e) = reader.read_exact(&mut buf) {
                return Err(match e.kind() {
                    ErrorKind::UnexpectedEof => RasterError::Truncated {
                        expected,
                        decoded: data.len(),
                    },
                    _ => RasterError::Io(e),
                });
            }
            let value = decode(buf);
            data.push(value);
            visit(row, col, value);
        }
    }

    Ok(RasterGrid { data, ncols, nrows })
}
