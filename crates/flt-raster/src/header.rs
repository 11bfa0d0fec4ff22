//! Text header parsing for `.hdr` sidecar files.
//!
//! A header is a sequence of `key value` lines. Only lines that split into
//! exactly two whitespace-separated tokens are considered; everything else
//! (blank lines, comments, lines with extra tokens) is skipped.
//!
//! ```text
//! ncols         4
//! nrows         3
//! xllcorner     500000.0
//! yllcorner     4100000.0
//! cellsize      30.0
//! NODATA_value  -9999
//! byteorder     LSBFIRST
//! ```

use crate::grid::ByteOrder;
use crate::options::{HeaderPathRule, LoadOptions};
use crate::transform::GridTransform;
use crate::{RasterError, Result};
use std::fmt::Display;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, trace};

/// Parsed contents of a raster header.
///
/// Keys that never appear in the header leave their field at the zero value
/// (`0`, `0.0`, big-endian). The parser does not check that the dimensions
/// describe a usable grid; that happens when grid data is loaded.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RasterHeader {
    /// World X of the lower-left corner (`xllcorner`).
    pub minx: f64,
    /// World Y of the lower-left corner (`yllcorner`).
    pub miny: f64,
    /// Size of one square cell in world units (`cellsize`).
    pub cell_size: f64,
    /// Number of columns (`ncols`).
    pub ncols: i32,
    /// Number of rows (`nrows`).
    pub nrows: i32,
    /// Sentinel marking cells without a measurement (`nodata_value`).
    pub nodata: f32,
    /// Byte order of the samples in the grid file (`byteorder`).
    pub byte_order: ByteOrder,
}

impl RasterHeader {
    /// Load the header that accompanies a grid file.
    ///
    /// The header path is derived from `grid_path` by replacing every `.flt`
    /// with `.hdr`; see [`header_path_for`].
    pub fn from_path<P: AsRef<Path>>(grid_path: P) -> Result<Self> {
        Self::from_path_with(grid_path, &LoadOptions::default())
    }

    /// Load the header that accompanies a grid file using explicit options.
    pub fn from_path_with<P: AsRef<Path>>(grid_path: P, options: &LoadOptions) -> Result<Self> {
        let header_path = header_path_for(grid_path.as_ref(), options.header_path)?;
        let file = File::open(&header_path)?;
        let header = Self::from_reader(BufReader::with_capacity(options.buffer_capacity, file))?;

        debug!(
            path = %header_path.display(),
            ncols = header.ncols,
            nrows = header.nrows,
            cell_size = header.cell_size,
            byte_order = ?header.byte_order,
            "loaded raster header"
        );

        Ok(header)
    }

    /// Parse a header from any buffered reader.
    ///
    /// Lines end at `\n`, `\r` or `\r\n`. Bytes that are not valid UTF-8 are
    /// replaced, so they only affect the line they appear on. Parsing stops at
    /// the first recognized key whose value fails to parse.
    pub fn from_reader<R: BufRead>(mut reader: R) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;

        let mut header = Self::default();
        for (index, line) in HeaderLines::new(&bytes).enumerate() {
            header.apply_line(index + 1, &String::from_utf8_lossy(line))?;
        }
        Ok(header)
    }

    /// Parse a header held in memory.
    pub fn parse(text: &str) -> Result<Self> {
        Self::from_reader(text.as_bytes())
    }

    /// Whether the grid samples are stored least significant byte first.
    pub fn is_little_endian(&self) -> bool {
        self.byte_order == ByteOrder::LittleEndian
    }

    /// Grid dimensions as `(ncols, nrows)`.
    ///
    /// # Errors
    /// [`RasterError::InvalidDimensions`] if either dimension is negative or
    /// their product does not fit in `usize`.
    pub fn dimensions(&self) -> Result<(usize, usize)> {
        let invalid = || RasterError::InvalidDimensions {
            ncols: self.ncols,
            nrows: self.nrows,
        };
        let ncols = usize::try_from(self.ncols).map_err(|_| invalid())?;
        let nrows = usize::try_from(self.nrows).map_err(|_| invalid())?;
        ncols.checked_mul(nrows).ok_or_else(invalid)?;
        Ok((ncols, nrows))
    }

    /// Number of samples the grid file must contain.
    pub fn sample_count(&self) -> Result<usize> {
        let (ncols, nrows) = self.dimensions()?;
        Ok(ncols * nrows)
    }

    /// Grid/world coordinate mapping for this header.
    pub fn transform(&self) -> GridTransform {
        GridTransform::from(self)
    }

    fn apply_line(&mut self, line_no: usize, line: &str) -> Result<()> {
        let Some((key, value)) = split_key_value(line) else {
            trace!(line = line_no, "skipping header line");
            return Ok(());
        };

        if key.eq_ignore_ascii_case("xllcorner") {
            self.minx = parse_field(line_no, key, value)?;
        } else if key.eq_ignore_ascii_case("yllcorner") {
            self.miny = parse_field(line_no, key, value)?;
        } else if key.eq_ignore_ascii_case("cellsize") {
            self.cell_size = parse_field(line_no, key, value)?;
        } else if key.eq_ignore_ascii_case("ncols") {
            self.ncols = parse_field(line_no, key, value)?;
        } else if key.eq_ignore_ascii_case("nrows") {
            self.nrows = parse_field(line_no, key, value)?;
        } else if key.eq_ignore_ascii_case("nodata_value") {
            self.nodata = parse_field(line_no, key, value)?;
        } else if key.eq_ignore_ascii_case("byteorder") {
            self.byte_order = ByteOrder::from_header_value(value);
        } else {
            trace!(line = line_no, key, "ignoring unknown header key");
        }

        Ok(())
    }
}

impl FromStr for RasterHeader {
    type Err = RasterError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Derive the header path for a grid path.
///
/// With [`HeaderPathRule::LiteralReplace`] every occurrence of `.flt` is
/// replaced, not only the extension: `a.flt.d/b.flt` becomes `a.hdr.d/b.hdr`.
/// A path without `.flt` maps to itself under either rule.
pub fn header_path_for(grid_path: &Path, rule: HeaderPathRule) -> Result<PathBuf> {
    match rule {
        HeaderPathRule::LiteralReplace => {
            let text = grid_path
                .to_str()
                .ok_or_else(|| RasterError::NonUtf8Path(grid_path.to_path_buf()))?;
            Ok(PathBuf::from(text.replace(".flt", ".hdr")))
        }
        HeaderPathRule::ReplaceExtension => {
            if grid_path.extension().is_some_and(|ext| ext == "flt") {
                Ok(grid_path.with_extension("hdr"))
            } else {
                Ok(grid_path.to_path_buf())
            }
        }
    }
}

/// Raw header lines split on `\n`, `\r` and `\r\n`, terminators excluded.
struct HeaderLines<'a> {
    rest: &'a [u8],
}

impl<'a> HeaderLines<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { rest: bytes }
    }
}

impl<'a> Iterator for HeaderLines<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }

        let Some(end) = self.rest.iter().position(|&b| b == b'\n' || b == b'\r') else {
            let line = self.rest;
            self.rest = &[];
            return Some(line);
        };

        let line = &self.rest[..end];
        let terminator = if self.rest[end..].starts_with(b"\r\n") { 2 } else { 1 };
        self.rest = &self.rest[end + terminator..];
        Some(line)
    }
}

/// Whitespace as understood by the header format: ASCII space, tab, newline,
/// vertical tab, form feed and carriage return.
fn is_header_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0B' | '\x0C' | '\r')
}

/// Split a line into `(key, value)` if it has exactly two tokens.
///
/// Leading whitespace produces an empty first token, so indented lines never
/// qualify. Trailing whitespace is ignored.
fn split_key_value(line: &str) -> Option<(&str, &str)> {
    if line.starts_with(is_header_whitespace) {
        return None;
    }

    let mut tokens = line.split(is_header_whitespace).filter(|t| !t.is_empty());
    let key = tokens.next()?;
    let value = tokens.next()?;
    if tokens.next().is_some() {
        return None;
    }

    Some((key, value))
}

fn parse_field<T>(line: usize, key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    value.parse().map_err(|e: T::Err| RasterError::InvalidValue {
        line,
        key: key.to_string(),
        value: value.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "ncols 4\n\
                          nrows 3\n\
                          xllcorner 500000.5\n\
                          yllcorner -12.25\n\
                          cellsize 30\n\
                          NODATA_value -9999\n\
                          byteorder LSBFIRST\n";

    #[test]
    fn test_parse_all_keys() {
        let header = RasterHeader::parse(SAMPLE).expect("Should parse header");

        assert_eq!(header.ncols, 4);
        assert_eq!(header.nrows, 3);
        assert_eq!(header.minx, 500000.5);
        assert_eq!(header.miny, -12.25);
        assert_eq!(header.cell_size, 30.0);
        assert_eq!(header.nodata, -9999.0);
        assert_eq!(header.byte_order, ByteOrder::LittleEndian);
        assert!(header.is_little_endian());
    }

    #[test]
    fn test_keys_are_case_insensitive() {
        let header = RasterHeader::parse("NCOLS 2\nNRows 5\nCellSize 1.5\nXLLCORNER 3\n")
            .expect("Should parse header");

        assert_eq!(header.ncols, 2);
        assert_eq!(header.nrows, 5);
        assert_eq!(header.cell_size, 1.5);
        assert_eq!(header.minx, 3.0);
    }

    #[test]
    fn test_byteorder_values() {
        let lsb = RasterHeader::parse("byteorder lsbfirst").unwrap();
        assert_eq!(lsb.byte_order, ByteOrder::LittleEndian);

        let msb = RasterHeader::parse("byteorder MSBFIRST").unwrap();
        assert_eq!(msb.byte_order, ByteOrder::BigEndian);

        // Anything that is not lsbfirst means big-endian
        let other = RasterHeader::parse("byteorder VMS_FFLOAT").unwrap();
        assert_eq!(other.byte_order, ByteOrder::BigEndian);
    }

    #[test]
    fn test_missing_keys_keep_zero_defaults() {
        let header = RasterHeader::parse("ncols 7\n").unwrap();

        assert_eq!(header.ncols, 7);
        assert_eq!(header.nrows, 0);
        assert_eq!(header.minx, 0.0);
        assert_eq!(header.miny, 0.0);
        assert_eq!(header.cell_size, 0.0);
        assert_eq!(header.nodata, 0.0);
        assert_eq!(header.byte_order, ByteOrder::BigEndian);
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let text = "ncols 4\n\
                    \n\
                    nrows 3 extra\n\
                    # a comment line\n\
                    cellsize\n\
                    nrows 6\n\
                    projection UTM\n";
        let header = RasterHeader::parse(text).expect("Malformed lines should not abort parsing");

        assert_eq!(header.ncols, 4);
        assert_eq!(header.nrows, 6);
        assert_eq!(header.cell_size, 0.0);
    }

    #[test]
    fn test_indented_line_is_skipped() {
        let header = RasterHeader::parse("  ncols 4\nnrows 2\t \r\n").unwrap();

        assert_eq!(header.ncols, 0);
        assert_eq!(header.nrows, 2);
    }

    #[test]
    fn test_non_utf8_comment_is_skipped() {
        let header = RasterHeader::from_reader(&b"# elevation in \xB0C-free metres\nncols 4\nnrows 3\n"[..])
            .expect("A bad byte in a comment should not abort parsing");

        assert_eq!(header.ncols, 4);
        assert_eq!(header.nrows, 3);
    }

    #[test]
    fn test_non_utf8_value_is_invalid() {
        let err = RasterHeader::from_reader(&b"nrows 3\nncols 4\xFF\n"[..]).unwrap_err();
        assert!(matches!(err, RasterError::InvalidValue { line: 2, .. }));
    }

    #[test]
    fn test_carriage_return_line_endings() {
        let header = RasterHeader::parse("ncols 4\rnrows 3\rcellsize 10\r").unwrap();

        assert_eq!(header.ncols, 4);
        assert_eq!(header.nrows, 3);
        assert_eq!(header.cell_size, 10.0);
    }

    #[test]
    fn test_mixed_line_endings_count_lines() {
        let err = RasterHeader::parse("ncols 4\r\nnrows 3\rcellsize ten\n").unwrap_err();
        assert!(matches!(err, RasterError::InvalidValue { line: 3, .. }));
    }

    #[test]
    fn test_later_value_wins() {
        let header = RasterHeader::parse("cellsize 1\ncellsize 2.5\n").unwrap();
        assert_eq!(header.cell_size, 2.5);
    }

    #[test]
    fn test_invalid_value_aborts() {
        let err = RasterHeader::parse("ncols 4\nnrows three\ncellsize 1\n")
            .expect_err("Non-numeric nrows should fail");

        match err {
            RasterError::InvalidValue { line, key, value, .. } => {
                assert_eq!(line, 2);
                assert_eq!(key, "nrows");
                assert_eq!(value, "three");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_integer_field_rejects_fraction() {
        let err = RasterHeader::parse("ncols 4.5").unwrap_err();
        assert!(matches!(err, RasterError::InvalidValue { .. }));
    }

    #[test]
    fn test_unparseable_unknown_key_is_ignored() {
        let header = RasterHeader::parse("units meters\nncols 1\n").unwrap();
        assert_eq!(header.ncols, 1);
    }

    #[test]
    fn test_from_str() {
        let header: RasterHeader = "nrows 9".parse().unwrap();
        assert_eq!(header.nrows, 9);
    }

    #[test]
    fn test_sample_count() {
        let header = RasterHeader::parse("ncols 4\nnrows 3\n").unwrap();
        assert_eq!(header.sample_count().unwrap(), 12);

        let empty = RasterHeader::default();
        assert_eq!(empty.sample_count().unwrap(), 0);

        let negative = RasterHeader::parse("ncols -4\nnrows 3\n").unwrap();
        assert!(matches!(
            negative.sample_count(),
            Err(RasterError::InvalidDimensions { ncols: -4, nrows: 3 })
        ));
    }

    #[test]
    fn test_header_path_literal_replace() {
        let path = header_path_for(Path::new("data/dem.flt"), HeaderPathRule::LiteralReplace)
            .unwrap();
        assert_eq!(path, PathBuf::from("data/dem.hdr"));

        // Every occurrence is rewritten, not just the extension
        let path = header_path_for(
            Path::new("runs.flt.d/dem.flt"),
            HeaderPathRule::LiteralReplace,
        )
        .unwrap();
        assert_eq!(path, PathBuf::from("runs.hdr.d/dem.hdr"));

        let path = header_path_for(Path::new("dem.bin"), HeaderPathRule::LiteralReplace).unwrap();
        assert_eq!(path, PathBuf::from("dem.bin"));
    }

    #[test]
    fn test_header_path_replace_extension() {
        let path = header_path_for(
            Path::new("runs.flt.d/dem.flt"),
            HeaderPathRule::ReplaceExtension,
        )
        .unwrap();
        assert_eq!(path, PathBuf::from("runs.flt.d/dem.hdr"));

        let path =
            header_path_for(Path::new("dem.bin"), HeaderPathRule::ReplaceExtension).unwrap();
        assert_eq!(path, PathBuf::from("dem.bin"));
    }
}
