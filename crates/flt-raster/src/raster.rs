//! A fully loaded raster: header, grid and statistics.

use crate::grid::{read_grid, RasterGrid};
use crate::options::LoadOptions;
use crate::stats::{RasterStatistics, StatisticsAccumulator};
use crate::transform::GridTransform;
use crate::{RasterHeader, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::debug;

/// A raster whose header, samples and statistics were all loaded successfully.
///
/// The grid and statistics are produced by the same scan over the grid file.
/// A failed load never yields a `Raster`, so there is no partially filled
/// state to observe.
#[derive(Debug, Clone)]
pub struct Raster {
    header: RasterHeader,
    grid: RasterGrid,
    statistics: RasterStatistics,
}

impl Raster {
    /// Load the header and grid for `grid_path`.
    pub fn load<P: AsRef<Path>>(grid_path: P) -> Result<Self> {
        Self::load_with(grid_path, &LoadOptions::default())
    }

    /// Load the header and grid for `grid_path` using explicit options.
    pub fn load_with<P: AsRef<Path>>(grid_path: P, options: &LoadOptions) -> Result<Self> {
        let grid_path = grid_path.as_ref();
        let header = RasterHeader::from_path_with(grid_path, options)?;
        Self::load_data_with(header, grid_path, options)
    }

    /// Load the grid at `grid_path` described by an already parsed header.
    pub fn load_data<P: AsRef<Path>>(header: RasterHeader, grid_path: P) -> Result<Self> {
        Self::load_data_with(header, grid_path, &LoadOptions::default())
    }

    /// Load the grid at `grid_path` using explicit options.
    pub fn load_data_with<P: AsRef<Path>>(
        header: RasterHeader,
        grid_path: P,
        options: &LoadOptions,
    ) -> Result<Self> {
        let grid_path = grid_path.as_ref();
        let file = File::open(grid_path)?;
        let raster = Self::from_reader(header, BufReader::with_capacity(options.buffer_capacity, file))?;

        debug!(
            path = %grid_path.display(),
            samples = raster.grid.len(),
            valid = raster.statistics.count(),
            byte_order = ?header.byte_order,
            "loaded raster grid"
        );

        Ok(raster)
    }

    /// Decode the grid from `reader` and compute statistics in the same pass.
    pub fn from_reader<R: Read>(header: RasterHeader, reader: R) -> Result<Self> {
        let (ncols, nrows) = header.dimensions()?;
        let mut accumulator = StatisticsAccumulator::new(header.nodata);
        let grid = read_grid(reader, header.byte_order, ncols, nrows, |row, col, value| {
            accumulator.push(row, col, value)
        })?;

        Ok(Self {
            header,
            grid,
            statistics: accumulator.finish(),
        })
    }

    /// The header the grid was decoded with.
    pub fn header(&self) -> &RasterHeader {
        &self.header
    }

    /// The decoded samples, no-data cells included.
    pub fn grid(&self) -> &RasterGrid {
        &self.grid
    }

    /// Statistics over the non-nodata samples.
    pub fn statistics(&self) -> &RasterStatistics {
        &self.statistics
    }

    /// Grid/world coordinate mapping for this raster.
    pub fn transform(&self) -> GridTransform {
        self.header.transform()
    }

    /// Whether `value` is the header's no-data sentinel.
    pub fn is_nodata(&self, value: f32) -> bool {
        value == self.header.nodata
    }

    /// The stored sample at the grid index [`GridTransform`] computes for a
    /// world coordinate, or `None` if that row or column index is out of
    /// range. This is not a containment test: with the top-down row mapping a
    /// point in `[miny, miny + cell_size)` gives row `nrows` (`None`), while a
    /// point up to one cell north of the top edge gives row 0. No-data samples
    /// are returned as stored.
    pub fn value_at(&self, world_x: f64, world_y: f64) -> Option<f32> {
        let transform = self.transform();
        let col = usize::try_from(transform.to_grid_column(world_x)).ok()?;
        let row = usize::try_from(transform.to_grid_row(world_y)).ok()?;
        self.grid.get(row, col)
    }

    /// Split into header, grid and statistics.
    pub fn into_parts(self) -> (RasterHeader, RasterGrid, RasterStatistics) {
        (self.header, self.grid, self.statistics)
    }
}

/// Load a raster and its header. See [`Raster::load`].
pub fn load_raster<P: AsRef<Path>>(grid_path: P) -> Result<Raster> {
    Raster::load(grid_path)
}

/// Load a raster and its header using explicit options.
pub fn load_raster_with<P: AsRef<Path>>(grid_path: P, options: &LoadOptions) -> Result<Raster> {
    Raster::load_with(grid_path, options)
}

/// Load only the header that accompanies `grid_path`. See [`RasterHeader::from_path`].
pub fn load_raster_header<P: AsRef<Path>>(grid_path: P) -> Result<RasterHeader> {
    RasterHeader::from_path(grid_path)
}

/// Load only the header using explicit options.
pub fn load_raster_header_with<P: AsRef<Path>>(
    grid_path: P,
    options: &LoadOptions,
) -> Result<RasterHeader> {
    RasterHeader::from_path_with(grid_path, options)
}

/// Load grid data described by `header`. See [`Raster::load_data`].
pub fn load_raster_data<P: AsRef<Path>>(header: &RasterHeader, grid_path: P) -> Result<Raster> {
    Raster::load_data(*header, grid_path)
}

/// Load grid data described by `header` using explicit options.
pub fn load_raster_data_with<P: AsRef<Path>>(
    header: &RasterHeader,
    grid_path: P,
    options: &LoadOptions,
) -> Result<Raster> {
    Raster::load_data_with(*header, grid_path, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::ByteOrder;
    use crate::RasterError;

    fn header(ncols: i32, nrows: i32, byte_order: ByteOrder) -> RasterHeader {
        RasterHeader {
            minx: 100.0,
            miny: 200.0,
            cell_size: 10.0,
            ncols,
            nrows,
            nodata: -9999.0,
            byte_order,
        }
    }

    fn little_endian_bytes(values: &[f32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    #[test]
    fn test_from_reader() {
        let values = [1.0, -9999.0, 3.0, 7.0, 7.0, 2.0];
        let bytes = little_endian_bytes(&values);

        let raster = Raster::from_reader(header(3, 2, ByteOrder::LittleEndian), &bytes[..])
            .expect("Should decode raster");

        assert_eq!(raster.grid().as_slice(), &values);
        let stats = raster.statistics();
        assert_eq!(stats.count(), 5);
        assert_eq!(stats.min_data(), 1.0);
        assert_eq!(stats.max_data(), 7.0);
        assert_eq!((stats.max_row(), stats.max_col()), (1, 0));
        assert!(raster.is_nodata(raster.grid().get(0, 1).unwrap()));
    }

    #[test]
    fn test_negative_dimensions_rejected() {
        let err = Raster::from_reader(header(-1, 2, ByteOrder::BigEndian), &[][..])
            .expect_err("Negative ncols should fail");
        assert!(matches!(
            err,
            RasterError::InvalidDimensions { ncols: -1, nrows: 2 }
        ));
    }

    #[test]
    fn test_value_at() {
        // 2 x 2 grid with origin (100, 200) and 10 unit cells
        let bytes = little_endian_bytes(&[1.0, 2.0, 3.0, 4.0]);
        let raster = Raster::from_reader(header(2, 2, ByteOrder::LittleEndian), &bytes[..]).unwrap();

        // Row index is nrows minus whole cells above miny
        assert_eq!(raster.value_at(105.0, 215.0), Some(3.0));
        assert_eq!(raster.value_at(115.0, 221.0), Some(2.0));
        assert_eq!(raster.value_at(105.0, 209.0), None); // row 2
        assert_eq!(raster.value_at(125.0, 215.0), None); // column 2
        assert_eq!(raster.value_at(95.0, 221.0), Some(1.0)); // -0.5 truncates to column 0
        assert_eq!(raster.value_at(105.0, 231.0), None); // row -1
    }

    #[test]
    fn test_into_parts() {
        let bytes = little_endian_bytes(&[5.0]);
        let raster = Raster::from_reader(header(1, 1, ByteOrder::LittleEndian), &bytes[..]).unwrap();

        let (hdr, grid, stats) = raster.into_parts();
        assert_eq!(hdr.ncols, 1);
        assert_eq!(grid.into_vec(), vec![5.0]);
        assert_eq!(stats.max_data(), 5.0);
    }
}
