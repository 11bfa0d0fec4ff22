//! Single-pass summary statistics over a grid.
//!
//! Mean and variance use Welford's online update, so the grid is scanned
//! exactly once while it is decoded. Samples equal to the no-data sentinel
//! are skipped by every statistic.

/// Running state for one scan over a grid.
#[derive(Debug, Clone)]
pub struct StatisticsAccumulator {
    nodata: f32,
    count: u64,
    mean: f64,
    sum_sq: f64,
    min_data: f32,
    max_data: f32,
    max_row: usize,
    max_col: usize,
}

impl StatisticsAccumulator {
    /// Start a scan that excludes samples equal to `nodata`.
    pub fn new(nodata: f32) -> Self {
        Self {
            nodata,
            count: 0,
            mean: 0.0,
            sum_sq: 0.0,
            min_data: f32::INFINITY,
            max_data: f32::NEG_INFINITY,
            max_row: 0,
            max_col: 0,
        }
    }

    /// Feed the sample at `(row, col)`. Samples must arrive in scan order for
    /// the maximum's location to be the first occurrence.
    pub fn push(&mut self, row: usize, col: usize, value: f32) {
        // Exact comparison: a NaN sample is never no-data.
        if value == self.nodata {
            return;
        }

        let x = f64::from(value);
        self.count += 1;
        let delta = x - self.mean;
        self.mean += delta / self.count as f64;
        self.sum_sq += delta * (x - self.mean);

        // NaN wins once seen; -0.0 orders below 0.0
        if value.is_nan()
            || value < self.min_data
            || (value == self.min_data && value.is_sign_negative())
        {
            self.min_data = value;
        }
        if value > self.max_data {
            self.max_data = value;
            self.max_row = row;
            self.max_col = col;
        }
    }

    /// Number of samples accepted so far.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Close the scan and derive the reported statistics.
    pub fn finish(self) -> RasterStatistics {
        // n == 1 divides zero by zero and yields NaN; left as is.
        let variance = if self.count > 0 {
            self.sum_sq / (self.count as f64 - 1.0)
        } else {
            0.0
        };
        let stddev = variance.sqrt();

        RasterStatistics {
            count: self.count,
            mean: self.mean,
            variance,
            stddev,
            min_data: self.min_data,
            max_data: self.max_data,
            del_data: self.max_data - self.min_data,
            min_limit: (self.mean - stddev) as f32,
            max_limit: (self.mean + stddev) as f32,
            max_row: self.max_row,
            max_col: self.max_col,
        }
    }
}

/// Summary of the non-nodata samples of a grid.
///
/// When every sample is no-data, `min_data` is `+inf`, `max_data` is `-inf`
/// and `del_data` is `-inf`. With exactly one valid sample the variance is
/// NaN, which carries into `stddev`, `min_limit` and `max_limit`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RasterStatistics {
    count: u64,
    mean: f64,
    variance: f64,
    stddev: f64,
    min_data: f32,
    max_data: f32,
    del_data: f32,
    min_limit: f32,
    max_limit: f32,
    max_row: usize,
    max_col: usize,
}

impl RasterStatistics {
    /// Number of samples that were not no-data.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Mean of the valid samples (0 when there are none).
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Sample variance, `sum_sq / (n - 1)`, or 0 when there are no samples.
    pub fn variance(&self) -> f64 {
        self.variance
    }

    /// Square root of [`variance`](Self::variance).
    pub fn stddev(&self) -> f64 {
        self.stddev
    }

    /// Smallest valid sample.
    pub fn min_data(&self) -> f32 {
        self.min_data
    }

    /// Largest valid sample.
    pub fn max_data(&self) -> f32 {
        self.max_data
    }

    /// `max_data - min_data`.
    pub fn del_data(&self) -> f32 {
        self.del_data
    }

    /// Lower edge of the one-sigma band, `mean - stddev`.
    pub fn min_limit(&self) -> f32 {
        self.min_limit
    }

    /// Upper edge of the one-sigma band, `mean + stddev`.
    pub fn max_limit(&self) -> f32 {
        self.max_limit
    }

    /// Row of the first sample equal to `max_data`.
    pub fn max_row(&self) -> usize {
        self.max_row
    }

    /// Column of the first sample equal to `max_data`.
    pub fn max_col(&self) -> usize {
        self.max_col
    }
}
