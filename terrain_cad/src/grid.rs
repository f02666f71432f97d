//! Elevation grid storage and block-mean coarsening.

/// Errors raised while validating or resampling an elevation grid.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GridError {
    #[error("coarsening factor must be a positive integer, got {0}")]
    InvalidFactor(usize),

    #[error("elevation grid is empty or has no relief")]
    EmptyGrid,

    #[error("row {row} has {got} columns, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        got: usize,
    },

    #[error("non-finite elevation at ({row}, {col})")]
    NonFinite { row: usize, col: usize },

    #[error("physical extent must be positive, got {0} km")]
    InvalidExtent(f64),
}

/// Real-world footprint covered by a grid, in kilometers.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PhysicalExtents {
    /// Distance along the column (X) axis in km.
    pub dx_km: f64,
    /// Distance along the row (Y) axis in km.
    pub dy_km: f64,
}

impl PhysicalExtents {
    pub fn new(dx_km: f64, dy_km: f64) -> Self {
        Self { dx_km, dy_km }
    }

    /// Checks that both distances are positive and finite.
    pub fn validate(&self) -> Result<(), GridError> {
        for d in [self.dx_km, self.dy_km] {
            if !(d > 0.0 && d.is_finite()) {
                return Err(GridError::InvalidExtent(d));
            }
        }
        Ok(())
    }
}

/// Rectangular grid of elevation samples in meters, stored row-major.
///
/// The row axis maps to the physical Y direction and the column axis to X.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ElevationGrid {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl ElevationGrid {
    /// Builds a grid from nested rows, validating that every row has the
    /// same length and that all samples are finite.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, GridError> {
        let expected = rows.first().map(|r| r.len()).unwrap_or(0);
        let mut data = Vec::with_capacity(rows.len() * expected);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != expected {
                return Err(GridError::RaggedRow {
                    row: i,
                    expected,
                    got: row.len(),
                });
            }
            for (j, &v) in row.iter().enumerate() {
                if !v.is_finite() {
                    return Err(GridError::NonFinite { row: i, col: j });
                }
                data.push(v);
            }
        }
        Ok(Self {
            rows: rows.len(),
            cols: expected,
            data,
        })
    }

    /// Builds a grid from flat row-major data and an explicit shape.
    pub fn from_flat(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self, GridError> {
        if data.len() != rows * cols {
            return Err(GridError::RaggedRow {
                row: rows,
                expected: rows * cols,
                got: data.len(),
            });
        }
        if let Some(i) = data.iter().position(|v| !v.is_finite()) {
            return Err(GridError::NonFinite {
                row: i / cols.max(1),
                col: i % cols.max(1),
            });
        }
        Ok(Self { rows, cols, data })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the sample at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    /// Returns one row as a slice.
    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// Returns the global `(min, max)` over all samples, or `None` for an
    /// empty grid.
    pub fn min_max(&self) -> Option<(f64, f64)> {
        let mut it = self.data.iter();
        let first = *it.next()?;
        let mut min = first;
        let mut max = first;
        for &v in it {
            if v < min {
                min = v;
            }
            if v > max {
                max = v;
            }
        }
        Some((min, max))
    }

    /// Reduces resolution by averaging `factor` x `factor` blocks.
    ///
    /// The output shape is `(rows / factor, cols / factor)`; trailing rows
    /// and columns that do not fill a complete block are discarded. A factor
    /// of 1 returns an identical grid.
    pub fn coarsen(&self, factor: usize) -> Result<ElevationGrid, GridError> {
        if factor == 0 {
            return Err(GridError::InvalidFactor(factor));
        }
        if factor == 1 {
            return Ok(self.clone());
        }
        let out_rows = self.rows / factor;
        let out_cols = self.cols / factor;
        let mut data = Vec::with_capacity(out_rows * out_cols);
        let block = (factor * factor) as f64;
        for br in 0..out_rows {
            for bc in 0..out_cols {
                let mut sum = 0.0;
                for r in br * factor..(br + 1) * factor {
                    for c in bc * factor..(bc + 1) * factor {
                        sum += self.get(r, c);
                    }
                }
                data.push(sum / block);
            }
        }
        Ok(ElevationGrid {
            rows: out_rows,
            cols: out_cols,
            data,
        })
    }
}
