//! Cross-section profile extraction from elevation rows.

use crate::geometry::Point;
use crate::grid::{ElevationGrid, GridError};

/// How consecutive profile points are connected when building sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum ProfileStyle {
    /// Straight segments between points; sections are lofted ruled.
    #[default]
    Linear,
    /// Smooth curve through the points; sections are blended together.
    /// Far more expensive per point than [`ProfileStyle::Linear`].
    Smooth,
}

/// Immutable scaling parameters for one model build.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScaleConfig {
    /// Model size along the X axis in mm; x coordinates span `0..=x_scale`.
    pub x_scale: f64,
    /// Relief multiplier; 1 keeps the true vertical aspect ratio.
    pub z_exaggeration: f64,
    /// Added to every height, giving the minimum thickness of the piece in mm.
    pub z_adder: f64,
    /// Stride for sampling columns and rows. Index 0 is always kept; the
    /// final index is kept only when it falls on the stride, so the far edge
    /// of the grid may be dropped.
    pub subsample: usize,
    /// Profile connection style.
    pub style: ProfileStyle,
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            x_scale: 100.0,
            z_exaggeration: 1.0,
            z_adder: 1.0,
            subsample: 50,
            style: ProfileStyle::Linear,
        }
    }
}

/// One planar cross-section: ordered `(x, height)` points at a fixed depth.
///
/// Consecutive points connect in sequence; the outline closes back to the
/// baseline (height 0) under the last x position.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Profile {
    pub points: Vec<Point>,
}

impl Profile {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// X position of the last point, where the outline drops to the baseline.
    pub fn last_x(&self) -> Option<f64> {
        self.points.last().map(|p| p.x)
    }
}

/// Indices `0, stride, 2 * stride, ...` below `len`.
///
/// The final index is not force-included, matching the subsampling of both
/// profile points and section rows.
pub fn stride_indices(len: usize, stride: usize) -> Vec<usize> {
    (0..len).step_by(stride.max(1)).collect()
}

/// Extracts the scaled cross-section profile for one grid row.
///
/// X positions remap the column index linearly onto `0..=x_scale`. Heights
/// are normalized against the global min/max of the whole grid so every row
/// shares one vertical scale, then scaled so that unexaggerated relief keeps
/// the true aspect ratio against the physical `dx_km` footprint:
/// `true_z_scale = x_scale * (max - min) / (dx_km * 1000)`.
///
/// Panics if `row` is out of range for a non-empty grid.
pub fn extract_profile(
    grid: &ElevationGrid,
    row: usize,
    dx_km: f64,
    cfg: &ScaleConfig,
) -> Result<Profile, GridError> {
    if cfg.subsample == 0 {
        return Err(GridError::InvalidFactor(0));
    }
    if !(dx_km > 0.0 && dx_km.is_finite()) {
        return Err(GridError::InvalidExtent(dx_km));
    }
    let (min, max) = grid.min_max().ok_or(GridError::EmptyGrid)?;
    let dz = max - min;
    if dz <= 0.0 {
        // Flat input would divide by zero during normalization.
        return Err(GridError::EmptyGrid);
    }

    let cols = grid.cols();
    let true_z_scale = cfg.x_scale * dz / (dx_km * 1000.0);
    let samples = grid.row(row);
    let points = stride_indices(cols, cfg.subsample)
        .into_iter()
        .map(|col| {
            let x = if cols == 1 {
                0.0
            } else {
                col as f64 / (cols - 1) as f64 * cfg.x_scale
            };
            let z_norm = (samples[col] - min) / dz;
            let z = z_norm * true_z_scale * cfg.z_exaggeration + cfg.z_adder;
            Point::new(x, z)
        })
        .collect();
    Ok(Profile { points })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::ElevationGrid;

    fn cfg(x_scale: f64, subsample: usize) -> ScaleConfig {
        ScaleConfig {
            x_scale,
            z_exaggeration: 1.0,
            z_adder: 0.0,
            subsample,
            style: ProfileStyle::Linear,
        }
    }

    #[test]
    fn true_scale_maps_extremes() {
        // min 0, max 10, dx 1 km, x_scale 100 => highest cell at z = 1.0.
        let grid = ElevationGrid::from_rows(vec![vec![0.0, 10.0]]).unwrap();
        let profile = extract_profile(&grid, 0, 1.0, &cfg(100.0, 1)).unwrap();
        assert!((profile.points[0].y - 0.0).abs() < 1e-12);
        assert!((profile.points[1].y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn x_positions_span_scale() {
        let grid = ElevationGrid::from_rows(vec![vec![0.0, 5.0, 10.0]]).unwrap();
        let profile = extract_profile(&grid, 0, 1.0, &cfg(10.0, 1)).unwrap();
        let xs: Vec<f64> = profile.points.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 5.0, 10.0]);
    }

    #[test]
    fn heights_use_global_min_max() {
        // Row 0 is all zeros but the grid max lives in row 1, so row 0
        // normalizes to the bottom of the shared scale.
        let grid = ElevationGrid::from_rows(vec![vec![0.0, 0.0], vec![0.0, 10.0]]).unwrap();
        let profile = extract_profile(&grid, 0, 1.0, &cfg(100.0, 1)).unwrap();
        assert!(profile.points.iter().all(|p| p.y.abs() < 1e-12));
    }

    #[test]
    fn exaggeration_and_adder_applied() {
        let grid = ElevationGrid::from_rows(vec![vec![0.0, 10.0]]).unwrap();
        let config = ScaleConfig {
            x_scale: 100.0,
            z_exaggeration: 2.0,
            z_adder: 3.0,
            subsample: 1,
            style: ProfileStyle::Linear,
        };
        let profile = extract_profile(&grid, 0, 1.0, &config).unwrap();
        assert!((profile.points[0].y - 3.0).abs() < 1e-12);
        assert!((profile.points[1].y - 5.0).abs() < 1e-12);
    }

    #[test]
    fn subsample_keeps_first_not_last() {
        // 5 columns with stride 3 keep indices 0 and 3; the far edge at
        // index 4 is dropped.
        let grid =
            ElevationGrid::from_rows(vec![vec![0.0, 1.0, 2.0, 3.0, 4.0]]).unwrap();
        let profile = extract_profile(&grid, 0, 1.0, &cfg(4.0, 3)).unwrap();
        let xs: Vec<f64> = profile.points.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 3.0]);
    }

    #[test]
    fn flat_grid_rejected() {
        let grid = ElevationGrid::from_rows(vec![vec![5.0, 5.0], vec![5.0, 5.0]]).unwrap();
        assert_eq!(
            extract_profile(&grid, 0, 1.0, &cfg(100.0, 1)).unwrap_err(),
            GridError::EmptyGrid
        );
    }

    #[test]
    fn empty_grid_rejected() {
        let grid = ElevationGrid::from_rows(Vec::new()).unwrap();
        assert_eq!(
            extract_profile(&grid, 0, 1.0, &cfg(100.0, 1)).unwrap_err(),
            GridError::EmptyGrid
        );
    }

    #[test]
    fn single_column_maps_to_origin() {
        let grid = ElevationGrid::from_rows(vec![vec![0.0], vec![10.0]]).unwrap();
        let profile = extract_profile(&grid, 1, 1.0, &cfg(100.0, 1)).unwrap();
        assert_eq!(profile.len(), 1);
        assert_eq!(profile.points[0].x, 0.0);
    }

    #[test]
    fn zero_stride_rejected() {
        let grid = ElevationGrid::from_rows(vec![vec![0.0, 1.0]]).unwrap();
        assert_eq!(
            extract_profile(&grid, 0, 1.0, &cfg(10.0, 0)).unwrap_err(),
            GridError::InvalidFactor(0)
        );
    }
}
