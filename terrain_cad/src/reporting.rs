//! Summary metrics and pre-flight cost estimates for a model build.

use crate::grid::{ElevationGrid, PhysicalExtents};
use crate::profile::{stride_indices, ProfileStyle, ScaleConfig};

/// Relative per-point weight of the smooth loft against the linear loft.
///
/// Heuristic bound, not a measured constant: the blended loft both densifies
/// every span and fits curvature through every retained point, so it grows
/// much faster than the ruled path. Callers wanting wall-clock figures
/// should time a build at a coarse subsample first.
pub const SMOOTH_COST_WEIGHT: f64 = 40.0;

/// Derived geometry metrics for a configured model build.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ModelReport {
    /// Retained points per mm along the X axis (resolution measure).
    pub points_per_mm: f64,
    /// Model X:Y aspect ratio, both sides rounded for display.
    pub aspect: String,
    /// Model depth along Y in mm, preserving the physical Y:X ratio.
    pub y_scale: f64,
    /// Number of lofted cross-sections.
    pub sections: usize,
    /// Retained points in each cross-section.
    pub points_per_section: usize,
}

impl ModelReport {
    /// Display rows for logs or console output.
    pub fn rows(&self) -> Vec<String> {
        vec![
            format!("sections: {}", self.sections),
            format!("points per section: {}", self.points_per_section),
            format!("points per mm: {:.3}", self.points_per_mm),
            format!("aspect ratio: {}", self.aspect),
            format!("model depth: {:.1} mm", self.y_scale),
        ]
    }
}

/// Derives the model report from the build inputs.
///
/// `points_per_mm = cols / subsample / x_scale` and the aspect string is
/// `"{x_scale:.0}:{y_scale:.0}"` with `y_scale = x_scale * dy / dx`, so
/// `y_scale / x_scale` equals the physical `dy / dx` exactly.
pub fn model_report(
    grid: &ElevationGrid,
    extents: &PhysicalExtents,
    cfg: &ScaleConfig,
) -> ModelReport {
    let y_scale = cfg.x_scale * extents.dy_km / extents.dx_km;
    ModelReport {
        points_per_mm: grid.cols() as f64 / cfg.subsample as f64 / cfg.x_scale,
        aspect: format!("{:.0}:{:.0}", cfg.x_scale, y_scale),
        y_scale,
        sections: stride_indices(grid.rows(), cfg.subsample).len(),
        points_per_section: stride_indices(grid.cols(), cfg.subsample).len(),
    }
}

/// Pre-flight cost estimate for a build.
///
/// The subsample interval is the primary cost knob: it bounds the retained
/// point count, which is what the loft cost follows, not the raw grid size.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CostEstimate {
    /// Points retained after subsampling, over all sections.
    pub total_points: usize,
    /// Style the estimate was computed for.
    pub style: ProfileStyle,
    /// Point count weighted by the style factor; linear style weighs 1.
    pub relative_cost: f64,
}

/// Estimates the relative build cost before any geometry work.
pub fn estimate_cost(grid: &ElevationGrid, cfg: &ScaleConfig) -> CostEstimate {
    let sections = stride_indices(grid.rows(), cfg.subsample).len();
    let per_section = stride_indices(grid.cols(), cfg.subsample).len();
    let total_points = sections * per_section;
    let weight = match cfg.style {
        ProfileStyle::Linear => 1.0,
        ProfileStyle::Smooth => SMOOTH_COST_WEIGHT,
    };
    CostEstimate {
        total_points,
        style: cfg.style,
        relative_cost: total_points as f64 * weight,
    }
}
