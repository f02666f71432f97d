//! Lofts cross-section profiles into a closed solid mesh.

use log::{debug, info};

use crate::geometry::Point3;
use crate::grid::{ElevationGrid, GridError, PhysicalExtents};
use crate::profile::{extract_profile, stride_indices, ProfileStyle, ScaleConfig};
use crate::reporting::{estimate_cost, model_report, ModelReport};
use crate::spline::catmull_rom_resample;

/// Catmull-Rom samples per span, in both directions, for the smooth loft.
const SMOOTH_REFINE: usize = 8;

/// Errors raised while assembling the solid.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BuildError {
    #[error("lofting requires at least 2 cross-sections, got {0}")]
    InsufficientRows(usize),

    #[error("cross-sections need at least 2 points, got {0}")]
    InsufficientPoints(usize),

    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Indexed triangle mesh of the lofted solid. Units are mm; X spans the
/// model width, Y the depth, Z the height above the baseline.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SolidMesh {
    pub vertices: Vec<Point3>,
    pub triangles: Vec<[usize; 3]>,
}

impl SolidMesh {
    /// Axis-aligned bounding box as `(min, max)`, or `None` when empty.
    pub fn bounding_box(&self) -> Option<(Point3, Point3)> {
        let first = *self.vertices.first()?;
        let mut min = first;
        let mut max = first;
        for v in &self.vertices[1..] {
            min = Point3::new(min.x.min(v.x), min.y.min(v.y), min.z.min(v.z));
            max = Point3::new(max.x.max(v.x), max.y.max(v.y), max.z.max(v.z));
        }
        Some((min, max))
    }

    /// Returns `true` when every undirected edge is shared by exactly two
    /// triangles with opposite directions, i.e. the mesh bounds a solid.
    pub fn is_closed(&self) -> bool {
        use std::collections::HashMap;
        let mut undirected: HashMap<(usize, usize), u32> = HashMap::new();
        let mut directed: HashMap<(usize, usize), u32> = HashMap::new();
        for tri in &self.triangles {
            for i in 0..3 {
                let a = tri[i];
                let b = tri[(i + 1) % 3];
                *directed.entry((a, b)).or_insert(0) += 1;
                let key = if a < b { (a, b) } else { (b, a) };
                *undirected.entry(key).or_insert(0) += 1;
            }
        }
        undirected.values().all(|&n| n == 2) && directed.values().all(|&n| n == 1)
    }
}

/// Height field feeding the mesher: one z row per section plus the shared x
/// positions and per-section depths. Owned by the assembler for the duration
/// of one build.
struct LoftSheet {
    xs: Vec<f64>,
    ys: Vec<f64>,
    zs: Vec<Vec<f64>>,
}

impl LoftSheet {
    /// Densifies the sheet through Catmull-Rom interpolation along both the
    /// section direction and the depth direction.
    fn refined(&self, refine: usize) -> LoftSheet {
        let xs = catmull_rom_resample(&self.xs, refine);
        let ys = catmull_rom_resample(&self.ys, refine);
        // Along x first, then across sections per column.
        let along: Vec<Vec<f64>> = self
            .zs
            .iter()
            .map(|row| catmull_rom_resample(row, refine))
            .collect();
        let mut zs = vec![vec![0.0; xs.len()]; ys.len()];
        for col in 0..xs.len() {
            let knots: Vec<f64> = along.iter().map(|row| row[col]).collect();
            for (s, z) in catmull_rom_resample(&knots, refine).into_iter().enumerate() {
                zs[s][col] = z;
            }
        }
        LoftSheet { xs, ys, zs }
    }

    /// Closes the sheet into a watertight slab: the sheet on top, a flat
    /// base on the baseline, caps at the first and last sections and side
    /// walls under the first and last x positions.
    fn into_mesh(self) -> SolidMesh {
        let ns = self.ys.len();
        let np = self.xs.len();
        let mut vertices = Vec::with_capacity(2 * ns * np);
        for (s, &y) in self.ys.iter().enumerate() {
            for (k, &x) in self.xs.iter().enumerate() {
                vertices.push(Point3::new(x, y, self.zs[s][k]));
            }
        }
        for &y in &self.ys {
            for &x in &self.xs {
                vertices.push(Point3::new(x, y, 0.0));
            }
        }
        let top = |s: usize, k: usize| s * np + k;
        let bottom = |s: usize, k: usize| ns * np + s * np + k;

        let mut triangles = Vec::new();
        for s in 0..ns - 1 {
            for k in 0..np - 1 {
                // Top faces wind counter-clockwise seen from above.
                triangles.push([top(s, k), top(s, k + 1), top(s + 1, k + 1)]);
                triangles.push([top(s, k), top(s + 1, k + 1), top(s + 1, k)]);
                triangles.push([bottom(s, k), bottom(s + 1, k + 1), bottom(s, k + 1)]);
                triangles.push([bottom(s, k), bottom(s + 1, k), bottom(s + 1, k + 1)]);
            }
        }
        for k in 0..np - 1 {
            // Front cap (y of section 0) faces -Y, back cap faces +Y.
            triangles.push([bottom(0, k), bottom(0, k + 1), top(0, k + 1)]);
            triangles.push([bottom(0, k), top(0, k + 1), top(0, k)]);
            triangles.push([bottom(ns - 1, k), top(ns - 1, k + 1), bottom(ns - 1, k + 1)]);
            triangles.push([bottom(ns - 1, k), top(ns - 1, k), top(ns - 1, k + 1)]);
        }
        for s in 0..ns - 1 {
            // Left wall faces -X, right wall faces +X.
            triangles.push([bottom(s, 0), top(s + 1, 0), bottom(s + 1, 0)]);
            triangles.push([bottom(s, 0), top(s, 0), top(s + 1, 0)]);
            triangles.push([bottom(s, np - 1), bottom(s + 1, np - 1), top(s + 1, np - 1)]);
            triangles.push([bottom(s, np - 1), top(s + 1, np - 1), top(s, np - 1)]);
        }
        SolidMesh {
            vertices,
            triangles,
        }
    }
}

/// Lofts the subsampled grid rows into a closed solid.
///
/// Rows are selected by striding the full row range at the configured
/// subsample interval; section `i` sits at depth `i * offset` with
/// `offset = y_scale / sections` and `y_scale = x_scale * dy / dx`. The
/// linear style produces a ruled, faceted surface; the smooth style blends
/// all sections into one continuous body. Returns the solid together with
/// the derived [`ModelReport`].
pub fn build_solid(
    grid: &ElevationGrid,
    extents: &PhysicalExtents,
    cfg: &ScaleConfig,
) -> Result<(SolidMesh, ModelReport), BuildError> {
    if cfg.subsample == 0 {
        return Err(GridError::InvalidFactor(0).into());
    }
    extents.validate()?;

    let rows = stride_indices(grid.rows(), cfg.subsample);
    if rows.len() < 2 {
        return Err(BuildError::InsufficientRows(rows.len()));
    }

    let estimate = estimate_cost(grid, cfg);
    info!(
        "lofting {} sections ({:?} style, {} retained points)",
        rows.len(),
        cfg.style,
        estimate.total_points
    );

    let profiles = rows
        .iter()
        .map(|&row| extract_profile(grid, row, extents.dx_km, cfg))
        .collect::<Result<Vec<_>, GridError>>()?;
    let np = profiles[0].len();
    if np < 2 {
        return Err(BuildError::InsufficientPoints(np));
    }

    let y_scale = cfg.x_scale * extents.dy_km / extents.dx_km;
    let offset = y_scale / rows.len() as f64;
    let sheet = LoftSheet {
        xs: profiles[0].points.iter().map(|p| p.x).collect(),
        ys: (0..rows.len()).map(|i| i as f64 * offset).collect(),
        zs: profiles
            .iter()
            .map(|p| p.points.iter().map(|pt| pt.y).collect())
            .collect(),
    };

    let mesh = match cfg.style {
        ProfileStyle::Linear => sheet.into_mesh(),
        ProfileStyle::Smooth => sheet.refined(SMOOTH_REFINE).into_mesh(),
    };
    debug!(
        "lofted mesh: {} vertices, {} triangles",
        mesh.vertices.len(),
        mesh.triangles.len()
    );

    Ok((mesh, model_report(grid, extents, cfg)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::ElevationGrid;

    fn ramp(rows: usize, cols: usize) -> ElevationGrid {
        let data = (0..rows * cols).map(|i| i as f64).collect();
        ElevationGrid::from_flat(rows, cols, data).unwrap()
    }

    fn cfg(x_scale: f64, subsample: usize, style: ProfileStyle) -> ScaleConfig {
        ScaleConfig {
            x_scale,
            z_exaggeration: 1.0,
            z_adder: 0.0,
            subsample,
            style,
        }
    }

    #[test]
    fn four_row_ramp_sections_and_offsets() {
        let grid = ramp(4, 4);
        let extents = PhysicalExtents::new(1.0, 1.0);
        let (mesh, report) =
            build_solid(&grid, &extents, &cfg(10.0, 1, ProfileStyle::Linear)).unwrap();
        assert_eq!(report.sections, 4);
        assert_eq!(report.points_per_section, 4);
        // Depth offsets 0, s, 2s, 3s with s = 10 / 4.
        for (s, expected) in [(0, 0.0), (1, 2.5), (2, 5.0), (3, 7.5)] {
            assert!((mesh.vertices[s * 4].y - expected).abs() < 1e-12);
        }
        assert_eq!(mesh.vertices.len(), 2 * 4 * 4);
    }

    #[test]
    fn linear_mesh_is_watertight() {
        let grid = ramp(5, 6);
        let extents = PhysicalExtents::new(2.0, 1.0);
        let (mesh, _) =
            build_solid(&grid, &extents, &cfg(100.0, 1, ProfileStyle::Linear)).unwrap();
        assert!(mesh.is_closed());
    }

    #[test]
    fn smooth_mesh_is_watertight_and_refined() {
        let grid = ramp(3, 4);
        let extents = PhysicalExtents::new(1.0, 1.0);
        let (mesh, _) =
            build_solid(&grid, &extents, &cfg(50.0, 1, ProfileStyle::Smooth)).unwrap();
        assert!(mesh.is_closed());
        // 3 sections and 4 points refined by 8 per span, top and bottom.
        let ns = 2 * 8 + 1;
        let np = 3 * 8 + 1;
        assert_eq!(mesh.vertices.len(), 2 * ns * np);
    }

    #[test]
    fn smooth_surface_passes_through_sections() {
        let grid = ramp(3, 3);
        let extents = PhysicalExtents::new(1.0, 1.0);
        let config = cfg(30.0, 1, ProfileStyle::Linear);
        let (linear, _) = build_solid(&grid, &extents, &config).unwrap();
        let (smooth, _) = build_solid(
            &grid,
            &extents,
            &cfg(30.0, 1, ProfileStyle::Smooth),
        )
        .unwrap();
        // Knot vertices of the refined sheet coincide with the ruled mesh.
        let np_s = 2 * 8 + 1;
        for s in 0..3 {
            for k in 0..3 {
                let a = linear.vertices[s * 3 + k];
                let b = smooth.vertices[s * 8 * np_s + k * 8];
                assert!((a.x - b.x).abs() < 1e-9);
                assert!((a.y - b.y).abs() < 1e-9);
                assert!((a.z - b.z).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn two_sections_suffice() {
        let grid = ramp(2, 2);
        let extents = PhysicalExtents::new(1.0, 1.0);
        assert!(build_solid(&grid, &extents, &cfg(10.0, 1, ProfileStyle::Linear)).is_ok());
    }

    #[test]
    fn one_section_rejected() {
        let grid = ramp(1, 3);
        let extents = PhysicalExtents::new(1.0, 1.0);
        assert_eq!(
            build_solid(&grid, &extents, &cfg(10.0, 1, ProfileStyle::Linear)).unwrap_err(),
            BuildError::InsufficientRows(1)
        );
    }

    #[test]
    fn empty_grid_has_zero_sections() {
        let grid = ElevationGrid::from_rows(Vec::new()).unwrap();
        let extents = PhysicalExtents::new(1.0, 1.0);
        assert_eq!(
            build_solid(&grid, &extents, &cfg(10.0, 1, ProfileStyle::Linear)).unwrap_err(),
            BuildError::InsufficientRows(0)
        );
    }

    #[test]
    fn flat_grid_surfaces_grid_error() {
        let grid = ElevationGrid::from_rows(vec![vec![2.0, 2.0], vec![2.0, 2.0]]).unwrap();
        let extents = PhysicalExtents::new(1.0, 1.0);
        assert_eq!(
            build_solid(&grid, &extents, &cfg(10.0, 1, ProfileStyle::Linear)).unwrap_err(),
            BuildError::Grid(GridError::EmptyGrid)
        );
    }

    #[test]
    fn bad_extents_rejected_before_work() {
        let grid = ramp(4, 4);
        let extents = PhysicalExtents::new(0.0, 1.0);
        assert_eq!(
            build_solid(&grid, &extents, &cfg(10.0, 1, ProfileStyle::Linear)).unwrap_err(),
            BuildError::Grid(GridError::InvalidExtent(0.0))
        );
    }

    #[test]
    fn base_sits_on_baseline_and_adder_lifts_top() {
        let grid = ramp(3, 3);
        let extents = PhysicalExtents::new(1.0, 1.0);
        let config = ScaleConfig {
            x_scale: 10.0,
            z_exaggeration: 1.0,
            z_adder: 2.0,
            subsample: 1,
            style: ProfileStyle::Linear,
        };
        let (mesh, _) = build_solid(&grid, &extents, &config).unwrap();
        let (min, max) = mesh.bounding_box().unwrap();
        assert_eq!(min.z, 0.0);
        assert!(max.z >= 2.0);
        let n = mesh.vertices.len() / 2;
        assert!(mesh.vertices[..n].iter().all(|v| v.z >= 2.0 - 1e-12));
    }

    #[test]
    fn row_stride_drops_far_edge() {
        // 5 rows with stride 3 keep rows 0 and 3 only.
        let grid = ramp(5, 4);
        let extents = PhysicalExtents::new(1.0, 1.0);
        let (_, report) =
            build_solid(&grid, &extents, &cfg(10.0, 3, ProfileStyle::Linear)).unwrap();
        assert_eq!(report.sections, 2);
        assert_eq!(report.points_per_section, 2);
    }
}
