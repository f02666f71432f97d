//! Core library for the Terrain CAD model builder.
//!
//! Converts a grid of elevation samples into a lofted 3D solid suitable for
//! fabrication. The pipeline is `ElevationGrid` -> per-row cross-section
//! profiles -> `SolidMesh`, with block-mean coarsening and a geometry report
//! layered around it.

pub mod geodesy;
pub mod geometry;
pub mod grid;
pub mod io;
pub mod profile;
pub mod reporting;
pub mod solid;
pub mod spline;
