//! File interchange helpers for grids, profiles and meshes.

use std::fs::File;
use std::io::{self, Read, Write};

use crate::grid::ElevationGrid;
use crate::profile::Profile;
use crate::solid::SolidMesh;

/// Reads a file to string.
pub fn read_to_string(path: &str) -> io::Result<String> {
    let mut buffer = String::new();
    File::open(path)?.read_to_string(&mut buffer)?;
    Ok(buffer)
}

/// Reads an elevation grid from CSV, one row per line of comma-separated
/// heights in meters. Blank lines are skipped.
pub fn read_grid_csv(path: &str) -> io::Result<ElevationGrid> {
    let data = read_to_string(path)?;
    let mut rows = Vec::new();
    for (idx, line) in data.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let mut row = Vec::new();
        for value in line.split(',') {
            let v = value.trim().parse::<f64>().map_err(|e| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("line {}: {}", idx + 1, e),
                )
            })?;
            row.push(v);
        }
        rows.push(row);
    }
    ElevationGrid::from_rows(rows)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))
}

/// Writes an elevation grid as CSV rows.
pub fn write_grid_csv(path: &str, grid: &ElevationGrid) -> io::Result<()> {
    let mut file = File::create(path)?;
    for r in 0..grid.rows() {
        let row: Vec<String> = grid.row(r).iter().map(|v| v.to_string()).collect();
        writeln!(file, "{}", row.join(","))?;
    }
    Ok(())
}

/// Writes profile points as `x,z` CSV lines.
pub fn write_profile_csv(path: &str, profile: &Profile) -> io::Result<()> {
    let mut file = File::create(path)?;
    for p in &profile.points {
        writeln!(file, "{},{}", p.x, p.y)?;
    }
    Ok(())
}

/// Saves a mesh to a JSON file.
pub fn save_mesh_json(path: &str, mesh: &SolidMesh) -> io::Result<()> {
    let json = serde_json::to_string_pretty(mesh)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    std::fs::write(path, json)
}

/// Loads a mesh from a JSON file.
pub fn load_mesh_json(path: &str) -> io::Result<SolidMesh> {
    let data = read_to_string(path)?;
    serde_json::from_str(&data).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}
