use clap::{Parser, Subcommand};
use terrain_cad::geodesy::haversine;
use terrain_cad::grid::PhysicalExtents;
use terrain_cad::io::{read_grid_csv, save_mesh_json, write_grid_csv, write_profile_csv};
use terrain_cad::profile::{extract_profile, ProfileStyle, ScaleConfig};
use terrain_cad::reporting::estimate_cost;
use terrain_cad::solid::build_solid;

#[derive(Parser)]
#[command(name = "terrain_cad_cli", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reduce the resolution of a grid CSV by block-mean averaging.
    Coarsen {
        input: String,
        output: String,
        #[arg(long, default_value_t = 2)]
        factor: usize,
    },
    /// Extract one scaled cross-section profile to an x,z CSV.
    Profile {
        input: String,
        output: String,
        #[arg(long)]
        row: usize,
        #[arg(long, default_value_t = 1.0)]
        dx_km: f64,
        #[arg(long, default_value_t = 100.0)]
        x_scale: f64,
        #[arg(long, default_value_t = 1.0)]
        z_exag: f64,
        #[arg(long, default_value_t = 1.0)]
        z_adder: f64,
        #[arg(long, default_value_t = 1)]
        subsample: usize,
    },
    /// Loft a grid CSV into a solid mesh saved as JSON.
    Build {
        input: String,
        output: String,
        #[arg(long, default_value_t = 1.0)]
        dx_km: f64,
        #[arg(long, default_value_t = 1.0)]
        dy_km: f64,
        #[arg(long, default_value_t = 100.0)]
        x_scale: f64,
        #[arg(long, default_value_t = 1.0)]
        z_exag: f64,
        #[arg(long, default_value_t = 1.0)]
        z_adder: f64,
        #[arg(long, default_value_t = 1)]
        subsample: usize,
        /// Blend sections with a smooth loft instead of a ruled loft.
        #[arg(long)]
        smooth: bool,
    },
    /// Estimate the relative cost of a build before running it.
    Estimate {
        input: String,
        #[arg(long, default_value_t = 100.0)]
        x_scale: f64,
        #[arg(long, default_value_t = 1)]
        subsample: usize,
        #[arg(long)]
        smooth: bool,
    },
    /// Great-circle distance in km between two lat,lon points in degrees.
    Distance {
        lat1: f64,
        lon1: f64,
        lat2: f64,
        lon2: f64,
    },
}

fn style(smooth: bool) -> ProfileStyle {
    if smooth {
        ProfileStyle::Smooth
    } else {
        ProfileStyle::Linear
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Coarsen {
            input,
            output,
            factor,
        } => match read_grid_csv(&input) {
            Ok(grid) => match grid.coarsen(factor) {
                Ok(out) => match write_grid_csv(&output, &out) {
                    Ok(()) => println!(
                        "Wrote {} ({}x{} -> {}x{})",
                        output,
                        grid.rows(),
                        grid.cols(),
                        out.rows(),
                        out.cols()
                    ),
                    Err(e) => eprintln!("Error writing {}: {}", output, e),
                },
                Err(e) => eprintln!("Error coarsening {}: {}", input, e),
            },
            Err(e) => eprintln!("Error reading {}: {}", input, e),
        },
        Commands::Profile {
            input,
            output,
            row,
            dx_km,
            x_scale,
            z_exag,
            z_adder,
            subsample,
        } => match read_grid_csv(&input) {
            Ok(grid) => {
                if row >= grid.rows() {
                    eprintln!("Error: row {} out of range (grid has {})", row, grid.rows());
                    return;
                }
                let cfg = ScaleConfig {
                    x_scale,
                    z_exaggeration: z_exag,
                    z_adder,
                    subsample,
                    style: ProfileStyle::Linear,
                };
                match extract_profile(&grid, row, dx_km, &cfg) {
                    Ok(profile) => match write_profile_csv(&output, &profile) {
                        Ok(()) => println!("Wrote {} ({} points)", output, profile.len()),
                        Err(e) => eprintln!("Error writing {}: {}", output, e),
                    },
                    Err(e) => eprintln!("Error extracting profile: {}", e),
                }
            }
            Err(e) => eprintln!("Error reading {}: {}", input, e),
        },
        Commands::Build {
            input,
            output,
            dx_km,
            dy_km,
            x_scale,
            z_exag,
            z_adder,
            subsample,
            smooth,
        } => match read_grid_csv(&input) {
            Ok(grid) => {
                let cfg = ScaleConfig {
                    x_scale,
                    z_exaggeration: z_exag,
                    z_adder,
                    subsample,
                    style: style(smooth),
                };
                let extents = PhysicalExtents::new(dx_km, dy_km);
                match build_solid(&grid, &extents, &cfg) {
                    Ok((mesh, report)) => match save_mesh_json(&output, &mesh) {
                        Ok(()) => {
                            for row in report.rows() {
                                println!("{row}");
                            }
                            println!("Wrote {}", output);
                        }
                        Err(e) => eprintln!("Error writing {}: {}", output, e),
                    },
                    Err(e) => eprintln!("Error building model: {}", e),
                }
            }
            Err(e) => eprintln!("Error reading {}: {}", input, e),
        },
        Commands::Estimate {
            input,
            x_scale,
            subsample,
            smooth,
        } => match read_grid_csv(&input) {
            Ok(grid) => {
                let cfg = ScaleConfig {
                    x_scale,
                    subsample,
                    style: style(smooth),
                    ..Default::default()
                };
                let est = estimate_cost(&grid, &cfg);
                println!("retained points: {}", est.total_points);
                println!("relative cost: {:.0}", est.relative_cost);
            }
            Err(e) => eprintln!("Error reading {}: {}", input, e),
        },
        Commands::Distance {
            lat1,
            lon1,
            lat2,
            lon2,
        } => {
            let d = haversine((lat1, lon1), (lat2, lon2));
            println!("Distance: {:.1} km", d);
        }
    }
}
