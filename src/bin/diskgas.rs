//! diskgas CLI: run one or more independent simulations.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use clap::Parser;
use diskgas::core::RunSummary;
use diskgas::output::{artifact_path, FileFrameWriter};
use diskgas::{Result, SimConfig, Simulation};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "diskgas")]
#[command(version, about = "Event-driven hard-disk gas in a circular container")]
struct Cli {
    /// Number of particles.
    #[arg(short = 'n', long, default_value_t = 210)]
    particles: usize,

    /// Initial particle speed; pass several to run independent simulations in parallel.
    #[arg(short, long, num_args = 1.., value_delimiter = ',', default_values_t = [1.0, 3.0, 6.0, 10.0])]
    speeds: Vec<f64>,

    /// Particle radius.
    #[arg(short, long, default_value_t = 5e-4)]
    radius: f64,

    /// Particle mass.
    #[arg(long, default_value_t = 1.0)]
    mass: f64,

    /// Simulation time budget.
    #[arg(short = 't', long, default_value_t = 0.05)]
    max_time: f64,

    /// Run without the central obstacle.
    #[arg(long)]
    no_obstacle: bool,

    /// Placement seed; each speed uses `seed + index`.
    #[arg(long)]
    seed: Option<u64>,

    /// Output directory; each speed gets its own subdirectory.
    #[arg(short, long, default_value = "output")]
    out_dir: PathBuf,
}

#[derive(Serialize)]
struct SpeedReport {
    speed: f64,
    config: SimConfig,
    summary: RunSummary,
}

/// Subdirectory holding the artifacts of one speed.
fn speed_dir(speed: f64) -> String {
    format!("v{speed}")
}

/// Drop speeds that would share an output directory, keeping the first occurrence.
fn unique_speeds(speeds: &[f64]) -> Vec<f64> {
    let mut seen = HashSet::new();
    speeds
        .iter()
        .copied()
        .filter(|&s| seen.insert(speed_dir(s)))
        .collect()
}

fn run_one(config: &SimConfig, out_dir: &Path) -> Result<SpeedReport> {
    let dir = out_dir.join(speed_dir(config.speed));
    let mut writer = FileFrameWriter::create_file(&dir, config.particle_count)?;
    let mut sim = Simulation::new(config)?;
    let summary = sim.run(&mut writer)?;
    info!(
        speed = config.speed,
        frames = writer.frames_written(),
        path = %artifact_path(&dir, config.particle_count).display(),
        "wrote frames"
    );
    let report = SpeedReport {
        speed: config.speed,
        config: config.clone(),
        summary,
    };
    std::fs::write(dir.join("summary.json"), serde_json::to_vec_pretty(&report)?)?;
    Ok(report)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let base = SimConfig {
        particle_count: cli.particles,
        speed: 0.0,
        radius: cli.radius,
        mass: cli.mass,
        max_time: cli.max_time,
        obstacle: !cli.no_obstacle,
        seed: None,
    };
    let speeds = unique_speeds(&cli.speeds);
    if speeds.len() < cli.speeds.len() {
        warn!(
            requested = cli.speeds.len(),
            kept = speeds.len(),
            "ignoring repeated speeds"
        );
    }
    let configs: Vec<SimConfig> = speeds
        .iter()
        .enumerate()
        .map(|(k, &speed)| SimConfig {
            seed: cli.seed.map(|s| s.wrapping_add(k as u64)),
            ..base.with_speed(speed)
        })
        .collect();

    let results: Vec<Result<SpeedReport>> = configs
        .par_iter()
        .map(|config| run_one(config, &cli.out_dir))
        .collect();

    let mut failed = false;
    for (config, result) in configs.iter().zip(results) {
        match result {
            Ok(report) => println!(
                "speed {:>6}: t = {:.4e}, events = {}, P_wall = {:.4e}, P_obstacle = {:.4e}",
                report.speed,
                report.summary.final_time,
                report.summary.valid_events,
                report.summary.wall_pressure,
                report.summary.obstacle_pressure
            ),
            Err(e) => {
                error!(speed = config.speed, "run failed: {e}");
                failed = true;
            }
        }
    }
    if failed {
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_speeds_collapse_to_one_directory() {
        assert_eq!(unique_speeds(&[1.0, 3.0, 1.0, 1.0, 6.0]), vec![1.0, 3.0, 6.0]);
        assert_eq!(speed_dir(1.0), "v1");
        assert_eq!(speed_dir(2.5), "v2.5");
    }
}
