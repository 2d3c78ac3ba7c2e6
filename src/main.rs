//! Tardigrades headless runner
//!
//! Drives the simulation at the configured frame rate without rendering,
//! reporting progress through the log.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use anyhow::{Context, Result};
    use clap::Parser;
    use tardigrades::Settings;
    use tardigrades::persistence::Snapshot;
    use tardigrades::sim::{Milestone, World, tick};

    #[derive(Parser, Debug)]
    #[command(
        name = "tardigrades",
        version,
        about = "Run the tardigrade world headless"
    )]
    struct Cli {
        /// Settings file (JSON); defaults apply when absent or unreadable.
        #[arg(long)]
        settings: Option<PathBuf>,
        /// Snapshot to load before the first tick.
        #[arg(long)]
        import: Option<PathBuf>,
        /// Where to write a snapshot after the last tick.
        #[arg(long)]
        export: Option<PathBuf>,
        /// Number of ticks to run (one simulated minute by default).
        #[arg(long)]
        ticks: Option<u64>,
    }

    pub fn run() -> Result<()> {
        let cli = Cli::parse();
        let settings = cli
            .settings
            .as_ref()
            .map(Settings::load)
            .unwrap_or_default();
        let mut world = World::from_settings(&settings);

        if let Some(path) = &cli.import {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("could not read {}", path.display()))?;
            let snapshot = Snapshot::from_json(&json)
                .with_context(|| format!("could not parse {}", path.display()))?;
            world
                .import_state(&snapshot)
                .with_context(|| format!("could not import {}", path.display()))?;
        }

        let ticks = cli.ticks.unwrap_or(settings.frame_rate as u64 * 60);
        let report_every = (settings.frame_rate as u64 * 10).max(1);
        let dt = settings.tick_duration();

        for n in 0..ticks {
            let time = n as f64 * dt;
            let summary = tick(&mut world, time);
            for milestone in &summary.milestones {
                match milestone {
                    Milestone::YearReached(year) => log::info!("Year {} reached", year),
                    Milestone::PopulationRecord(count) => {
                        log::info!("New population record: {} tardigrades", count)
                    }
                }
            }
            if (n + 1) % report_every == 0 {
                log::info!(
                    "t={:.0} population={} joy={}/9 love={:.0}% score={} cells={}",
                    time,
                    summary.population,
                    summary.joy_level,
                    summary.love_fraction * 100.0,
                    summary.score,
                    world.terrain.cell_count()
                );
            }
        }

        if let Some(path) = &cli.export {
            let json = world
                .export_state()
                .to_json()
                .context("could not encode snapshot")?;
            std::fs::write(path, json)
                .with_context(|| format!("could not write {}", path.display()))?;
            log::info!("Snapshot written to {}", path.display());
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Tardigrades (headless) starting...");
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser builds embed the library directly
}
