/*
 * Particle Life
 *
 * Particles of several types attract or repel each other according to an
 * interaction matrix. Particles of the same or different types form moving,
 * cell-like structures that depend entirely on the matrix and the physical
 * constants, all adjustable live from the settings panel.
 */

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use particle_life::app;
use particle_life::cli::LaunchOptions;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("particle_life=info")),
        )
        .init();

    let options = LaunchOptions::parse();
    let preset = options.preset.clone();
    let launch = options
        .into_launch()
        .with_context(|| match &preset {
            Some(path) => format!("failed to load preset {}", path.display()),
            None => String::from("failed to prepare launch settings"),
        })?;

    info!(
        particles = launch.config.particle_count(),
        types = launch.config.type_count(),
        seed = ?launch.seed,
        "starting particle life"
    );

    app::run(launch);

    Ok(())
}
