/*
 * Command Line Module
 *
 * Launch options for the particle life window. A preset file, when given,
 * replaces the default settings; the count options are applied on top of it.
 */

use std::path::PathBuf;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::app::Launch;
use crate::config::Configuration;
use crate::error::PresetError;
use crate::{DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH};

#[derive(Parser, Debug)]
#[command(name = "particle-life", about = "Typed particles attracting and repelling each other")]
pub struct LaunchOptions {
    /// JSON preset to start from
    #[arg(long)]
    pub preset: Option<PathBuf>,

    /// Seed for populations and matrix randomization
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override the particle count
    #[arg(long)]
    pub particles: Option<usize>,

    /// Override the type count (re-seeds the matrix)
    #[arg(long)]
    pub types: Option<usize>,

    /// Initial window width
    #[arg(long, default_value_t = DEFAULT_WINDOW_WIDTH)]
    pub width: u32,

    /// Initial window height
    #[arg(long, default_value_t = DEFAULT_WINDOW_HEIGHT)]
    pub height: u32,

    /// Where the S key and the Save Preset button write
    #[arg(long, default_value = "particle-life-preset.json")]
    pub save_to: PathBuf,
}

impl LaunchOptions {
    pub fn into_launch(self) -> Result<Launch, PresetError> {
        let mut config = match &self.preset {
            Some(path) => Configuration::load_preset(path)?,
            None => Configuration::default(),
        };

        if let Some(particles) = self.particles {
            config.set_particle_count(particles);
        }

        // A seed also covers the starting matrix, unless a preset supplied one
        match (self.seed, self.types) {
            (Some(seed), types) if types.is_some() || config.has_generated_matrix() => {
                let type_count = types.unwrap_or(config.type_count());
                config.set_type_count_with(type_count, &mut StdRng::seed_from_u64(seed));
            }
            (None, Some(types)) => config.set_type_count(types),
            _ => {}
        }

        Ok(Launch {
            config,
            seed: self.seed,
            width: self.width,
            height: self.height,
            preset_path: self.save_to,
        })
    }
}
