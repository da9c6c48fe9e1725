/*
 * Application Module
 *
 * This module defines the main application model and the per-frame update for
 * the particle life window. Each frame:
 * 1. The settings panel runs and may edit the configuration
 * 2. Engine-side requests from the panel (reset, randomize, type count) are applied
 * 3. The engine advances one tick with the current configuration
 *
 * Rendering happens afterwards in the renderer module, so drawing never sees a
 * half-updated particle collection.
 */

use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::Instant;

use nannou::prelude::*;
use nannou_egui::Egui;
use tracing::{error, info, warn};

use crate::config::Configuration;
use crate::debug::DebugInfo;
use crate::engine::{Engine, TickOutcome};
use crate::error::SimulationError;
use crate::particle::Extents;
use crate::renderer::{self, parse_hex_color, DEFAULT_BACKGROUND};
use crate::{input, ui, DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH};

// Everything the window needs to start, resolved from the command line
#[derive(Clone, Debug)]
pub struct Launch {
    pub config: Configuration,
    pub seed: Option<u64>,
    pub width: u32,
    pub height: u32,
    pub preset_path: PathBuf,
}

impl Default for Launch {
    fn default() -> Self {
        Self {
            config: Configuration::default(),
            seed: None,
            width: DEFAULT_WINDOW_WIDTH,
            height: DEFAULT_WINDOW_HEIGHT,
            preset_path: PathBuf::from("particle-life-preset.json"),
        }
    }
}

// nannou builds the model from a plain function, so launch settings are parked here
static LAUNCH: OnceLock<Launch> = OnceLock::new();

// Main model for the application
pub struct Model {
    pub engine: Engine,
    pub config: Configuration,
    pub egui: Egui,
    pub debug_info: DebugInfo,
    pub background: (u8, u8, u8),
    pub preset_path: PathBuf,
    last_error: Option<SimulationError>,
}

// Start the window; blocks until it is closed
pub fn run(launch: Launch) {
    if LAUNCH.set(launch).is_err() {
        warn!("application already launched, ignoring new launch settings");
    }
    nannou::app(model).update(update).run();
}

// Initialize the model
pub fn model(app: &App) -> Model {
    let launch = LAUNCH.get().cloned().unwrap_or_default();

    let window_id = app
        .new_window()
        .title("Particle Life")
        .size(launch.width, launch.height)
        .view(renderer::view)
        .key_pressed(input::key_pressed)
        .resized(input::resized)
        .raw_event(input::raw_window_event)
        .build()
        .unwrap();

    let window = app.window(window_id).unwrap();
    let egui = Egui::from_window(&window);

    // The canvas is the window's drawable area
    let (width, height) = window.inner_size_points();
    let extents = Extents::new(width, height);

    let engine = match launch.seed {
        Some(seed) => Engine::with_seed(extents, seed),
        None => Engine::new(extents),
    };

    let background = parse_background(launch.config.background_color());

    info!(
        width,
        height,
        particles = launch.config.particle_count(),
        types = launch.config.type_count(),
        "window ready"
    );

    Model {
        engine,
        config: launch.config,
        egui,
        debug_info: DebugInfo::default(),
        background,
        preset_path: launch.preset_path,
        last_error: None,
    }
}

// Update the model
pub fn update(app: &App, model: &mut Model, update: Update) {
    // Update debug info
    model.debug_info.fps = app.fps();
    model.debug_info.frame_time = update.since_last;
    model.egui.set_elapsed_time(update.since_start);

    let response = ui::update_ui(&mut model.egui, &mut model.config, &model.debug_info);

    if let Some(type_count) = response.type_count {
        model.engine.set_type_count(&mut model.config, type_count);
    }
    if response.randomize_matrix {
        model.engine.randomize_matrix(&mut model.config);
    }
    if response.reset_requested {
        model.engine.request_reset();
    }
    if response.save_preset {
        save_preset(model);
    }
    if response.changes.any_changed {
        model.background = parse_background(model.config.background_color());
    }

    advance(model);
}

// Run one tick and record the outcome for the overlay
pub fn advance(model: &mut Model) {
    let started = Instant::now();

    match model.engine.tick(&model.config) {
        Ok(outcome) => {
            if model.last_error.take().is_some() {
                info!("configuration fault cleared");
            }
            if outcome != TickOutcome::Paused {
                model.debug_info.tick_time = started.elapsed();
            }
        }
        Err(e) => {
            // Log each distinct fault once rather than every frame
            if model.last_error.as_ref() != Some(&e) {
                error!(%e, "tick rejected");
            }
            model.last_error = Some(e);
        }
    }

    model.debug_info.particle_count = model.engine.particles().len();
    model.debug_info.generation = model.engine.generation();
    model.debug_info.ticks = model.engine.ticks();
    model.debug_info.paused = model.config.paused();
    model.debug_info.last_error = model.last_error.as_ref().map(ToString::to_string);
}

pub fn save_preset(model: &Model) {
    if let Err(e) = model.config.save_preset(&model.preset_path) {
        error!(%e, path = %model.preset_path.display(), "failed to save preset");
    }
}

// Unparsable colors fall back to the default background
fn parse_background(text: &str) -> (u8, u8, u8) {
    parse_hex_color(text).unwrap_or_else(|| {
        warn!(color = text, "invalid background color, using default");
        DEFAULT_BACKGROUND
    })
}
