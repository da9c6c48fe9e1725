/*
 * Input Module
 *
 * This module handles window events for the particle life simulation.
 *
 * Keyboard shortcuts:
 * - Space: pause / resume
 * - R: randomize the interaction matrix
 * - B: switch between wrap-around and box boundaries
 * - N: new population
 * - D: toggle the debug overlay
 * - S: save the current settings as a preset
 */

use nannou::prelude::*;
use tracing::info;

use crate::app::{self, Model};
use crate::config::{BoundaryMode, Configuration};
use crate::particle::Extents;

// Boundary mode after a toggle
pub fn toggled_boundary(mode: BoundaryMode) -> BoundaryMode {
    match mode {
        BoundaryMode::WrapAround => BoundaryMode::Box,
        BoundaryMode::Box => BoundaryMode::WrapAround,
    }
}

// Key pressed event handler
pub fn key_pressed(_app: &App, model: &mut Model, key: Key) {
    // Keys typed into the settings panel are not shortcuts
    if model.egui.ctx().wants_keyboard_input() {
        return;
    }

    match key {
        Key::Space => {
            let paused = !model.config.paused();
            model.config.set_paused(paused);
            info!(paused, "toggled pause");
        }
        Key::R => model.engine.randomize_matrix(&mut model.config),
        Key::B => {
            let mode = toggled_boundary(model.config.boundary_mode());
            model.config.set_boundary_mode(mode);
            info!(?mode, "changed boundary mode");
        }
        Key::N => model.engine.request_reset(),
        Key::D => {
            let show = !model.config.show_debug();
            model.config.set_show_debug(show);
        }
        Key::S => app::save_preset(model),
        _ => {}
    }
}

// The canvas follows the window size
pub fn resized(_app: &App, model: &mut Model, size: Vec2) {
    model.engine.set_extents(Extents::new(size.x, size.y));
    info!(width = size.x, height = size.y, "canvas resized");
}

// Handle raw window events for egui
pub fn raw_window_event(_app: &App, model: &mut Model, event: &nannou::winit::event::WindowEvent) {
    // Pass events to egui
    model.egui.handle_raw_event(event);
}

// Shortcut text shown in the settings panel
pub fn shortcut_help(config: &Configuration) -> String {
    let boundary = match config.boundary_mode() {
        BoundaryMode::WrapAround => "wrap",
        BoundaryMode::Box => "box",
    };
    format!(
        "Space: {}  R: randomize  B: boundary ({})  N: new population  D: debug  S: save",
        if config.paused() { "resume" } else { "pause" },
        boundary
    )
}
