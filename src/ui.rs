/*
 * UI Module
 *
 * This module contains functions for creating and updating the user interface
 * using nannou_egui. It exposes every configuration value, including per-cell
 * editing of the interaction matrix. Actions that need the engine (reset,
 * randomizing the matrix, changing the type count) are returned to the caller
 * instead of being applied here.
 */

use nannou::prelude::*;
use nannou_egui::{egui, Egui};
use tracing::warn;

use crate::config::{BoundaryMode, ConfigChanges, Configuration};
use crate::debug::DebugInfo;
use crate::input;

// Requests collected from the settings panel during one frame
#[derive(Debug, Default)]
pub struct UiResponse {
    pub changes: ConfigChanges,
    pub reset_requested: bool,
    pub randomize_matrix: bool,
    pub type_count: Option<usize>,
    pub save_preset: bool,
}

// Slider that writes back through a setter only when the user moved it
fn setter_slider(
    ui: &mut egui::Ui,
    value: f32,
    range: std::ops::RangeInclusive<f32>,
    text: &str,
    apply: impl FnOnce(f32),
) {
    let mut edited = value;
    if ui.add(egui::Slider::new(&mut edited, range).text(text)).changed() {
        apply(edited);
    }
}

// Update the UI and return what the caller needs to act on
pub fn update_ui(egui: &mut Egui, config: &mut Configuration, debug_info: &DebugInfo) -> UiResponse {
    let mut response = UiResponse::default();

    // Take a snapshot of current values for change detection
    config.take_snapshot();

    let ctx = egui.begin_frame();

    egui::Window::new("Simulation Controls")
        .default_pos([10.0, 10.0])
        .show(&ctx, |ui| {
            ui.collapsing("Universe", |ui| {
                let mut particle_count = config.particle_count();
                if ui
                    .add(egui::Slider::new(&mut particle_count, Configuration::particle_count_range()).text("Particles"))
                    .changed()
                {
                    config.set_particle_count(particle_count);
                }

                if ui.button("New Population").clicked() {
                    response.reset_requested = true;
                }

                ui.horizontal(|ui| {
                    ui.label("Background");
                    let mut background = config.background_color().to_string();
                    if ui.text_edit_singleline(&mut background).changed() {
                        config.set_background_color(background);
                    }
                });
            });

            ui.collapsing("Particles", |ui| {
                let mut type_count = config.type_count();
                if ui
                    .add(egui::Slider::new(&mut type_count, Configuration::type_count_range()).text("Types"))
                    .changed()
                {
                    response.type_count = Some(type_count);
                }

                setter_slider(ui, config.min_speed(), Configuration::initial_speed_range(), "Min Initial Speed", |v| {
                    config.set_min_speed(v)
                });
                setter_slider(ui, config.max_speed(), Configuration::initial_speed_range(), "Max Initial Speed", |v| {
                    config.set_max_speed(v)
                });
            });

            ui.collapsing("Physics", |ui| {
                setter_slider(ui, config.time_step(), Configuration::time_step_range(), "Time Step", |v| {
                    config.set_time_step(v)
                });
                setter_slider(ui, config.max_radius(), Configuration::max_radius_range(), "Max Radius", |v| {
                    config.set_max_radius(v)
                });
                setter_slider(ui, config.beta(), Configuration::beta_range(), "Beta", |v| config.set_beta(v));
                setter_slider(ui, config.force_factor(), Configuration::force_factor_range(), "Force Factor", |v| {
                    config.set_force_factor(v)
                });
                setter_slider(
                    ui,
                    config.friction_half_life(),
                    Configuration::friction_half_life_range(),
                    "Friction Half-Life",
                    |v| config.set_friction_half_life(v),
                );
                setter_slider(ui, config.speed_constant(), Configuration::speed_constant_range(), "Speed Constant", |v| {
                    config.set_speed_constant(v)
                });
                ui.label(format!("Friction factor: {:.4}", config.friction_factor()));
            });

            ui.collapsing("Boundary", |ui| {
                let mut mode = config.boundary_mode();
                ui.radio_value(&mut mode, BoundaryMode::WrapAround, "Wrap Around");
                ui.radio_value(&mut mode, BoundaryMode::Box, "Box");
                if mode != config.boundary_mode() {
                    config.set_boundary_mode(mode);
                }
            });

            ui.collapsing("Interaction Matrix", |ui| {
                let size = config.matrix().size();
                egui::Grid::new("interaction_matrix").show(ui, |ui| {
                    ui.label("");
                    for b in 0..size {
                        ui.label(format!("{}", b));
                    }
                    ui.end_row();

                    for a in 0..size {
                        ui.label(format!("{}", a));
                        for b in 0..size {
                            let mut value = config.matrix().get(a, b);
                            let cell = egui::DragValue::new(&mut value).speed(0.01).clamp_range(-1.0..=1.0);
                            if ui.add(cell).changed() {
                                if let Err(e) = config.set_matrix_cell(a, b, value) {
                                    warn!(%e, "matrix edit ignored");
                                }
                            }
                        }
                        ui.end_row();
                    }
                });

                if ui.button("Randomize").clicked() {
                    response.randomize_matrix = true;
                }
            });

            ui.collapsing("Performance", |ui| {
                let mut parallel = config.parallel();
                if ui.checkbox(&mut parallel, "Parallel Force Pass").changed() {
                    config.set_parallel(parallel);
                }

                ui.separator();

                // Performance metrics
                ui.label(format!("FPS: {:.1}", debug_info.fps));
                ui.label(format!("Tick time: {:.2} ms", debug_info.tick_time.as_secs_f64() * 1000.0));
                ui.label(format!("Particles: {}", debug_info.particle_count));
            });

            if let Some(error) = &debug_info.last_error {
                ui.colored_label(egui::Color32::RED, error.as_str());
            }

            let mut show_debug = config.show_debug();
            if ui.checkbox(&mut show_debug, "Show Debug Info").changed() {
                config.set_show_debug(show_debug);
            }
            let mut paused = config.paused();
            if ui.checkbox(&mut paused, "Pause Simulation").changed() {
                config.set_paused(paused);
            }
            if ui.button("Save Preset").clicked() {
                response.save_preset = true;
            }

            ui.separator();
            ui.small(input::shortcut_help(config));
        });

    response.changes = config.detect_changes();
    response
}

// Draw debug information in the top-right corner, clear of the settings panel
pub fn draw_debug_info(draw: &Draw, debug_info: &DebugInfo, window_rect: Rect) {
    let lines = debug_info.lines();

    let margin = 20.0;
    let line_height = 20.0;
    let panel_width = 220.0;
    let panel_height = line_height * lines.len() as f32 + margin;
    let panel_x = window_rect.right() - panel_width / 2.0;
    let panel_y = window_rect.top() - panel_height / 2.0;

    // Draw the background panel
    draw.rect()
        .x_y(panel_x, panel_y)
        .w_h(panel_width, panel_height)
        .color(rgba(0.0, 0.0, 0.0, 0.7));

    let text_x = window_rect.right() - panel_width + margin;
    let text_y = window_rect.top() - margin;

    for (i, text) in lines.iter().enumerate() {
        let y = text_y - (i as f32 * line_height);

        // Position the text with a fixed offset from the left edge
        draw.text(text)
            .x_y(text_x + 70.0, y)
            .color(WHITE)
            .font_size(14);
    }
}
