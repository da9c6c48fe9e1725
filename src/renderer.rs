/*
 * Renderer Module
 *
 * This module draws the simulation. It only reads the engine's render points
 * between ticks; a particle's color is a projection of its type (evenly spaced
 * hues around the color wheel) and is never used to recover the type.
 *
 * Canvas coordinates have their origin at the top-left corner with y pointing
 * down; nannou's window coordinates are centered with y pointing up.
 */

use nannou::prelude::*;
use tracing::error;

use crate::app::Model;
use crate::particle::Extents;
use crate::ui;
use crate::PARTICLE_RADIUS;

pub const DEFAULT_BACKGROUND: (u8, u8, u8) = (0x11, 0x11, 0x11);

// Render the model
pub fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();

    let (r, g, b) = model.background;
    draw.background().color(rgb(r, g, b));

    let extents = model.engine.extents();
    let type_count = model.config.type_count();

    for (position, kind) in model.engine.render_points() {
        draw.ellipse()
            .xy(canvas_to_screen(position, extents))
            .radius(PARTICLE_RADIUS)
            .color(type_color(kind, type_count));
    }

    if model.config.show_debug() {
        ui::draw_debug_info(&draw, &model.debug_info, app.window_rect());
    }

    if let Err(e) = draw.to_frame(app, &frame) {
        error!(error = ?e, "failed to draw frame");
    }

    // Draw the egui UI
    if let Err(e) = model.egui.draw_to_frame(&frame) {
        error!(error = ?e, "failed to draw settings panel");
    }
}

// Map a canvas position to window coordinates
pub fn canvas_to_screen(position: Point2, extents: Extents) -> Point2 {
    pt2(
        position.x - extents.width / 2.0,
        extents.height / 2.0 - position.y,
    )
}

// Fraction of the color wheel assigned to a type
pub fn type_hue(kind: usize, type_count: usize) -> f32 {
    if type_count == 0 {
        return 0.0;
    }
    kind as f32 / type_count as f32
}

pub fn type_color(kind: usize, type_count: usize) -> Hsl {
    hsl(type_hue(kind, type_count), 1.0, 0.5)
}

// Parse "#rgb" or "#rrggbb" (leading '#' optional)
pub fn parse_hex_color(text: &str) -> Option<(u8, u8, u8)> {
    let hex = text.trim().trim_start_matches('#');
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    match hex.len() {
        3 => {
            let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|d| d * 17);
            Some((digit(0)?, digit(1)?, digit(2)?))
        }
        6 => {
            let pair = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
            Some((pair(0)?, pair(2)?, pair(4)?))
        }
        _ => None,
    }
}
