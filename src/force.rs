/*
 * Force Law Module
 *
 * This module contains the distance-response function every pair of particles
 * is evaluated with. Distances are measured in units of the interaction radius
 * (u = r / rMax):
 *
 *   0 < u < beta      f = u / beta - 1                     (always repulsive)
 *   beta <= u < 1     f = a * (1 - |2u - 1 - beta| / (1 - beta))
 *
 * The second branch is a triangular lobe that vanishes at both ends and peaks
 * at `a` halfway between beta and 1. Outside (0, 1) there is no interaction.
 */

use nannou::prelude::*;

// Scalar response at normalized distance `u` for matrix coefficient `attraction`.
// Degenerate beta (outside the open interval (0, 1)) yields no force instead of a
// division by zero.
pub fn response(u: f32, attraction: f32, beta: f32) -> f32 {
    if !(beta > 0.0 && beta < 1.0) {
        return 0.0;
    }
    if !(u > 0.0 && u < 1.0) {
        return 0.0;
    }

    let f = if u < beta {
        u / beta - 1.0
    } else {
        attraction * (1.0 - (2.0 * u - 1.0 - beta).abs() / (1.0 - beta))
    };

    if f.is_finite() {
        f
    } else {
        0.0
    }
}

// Unscaled force a particle feels from a neighbor displaced by `delta`
// (neighbor position minus own position). Coincident particles and pairs at or
// beyond the cutoff contribute nothing.
#[inline]
pub fn pair_contribution(delta: Vec2, attraction: f32, max_radius: f32, beta: f32) -> Vec2 {
    let r = delta.length();
    if r == 0.0 || !(r < max_radius) {
        return Vec2::ZERO;
    }

    let f = response(r / max_radius, attraction, beta);
    delta * (f / r)
}
