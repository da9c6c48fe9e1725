/*
 * Particle Module
 *
 * This module defines the Particle struct and its per-tick behavior.
 * A particle only knows its own state (id, type, position, velocity); every
 * interaction is computed by the engine and handed in as a finished force.
 *
 * Each tick a particle:
 * 1. Integrates the force it was given (friction, force, speed scaling)
 * 2. Moves by its new velocity
 * 3. Resolves the canvas boundary (wrap around or reflect)
 */

use nannou::prelude::*;
use rand::Rng;

use crate::config::{BoundaryMode, Configuration};

// Canvas size in simulation units; positions live in [0, width] x [0, height]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Extents {
    pub width: f32,
    pub height: f32,
}

impl Extents {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub id: u64,
    pub kind: usize,
    pub position: Point2,
    pub velocity: Vec2,
}

// Uniform sample that tolerates empty, inverted, overflowing or non-finite ranges.
// A non-finite bound collapses the range onto the other one (or 0 if neither is finite).
fn uniform<R: Rng + ?Sized>(rng: &mut R, low: f32, high: f32) -> f32 {
    match (low.is_finite(), high.is_finite()) {
        (true, true) => {}
        (true, false) => return low,
        (false, true) => return high,
        (false, false) => return 0.0,
    }

    if high <= low {
        return low;
    }

    if (high - low).is_finite() {
        rng.gen_range(low..high)
    } else {
        // The width overflows f32; interpolate so each term stays finite
        let t: f32 = rng.gen();
        low * (1.0 - t) + high * t
    }
}

impl Particle {
    // New particle of a given type at a random position with a random velocity
    pub fn with_kind<R: Rng + ?Sized>(
        id: u64,
        kind: usize,
        rng: &mut R,
        config: &Configuration,
        extents: Extents,
    ) -> Self {
        let x = uniform(rng, 0.0, extents.width);
        let y = uniform(rng, 0.0, extents.height);
        let vx = uniform(rng, config.min_speed(), config.max_speed());
        let vy = uniform(rng, config.min_speed(), config.max_speed());

        Self {
            id,
            kind,
            position: pt2(x, y),
            velocity: vec2(vx, vy),
        }
    }

    // New particle whose type is drawn uniformly from the configured types
    pub fn random<R: Rng + ?Sized>(
        id: u64,
        rng: &mut R,
        config: &Configuration,
        extents: Extents,
    ) -> Self {
        let kind = if config.type_count() > 0 {
            rng.gen_range(0..config.type_count())
        } else {
            0
        };
        Self::with_kind(id, kind, rng, config, extents)
    }

    // Apply this tick's (already scaled) force and move
    pub fn integrate(&mut self, force: Vec2, config: &Configuration) {
        self.velocity = self.velocity * config.friction_factor() + force * config.time_step();
        self.velocity *= config.speed_constant();
        self.position += self.velocity;
    }

    pub fn resolve_boundary(&mut self, mode: BoundaryMode, extents: Extents) {
        match mode {
            BoundaryMode::WrapAround => self.wrap_edges(extents),
            BoundaryMode::Box => self.reflect_edges(extents),
        }
    }

    // Teleport to the opposite edge. A single step, not a modulo: a particle far
    // outside the canvas lands exactly on one edge.
    pub fn wrap_edges(&mut self, extents: Extents) {
        if self.position.x < 0.0 {
            self.position.x = extents.width;
        } else if self.position.x > extents.width {
            self.position.x = 0.0;
        }

        if self.position.y < 0.0 {
            self.position.y = extents.height;
        } else if self.position.y > extents.height {
            self.position.y = 0.0;
        }
    }

    // Clamp to the edge and reverse the velocity on that axis
    pub fn reflect_edges(&mut self, extents: Extents) {
        if self.position.x < 0.0 {
            self.position.x = 0.0;
            self.velocity.x = -self.velocity.x;
        } else if self.position.x > extents.width {
            self.position.x = extents.width;
            self.velocity.x = -self.velocity.x;
        }

        if self.position.y < 0.0 {
            self.position.y = 0.0;
            self.velocity.y = -self.velocity.y;
        } else if self.position.y > extents.height {
            self.position.y = extents.height;
            self.velocity.y = -self.velocity.y;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::InteractionMatrix;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn particle_at(x: f32, y: f32, vx: f32, vy: f32) -> Particle {
        Particle {
            id: 0,
            kind: 0,
            position: pt2(x, y),
            velocity: vec2(vx, vy),
        }
    }

    #[test]
    fn integrate_applies_friction_force_and_speed() {
        let mut config = Configuration::with_matrix(InteractionMatrix::zeros(1));
        config.set_time_step(0.5);
        config.set_friction_half_life(0.5); // friction factor 0.5
        config.set_speed_constant(2.0);

        let mut particle = particle_at(10.0, 10.0, 4.0, -2.0);
        particle.integrate(vec2(2.0, 0.0), &config);

        // v = (4, -2) * 0.5 + (2, 0) * 0.5 = (3, -1); then * 2
        assert_eq!(particle.velocity, vec2(6.0, -2.0));
        assert_eq!(particle.position, pt2(16.0, 8.0));
    }

    #[test]
    fn wrap_is_a_single_step_teleport() {
        let extents = Extents::new(100.0, 50.0);

        let mut particle = particle_at(105.0, 25.0, 1.0, 0.0);
        particle.wrap_edges(extents);
        assert_eq!(particle.position.x, 0.0);

        let mut particle = particle_at(-3.0, 25.0, 1.0, 0.0);
        particle.wrap_edges(extents);
        assert_eq!(particle.position.x, 100.0);

        // Far outside still lands on exactly one edge
        let mut particle = particle_at(450.0, -170.0, 0.0, 0.0);
        particle.wrap_edges(extents);
        assert_eq!(particle.position, pt2(0.0, 50.0));

        // Velocity is untouched
        assert_eq!(particle.velocity, Vec2::ZERO);
    }

    #[test]
    fn box_clamps_and_reverses_the_crossing_axis() {
        let extents = Extents::new(100.0, 50.0);

        let mut particle = particle_at(101.0, 20.0, 2.0, 1.5);
        particle.reflect_edges(extents);
        assert_eq!(particle.position, pt2(100.0, 20.0));
        assert_eq!(particle.velocity, vec2(-2.0, 1.5));

        let mut particle = particle_at(30.0, -0.5, 0.5, -3.0);
        particle.resolve_boundary(BoundaryMode::Box, extents);
        assert_eq!(particle.position, pt2(30.0, 0.0));
        assert_eq!(particle.velocity, vec2(0.5, 3.0));
    }

    #[test]
    fn points_on_the_edge_are_inside() {
        let extents = Extents::new(100.0, 50.0);
        let mut particle = particle_at(100.0, 0.0, 1.0, 1.0);
        particle.resolve_boundary(BoundaryMode::WrapAround, extents);
        assert_eq!(particle.position, pt2(100.0, 0.0));
    }

    #[test]
    fn new_particles_start_inside_the_canvas() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut config = Configuration::with_matrix(InteractionMatrix::zeros(4));
        config.set_min_speed(-0.5);
        config.set_max_speed(0.5);
        let extents = Extents::new(200.0, 100.0);

        for id in 0..200 {
            let particle = Particle::random(id, &mut rng, &config, extents);
            assert!(particle.kind < 4);
            assert!((0.0..=200.0).contains(&particle.position.x));
            assert!((0.0..=100.0).contains(&particle.position.y));
            assert!((-0.5..=0.5).contains(&particle.velocity.x));
            assert!((-0.5..=0.5).contains(&particle.velocity.y));
        }
    }

    #[test]
    fn explicit_type_is_kept() {
        let mut rng = StdRng::seed_from_u64(3);
        let config = Configuration::with_matrix(InteractionMatrix::zeros(4));
        let particle = Particle::with_kind(9, 2, &mut rng, &config, Extents::new(10.0, 10.0));
        assert_eq!(particle.kind, 2);
        assert_eq!(particle.id, 9);
    }

    #[test]
    fn degenerate_ranges_do_not_panic() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut config = Configuration::with_matrix(InteractionMatrix::zeros(1));
        config.set_min_speed(1.0);
        config.set_max_speed(1.0);
        let particle = Particle::random(0, &mut rng, &config, Extents::new(0.0, 0.0));
        assert_eq!(particle.position, pt2(0.0, 0.0));
        assert_eq!(particle.velocity, vec2(1.0, 1.0));
    }

    #[test]
    fn extreme_speed_bounds_still_give_finite_velocities() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut config = Configuration::with_matrix(InteractionMatrix::zeros(1));
        let extents = Extents::new(50.0, 50.0);

        // Range wider than f32 can represent
        config.set_min_speed(-3.0e38);
        config.set_max_speed(3.0e38);
        for id in 0..50 {
            let particle = Particle::random(id, &mut rng, &config, extents);
            assert!(particle.velocity.x.is_finite() && particle.velocity.y.is_finite());
            assert!((-3.0e38..=3.0e38).contains(&particle.velocity.x));
        }

        config.set_min_speed(f32::NEG_INFINITY);
        config.set_max_speed(2.0);
        let particle = Particle::random(0, &mut rng, &config, extents);
        assert_eq!(particle.velocity, vec2(2.0, 2.0));

        config.set_min_speed(f32::NAN);
        config.set_max_speed(f32::INFINITY);
        let particle = Particle::random(0, &mut rng, &config, extents);
        assert_eq!(particle.velocity, Vec2::ZERO);
    }
}
