/*
 * Engine Module
 *
 * This module owns the particle collection and advances it one tick at a time.
 * A tick reads the configuration it is handed and:
 * 1. Rebuilds the whole population if the particle count (or type count) changed
 * 2. Computes every particle's force from the current positions of all others
 * 3. Integrates velocity and position
 * 4. Resolves the canvas boundary
 *
 * All forces are computed before any particle moves, so the order particles are
 * stored in never affects the result. The force pass can run on rayon's thread
 * pool; each particle's sum is still accumulated in the same order, so the
 * parallel and sequential passes produce the same values.
 */

use nannou::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use tracing::{debug, info, trace};

use crate::config::Configuration;
use crate::error::SimulationError;
use crate::force::pair_contribution;
use crate::matrix::InteractionMatrix;
use crate::particle::{Extents, Particle};

// What a call to `tick` did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    // Nothing moved; state is kept as is
    Paused,
    // Forces were applied; `repopulated` is set when a fresh population was created first
    Advanced { repopulated: bool },
}

pub struct Engine {
    particles: Vec<Particle>,
    // Scaled force from the last tick, one entry per particle
    forces: Vec<Vec2>,
    extents: Extents,
    rng: StdRng,
    next_id: u64,
    generation: u64,
    generation_type_count: usize,
    reset_requested: bool,
    ticks: u64,
}

impl Engine {
    pub fn new(extents: Extents) -> Self {
        Self::from_rng(extents, StdRng::from_entropy())
    }

    // Reproducible populations and matrix randomization
    pub fn with_seed(extents: Extents, seed: u64) -> Self {
        Self::from_rng(extents, StdRng::seed_from_u64(seed))
    }

    fn from_rng(extents: Extents, rng: StdRng) -> Self {
        Self {
            particles: Vec::new(),
            forces: Vec::new(),
            extents,
            rng,
            next_id: 0,
            generation: 0,
            generation_type_count: 0,
            reset_requested: false,
            ticks: 0,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    // Position and type of every particle, in storage order, for drawing
    pub fn render_points(&self) -> impl Iterator<Item = (Point2, usize)> + '_ {
        self.particles.iter().map(|particle| (particle.position, particle.kind))
    }

    // Forces applied during the last tick
    pub fn forces(&self) -> &[Vec2] {
        &self.forces
    }

    pub fn extents(&self) -> Extents {
        self.extents
    }

    // Canvas size changes apply to the next boundary check; positions are not rescaled
    pub fn set_extents(&mut self, extents: Extents) {
        self.extents = extents;
    }

    // Number of populations created so far
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    // Force a fresh population on the next tick even if the count is unchanged
    pub fn request_reset(&mut self) {
        self.reset_requested = true;
    }

    // Re-seed the matrix from the engine's random source
    pub fn randomize_matrix(&mut self, config: &mut Configuration) {
        config.randomize_matrix(&mut self.rng);
        info!(types = config.type_count(), "randomized interaction matrix");
    }

    // Resize (and re-seed) the matrix from the engine's random source
    pub fn set_type_count(&mut self, config: &mut Configuration, type_count: usize) {
        config.set_type_count_with(type_count, &mut self.rng);
        info!(types = type_count, "changed type count");
    }

    // Adopt an explicit population as a new generation
    pub fn replace_particles(
        &mut self,
        particles: Vec<Particle>,
        config: &Configuration,
    ) -> Result<(), SimulationError> {
        check_types(&particles, config)?;

        let max_id = particles.iter().map(|p| p.id).max();
        self.next_id = self.next_id.max(max_id.map_or(0, |id| id + 1));
        self.particles = particles;
        self.forces.clear();
        self.generation += 1;
        self.generation_type_count = config.type_count();
        self.reset_requested = false;
        Ok(())
    }

    // Advance the simulation by one tick
    pub fn tick(&mut self, config: &Configuration) -> Result<TickOutcome, SimulationError> {
        if config.paused() {
            return Ok(TickOutcome::Paused);
        }

        config.validate()?;

        let repopulated = self.needs_repopulation(config);
        if repopulated {
            self.repopulate(config);
        }

        self.compute_forces(config);
        self.integrate(config);

        self.ticks += 1;
        trace!(tick = self.ticks, particles = self.particles.len(), "tick complete");

        Ok(TickOutcome::Advanced { repopulated })
    }

    // Force pass alone: fill `forces` from the current positions without moving anything
    pub fn refresh_forces(&mut self, config: &Configuration) -> Result<(), SimulationError> {
        config.validate()?;
        check_types(&self.particles, config)?;
        self.compute_forces(config);
        Ok(())
    }

    fn needs_repopulation(&self, config: &Configuration) -> bool {
        self.reset_requested
            || self.particles.len() != config.particle_count()
            || (!self.particles.is_empty() && self.generation_type_count != config.type_count())
    }

    // Discard every particle and create exactly `particle_count` fresh ones.
    // Ids keep counting up so no id is ever reused across generations.
    fn repopulate(&mut self, config: &Configuration) {
        let count = config.particle_count();
        let mut particles = Vec::with_capacity(count);

        for _ in 0..count {
            particles.push(Particle::random(self.next_id, &mut self.rng, config, self.extents));
            self.next_id += 1;
        }

        self.particles = particles;
        self.forces.clear();
        self.generation += 1;
        self.generation_type_count = config.type_count();
        self.reset_requested = false;

        info!(
            particles = count,
            types = config.type_count(),
            generation = self.generation,
            "created new population"
        );
    }

    // Fill `forces` with every particle's scaled force, reading positions only
    fn compute_forces(&mut self, config: &Configuration) {
        let max_radius = config.max_radius();
        let beta = config.beta();
        let scale = max_radius * config.force_factor();
        let matrix = config.matrix();
        let particles = &self.particles;

        self.forces.clear();
        self.forces.resize(particles.len(), Vec2::ZERO);

        if config.parallel() {
            // Use par_chunks_mut to keep the number of parallel tasks small
            let chunk_size = std::cmp::max(particles.len() / rayon::current_num_threads(), 1);

            self.forces.par_chunks_mut(chunk_size).enumerate().for_each(|(chunk_idx, force_chunk)| {
                for (i_in_chunk, force) in force_chunk.iter_mut().enumerate() {
                    let i = chunk_idx * chunk_size + i_in_chunk;
                    *force = accumulate_force(i, particles, matrix, max_radius, beta) * scale;
                }
            });
        } else {
            for (i, force) in self.forces.iter_mut().enumerate() {
                *force = accumulate_force(i, particles, matrix, max_radius, beta) * scale;
            }
        }

        debug!(particles = particles.len(), parallel = config.parallel(), "force pass complete");
    }

    fn integrate(&mut self, config: &Configuration) {
        let mode = config.boundary_mode();
        let extents = self.extents;

        for (particle, force) in self.particles.iter_mut().zip(&self.forces) {
            particle.integrate(*force, config);
            particle.resolve_boundary(mode, extents);
        }
    }
}

// Every particle's type must index the configured matrix
fn check_types(particles: &[Particle], config: &Configuration) -> Result<(), SimulationError> {
    match particles.iter().find(|p| p.kind >= config.type_count()) {
        Some(bad) => Err(SimulationError::UnknownType {
            id: bad.id,
            kind: bad.kind,
            type_count: config.type_count(),
        }),
        None => Ok(()),
    }
}

// Sum of the contributions every other particle makes to particle `i`
fn accumulate_force(
    i: usize,
    particles: &[Particle],
    matrix: &InteractionMatrix,
    max_radius: f32,
    beta: f32,
) -> Vec2 {
    let a = &particles[i];
    let row = matrix.row(a.kind);
    let mut total = Vec2::ZERO;

    for (j, b) in particles.iter().enumerate() {
        if i == j {
            continue;
        }
        total += pair_contribution(b.position - a.position, row[b.kind], max_radius, beta);
    }

    total
}
