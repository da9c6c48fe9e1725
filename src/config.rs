/*
 * Configuration Module
 *
 * This module defines the Configuration struct that holds every tunable value
 * of the simulation: particle and type counts, the interaction matrix, the
 * physical constants and the boundary policy. The engine reads it once per tick;
 * the UI and the command line write it through the setters below.
 *
 * It also keeps the snapshot-based change detection used by the UI to decide
 * when something needs to be logged or redrawn, and the JSON preset format.
 */

use std::fs;
use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{PresetError, SimulationError};
use crate::matrix::InteractionMatrix;

// How particles that leave the canvas are brought back
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoundaryMode {
    // Teleport to the opposite edge
    WrapAround,
    // Clamp to the edge and reverse that axis's velocity
    Box,
}

impl Default for BoundaryMode {
    fn default() -> Self {
        BoundaryMode::WrapAround
    }
}

// Stored form of the configuration, which is also what presets contain.
// The friction factor is derived and never stored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoredConfiguration {
    particle_count: usize,
    type_count: usize,
    interaction_matrix: InteractionMatrix,
    time_step: f32,
    max_radius: f32,
    beta: f32,
    force_factor: f32,
    friction_half_life: f32,
    speed_constant: f32,
    boundary_mode: BoundaryMode,
    paused: bool,
    min_speed: f32,
    max_speed: f32,
    background_color: String,
    enable_parallel: bool,
    show_debug: bool,
}

impl Default for StoredConfiguration {
    fn default() -> Self {
        Self {
            particle_count: 1000,
            type_count: 6,
            interaction_matrix: InteractionMatrix::random(6, &mut rand::thread_rng()),
            time_step: 0.02,
            max_radius: 80.0,
            beta: 0.3,
            force_factor: 1.0,
            friction_half_life: 0.04,
            speed_constant: 1.0,
            boundary_mode: BoundaryMode::WrapAround,
            paused: false,
            min_speed: -1.0,
            max_speed: 1.0,
            background_color: String::from("#111111"),
            enable_parallel: true,
            show_debug: false,
        }
    }
}

// What changed between the last snapshot and now
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConfigChanges {
    pub particle_count_changed: bool,
    pub type_count_changed: bool,
    pub any_changed: bool,
}

// Configuration as read from a preset. A preset may leave the matrix out;
// one is then generated at the preset's own type count.
#[derive(Deserialize)]
pub struct PresetValues {
    #[serde(default)]
    interaction_matrix: Option<InteractionMatrix>,
    #[serde(flatten)]
    values: StoredConfiguration,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(from = "PresetValues", into = "StoredConfiguration")]
pub struct Configuration {
    values: StoredConfiguration,
    // 0.5^(dt / half-life), kept in sync by the dt and half-life setters
    friction_factor: f32,
    // Set while the matrix is one drawn from thread_rng rather than supplied or seeded
    generated_matrix: bool,
    // Internal state for tracking changes
    previous_values: Option<Box<StoredConfiguration>>,
}

impl From<PresetValues> for Configuration {
    fn from(preset: PresetValues) -> Self {
        let mut values = preset.values;
        let generated_matrix = match preset.interaction_matrix {
            Some(matrix) => {
                values.interaction_matrix = matrix;
                false
            }
            None => {
                values.interaction_matrix = InteractionMatrix::random(values.type_count, &mut rand::thread_rng());
                true
            }
        };
        Self::from_values(values, generated_matrix)
    }
}

impl From<Configuration> for StoredConfiguration {
    fn from(config: Configuration) -> Self {
        config.values
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::from_values(StoredConfiguration::default(), true)
    }
}

impl PartialEq for Configuration {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

impl Configuration {
    // Default settings with an explicit matrix; the type count follows the matrix
    pub fn with_matrix(matrix: InteractionMatrix) -> Self {
        let mut config = Self::default();
        config.replace_matrix(matrix);
        config
    }

    fn from_values(values: StoredConfiguration, generated_matrix: bool) -> Self {
        let mut config = Self {
            values,
            friction_factor: 1.0,
            generated_matrix,
            previous_values: None,
        };
        config.refresh_friction_factor();
        config
    }

    fn refresh_friction_factor(&mut self) {
        self.friction_factor = 0.5_f32.powf(self.values.time_step / self.values.friction_half_life);
    }

    /* Universe */

    pub fn particle_count(&self) -> usize {
        self.values.particle_count
    }

    pub fn set_particle_count(&mut self, particle_count: usize) {
        self.values.particle_count = particle_count;
    }

    pub fn paused(&self) -> bool {
        self.values.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.values.paused = paused;
    }

    pub fn background_color(&self) -> &str {
        &self.values.background_color
    }

    pub fn set_background_color(&mut self, color: impl Into<String>) {
        self.values.background_color = color.into();
    }

    /* Types and interaction matrix */

    pub fn type_count(&self) -> usize {
        self.values.type_count
    }

    // Changing the type count re-seeds the matrix at the new size
    pub fn set_type_count_with<R: Rng + ?Sized>(&mut self, type_count: usize, rng: &mut R) {
        self.values.type_count = type_count;
        self.values.interaction_matrix = InteractionMatrix::random(type_count, rng);
        self.generated_matrix = false;
    }

    pub fn set_type_count(&mut self, type_count: usize) {
        self.set_type_count_with(type_count, &mut rand::thread_rng());
    }

    pub fn matrix(&self) -> &InteractionMatrix {
        &self.values.interaction_matrix
    }

    // Atomic replacement; the type count follows the new matrix
    pub fn replace_matrix(&mut self, matrix: InteractionMatrix) {
        self.values.type_count = matrix.size();
        self.values.interaction_matrix = matrix;
        self.generated_matrix = false;
    }

    // True while the matrix is the unseeded one created with the defaults or
    // filled in for a preset that had none
    pub fn has_generated_matrix(&self) -> bool {
        self.generated_matrix
    }

    pub fn set_matrix_cell(&mut self, a: usize, b: usize, value: f32) -> Result<(), SimulationError> {
        self.values.interaction_matrix.set(a, b, value)
    }

    pub fn randomize_matrix<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.values.interaction_matrix.randomize(rng);
        self.generated_matrix = false;
    }

    /* Physics */

    pub fn time_step(&self) -> f32 {
        self.values.time_step
    }

    pub fn set_time_step(&mut self, time_step: f32) {
        self.values.time_step = time_step;
        self.refresh_friction_factor();
    }

    pub fn max_radius(&self) -> f32 {
        self.values.max_radius
    }

    pub fn set_max_radius(&mut self, max_radius: f32) {
        self.values.max_radius = max_radius;
    }

    pub fn beta(&self) -> f32 {
        self.values.beta
    }

    pub fn set_beta(&mut self, beta: f32) {
        self.values.beta = beta;
    }

    pub fn force_factor(&self) -> f32 {
        self.values.force_factor
    }

    pub fn set_force_factor(&mut self, force_factor: f32) {
        self.values.force_factor = force_factor;
    }

    pub fn friction_half_life(&self) -> f32 {
        self.values.friction_half_life
    }

    pub fn set_friction_half_life(&mut self, half_life: f32) {
        self.values.friction_half_life = half_life;
        self.refresh_friction_factor();
    }

    pub fn friction_factor(&self) -> f32 {
        self.friction_factor
    }

    pub fn speed_constant(&self) -> f32 {
        self.values.speed_constant
    }

    pub fn set_speed_constant(&mut self, speed_constant: f32) {
        self.values.speed_constant = speed_constant;
    }

    // Per-axis bounds for the random initial velocity of new particles
    pub fn min_speed(&self) -> f32 {
        self.values.min_speed
    }

    pub fn set_min_speed(&mut self, min_speed: f32) {
        self.values.min_speed = min_speed;
    }

    pub fn max_speed(&self) -> f32 {
        self.values.max_speed
    }

    pub fn set_max_speed(&mut self, max_speed: f32) {
        self.values.max_speed = max_speed;
    }

    /* Boundary policy */

    pub fn boundary_mode(&self) -> BoundaryMode {
        self.values.boundary_mode
    }

    pub fn set_boundary_mode(&mut self, mode: BoundaryMode) {
        self.values.boundary_mode = mode;
    }

    pub fn wrap_around(&self) -> bool {
        self.values.boundary_mode == BoundaryMode::WrapAround
    }

    // The two policies are exclusive: enabling one disables the other
    pub fn set_wrap_around(&mut self, enabled: bool) {
        self.values.boundary_mode = if enabled { BoundaryMode::WrapAround } else { BoundaryMode::Box };
    }

    pub fn is_box(&self) -> bool {
        self.values.boundary_mode == BoundaryMode::Box
    }

    pub fn set_box(&mut self, enabled: bool) {
        self.values.boundary_mode = if enabled { BoundaryMode::Box } else { BoundaryMode::WrapAround };
    }

    /* Performance and display */

    pub fn parallel(&self) -> bool {
        self.values.enable_parallel
    }

    pub fn set_parallel(&mut self, enabled: bool) {
        self.values.enable_parallel = enabled;
    }

    pub fn show_debug(&self) -> bool {
        self.values.show_debug
    }

    pub fn set_show_debug(&mut self, show: bool) {
        self.values.show_debug = show;
    }

    // The matrix must match the type count, and particles need at least one type
    pub fn validate(&self) -> Result<(), SimulationError> {
        let matrix_size = self.values.interaction_matrix.size();
        if matrix_size != self.values.type_count {
            return Err(SimulationError::MatrixSizeMismatch {
                type_count: self.values.type_count,
                matrix_size,
            });
        }
        if self.values.type_count == 0 && self.values.particle_count > 0 {
            return Err(SimulationError::NoParticleTypes {
                particle_count: self.values.particle_count,
            });
        }
        Ok(())
    }

    /* Change detection */

    // Take a snapshot of current values for change detection
    pub fn take_snapshot(&mut self) {
        self.previous_values = Some(Box::new(self.values.clone()));
    }

    // Compare against the last snapshot; without one nothing has changed
    pub fn detect_changes(&self) -> ConfigChanges {
        let Some(prev) = &self.previous_values else {
            return ConfigChanges::default();
        };

        ConfigChanges {
            particle_count_changed: self.values.particle_count != prev.particle_count,
            type_count_changed: self.values.type_count != prev.type_count,
            any_changed: self.values != **prev,
        }
    }

    /* Presets */

    pub fn from_json(json: &str) -> Result<Self, PresetError> {
        let config: Configuration = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, PresetError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load_preset(path: impl AsRef<Path>) -> Result<Self, PresetError> {
        let path = path.as_ref();
        let config = Self::from_json(&fs::read_to_string(path)?)?;
        info!(path = %path.display(), types = config.type_count(), particles = config.particle_count(), "loaded preset");
        Ok(config)
    }

    pub fn save_preset(&self, path: impl AsRef<Path>) -> Result<(), PresetError> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?)?;
        info!(path = %path.display(), "saved preset");
        Ok(())
    }

    /* Parameter ranges for UI sliders */

    pub fn particle_count_range() -> std::ops::RangeInclusive<usize> {
        0..=5000
    }

    pub fn type_count_range() -> std::ops::RangeInclusive<usize> {
        1..=12
    }

    pub fn time_step_range() -> std::ops::RangeInclusive<f32> {
        0.001..=0.1
    }

    pub fn max_radius_range() -> std::ops::RangeInclusive<f32> {
        5.0..=300.0
    }

    pub fn beta_range() -> std::ops::RangeInclusive<f32> {
        0.01..=0.99
    }

    pub fn force_factor_range() -> std::ops::RangeInclusive<f32> {
        0.0..=10.0
    }

    pub fn friction_half_life_range() -> std::ops::RangeInclusive<f32> {
        0.001..=1.0
    }

    pub fn speed_constant_range() -> std::ops::RangeInclusive<f32> {
        0.0..=2.0
    }

    pub fn initial_speed_range() -> std::ops::RangeInclusive<f32> {
        -5.0..=5.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn friction_factor_follows_dt_and_half_life() {
        let mut config = Configuration::default();
        config.set_time_step(0.1);
        config.set_friction_half_life(0.1);
        assert!((config.friction_factor() - 0.5).abs() < 1e-6);

        config.set_time_step(0.2);
        assert!((config.friction_factor() - 0.25).abs() < 1e-6);

        config.set_friction_half_life(0.4);
        assert!((config.friction_factor() - 0.5_f32.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn boundary_flags_are_exclusive() {
        let mut config = Configuration::default();
        config.set_box(true);
        assert!(config.is_box());
        assert!(!config.wrap_around());

        config.set_wrap_around(true);
        assert!(config.wrap_around());
        assert!(!config.is_box());

        config.set_wrap_around(false);
        assert_eq!(config.boundary_mode(), BoundaryMode::Box);
    }

    #[test]
    fn type_count_change_resizes_matrix() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut config = Configuration::default();
        config.set_type_count_with(3, &mut rng);

        assert_eq!(config.type_count(), 3);
        assert_eq!(config.matrix().size(), 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn replacing_the_matrix_moves_the_type_count() {
        let mut config = Configuration::default();
        config.replace_matrix(InteractionMatrix::zeros(2));
        assert_eq!(config.type_count(), 2);
        assert!(config.set_matrix_cell(1, 1, -0.5).is_ok());
        assert_eq!(config.matrix().get(1, 1), -0.5);
    }

    #[test]
    fn setters_do_not_validate_ranges() {
        let mut config = Configuration::default();
        config.set_max_radius(-4.0);
        config.set_beta(1.5);
        assert_eq!(config.max_radius(), -4.0);
        assert_eq!(config.beta(), 1.5);
    }

    #[test]
    fn change_detection_reports_counts() {
        let mut config = Configuration::default();
        assert_eq!(config.detect_changes(), ConfigChanges::default());

        config.take_snapshot();
        assert!(!config.detect_changes().any_changed);

        config.set_particle_count(12);
        let changes = config.detect_changes();
        assert!(changes.particle_count_changed);
        assert!(!changes.type_count_changed);
        assert!(changes.any_changed);

        config.take_snapshot();
        config.set_speed_constant(0.5);
        let changes = config.detect_changes();
        assert!(!changes.particle_count_changed);
        assert!(changes.any_changed);
    }

    #[test]
    fn json_round_trip_restores_derived_friction() {
        let mut config = Configuration::with_matrix(InteractionMatrix::zeros(2));
        config.set_time_step(0.05);
        config.set_friction_half_life(0.05);
        config.set_box(true);

        let restored = Configuration::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(restored, config);
        assert!((restored.friction_factor() - 0.5).abs() < 1e-6);
        assert!(restored.is_box());
    }

    #[test]
    fn preset_with_mismatched_matrix_is_rejected() {
        let json = r#"{ "type_count": 3, "interaction_matrix": [[0.0, 1.0], [1.0, 0.0]] }"#;
        match Configuration::from_json(json) {
            Err(PresetError::Invalid(SimulationError::MatrixSizeMismatch { type_count, matrix_size })) => {
                assert_eq!(type_count, 3);
                assert_eq!(matrix_size, 2);
            }
            other => panic!("expected a size mismatch, got {:?}", other),
        }
    }

    #[test]
    fn partial_preset_falls_back_to_defaults() {
        let json = r#"{ "type_count": 2, "interaction_matrix": [[0.0, 1.0], [1.0, 0.0]], "beta": 0.4 }"#;
        let config = Configuration::from_json(json).unwrap();
        assert_eq!(config.beta(), 0.4);
        assert_eq!(config.particle_count(), 1000);
        assert_eq!(config.boundary_mode(), BoundaryMode::WrapAround);
        assert!(!config.has_generated_matrix());
    }

    #[test]
    fn preset_without_matrix_gets_one_of_its_type_count() {
        let json = r#"{ "type_count": 3, "particle_count": 40 }"#;
        let config = Configuration::from_json(json).unwrap();
        assert_eq!(config.type_count(), 3);
        assert_eq!(config.matrix().size(), 3);
        assert!(config.has_generated_matrix());
    }

    #[test]
    fn seeded_or_supplied_matrices_are_not_generated() {
        let mut config = Configuration::default();
        assert!(config.has_generated_matrix());

        config.set_type_count_with(4, &mut StdRng::seed_from_u64(2));
        assert!(!config.has_generated_matrix());

        let mut config = Configuration::default();
        config.replace_matrix(InteractionMatrix::zeros(2));
        assert!(!config.has_generated_matrix());
    }
}
