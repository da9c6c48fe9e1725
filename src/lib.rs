/*
 * Particle Life Simulation - Module Definitions
 *
 * This file defines the module structure for the particle life application.
 * The simulation kernel (config, matrix, force, particle, engine) has no
 * knowledge of windows or drawing; the remaining modules host it in a nannou
 * window with an egui settings panel.
 */

// Re-export key components for easier access
pub use app::{Launch, Model};
pub use config::{BoundaryMode, ConfigChanges, Configuration};
pub use debug::DebugInfo;
pub use engine::{Engine, TickOutcome};
pub use error::{PresetError, SimulationError};
pub use matrix::InteractionMatrix;
pub use particle::{Extents, Particle};

// Simulation kernel
pub mod config;
pub mod engine;
pub mod error;
pub mod force;
pub mod matrix;
pub mod particle;

// Host application
pub mod app;
pub mod cli;
pub mod debug;
pub mod input;
pub mod renderer;
pub mod ui;

// Constants
pub const PARTICLE_RADIUS: f32 = 2.0;
pub const DEFAULT_WINDOW_WIDTH: u32 = 1280;
pub const DEFAULT_WINDOW_HEIGHT: u32 = 800;
