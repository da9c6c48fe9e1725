/*
 * Debug Information Module
 *
 * This module defines the DebugInfo struct that contains performance metrics
 * and simulation status to be displayed in the UI and the debug overlay.
 */

use std::time::Duration;

// Debug information to display
pub struct DebugInfo {
    pub fps: f32,
    pub frame_time: Duration,
    pub tick_time: Duration,
    pub particle_count: usize,
    pub generation: u64,
    pub ticks: u64,
    pub paused: bool,
    // Message of the configuration fault currently rejecting ticks
    pub last_error: Option<String>,
}

impl Default for DebugInfo {
    fn default() -> Self {
        Self {
            fps: 0.0,
            frame_time: Duration::ZERO,
            tick_time: Duration::ZERO,
            particle_count: 0,
            generation: 0,
            ticks: 0,
            paused: false,
            last_error: None,
        }
    }
}

impl DebugInfo {
    // Lines shown by the overlay, top to bottom
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("FPS: {:.1}", self.fps),
            format!("Frame time: {:.2} ms", self.frame_time.as_secs_f64() * 1000.0),
            format!("Tick time: {:.2} ms", self.tick_time.as_secs_f64() * 1000.0),
            format!("Particles: {}", self.particle_count),
            format!("Generation: {}", self.generation),
            format!("Ticks: {}", self.ticks),
        ];
        if self.paused {
            lines.push(String::from("Paused"));
        }
        if let Some(error) = &self.last_error {
            lines.push(format!("Error: {}", error));
        }
        lines
    }
}
