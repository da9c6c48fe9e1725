/*
 * Error Module
 *
 * This module defines the errors the simulation can surface. The kernel itself
 * never fails transiently; the only faults are configuration-integrity problems
 * (a matrix that does not match the type count) and preset file problems.
 */

use std::fmt;

// Errors raised when the configuration cannot drive a tick
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    // The matrix dimension does not equal the configured type count
    MatrixSizeMismatch { type_count: usize, matrix_size: usize },
    // A row of a supplied matrix has the wrong length
    NonSquareMatrix { rows: usize, row: usize, len: usize },
    // A cell edit addressed a row or column outside the matrix
    CellOutOfRange { row: usize, col: usize, size: usize },
    // Particles were requested but there are no types to draw from
    NoParticleTypes { particle_count: usize },
    // A supplied particle carries a type the matrix has no row for
    UnknownType { id: u64, kind: usize, type_count: usize },
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::MatrixSizeMismatch { type_count, matrix_size } => write!(
                f,
                "Interaction matrix is {}x{} but the type count is {}",
                matrix_size, matrix_size, type_count
            ),
            SimulationError::NonSquareMatrix { rows, row, len } => write!(
                f,
                "Interaction matrix is not square: row {} has {} entries, expected {}",
                row, len, rows
            ),
            SimulationError::CellOutOfRange { row, col, size } => write!(
                f,
                "Matrix cell ({}, {}) is outside a {}x{} matrix",
                row, col, size, size
            ),
            SimulationError::NoParticleTypes { particle_count } => write!(
                f,
                "Cannot create {} particles with a type count of zero",
                particle_count
            ),
            SimulationError::UnknownType { id, kind, type_count } => write!(
                f,
                "Particle {} has type {} but only {} types are configured",
                id, kind, type_count
            ),
        }
    }
}

impl std::error::Error for SimulationError {}

// Errors that can occur while loading or saving a preset file
#[derive(Debug)]
pub enum PresetError {
    // Failed to read or write the file
    Io(std::io::Error),
    // The file is not a valid JSON preset
    Format(serde_json::Error),
    // The preset parsed but describes an inconsistent configuration
    Invalid(SimulationError),
}

impl fmt::Display for PresetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PresetError::Io(e) => write!(f, "Failed to access preset file: {}", e),
            PresetError::Format(e) => write!(f, "Failed to parse preset: {}", e),
            PresetError::Invalid(e) => write!(f, "Preset is inconsistent: {}", e),
        }
    }
}

impl std::error::Error for PresetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PresetError::Io(e) => Some(e),
            PresetError::Format(e) => Some(e),
            PresetError::Invalid(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for PresetError {
    fn from(e: std::io::Error) -> Self {
        PresetError::Io(e)
    }
}

impl From<serde_json::Error> for PresetError {
    fn from(e: serde_json::Error) -> Self {
        PresetError::Format(e)
    }
}

impl From<SimulationError> for PresetError {
    fn from(e: SimulationError) -> Self {
        PresetError::Invalid(e)
    }
}
