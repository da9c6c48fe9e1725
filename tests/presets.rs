/*
 * Preset Tests
 *
 * Saving and loading configurations as JSON files.
 */

use std::fs;
use std::path::PathBuf;

use particle_life::{BoundaryMode, Configuration, InteractionMatrix, PresetError, SimulationError};

// Scratch file unique to this test process and test name
fn scratch_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("particle-life-{}-{}.json", std::process::id(), name))
}

#[test]
fn saved_preset_loads_back_identically() {
    let path = scratch_path("round-trip");

    let matrix = InteractionMatrix::from_rows(vec![
        vec![0.5, -0.25, 1.0],
        vec![0.0, 0.75, -1.0],
        vec![-0.5, 0.125, 0.0],
    ])
    .unwrap();
    let mut config = Configuration::with_matrix(matrix);
    config.set_particle_count(321);
    config.set_time_step(0.01);
    config.set_friction_half_life(0.02);
    config.set_boundary_mode(BoundaryMode::Box);
    config.set_background_color("#202020");

    config.save_preset(&path).unwrap();
    let loaded = Configuration::load_preset(&path).unwrap();
    fs::remove_file(&path).ok();

    assert_eq!(loaded, config);
    assert_eq!(loaded.type_count(), 3);
    assert_eq!(loaded.matrix().get(2, 1), 0.125);
    assert!((loaded.friction_factor() - 0.5_f32.powf(0.5)).abs() < 1e-6);
    assert_eq!(loaded.background_color(), "#202020");
}

#[test]
fn malformed_preset_is_a_format_error() {
    let path = scratch_path("malformed");
    fs::write(&path, "{ not json").unwrap();

    let result = Configuration::load_preset(&path);
    fs::remove_file(&path).ok();

    assert!(matches!(result, Err(PresetError::Format(_))));
}

#[test]
fn inconsistent_preset_is_rejected() {
    let path = scratch_path("inconsistent");
    fs::write(
        &path,
        r#"{ "particle_count": 10, "type_count": 0, "interaction_matrix": [] }"#,
    )
    .unwrap();

    let result = Configuration::load_preset(&path);
    fs::remove_file(&path).ok();

    match result {
        Err(PresetError::Invalid(SimulationError::NoParticleTypes { particle_count })) => {
            assert_eq!(particle_count, 10)
        }
        other => panic!("expected an invalid preset, got {:?}", other),
    }
}

#[test]
fn preset_errors_expose_their_source() {
    let error = Configuration::load_preset(scratch_path("does-not-exist")).unwrap_err();
    assert!(matches!(error, PresetError::Io(_)));
    assert!(std::error::Error::source(&error).is_some());
    assert!(error.to_string().starts_with("Failed to access preset file"));
}
