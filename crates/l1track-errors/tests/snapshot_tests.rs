//! Snapshot tests for error message formatting.
//!
//! These keep error messages stable, since downstream job logs are grepped
//! for them.

use l1track_errors::{
    ConfigurationError, DomainInvariantError, GeometryError, L1TrackError, ValidationError,
};
use insta::assert_snapshot;

#[test]
fn test_outside_tracker_volume() {
    assert_snapshot!(
        ConfigurationError::OutsideTrackerVolume { r: 15.5, z: 3.25 }.to_string(),
        @"Stub found outside assumed tracker volume: r=15.5, z=3.25"
    );
}

#[test]
fn test_reduced_layer_out_of_range() {
    assert_snapshot!(
        DomainInvariantError::ReducedLayerOutOfRange { layer_id: 16 }.to_string(),
        @"Reduced layer ID out of expected range for layer 16"
    );
}

#[test]
fn test_module_not_found_wrapped() {
    let err: L1TrackError = GeometryError::ModuleNotFound(1234).into();
    assert_snapshot!(err.to_string(), @"Geometry error: Detector module not found: 1234");
}

#[test]
fn test_validation_wrapped() {
    let err: L1TrackError = ValidationError::not_positive("hough.min_pt", -3.0_f32).into();
    assert_snapshot!(err.to_string(), @"Validation error: hough.min_pt must be positive, got -3.0");
}
