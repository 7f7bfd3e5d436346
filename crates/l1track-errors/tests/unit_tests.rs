//! Unit tests for all error variants.
//!
//! Tests Display implementations, std::error::Error implementations,
//! and From conversions.

use l1track_errors::{
    ConfigurationError, DomainInvariantError, ErrorCategory, ErrorSeverity, GeometryError,
    L1TrackError, Result, ValidationError,
};

mod configuration_error_tests {
    use super::*;

    #[test]
    fn test_all_variants_display() -> Result<()> {
        let variants = vec![
            ConfigurationError::OutsideTrackerVolume { r: 120.0, z: 10.0 },
            ConfigurationError::MissingBendTable {
                region: "barrel layer",
                index: 7,
            },
            ConfigurationError::invalid_setting("hough.nbins_pt", "must be non-zero"),
        ];

        for variant in variants {
            assert!(!variant.to_string().is_empty());
        }
        Ok(())
    }

    #[test]
    fn test_outside_volume_is_skippable() -> Result<()> {
        let err: L1TrackError = ConfigurationError::OutsideTrackerVolume { r: 5.0, z: 0.0 }.into();
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert!(err.is_recoverable());
        Ok(())
    }

    #[test]
    fn test_missing_table_is_critical() -> Result<()> {
        let err: L1TrackError = ConfigurationError::MissingBendTable {
            region: "endcap ring",
            index: 99,
        }
        .into();
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(!err.is_recoverable());
        Ok(())
    }
}

mod domain_invariant_tests {
    use super::*;

    #[test]
    fn test_display_names_layer() -> Result<()> {
        let err = DomainInvariantError::ReducedLayerOutOfRange { layer_id: 16 };
        assert!(err.to_string().contains("16"));

        let err = DomainInvariantError::UnknownLayer {
            barrel: true,
            index: 7,
        };
        assert!(err.to_string().contains("barrel=true"));
        Ok(())
    }

    #[test]
    fn test_wraps_into_top_level() -> Result<()> {
        let err: L1TrackError = DomainInvariantError::ReducedLayerOutOfRange { layer_id: 0 }.into();
        assert!(matches!(err, L1TrackError::DomainInvariant(_)));
        assert_eq!(err.category(), ErrorCategory::DomainInvariant);
        Ok(())
    }
}

mod geometry_error_tests {
    use super::*;

    #[test]
    fn test_not_found_round_trip_through_result() {
        fn lookup(id: u32) -> Result<()> {
            Err(GeometryError::ModuleNotFound(id).into())
        }

        match lookup(11) {
            Err(L1TrackError::Geometry(GeometryError::ModuleNotFound(11))) => {}
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_is_warning() {
        assert_eq!(
            GeometryError::DuplicateModule(3).severity(),
            ErrorSeverity::Warning
        );
    }
}

mod validation_error_tests {
    use super::*;

    #[test]
    fn test_all_variants_display() {
        let variants = vec![
            ValidationError::out_of_range("stub_cuts.max_stub_eta", 9.0_f32, 0.0, 5.0),
            ValidationError::not_positive("tracker.outer_radius", -1.0_f32),
            ValidationError::not_finite("field.b_tesla"),
            ValidationError::constraint("inner radius must be below outer radius"),
        ];

        for variant in variants {
            let err: L1TrackError = variant.into();
            assert_eq!(err.category(), ErrorCategory::Validation);
            assert!(!err.to_string().is_empty());
        }
    }
}
