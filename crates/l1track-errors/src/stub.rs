//! Fatal errors raised while constructing a single stub.
//!
//! Both types abort construction of the affected stub only. Neither is
//! retried: every stub operation is deterministic, so a retry would
//! reproduce the identical error.

use crate::common::ErrorSeverity;

/// The input does not match the geometry or settings assumed by the run.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    /// Stub position lies outside the configured tracker volume
    #[error("Stub found outside assumed tracker volume: r={r}, z={z}")]
    OutsideTrackerVolume {
        /// Stub radius (cm)
        r: f32,
        /// Stub longitudinal coordinate (cm)
        z: f32,
    },

    /// No bend encoding table is configured for this layer or ring
    #[error("No bend encoding table for {region} {index}")]
    MissingBendTable {
        /// "barrel layer" or "endcap ring"
        region: &'static str,
        /// Layer or ring number
        index: u32,
    },

    /// A setting required by the stub pipeline has an unusable value
    #[error("Invalid setting '{field}': {reason}")]
    InvalidSetting {
        /// Setting name
        field: String,
        /// Why it cannot be used
        reason: String,
    },
}

impl ConfigurationError {
    /// Get the error severity.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ConfigurationError::OutsideTrackerVolume { .. } => ErrorSeverity::Error,
            ConfigurationError::MissingBendTable { .. } => ErrorSeverity::Critical,
            ConfigurationError::InvalidSetting { .. } => ErrorSeverity::Critical,
        }
    }

    /// Create an invalid setting error.
    pub fn invalid_setting(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigurationError::InvalidSetting {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// A geometry-table assumption baked into the firmware model was violated.
///
/// These are never clamped: a value outside the expected table means the
/// detector layout differs from the one the encoding was designed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DomainInvariantError {
    /// Reduced layer id fell outside 1-7
    #[error("Reduced layer ID out of expected range for layer {layer_id}")]
    ReducedLayerOutOfRange {
        /// Encoded layer id that produced the bad value
        layer_id: u32,
    },

    /// Layer or disk identifiers outside the known detector layout
    #[error("Unknown detector layer: barrel={barrel}, index={index}")]
    UnknownLayer {
        /// Whether the module is in the barrel
        barrel: bool,
        /// Barrel layer or endcap disk number
        index: u32,
    },
}

impl DomainInvariantError {
    /// Get the error severity.
    pub fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Critical
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outside_volume_display() {
        let err = ConfigurationError::OutsideTrackerVolume { r: 12.5, z: -30.0 };
        let msg = err.to_string();
        assert!(msg.contains("r=12.5"));
        assert!(msg.contains("z=-30"));
    }

    #[test]
    fn test_missing_table_display() {
        let err = ConfigurationError::MissingBendTable {
            region: "endcap ring",
            index: 16,
        };
        assert_eq!(err.to_string(), "No bend encoding table for endcap ring 16");
    }

    #[test]
    fn test_severities() {
        assert_eq!(
            ConfigurationError::OutsideTrackerVolume { r: 0.0, z: 0.0 }.severity(),
            ErrorSeverity::Error
        );
        assert_eq!(
            DomainInvariantError::ReducedLayerOutOfRange { layer_id: 0 }.severity(),
            ErrorSeverity::Critical
        );
    }

    #[test]
    fn test_domain_invariant_is_copy() {
        fn assert_copy<T: Copy>() {}
        assert_copy::<DomainInvariantError>();
    }
}
