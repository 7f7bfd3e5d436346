//! Top-level error type and classification shared by all crates.

use core::fmt;

use crate::{ConfigurationError, DomainInvariantError, GeometryError, ValidationError};

/// Top-level error type wrapping every sub-error of the workspace.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum L1TrackError {
    /// Geometry or settings do not match the data being processed
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// A geometry-table assumption was violated
    #[error("Domain invariant violated: {0}")]
    DomainInvariant(#[from] DomainInvariantError),

    /// Module lookup or descriptor errors
    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),

    /// Settings validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Settings could not be read or parsed
    #[error("Failed to load settings: {0}")]
    Load(String),
}

impl L1TrackError {
    /// Get the error category for classification.
    pub fn category(&self) -> ErrorCategory {
        match self {
            L1TrackError::Configuration(_) => ErrorCategory::Configuration,
            L1TrackError::DomainInvariant(_) => ErrorCategory::DomainInvariant,
            L1TrackError::Geometry(_) => ErrorCategory::Geometry,
            L1TrackError::Validation(_) => ErrorCategory::Validation,
            L1TrackError::Load(_) => ErrorCategory::Load,
        }
    }

    /// Get the error severity level.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            L1TrackError::Configuration(e) => e.severity(),
            L1TrackError::DomainInvariant(e) => e.severity(),
            L1TrackError::Geometry(e) => e.severity(),
            L1TrackError::Validation(e) => e.severity(),
            L1TrackError::Load(_) => ErrorSeverity::Error,
        }
    }

    /// Whether the error only affects the stub being built.
    ///
    /// Fatal errors still abort the single affected stub; this flag tells a
    /// collection builder whether skipping that stub leaves the rest of the
    /// run meaningful.
    pub fn is_recoverable(&self) -> bool {
        self.severity() < ErrorSeverity::Critical
    }

    /// Create a load error with a message.
    pub fn load(msg: impl Into<String>) -> Self {
        L1TrackError::Load(msg.into())
    }
}

/// Error category for classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ErrorCategory {
    /// Geometry/configuration mismatch
    Configuration = 0,
    /// Violated geometry-table assumption
    DomainInvariant = 1,
    /// Module lookup
    Geometry = 2,
    /// Settings validation
    Validation = 3,
    /// Settings loading
    Load = 4,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Configuration => write!(f, "Configuration"),
            ErrorCategory::DomainInvariant => write!(f, "DomainInvariant"),
            ErrorCategory::Geometry => write!(f, "Geometry"),
            ErrorCategory::Validation => write!(f, "Validation"),
            ErrorCategory::Load => write!(f, "Load"),
        }
    }
}

/// Error severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum ErrorSeverity {
    /// Informational, no action required
    Info = 0,
    /// Warning, may require attention
    Warning = 1,
    /// Error, the operation failed
    Error = 2,
    /// Critical, the run configuration is inconsistent with its input
    Critical = 3,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
