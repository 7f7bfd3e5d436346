//! Module descriptor lookup and consistency errors.

use crate::common::ErrorSeverity;

/// Errors from the detector module catalog.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    /// No descriptor is registered for this module id
    #[error("Detector module not found: {0}")]
    ModuleNotFound(u32),

    /// A descriptor violates its own invariants
    #[error("Invalid descriptor for module {module}: {field} {reason}")]
    InvalidDescriptor {
        /// Module id
        module: u32,
        /// Offending field
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },

    /// A descriptor with this id is already registered
    #[error("Duplicate descriptor for module {0}")]
    DuplicateModule(u32),
}

impl GeometryError {
    /// Get the error severity.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            GeometryError::ModuleNotFound(_) => ErrorSeverity::Error,
            GeometryError::InvalidDescriptor { .. } => ErrorSeverity::Critical,
            GeometryError::DuplicateModule(_) => ErrorSeverity::Warning,
        }
    }

    /// Create an invalid descriptor error.
    pub fn invalid(module: u32, field: &'static str, reason: impl Into<String>) -> Self {
        GeometryError::InvalidDescriptor {
            module,
            field,
            reason: reason.into(),
        }
    }
}
