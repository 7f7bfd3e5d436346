//! Prelude module for convenient error handling imports.
//!
//! # Example
//!
//! ```
//! use l1track_errors::prelude::*;
//!
//! fn lookup(id: u32) -> Result<()> {
//!     Err(GeometryError::ModuleNotFound(id).into())
//! }
//!
//! assert_eq!(lookup(3).map_err(|e| e.category()), Err(ErrorCategory::Geometry));
//! ```

pub use crate::{
    Result,
    common::{ErrorCategory, ErrorSeverity, L1TrackError},
    geometry::GeometryError,
    stub::{ConfigurationError, DomainInvariantError},
    validation::ValidationError,
};
