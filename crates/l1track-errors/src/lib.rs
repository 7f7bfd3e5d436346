//! Error taxonomy for the L1 track-trigger stub emulation
//!
//! Every crate in the workspace reports failures through the types defined
//! here, so that a collection-level caller can decide per error whether to
//! abort a run or skip the offending stub.
//!
//! # Architecture
//!
//! - [`common`]: The top-level [`L1TrackError`], categories and severities
//! - [`stub`]: Fatal per-stub errors ([`ConfigurationError`], [`DomainInvariantError`])
//! - [`geometry`]: Module descriptor lookup and consistency errors
//! - [`validation`]: Settings validation errors
//!
//! Conditions that are expected outcomes rather than failures are *not*
//! errors: a missing truth-mapping entry is an `Option::None`, and a stub
//! whose bend is incompatible with the Hough Pt acceptance is stored as a
//! degenerate bin range.
//!
//! # Example
//!
//! ```
//! use l1track_errors::prelude::*;
//!
//! fn check_radius(r: f32, inner: f32, outer: f32, z: f32) -> Result<f32> {
//!     if r < inner || r > outer {
//!         return Err(ConfigurationError::OutsideTrackerVolume { r, z }.into());
//!     }
//!     Ok(r)
//! }
//!
//! assert!(check_radius(10.0, 21.8, 112.7, 0.0).is_err());
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs, rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod common;
pub mod geometry;
pub mod prelude;
pub mod stub;
pub mod validation;

pub use common::{ErrorCategory, ErrorSeverity, L1TrackError};
pub use geometry::GeometryError;
pub use stub::{ConfigurationError, DomainInvariantError};
pub use validation::ValidationError;

/// A specialized `Result` type for stub emulation operations.
pub type Result<T> = std::result::Result<T, L1TrackError>;
