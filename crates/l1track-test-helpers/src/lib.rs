//! Shared test utilities for the L1 track-trigger stub emulation.
//!
//! # Modules
//!
//! - [`mod@must`] - Unwrap helpers with good error messages and `#[track_caller]`
//! - [`assertions`] - Assertion macros for floats and q/Pt bin ranges
//! - [`fixtures`] - Module, settings and raw stub builders
//! - [`mock`] - Truth association and trajectory mocks
//! - [`logging`] - Test-writer tracing subscriber
//! - [`prelude`] - Convenience re-exports
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! l1track-test-helpers = { workspace = true }
//! ```
//!
//! ```rust,ignore
//! use l1track_test_helpers::prelude::*;
//! ```
//!
//! This crate depends on `l1track-stubs`, so only that crate's `tests/`
//! directory can use it; its `#[cfg(test)]` modules would see a second copy
//! of every type.

#![deny(unsafe_op_in_unsafe_fn)]
#![allow(clippy::unwrap_used, clippy::panic)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod assertions;
pub mod must;
pub mod prelude;

#[cfg(feature = "fixtures")]
#[cfg_attr(docsrs, doc(cfg(feature = "fixtures")))]
pub mod fixtures;

#[cfg(feature = "mock")]
#[cfg_attr(docsrs, doc(cfg(feature = "mock")))]
pub mod mock;

#[cfg(feature = "logging")]
#[cfg_attr(docsrs, doc(cfg(feature = "logging")))]
pub mod logging;

pub use must::*;

#[cfg(feature = "logging")]
pub use logging::init_test_tracing;
