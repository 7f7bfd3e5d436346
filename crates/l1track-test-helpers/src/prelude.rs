//! Convenience re-exports for common test utilities.
//!
//! ```rust,ignore
//! use l1track_test_helpers::prelude::*;
//! ```

pub use crate::must::{must, must_err, must_some, must_with};
pub use crate::{assert_approx_eq, assert_bin_range_valid, assert_matches};

#[cfg(feature = "fixtures")]
pub use crate::fixtures::{
    RawStubBuilder, barrel_module, barrel_module_id, endcap_module, endcap_module_id,
    module_table, settings, settings_with,
};

#[cfg(feature = "mock")]
pub use crate::mock::{FixedTrajectory, MockTruth, translation};

#[cfg(feature = "logging")]
pub use crate::logging::init_test_tracing;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;
