//! Run settings for the L1 track-trigger stub emulation
//!
//! A [`Settings`] value is built once per run (usually from a YAML file),
//! validated, and then passed by shared reference to every stub operation.
//! Nothing in the workspace reads settings from global state.
//!
//! # Example
//!
//! ```
//! use l1track_config::{FirmwareType, Settings};
//!
//! let settings = Settings::from_yaml_str(
//!     "hough:\n  min_pt: 2.0\n  nbins_pt: 18\n  firmware_type: daisy_chain\n",
//! )?;
//!
//! assert_eq!(settings.hough.nbins_pt, 18);
//! assert_eq!(settings.hough.firmware_type, FirmwareType::DaisyChain);
//! assert!((settings.q_over_pt_cut() - 0.5).abs() < 1e-6);
//! # Ok::<(), l1track_errors::L1TrackError>(())
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod firmware;
pub mod loader;
pub mod types;
pub mod validation;

pub use firmware::FirmwareType;
pub use types::{
    DigitizationScales, DigitizationSettings, HoughSettings, MagneticField, PhiSectors, Settings,
    StubCuts, TrackerVolume,
};
pub use validation::SettingsValidator;
