//! Front-end bend encoding for the stub emulation
//!
//! The front-end chips do not transmit the full-resolution stub bend. They
//! encode it with a small number of bits per layer (barrel) or ring
//! (endcap): small bends keep half-strip granularity, larger ones are
//! merged into coarser codes, and bends beyond a window are not encodable
//! at all.
//!
//! # Overview
//!
//! - [`BendWindow`]: the encoding of one layer or ring
//! - [`BendEncoding`]: the full set of windows, loadable from YAML or JSON
//! - [`ResolutionModel`]: lookup trait consumed by stub construction
//!
//! Out-of-window bends are flagged in [`DegradedBend`], never clamped. The
//! caller decides whether to reject the stub.
//!
//! # Example
//!
//! ```
//! use l1track_bend_encoding::{BendEncoding, ResolutionModel};
//! use l1track_geometry::DetectorLayer;
//!
//! let encoding = BendEncoding::default();
//! let degraded = encoding.degrade(5.0, &DetectorLayer::Barrel { layer: 6 })?;
//! assert_eq!(degraded.merged, 2);
//! assert!(!degraded.out_of_window);
//! # Ok::<(), l1track_errors::ConfigurationError>(())
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![deny(unused_must_use)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod encoding;
pub mod prelude;
pub mod window;

pub use encoding::{BendEncoding, ResolutionModel};
pub use window::{BendWindow, DegradedBend};
