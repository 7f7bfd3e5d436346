//! Stub records for the L1 track-trigger emulation
//!
//! A stub is a pair of clusters in the two closely spaced sensors of one
//! tracker module. This crate turns raw stubs into the records the track
//! finder consumes.
//!
//! # Overview
//!
//! - [`Stub`]: one stub with its geometry, degraded bend, front-end
//!   decision, q/Pt bin range, digitization and truth
//! - [`StubCollectionBuilder`]: builds all stubs of an event with a
//!   [`FailurePolicy`], optionally on the rayon pool (`parallel` feature)
//! - [`Digitization`]: the raw / GP / GP+HT state machine of the
//!   digitizable quantities
//! - [`HoughBinRange`]: compatible q/Pt columns of the r-φ Hough array
//!
//! # Lifecycle
//!
//! ```text
//! RawStub ──► Stub::new ──► frontend::evaluate ──► HoughBinRange::compute
//!                 │
//!                 ├──► digitize_for_gp(sector) ──► digitize_for_ht(sector)
//!                 │              ▲                         │
//!                 │              └───── reset_digitization ◄┘
//!                 └──► fill_truth (once)
//! ```
//!
//! Settings are never stored or read from global state. Every operation that
//! needs them takes `&Settings`.
//!
//! # Example
//!
//! ```
//! use l1track_bend_encoding::BendEncoding;
//! use l1track_config::Settings;
//! use l1track_geometry::{DetectorLayer, ModuleDescriptor, ModuleId, ModuleType};
//! use l1track_stubs::{RawCluster, RawStub, Stub, StubKey, ClusterKey};
//!
//! let settings = Settings::default();
//! let module = ModuleDescriptor {
//!     id: ModuleId(1),
//!     layer: DetectorLayer::Barrel { layer: 3 },
//!     module_type: ModuleType::Ps,
//!     min_r: 50.0,
//!     max_r: 50.26,
//!     min_phi: 0.1,
//!     max_phi: 0.1,
//!     min_z: 10.0,
//!     max_z: 10.0,
//!     strip_pitch: 0.01,
//!     strip_length: 0.15,
//!     sensor_width: 9.6,
//!     n_strips: 960,
//! };
//! let cluster = |key| RawCluster { key: ClusterKey(key), local_u: 480.0, local_v: 16.0 };
//! let raw = RawStub {
//!     key: StubKey(7),
//!     module: ModuleId(1),
//!     phi: 0.1,
//!     r: 50.0,
//!     z: 10.0,
//!     trigger_bend: 2.0,
//!     clusters: [cluster(1), cluster(2)],
//! };
//!
//! let stub = Stub::new(&raw, 0, &module, &settings, &BendEncoding::default())?;
//! assert_eq!(stub.layer_id_reduced(), 7);
//! assert_eq!(stub.bend(), 2.0);
//! assert!(stub.frontend_pass());
//! # Ok::<(), l1track_errors::L1TrackError>(())
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![deny(unused_must_use)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod collection;
pub mod digitization;
pub mod frontend;
pub mod hough;
pub mod prelude;
pub mod raw;
pub mod stub;
pub mod truth;

pub use collection::{FailurePolicy, SkippedStub, StubCollection, StubCollectionBuilder};
pub use digitization::{Digitization, DigitizationState, GpDigits, HtDigits, Kinematics, wrap_phi};
pub use frontend::{FrontendDecision, FrontendInputs};
pub use hough::HoughBinRange;
pub use raw::{RawCluster, RawStub};
pub use stub::{ModuleInfo, Stub};
pub use truth::{
    ClusterKey, ClusterTruthAssociation, MatchPolicy, ParticleTranslation, SimParticleId, StubKey,
    StubTruthAssociation, TpRef, TrueTrajectory, TruthAnnotation, TruthInconsistency,
};
