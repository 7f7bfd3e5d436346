//! Common imports for working with stubs.
//!
//! # Example
//!
//! ```
//! use l1track_stubs::prelude::*;
//!
//! let range = HoughBinRange::default();
//! assert_eq!(range.min_bin(), 0);
//! ```

pub use crate::collection::{FailurePolicy, StubCollection, StubCollectionBuilder};
pub use crate::digitization::{DigitizationState, Kinematics};
pub use crate::hough::HoughBinRange;
pub use crate::raw::{RawCluster, RawStub};
pub use crate::stub::Stub;
pub use crate::truth::{
    ClusterKey, ClusterTruthAssociation, ParticleTranslation, StubKey, StubTruthAssociation,
    TpRef, TrueTrajectory,
};
