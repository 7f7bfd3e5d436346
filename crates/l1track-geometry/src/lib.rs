//! Detector module geometry for the stub emulation
//!
//! The stub pipeline never computes geometry itself. It consumes immutable
//! per-module facts ([`ModuleDescriptor`]) through the [`ModuleCatalog`]
//! lookup trait, which a host framework implements over its own geometry
//! service. [`ModuleTable`] is the in-memory implementation used by tests
//! and standalone runs.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]
#![warn(missing_docs)]

pub mod catalog;
pub mod layer;
pub mod module;

pub use catalog::{ModuleCatalog, ModuleTable};
pub use layer::{DetectorLayer, reduced_layer_id};
pub use module::{ModuleDescriptor, ModuleId, ModuleType, SensorCentre, SensorTopology};

#[cfg(feature = "proptest")]
mod proptest_strategies {
    use super::*;
    use proptest::prelude::*;

    impl Arbitrary for DetectorLayer {
        type Parameters = ();
        type Strategy = BoxedStrategy<Self>;

        /// Only layers that exist in the detector layout.
        fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
            prop_oneof![
                (1u32..=6).prop_map(|layer| DetectorLayer::Barrel { layer }),
                (1u32..=2, 1u32..=5, 1u32..=15)
                    .prop_map(|(side, disk, ring)| DetectorLayer::Endcap { side, disk, ring }),
            ]
            .boxed()
        }
    }
}
