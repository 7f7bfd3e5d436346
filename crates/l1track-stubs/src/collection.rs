//! Building the stubs of one event.
//!
//! Stub construction failures are fatal for the stub only. The
//! [`FailurePolicy`] decides whether one failure aborts the whole event or
//! the stub is dropped and the event continues.

use l1track_bend_encoding::ResolutionModel;
use l1track_config::Settings;
use l1track_errors::{L1TrackError, Result};
use l1track_geometry::ModuleCatalog;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::raw::RawStub;
use crate::stub::Stub;
use crate::truth::{ClusterTruthAssociation, ParticleTranslation, StubKey, StubTruthAssociation};

/// What to do when a stub cannot be built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Fail the whole collection with the first error in input order
    #[default]
    Abort,
    /// Log and drop the stub
    Skip,
}

/// A raw stub that was dropped under [`FailurePolicy::Skip`].
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedStub {
    /// Position in the input sequence
    pub position: usize,
    /// Handle of the raw stub
    pub key: StubKey,
    /// Why it was dropped
    pub error: L1TrackError,
}

/// The stubs of one event, in input order.
///
/// Each stub's [`index`](Stub::index) is its position in this collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StubCollection {
    stubs: Vec<Stub>,
    skipped: Vec<SkippedStub>,
}

impl StubCollection {
    /// All stubs.
    pub fn stubs(&self) -> &[Stub] {
        &self.stubs
    }

    /// Stub at `index`.
    pub fn get(&self, index: usize) -> Option<&Stub> {
        self.stubs.get(index)
    }

    /// Number of stubs.
    pub fn len(&self) -> usize {
        self.stubs.len()
    }

    /// Whether there are no stubs.
    pub fn is_empty(&self) -> bool {
        self.stubs.is_empty()
    }

    /// Iterate over the stubs.
    pub fn iter(&self) -> std::slice::Iter<'_, Stub> {
        self.stubs.iter()
    }

    /// Iterate mutably over the stubs.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Stub> {
        self.stubs.iter_mut()
    }

    /// Stubs transmitted by the front-end electronics.
    pub fn frontend_passing(&self) -> impl Iterator<Item = &Stub> {
        self.stubs.iter().filter(|s| s.frontend_pass())
    }

    /// Raw stubs dropped while building.
    pub fn skipped(&self) -> &[SkippedStub] {
        &self.skipped
    }

    /// Take the stubs.
    pub fn into_stubs(self) -> Vec<Stub> {
        self.stubs
    }

    /// Attach truth to every stub.
    pub fn fill_truth<T, S, C>(
        &mut self,
        settings: &Settings,
        translation: &T,
        stub_truth: &S,
        cluster_truth: &C,
    ) where
        T: ParticleTranslation + ?Sized,
        S: StubTruthAssociation + ?Sized,
        C: ClusterTruthAssociation + ?Sized,
    {
        for stub in &mut self.stubs {
            stub.fill_truth(settings, translation, stub_truth, cluster_truth);
        }
    }

    /// Restore every stub to its undigitized values.
    pub fn reset_digitization(&mut self) {
        for stub in &mut self.stubs {
            stub.reset_digitization();
        }
    }
}

impl<'a> IntoIterator for &'a StubCollection {
    type Item = &'a Stub;
    type IntoIter = std::slice::Iter<'a, Stub>;

    fn into_iter(self) -> Self::IntoIter {
        self.stubs.iter()
    }
}

/// Builds a [`StubCollection`] from raw stubs.
///
/// # Example
///
/// ```
/// use l1track_bend_encoding::BendEncoding;
/// use l1track_config::Settings;
/// use l1track_geometry::ModuleTable;
/// use l1track_stubs::{FailurePolicy, StubCollectionBuilder};
///
/// let settings = Settings::default();
/// let modules = ModuleTable::new();
/// let encoding = BendEncoding::default();
///
/// let stubs = StubCollectionBuilder::new(&settings, &modules, &encoding)
///     .failure_policy(FailurePolicy::Skip)
///     .build(&[])?;
/// assert!(stubs.is_empty());
/// # Ok::<(), l1track_errors::L1TrackError>(())
/// ```
#[derive(Debug)]
pub struct StubCollectionBuilder<'a, C: ?Sized, R: ?Sized> {
    settings: &'a Settings,
    catalog: &'a C,
    resolution: &'a R,
    policy: FailurePolicy,
    #[cfg_attr(not(feature = "parallel"), allow(dead_code))]
    parallel: bool,
}

impl<'a, C, R> StubCollectionBuilder<'a, C, R>
where
    C: ModuleCatalog + ?Sized,
    R: ResolutionModel + ?Sized,
{
    /// Create a sequential builder that aborts on the first failure.
    pub fn new(settings: &'a Settings, catalog: &'a C, resolution: &'a R) -> Self {
        Self {
            settings,
            catalog,
            resolution,
            policy: FailurePolicy::Abort,
            parallel: false,
        }
    }

    /// Set the failure policy.
    #[must_use]
    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Build stubs on the rayon thread pool.
    ///
    /// The result is identical to a sequential build.
    #[cfg(feature = "parallel")]
    #[cfg_attr(docsrs, doc(cfg(feature = "parallel")))]
    #[must_use]
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Build the collection.
    ///
    /// # Errors
    ///
    /// Under [`FailurePolicy::Abort`], returns the error of the first raw
    /// stub (in input order) that could not be built.
    pub fn build(&self, raws: &[RawStub]) -> Result<StubCollection> {
        let results = self.construct_all(raws);

        let mut collection = StubCollection {
            stubs: Vec::with_capacity(raws.len()),
            skipped: Vec::new(),
        };
        for (position, (raw, result)) in raws.iter().zip(results).enumerate() {
            match result {
                Ok(mut stub) => {
                    stub.set_index(collection.stubs.len());
                    collection.stubs.push(stub);
                }
                Err(error) => match self.policy {
                    FailurePolicy::Abort => return Err(error),
                    FailurePolicy::Skip => {
                        warn!(position, key = raw.key.0, %error, "Skipping stub");
                        collection.skipped.push(SkippedStub {
                            position,
                            key: raw.key,
                            error,
                        });
                    }
                },
            }
        }

        info!(
            built = collection.stubs.len(),
            skipped = collection.skipped.len(),
            frontend_pass = collection.frontend_passing().count(),
            "Stub collection built"
        );
        Ok(collection)
    }

    fn construct(&self, position: usize, raw: &RawStub) -> Result<Stub> {
        Stub::from_catalog(raw, position, self.catalog, self.settings, self.resolution)
    }

    #[cfg(not(feature = "parallel"))]
    fn construct_all(&self, raws: &[RawStub]) -> Vec<Result<Stub>> {
        self.construct_sequential(raws)
    }

    #[cfg(feature = "parallel")]
    fn construct_all(&self, raws: &[RawStub]) -> Vec<Result<Stub>> {
        use rayon::prelude::*;

        if !self.parallel {
            return self.construct_sequential(raws);
        }
        raws.par_iter()
            .enumerate()
            .map(|(position, raw)| self.construct(position, raw))
            .collect()
    }

    fn construct_sequential(&self, raws: &[RawStub]) -> Vec<Result<Stub>> {
        raws.iter()
            .enumerate()
            .map(|(position, raw)| self.construct(position, raw))
            .collect()
    }
}
