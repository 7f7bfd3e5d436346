//! Simulation truth attached to stubs.
//!
//! Truth annotation is write-once and best effort. A particle missing from
//! the translation map is simply not recorded; nothing here can fail or
//! change any other stub quantity.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::hash::BuildHasher;

use serde::{Deserialize, Serialize};
use tracing::trace;

/// Identity of a particle in the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SimParticleId(pub u64);

/// Index of a particle in the trigger's own particle list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TpRef(pub usize);

/// Opaque handle of a stub in the upstream event data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StubKey(pub u64);

/// Opaque handle of a cluster in the upstream event data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClusterKey(pub u64);

/// Maps simulation particles onto the trigger's particle list.
///
/// Not every simulated particle is kept, so lookups may miss.
pub trait ParticleTranslation {
    /// Trigger particle for `particle`, if it was kept.
    fn translate(&self, particle: SimParticleId) -> Option<TpRef>;
}

impl<S: BuildHasher> ParticleTranslation for HashMap<SimParticleId, TpRef, S> {
    fn translate(&self, particle: SimParticleId) -> Option<TpRef> {
        self.get(&particle).copied()
    }
}

impl ParticleTranslation for BTreeMap<SimParticleId, TpRef> {
    fn translate(&self, particle: SimParticleId) -> Option<TpRef> {
        self.get(&particle).copied()
    }
}

/// Stub-to-particle association service.
pub trait StubTruthAssociation {
    /// The same single particle produced both clusters of the stub.
    fn is_genuine(&self, stub: StubKey) -> bool;

    /// The particle that produced a genuine stub.
    fn find_particle(&self, stub: StubKey) -> Option<SimParticleId>;
}

/// Cluster-to-particle association service.
pub trait ClusterTruthAssociation {
    /// A single particle produced the cluster.
    fn is_genuine(&self, cluster: ClusterKey) -> bool;

    /// The particle that produced a genuine cluster.
    fn find_particle(&self, cluster: ClusterKey) -> Option<SimParticleId>;

    /// Every particle that contributed to the cluster.
    fn find_particles(&self, cluster: ClusterKey) -> Vec<SimParticleId>;
}

/// Oracle for the true trajectory of a particle.
pub trait TrueTrajectory {
    /// Azimuth at which `particle` crosses the radius of a stub at `(r, z)`.
    fn phi_at_stub(&self, particle: TpRef, r: f32, z: f32) -> Option<f32>;
}

/// Which particles count as associated with a stub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// Only a particle that produced both clusters
    Strict,
    /// Any particle that contributed to either cluster
    #[default]
    Loose,
}

impl MatchPolicy {
    /// Policy selected by the strict-matching flag.
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            MatchPolicy::Strict
        } else {
            MatchPolicy::Loose
        }
    }
}

/// Disagreement between a stub's truth and that of its clusters.
///
/// Genuine stubs can legitimately be built from non-genuine clusters that
/// share one contributing particle, so this is only ever reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TruthInconsistency {
    /// Genuine stub whose clusters are not both from its particle alone
    GenuineStubWithMismatchedClusters,
    /// Fake stub whose clusters were both produced by the same single particle
    FakeStubWithMatchingClusters,
}

/// Truth information of one stub.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TruthAnnotation {
    assoc_tp: Option<TpRef>,
    assoc_tps: BTreeSet<TpRef>,
    assoc_tp_of_cluster: [Option<TpRef>; 2],
    genuine_cluster: [bool; 2],
}

impl TruthAnnotation {
    /// Build the annotation of a stub from the association services.
    pub fn annotate<T, S, C>(
        stub: StubKey,
        clusters: [ClusterKey; 2],
        translation: &T,
        stub_truth: &S,
        cluster_truth: &C,
        policy: MatchPolicy,
    ) -> Self
    where
        T: ParticleTranslation + ?Sized,
        S: StubTruthAssociation + ?Sized,
        C: ClusterTruthAssociation + ?Sized,
    {
        let assoc_tp = if stub_truth.is_genuine(stub) {
            stub_truth
                .find_particle(stub)
                .and_then(|p| translation.translate(p))
        } else {
            None
        };

        let assoc_tps = match policy {
            MatchPolicy::Strict => assoc_tp.into_iter().collect(),
            MatchPolicy::Loose => clusters
                .iter()
                .flat_map(|&c| cluster_truth.find_particles(c))
                .filter_map(|p| translation.translate(p))
                .collect(),
        };

        let genuine_cluster = clusters.map(|c| cluster_truth.is_genuine(c));
        let assoc_tp_of_cluster = clusters.map(|c| {
            if cluster_truth.is_genuine(c) {
                cluster_truth
                    .find_particle(c)
                    .and_then(|p| translation.translate(p))
            } else {
                None
            }
        });

        let annotation = Self {
            assoc_tp,
            assoc_tps,
            assoc_tp_of_cluster,
            genuine_cluster,
        };
        if let Some(issue) = annotation.consistency() {
            trace!(stub = stub.0, ?issue, "Stub truth inconsistent with its clusters");
        }
        annotation
    }

    /// The single particle that produced both clusters, if kept.
    pub fn assoc_tp(&self) -> Option<TpRef> {
        self.assoc_tp
    }

    /// All associated particles under the match policy.
    pub fn assoc_tps(&self) -> &BTreeSet<TpRef> {
        &self.assoc_tps
    }

    /// Sole particle of each cluster, if genuine and kept.
    pub fn assoc_tp_of_cluster(&self) -> [Option<TpRef>; 2] {
        self.assoc_tp_of_cluster
    }

    /// Whether each cluster was produced by a single particle.
    pub fn genuine_cluster(&self) -> [bool; 2] {
        self.genuine_cluster
    }

    /// The stub has a sole associated particle.
    pub fn genuine(&self) -> bool {
        self.assoc_tp.is_some()
    }

    /// Advisory check of the stub's truth against its clusters.
    pub fn consistency(&self) -> Option<TruthInconsistency> {
        let [first, second] = self.assoc_tp_of_cluster;
        let clusters_agree = self.genuine_cluster[0] && first == second;
        if self.genuine() && !clusters_agree {
            Some(TruthInconsistency::GenuineStubWithMismatchedClusters)
        } else if !self.genuine() && clusters_agree && first.is_some() {
            Some(TruthInconsistency::FakeStubWithMatchingClusters)
        } else {
            None
        }
    }
}
