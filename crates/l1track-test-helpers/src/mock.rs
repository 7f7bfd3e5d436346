//! Mocks of the truth association services and trajectory oracle.

use std::collections::{BTreeMap, HashMap};

use l1track_stubs::{
    ClusterKey, ClusterTruthAssociation, SimParticleId, StubKey, StubTruthAssociation, TpRef,
    TrueTrajectory,
};

/// In-memory stub and cluster truth.
///
/// Stubs not registered with [`genuine_stub`](Self::genuine_stub) are fake.
/// A cluster is genuine when exactly one particle contributed to it.
///
/// # Example
///
/// ```rust
/// use l1track_stubs::{ClusterKey, SimParticleId, StubKey, StubTruthAssociation};
/// use l1track_test_helpers::mock::MockTruth;
///
/// let truth = MockTruth::new()
///     .genuine_stub(StubKey(1), SimParticleId(7))
///     .cluster(ClusterKey(2), &[SimParticleId(7)]);
/// assert!(truth.is_genuine(StubKey(1)));
/// assert!(!truth.is_genuine(StubKey(2)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockTruth {
    stubs: HashMap<StubKey, SimParticleId>,
    clusters: HashMap<ClusterKey, Vec<SimParticleId>>,
}

impl MockTruth {
    /// No truth at all.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `stub` as produced by `particle` alone.
    pub fn genuine_stub(mut self, stub: StubKey, particle: SimParticleId) -> Self {
        self.stubs.insert(stub, particle);
        self
    }

    /// Register the particles that contributed to `cluster`.
    pub fn cluster(mut self, cluster: ClusterKey, particles: &[SimParticleId]) -> Self {
        self.clusters.insert(cluster, particles.to_vec());
        self
    }
}

impl StubTruthAssociation for MockTruth {
    fn is_genuine(&self, stub: StubKey) -> bool {
        self.stubs.contains_key(&stub)
    }

    fn find_particle(&self, stub: StubKey) -> Option<SimParticleId> {
        self.stubs.get(&stub).copied()
    }
}

impl ClusterTruthAssociation for MockTruth {
    fn is_genuine(&self, cluster: ClusterKey) -> bool {
        self.clusters.get(&cluster).is_some_and(|p| p.len() == 1)
    }

    fn find_particle(&self, cluster: ClusterKey) -> Option<SimParticleId> {
        match self.clusters.get(&cluster).map(Vec::as_slice) {
            Some([only]) => Some(*only),
            _ => None,
        }
    }

    fn find_particles(&self, cluster: ClusterKey) -> Vec<SimParticleId> {
        self.clusters.get(&cluster).cloned().unwrap_or_default()
    }
}

/// Particle translation from `(simulation id, trigger index)` pairs.
pub fn translation(pairs: &[(u64, usize)]) -> BTreeMap<SimParticleId, TpRef> {
    pairs
        .iter()
        .map(|&(sim, tp)| (SimParticleId(sim), TpRef(tp)))
        .collect()
}

/// Trajectory oracle that places every particle at a fixed azimuth.
#[derive(Debug, Clone, Default)]
pub struct FixedTrajectory {
    phi: HashMap<TpRef, f32>,
}

impl FixedTrajectory {
    /// No known particles.
    pub fn new() -> Self {
        Self::default()
    }

    /// Particle `tp` crosses every radius at azimuth `phi`.
    pub fn with(mut self, tp: TpRef, phi: f32) -> Self {
        self.phi.insert(tp, phi);
        self
    }
}

impl TrueTrajectory for FixedTrajectory {
    fn phi_at_stub(&self, particle: TpRef, _r: f32, _z: f32) -> Option<f32> {
        self.phi.get(&particle).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cluster_with_two_particles_is_not_genuine() {
        let truth = MockTruth::new().cluster(ClusterKey(1), &[SimParticleId(1), SimParticleId(2)]);
        assert!(!ClusterTruthAssociation::is_genuine(&truth, ClusterKey(1)));
        assert_eq!(ClusterTruthAssociation::find_particle(&truth, ClusterKey(1)), None);
        assert_eq!(truth.find_particles(ClusterKey(1)).len(), 2);
    }

    #[test]
    fn test_unknown_cluster_has_no_particles() {
        let truth = MockTruth::new();
        assert!(truth.find_particles(ClusterKey(9)).is_empty());
    }

    #[test]
    fn test_translation_pairs() {
        let map = translation(&[(10, 0), (20, 1)]);
        assert_eq!(map.get(&SimParticleId(20)), Some(&TpRef(1)));
    }
}
