//! Raw stub input as delivered by the upstream event data.

use l1track_geometry::ModuleId;
use serde::{Deserialize, Serialize};

use crate::truth::{ClusterKey, StubKey};

/// One of the two clusters that make up a stub.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawCluster {
    /// Handle for truth lookups
    pub key: ClusterKey,
    /// Local coordinate across the strips, in strip units
    pub local_u: f32,
    /// Local coordinate along the strips, in strip-length units
    pub local_v: f32,
}

/// A stub as measured, before any processing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawStub {
    /// Handle for truth lookups
    pub key: StubKey,
    /// Module the stub was found in
    pub module: ModuleId,
    /// Azimuth (rad)
    pub phi: f32,
    /// Radius (cm)
    pub r: f32,
    /// Longitudinal coordinate (cm)
    pub z: f32,
    /// Bend reported by the stub finder, in strip units
    pub trigger_bend: f32,
    /// Inner and outer sensor clusters
    pub clusters: [RawCluster; 2],
}

impl RawStub {
    /// Cluster handles, inner sensor first.
    pub fn cluster_keys(&self) -> [ClusterKey; 2] {
        self.clusters.map(|c| c.key)
    }
}
