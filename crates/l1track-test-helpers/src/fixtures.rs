//! Module, settings and raw stub fixtures.
//!
//! The geometry is a simplified tracker: six barrel layers (three PS, three
//! 2S) and five endcap disks per side with fifteen rings each. Dimensions
//! are realistic enough for every stub built on them to land inside the
//! default tracker volume.

use l1track_config::Settings;
use l1track_geometry::{DetectorLayer, ModuleDescriptor, ModuleId, ModuleTable, ModuleType};
use l1track_stubs::{ClusterKey, RawCluster, RawStub, StubKey};

/// Barrel layer radii (cm), innermost first.
pub const BARREL_RADII: [f32; 6] = [23.0, 35.7, 50.8, 68.6, 78.2, 108.0];

/// |z| (cm) of the inner sensor of each endcap disk.
pub const DISK_Z: [f32; 5] = [131.0, 156.0, 185.0, 220.0, 265.0];

/// Highest endcap ring built with PS modules.
pub const LAST_PS_RING: u32 = 9;

const PS_PITCH: f32 = 0.01;
const PS_STRIP_LENGTH: f32 = 0.15;
const TWO_S_PITCH: f32 = 0.009;
const TWO_S_STRIP_LENGTH: f32 = 5.0;

/// Default settings.
pub fn settings() -> Settings {
    Settings::default()
}

/// Default settings with `edit` applied.
///
/// # Example
///
/// ```rust
/// use l1track_test_helpers::fixtures::settings_with;
///
/// let settings = settings_with(|s| s.stub_cuts.bend_res_reduced = false);
/// assert!(!settings.stub_cuts.bend_res_reduced);
/// ```
pub fn settings_with(edit: impl FnOnce(&mut Settings)) -> Settings {
    let mut settings = Settings::default();
    edit(&mut settings);
    settings
}

/// Identifier of the fixture module in barrel layer `layer`.
pub fn barrel_module_id(layer: u32) -> ModuleId {
    ModuleId(1000 * layer)
}

/// Identifier of the fixture module in an endcap ring.
pub fn endcap_module_id(side: u32, disk: u32, ring: u32) -> ModuleId {
    ModuleId(10_000 * side + 100 * disk + ring)
}

fn topology(module_type: ModuleType) -> (f32, f32, f32, u32) {
    match module_type {
        ModuleType::Ps => (PS_PITCH, PS_STRIP_LENGTH, 9.6, 960),
        ModuleType::TwoS => (TWO_S_PITCH, TWO_S_STRIP_LENGTH, 9.144, 1016),
    }
}

/// Barrel module in `layer` (1-6).
///
/// Layers 1-3 are PS modules with 0.26 cm sensor separation, layers 4-6 are
/// 2S modules with 0.18 cm separation.
///
/// # Panics
///
/// Panics if `layer` is not in 1-6.
pub fn barrel_module(layer: u32) -> ModuleDescriptor {
    let index = usize::try_from(layer.saturating_sub(1)).unwrap_or(usize::MAX);
    let radius = *BARREL_RADII
        .get(index)
        .unwrap_or_else(|| panic!("no barrel layer {layer}"));
    let (module_type, spacing) = if layer <= 3 {
        (ModuleType::Ps, 0.26)
    } else {
        (ModuleType::TwoS, 0.18)
    };
    let (strip_pitch, strip_length, sensor_width, n_strips) = topology(module_type);
    ModuleDescriptor {
        id: barrel_module_id(layer),
        layer: DetectorLayer::Barrel { layer },
        module_type,
        min_r: radius,
        max_r: radius + spacing,
        min_phi: 0.1,
        max_phi: 0.1,
        min_z: 10.0,
        max_z: 10.0,
        strip_pitch,
        strip_length,
        sensor_width,
        n_strips,
    }
}

/// Endcap module on `side` (1 at +z, 2 at -z), `disk` (1-5), `ring` (1-15).
///
/// Rings up to [`LAST_PS_RING`] are PS modules. Sensors are 0.4 cm apart in z.
///
/// # Panics
///
/// Panics if `disk` is not in 1-5.
pub fn endcap_module(side: u32, disk: u32, ring: u32) -> ModuleDescriptor {
    let index = usize::try_from(disk.saturating_sub(1)).unwrap_or(usize::MAX);
    let z = *DISK_Z
        .get(index)
        .unwrap_or_else(|| panic!("no endcap disk {disk}"));
    let (min_z, max_z) = if side == 1 {
        (z, z + 0.4)
    } else {
        (-z - 0.4, -z)
    };
    let module_type = if ring <= LAST_PS_RING {
        ModuleType::Ps
    } else {
        ModuleType::TwoS
    };
    let (strip_pitch, strip_length, sensor_width, n_strips) = topology(module_type);
    let r = endcap_ring_radius(ring);
    ModuleDescriptor {
        id: endcap_module_id(side, disk, ring),
        layer: DetectorLayer::Endcap { side, disk, ring },
        module_type,
        min_r: r,
        max_r: r,
        min_phi: 0.1,
        max_phi: 0.1,
        min_z,
        max_z,
        strip_pitch,
        strip_length,
        sensor_width,
        n_strips,
    }
}

/// Radius (cm) of the fixture modules in endcap `ring`.
pub fn endcap_ring_radius(ring: u32) -> f32 {
    23.0 + 5.8 * ring as f32
}

/// Every barrel module and every ring of disk 1 on both sides.
///
/// # Panics
///
/// Never panics; all fixture modules are valid and distinct.
pub fn module_table() -> ModuleTable {
    let barrel = (1..=6).map(barrel_module);
    let endcap = [1, 2]
        .into_iter()
        .flat_map(|side| (1..=15).map(move |ring| endcap_module(side, 1, ring)));
    match ModuleTable::from_descriptors(barrel.chain(endcap)) {
        Ok(table) => table,
        Err(e) => panic!("fixture module table is invalid: {e}"),
    }
}

/// Builder for raw stubs placed on a fixture module.
///
/// # Example
///
/// ```rust
/// use l1track_test_helpers::fixtures::{RawStubBuilder, barrel_module};
///
/// let raw = RawStubBuilder::on(&barrel_module(3)).key(4).bend(2.0).build();
/// assert_eq!(raw.trigger_bend, 2.0);
/// assert_eq!(raw.r, 50.8);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RawStubBuilder {
    raw: RawStub,
}

impl RawStubBuilder {
    /// Start from a stub at the inner sensor of `module` with zero bend.
    pub fn on(module: &ModuleDescriptor) -> Self {
        let z = if module.min_z < 0.0 {
            module.max_z
        } else {
            module.min_z
        };
        let cluster = |key| RawCluster {
            key: ClusterKey(key),
            local_u: module.n_strips as f32 / 2.0,
            local_v: 16.0,
        };
        Self {
            raw: RawStub {
                key: StubKey(0),
                module: module.id,
                phi: module.min_phi,
                r: module.min_r,
                z,
                trigger_bend: 0.0,
                clusters: [cluster(0), cluster(1)],
            },
        }
    }

    /// Stub handle; the clusters get handles `2·key` and `2·key + 1`.
    pub fn key(mut self, key: u64) -> Self {
        self.raw.key = StubKey(key);
        self.raw.clusters[0].key = ClusterKey(2 * key);
        self.raw.clusters[1].key = ClusterKey(2 * key + 1);
        self
    }

    /// Trigger bend in strips.
    pub fn bend(mut self, bend: f32) -> Self {
        self.raw.trigger_bend = bend;
        self
    }

    /// Azimuth.
    pub fn phi(mut self, phi: f32) -> Self {
        self.raw.phi = phi;
        self
    }

    /// Radius.
    pub fn r(mut self, r: f32) -> Self {
        self.raw.r = r;
        self
    }

    /// z.
    pub fn z(mut self, z: f32) -> Self {
        self.raw.z = z;
        self
    }

    /// Local coordinate of the inner cluster across the strips.
    pub fn local_u(mut self, u: f32) -> Self {
        self.raw.clusters[0].local_u = u;
        self
    }

    /// Module the stub claims to be in.
    pub fn module(mut self, id: ModuleId) -> Self {
        self.raw.module = id;
        self
    }

    /// Finish.
    pub fn build(self) -> RawStub {
        self.raw
    }
}
