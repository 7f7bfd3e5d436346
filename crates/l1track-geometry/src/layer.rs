//! Layer identification and the reduced layer id used by the firmware.

use l1track_errors::DomainInvariantError;
use serde::{Deserialize, Serialize};

/// Where a module sits in the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectorLayer {
    /// Barrel layer, numbered 1-6 from the beam line outwards
    Barrel {
        /// Layer number
        layer: u32,
    },
    /// Endcap disk
    Endcap {
        /// Endcap side (1 or 2)
        side: u32,
        /// Disk number, 1-5 moving away from the interaction point
        disk: u32,
        /// Ring number within the disk, 1 innermost
        ring: u32,
    },
}

impl DetectorLayer {
    /// Barrel layer, checked against the 6-layer layout.
    ///
    /// # Errors
    ///
    /// Returns `DomainInvariantError::UnknownLayer` unless `layer` is 1-6.
    pub fn barrel(layer: u32) -> Result<Self, DomainInvariantError> {
        if !(1..=6).contains(&layer) {
            return Err(DomainInvariantError::UnknownLayer {
                barrel: true,
                index: layer,
            });
        }
        Ok(DetectorLayer::Barrel { layer })
    }

    /// Endcap disk, checked against the 2-side, 5-disk layout.
    ///
    /// # Errors
    ///
    /// Returns `DomainInvariantError::UnknownLayer` unless `side` is 1-2 and
    /// `disk` is 1-5.
    pub fn endcap(side: u32, disk: u32, ring: u32) -> Result<Self, DomainInvariantError> {
        if !(1..=2).contains(&side) || !(1..=5).contains(&disk) {
            return Err(DomainInvariantError::UnknownLayer {
                barrel: false,
                index: side.saturating_mul(10).saturating_add(disk),
            });
        }
        Ok(DetectorLayer::Endcap { side, disk, ring })
    }

    /// Whether this is a barrel layer.
    pub fn is_barrel(&self) -> bool {
        matches!(self, DetectorLayer::Barrel { .. })
    }

    /// Layer id as stored with each stub.
    ///
    /// Barrel layers keep their number (1-6); endcap disks are encoded as
    /// `10 * side + disk` (11-15 and 21-25).
    pub fn encoded_id(&self) -> u32 {
        match *self {
            DetectorLayer::Barrel { layer } => layer,
            DetectorLayer::Endcap { side, disk, .. } => {
                side.saturating_mul(10).saturating_add(disk)
            }
        }
    }

    /// Endcap ring, or 0 in the barrel.
    pub fn endcap_ring(&self) -> u32 {
        match *self {
            DetectorLayer::Barrel { .. } => 0,
            DetectorLayer::Endcap { ring, .. } => ring,
        }
    }

    /// Reduced layer id in 1-7, see [`reduced_layer_id`].
    ///
    /// # Errors
    ///
    /// Returns `DomainInvariantError::ReducedLayerOutOfRange` for layers
    /// outside the known layout.
    pub fn reduced_id(&self) -> Result<u8, DomainInvariantError> {
        reduced_layer_id(self.encoded_id())
    }
}

/// Map an encoded layer id onto 1-7 so it fits in 3 bits.
///
/// No track can cross both endcaps, so the endcap side is dropped. No
/// genuine track has stubs in both barrel layer 6 and disk 1 (nor layer 5
/// and disk 2, layer 4 and disk 3, layer 3 and disk 5), so those pairs share
/// an id. This depends on the tracker layout.
///
/// # Errors
///
/// Returns `DomainInvariantError::ReducedLayerOutOfRange` for any id that is
/// not a barrel layer 1-6 or an endcap disk 11-15 / 21-25. Such ids are never
/// clamped.
pub fn reduced_layer_id(layer_id: u32) -> Result<u8, DomainInvariantError> {
    let reduced = match layer_id {
        1 => 1,
        2 => 2,
        3 => 7,
        4 => 5,
        5 => 4,
        6 => 3,
        11 | 21 => 3,
        12 | 22 => 4,
        13 | 23 => 5,
        14 | 24 => 6,
        15 | 25 => 7,
        _ => return Err(DomainInvariantError::ReducedLayerOutOfRange { layer_id }),
    };
    Ok(reduced)
}
