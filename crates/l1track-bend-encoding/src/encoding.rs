//! Per-layer and per-ring bend encoding tables.

use std::collections::BTreeMap;

use l1track_errors::{ConfigurationError, L1TrackError, Result};
use l1track_geometry::DetectorLayer;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::window::{BendWindow, DegradedBend};

/// Maps a raw bend to the value the front-end encoder would transmit.
///
/// Implementations are static lookup data shared read-only by all workers.
pub trait ResolutionModel: Send + Sync {
    /// Encode `bend` for a module in `layer`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::MissingBendTable` if the model has no
    /// encoding for the layer (barrel) or ring (endcap).
    fn degrade(&self, bend: f32, layer: &DetectorLayer) -> std::result::Result<DegradedBend, ConfigurationError>;
}

/// Bend encoding windows for every barrel layer and endcap ring.
///
/// Barrel windows are keyed by layer number (1-6), endcap windows by ring
/// number (1-15). Either section may be omitted from a settings file, in
/// which case the default layout is used for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BendEncoding {
    /// Windows keyed by barrel layer
    pub barrel: BTreeMap<u32, BendWindow>,
    /// Windows keyed by endcap ring
    pub endcap: BTreeMap<u32, BendWindow>,
}

const DEFAULT_BARREL: [(u32, f32, f32); 6] = [
    (1, 2.5, 1.5),
    (2, 2.5, 1.5),
    (3, 3.5, 2.0),
    (4, 4.5, 2.5),
    (5, 5.5, 3.0),
    (6, 6.5, 3.5),
];

const DEFAULT_ENDCAP: [(u32, f32, f32); 15] = [
    (1, 2.0, 1.0),
    (2, 2.0, 1.0),
    (3, 2.5, 1.5),
    (4, 3.0, 1.5),
    (5, 3.0, 1.5),
    (6, 3.5, 2.0),
    (7, 3.5, 2.0),
    (8, 4.0, 2.0),
    (9, 4.0, 2.0),
    (10, 4.5, 2.5),
    (11, 4.5, 2.5),
    (12, 5.0, 2.5),
    (13, 5.5, 3.0),
    (14, 6.0, 3.0),
    (15, 6.5, 3.5),
];

fn table(entries: &[(u32, f32, f32)]) -> BTreeMap<u32, BendWindow> {
    entries
        .iter()
        .map(|&(key, window, fine_limit)| {
            (
                key,
                BendWindow {
                    window,
                    fine_limit,
                    coarse_group: 2,
                },
            )
        })
        .collect()
}

impl Default for BendEncoding {
    fn default() -> Self {
        Self {
            barrel: table(&DEFAULT_BARREL),
            endcap: table(&DEFAULT_ENDCAP),
        }
    }
}

impl BendEncoding {
    /// Window for a module in `layer`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::MissingBendTable` if no window is
    /// configured for the layer or ring.
    pub fn window(&self, layer: &DetectorLayer) -> std::result::Result<&BendWindow, ConfigurationError> {
        match *layer {
            DetectorLayer::Barrel { layer } => {
                self.barrel
                    .get(&layer)
                    .ok_or(ConfigurationError::MissingBendTable {
                        region: "barrel layer",
                        index: layer,
                    })
            }
            DetectorLayer::Endcap { ring, .. } => {
                self.endcap
                    .get(&ring)
                    .ok_or(ConfigurationError::MissingBendTable {
                        region: "endcap ring",
                        index: ring,
                    })
            }
        }
    }

    /// Check every window.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidSetting` naming the first bad
    /// window, e.g. `barrel.3.fine_limit`.
    pub fn validate(&self) -> std::result::Result<(), ConfigurationError> {
        let sections = [("barrel", &self.barrel), ("endcap", &self.endcap)];
        for (name, windows) in sections {
            for (key, window) in windows {
                window.validate().map_err(|e| match e {
                    ConfigurationError::InvalidSetting { field, reason } => {
                        ConfigurationError::invalid_setting(format!("{name}.{key}.{field}"), reason)
                    }
                    other => other,
                })?;
            }
        }
        Ok(())
    }

    /// Parse and validate tables from YAML.
    ///
    /// # Errors
    ///
    /// Returns `L1TrackError::Load` on a parse failure and
    /// `L1TrackError::Configuration` if a window is invalid.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let encoding: Self =
            serde_yaml::from_str(yaml).map_err(|e| L1TrackError::load(e.to_string()))?;
        encoding.validated()
    }

    /// Parse and validate tables from JSON.
    ///
    /// # Errors
    ///
    /// Returns `L1TrackError::Load` on a parse failure and
    /// `L1TrackError::Configuration` if a window is invalid.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let encoding: Self =
            serde_json::from_str(json).map_err(|e| L1TrackError::load(e.to_string()))?;
        encoding.validated()
    }

    fn validated(self) -> Result<Self> {
        self.validate()?;
        debug!(
            barrel_layers = self.barrel.len(),
            endcap_rings = self.endcap.len(),
            "Bend encoding tables loaded"
        );
        Ok(self)
    }
}

impl ResolutionModel for BendEncoding {
    fn degrade(&self, bend: f32, layer: &DetectorLayer) -> std::result::Result<DegradedBend, ConfigurationError> {
        Ok(self.window(layer)?.degrade(bend))
    }
}
