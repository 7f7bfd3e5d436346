//! Per-module geometry facts.

use std::fmt;

use l1track_errors::{DomainInvariantError, GeometryError};
use serde::{Deserialize, Serialize};

use crate::layer::DetectorLayer;

/// Unique detector module identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleId(pub u32);

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ModuleId {
    fn from(value: u32) -> Self {
        ModuleId(value)
    }
}

/// Sensor technology of a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModuleType {
    /// Pixel-strip module (short macro-pixels on the inner sensor)
    #[serde(rename = "ps")]
    Ps,
    /// Strip-strip module
    #[serde(rename = "2s")]
    TwoS,
}

/// Position of one sensor centre in cylindrical coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SensorCentre {
    /// Radius (cm)
    pub r: f32,
    /// Azimuth (rad)
    pub phi: f32,
    /// Longitudinal coordinate (cm)
    pub z: f32,
}

/// Strip layout of the innermost sensor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorTopology {
    /// Strip pitch, or pixel pitch along the short axis (cm)
    pub strip_pitch: f32,
    /// Strip length, or pixel pitch along the long axis (cm)
    pub strip_length: f32,
    /// Number of strips
    pub n_strips: u32,
    /// Width of the sensitive region (cm)
    pub sensor_width: f32,
}

/// Immutable geometry of one detector module.
///
/// Coordinate bounds span the centres of the module's two sensors, so
/// `max_r - min_r` is the sensor separation in the barrel and
/// `max_z - min_z` is the separation in the endcap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModuleDescriptor {
    /// Module identifier
    pub id: ModuleId,
    /// Barrel layer or endcap disk/ring
    pub layer: DetectorLayer,
    /// PS or 2S
    pub module_type: ModuleType,
    /// Minimum sensor-centre radius (cm)
    pub min_r: f32,
    /// Maximum sensor-centre radius (cm)
    pub max_r: f32,
    /// Minimum sensor-centre azimuth (rad)
    pub min_phi: f32,
    /// Maximum sensor-centre azimuth (rad)
    pub max_phi: f32,
    /// Minimum sensor-centre z (cm)
    pub min_z: f32,
    /// Maximum sensor-centre z (cm)
    pub max_z: f32,
    /// Strip pitch (cm)
    pub strip_pitch: f32,
    /// Strip length (cm)
    pub strip_length: f32,
    /// Sensor width (cm)
    pub sensor_width: f32,
    /// Number of strips
    pub n_strips: u32,
}

impl ModuleDescriptor {
    /// Build a descriptor from the centres of the module's two sensors.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::InvalidDescriptor` if the result fails
    /// [`validate`](Self::validate).
    pub fn from_sensor_pair(
        id: ModuleId,
        layer: DetectorLayer,
        module_type: ModuleType,
        sensors: [SensorCentre; 2],
        topology: SensorTopology,
    ) -> Result<Self, GeometryError> {
        let [s0, s1] = sensors;
        let descriptor = Self {
            id,
            layer,
            module_type,
            min_r: s0.r.min(s1.r),
            max_r: s0.r.max(s1.r),
            min_phi: s0.phi.min(s1.phi),
            max_phi: s0.phi.max(s1.phi),
            min_z: s0.z.min(s1.z),
            max_z: s0.z.max(s1.z),
            strip_pitch: topology.strip_pitch,
            strip_length: topology.strip_length,
            sensor_width: topology.sensor_width,
            n_strips: topology.n_strips,
        };
        descriptor.validate()?;
        Ok(descriptor)
    }

    /// Check the descriptor's own invariants.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::InvalidDescriptor` naming the first offending
    /// field: a non-finite coordinate, a bound pair with min > max, a
    /// non-positive pitch, strip length or sensor width, or zero strips.
    pub fn validate(&self) -> Result<(), GeometryError> {
        let module = self.id.0;
        let bounds = [
            ("r", self.min_r, self.max_r),
            ("phi", self.min_phi, self.max_phi),
            ("z", self.min_z, self.max_z),
        ];
        for (field, min, max) in bounds {
            if !min.is_finite() || !max.is_finite() {
                return Err(GeometryError::invalid(module, field, "bounds must be finite"));
            }
            if min > max {
                return Err(GeometryError::invalid(
                    module,
                    field,
                    format!("min {min} exceeds max {max}"),
                ));
            }
        }

        let positive = [
            ("strip_pitch", self.strip_pitch),
            ("strip_length", self.strip_length),
            ("sensor_width", self.sensor_width),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(GeometryError::invalid(
                    module,
                    field,
                    format!("must be positive, got {value}"),
                ));
            }
        }

        if self.n_strips == 0 {
            return Err(GeometryError::invalid(module, "n_strips", "must be non-zero"));
        }
        Ok(())
    }

    /// Whether the module sits in the barrel.
    pub fn is_barrel(&self) -> bool {
        self.layer.is_barrel()
    }

    /// Whether this is a PS module.
    pub fn is_ps(&self) -> bool {
        self.module_type == ModuleType::Ps
    }

    /// Encoded layer id (1-6 barrel, 11-15 / 21-25 endcap).
    pub fn layer_id(&self) -> u32 {
        self.layer.encoded_id()
    }

    /// Endcap ring, 0 in the barrel.
    pub fn endcap_ring(&self) -> u32 {
        self.layer.endcap_ring()
    }

    /// Reduced layer id in 1-7.
    ///
    /// # Errors
    ///
    /// Returns `DomainInvariantError::ReducedLayerOutOfRange` for layers
    /// outside the known layout.
    pub fn reduced_layer_id(&self) -> Result<u8, DomainInvariantError> {
        self.layer.reduced_id()
    }

    /// Distance between the two sensors, radial in the barrel and
    /// longitudinal in the endcap.
    pub fn sensor_spacing(&self) -> f32 {
        if self.is_barrel() {
            self.max_r - self.min_r
        } else {
            self.max_z - self.min_z
        }
    }

    /// Resolution perpendicular to the strips.
    pub fn sigma_perp(&self) -> f32 {
        self.strip_pitch / 12f32.sqrt()
    }

    /// Resolution along the strips.
    pub fn sigma_par(&self) -> f32 {
        self.strip_length / 12f32.sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn topology() -> SensorTopology {
        SensorTopology {
            strip_pitch: 0.009,
            strip_length: 5.025,
            n_strips: 1016,
            sensor_width: 9.144,
        }
    }

    fn barrel_pair() -> Result<ModuleDescriptor, GeometryError> {
        ModuleDescriptor::from_sensor_pair(
            ModuleId(1001),
            DetectorLayer::Barrel { layer: 4 },
            ModuleType::TwoS,
            [
                SensorCentre { r: 68.9, phi: 0.31, z: 12.0 },
                SensorCentre { r: 68.72, phi: 0.30, z: 12.0 },
            ],
            topology(),
        )
    }

    #[test]
    fn test_from_sensor_pair_orders_bounds() -> Result<(), GeometryError> {
        let d = barrel_pair()?;
        assert_relative_eq!(d.min_r, 68.72);
        assert_relative_eq!(d.max_r, 68.9);
        assert_relative_eq!(d.min_phi, 0.30);
        assert_relative_eq!(d.max_phi, 0.31);
        assert_relative_eq!(d.sensor_spacing(), 0.18, epsilon = 1e-5);
        assert_eq!(d.layer_id(), 4);
        assert_eq!(d.endcap_ring(), 0);
        Ok(())
    }

    #[test]
    fn test_endcap_spacing_is_longitudinal() -> Result<(), GeometryError> {
        let d = ModuleDescriptor::from_sensor_pair(
            ModuleId(2002),
            DetectorLayer::Endcap { side: 1, disk: 2, ring: 4 },
            ModuleType::Ps,
            [
                SensorCentre { r: 40.0, phi: -1.0, z: 155.2 },
                SensorCentre { r: 40.0, phi: -1.0, z: 155.6 },
            ],
            topology(),
        )?;
        assert_relative_eq!(d.sensor_spacing(), 0.4, epsilon = 1e-5);
        assert!(d.is_ps());
        assert_eq!(d.reduced_layer_id(), Ok(4));
        Ok(())
    }

    #[test]
    fn test_sigmas() -> Result<(), GeometryError> {
        let d = barrel_pair()?;
        assert_relative_eq!(d.sigma_perp(), 0.009 / 12f32.sqrt());
        assert_relative_eq!(d.sigma_par(), 5.025 / 12f32.sqrt());
        Ok(())
    }

    #[test]
    fn test_zero_pitch_rejected() {
        let mut topo = topology();
        topo.strip_pitch = 0.0;
        let result = ModuleDescriptor::from_sensor_pair(
            ModuleId(7),
            DetectorLayer::Barrel { layer: 1 },
            ModuleType::Ps,
            [SensorCentre::default(), SensorCentre::default()],
            topo,
        );
        assert!(matches!(
            result,
            Err(GeometryError::InvalidDescriptor { module: 7, field: "strip_pitch", .. })
        ));
    }

    #[test]
    fn test_inverted_bounds_rejected() -> Result<(), GeometryError> {
        let mut d = barrel_pair()?;
        d.min_z = 20.0;
        assert!(matches!(
            d.validate(),
            Err(GeometryError::InvalidDescriptor { field: "z", .. })
        ));
        Ok(())
    }

    #[test]
    fn test_zero_strips_rejected() -> Result<(), GeometryError> {
        let mut d = barrel_pair()?;
        d.n_strips = 0;
        assert!(d.validate().is_err());
        Ok(())
    }
}
