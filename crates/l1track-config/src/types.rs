//! Settings sections and the quantities derived from them.

use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

use crate::firmware::FirmwareType;

/// Complete run configuration.
///
/// Every section falls back to its defaults when omitted, so a settings file
/// only needs to list what differs from the standard configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Assumed tracker volume
    pub tracker: TrackerVolume,
    /// Solenoid field
    pub field: MagneticField,
    /// Front-end and stub-level cuts
    pub stub_cuts: StubCuts,
    /// r-φ Hough transform binning
    pub hough: HoughSettings,
    /// φ sector and octant layout
    pub phi_sectors: PhiSectors,
    /// Bit widths used by the geometric and Hough processors
    pub digitization: DigitizationSettings,
}

/// Tracker volume a stub must lie inside (cm).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrackerVolume {
    /// Smallest stub radius
    pub inner_radius: f32,
    /// Largest stub radius
    pub outer_radius: f32,
    /// Largest |z| of a stub
    pub half_length: f32,
}

impl Default for TrackerVolume {
    fn default() -> Self {
        Self {
            inner_radius: 21.8,
            outer_radius: 112.7,
            half_length: 270.0,
        }
    }
}

impl TrackerVolume {
    /// Whether (r, z) lies inside the volume, boundaries included.
    pub fn contains(&self, r: f32, z: f32) -> bool {
        r >= self.inner_radius && r <= self.outer_radius && z.abs() <= self.half_length
    }
}

/// Solenoid field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MagneticField {
    /// Field strength in Tesla
    pub b_tesla: f32,
}

impl Default for MagneticField {
    fn default() -> Self {
        Self { b_tesla: 3.8112 }
    }
}

/// Cuts applied to individual stubs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StubCuts {
    /// Stubs with larger |η| are not read out
    pub max_stub_eta: f32,
    /// Reject stubs whose bend implies a Pt below the Hough threshold
    pub kill_low_pt_stubs: bool,
    /// Bend resolution in strip units, as assumed by the front end
    pub bend_resolution: f32,
    /// Extra resolution added per additional raw bend merged into one encoded value
    pub bend_resolution_extra: f32,
    /// Replace the raw bend with its coarsely encoded value
    pub bend_res_reduced: bool,
    /// Truth-match only particles that contributed to both clusters
    pub stub_match_strict: bool,
    /// Max |Δφ| between a stub and its particle before the stub counts as crazy
    pub crazy_stub_cut: f32,
}

impl Default for StubCuts {
    fn default() -> Self {
        Self {
            max_stub_eta: 2.4,
            kill_low_pt_stubs: true,
            bend_resolution: 1.25,
            bend_resolution_extra: 0.0,
            bend_res_reduced: true,
            stub_match_strict: false,
            crazy_stub_cut: 0.05,
        }
    }
}

/// r-φ Hough transform array along its q/Pt axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HoughSettings {
    /// Smallest Pt (GeV) the array covers
    pub min_pt: f32,
    /// Number of q/Pt bins
    pub nbins_pt: u32,
    /// Firmware variant
    pub firmware_type: FirmwareType,
}

impl Default for HoughSettings {
    fn default() -> Self {
        Self {
            min_pt: 3.0,
            nbins_pt: 32,
            firmware_type: FirmwareType::Systolic,
        }
    }
}

/// φ sector layout.
///
/// The geometric processor works in octants, the Hough transform in the
/// finer sectors; every sector lies inside exactly one octant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PhiSectors {
    /// Number of φ sectors
    pub num_sectors: u32,
    /// Number of φ octants
    pub num_octants: u32,
    /// Radius (cm) at which the Hough transform measures track φ
    pub chosen_r_of_phi: f32,
}

impl Default for PhiSectors {
    fn default() -> Self {
        Self {
            num_sectors: 32,
            num_octants: 8,
            chosen_r_of_phi: 67.24,
        }
    }
}

/// Bit widths of the digitized stub quantities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DigitizationSettings {
    /// Digitize stubs at all
    pub enable: bool,
    /// φ relative to octant centre (GP input)
    pub phi_o_bits: u32,
    /// Full range (rad) of φ relative to octant centre covered by
    /// `phi_o_bits`. Derived from the octant width when omitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phi_o_range: Option<f32>,
    /// r relative to chosen radius
    pub rt_bits: u32,
    /// z
    pub z_bits: u32,
    /// Bend
    pub bend_bits: u32,
    /// Full bend range (strips) covered by `bend_bits`
    pub bend_range: f32,
    /// φ relative to sector centre (HT input)
    pub phi_s_bits: u32,
    /// Full range (rad) of φ relative to sector centre covered by
    /// `phi_s_bits`. Derived from the sector width when omitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phi_s_range: Option<f32>,
    /// dφ
    pub dphi_bits: u32,
    /// Full dφ range (rad) covered by `dphi_bits`
    pub dphi_range: f32,
    /// ρ
    pub rho_bits: u32,
}

impl Default for DigitizationSettings {
    fn default() -> Self {
        Self {
            enable: true,
            phi_o_bits: 15,
            phi_o_range: None,
            rt_bits: 10,
            z_bits: 12,
            bend_bits: 6,
            bend_range: 16.0,
            phi_s_bits: 14,
            phi_s_range: None,
            dphi_bits: 12,
            dphi_range: 0.5,
            rho_bits: 10,
        }
    }
}

/// Size of one digitization step for every digitized quantity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DigitizationScales {
    /// Step of φ relative to octant centre (rad)
    pub phi_o: f32,
    /// Step of r relative to chosen radius (cm)
    pub rt: f32,
    /// Step of z (cm)
    pub z: f32,
    /// Step of bend (strips)
    pub bend: f32,
    /// Step of φ relative to sector centre (rad)
    pub phi_s: f32,
    /// Step of dφ (rad)
    pub dphi: f32,
    /// Step of ρ (cm)
    pub rho: f32,
}

impl Settings {
    /// Conversion from 1/Pt (1/GeV) to the φ bend per cm of radius.
    pub fn inv_pt_to_dphi(&self) -> f32 {
        self.field.b_tesla * (3.0e8 / 2.0e11)
    }

    /// Largest |q/Pt| accepted by the Hough transform.
    pub fn q_over_pt_cut(&self) -> f32 {
        1.0 / self.hough.min_pt
    }

    /// Width of one q/Pt bin of the Hough array.
    pub fn q_over_pt_bin_width(&self) -> f32 {
        (2.0 * self.q_over_pt_cut()) / self.hough.nbins_pt as f32
    }

    /// Bend resolution assumed inside the front-end chip.
    pub fn bend_res_in_frontend(&self) -> f32 {
        self.stub_cuts.bend_resolution
    }

    /// Bend resolution after `num_merged` raw bend values were merged.
    pub fn bend_res(&self, num_merged: u32) -> f32 {
        self.stub_cuts.bend_resolution
            + num_merged.saturating_sub(1) as f32 * self.stub_cuts.bend_resolution_extra
    }

    /// Width of one φ sector (rad).
    pub fn sector_width(&self) -> f32 {
        2.0 * PI / self.phi_sectors.num_sectors as f32
    }

    /// Width of one φ octant (rad).
    pub fn octant_width(&self) -> f32 {
        2.0 * PI / self.phi_sectors.num_octants as f32
    }

    /// φ at the centre of sector `sector`, in (−π, π).
    pub fn sector_centre(&self, sector: u32) -> f32 {
        self.sector_width() * (0.5 + sector as f32) - PI
    }

    /// Octant containing sector `sector`.
    pub fn octant_of_sector(&self, sector: u32) -> u32 {
        let sectors = u64::from(self.phi_sectors.num_sectors.max(1));
        let octant = u64::from(sector) * u64::from(self.phi_sectors.num_octants) / sectors;
        u32::try_from(octant).unwrap_or(u32::MAX)
    }

    /// φ at the centre of octant `octant`, in (−π, π).
    pub fn octant_centre(&self, octant: u32) -> f32 {
        self.octant_width() * (0.5 + octant as f32) - PI
    }

    /// Full range of r − chosen radius inside the tracker.
    pub fn rt_range(&self) -> f32 {
        let chosen = self.phi_sectors.chosen_r_of_phi;
        2.0 * (self.tracker.outer_radius - chosen)
            .abs()
            .max((self.tracker.inner_radius - chosen).abs())
    }

    /// Largest |φ − track φ at the chosen radius| of a stub on a track
    /// with Pt ≥ `min_pt`, over the radial span of the tracker.
    ///
    /// A stub is assigned to every sector its track crosses at the chosen
    /// radius, so its own φ may lie this far outside the sector.
    pub fn phi_curvature_excursion(&self) -> f32 {
        let chosen = self.phi_sectors.chosen_r_of_phi;
        let lever = (self.tracker.outer_radius - chosen)
            .abs()
            .max((self.tracker.inner_radius - chosen).abs());
        lever * self.inv_pt_to_dphi() * self.q_over_pt_cut()
    }

    /// Full range of φ relative to octant centre that the GP input encodes.
    pub fn phi_o_range(&self) -> f32 {
        self.digitization
            .phi_o_range
            .unwrap_or_else(|| self.octant_width() + 2.0 * self.phi_curvature_excursion())
    }

    /// Full range of φ relative to sector centre that the HT input encodes.
    pub fn phi_s_range(&self) -> f32 {
        self.digitization
            .phi_s_range
            .unwrap_or_else(|| self.sector_width() + 2.0 * self.phi_curvature_excursion())
    }

    /// Digitization step sizes derived from bit widths and ranges.
    pub fn digitization_scales(&self) -> DigitizationScales {
        let d = &self.digitization;
        DigitizationScales {
            phi_o: step(self.phi_o_range(), d.phi_o_bits),
            rt: step(self.rt_range(), d.rt_bits),
            z: step(2.0 * self.tracker.half_length, d.z_bits),
            bend: step(d.bend_range, d.bend_bits),
            phi_s: step(self.phi_s_range(), d.phi_s_bits),
            dphi: step(d.dphi_range, d.dphi_bits),
            rho: step(self.rt_range(), d.rho_bits),
        }
    }
}

fn step(range: f32, bits: u32) -> f32 {
    range / 2f32.powi(i32::try_from(bits).unwrap_or(i32::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults_match_standard_configuration() {
        let s = Settings::default();
        assert_eq!(s.hough.nbins_pt, 32);
        assert_eq!(s.phi_sectors.num_sectors, 32);
        assert!(s.stub_cuts.kill_low_pt_stubs);
        assert!(s.digitization.enable);
    }

    #[test]
    fn test_derived_hough_quantities() {
        let s = Settings::default();
        assert_relative_eq!(s.q_over_pt_cut(), 1.0 / 3.0);
        assert_relative_eq!(s.q_over_pt_bin_width(), 2.0 / (3.0 * 32.0));
        assert_relative_eq!(s.inv_pt_to_dphi(), 3.8112 * 0.0015, max_relative = 1e-6);
    }

    #[test]
    fn test_bend_res_grows_with_merges() {
        let mut s = Settings::default();
        s.stub_cuts.bend_resolution_extra = 0.25;
        assert_relative_eq!(s.bend_res(1), 1.25);
        assert_relative_eq!(s.bend_res(3), 1.75);
        assert_relative_eq!(s.bend_res(0), 1.25);
    }

    #[test]
    fn test_sector_centres_span_full_circle() {
        let s = Settings::default();
        assert_relative_eq!(s.sector_centre(0), -PI + PI / 32.0, epsilon = 1e-6);
        assert_relative_eq!(s.sector_centre(31), PI - PI / 32.0, epsilon = 1e-5);
    }

    #[test]
    fn test_each_sector_inside_one_octant() {
        let s = Settings::default();
        assert_eq!(s.octant_of_sector(0), 0);
        assert_eq!(s.octant_of_sector(3), 0);
        assert_eq!(s.octant_of_sector(4), 1);
        assert_eq!(s.octant_of_sector(31), 7);
        for sector in 0..32 {
            let centre = s.sector_centre(sector);
            let octant_centre = s.octant_centre(s.octant_of_sector(sector));
            assert!((centre - octant_centre).abs() < s.octant_width() / 2.0);
        }
    }

    #[test]
    fn test_digitization_scales() {
        let s = Settings::default();
        let scales = s.digitization_scales();
        assert_relative_eq!(scales.bend, 0.25);
        assert_relative_eq!(scales.z, 540.0 / 4096.0);
        assert_relative_eq!(scales.rt, 2.0 * (112.7f32 - 67.24) / 1024.0, max_relative = 1e-6);
    }

    #[test]
    fn test_phi_ranges_cover_curvature() {
        let s = Settings::default();
        // (112.7 − 67.24) · 3.8112 · 0.0015 / 3
        let excursion = 45.46 * 3.8112 * 0.0015 / 3.0;
        assert_relative_eq!(s.phi_curvature_excursion(), excursion, max_relative = 1e-4);
        assert_relative_eq!(s.phi_s_range(), s.sector_width() + 2.0 * excursion, max_relative = 1e-4);
        assert_relative_eq!(s.phi_o_range(), s.octant_width() + 2.0 * excursion, max_relative = 1e-4);
        assert_relative_eq!(s.digitization_scales().phi_s, s.phi_s_range() / 16384.0);
    }

    #[test]
    fn test_explicit_phi_range_wins() {
        let mut s = Settings::default();
        s.digitization.phi_s_range = Some(0.5);
        assert_relative_eq!(s.phi_s_range(), 0.5);
        assert_relative_eq!(s.digitization_scales().phi_s, 0.5 / 16384.0);
    }

    #[test]
    fn test_tracker_volume_contains() {
        let v = TrackerVolume::default();
        assert!(v.contains(50.0, 100.0));
        assert!(v.contains(21.8, -270.0));
        assert!(!v.contains(21.0, 0.0));
        assert!(!v.contains(50.0, 271.0));
    }
}
