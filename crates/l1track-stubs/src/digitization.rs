//! Digitization of stub coordinates for the geometric processor (GP) and
//! Hough transform (HT) inputs.
//!
//! A stub keeps an immutable snapshot of its undigitized [`Kinematics`] and a
//! working copy. Digitizing overwrites the working copy with values coarsened
//! to the hardware granularity; resetting restores the snapshot. The current
//! state is a single [`DigitizationState`], so a stub is always exactly one of
//! raw, GP-digitized or GP+HT-digitized.
//!
//! # State machine
//!
//! ```text
//!            digitize_for_gp(s)            digitize_for_ht(s)
//!   Raw ───────────────────────▶ GP(s) ───────────────────────▶ Both(s)
//!    ▲                            │ ▲                              │
//!    │          reset             │ └──── digitize_for_gp(s') ─────┘
//!    └────────────────────────────┴────────────────────────────────┘
//! ```
//!
//! GP digitization only depends on the φ octant of the sector, so moving to
//! another sector of the same octant reuses the GP integer codes.

use std::f32::consts::PI;

use l1track_config::{FirmwareType, Settings};
use l1track_errors::ValidationError;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::hough::HoughBinRange;

/// Stub quantities that digitization may replace.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Kinematics {
    /// Azimuth (rad)
    pub phi: f32,
    /// Radius (cm)
    pub r: f32,
    /// Longitudinal coordinate (cm)
    pub z: f32,
    /// Working bend (strip units)
    pub bend: f32,
    /// Azimuthal deviation between stub and track at the beam line
    pub dphi: f32,
    /// Radius relative to the Hough reference radius (cm)
    pub rho: f32,
    /// Compatible q/Pt bins
    pub bin_range: HoughBinRange,
}

impl Kinematics {
    /// q/Pt per unit bend at this radius.
    pub fn q_over_pt_over_bend(&self, settings: &Settings, dphi_over_bend: f32) -> f32 {
        dphi_over_bend / (self.r * settings.inv_pt_to_dphi())
    }
}

/// Integer codes of the GP input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GpDigits {
    /// φ octant the codes are relative to
    pub octant: u32,
    /// φ relative to the octant centre
    pub phi_o: i32,
    /// r relative to the Hough reference radius
    pub rt: i32,
    /// z
    pub z: i32,
    /// Bend
    pub bend: i32,
}

/// Integer codes of the HT input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HtDigits {
    /// φ relative to the sector centre
    pub phi_s: i32,
    /// Azimuthal deviation, absent for daisy-chain firmware
    pub dphi: Option<i32>,
    /// ρ parameter, absent for daisy-chain firmware
    pub rho: Option<i32>,
}

/// Which digitized values a stub currently holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DigitizationState {
    /// Undigitized values
    #[default]
    Raw,
    /// Digitized for the geometric processor of `sector`
    GeometricProcessor {
        /// φ sector
        sector: u32,
        /// GP integer codes
        gp: GpDigits,
    },
    /// Digitized for the geometric processor and Hough transform of `sector`
    Both {
        /// φ sector
        sector: u32,
        /// GP integer codes
        gp: GpDigits,
        /// HT integer codes
        ht: HtDigits,
    },
}

impl DigitizationState {
    /// Sector the current values were digitized for.
    pub fn sector(&self) -> Option<u32> {
        match *self {
            DigitizationState::Raw => None,
            DigitizationState::GeometricProcessor { sector, .. }
            | DigitizationState::Both { sector, .. } => Some(sector),
        }
    }

    /// GP codes, if digitized.
    pub fn gp(&self) -> Option<&GpDigits> {
        match self {
            DigitizationState::Raw => None,
            DigitizationState::GeometricProcessor { gp, .. }
            | DigitizationState::Both { gp, .. } => Some(gp),
        }
    }

    /// HT codes, if digitized for the HT.
    pub fn ht(&self) -> Option<&HtDigits> {
        match self {
            DigitizationState::Both { ht, .. } => Some(ht),
            _ => None,
        }
    }

    /// Holds GP-digitized values.
    pub fn is_digitized_for_gp(&self) -> bool {
        !matches!(self, DigitizationState::Raw)
    }

    /// Holds HT-digitized values.
    pub fn is_digitized_for_ht(&self) -> bool {
        matches!(self, DigitizationState::Both { .. })
    }
}

/// Snapshot, working copy and state of one stub's digitizable values.
#[derive(Debug, Clone, PartialEq)]
pub struct Digitization {
    original: Kinematics,
    working: Kinematics,
    state: DigitizationState,
    dphi_over_bend: f32,
    bend_res: f32,
}

impl Digitization {
    /// Start in the raw state.
    ///
    /// `dphi_over_bend` and `bend_res` are needed to recompute the q/Pt bin
    /// range after HT digitization.
    pub fn new(original: Kinematics, dphi_over_bend: f32, bend_res: f32) -> Self {
        Self {
            original,
            working: original,
            state: DigitizationState::Raw,
            dphi_over_bend,
            bend_res,
        }
    }

    /// Values before any digitization.
    pub fn original(&self) -> &Kinematics {
        &self.original
    }

    /// Current values.
    pub fn working(&self) -> &Kinematics {
        &self.working
    }

    /// Current state.
    pub fn state(&self) -> &DigitizationState {
        &self.state
    }

    /// Digitize for the GP input of `sector`.
    ///
    /// Does nothing if digitization is disabled or the values are already
    /// digitized for this sector. Any HT digitization is dropped.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::OutOfRange` if `sector` is not a valid
    /// sector index.
    pub fn digitize_for_gp(&mut self, settings: &Settings, sector: u32) -> Result<(), ValidationError> {
        check_sector(settings, sector)?;
        if !settings.digitization.enable || self.state.sector() == Some(sector) {
            return Ok(());
        }

        let octant = settings.octant_of_sector(sector);
        let gp = match self.state.gp() {
            Some(gp) if gp.octant == octant => *gp,
            _ => GpDigits::encode(settings, octant, &self.original),
        };

        self.working = self.original;
        gp.apply(settings, &mut self.working);
        self.state = DigitizationState::GeometricProcessor { sector, gp };
        trace!(sector, octant, "Stub digitized for GP input");
        Ok(())
    }

    /// Digitize for the HT input of `sector`, including GP digitization.
    ///
    /// Unless the firmware is daisy-chain, dφ and ρ are digitized too and the
    /// q/Pt bin range is recomputed from the digitized values.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::OutOfRange` if `sector` is not a valid
    /// sector index.
    pub fn digitize_for_ht(&mut self, settings: &Settings, sector: u32) -> Result<(), ValidationError> {
        check_sector(settings, sector)?;
        if !settings.digitization.enable {
            return Ok(());
        }
        if matches!(self.state, DigitizationState::Both { sector: current, .. } if current == sector) {
            return Ok(());
        }

        if self.state.sector() != Some(sector) {
            self.digitize_for_gp(settings, sector)?;
        }
        let DigitizationState::GeometricProcessor { gp, .. } = self.state else {
            return Ok(());
        };

        let firmware = settings.hough.firmware_type;
        let ht = HtDigits::encode(settings, sector, firmware, &self.working);
        ht.apply(settings, sector, &mut self.working);
        if firmware.uses_dphi_and_rho() {
            let k = self
                .working
                .q_over_pt_over_bend(settings, self.dphi_over_bend);
            self.working.bin_range =
                HoughBinRange::compute(settings, k, self.working.bend, self.bend_res);
        }

        self.state = DigitizationState::Both { sector, gp, ht };
        trace!(sector, %firmware, "Stub digitized for HT input");
        Ok(())
    }

    /// Restore the undigitized values.
    pub fn reset(&mut self) {
        if matches!(self.state, DigitizationState::Raw) {
            return;
        }
        self.working = self.original;
        self.state = DigitizationState::Raw;
        trace!("Stub digitization reset");
    }
}

fn check_sector(settings: &Settings, sector: u32) -> Result<(), ValidationError> {
    let sectors = settings.phi_sectors.num_sectors;
    if sector >= sectors {
        return Err(ValidationError::out_of_range(
            "sector",
            sector,
            0,
            sectors.saturating_sub(1),
        ));
    }
    Ok(())
}

impl GpDigits {
    /// Encode undigitized values relative to `octant`.
    pub fn encode(settings: &Settings, octant: u32, original: &Kinematics) -> Self {
        let d = &settings.digitization;
        let scales = settings.digitization_scales();
        let phi_o = wrap_phi(original.phi - settings.octant_centre(octant));
        let rt = original.r - settings.phi_sectors.chosen_r_of_phi;
        Self {
            octant,
            phi_o: floor_code(phi_o, scales.phi_o, d.phi_o_bits),
            rt: floor_code(rt, scales.rt, d.rt_bits),
            z: floor_code(original.z, scales.z, d.z_bits),
            bend: round_code(original.bend, scales.bend, d.bend_bits),
        }
    }

    /// Overwrite φ, r, z and bend with the values these codes represent.
    pub fn apply(&self, settings: &Settings, target: &mut Kinematics) {
        let scales = settings.digitization_scales();
        target.phi = wrap_phi(settings.octant_centre(self.octant) + bin_centre(self.phi_o, scales.phi_o));
        target.r = settings.phi_sectors.chosen_r_of_phi + bin_centre(self.rt, scales.rt);
        target.z = bin_centre(self.z, scales.z);
        target.bend = code_value(self.bend, scales.bend);
    }
}

impl HtDigits {
    /// Encode GP-digitized values relative to `sector`.
    pub fn encode(settings: &Settings, sector: u32, firmware: FirmwareType, working: &Kinematics) -> Self {
        let d = &settings.digitization;
        let scales = settings.digitization_scales();
        let phi_s = wrap_phi(working.phi - settings.sector_centre(sector));
        let with_dphi_and_rho = firmware.uses_dphi_and_rho();
        let rho = working.r - settings.phi_sectors.chosen_r_of_phi;
        Self {
            phi_s: floor_code(phi_s, scales.phi_s, d.phi_s_bits),
            dphi: with_dphi_and_rho.then(|| floor_code(working.dphi, scales.dphi, d.dphi_bits)),
            rho: with_dphi_and_rho.then(|| floor_code(rho, scales.rho, d.rho_bits)),
        }
    }

    /// Overwrite φ, and dφ and ρ where encoded, with the values these codes
    /// represent.
    pub fn apply(&self, settings: &Settings, sector: u32, target: &mut Kinematics) {
        let scales = settings.digitization_scales();
        target.phi = wrap_phi(settings.sector_centre(sector) + bin_centre(self.phi_s, scales.phi_s));
        if let Some(dphi) = self.dphi {
            target.dphi = bin_centre(dphi, scales.dphi);
        }
        if let Some(rho) = self.rho {
            target.rho = bin_centre(rho, scales.rho);
        }
    }
}

/// Wrap an angle into (−π, π].
pub fn wrap_phi(phi: f32) -> f32 {
    let mut wrapped = phi % (2.0 * PI);
    if wrapped > PI {
        wrapped -= 2.0 * PI;
    } else if wrapped <= -PI {
        wrapped += 2.0 * PI;
    }
    wrapped
}

fn code_limits(bits: u32) -> (f32, f32) {
    let half = 2f32.powi(i32::try_from(bits.saturating_sub(1)).unwrap_or(30));
    (-half, half - 1.0)
}

#[allow(clippy::cast_possible_truncation)]
fn to_code(value: f32, bits: u32) -> i32 {
    let (lo, hi) = code_limits(bits);
    if value.is_nan() {
        return 0;
    }
    value.clamp(lo, hi) as i32
}

fn floor_code(value: f32, step: f32, bits: u32) -> i32 {
    to_code((value / step).floor(), bits)
}

fn round_code(value: f32, step: f32, bits: u32) -> i32 {
    to_code((value / step).round(), bits)
}

fn bin_centre(code: i32, step: f32) -> f32 {
    (code as f32 + 0.5) * step
}

fn code_value(code: i32, step: f32) -> f32 {
    code as f32 * step
}
