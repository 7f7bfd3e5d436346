//! Settings validation
//!
//! Settings are checked once, before any stub is built, so that the hot
//! per-stub code can divide by bin widths and radii without guarding.

use l1track_errors::ValidationError;

use crate::types::Settings;

/// Largest bit width accepted for any digitized quantity.
const MAX_BITS: u32 = 31;

/// Validator for [`Settings`].
#[derive(Debug, Clone, Default)]
pub struct SettingsValidator;

impl SettingsValidator {
    /// Create a new settings validator
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Validate a complete settings value.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if:
    /// - any length, field or cut is non-finite or not positive where required
    /// - the inner tracker radius is not below the outer radius
    /// - the chosen Hough radius lies outside the tracker
    /// - the Hough array has no q/Pt bins
    /// - the sector count is not a multiple of the octant count
    /// - a digitization bit width is 0 or above 31
    /// - an explicit φ digitization range is narrower than its sector or octant
    pub fn validate(&self, settings: &Settings) -> Result<(), ValidationError> {
        let tracker = &settings.tracker;
        positive("tracker.inner_radius", tracker.inner_radius)?;
        positive("tracker.outer_radius", tracker.outer_radius)?;
        positive("tracker.half_length", tracker.half_length)?;
        if tracker.inner_radius >= tracker.outer_radius {
            return Err(ValidationError::constraint(format!(
                "tracker.inner_radius ({}) must be below tracker.outer_radius ({})",
                tracker.inner_radius, tracker.outer_radius
            )));
        }

        positive("field.b_tesla", settings.field.b_tesla)?;

        let cuts = &settings.stub_cuts;
        positive("stub_cuts.max_stub_eta", cuts.max_stub_eta)?;
        non_negative("stub_cuts.bend_resolution", cuts.bend_resolution)?;
        non_negative("stub_cuts.bend_resolution_extra", cuts.bend_resolution_extra)?;
        positive("stub_cuts.crazy_stub_cut", cuts.crazy_stub_cut)?;

        positive("hough.min_pt", settings.hough.min_pt)?;
        if settings.hough.nbins_pt == 0 {
            return Err(ValidationError::not_positive("hough.nbins_pt", 0));
        }

        self.validate_sectors(settings)?;
        self.validate_digitization(settings)
    }

    fn validate_sectors(&self, settings: &Settings) -> Result<(), ValidationError> {
        let sectors = &settings.phi_sectors;
        if sectors.num_sectors == 0 {
            return Err(ValidationError::not_positive("phi_sectors.num_sectors", 0));
        }
        if sectors.num_octants == 0 {
            return Err(ValidationError::not_positive("phi_sectors.num_octants", 0));
        }
        if sectors.num_sectors % sectors.num_octants != 0 {
            return Err(ValidationError::constraint(format!(
                "phi_sectors.num_sectors ({}) must be a multiple of phi_sectors.num_octants ({})",
                sectors.num_sectors, sectors.num_octants
            )));
        }

        let tracker = &settings.tracker;
        let chosen = sectors.chosen_r_of_phi;
        if !chosen.is_finite() {
            return Err(ValidationError::not_finite("phi_sectors.chosen_r_of_phi"));
        }
        if chosen < tracker.inner_radius || chosen > tracker.outer_radius {
            return Err(ValidationError::out_of_range(
                "phi_sectors.chosen_r_of_phi",
                chosen,
                tracker.inner_radius,
                tracker.outer_radius,
            ));
        }
        Ok(())
    }

    fn validate_digitization(&self, settings: &Settings) -> Result<(), ValidationError> {
        let d = &settings.digitization;
        let widths = [
            ("digitization.phi_o_bits", d.phi_o_bits),
            ("digitization.rt_bits", d.rt_bits),
            ("digitization.z_bits", d.z_bits),
            ("digitization.bend_bits", d.bend_bits),
            ("digitization.phi_s_bits", d.phi_s_bits),
            ("digitization.dphi_bits", d.dphi_bits),
            ("digitization.rho_bits", d.rho_bits),
        ];
        for (field, bits) in widths {
            if !(1..=MAX_BITS).contains(&bits) {
                return Err(ValidationError::out_of_range(field, bits, 1, MAX_BITS));
            }
        }
        positive("digitization.bend_range", d.bend_range)?;
        positive("digitization.dphi_range", d.dphi_range)?;

        let phi_ranges = [
            ("digitization.phi_o_range", d.phi_o_range, settings.octant_width()),
            ("digitization.phi_s_range", d.phi_s_range, settings.sector_width()),
        ];
        for (field, range, width) in phi_ranges {
            let Some(range) = range else { continue };
            positive(field, range)?;
            if range < width {
                return Err(ValidationError::constraint(format!(
                    "{field} ({range}) must cover the full width ({width}) it is relative to"
                )));
            }
        }
        Ok(())
    }
}

fn positive(field: &str, value: f32) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::not_finite(field));
    }
    if value <= 0.0 {
        return Err(ValidationError::not_positive(field, value));
    }
    Ok(())
}

fn non_negative(field: &str, value: f32) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::not_finite(field));
    }
    if value < 0.0 {
        return Err(ValidationError::out_of_range(field, value, 0.0, f32::MAX));
    }
    Ok(())
}
