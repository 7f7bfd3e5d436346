//! Bend encoding of a single layer or ring.

use l1track_errors::ConfigurationError;
use serde::{Deserialize, Serialize};

/// Result of passing a raw bend through the front-end encoder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DegradedBend {
    /// Bend value the encoder reports (strip units)
    pub bend: f32,
    /// The raw bend lay outside the encoder's acceptance window
    pub out_of_window: bool,
    /// Number of raw bend values sharing this encoded value
    pub merged: u32,
}

impl DegradedBend {
    fn unchanged(bend: f32, out_of_window: bool) -> Self {
        Self {
            bend,
            out_of_window,
            merged: 1,
        }
    }
}

/// Encoding window of one barrel layer or endcap ring.
///
/// Raw bends are measured in half-strip steps. Up to `fine_limit` every
/// half-strip value is encoded individually; beyond it, consecutive values
/// are merged in groups of `coarse_group` up to `window`. Bends with
/// magnitude above `window` are not encoded.
///
/// # Example
///
/// ```
/// use l1track_bend_encoding::BendWindow;
///
/// let window = BendWindow::new(3.5, 2.0, 2)?;
///
/// // Fine region: encoded as is
/// assert_eq!(window.degrade(1.5).bend, 1.5);
///
/// // Coarse region: 2.5 and 3.0 share the value 2.75
/// let coarse = window.degrade(-3.0);
/// assert_eq!(coarse.bend, -2.75);
/// assert_eq!(coarse.merged, 2);
///
/// // Outside the window
/// assert!(window.degrade(4.0).out_of_window);
/// # Ok::<(), l1track_errors::ConfigurationError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BendWindow {
    /// Largest accepted |bend| (strip units)
    pub window: f32,
    /// Largest |bend| encoded at full half-strip granularity
    pub fine_limit: f32,
    /// Number of half-strip values merged per code beyond `fine_limit`
    #[serde(default = "default_coarse_group")]
    pub coarse_group: u32,
}

fn default_coarse_group() -> u32 {
    2
}

/// Round a non-negative strip value to the nearest half-strip index.
#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
fn half_strips(value: f32) -> u32 {
    (value.abs() * 2.0).round() as u32
}

impl BendWindow {
    /// Create a validated window.
    ///
    /// # Errors
    ///
    /// See [`validate`](Self::validate).
    pub fn new(window: f32, fine_limit: f32, coarse_group: u32) -> Result<Self, ConfigurationError> {
        let w = Self {
            window,
            fine_limit,
            coarse_group,
        };
        w.validate()?;
        Ok(w)
    }

    /// Check that the window is usable.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidSetting` if `window` is not
    /// positive, `fine_limit` is negative or above `window`, or
    /// `coarse_group` is zero.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !(self.window.is_finite() && self.window > 0.0) {
            return Err(ConfigurationError::invalid_setting(
                "window",
                format!("must be positive, got {}", self.window),
            ));
        }
        if !(self.fine_limit.is_finite() && (0.0..=self.window).contains(&self.fine_limit)) {
            return Err(ConfigurationError::invalid_setting(
                "fine_limit",
                format!("must lie in [0, {}], got {}", self.window, self.fine_limit),
            ));
        }
        if self.coarse_group == 0 {
            return Err(ConfigurationError::invalid_setting(
                "coarse_group",
                "must be non-zero",
            ));
        }
        Ok(())
    }

    /// Encode a raw bend.
    ///
    /// Out-of-window bends are flagged, not clamped: the raw value is
    /// returned with `merged = 1`.
    pub fn degrade(&self, bend: f32) -> DegradedBend {
        if bend.abs() > self.window {
            return DegradedBend::unchanged(bend, true);
        }

        let index = half_strips(bend);
        let fine = half_strips(self.fine_limit);
        if index <= fine {
            return DegradedBend::unchanged(bend, false);
        }

        let top = half_strips(self.window);
        let group = self.coarse_group;
        let first = fine + 1 + ((index - fine - 1) / group) * group;
        let last = first.saturating_add(group - 1).min(top);
        let centre = (first + last) as f32 / 4.0;

        DegradedBend {
            bend: if bend < 0.0 { -centre } else { centre },
            out_of_window: false,
            merged: last - first + 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn must<T, E: std::fmt::Debug>(result: Result<T, E>) -> T {
        match result {
            Ok(v) => v,
            Err(e) => panic!("unexpected error: {e:?}"),
        }
    }

    #[test]
    fn test_fine_region_passes_through() {
        let w = must(BendWindow::new(4.5, 2.5, 2));
        for bend in [0.0, 0.5, -1.0, 2.5, -2.5] {
            let d = w.degrade(bend);
            assert_relative_eq!(d.bend, bend);
            assert_eq!(d.merged, 1);
            assert!(!d.out_of_window);
        }
    }

    #[test]
    fn test_coarse_groups() {
        let w = must(BendWindow::new(4.5, 2.5, 2));
        // half-strip indices 6,7 -> 3.25 ; 8,9 -> 4.25
        assert_relative_eq!(w.degrade(3.0).bend, 3.25);
        assert_relative_eq!(w.degrade(3.5).bend, 3.25);
        assert_relative_eq!(w.degrade(-4.0).bend, -4.25);
        assert_relative_eq!(w.degrade(4.5).bend, 4.25);
        assert_eq!(w.degrade(4.5).merged, 2);
    }

    #[test]
    fn test_last_group_truncated_at_window() {
        let w = must(BendWindow::new(3.0, 1.0, 3));
        // indices 3,4,5 -> 2.0 ; 6 alone -> 3.0
        let d = w.degrade(2.0);
        assert_relative_eq!(d.bend, 2.0);
        assert_eq!(d.merged, 3);
        let d = w.degrade(3.0);
        assert_relative_eq!(d.bend, 3.0);
        assert_eq!(d.merged, 1);
    }

    #[test]
    fn test_out_of_window_flagged_not_clamped() {
        let w = must(BendWindow::new(2.5, 1.5, 2));
        let d = w.degrade(-3.5);
        assert!(d.out_of_window);
        assert_relative_eq!(d.bend, -3.5);
        assert_eq!(d.merged, 1);
    }

    #[test]
    fn test_invalid_windows() {
        assert!(BendWindow::new(0.0, 0.0, 2).is_err());
        assert!(BendWindow::new(2.0, 2.5, 2).is_err());
        assert!(BendWindow::new(2.0, -0.5, 2).is_err());
        assert!(BendWindow::new(2.0, 1.0, 0).is_err());
        assert!(BendWindow::new(f32::NAN, 1.0, 2).is_err());
    }
}
