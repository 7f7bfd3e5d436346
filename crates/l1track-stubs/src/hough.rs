//! Range of q/Pt bins of the Hough array compatible with a stub's bend.

use std::ops::RangeInclusive;

use l1track_config::Settings;
use serde::{Deserialize, Serialize};

/// Inclusive `[min, max]` range of q/Pt bins.
///
/// The stored bounds always lie inside `[0, N-1]`. A stub whose bend implies
/// a Pt below the Hough acceptance is stored as `min = N-1, max = 0`, so that
/// iterating `min..=max` yields nothing while both bounds stay valid bin
/// numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct HoughBinRange {
    min: u32,
    max: u32,
}

impl HoughBinRange {
    /// Compute the range for q/Pt in `k·(bend ± bend_res)`.
    ///
    /// `k` is the stub's q/Pt per unit bend. Bin `i` covers
    /// `[-1/min_pt + i·w, -1/min_pt + (i+1)·w)` with `w = 2/(min_pt·N)`.
    pub fn compute(settings: &Settings, q_over_pt_over_bend: f32, bend: f32, bend_res: f32) -> Self {
        let q_over_pt_min = q_over_pt_over_bend * (bend - bend_res);
        let q_over_pt_max = q_over_pt_over_bend * (bend + bend_res);
        Self::from_q_over_pt(settings, q_over_pt_min, q_over_pt_max)
    }

    /// Compute the range covering `[q_over_pt_min, q_over_pt_max]`.
    pub fn from_q_over_pt(settings: &Settings, q_over_pt_min: f32, q_over_pt_max: f32) -> Self {
        let nbins = i64::from(settings.hough.nbins_pt.max(1));
        let max_array_bin = nbins - 1;
        let offset = settings.q_over_pt_cut();
        let width = settings.q_over_pt_bin_width();

        let min_bin = to_bin((q_over_pt_min + offset) / width).max(0);
        let max_bin = to_bin((q_over_pt_max + offset) / width).min(max_array_bin);

        let (min_bin, max_bin) = if min_bin > max_bin {
            (max_array_bin, 0)
        } else {
            (min_bin, max_bin)
        };

        Self {
            min: u32::try_from(min_bin).unwrap_or(0),
            max: u32::try_from(max_bin).unwrap_or(0),
        }
    }

    /// Lowest compatible bin.
    pub fn min_bin(&self) -> u32 {
        self.min
    }

    /// Highest compatible bin.
    pub fn max_bin(&self) -> u32 {
        self.max
    }

    /// No bin is compatible with the stub.
    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    /// Number of compatible bins.
    pub fn len(&self) -> u32 {
        if self.is_empty() {
            0
        } else {
            self.max - self.min + 1
        }
    }

    /// Compatible bins, empty for a degenerate range.
    pub fn bins(&self) -> RangeInclusive<u32> {
        self.min..=self.max
    }

    /// Whether `bin` lies in the range.
    pub fn contains(&self, bin: u32) -> bool {
        self.bins().contains(&bin)
    }
}

/// Floor to an integer bin, saturating far outside the array.
#[allow(clippy::cast_possible_truncation)]
fn to_bin(value: f32) -> i64 {
    if value.is_nan() {
        return 0;
    }
    value.floor().clamp(i32::MIN as f32, i32::MAX as f32) as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(min_pt: f32, nbins: u32) -> Settings {
        let mut s = Settings::default();
        s.hough.min_pt = min_pt;
        s.hough.nbins_pt = nbins;
        s
    }

    #[test]
    fn test_centred_range() {
        // w = 2/(2·8) = 0.125, offset 0.5
        let s = settings(2.0, 8);
        let r = HoughBinRange::from_q_over_pt(&s, -0.1, 0.1);
        assert_eq!((r.min_bin(), r.max_bin()), (3, 4));
        assert_eq!(r.len(), 2);
    }

    #[test]
    fn test_bin_edges_have_no_half_bin_offset() {
        let s = settings(2.0, 8);
        // q/Pt = 0 sits exactly on the lower edge of bin 4
        let r = HoughBinRange::from_q_over_pt(&s, 0.0, 0.0);
        assert_eq!((r.min_bin(), r.max_bin()), (4, 4));
    }

    #[test]
    fn test_clamped_to_array() {
        let s = settings(2.0, 8);
        let r = HoughBinRange::from_q_over_pt(&s, -3.0, 3.0);
        assert_eq!((r.min_bin(), r.max_bin()), (0, 7));
        assert_eq!(r.len(), 8);
    }

    #[test]
    fn test_above_acceptance_is_degenerate() {
        let s = settings(2.0, 8);
        let r = HoughBinRange::from_q_over_pt(&s, 0.6, 0.9);
        assert_eq!((r.min_bin(), r.max_bin()), (7, 0));
        assert!(r.is_empty());
        assert_eq!(r.len(), 0);
        assert_eq!(r.bins().count(), 0);
    }

    #[test]
    fn test_below_acceptance_is_degenerate() {
        let s = settings(2.0, 8);
        let r = HoughBinRange::from_q_over_pt(&s, -0.9, -0.51);
        assert_eq!((r.min_bin(), r.max_bin()), (7, 0));
    }

    #[test]
    fn test_compute_uses_bend_resolution() {
        let s = settings(2.0, 8);
        let narrow = HoughBinRange::compute(&s, 0.05, 0.0, 0.5);
        let wide = HoughBinRange::compute(&s, 0.05, 0.0, 3.0);
        assert!(wide.min_bin() <= narrow.min_bin());
        assert!(wide.max_bin() >= narrow.max_bin());
    }

    #[test]
    fn test_single_bin_array() {
        let s = settings(3.0, 1);
        let r = HoughBinRange::from_q_over_pt(&s, -0.1, 0.1);
        assert_eq!((r.min_bin(), r.max_bin()), (0, 0));
        assert!(!r.is_empty());
    }
}
