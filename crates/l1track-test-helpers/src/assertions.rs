//! Assertion macros for stub tests.

/// Assert that two floating-point values are approximately equal.
///
/// # Example
///
/// ```rust
/// use l1track_test_helpers::assert_approx_eq;
///
/// assert_approx_eq!(1.0_f32, 1.0001, 0.001);
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $tolerance:expr $(,)?) => {
        let left = $left;
        let right = $right;
        let tolerance = $tolerance;
        let diff = (left - right).abs();
        if !(diff <= tolerance) {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}`,\n  tolerance: `{:?}`",
                left, right, diff, tolerance
            );
        }
    };
    ($left:expr, $right:expr, $tolerance:expr, $($arg:tt)+) => {
        let left = $left;
        let right = $right;
        let tolerance = $tolerance;
        let diff = (left - right).abs();
        if !(diff <= tolerance) {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}`,\n  tolerance: `{:?}`: {}",
                left, right, diff, tolerance, format_args!($($arg)+)
            );
        }
    };
}

/// Assert that a q/Pt bin range is well formed for an array of `nbins` bins.
///
/// Both bounds must be valid bin numbers, and a reversed range must be the
/// canonical empty range `(nbins - 1, 0)`.
///
/// # Example
///
/// ```rust
/// use l1track_test_helpers::assert_bin_range_valid;
///
/// assert_bin_range_valid!((3_u32, 7_u32), 32_u32);
/// assert_bin_range_valid!((31_u32, 0_u32), 32_u32);
/// ```
#[macro_export]
macro_rules! assert_bin_range_valid {
    ($range:expr, $nbins:expr $(,)?) => {
        let (min, max): (u32, u32) = $range;
        let nbins: u32 = $nbins;
        let top = nbins.saturating_sub(1);
        if min > top || max > top {
            panic!(
                "assertion failed: bin range ({}, {}) outside [0, {}]",
                min, max, top
            );
        }
        if min > max && (min, max) != (top, 0) {
            panic!(
                "assertion failed: reversed bin range ({}, {}) is not the empty range ({}, 0)",
                min, max, top
            );
        }
    };
}

/// Assert that an expression matches a pattern, printing the value if not.
///
/// # Example
///
/// ```rust
/// use l1track_test_helpers::assert_matches;
///
/// let value: Result<u32, &str> = Err("no");
/// assert_matches!(value, Err("no"));
/// ```
#[macro_export]
macro_rules! assert_matches {
    ($value:expr, $pattern:pat $(if $guard:expr)? $(,)?) => {
        match $value {
            $pattern $(if $guard)? => {}
            ref other => panic!(
                "assertion failed: `{}` does not match `{}`\n value: `{:?}`",
                stringify!($value),
                stringify!($pattern $(if $guard)?),
                other
            ),
        }
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_assert_approx_eq_passes() {
        assert_approx_eq!(0.1_f32 + 0.2, 0.3, 1e-6);
    }

    #[test]
    #[should_panic(expected = "left ≈ right")]
    fn test_assert_approx_eq_fails() {
        assert_approx_eq!(1.0_f32, 1.1, 0.01);
    }

    #[test]
    #[should_panic(expected = "left ≈ right")]
    fn test_assert_approx_eq_rejects_nan() {
        assert_approx_eq!(f32::NAN, 1.0, 0.01);
    }

    #[test]
    #[should_panic(expected = "outside [0, 31]")]
    fn test_bin_range_out_of_array() {
        assert_bin_range_valid!((0_u32, 32_u32), 32_u32);
    }

    #[test]
    #[should_panic(expected = "is not the empty range")]
    fn test_bin_range_wrong_reversal() {
        assert_bin_range_valid!((5_u32, 2_u32), 32_u32);
    }

    #[test]
    #[should_panic(expected = "does not match")]
    fn test_assert_matches_fails() {
        let value: Option<u8> = None;
        assert_matches!(value, Some(_));
    }
}
