//! Numeric helpers shared by the solver and by tests.

/// Assert that the deviation between two values is less than a threshold
///
/// Calculates the percentage deviation between `actual` and `expected`, then
/// asserts that this deviation is less than the specified `max_deviation`.
///
/// # Examples
/// ```
/// use thermal_insulation::assert_deviation;
///
/// // converged flux within 1 % of the hand calculation
/// assert_deviation!(140.08, 139.76, 1.0);
/// ```
#[macro_export]
macro_rules! assert_deviation {
    ($actual:expr, $expected:expr, $max_deviation:expr) => {
        {
            let actual_val = $actual;
            let expected_val = $expected;
            let max_dev = $max_deviation;
            let actual_deviation = $crate::math_utils::deviation(actual_val, expected_val);

            if actual_deviation >= max_dev {
                panic!(
                    "assertion failed: deviation {:.2}% >= {:.2}%\n  actual: {:?},\n  expected: {:?}",
                    actual_deviation, max_dev, actual_val, expected_val
                );
            }
        }
    };
    ($actual:expr, $expected:expr, $max_deviation:expr, $($arg:tt)+) => {
        {
            let actual_val = $actual;
            let expected_val = $expected;
            let max_dev = $max_deviation;
            let actual_deviation = $crate::math_utils::deviation(actual_val, expected_val);

            if actual_deviation >= max_dev {
                panic!(
                    "assertion failed: deviation {:.2}% >= {:.2}%: {}\n  actual: {:?},\n  expected: {:?}",
                    actual_deviation, max_dev, format_args!($($arg)+), actual_val, expected_val
                );
            }
        }
    };
}

/// Calculate the percentage deviation between two values
///
/// Uses the expected value as the reference (base) for the percentage.
///
/// # Examples
/// ```
/// use thermal_insulation::math_utils::deviation;
///
/// assert_eq!(deviation(105.0, 100.0), 5.0);
/// assert_eq!(deviation(95.0, 100.0), 5.0);
/// ```
pub fn deviation(actual: f64, expected: f64) -> f64 {
    if expected.abs() < f64::EPSILON {
        if actual.abs() < f64::EPSILON {
            0.0
        } else {
            f64::INFINITY
        }
    } else {
        ((actual - expected).abs() / expected.abs()) * 100.0
    }
}

/// True when two successive residuals straddle zero.
///
/// An undefined previous residual never counts as a sign change.
pub fn sign_changed(previous: Option<f64>, current: f64) -> bool {
    match previous {
        Some(prev) => prev * current < 0.0,
        None => false,
    }
}

/// Shrinks a search step geometrically without going below `min_step`.
pub fn reduce_step(step: f64, factor: f64, min_step: f64) -> f64 {
    (step * factor).max(min_step)
}
