//! Series transforms.

pub mod sma;

pub use sma::{smooth, InsufficientDataError, RollingMean};

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for transform tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
