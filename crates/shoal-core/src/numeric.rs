//! Numeric thresholds used across the engine.

/// Magnitude below which a value is treated as numerically zero.
pub const RATHER_SMALL: f64 = 1e-10;

/// Prior counts at or below this are treated as "nothing to remove".
pub const VERY_SMALL: f64 = 1e-20;

/// Returns `true` if `x` is within [`RATHER_SMALL`] of zero.
#[inline]
pub fn is_zero(x: f64) -> bool {
    x.abs() < RATHER_SMALL
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_threshold() {
        assert!(is_zero(0.0));
        assert!(is_zero(-5e-11));
        assert!(!is_zero(1e-9));
        assert!(!is_zero(-1.0));
    }
}
