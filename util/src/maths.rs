//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Clamp `value` into the closed range `[min, max]`.
pub fn clamp<T>(value: &T, min: &T, max: &T) -> T
where
    T: Float,
{
    let mut ret = *value;

    if ret > *max {
        ret = *max
    }
    if ret < *min {
        ret = *min
    }

    ret
}

/// Calculates the least nonnegative remainder of `lhs (mod rhs)`.
///
/// This function is taken from the std library as num is missing it.
///
/// In particular, the return value `r` satisfies `0.0 <= r < rhs.abs()` in
/// most cases. However, due to a floating point round-off error it can
/// result in `r == rhs.abs()` if `lhs` is much smaller than `rhs.abs()` in
/// magnitude and `lhs < 0.0`.
pub fn rem_euclid<T>(lhs: T, rhs: T) -> T
where
    T: Float,
{
    let r = lhs % rhs;
    if r < T::zero() {
        r + rhs.abs()
    } else {
        r
    }
}

/// Wrap an angle into the range `[-pi, pi)`.
pub fn wrap_pi<T>(value: T) -> T
where
    T: Float,
{
    // Conversion of a constant into a float type cannot fail
    let pi_t = T::from(std::f64::consts::PI).unwrap_or_else(T::zero);
    let tau_t = pi_t + pi_t;

    rem_euclid(value + pi_t, tau_t) - pi_t
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    const PI: f64 = std::f64::consts::PI;

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(&50f64, &-40f64, &40f64), 40f64);
        assert_eq!(clamp(&-50f64, &-40f64, &40f64), -40f64);
        assert_eq!(clamp(&12.5f64, &-40f64, &40f64), 12.5f64);
        assert_eq!(clamp(&40f64, &-40f64, &40f64), 40f64);
    }

    #[test]
    fn test_rem_euclid() {
        assert_eq!(rem_euclid(5f64, 3f64), 2f64);
        assert_eq!(rem_euclid(-1f64, 3f64), 2f64);
        assert_eq!(rem_euclid(0f64, 3f64), 0f64);
    }

    #[test]
    fn test_wrap_pi() {
        assert!((wrap_pi(0.5f64) - 0.5).abs() < 1e-12);
        assert!((wrap_pi(PI + 0.5) - (-PI + 0.5)).abs() < 1e-12);
        assert!((wrap_pi(-PI - 0.5) - (PI - 0.5)).abs() < 1e-12);
        assert!((wrap_pi(4.0 * PI + 1.0) - 1.0).abs() < 1e-9);
        assert!((wrap_pi(PI) - (-PI)).abs() < 1e-12);
    }
}
