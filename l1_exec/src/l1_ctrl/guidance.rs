//! # L1 guidance law
//!
//! Converts the target position in vehicle-local coordinates into a heading error, and the heading
//! error into a steering angle using the L1 geometric law for a vehicle with its anchor point a
//! distance `lfw` ahead of the front axle:
//!
//! ```text
//! delta = -atan(L * sin(eta) / (Lfw / 2 + lfw * cos(eta)))
//! ```
//!
//! where `L` is the wheelbase and `Lfw` the lookahead distance.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::Vector2;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Vehicle geometry used by the guidance law.
#[derive(Debug, Copy, Clone)]
pub struct GuidanceGeometry {
    /// `L`
    pub wheelbase_m: f64,

    /// `Lfw`
    pub lookahead_m: f64,

    /// `lfw`
    pub front_anchor_m: f64,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Heading error to a target given in vehicle-local coordinates.
///
/// Positive when the target is to the left. A target exactly abeam gives +/- pi/2, a target at the
/// vehicle's own position gives 0.
pub fn heading_error(target_local_m: &Vector2<f64>) -> f64 {
    target_local_m[1].atan2(target_local_m[0])
}

/// Steering angle (degrees) commanded by the L1 law for heading error `eta_rad`.
pub fn steering_angle_deg(eta_rad: f64, geom: &GuidanceGeometry) -> f64 {
    -(geom.wheelbase_m * eta_rad.sin()
        / (geom.lookahead_m / 2.0 + geom.front_anchor_m * eta_rad.cos()))
    .atan()
    .to_degrees()
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

    const GEOM: GuidanceGeometry = GuidanceGeometry {
        wheelbase_m: 0.26,
        lookahead_m: 1.0,
        front_anchor_m: 0.13,
    };

    #[test]
    fn test_heading_error() {
        assert_eq!(heading_error(&Vector2::new(2.0, 0.0)), 0.0);
        assert!((heading_error(&Vector2::new(1.0, 1.0)) - FRAC_PI_4).abs() < 1e-12);
        assert!((heading_error(&Vector2::new(1.0, -1.0)) + FRAC_PI_4).abs() < 1e-12);
        assert_eq!(heading_error(&Vector2::new(0.0, 2.0)), FRAC_PI_2);
        assert_eq!(heading_error(&Vector2::new(0.0, -2.0)), -FRAC_PI_2);
        assert_eq!(heading_error(&Vector2::new(0.0, 0.0)), 0.0);
    }

    #[test]
    fn test_steering_angle() {
        assert_eq!(steering_angle_deg(0.0, &GEOM), 0.0);

        // Target to the left gives a negative raw angle, the gain sets the final sign
        let left = steering_angle_deg(FRAC_PI_4, &GEOM);
        let right = steering_angle_deg(-FRAC_PI_4, &GEOM);
        assert!(left < 0.0);
        assert!((left + right).abs() < 1e-12);

        let expected = -(0.26 * FRAC_PI_4.sin() / (0.5 + 0.13 * FRAC_PI_4.cos()))
            .atan()
            .to_degrees();
        assert!((left - expected).abs() < 1e-12);
    }
}
