//! # Planar geometry helpers
//!
//! All functions here work in the XY plane of a single frame. Vehicle-local coordinates have +X
//! pointing forward along the vehicle heading and +Y pointing to the vehicle's left.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::{Rotation2, Vector2};

use crate::loc::Pose;

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Yaw of the pose about +Z, in radians.
pub fn yaw_of(pose: &Pose) -> f64 {
    pose.get_heading()
}

/// Express `point_m` relative to the vehicle, rotated into the vehicle's heading.
pub fn to_vehicle_local(point_m: &Vector2<f64>, vehicle: &Pose) -> Vector2<f64> {
    let rot = Rotation2::new(-yaw_of(vehicle));

    rot * (point_m - vehicle.position2())
}

/// True if `point_m` is strictly in front of the vehicle.
pub fn is_ahead(point_m: &Vector2<f64>, vehicle: &Pose) -> bool {
    to_vehicle_local(point_m, vehicle)[0] > 0.0
}

/// Euclidean distance between two points.
pub fn distance(a: &Vector2<f64>, b: &Vector2<f64>) -> f64 {
    (a - b).norm()
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_to_vehicle_local() {
        // Vehicle at (1, 1) facing +Y, point at (1, 3) is 2 m straight ahead
        let vehicle = Pose::new(1.0, 1.0, FRAC_PI_2);
        let local = to_vehicle_local(&Vector2::new(1.0, 3.0), &vehicle);
        assert!((local[0] - 2.0).abs() < 1e-9);
        assert!(local[1].abs() < 1e-9);

        // Point at (0, 1) is 1 m to the vehicle's left
        let local = to_vehicle_local(&Vector2::new(0.0, 1.0), &vehicle);
        assert!(local[0].abs() < 1e-9);
        assert!((local[1] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_is_ahead() {
        let vehicle = Pose::new(0.0, 0.0, 0.0);
        assert!(is_ahead(&Vector2::new(2.0, 0.0), &vehicle));
        assert!(is_ahead(&Vector2::new(0.1, -5.0), &vehicle));
        assert!(!is_ahead(&Vector2::new(-1.0, 0.0), &vehicle));

        // Exactly abeam is not ahead
        assert!(!is_ahead(&Vector2::new(0.0, 2.0), &vehicle));
    }

    #[test]
    fn test_distance() {
        assert_eq!(distance(&Vector2::new(0.0, 0.0), &Vector2::new(3.0, 4.0)), 5.0);
        assert_eq!(distance(&Vector2::new(1.0, 1.0), &Vector2::new(1.0, 1.0)), 0.0);
    }
}
