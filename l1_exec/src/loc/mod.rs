//! # Localisation module
//!
//! Provides the vehicle pose and velocity estimate used by the controller, built from the odometry
//! messages delivered by localisation.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use comms_if::msg::{Odometry, PointMsg, PoseMsg, QuaternionMsg};
use nalgebra::{Quaternion, UnitQuaternion, Vector2, Vector3};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Quaternions with a norm below this value are treated as the identity.
const MIN_QUAT_NORM: f64 = 1e-9;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A pose (position and attitude) of a body in some parent frame.
///
/// The frame itself is not stored, it is implied by where the pose came from.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Pose {
    /// The position in the parent frame
    pub position_m: Vector3<f64>,

    /// The attitude of the body in the parent frame.
    pub attitude_q: UnitQuaternion<f64>,
}

/// The current kinematic state of the vehicle, in the common frame.
///
/// Only the latest estimate is kept.
#[derive(Debug, Clone, Default)]
pub struct VehicleState {
    /// Name of the frame the pose is expressed in
    pub frame_id: String,

    /// Current pose of the vehicle
    pub pose: Pose,

    /// Linear velocity in the vehicle body frame
    pub lin_vel_ms: Vector3<f64>,

    /// Angular velocity in the vehicle body frame
    pub ang_vel_rads: Vector3<f64>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Pose {
    /// Create a planar pose at `(x, y)` with heading `yaw_rad` about +Z.
    pub fn new(x: f64, y: f64, yaw_rad: f64) -> Self {
        Self {
            position_m: Vector3::new(x, y, 0.0),
            attitude_q: UnitQuaternion::from_euler_angles(0.0, 0.0, yaw_rad),
        }
    }

    /// Build a pose from a pose message.
    ///
    /// Degenerate (zero) quaternions are replaced by the identity.
    pub fn from_msg(msg: &PoseMsg) -> Self {
        let o = &msg.orientation;
        let q = Quaternion::new(o.w, o.x, o.y, o.z);

        Self {
            position_m: Vector3::new(msg.position.x, msg.position.y, msg.position.z),
            attitude_q: UnitQuaternion::try_new(q, MIN_QUAT_NORM)
                .unwrap_or_else(UnitQuaternion::identity),
        }
    }

    /// Convert the pose into a pose message.
    pub fn to_msg(&self) -> PoseMsg {
        let q = self.attitude_q.quaternion();

        PoseMsg {
            position: PointMsg {
                x: self.position_m[0],
                y: self.position_m[1],
                z: self.position_m[2],
            },
            orientation: QuaternionMsg {
                x: q.i,
                y: q.j,
                z: q.k,
                w: q.w,
            },
        }
    }

    /// Return the heading (angle to the positive X axis of the parent frame) in radians.
    ///
    /// Heading is given in the range [-pi, pi], with 0 being in the +X direction.
    pub fn get_heading(&self) -> f64 {
        self.attitude_q.euler_angles().2
    }

    /// The 2D position of the pose, discarding Z.
    pub fn position2(&self) -> Vector2<f64> {
        Vector2::new(self.position_m[0], self.position_m[1])
    }
}

impl VehicleState {
    /// Build the vehicle state from an odometry message.
    pub fn from_odom(odom: &Odometry) -> Self {
        let lin = &odom.twist.linear;
        let ang = &odom.twist.angular;

        Self {
            frame_id: odom.header.frame_id.clone(),
            pose: Pose::from_msg(&odom.pose),
            lin_vel_ms: Vector3::new(lin.x, lin.y, lin.z),
            ang_vel_rads: Vector3::new(ang.x, ang.y, ang.z),
        }
    }

    /// Speed along the vehicle's forward axis.
    pub fn forward_speed_ms(&self) -> f64 {
        self.lin_vel_ms[0]
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
