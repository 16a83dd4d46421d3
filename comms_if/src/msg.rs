//! # Message definitions
//!
//! Serialisable mirrors of the pose, path and odometry messages produced by localisation and
//! planning, plus the command sent to the actuator layer. Frames are identified by name only,
//! conversion between them is the job of whoever consumes the message.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Frame and time information attached to stamped messages.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Header {
    /// Name of the coordinate frame the data is expressed in (e.g. "map", "odom")
    pub frame_id: String,

    /// Time at which the data was produced, in seconds since the producer's epoch.
    #[serde(default)]
    pub stamp_s: f64,
}

/// A point in 3D space.
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PointMsg {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

/// A free vector in 3D space.
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Vector3Msg {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

/// An orientation as a quaternion.
///
/// Missing fields default to the identity rotation.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct QuaternionMsg {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

/// Position and orientation.
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PoseMsg {
    pub position: PointMsg,

    #[serde(default)]
    pub orientation: QuaternionMsg,
}

/// A pose with a header, used for goals and path waypoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PoseStamped {
    pub header: Header,
    pub pose: PoseMsg,
}

/// Linear and angular velocity.
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TwistMsg {
    /// Units: meters/second
    #[serde(default)]
    pub linear: Vector3Msg,

    /// Units: radians/second
    #[serde(default)]
    pub angular: Vector3Msg,
}

/// Pose and velocity estimate from localisation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Odometry {
    pub header: Header,
    pub pose: PoseMsg,

    #[serde(default)]
    pub twist: TwistMsg,
}

/// An ordered sequence of waypoints from the planner.
///
/// The order of `poses` is the order of traversal.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PathMsg {
    pub header: Header,
    pub poses: Vec<PoseStamped>,
}

/// Command sent to the actuator layer once per control cycle.
///
/// Units are those of the downstream actuator layer: a PWM-like speed value, and a steering angle
/// in degrees about the steering trim centre.
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ActuatorCmd {
    pub speed: f64,
    pub steering: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for QuaternionMsg {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            w: 1.0,
        }
    }
}

impl QuaternionMsg {
    /// Build a quaternion representing a pure rotation of `yaw_rad` about +Z.
    pub fn from_yaw(yaw_rad: f64) -> Self {
        let half = 0.5 * yaw_rad;
        Self {
            x: 0.0,
            y: 0.0,
            z: half.sin(),
            w: half.cos(),
        }
    }
}

impl PoseStamped {
    /// Create a planar pose in the given frame.
    pub fn new(frame_id: &str, x: f64, y: f64, yaw_rad: f64) -> Self {
        Self {
            header: Header {
                frame_id: String::from(frame_id),
                stamp_s: 0.0,
            },
            pose: PoseMsg {
                position: PointMsg { x, y, z: 0.0 },
                orientation: QuaternionMsg::from_yaw(yaw_rad),
            },
        }
    }
}

impl PathMsg {
    /// Build a path in `frame_id` from a list of (x, y) points, all with zero heading.
    pub fn from_points(frame_id: &str, points: &[(f64, f64)]) -> Self {
        Self {
            header: Header {
                frame_id: String::from(frame_id),
                stamp_s: 0.0,
            },
            poses: points
                .iter()
                .map(|&(x, y)| PoseStamped::new(frame_id, x, y, 0.0))
                .collect(),
        }
    }
}
