//! # Frame transforms
//!
//! The controller works in a single common frame. Paths and goals arrive in the planning frame and
//! must be brought into the common frame before any geometry is done with them. The `FrameTransform`
//! trait is the interface to whatever provides those transforms, `StaticFrameTransform` is a fixed
//! rigid transform between one pair of frames.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
pub use params::FrameParams;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::debug;
use nalgebra::{Isometry2, Point2, UnitQuaternion, Vector2, Vector3};
use thiserror::Error;

use crate::loc::Pose;

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// A provider of transforms between named frames.
pub trait FrameTransform {
    /// Express `pose`, given in `source_frame`, in `target_frame`.
    fn transform_pose(
        &self,
        pose: &Pose,
        source_frame: &str,
        target_frame: &str,
    ) -> Result<Pose, FrameError>;
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors that can occur when transforming between frames.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FrameError {
    #[error("No transform is known from frame \"{0}\" to frame \"{1}\"")]
    NoTransform(String, String),

    #[error("The message has no frame ID")]
    MissingFrameId,
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A fixed transform between two frames.
#[derive(Debug, Clone)]
pub struct StaticFrameTransform {
    source_frame: String,
    target_frame: String,

    /// Maps coordinates in the source frame to coordinates in the target frame
    source_to_target: Isometry2<f64>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl StaticFrameTransform {
    /// Create a new transform from the parameters.
    pub fn new(params: &FrameParams) -> Self {
        debug!(
            "Static transform {} -> {}: t = {:?} m, r = {} rad",
            params.source_frame, params.target_frame, params.translation_m, params.rotation_rad
        );

        Self {
            source_frame: params.source_frame.clone(),
            target_frame: params.target_frame.clone(),
            source_to_target: Isometry2::new(
                Vector2::new(params.translation_m[0], params.translation_m[1]),
                params.rotation_rad,
            ),
        }
    }

    /// The transform between the source and target frames only.
    pub fn identity(source_frame: &str, target_frame: &str) -> Self {
        Self::new(&FrameParams {
            source_frame: String::from(source_frame),
            target_frame: String::from(target_frame),
            ..Default::default()
        })
    }

    /// Find the isometry mapping `source_frame` coordinates into `target_frame` coordinates.
    fn lookup(&self, source_frame: &str, target_frame: &str) -> Result<Isometry2<f64>, FrameError> {
        if source_frame.is_empty() || target_frame.is_empty() {
            return Err(FrameError::MissingFrameId);
        }

        if source_frame == target_frame {
            Ok(Isometry2::identity())
        } else if source_frame == self.source_frame && target_frame == self.target_frame {
            Ok(self.source_to_target)
        } else if source_frame == self.target_frame && target_frame == self.source_frame {
            Ok(self.source_to_target.inverse())
        } else {
            Err(FrameError::NoTransform(
                String::from(source_frame),
                String::from(target_frame),
            ))
        }
    }
}

impl FrameTransform for StaticFrameTransform {
    fn transform_pose(
        &self,
        pose: &Pose,
        source_frame: &str,
        target_frame: &str,
    ) -> Result<Pose, FrameError> {
        let iso = self.lookup(source_frame, target_frame)?;

        let pos = iso * Point2::new(pose.position_m[0], pose.position_m[1]);
        let rot = UnitQuaternion::from_euler_angles(0.0, 0.0, iso.rotation.angle());

        Ok(Pose {
            position_m: Vector3::new(pos[0], pos[1], pose.position_m[2]),
            attitude_q: rot * pose.attitude_q,
        })
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn tf() -> StaticFrameTransform {
        StaticFrameTransform::new(&FrameParams {
            translation_m: [1.0, 2.0],
            rotation_rad: FRAC_PI_2,
            ..Default::default()
        })
    }

    #[test]
    fn test_same_frame_is_identity() {
        let pose = Pose::new(3.0, 4.0, 0.3);
        assert_eq!(tf().transform_pose(&pose, "odom", "odom").unwrap(), pose);
    }

    #[test]
    fn test_forward_and_inverse() {
        let pose = Pose::new(1.0, 0.0, 0.0);

        // Rotate by 90 deg then translate
        let odom = tf().transform_pose(&pose, "map", "odom").unwrap();
        assert!((odom.position_m[0] - 1.0).abs() < 1e-9);
        assert!((odom.position_m[1] - 3.0).abs() < 1e-9);
        assert!((odom.get_heading() - FRAC_PI_2).abs() < 1e-9);

        let map = tf().transform_pose(&odom, "odom", "map").unwrap();
        assert!((map.position_m[0] - 1.0).abs() < 1e-9);
        assert!(map.position_m[1].abs() < 1e-9);
        assert!(map.get_heading().abs() < 1e-9);
    }

    #[test]
    fn test_unknown_frames_fail() {
        let pose = Pose::default();
        assert_eq!(
            tf().transform_pose(&pose, "world", "odom"),
            Err(FrameError::NoTransform(
                String::from("world"),
                String::from("odom")
            ))
        );
        assert_eq!(
            tf().transform_pose(&pose, "", "odom"),
            Err(FrameError::MissingFrameId)
        );
    }
}
