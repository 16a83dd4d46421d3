//! # Target selection
//!
//! Holds the current path and goal and picks the point the vehicle steers towards each tick.
//!
//! The target is the first waypoint, in path order, which is ahead of the vehicle and at least the
//! lookahead distance away from it. Once the goal has been reached the goal itself is the target.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use comms_if::msg::{PathMsg, PoseStamped};
use log::{trace, warn};
use nalgebra::Vector2;

use crate::{
    frames::{FrameError, FrameTransform},
    geom,
    loc::Pose,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A path waypoint as received, in its own frame.
#[derive(Debug, Clone)]
pub struct Waypoint {
    pub frame_id: String,
    pub pose: Pose,
}

/// The point selected for the vehicle to steer towards.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Target {
    /// Target position in the common frame
    pub point_m: Vector2<f64>,

    /// Target position relative to the vehicle (+X forward, +Y left)
    pub local_m: Vector2<f64>,

    /// Index of the selected waypoint in the path, `None` if the target is the goal
    pub waypoint_index: Option<usize>,
}

/// The outcome of one target search.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct TargetSearch {
    /// The selected target, `None` if no waypoint qualified
    pub target: Option<Target>,

    /// Number of waypoints which could not be brought into the common frame
    pub num_skipped: usize,
}

/// Owner of the current path and goal.
#[derive(Debug, Clone)]
pub struct TargetSelector {
    /// Minimum distance from the vehicle to a selectable waypoint
    lookahead_m: f64,

    /// Frame the search is done in
    common_frame: String,

    /// Frame assumed for messages which don't state one
    planning_frame: String,

    /// Current path, in traversal order
    path: Vec<Waypoint>,

    /// Goal position in the common frame, cached on receipt
    goal_m: Option<Vector2<f64>>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TargetSelector {
    /// Create a new selector with no path and no goal.
    pub fn new(lookahead_m: f64, common_frame: &str, planning_frame: &str) -> Self {
        Self {
            lookahead_m,
            common_frame: String::from(common_frame),
            planning_frame: String::from(planning_frame),
            path: Vec::new(),
            goal_m: None,
        }
    }

    /// Replace the current path.
    ///
    /// Waypoints without a frame inherit the path's frame, or the planning frame if the path has
    /// none either.
    pub fn set_path(&mut self, path: &PathMsg) {
        let path_frame = if path.header.frame_id.is_empty() {
            self.planning_frame.as_str()
        } else {
            path.header.frame_id.as_str()
        };

        self.path = path
            .poses
            .iter()
            .map(|p| Waypoint {
                frame_id: if p.header.frame_id.is_empty() {
                    String::from(path_frame)
                } else {
                    p.header.frame_id.clone()
                },
                pose: Pose::from_msg(&p.pose),
            })
            .collect();
    }

    /// Transform a new goal into the common frame and cache it.
    ///
    /// If the transform fails the previous goal (if any) is kept and the error returned.
    pub fn set_goal(
        &mut self,
        goal: &PoseStamped,
        tf: &dyn FrameTransform,
    ) -> Result<Vector2<f64>, FrameError> {
        let frame = if goal.header.frame_id.is_empty() {
            self.planning_frame.as_str()
        } else {
            goal.header.frame_id.as_str()
        };

        let goal_pose = tf.transform_pose(&Pose::from_msg(&goal.pose), frame, &self.common_frame)?;
        let goal_m = goal_pose.position2();

        self.goal_m = Some(goal_m);

        Ok(goal_m)
    }

    /// The cached goal position in the common frame.
    pub fn goal_m(&self) -> Option<Vector2<f64>> {
        self.goal_m
    }

    /// The current path.
    pub fn path(&self) -> &[Waypoint] {
        &self.path
    }

    /// Select the target for the given vehicle pose (in the common frame).
    pub fn select_target(
        &self,
        vehicle: &Pose,
        goal_reached: bool,
        tf: &dyn FrameTransform,
    ) -> TargetSearch {
        let mut search = TargetSearch::default();

        // Once the goal is reached it is the only target
        if goal_reached {
            search.target = self.goal_m.map(|goal_m| Target {
                point_m: goal_m,
                local_m: geom::to_vehicle_local(&goal_m, vehicle),
                waypoint_index: None,
            });
            return search;
        }

        let vehicle_m = vehicle.position2();

        for (i, wp) in self.path.iter().enumerate() {
            let wp_pose = match tf.transform_pose(&wp.pose, &wp.frame_id, &self.common_frame) {
                Ok(p) => p,
                Err(e) => {
                    warn!("Skipping waypoint {}: {}", i, e);
                    search.num_skipped += 1;
                    continue;
                }
            };
            let wp_m = wp_pose.position2();

            if geom::is_ahead(&wp_m, vehicle) && geom::distance(&wp_m, &vehicle_m) >= self.lookahead_m
            {
                trace!("Selected waypoint {} at {:?}", i, wp_m);

                search.target = Some(Target {
                    point_m: wp_m,
                    local_m: geom::to_vehicle_local(&wp_m, vehicle),
                    waypoint_index: Some(i),
                });
                break;
            }
        }

        if search.target.is_none() {
            trace!("No forward waypoint in a path of {} points", self.path.len());
        }

        search
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::frames::StaticFrameTransform;

    /// Transform which fails for any pose with Y above 10 m.
    struct FailAboveY;

    impl FrameTransform for FailAboveY {
        fn transform_pose(&self, pose: &Pose, source: &str, target: &str) -> Result<Pose, FrameError> {
            if pose.position_m[1] > 10.0 {
                Err(FrameError::NoTransform(String::from(source), String::from(target)))
            } else {
                Ok(*pose)
            }
        }
    }

    fn selector(points: &[(f64, f64)], lookahead_m: f64) -> TargetSelector {
        let mut ts = TargetSelector::new(lookahead_m, "odom", "map");
        ts.set_path(&PathMsg::from_points("map", points));
        ts
    }

    fn tf() -> StaticFrameTransform {
        StaticFrameTransform::identity("map", "odom")
    }

    #[test]
    fn test_straight_path_selects_first_beyond_radius() {
        let points: Vec<(f64, f64)> = (0..40).map(|i| (i as f64 * 0.25, 0.0)).collect();
        let ts = selector(&points, 1.0);

        for k in 0..20 {
            let vehicle = Pose::new(k as f64 * 0.3, 0.05, 0.0);
            let t = ts
                .select_target(&vehicle, false, &tf())
                .target
                .unwrap();

            let idx = t.waypoint_index.unwrap();
            let dist = geom::distance(&t.point_m, &vehicle.position2());
            assert!(dist >= 1.0);

            // No earlier waypoint qualifies
            for (x, y) in &points[..idx] {
                let p = Vector2::new(*x, *y);
                assert!(
                    !geom::is_ahead(&p, &vehicle)
                        || geom::distance(&p, &vehicle.position2()) < 1.0
                );
            }
        }
    }

    #[test]
    fn test_waypoint_straight_ahead() {
        let ts = selector(&[(2.0, 0.0)], 1.0);
        let t = ts
            .select_target(&Pose::new(0.0, 0.0, 0.0), false, &tf())
            .target
            .unwrap();

        assert_eq!(t.waypoint_index, Some(0));
        assert!((t.local_m[0] - 2.0).abs() < 1e-12);
        assert!(t.local_m[1].abs() < 1e-12);
    }

    #[test]
    fn test_abeam_waypoint_rejected() {
        let ts = selector(&[(0.0, 2.0)], 1.0);
        let search = ts.select_target(&Pose::new(0.0, 0.0, 0.0), false, &tf());
        assert_eq!(search.target, None);
        assert_eq!(search.num_skipped, 0);
    }

    #[test]
    fn test_no_forward_waypoints() {
        let ts = selector(&[(-1.0, 0.0), (-2.0, 1.0), (0.5, 0.0)], 1.0);
        assert_eq!(
            ts.select_target(&Pose::new(0.0, 0.0, 0.0), false, &tf())
                .target,
            None
        );

        let empty = selector(&[], 1.0);
        assert_eq!(
            empty
                .select_target(&Pose::new(0.0, 0.0, 0.0), false, &tf())
                .target,
            None
        );
    }

    #[test]
    fn test_failed_transforms_are_skipped() {
        let ts = selector(&[(2.0, 20.0), (3.0, 15.0), (3.0, 1.0)], 1.0);
        let search = ts.select_target(&Pose::new(0.0, 0.0, 0.0), false, &FailAboveY);

        assert_eq!(search.num_skipped, 2);
        assert_eq!(search.target.unwrap().waypoint_index, Some(2));
    }

    #[test]
    fn test_path_is_replaced() {
        let mut ts = selector(&[(2.0, 0.0)], 1.0);
        ts.set_path(&PathMsg::from_points("map", &[(5.0, 0.0), (6.0, 0.0)]));
        assert_eq!(ts.path().len(), 2);

        let t = ts
            .select_target(&Pose::new(0.0, 0.0, 0.0), false, &tf())
            .target
            .unwrap();
        assert_eq!(t.point_m, Vector2::new(5.0, 0.0));
    }

    #[test]
    fn test_goal_reached_targets_goal() {
        let mut ts = selector(&[(2.0, 0.0)], 1.0);
        ts.set_goal(&PoseStamped::new("map", 0.5, 0.5, 0.0), &tf())
            .unwrap();

        let t = ts
            .select_target(&Pose::new(0.0, 0.0, 0.0), true, &tf())
            .target
            .unwrap();
        assert_eq!(t.waypoint_index, None);
        assert_eq!(t.point_m, Vector2::new(0.5, 0.5));
    }

    #[test]
    fn test_failed_goal_transform_leaves_goal_unset() {
        let mut ts = selector(&[], 1.0);
        assert!(ts
            .set_goal(&PoseStamped::new("world", 1.0, 1.0, 0.0), &tf())
            .is_err());
        assert_eq!(ts.goal_m(), None);

        ts.set_goal(&PoseStamped::new("map", 1.0, 1.0, 0.0), &tf())
            .unwrap();
        assert!(ts
            .set_goal(&PoseStamped::new("world", 9.0, 9.0, 0.0), &tf())
            .is_err());
        assert_eq!(ts.goal_m(), Some(Vector2::new(1.0, 1.0)));
    }
}
