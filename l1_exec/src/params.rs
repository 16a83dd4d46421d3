//! # L1 Executable Parameters
//!
//! This module provides parameters for the L1 executable.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Deserialize;

use crate::{frames::FrameParams, sim_client::SimParams};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct L1ExecParams {
    /// Controller parameter file, relative to the parameters directory
    pub ctrl_params_file: String,

    /// Static transform from the planning frame to the common frame
    pub frames: FrameParams,

    /// If set the executable drives a simulated vehicle with these parameters
    #[serde(default)]
    pub sim: Option<SimParams>,

    /// The executable exits once this much time has passed, if set
    #[serde(default)]
    pub max_run_time_s: Option<f64>,

    /// If true the executable exits once the script has ended and the goal has been reached
    #[serde(default)]
    pub exit_on_goal_reached: bool,
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_shipped_exec_params_parse() {
        let p: L1ExecParams =
            util::params::from_str(include_str!("../../params/l1_exec.toml")).unwrap();

        assert_eq!(p.ctrl_params_file, "l1_ctrl.toml");
        assert_eq!(p.frames.source_frame, "map");
        assert_eq!(p.frames.target_frame, "odom");
        assert!(p.sim.is_some());
    }

    #[test]
    fn test_shipped_ctrl_params_parse() {
        let p: crate::l1_ctrl::Params =
            util::params::from_str(include_str!("../../params/l1_ctrl.toml")).unwrap();

        assert!(p.validate().is_ok());
        assert_eq!(p.base_speed, 1470.0);
        assert_eq!(p.base_angle, 90.0);
        assert_eq!(p.angle_gain, -1.0);
    }

    #[test]
    fn test_minimal_exec_params() {
        let p: L1ExecParams = util::params::from_str(
            r#"
            ctrl_params_file = "l1_ctrl.toml"

            [frames]
            source_frame = "map"
            target_frame = "odom"
            translation_m = [0.0, 0.0]
            rotation_rad = 0.0
            "#,
        )
        .unwrap();

        assert!(p.sim.is_none());
        assert!(p.max_run_time_s.is_none());
        assert!(!p.exit_on_goal_reached);
    }
}
