//! L1 controller state

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use comms_if::msg::{ActuatorCmd, PathMsg, PoseStamped};
use log::{debug, info, warn};
use serde::Serialize;

// Internal
use super::*;
use crate::{
    frames::{FrameError, FrameTransform, StaticFrameTransform},
    loc::{Pose, VehicleState},
};
use util::{
    archive::{ArchiveError, Archived, Archiver},
    module::State,
    params,
    session::{self, Session},
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The L1 guidance controller.
pub struct L1Ctrl {
    params: Params,

    /// Source of transforms into the common frame
    frame_tf: Box<dyn FrameTransform>,

    /// Path and goal owner
    selector: TargetSelector,

    goal_monitor: GoalMonitor,

    /// Steering trim controller
    steer_ctrl: PiController,

    geometry: GuidanceGeometry,

    /// Current commanded cruise velocity, forced negative once the goal is reached
    cruise_speed_ms: f64,

    ctrl_state: ControllerState,
    markers: Markers,
    report: StatusReport,

    /// Command emitted by the last tick
    output: ActuatorCmd,

    arch_markers: Archiver,
    arch_state: Archiver,
}

/// Data needed to initialise the controller.
pub struct InitData {
    pub params: Params,
    pub frame_tf: Box<dyn FrameTransform>,
}

/// Input data for one control tick.
#[derive(Debug, Clone, Default)]
pub struct InputData {
    /// Latest vehicle estimate, `None` if no odometry has arrived yet
    pub vehicle: Option<VehicleState>,
}

/// Snapshot of the controller's internal state after a tick.
#[derive(Debug, Copy, Clone, Default, Serialize)]
pub struct ControllerState {
    pub lookahead_m: f64,
    pub eta_rad: f64,
    pub steer_err_deg: f64,
    pub integral: f64,
    pub goal_reached: bool,
    pub found_forward_point: bool,
    pub cruise_speed_ms: f64,
}

/// Status report for a control tick.
#[derive(Debug, Copy, Clone, Default, Serialize)]
pub struct StatusReport {
    /// True if a goal has been accepted
    pub goal_received: bool,

    /// True if no odometry has been received yet
    pub no_vehicle_state: bool,

    /// True if the odometry could not be brought into the common frame
    pub vehicle_frame_error: bool,

    /// True if a target point was found this tick
    pub found_forward_point: bool,

    /// Index of the selected waypoint, if the target is a waypoint
    pub waypoint_index: Option<usize>,

    /// Number of waypoints skipped due to failed transforms
    pub num_skipped_waypoints: usize,
}

/// Row of the controller state archive.
#[derive(Serialize)]
struct StateRecord {
    time_s: f64,
    speed: f64,
    steering: f64,
    eta_rad: f64,
    steer_err_deg: f64,
    integral: f64,
    goal_reached: bool,
    found_forward_point: bool,
    cruise_speed_ms: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Potential errors from the controller.
#[derive(Debug, thiserror::Error)]
pub enum L1CtrlError {
    #[error("Could not load parameters: {0}")]
    ParamLoadError(params::LoadError),

    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error("Goal could not be transformed into the common frame: {0}")]
    GoalTransformError(FrameError),

    #[error("Could not create the controller archives: {0}")]
    ArchiveInitError(ArchiveError),
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Load and validate controller parameters from the given file in the parameters directory.
pub fn load_params(param_file_path: &str) -> Result<Params, L1CtrlError> {
    let params: Params = params::load(param_file_path).map_err(L1CtrlError::ParamLoadError)?;
    params.validate().map_err(L1CtrlError::InvalidParams)?;

    Ok(params)
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for L1Ctrl {
    fn default() -> Self {
        let params = Params::default();
        let frame_tf = Box::new(StaticFrameTransform::identity(
            &params.planning_frame,
            &params.common_frame,
        ));

        Self::build(params, frame_tf)
    }
}

impl State for L1Ctrl {
    type InitData = InitData;
    type InitError = L1CtrlError;

    type InputData = InputData;
    type OutputData = ActuatorCmd;
    type StatusReport = StatusReport;
    type ProcError = L1CtrlError;

    /// Initialise the controller and open its archives in the session.
    fn init(&mut self, init_data: Self::InitData, session: &Session) -> Result<(), Self::InitError> {
        *self = Self::new(init_data.params, init_data.frame_tf)?;

        self.arch_markers =
            Archiver::from_path(session, "l1_markers.csv").map_err(L1CtrlError::ArchiveInitError)?;
        self.arch_state =
            Archiver::from_path(session, "l1_ctrl.csv").map_err(L1CtrlError::ArchiveInitError)?;

        Ok(())
    }

    /// Run one control tick.
    ///
    /// Never fails on bad inputs, every problem degrades to a stop command.
    fn proc(
        &mut self,
        input_data: &Self::InputData,
    ) -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError> {
        self.report = StatusReport::default();
        self.markers.clear_line();

        let cmd = self.tick(input_data);

        self.ctrl_state.integral = self.steer_ctrl.integral();
        self.ctrl_state.goal_reached = self.goal_monitor.is_reached();
        self.ctrl_state.cruise_speed_ms = self.cruise_speed_ms;

        self.markers.goal_m = self.selector.goal_m();

        debug!("Speed = {:.2}, steering = {:.2}", cmd.speed, cmd.steering);

        self.output = cmd;

        if self.arch_state.is_init() {
            if let Err(e) = self.write() {
                warn!("Could not write the L1 controller archives: {}", e);
            }
        }

        Ok((cmd, self.report))
    }
}

impl Archived for L1Ctrl {
    fn write(&mut self) -> Result<(), ArchiveError> {
        let time_s = session::get_elapsed_seconds();

        self.arch_markers.serialise(self.markers.to_record(time_s))?;
        self.arch_state.serialise(StateRecord {
            time_s,
            speed: self.output.speed,
            steering: self.output.steering,
            eta_rad: self.ctrl_state.eta_rad,
            steer_err_deg: self.ctrl_state.steer_err_deg,
            integral: self.ctrl_state.integral,
            goal_reached: self.ctrl_state.goal_reached,
            found_forward_point: self.ctrl_state.found_forward_point,
            cruise_speed_ms: self.ctrl_state.cruise_speed_ms,
        })?;

        Ok(())
    }
}

impl L1Ctrl {
    /// Create a controller from validated parameters.
    pub fn new(params: Params, frame_tf: Box<dyn FrameTransform>) -> Result<Self, L1CtrlError> {
        params.validate().map_err(L1CtrlError::InvalidParams)?;

        let ctrl = Self::build(params, frame_tf);

        info!("L1 controller parameters:");
        info!("    Lookahead: {:.3} m", ctrl.ctrl_state.lookahead_m);
        info!("    Goal radius: {:.3} m", ctrl.goal_monitor.goal_radius_m());
        info!("    Base speed: {}", ctrl.params.base_speed);
        info!("    Base angle: {}", ctrl.params.base_angle);
        info!("    Angle gain: {}", ctrl.params.angle_gain);
        info!("    Integral gain: {}", ctrl.params.integral_gain);

        if ctrl.params.use_gas_feedback {
            info!("    Longitudinal feedback enabled, gain {}", ctrl.params.gas_gain);
        }
        if ctrl.params.reset_integral_on_new_goal {
            info!("    Steering integral will be reset on every new goal");
        }

        Ok(ctrl)
    }

    fn build(params: Params, frame_tf: Box<dyn FrameTransform>) -> Self {
        let lookahead_m = lookahead_distance(params.cruise_speed_ms);
        let goal_radius_m = params.goal_radius_m.unwrap_or(lookahead_m);

        Self {
            frame_tf,
            selector: TargetSelector::new(lookahead_m, &params.common_frame, &params.planning_frame),
            goal_monitor: GoalMonitor::new(goal_radius_m),
            steer_ctrl: PiController::new(params.angle_gain, params.integral_gain, INTEGRAL_LIMIT),
            geometry: GuidanceGeometry {
                wheelbase_m: params.wheelbase_m,
                lookahead_m,
                front_anchor_m: params.front_anchor_m,
            },
            cruise_speed_ms: params.cruise_speed_ms,
            ctrl_state: ControllerState {
                lookahead_m,
                cruise_speed_ms: params.cruise_speed_ms,
                ..Default::default()
            },
            markers: Markers {
                goal_radius_m,
                ..Default::default()
            },
            report: StatusReport::default(),
            output: ActuatorCmd {
                speed: params.idle_speed,
                steering: params.neutral_angle,
            },
            arch_markers: Archiver::default(),
            arch_state: Archiver::default(),
            params,
        }
    }

    /// Replace the current path.
    pub fn set_path(&mut self, path: &PathMsg) {
        self.selector.set_path(path);
        debug!("New path with {} waypoints", path.poses.len());
    }

    /// Accept a new goal, transforming it into the common frame.
    ///
    /// On failure the previous goal (if any) is kept.
    pub fn set_goal(&mut self, goal: &PoseStamped) -> Result<(), L1CtrlError> {
        let goal_m = self
            .selector
            .set_goal(goal, self.frame_tf.as_ref())
            .map_err(L1CtrlError::GoalTransformError)?;

        info!("Goal received at ({:.3}, {:.3}) m", goal_m[0], goal_m[1]);

        if self.params.reset_integral_on_new_goal {
            self.steer_ctrl.reset();
            info!("Steering integral reset for the new goal");
        }

        Ok(())
    }

    /// Run the goal monitor. Should be called at twice the control rate.
    pub fn check_goal(&mut self, vehicle: Option<&VehicleState>) -> GoalState {
        let vehicle_m = match vehicle.map(|v| self.vehicle_pose(v)) {
            Some(Ok(p)) => p.position2(),
            _ => return self.goal_monitor.state(),
        };

        if self
            .goal_monitor
            .check(&vehicle_m, self.selector.goal_m().as_ref())
        {
            self.cruise_speed_ms = STOP_CRUISE_SPEED_MS;
            info!("STOP!");
        }

        self.goal_monitor.state()
    }

    /// Snapshot of the controller state after the last tick.
    pub fn ctrl_state(&self) -> ControllerState {
        self.ctrl_state
    }

    /// Markers from the last tick.
    pub fn markers(&self) -> &Markers {
        &self.markers
    }

    /// Command emitted before any goal has been received.
    pub fn neutral_cmd(&self) -> ActuatorCmd {
        ActuatorCmd {
            speed: self.params.idle_speed,
            steering: self.params.neutral_angle,
        }
    }

    /// Command emitted when there is nothing to steer towards.
    fn fail_safe_cmd(&self) -> ActuatorCmd {
        ActuatorCmd {
            speed: self.params.idle_speed,
            steering: self.params.base_angle,
        }
    }

    /// Compute the command for this tick.
    fn tick(&mut self, input_data: &InputData) -> ActuatorCmd {
        self.ctrl_state.eta_rad = 0.0;
        self.ctrl_state.steer_err_deg = 0.0;
        self.ctrl_state.found_forward_point = false;

        // Nothing to do until there's a goal
        if self.selector.goal_m().is_none() {
            return self.neutral_cmd();
        }
        self.report.goal_received = true;

        let vehicle = match input_data.vehicle {
            Some(ref v) => v,
            None => {
                self.report.no_vehicle_state = true;
                return self.fail_safe_cmd();
            }
        };

        let pose = match self.vehicle_pose(vehicle) {
            Ok(p) => p,
            Err(e) => {
                warn!("Cannot use vehicle state: {}", e);
                self.report.vehicle_frame_error = true;
                return self.fail_safe_cmd();
            }
        };

        let search = self.selector.select_target(
            &pose,
            self.goal_monitor.is_reached(),
            self.frame_tf.as_ref(),
        );
        self.report.num_skipped_waypoints = search.num_skipped;

        let target = match search.target {
            Some(t) => t,
            None => return self.fail_safe_cmd(),
        };

        self.report.found_forward_point = true;
        self.report.waypoint_index = target.waypoint_index;
        self.ctrl_state.found_forward_point = true;

        if !self.goal_monitor.is_reached() {
            self.markers.set_line(pose.position2(), target.point_m);
        }

        // Lateral
        let eta_rad = heading_error(&target.local_m);
        let steer_err_deg = steering_angle_deg(eta_rad, &self.geometry);
        let steering = self.params.base_angle
            + self
                .steer_ctrl
                .get(steer_err_deg, self.params.control_period_s());

        self.ctrl_state.eta_rad = eta_rad;
        self.ctrl_state.steer_err_deg = steer_err_deg;

        ActuatorCmd {
            speed: self.speed_cmd(vehicle),
            steering,
        }
    }

    /// Longitudinal command.
    fn speed_cmd(&self, vehicle: &VehicleState) -> f64 {
        if self.cruise_speed_ms < 0.0 {
            return self.params.idle_speed;
        }

        if self.params.use_gas_feedback {
            self.params.base_speed
                - gas_feedback(
                    self.cruise_speed_ms,
                    vehicle.forward_speed_ms(),
                    self.params.gas_gain,
                )
        } else {
            self.params.base_speed
        }
    }

    /// Vehicle pose in the common frame.
    fn vehicle_pose(&self, vehicle: &VehicleState) -> Result<Pose, FrameError> {
        if vehicle.frame_id.is_empty() || vehicle.frame_id == self.params.common_frame {
            Ok(vehicle.pose)
        } else {
            self.frame_tf
                .transform_pose(&vehicle.pose, &vehicle.frame_id, &self.params.common_frame)
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
