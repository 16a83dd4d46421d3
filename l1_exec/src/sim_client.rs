//! # Simulation Client
//!
//! The SimClient closes the control loop without hardware. A background thread integrates a
//! kinematic bicycle model from the latest actuator command and publishes the resulting odometry
//! into the same channel as every other controller input.
//!
//! Actuator commands are converted back to physical units using a linear calibration: the speed
//! is proportional to the command's offset from idle, and the steering angle to the command's
//! offset from the steering centre.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::Sender,
        Arc, Mutex,
    },
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

use comms_if::{
    msg::{ActuatorCmd, Header, Odometry, TwistMsg, Vector3Msg},
    InputMsg,
};
use log::{debug, info, warn};
use serde::Deserialize;

use crate::loc::Pose;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Parameters of the simulated vehicle.
#[derive(Debug, Clone, Deserialize)]
pub struct SimParams {
    /// Rate at which the model is integrated and odometry published
    pub rate_hz: f64,

    /// Wheelbase of the simulated vehicle
    pub wheelbase_m: f64,

    /// Speed command at which the vehicle is stationary
    pub idle_speed: f64,

    /// Forward speed per unit of speed command below idle
    pub speed_scale_ms: f64,

    /// Steering command for straight ahead
    pub steering_centre: f64,

    /// Wheel angle per unit of steering command above the centre, positive turns left
    pub steering_scale_rad: f64,

    /// Maximum wheel angle magnitude
    pub max_steer_rad: f64,

    /// Starting pose as [x, y, yaw]
    pub initial_pose: [f64; 3],

    /// Frame the odometry is published in
    pub odom_frame: String,
}

/// Kinematic bicycle model of the vehicle, referenced to the rear axle.
#[derive(Debug, Clone)]
pub struct BicycleModel {
    params: SimParams,
    x_m: f64,
    y_m: f64,
    yaw_rad: f64,
    speed_ms: f64,
    yaw_rate_rads: f64,
    time_s: f64,
}

pub struct SimClient {
    bg_jh: Option<JoinHandle<()>>,
    bg_run: Arc<AtomicBool>,
    cmd: Arc<Mutex<Option<ActuatorCmd>>>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum SimClientError {
    #[error("Invalid simulation parameters: {0}")]
    InvalidParams(String),

    #[error("Could not start the simulation thread: {0}")]
    ThreadSpawnError(std::io::Error),

    #[error("The command mutex is poisoned")]
    CmdMutexPoisoned,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl BicycleModel {
    pub fn new(params: SimParams) -> Result<Self, SimClientError> {
        if !(params.rate_hz > 0.0) {
            return Err(SimClientError::InvalidParams(format!(
                "rate_hz must be positive, got {}",
                params.rate_hz
            )));
        }
        if !(params.wheelbase_m > 0.0) {
            return Err(SimClientError::InvalidParams(format!(
                "wheelbase_m must be positive, got {}",
                params.wheelbase_m
            )));
        }

        let [x_m, y_m, yaw_rad] = params.initial_pose;

        Ok(Self {
            params,
            x_m,
            y_m,
            yaw_rad,
            speed_ms: 0.0,
            yaw_rate_rads: 0.0,
            time_s: 0.0,
        })
    }

    /// Advance the model by `dt_s` under the given command.
    pub fn step(&mut self, cmd: &ActuatorCmd, dt_s: f64) {
        let p = &self.params;

        self.speed_ms = (p.idle_speed - cmd.speed) * p.speed_scale_ms;
        let steer_rad = util::maths::clamp(
            &((cmd.steering - p.steering_centre) * p.steering_scale_rad),
            &-p.max_steer_rad,
            &p.max_steer_rad,
        );
        self.yaw_rate_rads = self.speed_ms * steer_rad.tan() / p.wheelbase_m;

        self.x_m += self.speed_ms * self.yaw_rad.cos() * dt_s;
        self.y_m += self.speed_ms * self.yaw_rad.sin() * dt_s;
        self.yaw_rad = util::maths::wrap_pi(self.yaw_rad + self.yaw_rate_rads * dt_s);
        self.time_s += dt_s;
    }

    pub fn pose(&self) -> Pose {
        Pose::new(self.x_m, self.y_m, self.yaw_rad)
    }

    /// Odometry message for the current state.
    pub fn odometry(&self) -> Odometry {
        Odometry {
            header: Header {
                frame_id: self.params.odom_frame.clone(),
                stamp_s: self.time_s,
            },
            pose: self.pose().to_msg(),
            twist: TwistMsg {
                linear: Vector3Msg {
                    x: self.speed_ms,
                    y: 0.0,
                    z: 0.0,
                },
                angular: Vector3Msg {
                    x: 0.0,
                    y: 0.0,
                    z: self.yaw_rate_rads,
                },
            },
        }
    }
}

impl SimClient {
    /// Start the simulation, publishing odometry into `tx`.
    ///
    /// The vehicle is held at idle until the first command is sent.
    pub fn new(params: &SimParams, tx: Sender<InputMsg>) -> Result<Self, SimClientError> {
        let model = BicycleModel::new(params.clone())?;
        let period = Duration::from_secs_f64(1.0 / params.rate_hz);
        let idle_cmd = ActuatorCmd {
            speed: params.idle_speed,
            steering: params.steering_centre,
        };

        // Create the data shared objects
        let bg_run = Arc::new(AtomicBool::new(true));
        let cmd = Arc::new(Mutex::new(None));

        // Create clones of these to pass to the bg thread
        let bg_run_clone = bg_run.clone();
        let cmd_clone = cmd.clone();

        // Start BG thread
        let bg_jh = thread::Builder::new()
            .name(String::from("sim_client"))
            .spawn(move || bg_thread(model, period, idle_cmd, tx, bg_run_clone, cmd_clone))
            .map_err(SimClientError::ThreadSpawnError)?;

        info!("SimClient started at {} Hz", params.rate_hz);

        Ok(Self {
            bg_jh: Some(bg_jh),
            bg_run,
            cmd,
        })
    }

    /// Set the command applied to the simulated vehicle.
    pub fn send_cmd(&self, cmd: ActuatorCmd) -> Result<(), SimClientError> {
        let mut c = self
            .cmd
            .lock()
            .map_err(|_| SimClientError::CmdMutexPoisoned)?;
        *c = Some(cmd);

        Ok(())
    }

    /// Stop the background thread and wait for it to finish.
    pub fn stop(&mut self) {
        self.bg_run.store(false, Ordering::Relaxed);

        if let Some(jh) = self.bg_jh.take() {
            if jh.join().is_err() {
                warn!("SimClient thread panicked");
            }
        }
    }
}

impl Drop for SimClient {
    fn drop(&mut self) {
        self.stop();
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Background thread, integrates the model and publishes odometry.
fn bg_thread(
    mut model: BicycleModel,
    period: Duration,
    idle_cmd: ActuatorCmd,
    tx: Sender<InputMsg>,
    run: Arc<AtomicBool>,
    cmd: Arc<Mutex<Option<ActuatorCmd>>>,
) {
    let mut last_step = Instant::now();

    // Publish the initial state straight away
    if tx.send(InputMsg::Odometry(model.odometry())).is_err() {
        debug!("SimClient receiver dropped before start");
        return;
    }

    // While instructed to run
    while run.load(Ordering::Relaxed) {
        thread::sleep(period);

        let c = match cmd.lock() {
            Ok(c) => (*c).unwrap_or(idle_cmd),
            Err(_) => {
                warn!("SimClient command mutex poisoned, stopping simulation");
                break;
            }
        };

        let now = Instant::now();
        model.step(&c, (now - last_step).as_secs_f64());
        last_step = now;

        if tx.send(InputMsg::Odometry(model.odometry())).is_err() {
            debug!("SimClient receiver dropped, stopping simulation");
            break;
        }
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::mpsc::channel;

    fn params() -> SimParams {
        SimParams {
            rate_hz: 50.0,
            wheelbase_m: 0.26,
            idle_speed: 1500.0,
            speed_scale_ms: 1.0 / 30.0,
            steering_centre: 90.0,
            steering_scale_rad: 1f64.to_radians(),
            max_steer_rad: 0.5,
            initial_pose: [0.0, 0.0, 0.0],
            odom_frame: String::from("odom"),
        }
    }

    #[test]
    fn test_drives_forward() {
        let mut m = BicycleModel::new(params()).unwrap();
        let cmd = ActuatorCmd {
            speed: 1470.0,
            steering: 90.0,
        };

        for _ in 0..100 {
            m.step(&cmd, 0.02);
        }

        // 1 m/s for 2 s
        let pose = m.pose();
        assert!((pose.position_m[0] - 2.0).abs() < 1e-6);
        assert!(pose.position_m[1].abs() < 1e-9);
        assert!((m.odometry().twist.linear.x - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_steering_left_turns_left() {
        let mut m = BicycleModel::new(params()).unwrap();
        let cmd = ActuatorCmd {
            speed: 1470.0,
            steering: 110.0,
        };

        for _ in 0..50 {
            m.step(&cmd, 0.02);
        }

        assert!(m.pose().get_heading() > 0.0);
        assert!(m.pose().position_m[1] > 0.0);
    }

    #[test]
    fn test_idle_stays_put() {
        let mut m = BicycleModel::new(params()).unwrap();
        m.step(
            &ActuatorCmd {
                speed: 1500.0,
                steering: 120.0,
            },
            1.0,
        );
        assert_eq!(m.pose().position2(), nalgebra::Vector2::new(0.0, 0.0));
    }

    #[test]
    fn test_invalid_params() {
        assert!(BicycleModel::new(SimParams {
            rate_hz: 0.0,
            ..params()
        })
        .is_err());
    }

    #[test]
    fn test_client_publishes_odometry() {
        let (tx, rx) = channel();
        let mut client = SimClient::new(&params(), tx).unwrap();
        client
            .send_cmd(ActuatorCmd {
                speed: 1470.0,
                steering: 90.0,
            })
            .unwrap();

        let first = rx.recv_timeout(Duration::from_secs(1)).unwrap();
        assert_eq!(first.type_str(), "ODOM");

        // Wait for a few steps then check the vehicle has moved forward
        let mut last = first;
        for _ in 0..10 {
            last = rx.recv_timeout(Duration::from_secs(1)).unwrap();
        }
        client.stop();

        match last {
            InputMsg::Odometry(o) => assert!(o.pose.position.x > 0.0),
            m => panic!("Expected odometry, got {:?}", m),
        }
    }
}
