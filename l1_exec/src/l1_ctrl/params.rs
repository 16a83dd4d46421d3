//! L1 controller parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;

// Internal
use super::lookahead::lookahead_distance;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the L1 controller.
///
/// Speeds are in actuator units unless stated otherwise, steering values are in degrees around the
/// steering trim centre.
#[derive(Deserialize, Debug, Clone)]
pub struct Params {
    /// Vehicle wheelbase
    #[serde(alias = "L")]
    pub wheelbase_m: f64,

    /// Distance from the front axle to the forward anchor point
    #[serde(alias = "lfw")]
    pub front_anchor_m: f64,

    /// Distance from the rear axle to the rear anchor point. Not used by the forward law.
    #[serde(alias = "lrv", default)]
    pub rear_anchor_m: f64,

    /// Rear lookahead distance. Not used by the forward law.
    #[serde(alias = "Lrv", default)]
    pub rear_lookahead_m: f64,

    /// Commanded cruise velocity, also selects the lookahead distance
    #[serde(alias = "Vcmd")]
    pub cruise_speed_ms: f64,

    /// Frequency of the control tick. The goal monitor runs at twice this rate.
    pub controller_freq_hz: f64,

    /// Proportional gain on the steering error. Its sign sets the steering direction convention.
    #[serde(alias = "Kp", alias = "AngleGain")]
    pub angle_gain: f64,

    /// Integral gain on the accumulated steering error
    #[serde(alias = "Ki")]
    pub integral_gain: f64,

    /// Gain of the longitudinal feedback law
    #[serde(alias = "GasGain")]
    pub gas_gain: f64,

    /// Speed command while driving
    pub base_speed: f64,

    /// Steering command for straight ahead driving
    pub base_angle: f64,

    /// Speed command meaning "stopped"
    pub idle_speed: f64,

    /// Steering command emitted before any goal has been received
    pub neutral_angle: f64,

    /// Goal arrival radius. If not set the lookahead distance is used.
    #[serde(default)]
    pub goal_radius_m: Option<f64>,

    /// If true the speed command follows the longitudinal feedback law instead of `base_speed`.
    #[serde(default)]
    pub use_gas_feedback: bool,

    /// If true the integral term is cleared whenever a new goal is accepted.
    #[serde(default)]
    pub reset_integral_on_new_goal: bool,

    /// Name of the frame all geometry is done in
    #[serde(default = "default_common_frame")]
    pub common_frame: String,

    /// Name of the frame paths and goals are planned in, used when a message has no frame ID
    #[serde(default = "default_planning_frame")]
    pub planning_frame: String,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Params {
    /// Check the parameters are usable, returning a description of the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.wheelbase_m > 0.0) {
            return Err(format!("wheelbase_m must be positive, got {}", self.wheelbase_m));
        }
        if !(self.front_anchor_m >= 0.0) {
            return Err(format!(
                "front_anchor_m must not be negative, got {}",
                self.front_anchor_m
            ));
        }

        // Keeps the steering law's denominator positive for any heading error
        let half_lookahead_m = lookahead_distance(self.cruise_speed_ms) / 2.0;
        if !(self.front_anchor_m < half_lookahead_m) {
            return Err(format!(
                "front_anchor_m must be less than half the lookahead ({} m), got {}",
                half_lookahead_m, self.front_anchor_m
            ));
        }
        if !(self.controller_freq_hz > 0.0) {
            return Err(format!(
                "controller_freq_hz must be positive, got {}",
                self.controller_freq_hz
            ));
        }
        if let Some(r) = self.goal_radius_m {
            if !(r > 0.0) {
                return Err(format!("goal_radius_m must be positive, got {}", r));
            }
        }
        if self.common_frame.is_empty() {
            return Err(String::from("common_frame must not be empty"));
        }

        Ok(())
    }

    /// Period of the control tick.
    pub fn control_period_s(&self) -> f64 {
        1.0 / self.controller_freq_hz
    }
}

impl Default for Params {
    fn default() -> Self {
        Self {
            wheelbase_m: 0.26,
            front_anchor_m: 0.13,
            rear_anchor_m: 10.0,
            rear_lookahead_m: 10.0,
            cruise_speed_ms: 1.0,
            controller_freq_hz: 20.0,
            angle_gain: -1.0,
            integral_gain: 0.0,
            gas_gain: 1.0,
            base_speed: 1470.0,
            base_angle: 90.0,
            idle_speed: 1500.0,
            neutral_angle: 85.0,
            goal_radius_m: None,
            use_gas_feedback: false,
            reset_integral_on_new_goal: false,
            common_frame: default_common_frame(),
            planning_frame: default_planning_frame(),
        }
    }
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

fn default_common_frame() -> String {
    String::from("odom")
}

fn default_planning_frame() -> String {
    String::from("map")
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_with_short_names() {
        let p: Params = util::params::from_str(
            r#"
            L = 0.3
            lfw = 0.1
            Vcmd = 2.0
            controller_freq_hz = 10.0
            Kp = -1.5
            Ki = 0.1
            gas_gain = 1.0
            base_speed = 1470.0
            base_angle = 90.0
            idle_speed = 1500.0
            neutral_angle = 85.0
            "#,
        )
        .unwrap();

        assert_eq!(p.wheelbase_m, 0.3);
        assert_eq!(p.front_anchor_m, 0.1);
        assert_eq!(p.cruise_speed_ms, 2.0);
        assert_eq!(p.angle_gain, -1.5);
        assert_eq!(p.integral_gain, 0.1);
        assert_eq!(p.goal_radius_m, None);
        assert!(!p.use_gas_feedback);
        assert!(!p.reset_integral_on_new_goal);
        assert_eq!(p.common_frame, "odom");
        assert_eq!(p.planning_frame, "map");
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_validate() {
        assert!(Params::default().validate().is_ok());
        assert_eq!(Params::default().control_period_s(), 0.05);

        let p = Params {
            wheelbase_m: 0.0,
            ..Default::default()
        };
        assert!(p.validate().is_err());

        let p = Params {
            controller_freq_hz: -20.0,
            ..Default::default()
        };
        assert!(p.validate().is_err());

        let p = Params {
            goal_radius_m: Some(0.0),
            ..Default::default()
        };
        assert!(p.validate().is_err());

        // Default cruise gives a 1 m lookahead
        let p = Params {
            front_anchor_m: 0.5,
            ..Default::default()
        };
        assert!(p.validate().is_err());

        let p = Params {
            front_anchor_m: 0.49,
            ..Default::default()
        };
        assert!(p.validate().is_ok());
    }
}
