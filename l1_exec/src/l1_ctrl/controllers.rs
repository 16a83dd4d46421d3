//! # Speed and steering controllers
//!
//! The steering trim is a PI controller on the steering error from the guidance law. The integral
//! is clamped to a fixed band so that a long period off the path can't wind it up without limit.
//! The longitudinal law is a plain proportional controller on the forward speed error.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Serialize;
use util::maths::clamp;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Magnitude limit of the steering integral (degree seconds)
pub const INTEGRAL_LIMIT: f64 = 40.0;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A PI controller with a clamped integral.
#[derive(Debug, Serialize, Clone)]
pub struct PiController {
    /// Proportional gain
    k_p: f64,

    /// Integral gain
    k_i: f64,

    /// Symmetric limit on the integral accumulation
    integral_limit: f64,

    /// The integral accumulation
    integral: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PiController {
    /// Create a new controller with the given gains.
    pub fn new(k_p: f64, k_i: f64, integral_limit: f64) -> Self {
        Self {
            k_p,
            k_i,
            integral_limit: integral_limit.abs(),
            integral: 0f64,
        }
    }

    /// Get the value of the controller for the given error.
    ///
    /// The error is accumulated over `dt_s` before the output is computed.
    pub fn get(&mut self, error: f64, dt_s: f64) -> f64 {
        self.integral = clamp(
            &(self.integral + error * dt_s),
            &-self.integral_limit,
            &self.integral_limit,
        );

        self.k_p * error + self.k_i * self.integral
    }

    /// The current integral accumulation.
    pub fn integral(&self) -> f64 {
        self.integral
    }

    /// Clear the integral accumulation.
    pub fn reset(&mut self) {
        self.integral = 0f64;
    }
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Longitudinal feedback term for the given cruise and measured forward speeds.
///
/// The speed command is `base_speed - gas_feedback(..)`.
pub fn gas_feedback(cruise_speed_ms: f64, measured_speed_ms: f64, gas_gain: f64) -> f64 {
    (cruise_speed_ms - measured_speed_ms) * gas_gain
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_pi_output() {
        let mut pi = PiController::new(-1.0, 0.5, INTEGRAL_LIMIT);

        // First call: integral = 10 * 0.05 = 0.5
        let out = pi.get(10.0, 0.05);
        assert!((pi.integral() - 0.5).abs() < 1e-12);
        assert!((out - (-10.0 + 0.25)).abs() < 1e-12);

        pi.reset();
        assert_eq!(pi.integral(), 0.0);
    }

    #[test]
    fn test_integral_clamped() {
        let mut pi = PiController::new(1.0, 1.0, INTEGRAL_LIMIT);

        // Pseudo random sequence of large errors and periods
        let mut seed: u64 = 12345;
        for _ in 0..10_000 {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let err = ((seed >> 33) as f64 / (1u64 << 31) as f64 - 0.5) * 400.0;
            let dt = ((seed >> 11) & 0xff) as f64 / 100.0;

            pi.get(err, dt);
            assert!(pi.integral() <= INTEGRAL_LIMIT);
            assert!(pi.integral() >= -INTEGRAL_LIMIT);
        }

        // Saturate positively then negatively
        for _ in 0..100 {
            pi.get(90.0, 0.05);
        }
        assert_eq!(pi.integral(), 40.0);
        for _ in 0..100 {
            pi.get(-90.0, 0.05);
        }
        assert_eq!(pi.integral(), -40.0);
    }

    #[test]
    fn test_gas_feedback() {
        assert_eq!(gas_feedback(1.0, 1.0, 2.0), 0.0);
        assert_eq!(gas_feedback(1.0, 0.5, 2.0), 1.0);
        assert_eq!(gas_feedback(1.0, 1.5, 2.0), -1.0);
    }
}
