//! # Goal monitor
//!
//! Decides when the vehicle has arrived at the goal. Arrival is terminal, once reached the monitor
//! never goes back to seeking.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::Vector2;
use serde::Serialize;

use crate::geom;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Cruise velocity commanded once the goal is reached, any negative value means stop.
pub const STOP_CRUISE_SPEED_MS: f64 = -5.0;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// State of the goal monitor.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum GoalState {
    Seeking,
    Reached,
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Goal arrival monitor.
#[derive(Debug, Clone)]
pub struct GoalMonitor {
    state: GoalState,
    goal_radius_m: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for GoalState {
    fn default() -> Self {
        GoalState::Seeking
    }
}

impl GoalMonitor {
    pub fn new(goal_radius_m: f64) -> Self {
        Self {
            state: GoalState::Seeking,
            goal_radius_m,
        }
    }

    pub fn state(&self) -> GoalState {
        self.state
    }

    pub fn is_reached(&self) -> bool {
        self.state == GoalState::Reached
    }

    pub fn goal_radius_m(&self) -> f64 {
        self.goal_radius_m
    }

    /// Update the monitor with the latest vehicle and goal positions (common frame).
    ///
    /// Returns `true` only on the tick the goal becomes reached.
    pub fn check(&mut self, vehicle_m: &Vector2<f64>, goal_m: Option<&Vector2<f64>>) -> bool {
        match (self.state, goal_m) {
            (GoalState::Seeking, Some(goal_m)) => {
                if geom::distance(vehicle_m, goal_m) < self.goal_radius_m {
                    self.state = GoalState::Reached;
                    true
                } else {
                    false
                }
            }
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
