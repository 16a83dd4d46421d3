//! # Debug markers
//!
//! A side channel describing what the controller is doing, for plotting and debugging only. The
//! controller never reads the markers back.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::Vector2;
use serde::Serialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Markers for one control tick, all in the common frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Markers {
    /// Vehicle position, only set alongside `forward_point_m`
    pub vehicle_m: Option<Vector2<f64>>,

    /// The selected forward point, only set while seeking the goal
    pub forward_point_m: Option<Vector2<f64>>,

    /// Goal position, set whenever a goal exists
    pub goal_m: Option<Vector2<f64>>,

    /// Radius of the goal circle
    pub goal_radius_m: f64,
}

/// Flat form of `Markers` used for CSV archives.
#[derive(Debug, Clone, Serialize)]
pub struct MarkersRecord {
    pub time_s: f64,
    pub vehicle_x_m: Option<f64>,
    pub vehicle_y_m: Option<f64>,
    pub forward_x_m: Option<f64>,
    pub forward_y_m: Option<f64>,
    pub goal_x_m: Option<f64>,
    pub goal_y_m: Option<f64>,
    pub goal_radius_m: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Markers {
    /// Clear the vehicle-to-target line.
    pub fn clear_line(&mut self) {
        self.vehicle_m = None;
        self.forward_point_m = None;
    }

    /// Set the vehicle-to-target line.
    pub fn set_line(&mut self, vehicle_m: Vector2<f64>, forward_point_m: Vector2<f64>) {
        self.vehicle_m = Some(vehicle_m);
        self.forward_point_m = Some(forward_point_m);
    }

    /// Flatten the markers into an archive record.
    pub fn to_record(&self, time_s: f64) -> MarkersRecord {
        MarkersRecord {
            time_s,
            vehicle_x_m: self.vehicle_m.map(|v| v[0]),
            vehicle_y_m: self.vehicle_m.map(|v| v[1]),
            forward_x_m: self.forward_point_m.map(|v| v[0]),
            forward_y_m: self.forward_point_m.map(|v| v[1]),
            goal_x_m: self.goal_m.map(|v| v[0]),
            goal_y_m: self.goal_m.map(|v| v[1]),
            goal_radius_m: self.goal_radius_m,
        }
    }
}
