//! # L1 controller module
//!
//! Lateral and longitudinal guidance of a wheeled vehicle along a planned path to a goal using the
//! L1 (pure pursuit) law.
//!
//! Each control tick:
//!
//!  1. The target selector picks the first waypoint ahead of the vehicle and at least the lookahead
//!     distance away, or the goal itself once it has been reached.
//!  1. The guidance law turns the target into a heading error and then a steering angle.
//!  1. A PI trim loop around the base steering angle produces the steering command, and the speed
//!     command is either the base speed or idle once the goal monitor has declared arrival.
//!
//! The goal monitor runs separately at twice the control rate. If there is no goal the neutral
//! command is emitted, if there is no target point the vehicle is stopped with the wheels centred.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod controllers;
pub mod goal_monitor;
pub mod guidance;
pub mod lookahead;
pub mod markers;
pub mod params;
pub mod state;
pub mod target;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use controllers::*;
pub use goal_monitor::*;
pub use guidance::*;
pub use lookahead::*;
pub use markers::*;
pub use params::Params;
pub use state::*;
pub use target::*;
