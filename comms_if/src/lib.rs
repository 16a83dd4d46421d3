//! # Communications interface crate.
//!
//! Provides the messages that cross the boundary between the guidance controller and the rest of
//! the vehicle software: localisation, planning and the actuator layer.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Pose, path, odometry and actuator command message definitions
pub mod msg;

/// The envelope for messages delivered to the controller
pub mod input;

// ------------------------------------------------------------------------------------------------
// REEXPORTS
// ------------------------------------------------------------------------------------------------

pub use input::{InputMsg, MsgParseError};
