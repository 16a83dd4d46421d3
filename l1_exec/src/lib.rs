//! # L1 guidance library.
//!
//! This library allows other crates in the workspace (and the benchmarks) to access items defined
//! inside the L1 executable crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Data store - the per-cycle state of the executable
pub mod data_store;

/// Frame transforms - brings paths and goals into the common frame
pub mod frames;

/// Planar geometry helpers
pub mod geom;

/// L1 controller module - steers the vehicle along the path to the goal
pub mod l1_ctrl;

/// Localisation module - pose and velocity of the vehicle
pub mod loc;

/// Executable parameters
pub mod params;

/// Simulation client - kinematic bicycle model closing the loop without hardware
pub mod sim_client;
