//! Frame transform parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters of the static transform between the planning and common frames.
#[derive(Deserialize, Debug, Clone)]
pub struct FrameParams {
    /// Frame paths and goals are planned in
    pub source_frame: String,

    /// Frame the controller works in
    pub target_frame: String,

    /// Position of the source frame's origin in the target frame
    pub translation_m: [f64; 2],

    /// Rotation of the source frame about +Z relative to the target frame
    pub rotation_rad: f64,
}

impl Default for FrameParams {
    fn default() -> Self {
        Self {
            source_frame: String::from("map"),
            target_frame: String::from("odom"),
            translation_m: [0.0, 0.0],
            rotation_rad: 0.0,
        }
    }
}
