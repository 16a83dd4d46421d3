//! Module interfaces
//!
//! The L1 controller is driven by the executable's main loop through the `State` trait: it is
//! initialised once from its parameters and frame transform, which also opens its archives in the
//! session, then `proc` is called on every control cycle with the latest vehicle estimate and
//! returns the actuator command for that cycle together with a status report.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal imports
use crate::session::Session;

// ---------------------------------------------------------------------------
// MODULE STATE
// ---------------------------------------------------------------------------

/// A cyclically processed module.
pub trait State {
    /// Parameters and collaborators needed before the first cycle
    type InitData;
    type InitError;

    /// Inputs sampled at the start of each cycle
    type InputData;
    /// Command produced by a cycle
    type OutputData;
    /// Per-cycle flags describing how the output was produced
    type StatusReport;
    type ProcError;

    /// Initialise the module and open any archive files in `session`.
    ///
    /// Replaces any previous state, so a module may be built with `Default` and initialised
    /// later.
    fn init(&mut self, init_data: Self::InitData, session: &Session)
        -> Result<(), Self::InitError>;

    /// Run one cycle.
    ///
    /// Missing or unusable inputs should be reported in the `StatusReport` and degrade the output
    /// to a safe command. `ProcError` is reserved for faults the caller must act on.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>;
}
