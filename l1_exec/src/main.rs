//! Main L1 guidance executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise all modules
//!     - Main loop, at the goal monitor rate:
//!         - Input acquisition:
//!             - Scenario script messages
//!             - Odometry from the simulation
//!         - Goal monitoring
//!         - On every second cycle, L1 control processing
//!         - Actuator command output
//!
//! # Usage
//!
//! ```text
//! l1_exec <script_path>
//! ```
//!
//! The `L1_SW_ROOT` environment variable must point at the directory holding `params/`.

// ---------------------------------------------------------------------------
// USE MODULES FROM LIBRARY
// ---------------------------------------------------------------------------

use l1_lib::{
    data_store::DataStore,
    frames::StaticFrameTransform,
    l1_ctrl::{self, GoalState},
    params::L1ExecParams,
    sim_client::SimClient,
};

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{
    eyre::{eyre, WrapErr},
    Report,
};
use log::{debug, info, warn};
use std::env;
use std::sync::mpsc::channel;
use std::thread;
use std::time::{Duration, Instant};

// Internal
use util::{
    logger::{logger_init, LevelFilter},
    module::State,
    session::{self, Session},
    script_interpreter::{PendingMsgs, ScriptInterpreter},
};

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("l1_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Debug, &session).wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("L1 Guidance Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let exec_params: L1ExecParams =
        util::params::load("l1_exec.toml").wrap_err("Could not load exec params")?;
    let ctrl_params = l1_ctrl::load_params(&exec_params.ctrl_params_file)
        .wrap_err("Could not load L1Ctrl params")?;

    info!("Exec parameters loaded");

    // Monitor runs at twice the control rate
    let cycle_period = Duration::from_secs_f64(0.5 / ctrl_params.controller_freq_hz);

    // ---- INITIALISE SCRIPT ----

    // Collect all arguments
    let args: Vec<String> = env::args().collect();

    debug!("CLI arguments: {:?}", args);

    if args.len() != 2 {
        return Err(eyre!(
            "Expected one argument (the script path), found {}",
            args.len().saturating_sub(1)
        ));
    }

    info!("Loading script from \"{}\"", &args[1]);

    let mut script = ScriptInterpreter::new(&args[1]).wrap_err("Failed to load script")?;

    info!(
        "Loaded script lasts {:.02} s and contains {} messages\n",
        script.get_duration(),
        script.get_num_msgs()
    );

    // ---- INITIALISE DATASTORE ----

    info!("Initialising modules...");

    let mut ds = DataStore::default();

    // ---- INITIALISE MODULES ----

    ds.l1_ctrl
        .init(
            l1_ctrl::InitData {
                params: ctrl_params,
                frame_tf: Box::new(StaticFrameTransform::new(&exec_params.frames)),
            },
            &session,
        )
        .wrap_err("Failed to initialise L1Ctrl")?;
    info!("L1Ctrl init complete");

    // ---- INITIALISE INPUTS ----

    let (tx, rx) = channel();

    let mut sim_client = match exec_params.sim {
        Some(ref p) => {
            let c = SimClient::new(p, tx.clone()).wrap_err("Failed to initialise SimClient")?;
            info!("SimClient initialised");
            Some(c)
        }
        None => {
            info!("No simulation configured, odometry must come from the script");
            None
        }
    };

    info!("Module initialisation complete\n");

    // ---- MAIN LOOP ----

    info!("Begining main loop\n");

    loop {
        // Get cycle start time
        let cycle_start_instant = Instant::now();

        // Clear items that need wiping at the start of the cycle
        ds.cycle_start(session::get_elapsed_seconds());

        // ---- DATA INPUT ----

        match script.get_pending_msgs() {
            PendingMsgs::Some(msgs) => {
                for msg in msgs {
                    if tx.send(msg).is_err() {
                        warn!("Input channel closed");
                    }
                }
            }
            PendingMsgs::None => (),
            PendingMsgs::EndOfScript => {
                if !ds.script_finished {
                    info!("End of script reached");
                    ds.script_finished = true;
                }
            }
        }

        ds.drain_inputs(&rx);

        // ---- GOAL MONITOR ----

        let goal_state = ds.l1_ctrl.check_goal(ds.vehicle.as_ref());
        ds.goal_state = goal_state;

        // ---- CONTROL ----

        if ds.is_control_cycle {
            ds.l1_ctrl_input = l1_ctrl::InputData {
                vehicle: ds.vehicle.clone(),
            };

            match ds.l1_ctrl.proc(&ds.l1_ctrl_input) {
                Ok((cmd, rpt)) => {
                    ds.l1_ctrl_output = cmd;
                    ds.l1_ctrl_status_rpt = rpt;
                }
                Err(e) => {
                    warn!("Error during L1Ctrl processing: {}", e);
                    ds.l1_ctrl_output = ds.l1_ctrl.neutral_cmd();
                }
            }

            // Send the command to the vehicle
            if let Some(ref c) = sim_client {
                if let Err(e) = c.send_cmd(ds.l1_ctrl_output) {
                    warn!("SimClient error: {}", e);
                }
            }
        }

        // ---- EXIT CONDITIONS ----

        if let Some(t) = exec_params.max_run_time_s {
            if ds.sim_time_s > t {
                info!("Maximum run time of {:.02} s reached", t);
                break;
            }
        }

        if exec_params.exit_on_goal_reached
            && ds.script_finished
            && ds.goal_state == GoalState::Reached
        {
            info!("Goal reached and script finished");
            break;
        }

        // ---- CYCLE MANAGEMENT ----

        let cycle_dur = Instant::now() - cycle_start_instant;

        // Get sleep duration
        match cycle_period.checked_sub(cycle_dur) {
            Some(d) => {
                ds.num_consec_cycle_overruns = 0;
                thread::sleep(d);
            }
            None => {
                warn!(
                    "Cycle overran by {:.06} s",
                    cycle_dur.as_secs_f64() - cycle_period.as_secs_f64()
                );
                ds.num_consec_cycle_overruns += 1;
            }
        }

        // Increment cycle counter
        ds.num_cycles += 1;
    }

    // ---- SHUTDOWN ----

    if let Some(ref mut c) = sim_client {
        c.stop();
    }

    info!("End of execution");

    Ok(())
}
