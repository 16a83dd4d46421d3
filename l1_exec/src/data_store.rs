//! # Data Store

use comms_if::{msg::ActuatorCmd, InputMsg};
use log::{debug, error};

use crate::{
    l1_ctrl::{self, GoalState, L1Ctrl},
    loc::VehicleState,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Global data store for the executable.
#[derive(Default)]
pub struct DataStore {
    // Cycle management
    /// Number of cycles already executed
    pub num_cycles: u128,

    /// True if the control tick runs in this cycle. The cycle loop runs at the goal monitor rate,
    /// which is twice the control rate.
    pub is_control_cycle: bool,

    /// Session elapsed time at the start of the cycle
    pub sim_time_s: f64,

    /// True once the scenario script has delivered all of its messages
    pub script_finished: bool,

    // Inputs
    /// Latest vehicle estimate
    pub vehicle: Option<VehicleState>,

    /// Number of goal messages which could not be accepted
    pub num_dropped_goals: u64,

    // L1Ctrl
    pub l1_ctrl: L1Ctrl,
    pub l1_ctrl_input: l1_ctrl::InputData,
    pub l1_ctrl_output: ActuatorCmd,
    pub l1_ctrl_status_rpt: l1_ctrl::StatusReport,
    pub goal_state: GoalState,

    // Monitoring Counters
    /// Number of consecutive cycle overruns
    pub num_consec_cycle_overruns: u64,
}

// ---------------------------------------------------------------------------
// IMPLS
// ---------------------------------------------------------------------------

impl DataStore {
    /// Perform actions required at the start of a cycle.
    ///
    /// Clears those items that need clearing at the start of a cycle, and sets the control cycle
    /// flag.
    pub fn cycle_start(&mut self, time_s: f64) {
        self.is_control_cycle = self.num_cycles % 2 == 0;

        self.l1_ctrl_input = l1_ctrl::InputData::default();
        self.l1_ctrl_status_rpt = l1_ctrl::StatusReport::default();

        self.sim_time_s = time_s;
    }

    /// Apply an input message, replacing the stored entity it carries.
    pub fn handle_input(&mut self, msg: InputMsg) {
        match msg {
            InputMsg::Odometry(odom) => self.vehicle = Some(VehicleState::from_odom(&odom)),
            InputMsg::Path(path) => self.l1_ctrl.set_path(&path),
            InputMsg::Goal(goal) => {
                if let Err(e) = self.l1_ctrl.set_goal(&goal) {
                    error!("Goal dropped: {}", e);
                    self.num_dropped_goals += 1;
                }
            }
        }
    }

    /// Drain all pending messages from the receiver.
    ///
    /// Returns the number of messages applied.
    pub fn drain_inputs(&mut self, rx: &std::sync::mpsc::Receiver<InputMsg>) -> usize {
        let mut num_msgs = 0;

        for msg in rx.try_iter() {
            debug!("Input {}", msg.type_str());
            self.handle_input(msg);
            num_msgs += 1;
        }

        num_msgs
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use comms_if::msg::{Header, Odometry, PathMsg, PoseStamped};
    use std::sync::mpsc::channel;

    #[test]
    fn test_control_cycle_every_other() {
        let mut ds = DataStore::default();
        let mut flags = vec![];

        for _ in 0..6 {
            ds.cycle_start(0.0);
            flags.push(ds.is_control_cycle);
            ds.num_cycles += 1;
        }

        assert_eq!(flags, vec![true, false, true, false, true, false]);
    }

    #[test]
    fn test_latest_input_wins() {
        let (tx, rx) = channel();
        let mut ds = DataStore::default();

        for x in &[1.0, 2.0, 3.0] {
            let mut odom = Odometry {
                header: Header {
                    frame_id: String::from("odom"),
                    stamp_s: *x,
                },
                ..Default::default()
            };
            odom.pose.position.x = *x;
            tx.send(InputMsg::Odometry(odom)).unwrap();
        }
        tx.send(InputMsg::Path(PathMsg::from_points("map", &[(1.0, 0.0)])))
            .unwrap();
        tx.send(InputMsg::Goal(PoseStamped::new("map", 5.0, 0.0, 0.0)))
            .unwrap();
        tx.send(InputMsg::Goal(PoseStamped::new("nowhere", 6.0, 0.0, 0.0)))
            .unwrap();

        assert_eq!(ds.drain_inputs(&rx), 6);
        assert_eq!(ds.drain_inputs(&rx), 0);

        let v = ds.vehicle.as_ref().unwrap();
        assert_eq!(v.pose.position_m[0], 3.0);
        assert_eq!(ds.num_dropped_goals, 1);
    }
}
