//! # Scenario script interpreter module
//!
//! This module provides an interpreter for scenario scripts, allowing input
//! messages (paths, goals and odometry) to be replayed into the controller at
//! scripted times.
//!
//! A script is a sequence of statements of the form `<time_s>: <json>;`,
//! where `<json>` is an `InputMsg` envelope. Lines not matching this form are
//! ignored, so comments can be written freely between statements.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use regex::RegexBuilder;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

// Internal
use crate::session::get_elapsed_seconds;
use comms_if::{InputMsg, MsgParseError};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A message which is scripted to be delivered at a specific time.
pub struct ScriptedMsg {
    /// The time the message is supposed to be delivered at
    exec_time_s: f64,

    /// The message to deliver
    msg: InputMsg,
}

/// A script interpreter.
///
/// After initialising with the path to the script to run use
/// `.get_pending_msgs` to acquire a list of messages that are due.
pub struct ScriptInterpreter {
    script_path: Option<PathBuf>,
    msgs: VecDeque<ScriptedMsg>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Could not find the script at {0:?}")]
    ScriptNotFound(PathBuf),

    #[error("Could not load the script: {0}")]
    ScriptLoadError(std::io::Error),

    #[error("The script is empty (or is so bad it can't be read)")]
    ScriptEmpty,

    #[error("Script contains an invalid timestamp: {0}. Should be a float (like 1.0)")]
    InvalidTimestamp(String),

    #[error("Script contains an invalid message at {0} s: {1}")]
    InvalidMsg(f64, MsgParseError),
}

/// The result of polling the interpreter for due messages.
pub enum PendingMsgs {
    None,
    Some(Vec<InputMsg>),
    EndOfScript,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ScriptInterpreter {
    /// Create a new interpreter from the given script path.
    pub fn new<P: AsRef<Path>>(script_path: P) -> Result<Self, ScriptError> {
        // Get the path in a buffer
        let path = PathBuf::from(script_path.as_ref());

        // Check that the script file exists.
        if !path.exists() {
            return Err(ScriptError::ScriptNotFound(path));
        }

        // Load the script into a string
        let script = fs::read_to_string(&path).map_err(ScriptError::ScriptLoadError)?;

        let mut interp = Self::from_script_str(&script)?;
        interp.script_path = Some(path);

        Ok(interp)
    }

    /// Create a new interpreter from the contents of a script.
    pub fn from_script_str(script: &str) -> Result<Self, ScriptError> {
        // Empty queue of messages
        let mut queue: Vec<ScriptedMsg> = Vec::new();

        // Go through the script executing __the magic regex__. The pattern is
        // a literal so building it cannot fail.
        let re = match RegexBuilder::new(r"^\s*(\d+(\.\d+)?)\s*:\s*([^;]*);")
            .multi_line(true)
            .build()
        {
            Ok(r) => r,
            Err(_) => return Err(ScriptError::ScriptEmpty),
        };

        for cap in re.captures_iter(script) {
            let time_str = cap.get(1).map(|m| m.as_str()).unwrap_or("");
            let json_str = cap.get(3).map(|m| m.as_str()).unwrap_or("");

            // Parse the exec time
            let exec_time_s: f64 = time_str
                .parse()
                .map_err(|e| ScriptError::InvalidTimestamp(format!("{}", e)))?;

            // Parse the message from the payload. The scripts contain JSON only.
            let msg = InputMsg::from_json(json_str)
                .map_err(|e| ScriptError::InvalidMsg(exec_time_s, e))?;

            queue.push(ScriptedMsg { exec_time_s, msg });
        }

        if queue.is_empty() {
            return Err(ScriptError::ScriptEmpty);
        }

        // Statements may be written out of order, deliver them in time order
        // while keeping the written order for equal times.
        queue.sort_by(|a, b| {
            a.exec_time_s
                .partial_cmp(&b.exec_time_s)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        Ok(ScriptInterpreter {
            script_path: None,
            msgs: queue.into_iter().collect(),
        })
    }

    /// Return the messages due at the current session time.
    pub fn get_pending_msgs(&mut self) -> PendingMsgs {
        self.get_pending_msgs_at(get_elapsed_seconds())
    }

    /// Return the messages due at or before `current_time_s`.
    pub fn get_pending_msgs_at(&mut self, current_time_s: f64) -> PendingMsgs {
        // If the queue is empty the script is over and we return the end of
        // script variant
        if self.msgs.is_empty() {
            return PendingMsgs::EndOfScript;
        }

        let mut msg_vec: Vec<InputMsg> = vec![];

        // Pop items from the queue while the head's exec time has passed
        while let Some(head) = self.msgs.front() {
            if head.exec_time_s > current_time_s {
                break;
            }
            if let Some(m) = self.msgs.pop_front() {
                msg_vec.push(m.msg);
            }
        }

        if !msg_vec.is_empty() {
            PendingMsgs::Some(msg_vec)
        } else {
            PendingMsgs::None
        }
    }

    /// Get the path the script was loaded from, if it came from a file.
    pub fn get_script_path(&self) -> Option<&Path> {
        self.script_path.as_deref()
    }

    /// Get the number of messages remaining in the script
    pub fn get_num_msgs(&self) -> usize {
        self.msgs.len()
    }

    /// Get the length of the script in seconds
    pub fn get_duration(&self) -> f64 {
        match self.msgs.back() {
            Some(c) => c.exec_time_s,
            None => 0f64,
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
