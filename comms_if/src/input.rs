//! # Controller input messages
//!
//! All updates delivered to the controller (odometry, paths and goals) travel in a single
//! `InputMsg` envelope. In JSON the envelope is an object with a `"type"` string and a
//! `"payload"` holding the message itself, for example:
//!
//! ```json
//! {"type": "GOAL", "payload": {"header": {"frame_id": "map"}, "pose": {"position": {"x": 4.0, "y": 0.0}}}}
//! ```

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::msg::{Odometry, PathMsg, PoseStamped};

// ------------------------------------------------------------------------------------------------
// STATICS
// ------------------------------------------------------------------------------------------------

static MSG_TYPES: [&str; 3] = ["ODOM", "PATH", "GOAL"];

// ------------------------------------------------------------------------------------------------
// ENUMERATIONS
// ------------------------------------------------------------------------------------------------

/// A message delivered to the controller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "payload")]
pub enum InputMsg {
    /// Pose and velocity estimate of the vehicle.
    #[serde(rename = "ODOM")]
    Odometry(Odometry),

    /// A new plan, replacing any previous one.
    #[serde(rename = "PATH")]
    Path(PathMsg),

    /// A new goal pose.
    #[serde(rename = "GOAL")]
    Goal(PoseStamped),
}

/// Possible parsing errors.
#[derive(Debug, Error)]
pub enum MsgParseError {
    #[error("Message contains invalid JSON: {0}")]
    InvalidJson(serde_json::Error),

    #[error("Message has an invalid type ({0})")]
    InvalidType(String),

    #[error("Message of type {0} is expected to have a payload but it doesn't")]
    MissingPayload(String),

    #[error("Message payload could not be read: {0}")]
    InvalidPayload(serde_json::Error),
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl InputMsg {
    /// Parse a new message from a JSON packet
    pub fn from_json(json_str: &str) -> Result<Self, MsgParseError> {
        // Parse the JSON string into a value
        let val: Value = match serde_json::from_str(json_str) {
            Ok(v) => v,
            Err(e) => return Err(MsgParseError::InvalidJson(e)),
        };

        // Check the type before handing over to serde so that the error is meaningful
        let msg_type = match val["type"].as_str() {
            Some(s) => s.to_string(),
            None => {
                return Err(MsgParseError::InvalidType(String::from(
                    "Expected \"type\" to be a string",
                )))
            }
        };

        if !MSG_TYPES.contains(&msg_type.as_str()) {
            return Err(MsgParseError::InvalidType(format!(
                "{} is not a recognised message type",
                msg_type
            )));
        }

        if val["payload"].is_null() {
            return Err(MsgParseError::MissingPayload(msg_type));
        }

        serde_json::from_value(val).map_err(MsgParseError::InvalidPayload)
    }

    /// The short name of the message type, as used in the `"type"` field.
    pub fn type_str(&self) -> &'static str {
        match self {
            InputMsg::Odometry(_) => MSG_TYPES[0],
            InputMsg::Path(_) => MSG_TYPES[1],
            InputMsg::Goal(_) => MSG_TYPES[2],
        }
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_goal() {
        let msg = InputMsg::from_json(
            r#"{"type": "GOAL", "payload": {
                "header": {"frame_id": "map"},
                "pose": {"position": {"x": 4.0, "y": -1.5}}
            }}"#,
        )
        .unwrap();

        match msg {
            InputMsg::Goal(g) => {
                assert_eq!(g.header.frame_id, "map");
                assert_eq!(g.pose.position.x, 4.0);
                assert_eq!(g.pose.position.y, -1.5);
                // Orientation was omitted so should be the identity
                assert_eq!(g.pose.orientation.w, 1.0);
            }
            m => panic!("Expected a goal, got {:?}", m),
        }
    }

    #[test]
    fn test_parse_path_keeps_order() {
        let msg = InputMsg::from_json(
            r#"{"type": "PATH", "payload": {
                "header": {"frame_id": "map"},
                "poses": [
                    {"header": {"frame_id": "map"}, "pose": {"position": {"x": 1.0, "y": 0.0}}},
                    {"header": {"frame_id": "map"}, "pose": {"position": {"x": 2.0, "y": 0.0}}},
                    {"header": {"frame_id": "map"}, "pose": {"position": {"x": 3.0, "y": 0.5}}}
                ]
            }}"#,
        )
        .unwrap();

        assert_eq!(msg.type_str(), "PATH");
        match msg {
            InputMsg::Path(p) => {
                let xs: Vec<f64> = p.poses.iter().map(|p| p.pose.position.x).collect();
                assert_eq!(xs, vec![1.0, 2.0, 3.0]);
            }
            m => panic!("Expected a path, got {:?}", m),
        }
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            InputMsg::from_json("{not json"),
            Err(MsgParseError::InvalidJson(_))
        ));
        assert!(matches!(
            InputMsg::from_json(r#"{"type": 3, "payload": {}}"#),
            Err(MsgParseError::InvalidType(_))
        ));
        assert!(matches!(
            InputMsg::from_json(r#"{"type": "TWIST", "payload": {}}"#),
            Err(MsgParseError::InvalidType(_))
        ));
        assert!(matches!(
            InputMsg::from_json(r#"{"type": "ODOM"}"#),
            Err(MsgParseError::MissingPayload(_))
        ));
        assert!(matches!(
            InputMsg::from_json(r#"{"type": "GOAL", "payload": {"pose": 1}}"#),
            Err(MsgParseError::InvalidPayload(_))
        ));
    }

    #[test]
    fn test_json_round_trip_of_odometry() {
        let odom = InputMsg::Odometry(crate::msg::Odometry {
            header: crate::msg::Header {
                frame_id: String::from("odom"),
                stamp_s: 1.25,
            },
            ..Default::default()
        });

        let json = serde_json::to_string(&odom).unwrap();
        assert!(json.contains("\"type\":\"ODOM\""));
        assert_eq!(InputMsg::from_json(&json).unwrap(), odom);
    }
}
