//! # Planning Messages
//!
//! The planned trajectory published for the motion controller.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use chrono::{serde::ts_milliseconds, DateTime, Utc};
use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Linear and angular velocity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Twist {
    /// Linear velocity `[x, y, z]`
    pub linear: [f64; 3],

    /// Angular velocity `[x, y, z]`
    pub angular: [f64; 3],
}

/// A single point of the planned trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    /// Position `[x, y, z]`, this is `[latitude, longitude, altitude]` of the recorded point
    pub position: [f64; 3],

    /// Orientation quaternion `[i, j, k, w]`
    pub orientation: [f64; 4],

    /// Recorded velocity at this point
    pub twist: Twist,

    /// Time of this point relative to the first waypoint of the lane, in seconds
    pub time_s: f64,
}

/// An ordered sequence of waypoints for the controller to track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lane {
    /// UTC time at which the lane was planned
    #[serde(with = "ts_milliseconds")]
    pub timestamp: DateTime<Utc>,

    pub waypoints: Vec<Waypoint>,
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_lane_json() {
        let lane = Lane {
            timestamp: Utc.timestamp_millis(1_600_000_000_123),
            waypoints: vec![Waypoint {
                position: [1.0, 2.0, 3.0],
                orientation: [0.0, 0.0, 0.0, 1.0],
                twist: Twist {
                    linear: [1.0, 0.0, 0.0],
                    angular: [0.0, 0.0, 0.1],
                },
                time_s: 0.0,
            }],
        };

        let json = serde_json::to_string(&lane).unwrap();
        assert!(json.contains("\"timestamp\":1600000000123"));

        let decoded: Lane = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, lane);
    }
}
