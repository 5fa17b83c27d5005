//! # Localisation module
//!
//! The pose of the vehicle as used by the replay planner. Poses are provided by the external
//! localisation system through the [`crate::pose_client::PoseClient`].

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use comms_if::msg::loc::GlobalPose;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The current pose (position and heading) of the vehicle.
///
/// Latitude and longitude are treated as planar euclidian coordinates, no geodesic projection is
/// applied.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub latitude: f64,

    pub longitude: f64,

    pub altitude: f64,

    /// Heading in radians
    pub yaw: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Pose {
    pub fn new(latitude: f64, longitude: f64, altitude: f64, yaw: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude,
            yaw,
        }
    }

    /// Position in the plane used for matching against the recorded trajectory.
    pub fn planar_position(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }
}

impl From<GlobalPose> for Pose {
    fn from(msg: GlobalPose) -> Self {
        Self {
            latitude: msg.latitude,
            longitude: msg.longitude,
            altitude: msg.altitude,
            yaw: msg.yaw,
        }
    }
}
