//! Recorded trajectory points

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Linear and angular velocity of the vehicle.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Twist {
    /// Linear velocity
    pub linear: Vector3<f64>,

    /// Angular velocity
    pub angular: Vector3<f64>,
}

/// One sample of the recorded trajectory.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathPoint {
    pub latitude: f64,

    pub longitude: f64,

    pub altitude: f64,

    /// Heading in radians
    pub yaw: f64,

    /// Elapsed time of this sample in seconds.
    ///
    /// Within the recorded trajectory this is the time since the start of the recording. Within a
    /// [`super::Horizon`] it is the time since the first point of the horizon.
    pub time_s: f64,

    /// Recorded velocity at this sample
    pub velocity: Twist,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PathPoint {
    /// Position in the plane used for matching the vehicle against the trajectory.
    pub fn planar_position(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }

    /// Return a copy of this point with the time shifted by `dt_s` seconds.
    ///
    /// Position, heading and velocity are unchanged.
    pub fn shifted_in_time(&self, dt_s: f64) -> Self {
        Self {
            time_s: self.time_s + dt_s,
            ..*self
        }
    }
}
