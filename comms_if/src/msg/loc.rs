//! # Localisation Messages

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// The current global pose of the vehicle, published by localisation.
///
/// Each message triggers one planning cycle in the replay planner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlobalPose {
    pub latitude: f64,

    pub longitude: f64,

    pub altitude: f64,

    /// Heading of the vehicle in radians
    pub yaw: f64,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_global_pose_json() {
        let pose: GlobalPose = serde_json::from_str(
            r#"{"latitude": 1.5, "longitude": -2.0, "altitude": 0.25, "yaw": 3.0}"#
        ).unwrap();

        assert_eq!(
            pose,
            GlobalPose {
                latitude: 1.5,
                longitude: -2.0,
                altitude: 0.25,
                yaw: 3.0
            }
        );

        // Missing fields are rejected rather than defaulted
        assert!(serde_json::from_str::<GlobalPose>(r#"{"latitude": 1.5}"#).is_err());
    }
}
