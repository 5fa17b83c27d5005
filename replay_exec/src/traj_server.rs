//! # Trajectory Server
//!
//! Publishes the planned horizon as a [`Lane`] for the motion controller.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use chrono::{DateTime, Utc};

use comms_if::{
    msg::planning::{Lane, Twist, Waypoint},
    net::{zmq, MonitoredSocket, MonitoredSocketError, NetParams, SocketOptions},
};
use util::maths::yaw_to_attitude_q;

use crate::replay::{Horizon, PathPoint};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Trajectory server
pub struct TrajServer {
    socket: MonitoredSocket,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum TrajServerError {
    #[error("Socket error: {0}")]
    SocketError(MonitoredSocketError),

    #[error("Could not send the trajectory: {0}")]
    SendError(zmq::Error),

    #[error("Could not serialize the trajectory: {0}")]
    SerializationError(serde_json::Error),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl TrajServer {
    /// Create a new instance of the trajectory server.
    ///
    /// This function will not block until a subscriber connects.
    pub fn new(ctx: &zmq::Context, params: &NetParams) -> Result<Self, TrajServerError> {
        let socket_options = SocketOptions {
            bind: true,
            connect_timeout: 1000,
            heartbeat_ivl: 500,
            heartbeat_ttl: 1000,
            heartbeat_timeout: 1000,
            linger: 1,
            send_timeout: 10,
            ..Default::default()
        };

        let socket = MonitoredSocket::new(ctx, zmq::PUB, socket_options, &params.traj_endpoint)
            .map_err(TrajServerError::SocketError)?;

        Ok(Self { socket })
    }

    /// Publish a lane.
    pub fn send(&mut self, lane: &Lane) -> Result<(), TrajServerError> {
        let lane_str = serde_json::to_string(lane).map_err(TrajServerError::SerializationError)?;

        self.socket
            .send(&lane_str, 0)
            .map_err(TrajServerError::SendError)
    }

    /// Returns the number of subscribers currently connected.
    pub fn num_subscribers(&self) -> usize {
        self.socket.num_peers()
    }
}

impl From<&PathPoint> for Waypoint {
    fn from(point: &PathPoint) -> Self {
        let q = yaw_to_attitude_q(point.yaw);
        let lin = &point.velocity.linear;
        let ang = &point.velocity.angular;

        Self {
            position: [point.latitude, point.longitude, point.altitude],
            orientation: [q.i, q.j, q.k, q.w],
            twist: Twist {
                linear: [lin.x, lin.y, lin.z],
                angular: [ang.x, ang.y, ang.z],
            },
            time_s: point.time_s,
        }
    }
}

/// Build the lane message for a horizon, stamped with the given time.
pub fn lane_from_horizon(horizon: &Horizon, timestamp: DateTime<Utc>) -> Lane {
    Lane {
        timestamp,
        waypoints: horizon.iter().map(Waypoint::from).collect(),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::replay::HorizonBuilder;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

    #[test]
    fn test_waypoint_from_point() {
        let mut point = PathPoint::default();
        point.latitude = 1.0;
        point.longitude = 2.0;
        point.altitude = 3.0;
        point.time_s = 0.5;
        point.velocity.linear = Vector3::new(4.0, 5.0, 6.0);
        point.velocity.angular = Vector3::new(0.1, 0.2, 0.3);

        let wp = Waypoint::from(&point);

        assert_eq!(wp.position, [1.0, 2.0, 3.0]);
        assert_eq!(wp.twist.linear, [4.0, 5.0, 6.0]);
        assert_eq!(wp.twist.angular, [0.1, 0.2, 0.3]);
        assert_eq!(wp.time_s, 0.5);

        // Zero yaw is the identity
        assert_relative_eq!(wp.orientation[0], 0.0);
        assert_relative_eq!(wp.orientation[1], 0.0);
        assert_relative_eq!(wp.orientation[2], 0.0);
        assert_relative_eq!(wp.orientation[3], 1.0);
    }

    #[test]
    fn test_waypoint_orientation_quarter_turn() {
        let mut point = PathPoint::default();
        point.yaw = FRAC_PI_2;

        let wp = Waypoint::from(&point);

        assert_relative_eq!(wp.orientation[0], 0.0);
        assert_relative_eq!(wp.orientation[1], 0.0);
        assert_relative_eq!(wp.orientation[2], FRAC_PI_4.sin(), epsilon = 1e-12);
        assert_relative_eq!(wp.orientation[3], FRAC_PI_4.cos(), epsilon = 1e-12);
    }

    #[test]
    fn test_lane_from_horizon() {
        let traj: Vec<PathPoint> = (0..3)
            .map(|i| {
                let mut p = PathPoint::default();
                p.latitude = i as f64;
                p.time_s = i as f64;
                p
            })
            .collect();

        let horizon = HorizonBuilder::new(4, 0.01).build(1, &traj);
        let now = Utc::now();
        let lane = lane_from_horizon(&horizon, now);

        assert_eq!(lane.timestamp, now);
        assert_eq!(lane.waypoints.len(), 4);
        assert_eq!(lane.waypoints[0].position[0], 1.0);
        assert_eq!(lane.waypoints[0].time_s, 0.0);
        assert_eq!(lane.waypoints[3].position[0], 2.0);
        assert_relative_eq!(lane.waypoints[3].time_s, 1.02, epsilon = 1e-9);
    }
}
