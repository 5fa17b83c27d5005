//! # Pose Client
//!
//! The pose client subscribes to the global pose of the vehicle published by the localisation
//! system.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use comms_if::{
    msg::loc::GlobalPose,
    net::{zmq, MonitoredSocket, MonitoredSocketError, NetParams, SocketOptions},
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// The pose client
pub struct PoseClient {
    /// Subscriber socket for the pose stream
    socket: MonitoredSocket,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum PoseClientError {
    #[error("Socket error: {0}")]
    SocketError(MonitoredSocketError),

    #[error("Could not receive a message from the localisation system: {0}")]
    RecvError(zmq::Error),

    #[error("The localisation system sent a message which was not valid UTF-8")]
    NonUtf8Message,

    #[error("Could not deserialize the pose: {0}")]
    DeserializeError(serde_json::Error),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl PoseClient {
    /// Create a new instance of the pose client.
    ///
    /// This function will not block until the publisher connects.
    pub fn new(ctx: &zmq::Context, params: &NetParams) -> Result<Self, PoseClientError> {
        let socket_options = SocketOptions {
            connect_timeout: 1000,
            heartbeat_ivl: 500,
            heartbeat_ttl: 1000,
            heartbeat_timeout: 1000,
            linger: 1,
            recv_timeout: 100,
            ..Default::default()
        };

        let socket = MonitoredSocket::new(ctx, zmq::SUB, socket_options, &params.pose_endpoint)
            .map_err(PoseClientError::SocketError)?;

        Ok(Self { socket })
    }

    /// Receive the next pose from the localisation system.
    ///
    /// Blocks for at most the receive timeout of the socket, returning `Ok(None)` if no pose
    /// arrived in that time.
    pub fn receive_pose(&mut self) -> Result<Option<GlobalPose>, PoseClientError> {
        let msg_str = match self.socket.recv_string(0) {
            Ok(Ok(s)) => s,
            Ok(Err(_)) => return Err(PoseClientError::NonUtf8Message),
            Err(zmq::Error::EAGAIN) => return Ok(None),
            Err(e) => return Err(PoseClientError::RecvError(e)),
        };

        serde_json::from_str(&msg_str)
            .map(Some)
            .map_err(PoseClientError::DeserializeError)
    }

    /// Returns true if the client is connected to a pose publisher.
    pub fn is_connected(&self) -> bool {
        self.socket.connected()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_error_messages() {
        let e = PoseClientError::RecvError(zmq::Error::EAGAIN);
        assert!(e
            .to_string()
            .starts_with("Could not receive a message from the localisation system"));

        assert_eq!(
            PoseClientError::NonUtf8Message.to_string(),
            "The localisation system sent a message which was not valid UTF-8"
        );
    }
}
