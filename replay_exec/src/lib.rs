//! # Replay library.
//!
//! This library allows other crates in the workspace (and the benchmarks) to access items defined
//! inside the replay executable crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Localisation module - the current pose of the vehicle
pub mod loc;

/// Replay planning module - matches the vehicle to the recorded trajectory and builds the horizon
pub mod replay;

/// Pose client - receives the current pose from localisation
pub mod pose_client;

/// Trajectory server - publishes the planned trajectory to the motion controller
pub mod traj_server;
