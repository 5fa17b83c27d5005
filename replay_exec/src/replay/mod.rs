//! # Replay planning module
//!
//! Replays a previously recorded trajectory. On each cycle the point of the recorded trajectory
//! nearest to the current pose of the vehicle is found, and a fixed length horizon of the following
//! points is produced for the motion controller to track.
//!
//! The horizon's times are relative to its first point. If the recording ends before the horizon
//! is full the last point is repeated, each copy `padding_time_step_s` later than the one before.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod horizon;
mod locate;
mod params;
mod point;
mod state;
mod store;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use horizon::*;
pub use locate::*;
pub use params::*;
pub use point::*;
pub use state::*;
pub use store::*;

use util::archive::ArchiveError;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors which can occur during a planning cycle.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlanError {
    #[error(
        "No usable trajectory is loaded ({num_points} points, at least {} required)",
        MIN_USABLE_POINTS
    )]
    NoTrajectory { num_points: usize },
}

/// Errors which can occur while initialising the replay planner.
#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("Invalid parameter {0}: {1}")]
    InvalidParam(&'static str, String),

    #[error("Could not create the replay archives: {0}")]
    ArchiveError(ArchiveError),
}
