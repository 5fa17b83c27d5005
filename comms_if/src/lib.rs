//! # Communications interface crate.
//!
//! Provides the network layer and the message definitions exchanged between the replay planner
//! and the rest of the driving pipeline.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Message definitions for the localisation input and the planned trajectory output
pub mod msg;

/// Network module
pub mod net;
