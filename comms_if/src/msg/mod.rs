//! # Message Interface
//!
//! This module defines the messages exchanged with the rest of the driving pipeline. All messages
//! are serialised as JSON strings on the wire.

// -----------------------------------------------------------------------------------------------
// MODULES
// -----------------------------------------------------------------------------------------------

pub mod loc;
pub mod planning;
