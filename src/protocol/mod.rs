//! HID protocol implementation for NZXT fan controllers.
//!
//! This module contains report constants, command builders and input
//! report decoding for the Grid and Smart2 protocol families.

pub mod commands;
pub mod model;
pub mod status;

pub use commands::*;
pub use model::*;
pub use status::*;
