//! # Core Runtime Module
//!
//! Foundational runtime infrastructure for the playback core:
//! - Logging and tracing infrastructure
//! - Bridge wiring and configuration
//! - Event bus system
//!
//! Every other core crate depends on this one for its ambient concerns; the
//! playback state machine itself lives in `core-playback`.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use error::{Error, Result};
