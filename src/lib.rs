//! Workspace facade crate.
//!
//! Re-exports the playback core behind the `playback` feature so a host can
//! depend on `fasola-workspace` alone instead of wiring each crate.

#[cfg(feature = "playback")]
pub use bridge_traits;
#[cfg(feature = "playback")]
pub use core_playback;
#[cfg(feature = "playback")]
pub use core_runtime;
