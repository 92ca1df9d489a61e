//! Executor abstraction for the FaSoLa Minutes playback core.
//!
//! Every core crate reaches Tokio through this crate so that the playback
//! session, its timers and its channels are written against one stable
//! surface:
//!
//! - `task`: spawning the session actor and resolver lookups
//! - `time`: retry delays and instants
//! - `sync`: mailboxes, reply channels and cancellation tokens
//! - `runtime`: blocking entry points used by tests and hosts
//!
//! # Examples
//!
//! ```rust
//! use core_async::task;
//! use core_async::time::{sleep, Duration};
//!
//! async fn example() {
//!     let handle = task::spawn(async {
//!         sleep(Duration::from_millis(5)).await;
//!         7
//!     });
//!     assert_eq!(handle.await.unwrap(), 7);
//! }
//! ```

// Entry-point and test attributes, so downstream crates never name Tokio.
pub use core_async_macros::{main, test};

pub mod runtime;
pub mod sync;
pub mod task;
pub mod time;

pub use task::spawn;
/// Race futures, running the branch of the first to complete.
pub use tokio::select;
pub use time::{sleep, Duration, Instant};
