//! Task spawning.

pub use tokio::task::{yield_now, JoinError, JoinHandle};

/// Spawns `future` on the ambient Tokio runtime.
///
/// The task may run on any worker thread, so both the future and its output
/// must be `Send`.
pub fn spawn<F>(future: F) -> JoinHandle<F::Output>
where
    F: std::future::Future + Send + 'static,
    F::Output: Send + 'static,
{
    tokio::task::spawn(future)
}

/// Result type for awaiting spawned tasks.
pub type Result<T> = std::result::Result<T, JoinError>;
