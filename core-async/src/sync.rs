//! Synchronization primitives.
//!
//! The playback session is a single-writer actor: every command, decoder
//! callback and timer expiry is funnelled through an `mpsc` mailbox, replies
//! travel back on `oneshot` channels, and pending timers are cancelled with a
//! [`CancellationToken`].
//!
//! # Examples
//!
//! ```rust
//! use core_async::sync::{mpsc, oneshot};
//!
//! async fn example() {
//!     let (tx, mut rx) = mpsc::unbounded_channel::<oneshot::Sender<u32>>();
//!     let (reply_tx, reply_rx) = oneshot::channel();
//!     tx.send(reply_tx).unwrap();
//!     rx.recv().await.unwrap().send(3).unwrap();
//!     assert_eq!(reply_rx.await.unwrap(), 3);
//! }
//! ```

pub use tokio::sync::{
    broadcast, mpsc, oneshot, watch, Mutex, MutexGuard, Notify, RwLock, RwLockReadGuard,
    RwLockWriteGuard,
};

pub use tokio_util::sync::CancellationToken;
