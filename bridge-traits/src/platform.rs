//! Marker traits that keep bridge bounds in one place.
//!
//! Bridges are shared between the session actor, spawned resolver lookups and
//! whatever host thread delivers decoder or focus callbacks, so every shared
//! bridge must be `Send + Sync`. Decoders are owned by exactly one session and
//! only need `Send`.

/// `Send + Sync`, blanket-implemented.
pub trait PlatformSendSync: Send + Sync {}

impl<T> PlatformSendSync for T where T: Send + Sync {}

/// `Send`, blanket-implemented.
pub trait PlatformSend: Send {}

impl<T> PlatformSend for T where T: Send {}
