//! Errors raised while assembling the runtime: configuration, required host
//! bridges, and the global logging subscriber.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A setting is out of range.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A host bridge the playback core cannot run without was not supplied.
    #[error("Missing host bridge {capability}: {message}")]
    CapabilityMissing { capability: String, message: String },

    /// The log filter directive did not parse.
    #[error("Invalid log filter '{filter}': {reason}")]
    LogFilter { filter: String, reason: String },

    /// A global tracing subscriber is already installed.
    #[error("Logging already initialized: {0}")]
    LoggingInstalled(String),
}

pub type Result<T> = std::result::Result<T, Error>;
