//! # Core Configuration Module
//!
//! Wires host bridges into the playback core.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a `CoreConfig`
//! instance that holds every bridge the playback core talks to. It enforces
//! fail-fast validation: a missing required bridge is reported at build time
//! with an actionable message instead of surfacing later as a silent no-op.
//!
//! ## Required Dependencies
//!
//! - `DecoderFactory` - creates native media decoders
//! - `OutputArbiter` - exclusive audio output (audio focus)
//! - `ForegroundService` - foreground elevation and the playback notification
//! - `SongResolver` - batch song lookup
//!
//! ## Optional Dependencies
//!
//! - `LifecycleObserver` - reports whether the host UI is alive
//! - `LoggerSink` - mirrors logs into host logging
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::CoreConfig;
//! use std::sync::Arc;
//!
//! let config = CoreConfig::builder()
//!     .decoder_factory(Arc::new(ExoDecoderFactory::new()))
//!     .output_arbiter(Arc::new(AudioFocusArbiter::new()))
//!     .foreground_service(Arc::new(PlaybackNotificationService::new()))
//!     .song_resolver(Arc::new(MinutesDatabase::open()?))
//!     .build()?;
//! ```
//!
//! ## Error Handling
//!
//! ```should_panic
//! use core_runtime::config::CoreConfig;
//!
//! // Panics: no bridges were provided
//! let config = CoreConfig::builder()
//!     .build()
//!     .expect("Should fail - missing required bridges");
//! ```

use crate::error::{Error, Result};
use crate::events::DEFAULT_EVENT_BUFFER_SIZE;
use crate::logging::LoggingConfig;
use bridge_traits::{
    DecoderFactory, ForegroundService, LifecycleObserver, LoggerSink, OutputArbiter, SongResolver,
};
use std::sync::Arc;

/// Upper bound for the event bus buffer.
const MAX_EVENT_BUFFER_SIZE: usize = 10_000;

/// Bridges and settings required by the playback core.
///
/// Use [`CoreConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct CoreConfig {
    /// Creates media decoders (required)
    pub decoder_factory: Arc<dyn DecoderFactory>,

    /// Exclusive audio output arbiter (required)
    pub output_arbiter: Arc<dyn OutputArbiter>,

    /// Foreground service and notification surface (required)
    pub foreground_service: Arc<dyn ForegroundService>,

    /// Song lookup (required)
    pub song_resolver: Arc<dyn SongResolver>,

    /// Host UI lifecycle (optional)
    pub lifecycle_observer: Option<Arc<dyn LifecycleObserver>>,

    /// Host logging sink (optional)
    pub logger_sink: Option<Arc<dyn LoggerSink>>,

    /// Capacity of the event bus channel
    pub event_buffer_size: usize,
}

impl std::fmt::Debug for CoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreConfig")
            .field("decoder_factory", &"DecoderFactory { ... }")
            .field("output_arbiter", &"OutputArbiter { ... }")
            .field("foreground_service", &"ForegroundService { ... }")
            .field("song_resolver", &"SongResolver { ... }")
            .field(
                "lifecycle_observer",
                &self
                    .lifecycle_observer
                    .as_ref()
                    .map(|_| "LifecycleObserver { ... }"),
            )
            .field(
                "logger_sink",
                &self.logger_sink.as_ref().map(|_| "LoggerSink { ... }"),
            )
            .field("event_buffer_size", &self.event_buffer_size)
            .finish()
    }
}

impl CoreConfig {
    /// Creates a new builder for constructing a `CoreConfig`.
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.event_buffer_size == 0 {
            return Err(Error::Config(
                "Event buffer size must be greater than 0".to_string(),
            ));
        }

        if self.event_buffer_size > MAX_EVENT_BUFFER_SIZE {
            return Err(Error::Config(format!(
                "Event buffer size exceeds maximum of {}",
                MAX_EVENT_BUFFER_SIZE
            )));
        }

        Ok(())
    }

    /// Default logging setup, forwarding to the host sink when one was
    /// provided.
    pub fn logging_config(&self) -> LoggingConfig {
        let config = LoggingConfig::default();
        match &self.logger_sink {
            Some(sink) => config.with_logger_sink(sink.clone()),
            None => config,
        }
    }
}

fn capability_missing(capability: &str, message: &str) -> Error {
    Error::CapabilityMissing {
        capability: capability.to_string(),
        message: message.to_string(),
    }
}

/// Builder for constructing [`CoreConfig`] instances.
#[derive(Default)]
pub struct CoreConfigBuilder {
    decoder_factory: Option<Arc<dyn DecoderFactory>>,
    output_arbiter: Option<Arc<dyn OutputArbiter>>,
    foreground_service: Option<Arc<dyn ForegroundService>>,
    song_resolver: Option<Arc<dyn SongResolver>>,
    lifecycle_observer: Option<Arc<dyn LifecycleObserver>>,
    logger_sink: Option<Arc<dyn LoggerSink>>,
    event_buffer_size: Option<usize>,
}

impl CoreConfigBuilder {
    /// Sets the decoder factory (required).
    pub fn decoder_factory(mut self, factory: Arc<dyn DecoderFactory>) -> Self {
        self.decoder_factory = Some(factory);
        self
    }

    /// Sets the audio output arbiter (required).
    pub fn output_arbiter(mut self, arbiter: Arc<dyn OutputArbiter>) -> Self {
        self.output_arbiter = Some(arbiter);
        self
    }

    /// Sets the foreground service (required).
    ///
    /// The service owns the ongoing playback notification; the core calls it
    /// only when the rendered content changes.
    pub fn foreground_service(mut self, service: Arc<dyn ForegroundService>) -> Self {
        self.foreground_service = Some(service);
        self
    }

    /// Sets the song resolver (required).
    pub fn song_resolver(mut self, resolver: Arc<dyn SongResolver>) -> Self {
        self.song_resolver = Some(resolver);
        self
    }

    /// Sets the lifecycle observer implementation (optional).
    ///
    /// Without one, the host must report UI liveness explicitly.
    pub fn lifecycle_observer(mut self, observer: Arc<dyn LifecycleObserver>) -> Self {
        self.lifecycle_observer = Some(observer);
        self
    }

    /// Sets the host logger sink (optional).
    pub fn logger_sink(mut self, sink: Arc<dyn LoggerSink>) -> Self {
        self.logger_sink = Some(sink);
        self
    }

    /// Sets the event bus capacity.
    ///
    /// Default: 100 events
    pub fn event_buffer_size(mut self, size: usize) -> Self {
        self.event_buffer_size = Some(size);
        self
    }

    /// Builds the final `CoreConfig` instance.
    ///
    /// # Errors
    ///
    /// - [`Error::CapabilityMissing`] when a required bridge was not provided
    /// - [`Error::Config`] when a setting is out of range
    pub fn build(self) -> Result<CoreConfig> {
        let decoder_factory = self.decoder_factory.ok_or_else(|| {
            capability_missing(
                "DecoderFactory",
                "A DecoderFactory is required to play audio. \
                 Android: wrap MediaPlayer. Desktop: wrap a native pipeline.",
            )
        })?;

        let output_arbiter = self.output_arbiter.ok_or_else(|| {
            capability_missing(
                "OutputArbiter",
                "An OutputArbiter is required to own the audio output. \
                 Hosts without audio focus can always grant.",
            )
        })?;

        let foreground_service = self.foreground_service.ok_or_else(|| {
            capability_missing(
                "ForegroundService",
                "A ForegroundService is required to show the playback notification.",
            )
        })?;

        let song_resolver = self.song_resolver.ok_or_else(|| {
            capability_missing(
                "SongResolver",
                "A SongResolver is required to look up songs by lead id or audio URL.",
            )
        })?;

        let config = CoreConfig {
            decoder_factory,
            output_arbiter,
            foreground_service,
            song_resolver,
            lifecycle_observer: self.lifecycle_observer,
            logger_sink: self.logger_sink,
            event_buffer_size: self.event_buffer_size.unwrap_or(DEFAULT_EVENT_BUFFER_SIZE),
        };

        config.validate()?;

        Ok(config)
    }
}
