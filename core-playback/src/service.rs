//! Playback service bootstrap.
//!
//! [`PlaybackService`] wires host bridges into a running session actor and
//! keeps it alive. Hosts hold one service for the lifetime of the process
//! and hand out [`SessionHandle`]s and [`TransportControl`]s to their UI.

use crate::config::PlaybackConfig;
use crate::error::{PlaybackError, Result};
use crate::session::{PlaybackSession, SessionHandle};
use crate::transport::TransportControl;
use bridge_traits::LifecycleObserver;
use core_async::task::JoinHandle;
use core_async::time::as_millis_u64;
use core_runtime::config::CoreConfig;
use core_runtime::events::{CoreEvent, EventBus, EventStream};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Owns the session actor and the event bus.
pub struct PlaybackService {
    handle: SessionHandle,
    events: EventBus,
    config: PlaybackConfig,
    actor: Option<JoinHandle<()>>,
    lifecycle_watch: Option<JoinHandle<()>>,
}

impl PlaybackService {
    /// Validate `config`, spawn the session actor and, when the host supplied
    /// a lifecycle observer, start following host UI liveness.
    ///
    /// Must be called from inside a Tokio runtime.
    pub fn new(core: CoreConfig, config: PlaybackConfig) -> Result<Self> {
        core.validate()?;
        config.validate()?;

        if !core_async::runtime::in_runtime() {
            return Err(PlaybackError::Internal(
                "PlaybackService must be created inside an async runtime".to_string(),
            ));
        }

        let events = EventBus::new(core.event_buffer_size);
        let (session, handle) = PlaybackSession::new(&core, config.clone(), events.clone());
        let actor = core_async::spawn(session.run());

        let mut service = Self {
            handle,
            events,
            config,
            actor: Some(actor),
            lifecycle_watch: None,
        };

        if let Some(observer) = core.lifecycle_observer.clone() {
            service.lifecycle_watch = Some(service.watch_host_lifecycle(observer));
        }

        info!(
            error_limit = service.config.error_limit,
            retry_delay_ms = as_millis_u64(service.config.retry_delay),
            policy = ?service.config.error_policy,
            "Playback service ready"
        );
        Ok(service)
    }

    pub fn handle(&self) -> SessionHandle {
        self.handle.clone()
    }

    pub fn transport(&self) -> TransportControl {
        TransportControl::new(self.handle.clone(), self.config.restart_threshold)
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn subscribe(&self) -> EventStream {
        EventStream::new(self.events.subscribe())
    }

    /// Subscribe to events matching `filter`.
    pub fn subscribe_filtered<F>(&self, filter: F) -> EventStream
    where
        F: Fn(&CoreEvent) -> bool + Send + Sync + 'static,
    {
        self.subscribe().filter(filter)
    }

    /// Report host UI liveness by hand, for hosts without a lifecycle
    /// observer.
    pub fn set_host_ui_alive(&self, alive: bool) -> Result<()> {
        self.handle.set_host_ui_alive(alive)
    }

    /// Forward `observer`'s lifecycle changes to the session until either
    /// side goes away.
    pub fn watch_host_lifecycle(&self, observer: Arc<dyn LifecycleObserver>) -> JoinHandle<()> {
        let handle = self.handle.clone();

        core_async::spawn(async move {
            match observer.get_state().await {
                Ok(state) => {
                    if handle.set_host_ui_alive(state.is_ui_alive()).is_err() {
                        return;
                    }
                }
                Err(err) => warn!(error = %err, "Could not read host lifecycle state"),
            }

            let mut changes = match observer.subscribe_changes().await {
                Ok(changes) => changes,
                Err(err) => {
                    warn!(error = %err, "Could not subscribe to host lifecycle");
                    return;
                }
            };

            while let Some(state) = changes.next().await {
                debug!(?state, "Host lifecycle changed");
                if handle.set_host_ui_alive(state.is_ui_alive()).is_err() {
                    break;
                }
            }
        })
    }

    /// Stop any session and wait for the actor to exit.
    pub async fn shutdown(mut self) -> Result<()> {
        if let Some(watch) = self.lifecycle_watch.take() {
            watch.abort();
        }

        self.handle.shutdown().ok();
        if let Some(actor) = self.actor.take() {
            actor
                .await
                .map_err(|err| PlaybackError::Internal(format!("session actor failed: {}", err)))?;
        }

        info!("Playback service shut down");
        Ok(())
    }
}

impl Drop for PlaybackService {
    fn drop(&mut self) {
        if let Some(watch) = self.lifecycle_watch.take() {
            watch.abort();
        }
    }
}
