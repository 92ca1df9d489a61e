use super::handle::SessionHandle;
use super::listeners::{self, BusForwarder, DecoderForwarder, FocusForwarder, Mailbox};
use super::{Message, PlaylistSnapshot, SessionSnapshot, SessionState};
use crate::command::Command;
use crate::config::{ErrorPolicy, PlaybackConfig};
use crate::playlist::{order_by_keys, Playlist};
use crate::presentation::{HostUiDecision, NotificationPresenter, SessionView};
use crate::song::PlaylistEntry;
use bridge_traits::error::Result as BridgeResult;
use bridge_traits::{
    DecoderEvent, DecoderFactory, DecoderListener, FocusChange, FocusListener, MediaDecoder,
    OutputArbiter, SongQuery, SongRecord, SongResolver, SongStatus,
};
use core_async::sync::{mpsc, CancellationToken};
use core_async::time::{as_millis_u64, Duration};
use core_runtime::config::CoreConfig;
use core_runtime::events::{CoreEvent, EventBus, PlaybackEvent};
use core_runtime::logging::redact_url;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// The session actor.
///
/// Created together with its [`SessionHandle`]; drive it by spawning
/// [`PlaybackSession::run`]. It exits on [`SessionHandle::shutdown`] or once
/// every handle has been dropped, stopping any active session on the way out.
pub struct PlaybackSession {
    config: PlaybackConfig,
    decoder_factory: Arc<dyn DecoderFactory>,
    arbiter: Arc<dyn OutputArbiter>,
    resolver: Arc<dyn SongResolver>,
    presenter: NotificationPresenter,
    bus: EventBus,
    inbox: mpsc::UnboundedReceiver<Message>,
    mailbox: Mailbox,
    running_flag: Arc<AtomicBool>,

    playlist: Playlist,
    running: bool,
    generation: u64,
    decoder: Option<Box<dyn MediaDecoder>>,
    loaded: Option<PlaylistEntry>,
    is_prepared: bool,
    should_play: bool,
    error_count: u32,
    focus_held: bool,
    retry: Option<CancellationToken>,
}

impl PlaybackSession {
    pub fn new(core: &CoreConfig, config: PlaybackConfig, bus: EventBus) -> (Self, SessionHandle) {
        let (sender, inbox) = mpsc::unbounded_channel();
        let running_flag = Arc::new(AtomicBool::new(false));

        let mut playlist = Playlist::new(config.skip_unplayable);
        playlist.subscribe(Arc::new(BusForwarder::new(bus.clone())));

        let session = Self {
            config,
            decoder_factory: core.decoder_factory.clone(),
            arbiter: core.output_arbiter.clone(),
            resolver: core.song_resolver.clone(),
            presenter: NotificationPresenter::new(core.foreground_service.clone()),
            bus,
            inbox,
            mailbox: sender.downgrade(),
            running_flag: running_flag.clone(),
            playlist,
            running: false,
            generation: 0,
            decoder: None,
            loaded: None,
            is_prepared: false,
            should_play: false,
            error_count: 0,
            focus_held: false,
            retry: None,
        };

        (session, SessionHandle::new(sender, running_flag))
    }

    /// Process the mailbox until shutdown.
    pub async fn run(mut self) {
        debug!("Playback session actor started");

        while let Some(message) = self.inbox.recv().await {
            if matches!(message, Message::Shutdown) {
                break;
            }
            self.handle(message);
        }

        self.stop();
        debug!("Playback session actor exited");
    }

    fn handle(&mut self, message: Message) {
        match message {
            Message::Command(command) => self.handle_command(command),
            Message::Prepare { reply } => {
                let prepared = self.prepare();
                reply.send(prepared).ok();
            }
            Message::MoveTo { position, reply } => {
                let moved = self.playlist.move_to_position(position).map(|_| ());
                reply.send(moved).ok();
            }
            Message::StartAt { position, reply } => {
                let moved = self.playlist.move_to_position(position).map(|_| ());
                if moved.is_ok() {
                    self.prepare();
                }
                reply.send(moved).ok();
            }
            Message::Snapshot { reply } => {
                reply.send(self.snapshot()).ok();
            }
            Message::Playlist { reply } => {
                reply
                    .send(PlaylistSnapshot {
                        songs: self.playlist.songs().cloned().collect(),
                        position: self.playlist.position(),
                    })
                    .ok();
            }
            Message::SetHostUiAlive(alive) => self.set_host_ui_alive(alive),
            Message::Decoder { generation, event } => self.on_decoder_event(generation, event),
            Message::Focus(change) => self.on_focus_change(change),
            Message::RetryDue { generation } => self.on_retry_due(generation),
            Message::Resolved {
                query,
                start_index,
                result,
            } => self.on_resolved(query, start_index, result),
            Message::Shutdown => {}
        }
    }

    #[instrument(level = "debug", skip_all, fields(command = command.name()))]
    fn handle_command(&mut self, command: Command) {
        match command {
            Command::PlayMedia { query, start_index } => self.resolve(query, Some(start_index)),
            Command::EnqueueMedia { query } => self.resolve(query, None),
            Command::Play => self.start(),
            Command::PlayPauseToggle => {
                if self.is_playing() {
                    self.pause();
                } else {
                    self.start();
                }
            }
            Command::Stop => self.stop(),
            _ if !self.running => debug!("No active session, ignoring"),
            Command::Pause | Command::AudioBecomingNoisy => self.pause(),
            Command::Next => {
                if self.playlist.move_to_next().is_some() {
                    self.prepare();
                } else {
                    info!("No next song, stopping");
                    self.stop();
                }
            }
            Command::Previous => {
                if self.playlist.move_to_previous().is_some() {
                    self.prepare();
                } else {
                    info!("No previous song, stopping");
                    self.stop();
                }
            }
            Command::Seek(position) => self.seek_to(position),
        }
    }

    // ========================================================================
    // Transport
    // ========================================================================

    /// Load the playlist's current song into a fresh decoder.
    ///
    /// Returns `false`, changing nothing, when there is no current song.
    fn prepare(&mut self) -> bool {
        let Some(entry) = self.playlist.current_entry().cloned() else {
            debug!("Nothing to prepare");
            return false;
        };

        self.activate();
        self.cancel_retry();
        self.release_decoder();
        self.generation += 1;
        self.should_play = true;

        let generation = self.generation;
        let lead_id = entry.song.lead_id;
        info!(lead_id, generation, title = %entry.song.name, "Preparing song");
        self.emit(PlaybackEvent::Loading {
            lead_id,
            title: entry.song.name.clone(),
        });

        let listener: Arc<dyn DecoderListener> =
            Arc::new(DecoderForwarder::new(generation, self.mailbox.clone()));
        match self.decoder_factory.create(listener) {
            Ok(mut decoder) => {
                match entry.song.url.as_deref() {
                    Some(url) => {
                        if let Err(err) = decoder.load(url) {
                            warn!(lead_id, url = %redact_url(url), error = %err, "Decoder rejected media source");
                        }
                    }
                    None => warn!(lead_id, "Song has no media locator"),
                }
                if let Err(err) = decoder.prepare_async() {
                    warn!(lead_id, error = %err, "Decoder could not start preparing");
                    self.post_decoder_error(generation);
                }
                self.decoder = Some(decoder);
            }
            Err(err) => {
                error!(lead_id, error = %err, "Decoder creation failed");
                self.post_decoder_error(generation);
            }
        }

        self.loaded = Some(entry);
        self.refresh_notification();
        true
    }

    fn start(&mut self) {
        self.should_play = true;

        if self.is_prepared {
            if !self.focus_held {
                let listener: Arc<dyn FocusListener> =
                    Arc::new(FocusForwarder::new(self.mailbox.clone()));
                self.focus_held = self.arbiter.request(listener).is_granted();
            }

            if self.focus_held {
                let started = match self.decoder.as_mut().map(|decoder| decoder.start()) {
                    Some(Ok(())) => true,
                    Some(Err(err)) => {
                        warn!(error = %err, "Decoder failed to start");
                        false
                    }
                    None => false,
                };
                if started {
                    if let Some(lead_id) = self.loaded_lead_id() {
                        self.emit(PlaybackEvent::Playing {
                            lead_id,
                            position_ms: as_millis_u64(self.elapsed()),
                        });
                    }
                }
            } else {
                info!("Audio output denied, staying paused");
            }
        } else if self.preparing_current() {
            debug!("Prepare in flight, playing once ready");
        } else {
            if self.playlist.current().is_none() {
                self.playlist.move_to_first();
            }
            self.prepare();
        }

        self.refresh_notification();
    }

    fn pause(&mut self) {
        self.should_play = false;

        if self.is_prepared {
            if let Some(Err(err)) = self.decoder.as_mut().map(|decoder| decoder.pause()) {
                warn!(error = %err, "Decoder failed to pause");
            }
            if let Some(lead_id) = self.loaded_lead_id() {
                self.emit(PlaybackEvent::Paused {
                    lead_id,
                    position_ms: as_millis_u64(self.elapsed()),
                });
            }
            self.refresh_notification();
        }
    }

    /// Tear the session down. Idempotent.
    fn stop(&mut self) {
        if !self.running {
            return;
        }

        info!(lead_id = self.loaded_lead_id(), "Stopping playback session");
        self.cancel_retry();
        self.generation += 1;

        if self.focus_held {
            self.arbiter.abandon();
            self.focus_held = false;
        }

        self.release_decoder();
        self.loaded = None;
        self.should_play = false;
        self.error_count = 0;

        if let Err(err) = self.presenter.clear() {
            warn!(error = %err, "Failed to leave the foreground");
        }

        self.running = false;
        self.running_flag.store(false, Ordering::SeqCst);
        self.emit(PlaybackEvent::Stopped);
    }

    fn seek_to(&mut self, position: Duration) {
        if !self.is_prepared {
            debug!(?position, "Seek ignored until prepared");
            return;
        }
        if let Some(Err(err)) = self.decoder.as_mut().map(|decoder| decoder.seek_to(position)) {
            warn!(?position, error = %err, "Seek failed");
        }
        self.refresh_notification();
    }

    /// Move past the loaded song: prepare the next one or stop.
    fn advance(&mut self) {
        if self.playlist.move_to_next().is_some() {
            self.prepare();
        } else {
            info!("End of playlist");
            self.stop();
        }
    }

    // ========================================================================
    // Decoder, focus and timer callbacks
    // ========================================================================

    fn on_decoder_event(&mut self, generation: u64, event: DecoderEvent) {
        if generation != self.generation {
            debug!(
                generation,
                current = self.generation,
                ?event,
                "Discarding stale decoder event"
            );
            return;
        }

        match event {
            DecoderEvent::Prepared => self.on_prepared(),
            DecoderEvent::Completed => self.on_completed(),
            DecoderEvent::Error { what, extra } => self.on_error(what, extra),
        }
    }

    fn on_prepared(&mut self) {
        self.is_prepared = true;
        self.error_count = 0;
        self.set_loaded_status(SongStatus::Ok);

        if let Some(lead_id) = self.loaded_lead_id() {
            debug!(lead_id, "Song prepared");
            self.emit(PlaybackEvent::Prepared {
                lead_id,
                duration_ms: as_millis_u64(self.duration()),
            });
        }

        if self.should_play {
            self.start();
        } else {
            self.refresh_notification();
        }
    }

    fn on_completed(&mut self) {
        self.is_prepared = false;
        if let Some(lead_id) = self.loaded_lead_id() {
            info!(lead_id, "Song completed");
            self.emit(PlaybackEvent::Completed { lead_id });
        }
        self.advance();
    }

    fn on_error(&mut self, what: i32, extra: i32) {
        self.is_prepared = false;
        self.set_loaded_status(SongStatus::Error);
        self.error_count += 1;

        let give_up = match self.config.error_policy {
            ErrorPolicy::SkipImmediately => true,
            ErrorPolicy::RetryThenSkip => self.error_count >= self.config.error_limit,
        };
        let lead_id = self.loaded_lead_id();
        self.emit(PlaybackEvent::Error {
            lead_id,
            consecutive_errors: self.error_count,
            will_retry: !give_up,
        });

        if give_up {
            warn!(lead_id, errors = self.error_count, what, extra, "Giving up on song");
            self.error_count = 0;
            self.advance();
        } else {
            debug!(lead_id, errors = self.error_count, what, extra, "Decode error, retrying");
            self.cancel_retry();
            self.retry = Some(listeners::schedule_retry(
                self.mailbox.clone(),
                self.generation,
                self.config.retry_delay,
            ));
            self.refresh_notification();
        }
    }

    fn on_retry_due(&mut self, generation: u64) {
        if generation != self.generation || self.retry.take().is_none() {
            debug!(generation, "Discarding stale retry");
            return;
        }

        if !self.prepare() {
            info!("Nothing left to retry, stopping");
            self.stop();
        }
    }

    fn on_focus_change(&mut self, change: FocusChange) {
        if !self.focus_held {
            debug!(?change, "Focus change without ownership, ignoring");
            return;
        }

        debug!(?change, "Audio focus changed");
        match change {
            FocusChange::LossTransient => self.pause(),
            FocusChange::Gain => self.start(),
            FocusChange::Loss => self.stop(),
        }
    }

    fn set_host_ui_alive(&mut self, alive: bool) {
        let paused = self.running && !self.should_play;
        match self.presenter.set_host_ui_alive(alive, paused) {
            HostUiDecision::StopSession => {
                info!("Host UI gone while paused, stopping");
                self.stop();
            }
            HostUiDecision::Rerender => self.refresh_notification(),
            HostUiDecision::Unchanged => {}
        }
    }

    // ========================================================================
    // Song lookup
    // ========================================================================

    fn resolve(&self, query: SongQuery, start_index: Option<usize>) {
        if let Some(index) = start_index {
            if index >= query.len() {
                warn!(index, keys = query.len(), "Start index outside query, ignoring");
                return;
            }
        }

        listeners::spawn_resolve(
            self.resolver.clone(),
            self.mailbox.clone(),
            query,
            start_index,
        );
    }

    fn on_resolved(
        &mut self,
        query: SongQuery,
        start_index: Option<usize>,
        result: BridgeResult<Vec<SongRecord>>,
    ) {
        let records = match result {
            Ok(records) => records,
            Err(err) => {
                warn!(keys = query.len(), error = %err, "Song lookup failed");
                return;
            }
        };

        let ordered = order_by_keys(&query, records);
        if ordered.songs.is_empty() {
            info!(keys = query.len(), "No songs matched, playlist unchanged");
            return;
        }
        debug!(
            keys = query.len(),
            resolved = ordered.songs.len(),
            play_now = start_index.is_some(),
            "Songs resolved"
        );

        match start_index {
            Some(key_index) => {
                let start = ordered.position_for_key(key_index);
                self.playlist.replace_with(ordered.songs);

                let positioned = match start {
                    Some(position) => self.playlist.move_to_position(position).is_ok(),
                    None => self.playlist.move_to_first().is_some(),
                };
                // prepare() swaps the decoder out, so only pause when nothing replaces it.
                if !positioned || !self.prepare() {
                    self.pause_if_loaded_removed();
                }
            }
            None => {
                self.playlist.add_all(ordered.songs);
                self.pause_if_loaded_removed();
            }
        }
    }

    fn pause_if_loaded_removed(&mut self) {
        let removed = self
            .loaded
            .as_ref()
            .is_some_and(|entry| !self.playlist.contains(entry.id));
        if removed {
            debug!("Loaded song left the playlist, pausing");
            self.pause();
        }
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn activate(&mut self) {
        if !self.running {
            self.running = true;
            self.running_flag.store(true, Ordering::SeqCst);
            info!("Playback session started");
        }
    }

    fn cancel_retry(&mut self) {
        if let Some(token) = self.retry.take() {
            token.cancel();
        }
    }

    fn release_decoder(&mut self) {
        if let Some(mut decoder) = self.decoder.take() {
            decoder.reset();
            decoder.release();
        }
        self.is_prepared = false;
    }

    fn post_decoder_error(&self, generation: u64) {
        listeners::post(
            &self.mailbox,
            Message::Decoder {
                generation,
                event: DecoderEvent::error(),
            },
        );
    }

    fn set_loaded_status(&mut self, status: SongStatus) {
        if let Some(entry) = self.loaded.as_mut() {
            entry.song.status = status;
            self.playlist.set_status(entry.id, status);
        }
    }

    /// A prepare for the playlist's current entry is outstanding.
    fn preparing_current(&self) -> bool {
        if self.is_prepared {
            return false;
        }
        match (self.loaded.as_ref(), self.playlist.current_entry()) {
            (Some(loaded), Some(current)) => loaded.id == current.id,
            _ => false,
        }
    }

    fn loaded_lead_id(&self) -> Option<i64> {
        self.loaded.as_ref().map(|entry| entry.song.lead_id)
    }

    fn is_playing(&self) -> bool {
        self.is_prepared
            && self
                .decoder
                .as_ref()
                .is_some_and(|decoder| decoder.is_playing())
    }

    fn duration(&self) -> Duration {
        match self.decoder.as_ref() {
            Some(decoder) if self.is_prepared => decoder.duration(),
            _ => Duration::ZERO,
        }
    }

    fn elapsed(&self) -> Duration {
        match self.decoder.as_ref() {
            Some(decoder) if self.is_prepared => decoder.current_position(),
            _ => Duration::ZERO,
        }
    }

    fn state(&self) -> SessionState {
        if !self.running {
            SessionState::Idle
        } else if self.retry.is_some() {
            SessionState::ErrorRetry
        } else if self.is_prepared {
            if self.is_playing() {
                SessionState::Playing
            } else {
                SessionState::Paused
            }
        } else if self.loaded.is_some() {
            SessionState::Preparing
        } else {
            SessionState::Idle
        }
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state(),
            running: self.running,
            is_prepared: self.is_prepared,
            should_play: self.should_play,
            is_playing: self.is_playing(),
            error_count: self.error_count,
            loaded: self.loaded.as_ref().map(|entry| entry.song.clone()),
            current: self.playlist.current().cloned(),
            position: self.playlist.position(),
            playlist_len: self.playlist.len(),
            in_foreground: self.presenter.is_foreground(),
            host_ui_alive: self.presenter.host_ui_alive(),
            duration: self.duration(),
            elapsed: self.elapsed(),
        }
    }

    fn emit(&self, event: PlaybackEvent) {
        self.bus.emit(CoreEvent::Playback(event)).ok();
    }

    fn refresh_notification(&mut self) {
        if !self.running {
            return;
        }

        let view = SessionView {
            song: self.playlist.current(),
            is_prepared: self.is_prepared,
            is_playing: self.is_playing(),
        };
        if let Err(err) = self.presenter.render(&view) {
            warn!(error = %err, "Notification update failed");
        }
    }
}
