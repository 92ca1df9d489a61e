//! Scripted bridges shared by the session integration tests.
//!
//! Decoders never call back on their own: each test fires `Prepared`,
//! `Completed` or `Error` through the [`DecoderProbe`] of the decoder it wants
//! to drive.

#![allow(dead_code)]

use async_trait::async_trait;
use bridge_traits::error::Result as BridgeResult;
use bridge_traits::{
    BridgeError, DecoderEvent, DecoderFactory, DecoderListener, FocusChange, FocusGrant,
    FocusListener, ForegroundService, LifecycleChangeStream, LifecycleObserver, LifecycleState,
    MediaDecoder, NavigationTarget, NotificationContent, OutputArbiter, SongQuery, SongRecord,
    SongResolver,
};
use core_async::sync::mpsc;
use core_async::time::{sleep, Duration};
use core_playback::{PlaybackConfig, PlaybackService, SessionHandle, SessionSnapshot};
use core_runtime::config::CoreConfig;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

pub const SONG_DURATION: Duration = Duration::from_secs(180);

// ============================================================================
// Decoder
// ============================================================================

#[derive(Debug, Default)]
struct ProbeState {
    url: Option<String>,
    calls: Vec<&'static str>,
    playing: bool,
    position: Duration,
    released: bool,
}

/// Test-side view of one decoder instance.
pub struct DecoderProbe {
    state: Mutex<ProbeState>,
    listener: Arc<dyn DecoderListener>,
}

impl DecoderProbe {
    pub fn fire(&self, event: DecoderEvent) {
        self.listener.on_decoder_event(event);
    }

    pub fn url(&self) -> Option<String> {
        self.state.lock().url.clone()
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.state.lock().calls.clone()
    }

    pub fn is_playing(&self) -> bool {
        self.state.lock().playing
    }

    pub fn is_released(&self) -> bool {
        self.state.lock().released
    }

    pub fn position(&self) -> Duration {
        self.state.lock().position
    }

    pub fn set_position(&self, position: Duration) {
        self.state.lock().position = position;
    }
}

struct ScriptedDecoder {
    probe: Arc<DecoderProbe>,
    fail_prepare: bool,
}

impl ScriptedDecoder {
    fn record(&self, call: &'static str) {
        self.probe.state.lock().calls.push(call);
    }
}

impl MediaDecoder for ScriptedDecoder {
    fn load(&mut self, url: &str) -> BridgeResult<()> {
        self.record("load");
        self.probe.state.lock().url = Some(url.to_string());
        Ok(())
    }

    fn prepare_async(&mut self) -> BridgeResult<()> {
        self.record("prepare_async");
        if self.fail_prepare {
            return Err(BridgeError::OperationFailed("no media source".to_string()));
        }
        Ok(())
    }

    fn start(&mut self) -> BridgeResult<()> {
        self.record("start");
        self.probe.state.lock().playing = true;
        Ok(())
    }

    fn pause(&mut self) -> BridgeResult<()> {
        self.record("pause");
        self.probe.state.lock().playing = false;
        Ok(())
    }

    fn stop(&mut self) -> BridgeResult<()> {
        self.record("stop");
        self.probe.state.lock().playing = false;
        Ok(())
    }

    fn reset(&mut self) {
        self.record("reset");
        self.probe.state.lock().playing = false;
    }

    fn release(&mut self) {
        self.record("release");
        self.probe.state.lock().released = true;
    }

    fn seek_to(&mut self, position: Duration) -> BridgeResult<()> {
        self.record("seek_to");
        self.probe.state.lock().position = position;
        Ok(())
    }

    fn duration(&self) -> Duration {
        SONG_DURATION
    }

    fn current_position(&self) -> Duration {
        self.probe.position()
    }

    fn is_playing(&self) -> bool {
        self.probe.is_playing()
    }
}

#[derive(Default)]
pub struct ScriptedDecoderFactory {
    probes: Mutex<Vec<Arc<DecoderProbe>>>,
    fail_prepare: AtomicBool,
}

impl ScriptedDecoderFactory {
    pub fn fail_prepare(&self, fail: bool) {
        self.fail_prepare.store(fail, Ordering::SeqCst);
    }

    pub fn created(&self) -> usize {
        self.probes.lock().len()
    }

    pub fn probe(&self, index: usize) -> Arc<DecoderProbe> {
        self.probes.lock()[index].clone()
    }

    pub fn latest(&self) -> Arc<DecoderProbe> {
        self.probes
            .lock()
            .last()
            .cloned()
            .expect("no decoder created yet")
    }
}

impl DecoderFactory for ScriptedDecoderFactory {
    fn create(&self, listener: Arc<dyn DecoderListener>) -> BridgeResult<Box<dyn MediaDecoder>> {
        let probe = Arc::new(DecoderProbe {
            state: Mutex::new(ProbeState::default()),
            listener,
        });
        self.probes.lock().push(probe.clone());
        Ok(Box::new(ScriptedDecoder {
            probe,
            fail_prepare: self.fail_prepare.load(Ordering::SeqCst),
        }))
    }
}

// ============================================================================
// Audio output
// ============================================================================

pub struct ScriptedArbiter {
    grant: AtomicBool,
    requests: AtomicUsize,
    abandons: AtomicUsize,
    listener: Mutex<Option<Arc<dyn FocusListener>>>,
}

impl ScriptedArbiter {
    pub fn granting() -> Self {
        Self::new(true)
    }

    pub fn denying() -> Self {
        Self::new(false)
    }

    fn new(grant: bool) -> Self {
        Self {
            grant: AtomicBool::new(grant),
            requests: AtomicUsize::new(0),
            abandons: AtomicUsize::new(0),
            listener: Mutex::new(None),
        }
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn abandons(&self) -> usize {
        self.abandons.load(Ordering::SeqCst)
    }

    /// Deliver a focus change to the current holder, if any.
    pub fn change(&self, change: FocusChange) {
        let listener = self.listener.lock().clone();
        if let Some(listener) = listener {
            listener.on_focus_change(change);
        }
    }
}

impl OutputArbiter for ScriptedArbiter {
    fn request(&self, listener: Arc<dyn FocusListener>) -> FocusGrant {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if self.grant.load(Ordering::SeqCst) {
            *self.listener.lock() = Some(listener);
            FocusGrant::Granted
        } else {
            FocusGrant::Denied
        }
    }

    fn abandon(&self) {
        self.abandons.fetch_add(1, Ordering::SeqCst);
        self.listener.lock().take();
    }
}

// ============================================================================
// Foreground service
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForegroundCall {
    Enter(NotificationContent),
    Update(NotificationContent),
    Exit,
}

#[derive(Default)]
pub struct RecordingForeground {
    calls: Mutex<Vec<ForegroundCall>>,
}

impl RecordingForeground {
    pub fn calls(&self) -> Vec<ForegroundCall> {
        self.calls.lock().clone()
    }

    pub fn enters(&self) -> usize {
        self.count(|call| matches!(call, ForegroundCall::Enter(_)))
    }

    pub fn exits(&self) -> usize {
        self.count(|call| matches!(call, ForegroundCall::Exit))
    }

    /// The most recently posted notification.
    pub fn last_posted(&self) -> Option<NotificationContent> {
        self.calls.lock().iter().rev().find_map(|call| match call {
            ForegroundCall::Enter(content) | ForegroundCall::Update(content) => {
                Some(content.clone())
            }
            ForegroundCall::Exit => None,
        })
    }

    pub fn last_navigation(&self) -> Option<NavigationTarget> {
        self.last_posted().map(|content| content.navigation)
    }

    fn count(&self, predicate: impl Fn(&ForegroundCall) -> bool) -> usize {
        self.calls.lock().iter().filter(|call| predicate(call)).count()
    }
}

impl ForegroundService for RecordingForeground {
    fn enter_foreground(&self, notification: &NotificationContent) -> BridgeResult<()> {
        self.calls
            .lock()
            .push(ForegroundCall::Enter(notification.clone()));
        Ok(())
    }

    fn update_notification(&self, notification: &NotificationContent) -> BridgeResult<()> {
        self.calls
            .lock()
            .push(ForegroundCall::Update(notification.clone()));
        Ok(())
    }

    fn exit_foreground(&self) -> BridgeResult<()> {
        self.calls.lock().push(ForegroundCall::Exit);
        Ok(())
    }
}

// ============================================================================
// Song lookup
// ============================================================================

pub fn song_url(lead_id: i64) -> String {
    format!("https://minutes.example.org/audio/{}.mp3", lead_id)
}

pub fn record(lead_id: i64) -> SongRecord {
    SongRecord {
        lead_id,
        audio_url: Some(song_url(lead_id)),
        name: format!("Song {}", lead_id),
        singing: "Benevolence Convention 2019".to_string(),
    }
}

pub fn silent_record(lead_id: i64) -> SongRecord {
    SongRecord {
        audio_url: None,
        ..record(lead_id)
    }
}

/// Answers from a fixed table, newest rows first so callers cannot rely on
/// lookup order.
pub struct TableResolver {
    records: Vec<SongRecord>,
    fail: bool,
}

impl TableResolver {
    pub fn new(records: Vec<SongRecord>) -> Self {
        Self {
            records,
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            records: Vec::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl SongResolver for TableResolver {
    async fn resolve(&self, query: &SongQuery) -> BridgeResult<Vec<SongRecord>> {
        if self.fail {
            return Err(BridgeError::OperationFailed("database locked".to_string()));
        }

        let selector = query.selector();
        let keys = query.keys();
        Ok(self
            .records
            .iter()
            .rev()
            .filter(|record| record.key(selector).is_some_and(|key| keys.contains(&key)))
            .cloned()
            .collect())
    }
}

// ============================================================================
// Host lifecycle
// ============================================================================

/// Lifecycle observer fed from the test through a channel.
pub struct ChannelLifecycle {
    initial: LifecycleState,
    changes: Mutex<Option<mpsc::UnboundedReceiver<LifecycleState>>>,
}

impl ChannelLifecycle {
    pub fn new(initial: LifecycleState) -> (Self, mpsc::UnboundedSender<LifecycleState>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (
            Self {
                initial,
                changes: Mutex::new(Some(receiver)),
            },
            sender,
        )
    }
}

struct ChannelStream(mpsc::UnboundedReceiver<LifecycleState>);

#[async_trait]
impl LifecycleChangeStream for ChannelStream {
    async fn next(&mut self) -> Option<LifecycleState> {
        self.0.recv().await
    }
}

#[async_trait]
impl LifecycleObserver for ChannelLifecycle {
    async fn get_state(&self) -> BridgeResult<LifecycleState> {
        Ok(self.initial)
    }

    async fn subscribe_changes(&self) -> BridgeResult<Box<dyn LifecycleChangeStream>> {
        let receiver = self
            .changes
            .lock()
            .take()
            .ok_or_else(|| BridgeError::OperationFailed("already subscribed".to_string()))?;
        Ok(Box::new(ChannelStream(receiver)))
    }
}

// ============================================================================
// Harness
// ============================================================================

pub struct Harness {
    pub service: PlaybackService,
    pub decoders: Arc<ScriptedDecoderFactory>,
    pub arbiter: Arc<ScriptedArbiter>,
    pub foreground: Arc<RecordingForeground>,
}

pub struct HarnessBuilder {
    records: Vec<SongRecord>,
    config: PlaybackConfig,
    arbiter: ScriptedArbiter,
    resolver: Option<TableResolver>,
    lifecycle: Option<Arc<dyn LifecycleObserver>>,
}

impl HarnessBuilder {
    pub fn config(mut self, config: PlaybackConfig) -> Self {
        self.config = config;
        self
    }

    pub fn arbiter(mut self, arbiter: ScriptedArbiter) -> Self {
        self.arbiter = arbiter;
        self
    }

    pub fn resolver(mut self, resolver: TableResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn lifecycle(mut self, observer: Arc<dyn LifecycleObserver>) -> Self {
        self.lifecycle = Some(observer);
        self
    }

    pub fn build(self) -> Harness {
        let decoders = Arc::new(ScriptedDecoderFactory::default());
        let arbiter = Arc::new(self.arbiter);
        let foreground = Arc::new(RecordingForeground::default());
        let resolver = self
            .resolver
            .unwrap_or_else(|| TableResolver::new(self.records));

        let mut core = CoreConfig::builder()
            .decoder_factory(decoders.clone())
            .output_arbiter(arbiter.clone())
            .foreground_service(foreground.clone())
            .song_resolver(Arc::new(resolver));
        if let Some(observer) = self.lifecycle {
            core = core.lifecycle_observer(observer);
        }
        let core = core.build().expect("all bridges provided");

        Harness {
            service: PlaybackService::new(core, self.config).expect("service starts"),
            decoders,
            arbiter,
            foreground,
        }
    }
}

/// Songs 1..=count, all playable. Retries fire after 1 ms.
pub fn harness(count: i64) -> HarnessBuilder {
    HarnessBuilder {
        records: (1..=count).map(record).collect(),
        config: PlaybackConfig::default().with_retry_delay(Duration::from_millis(1)),
        arbiter: ScriptedArbiter::granting(),
        resolver: None,
        lifecycle: None,
    }
}

pub fn lead_ids(ids: &[i64]) -> SongQuery {
    SongQuery::LeadIds(ids.to_vec())
}

impl Harness {
    pub fn session(&self) -> SessionHandle {
        self.service.handle()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.session().snapshot().await.expect("session alive")
    }

    pub async fn playlist_ids(&self) -> Vec<i64> {
        self.session()
            .playlist()
            .await
            .expect("session alive")
            .songs
            .iter()
            .map(|song| song.lead_id)
            .collect()
    }

    /// Wait until `count` decoders have been created and return the newest.
    pub async fn decoder(&self, count: usize) -> Arc<DecoderProbe> {
        let decoders = self.decoders.clone();
        wait_for(&format!("{} decoders", count), || decoders.created() >= count).await;
        self.decoders.probe(count - 1)
    }

    /// Wait until the playlist holds `len` songs.
    pub async fn playlist_len(&self, len: usize) {
        for _ in 0..2_000 {
            if self.snapshot().await.playlist_len == len {
                return;
            }
            sleep(Duration::from_millis(1)).await;
        }
        panic!("timed out waiting for playlist of {}", len);
    }

    /// `PlayMedia` followed by `Prepared` on the resulting decoder.
    pub async fn play_prepared(&self, ids: &[i64], start_index: usize) -> Arc<DecoderProbe> {
        let count = self.decoders.created() + 1;
        self.session()
            .play_media(lead_ids(ids), start_index)
            .expect("valid start index");
        let probe = self.decoder(count).await;
        probe.fire(DecoderEvent::Prepared);
        self.snapshot().await;
        probe
    }
}

pub async fn wait_for(what: &str, mut condition: impl FnMut() -> bool) {
    for _ in 0..2_000 {
        if condition() {
            return;
        }
        sleep(Duration::from_millis(1)).await;
    }
    panic!("timed out waiting for {}", what);
}
