//! Bridge callbacks and background tasks that feed the session mailbox.
//!
//! Everything here holds a weak sender: once every [`SessionHandle`] is gone
//! the actor exits, and late callbacks are dropped instead of keeping it
//! alive.
//!
//! [`SessionHandle`]: super::SessionHandle

use super::Message;
use bridge_traits::{
    DecoderEvent, DecoderListener, FocusChange, FocusListener, SongQuery, SongResolver,
};
use core_async::sync::{mpsc, CancellationToken};
use core_async::time::{sleep, Duration};
use core_runtime::events::{CoreEvent, EventBus, PlaylistEvent};
use std::sync::Arc;
use tracing::trace;

use crate::playlist::PlaylistObserver;

pub(crate) type Mailbox = mpsc::WeakUnboundedSender<Message>;

/// Deliver `message` if the actor is still alive.
pub(crate) fn post(mailbox: &Mailbox, message: Message) -> bool {
    match mailbox.upgrade() {
        Some(sender) => sender.send(message).is_ok(),
        None => false,
    }
}

/// Decoder listener bound to one generation.
pub(crate) struct DecoderForwarder {
    generation: u64,
    mailbox: Mailbox,
}

impl DecoderForwarder {
    pub(crate) fn new(generation: u64, mailbox: Mailbox) -> Self {
        Self {
            generation,
            mailbox,
        }
    }
}

impl DecoderListener for DecoderForwarder {
    fn on_decoder_event(&self, event: DecoderEvent) {
        let generation = self.generation;
        if !post(&self.mailbox, Message::Decoder { generation, event }) {
            trace!(generation, ?event, "Session gone, dropping decoder event");
        }
    }
}

pub(crate) struct FocusForwarder {
    mailbox: Mailbox,
}

impl FocusForwarder {
    pub(crate) fn new(mailbox: Mailbox) -> Self {
        Self { mailbox }
    }
}

impl FocusListener for FocusForwarder {
    fn on_focus_change(&self, change: FocusChange) {
        if !post(&self.mailbox, Message::Focus(change)) {
            trace!(?change, "Session gone, dropping focus change");
        }
    }
}

/// Mirrors playlist mutations onto the event bus.
pub(crate) struct BusForwarder {
    bus: EventBus,
}

impl BusForwarder {
    pub(crate) fn new(bus: EventBus) -> Self {
        Self { bus }
    }
}

impl PlaylistObserver for BusForwarder {
    fn on_playlist_changed(&self, event: &PlaylistEvent) {
        self.bus.emit(CoreEvent::Playlist(event.clone())).ok();
    }
}

/// Post `RetryDue` after `delay` unless the returned token is cancelled first.
pub(crate) fn schedule_retry(mailbox: Mailbox, generation: u64, delay: Duration) -> CancellationToken {
    let token = CancellationToken::new();
    let cancelled = token.clone();

    core_async::spawn(async move {
        core_async::select! {
            _ = cancelled.cancelled() => {
                trace!(generation, "Retry cancelled");
            }
            _ = sleep(delay) => {
                post(&mailbox, Message::RetryDue { generation });
            }
        }
    });

    token
}

/// Look `query` up off the actor and post the result back.
pub(crate) fn spawn_resolve(
    resolver: Arc<dyn SongResolver>,
    mailbox: Mailbox,
    query: SongQuery,
    start_index: Option<usize>,
) {
    core_async::spawn(async move {
        let result = resolver.resolve(&query).await;
        post(
            &mailbox,
            Message::Resolved {
                query,
                start_index,
                result,
            },
        );
    });
}
