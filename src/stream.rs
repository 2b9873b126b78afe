// Copyright (c) 2025 - Cowboy AI, Inc.
//! Stream consumer
//!
//! Owns the long-lived subscription to the event feed and drives every
//! delivered event through the transcoder to the dispatcher.
//!
//! ```text
//! Idle ──run──→ Subscribing ──on_subscribed──→ Streaming ──┬──→ Cancelled
//!                    │                                     └──→ FeedFailed
//!                    └──────────────────── feed error ─────────→ FeedFailed
//! ```
//!
//! A failure to transcode one event is logged and the event skipped; the
//! session carries on. A feed failure is fatal: the consumer moves to
//! `FeedFailed` and cancels the lifetime so the host can shut down. There is
//! no reconnect at this layer.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::dispatch::Dispatcher;
use crate::errors::{BridgeError, BridgeResult};
use crate::events::ManagedObjectReference;
use crate::feed::{BatchHandler, EventBatch, EventFeed, FeedRequest};
use crate::lifetime::Lifetime;
use crate::transcoder::EventTranscoder;

/// Events requested per batch
pub const EVENTS_PER_PAGE: usize = 1;

/// Keep streaming after the backlog is exhausted
pub const TAIL: bool = true;

/// Catch up and re-subscribe on transient feed failures
pub const FORCE: bool = true;

/// Lifecycle of a stream consumer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumerState {
    Idle,
    Subscribing,
    Streaming,
    Cancelled,
    FeedFailed,
}

impl ConsumerState {
    /// Whether the consumer has stopped for good
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled | Self::FeedFailed)
    }
}

/// Bridges an event feed to a dispatcher
pub struct StreamConsumer {
    feed: Arc<dyn EventFeed>,
    transcoder: Arc<EventTranscoder>,
    dispatcher: Arc<dyn Dispatcher>,
    state: watch::Sender<ConsumerState>,
}

impl StreamConsumer {
    pub fn new(
        feed: Arc<dyn EventFeed>,
        transcoder: EventTranscoder,
        dispatcher: Arc<dyn Dispatcher>,
    ) -> Self {
        let (state, _) = watch::channel(ConsumerState::Idle);
        Self {
            feed,
            transcoder: Arc::new(transcoder),
            dispatcher,
            state,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> ConsumerState {
        *self.state.borrow()
    }

    /// Observe lifecycle transitions
    pub fn watch_state(&self) -> watch::Receiver<ConsumerState> {
        self.state.subscribe()
    }

    /// The subscription parameters used for a root scope
    pub fn request(scope: ManagedObjectReference) -> FeedRequest {
        FeedRequest {
            scope: vec![scope],
            page_size: EVENTS_PER_PAGE,
            tail: TAIL,
            force: FORCE,
        }
    }

    /// Stream events under `scope` until the lifetime ends or the feed fails
    ///
    /// Returns `Ok(())` after cancellation. On a feed failure the lifetime
    /// is cancelled and the error returned as
    /// [`BridgeError::SubscriptionFailed`].
    pub async fn run(&self, lifetime: Lifetime, scope: ManagedObjectReference) -> BridgeResult<()> {
        self.state.send_replace(ConsumerState::Subscribing);
        info!(scope = %scope, "Subscribing to vCenter event stream");

        let mut processor = BatchProcessor {
            transcoder: self.transcoder.clone(),
            dispatcher: self.dispatcher.clone(),
            lifetime: lifetime.clone(),
            state: &self.state,
        };

        let result = self
            .feed
            .subscribe(lifetime.clone(), Self::request(scope), &mut processor)
            .await;

        match result {
            Ok(()) => {
                self.state.send_replace(ConsumerState::Cancelled);
                info!("Event stream closed");
                lifetime.cancel();
                Ok(())
            }
            Err(e) => {
                self.state.send_replace(ConsumerState::FeedFailed);
                error!(error = %e, "Event stream failed");
                lifetime.cancel();
                Err(match e {
                    BridgeError::SubscriptionFailed(_) => e,
                    other => BridgeError::SubscriptionFailed(other.to_string()),
                })
            }
        }
    }
}

/// Per-subscription batch handler
struct BatchProcessor<'a> {
    transcoder: Arc<EventTranscoder>,
    dispatcher: Arc<dyn Dispatcher>,
    lifetime: Lifetime,
    state: &'a watch::Sender<ConsumerState>,
}

#[async_trait]
impl<'a> BatchHandler for BatchProcessor<'a> {
    fn on_subscribed(&mut self) {
        self.state.send_replace(ConsumerState::Streaming);
        info!("Streaming vCenter events");
    }

    async fn on_batch(&mut self, batch: EventBatch) -> BridgeResult<usize> {
        debug!(scope = %batch.scope, events = batch.events.len(), "Processing event batch");

        let mut handled = 0;
        for event in batch.events.iter() {
            if self.lifetime.is_cancelled() {
                debug!("Lifetime cancelled, dropping rest of batch");
                break;
            }

            let transcoded = tokio::select! {
                biased;
                _ = self.lifetime.cancelled() => break,
                transcoded = self.transcoder.transcode(event.as_ref()) => transcoded,
            };

            match transcoded {
                Ok(transcoded) => {
                    debug!(topic = %transcoded.topic, "Dispatching event");
                    self.dispatcher
                        .invoke(transcoded.topic.as_str(), transcoded.payload);
                }
                Err(e) => {
                    warn!(error = %e, "Skipping event");
                }
            }
            handled += 1;
        }

        Ok(handled)
    }
}
