// Copyright (c) 2025 - Cowboy AI, Inc.
//! Upstream event feed
//!
//! The feed owns the paging over vCenter's event history. The bridge only
//! registers a [`BatchHandler`] and receives ordered batches until the
//! lifetime ends or the feed fails.
//!
//! # Protocol
//!
//! ```text
//! subscribe(lifetime, request, handler)
//!     → handler.on_subscribed()
//!     → handler.on_batch(batch)   (repeated, in delivery order)
//!         → n                     events handled from the front of the batch
//!     → Ok(())                    lifetime cancelled, or backlog done without tail
//!     → Err(SubscriptionFailed)   fatal feed error, or handler returned Err
//! ```

pub mod jetstream;

use async_trait::async_trait;

use crate::errors::BridgeResult;
use crate::events::{ManagedObjectReference, RawEvent};
use crate::lifetime::Lifetime;

pub use jetstream::{JetStreamEventFeed, JetStreamFeedConfig};

/// Parameters of a feed subscription
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedRequest {
    /// Objects whose events (and their descendants' events) are delivered
    pub scope: Vec<ManagedObjectReference>,
    /// Maximum events per batch
    pub page_size: usize,
    /// Keep delivering new events after the backlog is exhausted
    pub tail: bool,
    /// Catch up on the retained backlog and re-subscribe after transient
    /// failures instead of giving up
    pub force: bool,
}

/// One page of events for a scope object
#[derive(Debug, Clone, PartialEq)]
pub struct EventBatch {
    pub scope: ManagedObjectReference,
    /// `None` marks an event the feed could not decode
    pub events: Vec<Option<RawEvent>>,
}

/// Receives batches from a feed
#[async_trait]
pub trait BatchHandler: Send {
    /// Called once the subscription is established
    fn on_subscribed(&mut self) {}

    /// Handle one batch; an error ends the subscription
    ///
    /// Returns how many events from the front of the batch were handled.
    /// The feed settles only those; the rest are redelivered.
    async fn on_batch(&mut self, batch: EventBatch) -> BridgeResult<usize>;
}

/// Source of vCenter event batches
#[async_trait]
pub trait EventFeed: Send + Sync {
    /// Deliver batches to `handler` until `lifetime` ends or the feed fails
    async fn subscribe(
        &self,
        lifetime: Lifetime,
        request: FeedRequest,
        handler: &mut dyn BatchHandler,
    ) -> BridgeResult<()>;
}
