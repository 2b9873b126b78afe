// Copyright (c) 2025 - Cowboy AI, Inc.
//! JetStream-backed event feed
//!
//! A collector next to vCenter publishes every event as JSON on
//! `{prefix}.{scopeType}.{scopeValue}`, e.g.
//! `vcenter.events.Folder.group-d1`. This feed reads those subjects through
//! one durable pull consumer per scope object and pages through them:
//!
//! - `page_size` is the number of messages per fetch
//! - `tail` keeps polling once the backlog is drained
//! - `force` replays the retained backlog and re-binds the consumer after a
//!   failed fetch; without it only new events are delivered and the first
//!   failure is fatal
//!
//! Messages are acknowledged once the handler reports them handled. Events
//! it left unhandled, because the lifetime ended mid-batch, are returned
//! with a negative ack so a later session receives them again.

use async_nats::jetstream::{
    self,
    consumer::{pull, AckPolicy, DeliverPolicy, PullConsumer},
    AckKind,
};
use async_trait::async_trait;
use futures::StreamExt;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{BatchHandler, EventBatch, EventFeed, FeedRequest};
use crate::errors::{BridgeError, BridgeResult};
use crate::events::{ManagedObjectReference, RawEvent};
use crate::lifetime::Lifetime;
use crate::nats::NatsClient;

/// Configuration for the JetStream feed
#[derive(Debug, Clone)]
pub struct JetStreamFeedConfig {
    /// Stream capturing `{subject_prefix}.>`
    pub stream_name: String,
    /// Durable consumer name; the scope value is appended per scope
    pub consumer_name: String,
    /// Subject prefix the collector publishes under
    pub subject_prefix: String,
    /// How long a fetch waits for messages before returning a short page
    pub fetch_expiry: Duration,
    /// Pause before re-binding after a failed fetch
    pub retry_delay: Duration,
    /// Consecutive failed fetches tolerated in force mode
    pub max_consecutive_failures: u32,
}

impl Default for JetStreamFeedConfig {
    fn default() -> Self {
        Self {
            stream_name: "VCENTER_EVENTS".to_string(),
            consumer_name: "vcenter-connector".to_string(),
            subject_prefix: "vcenter.events".to_string(),
            fetch_expiry: Duration::from_secs(1),
            retry_delay: Duration::from_secs(1),
            max_consecutive_failures: 5,
        }
    }
}

/// Event feed reading collector output from JetStream
pub struct JetStreamEventFeed {
    jetstream: jetstream::Context,
    config: JetStreamFeedConfig,
}

impl JetStreamEventFeed {
    pub fn new(client: &NatsClient, config: JetStreamFeedConfig) -> Self {
        Self {
            jetstream: client.jetstream(),
            config,
        }
    }

    /// Subject the collector publishes a scope's events on
    pub fn scope_subject(&self, scope: &ManagedObjectReference) -> String {
        scope_subject(&self.config.subject_prefix, scope)
    }

    /// Create or look up the stream and the durable consumer for a scope
    async fn bind(&self, scope: &ManagedObjectReference, force: bool) -> BridgeResult<PullConsumer> {
        let stream = self
            .jetstream
            .get_or_create_stream(jetstream::stream::Config {
                name: self.config.stream_name.clone(),
                subjects: vec![format!("{}.>", self.config.subject_prefix)],
                ..Default::default()
            })
            .await
            .map_err(|e| BridgeError::SubscriptionFailed(e.to_string()))?;

        let name = consumer_name(&self.config.consumer_name, scope);
        let deliver_policy = if force {
            DeliverPolicy::All
        } else {
            DeliverPolicy::New
        };

        let consumer = stream
            .get_or_create_consumer(
                &name,
                pull::Config {
                    durable_name: Some(name.clone()),
                    filter_subject: self.scope_subject(scope),
                    deliver_policy,
                    ack_policy: AckPolicy::Explicit,
                    ..Default::default()
                },
            )
            .await
            .map_err(|e| BridgeError::SubscriptionFailed(e.to_string()))?;

        debug!(consumer = %name, scope = %scope, "Bound event consumer");
        Ok(consumer)
    }

    /// Fetch one page of messages
    async fn fetch_page(
        &self,
        consumer: &PullConsumer,
        page_size: usize,
    ) -> BridgeResult<Vec<jetstream::Message>> {
        let mut batch = consumer
            .fetch()
            .max_messages(page_size)
            .expires(self.config.fetch_expiry)
            .messages()
            .await
            .map_err(|e| BridgeError::NatsConnection(e.to_string()))?;

        let mut messages = Vec::with_capacity(page_size);
        while let Some(message) = batch.next().await {
            messages.push(message.map_err(|e| BridgeError::NatsConnection(e.to_string()))?);
        }

        Ok(messages)
    }
}

#[async_trait]
impl EventFeed for JetStreamEventFeed {
    async fn subscribe(
        &self,
        lifetime: Lifetime,
        request: FeedRequest,
        handler: &mut dyn BatchHandler,
    ) -> BridgeResult<()> {
        if request.scope.is_empty() {
            return Err(BridgeError::SubscriptionFailed(
                "at least one scope object is required".to_string(),
            ));
        }
        let page_size = request.page_size.max(1);

        let mut consumers = Vec::with_capacity(request.scope.len());
        for scope in &request.scope {
            consumers.push((scope.clone(), self.bind(scope, request.force).await?));
        }

        info!(
            stream = %self.config.stream_name,
            scopes = consumers.len(),
            page_size,
            tail = request.tail,
            force = request.force,
            "Subscribed to event stream"
        );
        handler.on_subscribed();

        let mut failures = 0u32;
        loop {
            let mut delivered = 0usize;

            for (scope, consumer) in consumers.iter_mut() {
                let page = tokio::select! {
                    biased;
                    _ = lifetime.cancelled() => return Ok(()),
                    page = self.fetch_page(consumer, page_size) => page,
                };

                let messages = match page {
                    Ok(messages) => {
                        failures = 0;
                        messages
                    }
                    Err(e) => {
                        failures += 1;
                        if !request.force || failures > self.config.max_consecutive_failures {
                            return Err(BridgeError::SubscriptionFailed(e.to_string()));
                        }

                        warn!(scope = %scope, error = %e, failures, "Fetch failed, re-binding consumer");
                        tokio::select! {
                            biased;
                            _ = lifetime.cancelled() => return Ok(()),
                            _ = tokio::time::sleep(self.config.retry_delay) => {}
                        }
                        match self.bind(scope, request.force).await {
                            Ok(rebound) => *consumer = rebound,
                            Err(e) => warn!(scope = %scope, error = %e, "Re-binding consumer failed"),
                        }
                        continue;
                    }
                };

                if messages.is_empty() {
                    continue;
                }
                delivered += messages.len();

                let events = messages.iter().map(|m| decode_event(&m.payload)).collect();
                let handled = handler
                    .on_batch(EventBatch {
                        scope: scope.clone(),
                        events,
                    })
                    .await
                    .map_err(|e| BridgeError::SubscriptionFailed(e.to_string()))?;

                let (acked, returned) = split_handled(messages, handled);
                for message in acked {
                    if let Err(e) = message.ack().await {
                        warn!(error = %e, "Failed to acknowledge event");
                    }
                }
                if !returned.is_empty() {
                    debug!(scope = %scope, events = returned.len(), "Returning unhandled events");
                }
                for message in returned {
                    if let Err(e) = message.ack_with(AckKind::Nak(None)).await {
                        warn!(error = %e, "Failed to return event");
                    }
                }
            }

            if lifetime.is_cancelled() {
                return Ok(());
            }
            if delivered == 0 && !request.tail {
                info!("Event backlog drained");
                return Ok(());
            }
        }
    }
}

fn scope_subject(prefix: &str, scope: &ManagedObjectReference) -> String {
    format!("{}.{}.{}", prefix, scope.object_type, scope.value)
}

/// Durable names may not contain `.`, `*`, `>` or whitespace
fn consumer_name(base: &str, scope: &ManagedObjectReference) -> String {
    format!("{}-{}", base, scope.value)
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Split a page into the handled prefix and the unhandled rest
fn split_handled<T>(mut page: Vec<T>, handled: usize) -> (Vec<T>, Vec<T>) {
    let rest = page.split_off(handled.min(page.len()));
    (page, rest)
}

fn decode_event(payload: &[u8]) -> Option<RawEvent> {
    match RawEvent::from_slice(payload) {
        Ok(event) => event,
        Err(e) => {
            warn!(error = %e, bytes = payload.len(), "Undecodable event payload");
            None
        }
    }
}
