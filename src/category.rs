// Copyright (c) 2025 - Cowboy AI, Inc.
//! Event category lookup
//!
//! vCenter classifies every event kind as `info`, `warning`, `error` or
//! `user` in its event description table. The classifier fetches that table
//! once, caches it, and answers lookups from memory. `EventEx` style events
//! carry their own severity and skip the table.
//!
//! # Example
//!
//! ```rust
//! use vcenter_connector::category::{
//!     CategoryLookup, DescriptionClassifier, EventDescriptionInfo, StaticDescriptions,
//! };
//! use vcenter_connector::events::{EventHeader, EventShape, RawEvent};
//!
//! # tokio_test::block_on(async {
//! let classifier = DescriptionClassifier::new(StaticDescriptions::new(vec![
//!     EventDescriptionInfo::new("LicenseEvent", "info"),
//! ]));
//! let event = RawEvent::new("LicenseEvent", EventHeader::default(), EventShape::Unclassified);
//! assert_eq!(classifier.classify(&event).await.unwrap(), "info");
//! # });
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::errors::{BridgeError, BridgeResult};
use crate::events::RawEvent;
use crate::nats::NatsClient;

/// Kind name of vCenter's extensible event
pub const EXTENSIBLE_EVENT_KIND: &str = "EventEx";

/// Category reported for extensible events without a severity
pub const DEFAULT_SEVERITY: &str = "info";

/// Resolves the category of an event
#[async_trait]
pub trait CategoryLookup: Send + Sync {
    /// Classify an event; an empty string means the kind is unknown
    async fn classify(&self, event: &RawEvent) -> BridgeResult<String>;
}

/// One row of vCenter's event description table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDescriptionInfo {
    /// Event kind name, e.g. `VmPoweredOnEvent`
    pub key: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl EventDescriptionInfo {
    pub fn new(key: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            category: category.into(),
            description: String::new(),
        }
    }
}

/// Where the event description table comes from
#[async_trait]
pub trait DescriptionSource: Send + Sync {
    async fn event_info(&self) -> BridgeResult<Vec<EventDescriptionInfo>>;
}

/// A fixed description table
#[derive(Debug, Clone, Default)]
pub struct StaticDescriptions {
    rows: Vec<EventDescriptionInfo>,
}

impl StaticDescriptions {
    pub fn new(rows: Vec<EventDescriptionInfo>) -> Self {
        Self { rows }
    }
}

#[async_trait]
impl DescriptionSource for StaticDescriptions {
    async fn event_info(&self) -> BridgeResult<Vec<EventDescriptionInfo>> {
        Ok(self.rows.clone())
    }
}

/// Description table served by the vCenter collector over NATS request/reply
#[derive(Clone)]
pub struct NatsDescriptionSource {
    client: NatsClient,
    subject: String,
}

impl NatsDescriptionSource {
    pub fn new(client: NatsClient, subject: impl Into<String>) -> Self {
        Self {
            client,
            subject: subject.into(),
        }
    }
}

#[async_trait]
impl DescriptionSource for NatsDescriptionSource {
    async fn event_info(&self) -> BridgeResult<Vec<EventDescriptionInfo>> {
        self.client.request(&self.subject, &()).await
    }
}

/// Classifier backed by a lazily loaded description table
///
/// A failed load is not cached; the next lookup tries again.
pub struct DescriptionClassifier<S> {
    source: S,
    table: OnceCell<HashMap<String, String>>,
}

impl<S: DescriptionSource> DescriptionClassifier<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            table: OnceCell::new(),
        }
    }

    async fn table(&self) -> BridgeResult<&HashMap<String, String>> {
        self.table
            .get_or_try_init(|| async {
                let rows = self.source.event_info().await?;
                info!(kinds = rows.len(), "Loaded event description table");
                Ok::<_, BridgeError>(
                    rows.into_iter()
                        .map(|row| (row.key, row.category))
                        .collect(),
                )
            })
            .await
    }
}

#[async_trait]
impl<S: DescriptionSource> CategoryLookup for DescriptionClassifier<S> {
    async fn classify(&self, event: &RawEvent) -> BridgeResult<String> {
        if let Some(severity) = event.header().severity.as_deref().filter(|s| !s.is_empty()) {
            return Ok(severity.to_string());
        }
        if event.kind() == EXTENSIBLE_EVENT_KIND {
            return Ok(DEFAULT_SEVERITY.to_string());
        }

        let category = self.table().await?.get(event.kind()).cloned();
        if category.is_none() {
            debug!(kind = %event.kind(), "No description for event kind");
        }

        Ok(category.unwrap_or_default())
    }
}
