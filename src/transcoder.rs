// Copyright (c) 2025 - Cowboy AI, Inc.
//! Event transcoding
//!
//! Turns a raw vCenter event into the message functions receive:
//!
//! ```text
//! RawEvent ──┬── kind ─────────→ topic
//!            ├── header ───────→ userName, createdTime
//!            ├── classifier ───→ category
//!            └── shape ────────→ objectName, managedObjectReference
//!                                       ↓
//!                                 OutboundEvent (JSON)
//! ```
//!
//! Optional fields are left out of the JSON entirely when absent, so a
//! function can test for `managedObjectReference` to tell whether the event
//! kind is supported.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::category::CategoryLookup;
use crate::errors::{BridgeError, BridgeResult};
use crate::events::{ManagedObjectReference, RawEvent};
use crate::subject::extract_subject;
use crate::topic::{derive_topic, Topic};

/// The JSON object sent to subscribed functions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundEvent {
    #[serde(default, skip_serializing_if = "Topic::is_empty")]
    pub topic: Topic,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub category: String,

    /// Address of the vCenter the event came from
    pub source: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub user_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_time: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub managed_object_reference: Option<ManagedObjectReference>,
}

impl OutboundEvent {
    /// Serialize to JSON
    pub fn to_json(&self) -> BridgeResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}

/// A transcoded event ready for the dispatcher
#[derive(Debug, Clone, PartialEq)]
pub struct Transcoded {
    pub topic: Topic,
    pub payload: Bytes,
}

/// Builds outbound messages from raw events
pub struct EventTranscoder {
    classifier: Arc<dyn CategoryLookup>,
    source: String,
}

impl EventTranscoder {
    /// Create a transcoder stamping messages with the given source
    pub fn new(classifier: Arc<dyn CategoryLookup>, source: impl Into<String>) -> Self {
        Self {
            classifier,
            source: source.into(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Build the outbound message for an event
    ///
    /// `None` stands for a null or undecodable event and is rejected.
    pub async fn outbound_event(&self, event: Option<&RawEvent>) -> BridgeResult<OutboundEvent> {
        let event =
            event.ok_or_else(|| BridgeError::InvalidEvent("event must not be nil".to_string()))?;

        let topic = derive_topic(event.kind());

        let category = self
            .classifier
            .classify(event)
            .await
            .map_err(|e| BridgeError::CategoryLookupFailed(Box::new(e)))?;

        let header = event.header();
        debug!(
            kind = %event.kind(),
            key = header.key,
            chain_id = header.chain_id,
            text = header.full_formatted_message.as_deref().unwrap_or_default(),
            topic = %topic,
            category = %category,
            "Derived event topic"
        );

        let subject = extract_subject(event);

        Ok(OutboundEvent {
            topic,
            category,
            source: self.source.clone(),
            user_name: event.user_name().to_string(),
            created_time: event.created_time(),
            object_name: subject.name,
            managed_object_reference: subject.reference,
        })
    }

    /// Transcode an event into its topic and serialized message
    pub async fn transcode(&self, event: Option<&RawEvent>) -> BridgeResult<Transcoded> {
        let outbound = self.outbound_event(event).await?;
        let payload = outbound.to_json()?;

        debug!(
            topic = %outbound.topic,
            payload = %String::from_utf8_lossy(&payload),
            "Transcoded event"
        );

        Ok(Transcoded {
            topic: outbound.topic,
            payload: Bytes::from(payload),
        })
    }
}
