// Copyright (c) 2025 - Cowboy AI, Inc.
//! Test Fixtures for vcenter-connector
//!
//! Deterministic vCenter events and in-memory collaborators. All timestamps
//! are fixed constants so serialized output can be compared exactly.
//!
//! # Collaborators
//! - [`ScriptedFeed`]: replays fixed batches, then idles, finishes or fails
//! - [`RecordingDispatcher`]: records every `invoke`
//! - [`FixedClassifier`]: answers one category, failing for chosen kinds
//! - [`MockGateway`]: lists fixed functions and records invocations

#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use vcenter_connector::category::CategoryLookup;
use vcenter_connector::dispatch::{
    Dispatcher, FunctionGateway, FunctionStatus, GatewayReply, InvocationResponse,
    ResponseObserver,
};
use vcenter_connector::errors::{BridgeError, BridgeResult};
use vcenter_connector::events::{ManagedObjectReference, RawEvent};
use vcenter_connector::feed::{BatchHandler, EventBatch, EventFeed, FeedRequest};
use vcenter_connector::lifetime::Lifetime;
use vcenter_connector::transcoder::EventTranscoder;

// Fixed test timestamp (2026-01-19T12:00:00Z)
pub const FIXED_TIMESTAMP: &str = "2026-01-19T12:00:00Z";

pub const SOURCE: &str = "https://vcenter.local/sdk";

/// Parse the fixed timestamp
pub fn fixed_timestamp() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(FIXED_TIMESTAMP)
        .expect("Invalid timestamp in test fixture")
        .with_timezone(&Utc)
}

pub fn root_folder() -> ManagedObjectReference {
    ManagedObjectReference::new("Folder", "group-d1")
}

// ============================================================================
// Wire events
// ============================================================================

pub fn vm_powered_on_json() -> Value {
    json!({
        "type": "VmPoweredOnEvent",
        "key": 101,
        "chainId": 101,
        "createdTime": FIXED_TIMESTAMP,
        "userName": "VSPHERE.LOCAL\\Administrator",
        "fullFormattedMessage": "Windows10-1234 on esx-01 is powered on",
        "datacenter": {
            "name": "dc-01",
            "datacenter": { "type": "Datacenter", "value": "datacenter-2" }
        },
        "host": {
            "name": "esx-01",
            "host": { "type": "HostSystem", "value": "host-42" }
        },
        "vm": {
            "name": "Windows10-1234",
            "vm": { "type": "VirtualMachine", "value": "vm-1234" }
        }
    })
}

pub fn host_connection_lost_json() -> Value {
    json!({
        "type": "HostConnectionLostEvent",
        "key": 102,
        "createdTime": FIXED_TIMESTAMP,
        "userName": "",
        "host": {
            "name": "esx-02",
            "host": { "type": "HostSystem", "value": "host-43" }
        }
    })
}

pub fn datastore_renamed_json() -> Value {
    json!({
        "type": "DatastoreRenamedEvent",
        "key": 103,
        "createdTime": FIXED_TIMESTAMP,
        "userName": "admin",
        "datastore": {
            "name": "datastore-ssd",
            "datastore": { "type": "Datastore", "value": "datastore-11" }
        }
    })
}

pub fn resource_pool_created_json() -> Value {
    json!({
        "type": "ResourcePoolCreatedEvent",
        "key": 104,
        "createdTime": FIXED_TIMESTAMP,
        "userName": "admin",
        "resourcePool": {
            "name": "gold",
            "resourcePool": { "type": "ResourcePool", "value": "resgroup-1234" }
        }
    })
}

pub fn alarm_status_changed_json() -> Value {
    json!({
        "type": "AlarmStatusChangedEvent",
        "key": 105,
        "createdTime": FIXED_TIMESTAMP,
        "alarm": {
            "name": "Host CPU usage",
            "alarm": { "type": "Alarm", "value": "alarm-7" }
        },
        "host": {
            "name": "esx-01",
            "host": { "type": "HostSystem", "value": "host-42" }
        }
    })
}

pub fn license_json() -> Value {
    json!({
        "type": "LicenseEvent",
        "key": 106,
        "createdTime": FIXED_TIMESTAMP,
        "userName": "admin"
    })
}

/// Decode a wire event, panicking on fixture errors
pub fn decode(value: Value) -> RawEvent {
    serde_json::from_value(value).expect("Invalid event fixture")
}

pub fn vm_powered_on() -> RawEvent {
    decode(vm_powered_on_json())
}

pub fn host_connection_lost() -> RawEvent {
    decode(host_connection_lost_json())
}

pub fn license() -> RawEvent {
    decode(license_json())
}

// ============================================================================
// Feed
// ============================================================================

/// What a [`ScriptedFeed`] does after its batches
#[derive(Debug, Clone)]
pub enum FeedEnd {
    /// Wait for cancellation, like a tailing feed
    AwaitCancel,
    /// Return `Ok` straight away
    Finish,
    /// Fail with the given message
    Fail(String),
}

pub struct ScriptedFeed {
    batches: Vec<EventBatch>,
    end: FeedEnd,
    requests: Mutex<Vec<FeedRequest>>,
    handled: Mutex<Vec<usize>>,
}

impl ScriptedFeed {
    pub fn new(batches: Vec<EventBatch>, end: FeedEnd) -> Self {
        Self {
            batches,
            end,
            requests: Mutex::new(Vec::new()),
            handled: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<FeedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Handled count the handler reported for each delivered batch
    pub fn handled(&self) -> Vec<usize> {
        self.handled.lock().unwrap().clone()
    }
}

pub fn batch(events: Vec<Option<RawEvent>>) -> EventBatch {
    EventBatch {
        scope: root_folder(),
        events,
    }
}

#[async_trait]
impl EventFeed for ScriptedFeed {
    async fn subscribe(
        &self,
        lifetime: Lifetime,
        request: FeedRequest,
        handler: &mut dyn BatchHandler,
    ) -> BridgeResult<()> {
        self.requests.lock().unwrap().push(request);
        handler.on_subscribed();

        for batch in self.batches.iter().cloned() {
            if lifetime.is_cancelled() {
                return Ok(());
            }
            let handled = handler
                .on_batch(batch)
                .await
                .map_err(|e| BridgeError::SubscriptionFailed(e.to_string()))?;
            self.handled.lock().unwrap().push(handled);
        }

        match &self.end {
            FeedEnd::AwaitCancel => {
                lifetime.cancelled().await;
                Ok(())
            }
            FeedEnd::Finish => Ok(()),
            FeedEnd::Fail(message) => Err(BridgeError::NatsConnection(message.clone())),
        }
    }
}

// ============================================================================
// Dispatcher
// ============================================================================

#[derive(Default)]
pub struct RecordingDispatcher {
    invocations: Mutex<Vec<(String, Bytes)>>,
}

impl RecordingDispatcher {
    pub fn invocations(&self) -> Vec<(String, Bytes)> {
        self.invocations.lock().unwrap().clone()
    }

    pub fn topics(&self) -> Vec<String> {
        self.invocations().into_iter().map(|(topic, _)| topic).collect()
    }
}

impl Dispatcher for RecordingDispatcher {
    fn invoke(&self, topic: &str, payload: Bytes) {
        self.invocations
            .lock()
            .unwrap()
            .push((topic.to_string(), payload));
    }
}

// ============================================================================
// Category
// ============================================================================

/// Classifies every event as `category`, failing for listed kinds
pub struct FixedClassifier {
    category: String,
    failing: HashSet<String>,
    cancelling: Option<(String, Lifetime)>,
}

impl FixedClassifier {
    pub fn new(category: &str) -> Self {
        Self {
            category: category.to_string(),
            failing: HashSet::new(),
            cancelling: None,
        }
    }

    pub fn failing_for(mut self, kind: &str) -> Self {
        self.failing.insert(kind.to_string());
        self
    }

    /// Cancel `lifetime` while classifying `kind`, as a shutdown arriving
    /// mid-batch would
    pub fn cancelling_on(mut self, kind: &str, lifetime: Lifetime) -> Self {
        self.cancelling = Some((kind.to_string(), lifetime));
        self
    }
}

#[async_trait]
impl CategoryLookup for FixedClassifier {
    async fn classify(&self, event: &RawEvent) -> BridgeResult<String> {
        if let Some((kind, lifetime)) = &self.cancelling {
            if kind == event.kind() {
                lifetime.cancel();
            }
        }
        if self.failing.contains(event.kind()) {
            return Err(BridgeError::NatsRequest("description table unavailable".to_string()));
        }
        Ok(self.category.clone())
    }
}

pub fn transcoder(classifier: FixedClassifier) -> EventTranscoder {
    EventTranscoder::new(Arc::new(classifier), SOURCE)
}

// ============================================================================
// Gateway
// ============================================================================

#[derive(Default)]
pub struct MockGateway {
    functions: Mutex<Vec<FunctionStatus>>,
    failing: HashSet<String>,
    delay: Duration,
    invocations: Mutex<Vec<(String, Bytes)>>,
    list_calls: Mutex<usize>,
}

impl MockGateway {
    pub fn new(functions: Vec<FunctionStatus>) -> Self {
        Self {
            functions: Mutex::new(functions),
            ..Self::default()
        }
    }

    pub fn failing_for(mut self, name: &str) -> Self {
        self.failing.insert(name.to_string());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn set_functions(&self, functions: Vec<FunctionStatus>) {
        *self.functions.lock().unwrap() = functions;
    }

    pub fn invocations(&self) -> Vec<(String, Bytes)> {
        self.invocations.lock().unwrap().clone()
    }

    pub fn list_calls(&self) -> usize {
        *self.list_calls.lock().unwrap()
    }
}

#[async_trait]
impl FunctionGateway for MockGateway {
    async fn list_functions(&self) -> BridgeResult<Vec<FunctionStatus>> {
        *self.list_calls.lock().unwrap() += 1;
        Ok(self.functions.lock().unwrap().clone())
    }

    async fn invoke_function(&self, name: &str, payload: Bytes) -> BridgeResult<GatewayReply> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.invocations
            .lock()
            .unwrap()
            .push((name.to_string(), payload.clone()));

        if self.failing.contains(name) {
            return Err(BridgeError::Gateway(format!("{} is unavailable", name)));
        }
        Ok(GatewayReply {
            status: 200,
            body: payload,
        })
    }
}

#[derive(Default)]
pub struct RecordingObserver {
    responses: Mutex<Vec<InvocationResponse>>,
}

impl RecordingObserver {
    pub fn responses(&self) -> Vec<InvocationResponse> {
        self.responses.lock().unwrap().clone()
    }
}

impl ResponseObserver for RecordingObserver {
    fn on_response(&self, response: &InvocationResponse) {
        self.responses.lock().unwrap().push(response.clone());
    }
}
