// Copyright (c) 2025 - Cowboy AI, Inc.
//! vCenter event connector
//!
//! Subscribes to the vCenter event stream and invokes OpenFaaS functions
//! subscribed to each event's topic.
//!
//! ```text
//! EventFeed ──batches──→ StreamConsumer ──→ EventTranscoder ──→ Dispatcher
//!                                              │   │   │            │
//!                                          topic  subject category  └→ FunctionGateway
//! ```
//!
//! - [`topic`] derives `vm.powered.on` from `VmPoweredOnEvent`
//! - [`subject`] pulls the affected object's name and reference from an event
//! - [`transcoder`] builds the JSON message functions receive
//! - [`stream`] runs the subscription and isolates per-event failures

pub mod category;
pub mod config;
pub mod credentials;
pub mod dispatch;
pub mod errors;
pub mod events;
pub mod feed;
pub mod lifetime;
pub mod nats;
pub mod stream;
pub mod subject;
pub mod topic;
pub mod transcoder;

// Re-export commonly used types
pub use category::{CategoryLookup, DescriptionClassifier, NatsDescriptionSource};
pub use config::BridgeConfig;
pub use dispatch::{Dispatcher, QueuedDispatcher};
pub use errors::{BridgeError, BridgeResult};
pub use events::{ManagedObjectReference, RawEvent};
pub use feed::{EventFeed, JetStreamEventFeed};
pub use lifetime::Lifetime;
pub use nats::{NatsClient, NatsConfig};
pub use stream::{ConsumerState, StreamConsumer};
pub use topic::{derive_topic, Topic};
pub use transcoder::{EventTranscoder, OutboundEvent};
