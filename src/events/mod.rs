// Copyright (c) 2025 - Cowboy AI, Inc.
//! vCenter Events
//!
//! This module defines the events the bridge consumes from the management
//! plane. Events are immutable facts reported by vCenter; the bridge never
//! constructs them itself outside of tests.
//!
//! # Event Shapes
//!
//! vSphere organises its several hundred event kinds into a class hierarchy.
//! Only a handful of branches name the object the event is about:
//!
//! ```text
//! Event
//!   ├── AlarmEvent          → alarm
//!   ├── DatastoreEvent      → datastore
//!   ├── HostEvent           → host
//!   ├── ResourcePoolEvent   → resourcePool
//!   ├── VmEvent             → vm
//!   └── ...                 → (no subject)
//! ```
//!
//! # Module Organization
//!
//! - [`raw`] - Decoded event, entity arguments and wire decoding
//! - [`catalog`] - Kind name to family mapping

pub mod catalog;
pub mod raw;

// Re-export commonly used types
pub use catalog::EventFamily;
pub use raw::{
    AlarmEventArgument, DatastoreEventArgument, EntityArgument, EventDecodeError, EventHeader,
    EventShape, HostEventArgument, ManagedObjectReference, RawEvent, ResourcePoolEventArgument,
    VmEventArgument,
};
