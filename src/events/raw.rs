// Copyright (c) 2025 - Cowboy AI, Inc.
//! Raw vCenter Events
//!
//! Events as they arrive from the management plane. The wire form follows
//! the vSphere `Event` hierarchy: a `type` discriminant naming the concrete
//! kind, the common base fields, and the entity arguments that name the
//! objects involved.
//!
//! ```json
//! {
//!   "type": "VmPoweredOnEvent",
//!   "key": 8241,
//!   "createdTime": "2026-01-19T12:00:00Z",
//!   "userName": "VSPHERE.LOCAL\\Administrator",
//!   "vm": { "name": "Windows10-1234", "vm": { "type": "VirtualMachine", "value": "vm-1234" } },
//!   "host": { "name": "esx01", "host": { "type": "HostSystem", "value": "host-12" } }
//! }
//! ```
//!
//! Decoding resolves the kind through the [catalogue](super::catalog) into a
//! sealed [`EventShape`], so consumers match on a closed set of variants
//! instead of probing optional fields.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::catalog::EventFamily;

/// Opaque identifier of a managed entity
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ManagedObjectReference {
    /// Managed object type, e.g. `VirtualMachine`
    #[serde(rename = "type")]
    pub object_type: String,
    /// Unique value within the type, e.g. `vm-1234`
    pub value: String,
}

impl ManagedObjectReference {
    pub fn new(object_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            object_type: object_type.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for ManagedObjectReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.object_type, self.value)
    }
}

/// An event argument naming one managed entity
pub trait EntityArgument {
    /// Display name of the entity at the time of the event
    fn name(&self) -> &str;

    /// Reference to the entity
    fn reference(&self) -> &ManagedObjectReference;
}

macro_rules! entity_argument {
    ($(#[$meta:meta])* $name:ident, $field:ident, $wire:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        pub struct $name {
            #[serde(default)]
            pub name: String,
            #[serde(rename = $wire)]
            pub $field: ManagedObjectReference,
        }

        impl $name {
            pub fn new(name: impl Into<String>, $field: ManagedObjectReference) -> Self {
                Self {
                    name: name.into(),
                    $field,
                }
            }
        }

        impl EntityArgument for $name {
            fn name(&self) -> &str {
                &self.name
            }

            fn reference(&self) -> &ManagedObjectReference {
                &self.$field
            }
        }
    };
}

entity_argument!(
    /// Alarm named by an `AlarmEvent`
    AlarmEventArgument, alarm, "alarm"
);
entity_argument!(
    /// Datastore named by a `DatastoreEvent` or the base `ds` field
    DatastoreEventArgument, datastore, "datastore"
);
entity_argument!(
    /// Host named by the base `host` field
    HostEventArgument, host, "host"
);
entity_argument!(
    /// Resource pool named by a `ResourcePoolEvent`
    ResourcePoolEventArgument, resource_pool, "resourcePool"
);
entity_argument!(
    /// Virtual machine named by the base `vm` field
    VmEventArgument, vm, "vm"
);

/// Fields every event carries
///
/// Base arguments the bridge never reads (`datacenter`, `computeResource`,
/// `net`, `dvs`) are skipped while decoding.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EventHeader {
    pub key: i32,
    /// Key of the first event in a chain of related events
    pub chain_id: i32,
    /// `None` when the feed sent no timestamp or the zero time
    pub created_time: Option<DateTime<Utc>>,
    /// Empty for system-originated events
    pub user_name: String,
    /// Human readable text vCenter rendered for the event
    pub full_formatted_message: Option<String>,
    /// Only set on `EventEx` style events
    pub severity: Option<String>,
    pub host: Option<HostEventArgument>,
    pub vm: Option<VmEventArgument>,
    pub ds: Option<DatastoreEventArgument>,
}

/// The object an event is about, by family
#[derive(Debug, Clone, PartialEq)]
pub enum EventShape {
    Alarm(AlarmEventArgument),
    Datastore(DatastoreEventArgument),
    Host(HostEventArgument),
    ResourcePool(ResourcePoolEventArgument),
    Vm(VmEventArgument),
    /// A kind that names no object, or one not modelled yet
    Unclassified,
}

/// A decoded vCenter event
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "WireEvent")]
pub struct RawEvent {
    kind: String,
    header: EventHeader,
    shape: EventShape,
}

impl RawEvent {
    pub fn new(kind: impl Into<String>, header: EventHeader, shape: EventShape) -> Self {
        Self {
            kind: kind.into(),
            header,
            shape,
        }
    }

    /// Concrete kind name, e.g. `VmPoweredOnEvent`
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn header(&self) -> &EventHeader {
        &self.header
    }

    pub fn shape(&self) -> &EventShape {
        &self.shape
    }

    pub fn user_name(&self) -> &str {
        &self.header.user_name
    }

    pub fn created_time(&self) -> Option<DateTime<Utc>> {
        self.header.created_time
    }

    /// Decode one event from its JSON wire form
    ///
    /// A JSON `null` decodes to `None`.
    pub fn from_slice(payload: &[u8]) -> Result<Option<Self>, serde_json::Error> {
        serde_json::from_slice(payload)
    }
}

/// Why a wire event could not become a [`RawEvent`]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EventDecodeError {
    #[error("event type is empty")]
    EmptyKind,

    #[error("{kind} is missing its {argument} argument")]
    MissingArgument { kind: String, argument: &'static str },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireEvent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    key: i32,
    #[serde(default)]
    chain_id: i32,
    #[serde(default)]
    created_time: Option<DateTime<Utc>>,
    #[serde(default)]
    user_name: Option<String>,
    #[serde(default)]
    full_formatted_message: Option<String>,
    #[serde(default)]
    severity: Option<String>,
    #[serde(default)]
    host: Option<HostEventArgument>,
    #[serde(default)]
    vm: Option<VmEventArgument>,
    #[serde(default)]
    ds: Option<DatastoreEventArgument>,
    #[serde(default)]
    datastore: Option<DatastoreEventArgument>,
    #[serde(default)]
    alarm: Option<AlarmEventArgument>,
    #[serde(default)]
    resource_pool: Option<ResourcePoolEventArgument>,
}

impl TryFrom<WireEvent> for RawEvent {
    type Error = EventDecodeError;

    fn try_from(wire: WireEvent) -> Result<Self, Self::Error> {
        if wire.kind.is_empty() {
            return Err(EventDecodeError::EmptyKind);
        }

        let family = EventFamily::of_kind(&wire.kind);
        let missing = || EventDecodeError::MissingArgument {
            kind: wire.kind.clone(),
            argument: family.argument_name().unwrap_or_default(),
        };

        let shape = match family {
            EventFamily::Alarm => EventShape::Alarm(wire.alarm.clone().ok_or_else(missing)?),
            EventFamily::Datastore => EventShape::Datastore(
                wire.datastore
                    .clone()
                    .or_else(|| wire.ds.clone())
                    .ok_or_else(missing)?,
            ),
            EventFamily::Host => EventShape::Host(wire.host.clone().ok_or_else(missing)?),
            EventFamily::ResourcePool => {
                EventShape::ResourcePool(wire.resource_pool.clone().ok_or_else(missing)?)
            }
            EventFamily::Vm => EventShape::Vm(wire.vm.clone().ok_or_else(missing)?),
            EventFamily::General => EventShape::Unclassified,
        };

        let header = EventHeader {
            key: wire.key,
            chain_id: wire.chain_id,
            created_time: wire.created_time.filter(|t| !is_zero_time(t)),
            user_name: wire.user_name.unwrap_or_default(),
            full_formatted_message: wire.full_formatted_message,
            severity: wire.severity,
            host: wire.host,
            vm: wire.vm,
            ds: wire.ds,
        };

        Ok(RawEvent {
            kind: wire.kind,
            header,
            shape,
        })
    }
}

/// vSphere reports unset timestamps as `0001-01-01T00:00:00Z`
fn is_zero_time(t: &DateTime<Utc>) -> bool {
    t.year() <= 1
}
