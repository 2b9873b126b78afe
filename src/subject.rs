// Copyright (c) 2025 - Cowboy AI, Inc.
//! Subject extraction
//!
//! Finds the managed object an event is about. Functions receive the name
//! and reference of that object so they can act on it without a second round
//! trip to vCenter.
//!
//! Precedence when matching shapes is fixed:
//!
//! ```text
//! alarm → datastore → host → resource pool → vm
//! ```
//!
//! Events outside these families have no subject. That is expected for kinds
//! not modelled yet and is not an error.

use crate::events::{EntityArgument, EventShape, ManagedObjectReference, RawEvent};

/// The object an event is about
///
/// Both parts are optional. An empty name counts as absent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Subject {
    pub name: Option<String>,
    pub reference: Option<ManagedObjectReference>,
}

impl Subject {
    /// A subject with neither name nor reference
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_none(&self) -> bool {
        self.name.is_none() && self.reference.is_none()
    }

    fn from_argument(argument: &impl EntityArgument) -> Self {
        let name = Some(argument.name())
            .filter(|n| !n.is_empty())
            .map(str::to_string);

        Self {
            name,
            reference: Some(argument.reference().clone()),
        }
    }
}

/// Extract the subject of an event
pub fn extract_subject(event: &RawEvent) -> Subject {
    match event.shape() {
        EventShape::Alarm(alarm) => Subject::from_argument(alarm),
        EventShape::Datastore(datastore) => Subject::from_argument(datastore),
        EventShape::Host(host) => Subject::from_argument(host),
        EventShape::ResourcePool(pool) => Subject::from_argument(pool),
        EventShape::Vm(vm) => Subject::from_argument(vm),
        EventShape::Unclassified => Subject::none(),
    }
}
