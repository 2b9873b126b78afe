// Copyright (c) 2025 - Cowboy AI, Inc.
//! Wire Decoding Tests
//!
//! Tests verify:
//! - Each event family decodes into its shape
//! - Subjects follow the family precedence
//! - Malformed payloads are rejected rather than guessed at
//!
//! All tests use deterministic fixtures

use pretty_assertions::assert_eq;
use serde_json::json;

use vcenter_connector::events::{EventShape, ManagedObjectReference, RawEvent};
use vcenter_connector::subject::extract_subject;

use crate::fixtures::*;

#[test]
fn test_vm_event_header() {
    let event = vm_powered_on();

    assert_eq!(event.kind(), "VmPoweredOnEvent");
    assert_eq!(event.created_time(), Some(fixed_timestamp()));
    assert_eq!(event.user_name(), "VSPHERE.LOCAL\\Administrator");
    assert_eq!(event.header().key, 101);
    assert_eq!(event.header().chain_id, 101);
    assert_eq!(
        event.header().full_formatted_message.as_deref(),
        Some("Windows10-1234 on esx-01 is powered on")
    );
}

#[test]
fn test_family_shapes() {
    assert!(matches!(vm_powered_on().shape(), EventShape::Vm(_)));
    assert!(matches!(host_connection_lost().shape(), EventShape::Host(_)));
    assert!(matches!(decode(datastore_renamed_json()).shape(), EventShape::Datastore(_)));
    assert!(matches!(
        decode(resource_pool_created_json()).shape(),
        EventShape::ResourcePool(_)
    ));
    assert!(matches!(decode(alarm_status_changed_json()).shape(), EventShape::Alarm(_)));
    assert!(matches!(license().shape(), EventShape::Unclassified));
}

#[test]
fn test_subjects_by_family() {
    let cases = vec![
        (vm_powered_on_json(), "Windows10-1234", "VirtualMachine", "vm-1234"),
        (host_connection_lost_json(), "esx-02", "HostSystem", "host-43"),
        (datastore_renamed_json(), "datastore-ssd", "Datastore", "datastore-11"),
        (resource_pool_created_json(), "gold", "ResourcePool", "resgroup-1234"),
        (alarm_status_changed_json(), "Host CPU usage", "Alarm", "alarm-7"),
    ];

    for (wire, name, object_type, value) in cases {
        let subject = extract_subject(&decode(wire));
        assert_eq!(subject.name.as_deref(), Some(name));
        assert_eq!(subject.reference, Some(ManagedObjectReference::new(object_type, value)));
    }
}

#[test]
fn test_unclassified_event_has_no_subject() {
    assert!(extract_subject(&license()).is_none());
}

#[test]
fn test_vm_kind_without_vm_argument_is_rejected() {
    let payload = json!({ "type": "VmPoweredOnEvent", "createdTime": FIXED_TIMESTAMP });
    let err = serde_json::from_value::<RawEvent>(payload).unwrap_err();
    assert!(err.to_string().contains("vm"));
}

#[test]
fn test_feed_payloads() {
    let good = serde_json::to_vec(&vm_powered_on_json()).unwrap();
    assert_eq!(RawEvent::from_slice(&good).unwrap(), Some(vm_powered_on()));
    assert_eq!(RawEvent::from_slice(b"null").unwrap(), None);
    assert!(RawEvent::from_slice(b"{\"type\": \"\"}").is_err());
    assert!(RawEvent::from_slice(b"{\"key\": 1}").is_err());
}
