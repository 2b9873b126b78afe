// Copyright (c) 2025 - Cowboy AI, Inc.
//! Outbound Message Tests
//!
//! Tests verify the JSON functions receive:
//! - Field names and structure stay stable
//! - Absent optional fields are left out entirely
//! - Category failures and absent events are rejected

use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use vcenter_connector::errors::BridgeError;
use vcenter_connector::transcoder::OutboundEvent;

use crate::fixtures::*;

async fn message(wire: Value) -> Value {
    let transcoded = transcoder(FixedClassifier::new("info"))
        .transcode(Some(&decode(wire)))
        .await
        .expect("Failed to transcode");
    serde_json::from_slice(&transcoded.payload).expect("Invalid JSON")
}

#[tokio::test]
async fn test_vm_message_schema() {
    assert_eq!(
        message(vm_powered_on_json()).await,
        json!({
            "topic": "vm.powered.on",
            "category": "info",
            "source": SOURCE,
            "userName": "VSPHERE.LOCAL\\Administrator",
            "createdTime": FIXED_TIMESTAMP,
            "objectName": "Windows10-1234",
            "managedObjectReference": { "type": "VirtualMachine", "value": "vm-1234" }
        })
    );
}

#[tokio::test]
async fn test_unclassified_message_omits_subject() {
    let message = message(license_json()).await;
    let keys: Vec<&str> = message.as_object().unwrap().keys().map(String::as_str).collect();

    assert!(!keys.contains(&"objectName"));
    assert!(!keys.contains(&"managedObjectReference"));
    assert_eq!(message["topic"], "license");
}

#[tokio::test]
async fn test_system_event_omits_user_name() {
    let message = message(host_connection_lost_json()).await;
    assert!(message.get("userName").is_none());
    assert_eq!(message["topic"], "host.connection.lost");
}

#[tokio::test]
async fn test_alarm_message_uses_alarm_subject() {
    let message = message(alarm_status_changed_json()).await;
    assert_eq!(message["objectName"], "Host CPU usage");
    assert_eq!(
        message["managedObjectReference"],
        json!({ "type": "Alarm", "value": "alarm-7" })
    );
}

#[tokio::test]
async fn test_lifecycle_kinds_carry_their_subject() {
    let vm_ref = json!({ "type": "VirtualMachine", "value": "vm-77" });
    let host_ref = json!({ "type": "HostSystem", "value": "host-9" });
    let cases = vec![
        ("VmSuspendingEvent", "vm.suspending", &vm_ref),
        ("VmResumingEvent", "vm.resuming", &vm_ref),
        ("VmMacAssignedEvent", "vm.mac.assigned", &vm_ref),
        ("VmUpgradeCompleteEvent", "vm.upgrade.complete", &vm_ref),
        ("VmBeingHotMigratedEvent", "vm.being.hot.migrated", &vm_ref),
        ("HostLicenseExpiredEvent", "host.license.expired", &host_ref),
        ("DrsEnteredStandbyModeEvent", "drs.entered.standby.mode", &host_ref),
    ];

    for (kind, topic, reference) in cases {
        // Host kinds also carry the VM base field, so only the family decides
        let wire = json!({
            "type": kind,
            "createdTime": FIXED_TIMESTAMP,
            "vm": { "name": "db-01", "vm": vm_ref },
            "host": { "name": "esx-03", "host": host_ref }
        });
        let message = message(wire).await;

        assert_eq!(message["topic"], topic, "{}", kind);
        assert_eq!(&message["managedObjectReference"], reference, "{}", kind);
    }
}

#[tokio::test]
async fn test_category_failure_is_wrapped() {
    let err = transcoder(FixedClassifier::new("info").failing_for("VmPoweredOnEvent"))
        .transcode(Some(&vm_powered_on()))
        .await
        .unwrap_err();

    assert!(matches!(err, BridgeError::CategoryLookupFailed(_)));
    assert!(err.to_string().starts_with("error retrieving event category"));
    assert!(!err.is_fatal());
}

#[tokio::test]
async fn test_absent_event_is_rejected() {
    let err = transcoder(FixedClassifier::new("info"))
        .transcode(None)
        .await
        .unwrap_err();
    assert!(matches!(err, BridgeError::InvalidEvent(_)));
}

#[test]
fn test_message_decodes_back() {
    let json = json!({ "topic": "license", "source": SOURCE });
    let outbound: OutboundEvent = serde_json::from_value(json).unwrap();

    assert_eq!(outbound.topic.as_str(), "license");
    assert!(outbound.category.is_empty());
    assert!(outbound.managed_object_reference.is_none());
}
