// Copyright (c) 2025 - Cowboy AI, Inc.
//! Event kind catalogue
//!
//! Maps vSphere event kind names onto the family whose argument names the
//! affected object. Each family lists the base kind and every concrete
//! subtype vCenter reports. Kinds missing from the catalogue belong to
//! [`EventFamily::General`] and carry no subject.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Families of events that name a managed object
///
/// Declared in extraction precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventFamily {
    /// `AlarmEvent` and its subtypes (own `alarm` argument)
    Alarm,
    /// `DatastoreEvent` and its subtypes (own `datastore` argument)
    Datastore,
    /// `HostEvent` and its subtypes (base `host` argument)
    Host,
    /// `ResourcePoolEvent` and its subtypes (own `resourcePool` argument)
    ResourcePool,
    /// `VmEvent` and its subtypes (base `vm` argument)
    Vm,
    /// Everything else
    General,
}

/// `AlarmEvent` and its subtypes
pub const ALARM_KINDS: &[&str] = &[
    "AlarmEvent",
    "AlarmAcknowledgedEvent",
    "AlarmActionTriggeredEvent",
    "AlarmClearedEvent",
    "AlarmCreatedEvent",
    "AlarmEmailCompletedEvent",
    "AlarmEmailFailedEvent",
    "AlarmReconfiguredEvent",
    "AlarmRemovedEvent",
    "AlarmScriptCompleteEvent",
    "AlarmScriptFailedEvent",
    "AlarmSnmpCompletedEvent",
    "AlarmSnmpFailedEvent",
    "AlarmStatusChangedEvent",
];

/// `DatastoreEvent` and its subtypes
pub const DATASTORE_KINDS: &[&str] = &[
    "DatastoreEvent",
    "DatastoreCapacityIncreasedEvent",
    "DatastoreDestroyedEvent",
    "DatastoreDuplicatedEvent",
    "DatastoreFileCopiedEvent",
    "DatastoreFileDeletedEvent",
    "DatastoreFileDownloadEvent",
    "DatastoreFileEvent",
    "DatastoreFileMovedEvent",
    "DatastoreFileUploadEvent",
    "DatastoreIORMReconfiguredEvent",
    "DatastoreRenamedEvent",
    "NonVIWorkloadDetectedOnDatastoreEvent",
];

/// `HostEvent` and its subtypes, including the DRS standby,
/// HA agent and DVS health check events raised against a host
pub const HOST_KINDS: &[&str] = &[
    "HostEvent",
    "AccountCreatedEvent",
    "AccountRemovedEvent",
    "AccountUpdatedEvent",
    "AdminPasswordNotChangedEvent",
    "CanceledHostOperationEvent",
    "DatastoreDiscoveredEvent",
    "DatastorePrincipalConfigured",
    "DatastoreRemovedOnHostEvent",
    "DatastoreRenamedOnHostEvent",
    "DrsEnteredStandbyModeEvent",
    "DrsEnteringStandbyModeEvent",
    "DrsExitedStandbyModeEvent",
    "DrsExitingStandbyModeEvent",
    "DrsResourceConfigureFailedEvent",
    "DrsResourceConfigureSyncedEvent",
    "DuplicateIpDetectedEvent",
    "DvsHealthStatusChangeEvent",
    "EnteredMaintenanceModeEvent",
    "EnteredStandbyModeEvent",
    "EnteringMaintenanceModeEvent",
    "EnteringStandbyModeEvent",
    "ExitMaintenanceModeEvent",
    "ExitStandbyModeFailedEvent",
    "ExitedStandbyModeEvent",
    "ExitingStandbyModeEvent",
    "GeneralHostErrorEvent",
    "GeneralHostInfoEvent",
    "GeneralHostWarningEvent",
    "HostAddFailedEvent",
    "HostAddedEvent",
    "HostAdminDisableEvent",
    "HostAdminEnableEvent",
    "HostCnxFailedAccountFailedEvent",
    "HostCnxFailedAlreadyManagedEvent",
    "HostCnxFailedBadCcagentEvent",
    "HostCnxFailedBadUsernameEvent",
    "HostCnxFailedBadVersionEvent",
    "HostCnxFailedCcagentUpgradeEvent",
    "HostCnxFailedEvent",
    "HostCnxFailedNetworkErrorEvent",
    "HostCnxFailedNoAccessEvent",
    "HostCnxFailedNoConnectionEvent",
    "HostCnxFailedNoLicenseEvent",
    "HostCnxFailedNotFoundEvent",
    "HostCnxFailedTimeoutEvent",
    "HostComplianceCheckedEvent",
    "HostCompliantEvent",
    "HostConfigAppliedEvent",
    "HostConnectedEvent",
    "HostConnectionLostEvent",
    "HostDasDisabledEvent",
    "HostDasDisablingEvent",
    "HostDasEnabledEvent",
    "HostDasEnablingEvent",
    "HostDasErrorEvent",
    "HostDasEvent",
    "HostDisconnectedEvent",
    "HostEnableAdminFailedEvent",
    "HostExtraNetworksEvent",
    "HostGetShortNameFailedEvent",
    "HostInAuditModeEvent",
    "HostIpChangedEvent",
    "HostIpInconsistentEvent",
    "HostIpToShortNameFailedEvent",
    "HostIsolationIpPingFailedEvent",
    "HostLicenseExpiredEvent",
    "HostLocalPortCreatedEvent",
    "HostMissingNetworksEvent",
    "HostNoAvailableNetworksEvent",
    "HostNoHAEnabledPortGroupsEvent",
    "HostNoRedundantManagementNetworkEvent",
    "HostNonCompliantEvent",
    "HostNotInClusterEvent",
    "HostPrimaryAgentNotShortNameEvent",
    "HostProfileAppliedEvent",
    "HostReconnectionFailedEvent",
    "HostRemovedEvent",
    "HostShortNameInconsistentEvent",
    "HostShortNameToIpFailedEvent",
    "HostShutdownEvent",
    "HostSpecificationChangedEvent",
    "HostSpecificationRequireEvent",
    "HostSpecificationUpdateEvent",
    "HostSubSpecificationDeleteEvent",
    "HostSubSpecificationUpdateEvent",
    "HostSyncFailedEvent",
    "HostUpgradeFailedEvent",
    "HostUserWorldSwapNotEnabledEvent",
    "HostVnicConnectedToCustomizedDVPortEvent",
    "HostWwnChangedEvent",
    "HostWwnConflictEvent",
    "IncorrectHostInformationEvent",
    "LocalDatastoreCreatedEvent",
    "LocalTSMEnabledEvent",
    "MtuMatchEvent",
    "MtuMismatchEvent",
    "NASDatastoreCreatedEvent",
    "NoDatastoresConfiguredEvent",
    "RemoteTSMEnabledEvent",
    "TeamingMatchEvent",
    "TeamingMisMatchEvent",
    "TimedOutHostOperationEvent",
    "UplinkPortMtuNotSupportEvent",
    "UplinkPortMtuSupportEvent",
    "UplinkPortVlanTrunkedEvent",
    "UplinkPortVlanUntrunkedEvent",
    "UserAssignedToGroup",
    "UserPasswordChanged",
    "UserUnassignedFromGroup",
    "VMFSDatastoreCreatedEvent",
    "VMFSDatastoreExpandedEvent",
    "VMFSDatastoreExtendedEvent",
    "VcAgentUninstallFailedEvent",
    "VcAgentUninstalledEvent",
    "VcAgentUpgradeFailedEvent",
    "VcAgentUpgradedEvent",
    "VimAccountPasswordChangedEvent",
];

/// `ResourcePoolEvent` and its subtypes
pub const RESOURCE_POOL_KINDS: &[&str] = &[
    "ResourcePoolEvent",
    "ResourcePoolCreatedEvent",
    "ResourcePoolDestroyedEvent",
    "ResourcePoolMovedEvent",
    "ResourcePoolReconfiguredEvent",
    "ResourceViolatedEvent",
];

/// `VmEvent` and its subtypes, including customization, migration
/// and DRS rule events raised against a virtual machine
pub const VM_KINDS: &[&str] = &[
    "VmEvent",
    "CustomizationEvent",
    "CustomizationFailed",
    "CustomizationLinuxIdentityFailed",
    "CustomizationNetworkSetupFailed",
    "CustomizationStartedEvent",
    "CustomizationSucceeded",
    "CustomizationSysprepFailed",
    "CustomizationUnknownFailure",
    "DrsRuleComplianceEvent",
    "DrsRuleViolationEvent",
    "DrsSoftRuleViolationEvent",
    "DrsVmMigratedEvent",
    "DrsVmPoweredOnEvent",
    "MigrationErrorEvent",
    "MigrationEvent",
    "MigrationHostErrorEvent",
    "MigrationHostWarningEvent",
    "MigrationResourceErrorEvent",
    "MigrationResourceWarningEvent",
    "MigrationWarningEvent",
    "NoMaintenanceModeDrsRecommendationForVM",
    "NotEnoughResourcesToStartVmEvent",
    "VmAcquiredMksTicketEvent",
    "VmAcquiredTicketEvent",
    "VmAutoRenameEvent",
    "VmBeingClonedEvent",
    "VmBeingClonedNoFolderEvent",
    "VmBeingCreatedEvent",
    "VmBeingDeployedEvent",
    "VmBeingHotMigratedEvent",
    "VmBeingMigratedEvent",
    "VmBeingRelocatedEvent",
    "VmCloneEvent",
    "VmCloneFailedEvent",
    "VmClonedEvent",
    "VmConfigMissingEvent",
    "VmConnectedEvent",
    "VmCreatedEvent",
    "VmDasBeingResetEvent",
    "VmDasBeingResetWithScreenshotEvent",
    "VmDasResetFailedEvent",
    "VmDasUpdateErrorEvent",
    "VmDasUpdateOkEvent",
    "VmDateRolledBackEvent",
    "VmDeployFailedEvent",
    "VmDeployedEvent",
    "VmDisconnectedEvent",
    "VmDiscoveredEvent",
    "VmDiskFailedEvent",
    "VmEmigratingEvent",
    "VmEndRecordingEvent",
    "VmEndReplayingEvent",
    "VmFailedMigrateEvent",
    "VmFailedRelayoutEvent",
    "VmFailedRelayoutOnVmfs2DatastoreEvent",
    "VmFailedStartingSecondaryEvent",
    "VmFailedToPowerOffEvent",
    "VmFailedToPowerOnEvent",
    "VmFailedToRebootGuestEvent",
    "VmFailedToResetEvent",
    "VmFailedToShutdownGuestEvent",
    "VmFailedToStandbyGuestEvent",
    "VmFailedToSuspendEvent",
    "VmFailedUpdatingSecondaryConfig",
    "VmFailoverFailed",
    "VmFaultToleranceStateChangedEvent",
    "VmFaultToleranceTurnedOffEvent",
    "VmFaultToleranceVmTerminatedEvent",
    "VmGuestOSCrashedEvent",
    "VmGuestRebootEvent",
    "VmGuestShutdownEvent",
    "VmGuestStandbyEvent",
    "VmInstanceUuidAssignedEvent",
    "VmInstanceUuidChangedEvent",
    "VmInstanceUuidConflictEvent",
    "VmMacAssignedEvent",
    "VmMacChangedEvent",
    "VmMacConflictEvent",
    "VmMaxFTRestartCountReached",
    "VmMaxRestartCountReached",
    "VmMessageErrorEvent",
    "VmMessageEvent",
    "VmMessageWarningEvent",
    "VmMigratedEvent",
    "VmNoCompatibleHostForSecondaryEvent",
    "VmNoNetworkAccessEvent",
    "VmOrphanedEvent",
    "VmPowerOffOnIsolationEvent",
    "VmPoweredOffEvent",
    "VmPoweredOnEvent",
    "VmPoweringOnWithCustomizedDVPortEvent",
    "VmPrimaryFailoverEvent",
    "VmReconfiguredEvent",
    "VmRegisteredEvent",
    "VmRelayoutSuccessfulEvent",
    "VmRelayoutUpToDateEvent",
    "VmReloadFromPathEvent",
    "VmReloadFromPathFailedEvent",
    "VmRelocateFailedEvent",
    "VmRelocateSpecEvent",
    "VmRelocatedEvent",
    "VmRemoteConsoleConnectedEvent",
    "VmRemoteConsoleDisconnectedEvent",
    "VmRemovedEvent",
    "VmRenamedEvent",
    "VmRequirementsExceedCurrentEVCModeEvent",
    "VmResettingEvent",
    "VmResourcePoolMovedEvent",
    "VmResourceReallocatedEvent",
    "VmRestartedOnAlternateHostEvent",
    "VmResumingEvent",
    "VmSecondaryAddedEvent",
    "VmSecondaryDisabledBySystemEvent",
    "VmSecondaryDisabledEvent",
    "VmSecondaryEnabledEvent",
    "VmSecondaryStartedEvent",
    "VmShutdownOnIsolationEvent",
    "VmStartRecordingEvent",
    "VmStartReplayingEvent",
    "VmStartingEvent",
    "VmStartingSecondaryEvent",
    "VmStaticMacConflictEvent",
    "VmStoppingEvent",
    "VmSuspendedEvent",
    "VmSuspendingEvent",
    "VmTimedoutStartingSecondaryEvent",
    "VmUnsupportedStartingEvent",
    "VmUpgradeCompleteEvent",
    "VmUpgradeFailedEvent",
    "VmUpgradingEvent",
    "VmUuidAssignedEvent",
    "VmUuidChangedEvent",
    "VmUuidConflictEvent",
    "VmWwnAssignedEvent",
    "VmWwnChangedEvent",
    "VmWwnConflictEvent",
];

static INDEX: OnceLock<HashMap<&'static str, EventFamily>> = OnceLock::new();

fn index() -> &'static HashMap<&'static str, EventFamily> {
    INDEX.get_or_init(|| {
        EventFamily::CLASSIFIED
            .into_iter()
            .flat_map(|family| family.kinds().iter().map(move |kind| (*kind, family)))
            .collect()
    })
}

impl EventFamily {
    /// Families that carry a subject, in precedence order
    pub const CLASSIFIED: [EventFamily; 5] = [
        EventFamily::Alarm,
        EventFamily::Datastore,
        EventFamily::Host,
        EventFamily::ResourcePool,
        EventFamily::Vm,
    ];

    /// Look up the family of an event kind
    pub fn of_kind(kind: &str) -> Self {
        index().get(kind).copied().unwrap_or(EventFamily::General)
    }

    /// Kind names catalogued under this family
    pub fn kinds(&self) -> &'static [&'static str] {
        match self {
            EventFamily::Alarm => ALARM_KINDS,
            EventFamily::Datastore => DATASTORE_KINDS,
            EventFamily::Host => HOST_KINDS,
            EventFamily::ResourcePool => RESOURCE_POOL_KINDS,
            EventFamily::Vm => VM_KINDS,
            EventFamily::General => &[],
        }
    }

    /// Wire name of the argument this family reads its subject from
    pub fn argument_name(&self) -> Option<&'static str> {
        match self {
            EventFamily::Alarm => Some("alarm"),
            EventFamily::Datastore => Some("datastore"),
            EventFamily::Host => Some("host"),
            EventFamily::ResourcePool => Some("resourcePool"),
            EventFamily::Vm => Some("vm"),
            EventFamily::General => None,
        }
    }
}
