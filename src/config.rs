// Copyright (c) 2025 - Cowboy AI, Inc.
//! Connector configuration from environment variables

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::credentials::BasicAuthCredentials;
use crate::dispatch::{DispatchConfig, GatewayConfig};
use crate::errors::{BridgeError, BridgeResult};
use crate::events::ManagedObjectReference;
use crate::feed::JetStreamFeedConfig;
use crate::nats::NatsConfig;

/// Managed object type of the inventory root
pub const ROOT_FOLDER_TYPE: &str = "Folder";

/// Default mount path of the gateway secrets
pub const DEFAULT_SECRET_MOUNT_PATH: &str = "/var/openfaas/secrets";

/// Complete connector configuration
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// vCenter endpoint with credentials removed, stamped on every message
    pub source: String,
    pub nats: NatsConfig,
    pub feed: JetStreamFeedConfig,
    /// Subject answering description table requests
    pub description_subject: String,
    /// Scope the subscription starts from
    pub root_folder: ManagedObjectReference,
    pub gateway: GatewayConfig,
    pub dispatch: DispatchConfig,
    /// Log function response bodies
    pub print_response: bool,
    /// How long shutdown waits for in-flight work
    pub shutdown_grace: Duration,
}

impl BridgeConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> BridgeResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`; unset and empty values take defaults
    pub fn from_lookup<F>(lookup: F) -> BridgeResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let vcenter_url = var("VCENTER_URL")
            .ok_or_else(|| BridgeError::Configuration("VCENTER_URL not set".to_string()))?;
        let source = normalize_source(&vcenter_url)?;

        let nats = NatsConfig {
            servers: var("NATS_URL")
                .unwrap_or_else(|| "nats://localhost:4222".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            ..NatsConfig::default()
        };

        let feed = JetStreamFeedConfig {
            stream_name: var("NATS_STREAM").unwrap_or_else(|| "VCENTER_EVENTS".to_string()),
            consumer_name: var("NATS_CONSUMER").unwrap_or_else(|| "vcenter-connector".to_string()),
            subject_prefix: var("EVENT_SUBJECT_PREFIX")
                .unwrap_or_else(|| "vcenter.events".to_string()),
            ..JetStreamFeedConfig::default()
        };

        let description_subject =
            var("DESCRIPTION_SUBJECT").unwrap_or_else(|| "vcenter.description.events".to_string());

        let root_folder = ManagedObjectReference::new(
            ROOT_FOLDER_TYPE,
            var("ROOT_FOLDER").unwrap_or_else(|| "group-d1".to_string()),
        );

        let credentials = if flag(&var, "basic_auth")? {
            let dir = var("secret_mount_path")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SECRET_MOUNT_PATH));
            Some(BasicAuthCredentials::read_from_dir(dir)?)
        } else {
            None
        };

        let gateway = GatewayConfig {
            url: var("OPENFAAS_URL").unwrap_or_else(|| "http://gateway:8080".to_string()),
            timeout: Duration::from_secs(positive(&var, "UPSTREAM_TIMEOUT_SECS", 15)?),
            credentials,
        };

        let dispatch = DispatchConfig {
            queue_capacity: positive(&var, "DISPATCH_QUEUE_CAPACITY", 256)? as usize,
            rebuild_interval: Duration::from_secs(positive(&var, "REBUILD_INTERVAL_SECS", 10)?),
        };

        Ok(Self {
            source,
            nats,
            feed,
            description_subject,
            root_folder,
            gateway,
            dispatch,
            print_response: flag(&var, "PRINT_RESPONSE")?,
            shutdown_grace: Duration::from_secs(parse_or(&var, "SHUTDOWN_GRACE_SECS", 5u64)?),
        })
    }
}

/// Turn a `user:password@host:port` style endpoint into the source address
///
/// Adds the `https` scheme and `/sdk` path when missing and drops any
/// credentials.
pub fn normalize_source(raw: &str) -> BridgeResult<String> {
    let raw = raw.trim();
    let (scheme, rest) = match raw.split_once("://") {
        Some((scheme, rest)) if !scheme.is_empty() => (scheme, rest),
        Some(_) => return Err(BridgeError::Configuration(format!("invalid vCenter URL: {}", raw))),
        None => ("https", raw),
    };

    let (authority, path) = match rest.find('/') {
        Some(idx) => rest.split_at(idx),
        None => (rest, ""),
    };
    let host = authority.rsplit_once('@').map_or(authority, |(_, host)| host);
    if host.is_empty() {
        return Err(BridgeError::Configuration(format!("invalid vCenter URL: {}", raw)));
    }

    let path = if path.is_empty() || path == "/" { "/sdk" } else { path };
    Ok(format!("{}://{}{}", scheme, host, path))
}

fn parse_or<T, V>(var: &V, key: &str, default: T) -> BridgeResult<T>
where
    T: FromStr,
    V: Fn(&str) -> Option<String>,
{
    match var(key) {
        None => Ok(default),
        Some(value) => parse_value(key, value.trim()),
    }
}

fn positive<V>(var: &V, key: &str, default: u64) -> BridgeResult<u64>
where
    V: Fn(&str) -> Option<String>,
{
    let value = parse_or(var, key, default)?;
    if value == 0 {
        return Err(BridgeError::Configuration(format!("{} must be greater than zero", key)));
    }
    Ok(value)
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> BridgeResult<T> {
    value
        .parse()
        .map_err(|_| BridgeError::Configuration(format!("invalid value for {}: {}", key, value)))
}

/// Booleans accept `true`/`false` and `1`/`0`
fn flag<V>(var: &V, key: &str) -> BridgeResult<bool>
where
    V: Fn(&str) -> Option<String>,
{
    match var(key).as_deref().map(str::trim) {
        None => Ok(false),
        Some("1") => Ok(true),
        Some("0") => Ok(false),
        Some(value) => parse_value(key, &value.to_ascii_lowercase()),
    }
}
