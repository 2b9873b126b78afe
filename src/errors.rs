// Copyright (c) 2025 - Cowboy AI, Inc.
//! Error types for the event bridge

use thiserror::Error;

/// Errors that can occur while bridging events to the dispatcher
///
/// The first three variants are per-event: the stream consumer logs them and
/// moves on to the next event. `SubscriptionFailed` ends the session.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// A null or malformed event reached the transcoder
    #[error("invalid event: {0}")]
    InvalidEvent(String),

    /// The category lookup collaborator failed
    #[error("error retrieving event category: {0}")]
    CategoryLookupFailed(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The outbound message could not be encoded
    #[error("error marshaling outbound event: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    /// The upstream feed rejected the subscription or failed mid-stream
    #[error("error connecting to event-stream: {0}")]
    SubscriptionFailed(String),

    /// NATS connection error
    #[error("NATS connection error: {0}")]
    NatsConnection(String),

    /// NATS request/reply error
    #[error("NATS request error: {0}")]
    NatsRequest(String),

    /// Function gateway error
    #[error("gateway error: {0}")]
    Gateway(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Timeout error
    #[error("operation timed out: {0}")]
    Timeout(String),
}

impl BridgeError {
    /// Whether the error ends the subscription rather than a single event
    pub fn is_fatal(&self) -> bool {
        matches!(self, BridgeError::SubscriptionFailed(_))
    }
}

/// Result type for bridge operations
pub type BridgeResult<T> = Result<T, BridgeError>;

impl From<async_nats::Error> for BridgeError {
    fn from(err: async_nats::Error) -> Self {
        BridgeError::NatsConnection(err.to_string())
    }
}

impl From<reqwest::Error> for BridgeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            BridgeError::Timeout(err.to_string())
        } else {
            BridgeError::Gateway(err.to_string())
        }
    }
}
