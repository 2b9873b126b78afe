// Copyright (c) 2025 - Cowboy AI, Inc.
//! Function dispatch
//!
//! The dispatcher maps a topic to the functions subscribed to it and invokes
//! them. Invocation is fire-and-forget from the caller's point of view: the
//! outcome of each call is reported to [`ResponseObserver`]s.
//!
//! ```text
//! invoke(topic, payload) → queue → worker → TopicMap::match_topic(topic)
//!                                              ↓
//!                                   FunctionGateway::invoke_function
//!                                              ↓
//!                                   ResponseObserver::on_response
//! ```

pub mod gateway;
pub mod queue;
pub mod topic_map;

use bytes::Bytes;
use std::time::Duration;
use tracing::{error, info};

pub use gateway::{FunctionGateway, GatewayConfig, GatewayReply, HttpGateway};
pub use queue::{DispatchConfig, DispatchHandle, QueuedDispatcher};
pub use topic_map::{FunctionStatus, TopicMap, TOPIC_ANNOTATION};

/// Hands transcoded events to functions
pub trait Dispatcher: Send + Sync {
    /// Queue an invocation of every function subscribed to `topic`
    fn invoke(&self, topic: &str, payload: Bytes);
}

/// Outcome of one function invocation
#[derive(Debug, Clone, PartialEq)]
pub struct InvocationResponse {
    /// Empty when the invocation never reached a function
    pub function_name: String,
    pub topic: String,
    pub status: Option<u16>,
    pub body: Option<Bytes>,
    pub error: Option<String>,
    pub duration: Duration,
}

impl InvocationResponse {
    /// Whether the function answered with a 2xx status
    pub fn is_success(&self) -> bool {
        self.error.is_none() && matches!(self.status, Some(200..=299))
    }
}

/// Receives invocation outcomes
pub trait ResponseObserver: Send + Sync {
    fn on_response(&self, response: &InvocationResponse);
}

/// Logs every invocation outcome
#[derive(Debug, Clone, Default)]
pub struct LoggingObserver {
    print_response: bool,
}

impl LoggingObserver {
    /// With `print_response` set, response bodies are logged too
    pub fn new(print_response: bool) -> Self {
        Self { print_response }
    }
}

impl ResponseObserver for LoggingObserver {
    fn on_response(&self, response: &InvocationResponse) {
        if let Some(err) = &response.error {
            error!(
                function = %response.function_name,
                topic = %response.topic,
                error = %err,
                "Function invocation failed"
            );
            return;
        }

        info!(
            function = %response.function_name,
            topic = %response.topic,
            status = response.status.unwrap_or_default(),
            duration_ms = response.duration.as_millis() as u64,
            "Function invoked"
        );

        if self.print_response {
            if let Some(body) = &response.body {
                info!(
                    function = %response.function_name,
                    body = %String::from_utf8_lossy(body),
                    "Function response"
                );
            }
        }
    }
}
