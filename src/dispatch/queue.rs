// Copyright (c) 2025 - Cowboy AI, Inc.
//! Queue-backed dispatcher
//!
//! `invoke` only enqueues. A worker task drains the queue, resolves the
//! topic's functions and calls them through the gateway; a second task
//! rebuilds the topic map on a fixed interval. Both stop when the lifetime
//! ends; the worker first finishes what is already queued.

use bytes::Bytes;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use super::gateway::FunctionGateway;
use super::topic_map::TopicMap;
use super::{Dispatcher, InvocationResponse, ResponseObserver};
use crate::errors::BridgeResult;
use crate::lifetime::{join_within, Lifetime};

/// Dispatcher tuning
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Invocations buffered before `invoke` starts dropping
    pub queue_capacity: usize,
    /// Interval between topic map rebuilds
    pub rebuild_interval: Duration,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 256,
            rebuild_interval: Duration::from_secs(10),
        }
    }
}

#[derive(Debug)]
struct Invocation {
    topic: String,
    payload: Bytes,
}

/// State shared by the dispatcher and its tasks
struct Shared {
    gateway: Arc<dyn FunctionGateway>,
    topic_map: Arc<TopicMap>,
    observers: Vec<Arc<dyn ResponseObserver>>,
}

impl Shared {
    fn notify(&self, response: &InvocationResponse) {
        for observer in &self.observers {
            observer.on_response(response);
        }
    }

    async fn rebuild(&self) -> BridgeResult<()> {
        let functions = self.gateway.list_functions().await?;
        self.topic_map.sync(&functions);
        Ok(())
    }

    async fn deliver(&self, invocation: Invocation) {
        let functions = self.topic_map.match_topic(&invocation.topic);
        if functions.is_empty() {
            debug!(topic = %invocation.topic, "No functions subscribed");
            return;
        }

        for function_name in functions {
            let started = Instant::now();
            let result = self
                .gateway
                .invoke_function(&function_name, invocation.payload.clone())
                .await;

            let response = match result {
                Ok(reply) => InvocationResponse {
                    function_name,
                    topic: invocation.topic.clone(),
                    status: Some(reply.status),
                    body: Some(reply.body),
                    error: None,
                    duration: started.elapsed(),
                },
                Err(e) => InvocationResponse {
                    function_name,
                    topic: invocation.topic.clone(),
                    status: None,
                    body: None,
                    error: Some(e.to_string()),
                    duration: started.elapsed(),
                },
            };
            self.notify(&response);
        }
    }
}

/// [`Dispatcher`] that hands invocations to a background worker
pub struct QueuedDispatcher {
    sender: mpsc::Sender<Invocation>,
    shared: Arc<Shared>,
}

/// Join handles of the dispatcher's background tasks
pub struct DispatchHandle {
    worker: JoinHandle<()>,
    rebuild: JoinHandle<()>,
}

impl QueuedDispatcher {
    /// Spawn the worker and rebuild tasks
    ///
    /// The first rebuild runs immediately.
    pub fn start(
        gateway: Arc<dyn FunctionGateway>,
        topic_map: Arc<TopicMap>,
        observers: Vec<Arc<dyn ResponseObserver>>,
        config: DispatchConfig,
        lifetime: Lifetime,
    ) -> (Self, DispatchHandle) {
        let (sender, receiver) = mpsc::channel(config.queue_capacity.max(1));
        let shared = Arc::new(Shared {
            gateway,
            topic_map,
            observers,
        });

        let worker = tokio::spawn(run_worker(shared.clone(), receiver, lifetime.clone()));
        let rebuild = tokio::spawn(run_rebuild(
            shared.clone(),
            config.rebuild_interval,
            lifetime,
        ));

        (Self { sender, shared }, DispatchHandle { worker, rebuild })
    }

    /// Rebuild the topic map now
    pub async fn rebuild(&self) -> BridgeResult<()> {
        self.shared.rebuild().await
    }

    pub fn topic_map(&self) -> &TopicMap {
        &self.shared.topic_map
    }

    fn reject(&self, topic: &str, reason: &str) {
        warn!(topic = %topic, reason, "Dropping invocation");
        self.shared.notify(&InvocationResponse {
            function_name: String::new(),
            topic: topic.to_string(),
            status: None,
            body: None,
            error: Some(format!("invocation dropped: {}", reason)),
            duration: Duration::ZERO,
        });
    }
}

impl Dispatcher for QueuedDispatcher {
    fn invoke(&self, topic: &str, payload: Bytes) {
        let invocation = Invocation {
            topic: topic.to_string(),
            payload,
        };

        match self.sender.try_send(invocation) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => self.reject(topic, "dispatch queue full"),
            Err(TrySendError::Closed(_)) => self.reject(topic, "dispatcher stopped"),
        }
    }
}

impl DispatchHandle {
    /// Wait up to `grace` for queued invocations to finish
    ///
    /// Returns `false` if the worker had to be aborted.
    pub async fn drain(self, grace: Duration) -> bool {
        self.rebuild.abort();

        match join_within(self.worker, grace).await {
            Some(_) => true,
            None => {
                warn!(grace_ms = grace.as_millis() as u64, "Dispatch queue not drained in time");
                false
            }
        }
    }
}

async fn run_worker(shared: Arc<Shared>, mut receiver: mpsc::Receiver<Invocation>, lifetime: Lifetime) {
    loop {
        let invocation = tokio::select! {
            biased;
            invocation = receiver.recv() => invocation,
            _ = lifetime.cancelled() => break,
        };

        match invocation {
            Some(invocation) => shared.deliver(invocation).await,
            None => return,
        }
    }

    receiver.close();
    let mut drained = 0usize;
    while let Some(invocation) = receiver.recv().await {
        shared.deliver(invocation).await;
        drained += 1;
    }
    info!(drained, "Dispatch worker stopped");
}

async fn run_rebuild(shared: Arc<Shared>, every: Duration, lifetime: Lifetime) {
    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = lifetime.cancelled() => return,
            _ = ticker.tick() => {}
        }

        if let Err(e) = shared.rebuild().await {
            warn!(error = %e, "Topic map rebuild failed");
        }
    }
}
