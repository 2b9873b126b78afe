// Copyright (c) 2025 - Cowboy AI, Inc.
//! vCenter Connector Service
//!
//! Streams vCenter events from NATS JetStream and invokes the OpenFaaS
//! functions subscribed to each event's topic:
//! - vCenter → collector → JetStream → StreamConsumer → gateway → functions
//!
//! Run with: cargo run --bin vcenter-connector
//!
//! Prerequisites:
//! 1. NATS server running (default: localhost:4222)
//! 2. vCenter collector publishing under `vcenter.events.>`
//! 3. OpenFaaS gateway reachable (via OPENFAAS_URL environment variable)

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{error, info, warn};
use vcenter_connector::{
    category::{DescriptionClassifier, NatsDescriptionSource},
    dispatch::{HttpGateway, LoggingObserver, QueuedDispatcher, ResponseObserver, TopicMap},
    feed::JetStreamEventFeed,
    lifetime::join_within,
    BridgeConfig, EventTranscoder, Lifetime, NatsClient, StreamConsumer,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("🚀 Starting vCenter Connector");

    // Load configuration
    let config = BridgeConfig::from_env().context("Failed to load configuration")?;
    info!("📋 Configuration loaded:");
    info!("  - Source: {}", config.source);
    info!("  - NATS: {:?}", config.nats.servers);
    info!("  - Stream: {}", config.feed.stream_name);
    info!("  - Gateway: {}", config.gateway.url);
    info!("  - Basic auth: {}", config.gateway.credentials.is_some());

    // Connect to NATS
    let client = NatsClient::new(config.nats.clone())
        .await
        .context("Failed to connect to NATS")?;
    info!("✅ Connected to NATS");

    let lifetime = Lifetime::new();

    // Dispatcher
    let gateway = HttpGateway::new(config.gateway.clone()).context("Failed to create gateway client")?;
    let observers: Vec<Arc<dyn ResponseObserver>> =
        vec![Arc::new(LoggingObserver::new(config.print_response))];
    let (dispatcher, dispatch_handle) = QueuedDispatcher::start(
        Arc::new(gateway),
        Arc::new(TopicMap::new()),
        observers,
        config.dispatch.clone(),
        lifetime.clone(),
    );

    // Transcoder and feed
    let classifier = DescriptionClassifier::new(NatsDescriptionSource::new(
        client.clone(),
        config.description_subject.clone(),
    ));
    let transcoder = EventTranscoder::new(Arc::new(classifier), config.source.clone());
    let feed = JetStreamEventFeed::new(&client, config.feed.clone());

    let consumer = StreamConsumer::new(Arc::new(feed), transcoder, Arc::new(dispatcher));

    info!("🎧 Subscribing from {}", config.root_folder);
    let root = config.root_folder.clone();
    let subscription_lifetime = lifetime.clone();
    let subscription =
        tokio::spawn(async move { consumer.run(subscription_lifetime, root).await });

    let signal_lifetime = lifetime.clone();
    tokio::spawn(async move {
        wait_for_signal().await;
        signal_lifetime.cancel();
    });

    lifetime.cancelled().await;
    info!("🛑 Shutting down");

    let outcome = match join_within(subscription, config.shutdown_grace).await {
        Some(Ok(result)) => result.map_err(anyhow::Error::from),
        Some(Err(e)) => Err(anyhow::anyhow!("subscription task failed: {}", e)),
        None => {
            warn!("⚠️ Subscription did not stop within {:?}, aborted", config.shutdown_grace);
            Ok(())
        }
    };

    if !dispatch_handle.drain(config.shutdown_grace).await {
        warn!("⚠️ Pending invocations were dropped");
    }

    if let Err(e) = &outcome {
        error!("❌ {}", e);
    }
    info!("👋 vCenter Connector stopped");
    outcome
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(sigterm) => sigterm,
        Err(e) => {
            warn!("Failed to register SIGTERM handler: {}", e);
            let _ = tokio::signal::ctrl_c().await;
            info!("Received SIGINT");
            return;
        }
    };

    tokio::select! {
        _ = sigterm.recv() => info!("Received SIGTERM"),
        _ = tokio::signal::ctrl_c() => info!("Received SIGINT"),
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Received SIGINT");
}
