// Copyright (c) 2025 - Cowboy AI, Inc.
//! OpenFaaS gateway client
//!
//! ```text
//! GET  {gateway}/system/functions   → [FunctionStatus]
//! POST {gateway}/function/{name}    ← event payload
//! ```

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{header::CONTENT_TYPE, Client, RequestBuilder};
use std::time::Duration;
use tracing::debug;

use super::topic_map::FunctionStatus;
use crate::credentials::BasicAuthCredentials;
use crate::errors::{BridgeError, BridgeResult};

/// Status and body returned by a function
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayReply {
    pub status: u16,
    pub body: Bytes,
}

/// Lists and invokes functions
#[async_trait]
pub trait FunctionGateway: Send + Sync {
    async fn list_functions(&self) -> BridgeResult<Vec<FunctionStatus>>;

    async fn invoke_function(&self, name: &str, payload: Bytes) -> BridgeResult<GatewayReply>;
}

/// Gateway connection settings
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub url: String,
    /// Per-request timeout
    pub timeout: Duration,
    pub credentials: Option<BasicAuthCredentials>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            url: "http://gateway:8080".to_string(),
            timeout: Duration::from_secs(15),
            credentials: None,
        }
    }
}

/// [`FunctionGateway`] over HTTP
pub struct HttpGateway {
    client: Client,
    config: GatewayConfig,
}

impl HttpGateway {
    pub fn new(config: GatewayConfig) -> BridgeResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| BridgeError::Configuration(format!("HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.url.trim_end_matches('/'), path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.credentials {
            Some(creds) => request.basic_auth(&creds.user, Some(&creds.password)),
            None => request,
        }
    }
}

#[async_trait]
impl FunctionGateway for HttpGateway {
    async fn list_functions(&self) -> BridgeResult<Vec<FunctionStatus>> {
        let response = self
            .authorize(self.client.get(self.url("system/functions")))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BridgeError::Gateway(format!(
                "listing functions returned {}: {}",
                status, body
            )));
        }

        let functions: Vec<FunctionStatus> = response.json().await?;
        debug!(count = functions.len(), "Listed functions");
        Ok(functions)
    }

    async fn invoke_function(&self, name: &str, payload: Bytes) -> BridgeResult<GatewayReply> {
        let response = self
            .authorize(self.client.post(self.url(&function_path(name))))
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.bytes().await?;
        Ok(GatewayReply { status, body })
    }
}

fn function_path(name: &str) -> String {
    format!("function/{}", urlencoding::encode(name))
}
