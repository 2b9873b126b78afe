// Copyright (c) 2025 - Cowboy AI, Inc.
//! Topic → function routing table
//!
//! Functions declare the topics they want in a comma-separated `topic`
//! annotation. The map is rebuilt wholesale from each function listing.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::debug;

/// Annotation carrying a function's topics
pub const TOPIC_ANNOTATION: &str = "topic";

/// A deployed function as listed by the gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionStatus {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<HashMap<String, String>>,
}

impl FunctionStatus {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            annotations: None,
        }
    }

    /// Attach a topic annotation
    pub fn with_topics(mut self, topics: impl Into<String>) -> Self {
        self.annotations
            .get_or_insert_with(HashMap::new)
            .insert(TOPIC_ANNOTATION.to_string(), topics.into());
        self
    }

    /// Topics the function subscribes to
    pub fn topics(&self) -> Vec<&str> {
        self.annotations
            .as_ref()
            .and_then(|a| a.get(TOPIC_ANNOTATION))
            .map(|topics| {
                topics
                    .split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Thread-safe topic → function names table
#[derive(Debug, Default)]
pub struct TopicMap {
    routes: RwLock<HashMap<String, Vec<String>>>,
}

impl TopicMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the table with routes built from `functions`
    pub fn sync(&self, functions: &[FunctionStatus]) {
        let mut routes: HashMap<String, Vec<String>> = HashMap::new();
        for function in functions {
            for topic in function.topics() {
                let names = routes.entry(topic.to_string()).or_default();
                if !names.contains(&function.name) {
                    names.push(function.name.clone());
                }
            }
        }

        debug!(topics = routes.len(), functions = functions.len(), "Rebuilt topic map");

        let mut guard = match self.routes.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = routes;
    }

    /// Functions subscribed to `topic`
    pub fn match_topic(&self, topic: &str) -> Vec<String> {
        let guard = match self.routes.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.get(topic).cloned().unwrap_or_default()
    }

    /// All topics with at least one subscriber, sorted
    pub fn topics(&self) -> Vec<String> {
        let guard = match self.routes.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let mut topics: Vec<String> = guard.keys().cloned().collect();
        topics.sort();
        topics
    }
}
