// Copyright (c) 2025 - Cowboy AI, Inc.

//! Topic derivation for vCenter events
//!
//! Functions subscribe to dotted, lowercase topics. The topic of an event is
//! derived from its kind name alone:
//!
//! ```text
//! VmPoweredOnEvent  →  VmPoweredOn  →  [Vm, Powered, On]  →  vm.powered.on
//! ```
//!
//! This allows for:
//! - Precise subscriptions (`vm.powered.on`)
//! - Family-level matching by the dispatcher (`vm.*`)
//!
//! # Examples
//!
//! ```rust
//! use vcenter_connector::topic::derive_topic;
//!
//! assert_eq!(derive_topic("VmPoweredOnEvent").as_str(), "vm.powered.on");
//! assert_eq!(derive_topic("SDKToStringEvent").as_str(), "sdk.to.string");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Suffix every vSphere event kind carries
pub const EVENT_SUFFIX: &str = "Event";

/// Separator between topic segments
pub const TOPIC_SEPARATOR: char = '.';

/// A dotted lowercase routing key
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Topic(String);

impl Topic {
    /// Borrow the topic as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the topic has no segments
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the word segments of the topic
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(TOPIC_SEPARATOR).filter(|s| !s.is_empty())
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Topic {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Derive the topic for an event kind name
///
/// Strips a trailing `Event` and splits the remainder on camel-case
/// boundaries. Pure and total.
pub fn derive_topic(kind: &str) -> Topic {
    let stem = kind.strip_suffix(EVENT_SUFFIX).unwrap_or(kind);
    let words = split_camel_case(stem);
    Topic(words.join(&TOPIC_SEPARATOR.to_string()))
}

/// Segmentation state while scanning a camel-cased identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment {
    /// No word has been started yet
    Start,
    /// Inside a word whose last character was not uppercase
    InWord,
    /// Inside a run of uppercase characters
    InAcronym,
}

/// Split a camel-cased identifier into lowercased words
///
/// A run of uppercase characters stays together as one word (`SDK`) unless a
/// lowercase character follows it, in which case the last uppercase
/// character opens the next word (`SDKTo` → `SDK`, `To`).
pub fn split_camel_case(src: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut word: Vec<char> = Vec::new();
    let mut state = Segment::Start;

    for c in src.chars() {
        state = match (state, classify(c)) {
            (Segment::InAcronym, CharClass::Upper) => {
                word.push(c);
                Segment::InAcronym
            }
            (_, CharClass::Upper) => {
                flush(&mut words, &mut word);
                word.push(c);
                Segment::InAcronym
            }
            (Segment::InAcronym, CharClass::Lower) if word.len() >= 2 => {
                // The last capital belongs to the word that starts here.
                let head = word.pop();
                flush(&mut words, &mut word);
                word.extend(head);
                word.push(c);
                Segment::InWord
            }
            (_, CharClass::Lower | CharClass::Other) => {
                word.push(c);
                Segment::InWord
            }
        };
    }
    flush(&mut words, &mut word);

    words
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Upper,
    Lower,
    Other,
}

fn classify(c: char) -> CharClass {
    if c.is_uppercase() {
        CharClass::Upper
    } else if c.is_lowercase() {
        CharClass::Lower
    } else {
        CharClass::Other
    }
}

fn flush(words: &mut Vec<String>, word: &mut Vec<char>) {
    if !word.is_empty() {
        let text: String = word.drain(..).collect();
        words.push(text.to_lowercase());
    }
}
