// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Topic Derivation
//!
//! These tests prove properties that must hold for every kind name:
//! - Derivation is deterministic
//! - Derivation is idempotent: a topic maps to itself
//! - Topics only contain lowercase segments joined by single dots
//! - Segmentation never drops or reorders characters

use proptest::prelude::*;

use vcenter_connector::topic::{derive_topic, split_camel_case, EVENT_SUFFIX};

/// Camel-cased ASCII identifiers, optionally with the event suffix
fn kind_name() -> impl Strategy<Value = String> {
    ("[A-Za-z0-9]{0,32}", any::<bool>()).prop_map(|(stem, suffix)| {
        if suffix {
            format!("{}{}", stem, EVENT_SUFFIX)
        } else {
            stem
        }
    })
}

/// Kind names built from capitalized words and acronyms
fn structured_kind_name() -> impl Strategy<Value = String> {
    prop::collection::vec(prop_oneof!["[A-Z][a-z]{1,8}", "[A-Z]{2,4}"], 1..6)
        .prop_map(|words| format!("{}{}", words.concat(), EVENT_SUFFIX))
}

proptest! {
    #[test]
    fn prop_derivation_is_deterministic(kind in kind_name()) {
        prop_assert_eq!(derive_topic(&kind), derive_topic(&kind));
    }

    #[test]
    fn prop_derivation_is_idempotent(kind in kind_name()) {
        let once = derive_topic(&kind);
        let twice = derive_topic(once.as_str());
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_topic_charset(kind in kind_name()) {
        let topic = derive_topic(&kind);
        let text = topic.as_str();

        prop_assert!(text.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '.'));
        prop_assert!(!text.starts_with('.'));
        prop_assert!(!text.ends_with('.'));
        prop_assert!(!text.contains(".."));
    }

    #[test]
    fn prop_segmentation_preserves_characters(stem in "[A-Za-z0-9]{0,32}") {
        let words = split_camel_case(&stem);
        prop_assert_eq!(words.concat(), stem.to_lowercase());
        prop_assert!(words.iter().all(|w| !w.is_empty()));
    }

    #[test]
    fn prop_structured_names_split_per_word(kind in structured_kind_name()) {
        let topic = derive_topic(&kind);
        let stem = kind.strip_suffix(EVENT_SUFFIX).unwrap_or(&kind);
        let capitals = stem.chars().filter(|c| c.is_ascii_uppercase()).count();

        // Acronyms never split into more segments than there are capitals
        prop_assert!(topic.segments().count() >= 1);
        prop_assert!(topic.segments().count() <= capitals);
    }
}
