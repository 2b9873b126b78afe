// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests Module
//!
//! Properties of topic derivation that must hold for every kind name.

mod topic_derivation;
