// Copyright (c) 2025 - Cowboy AI, Inc.
//! Event decoding and outbound message tests

mod outbound_messages;
mod wire_decoding;
