// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the Lampion controller.
//!
//! This module provides the error hierarchy for the three failure classes
//! the supervisor distinguishes: configuration errors (fatal before any
//! network activity), protocol errors (fatal during startup, absorbed and
//! retried in the steady state), and payload decode errors (logged and
//! discarded, never fatal).

use thiserror::Error;

/// The main error type for this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Error in the startup configuration.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Error during network or broker communication.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Error while decoding an inbound payload.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

/// Errors in the environment-provided configuration.
///
/// All of these abort startup before any network activity.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required setting is absent from the environment.
    #[error("missing required setting: {0}")]
    MissingSetting(&'static str),

    /// A setting is present but cannot be used.
    #[error("invalid setting {name}: {message}")]
    InvalidSetting {
        /// The environment variable that failed validation.
        name: &'static str,
        /// Description of the validation failure.
        message: String,
    },
}

/// Errors related to network and broker communication.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// MQTT client request failed.
    #[error("MQTT error: {0}")]
    Mqtt(#[from] rumqttc::ClientError),

    /// The broker connection failed or was lost.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Network association failed.
    #[error("network join failed: {0}")]
    NetworkJoinFailed(String),

    /// An operation did not complete within its deadline.
    #[error("timed out after {0} ms")]
    Timeout(u64),

    /// Invalid broker URL or address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

/// Errors while decoding inbound command payloads.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Payload was valid JSON but carried no recognized keys.
    #[error("no recognized keys in payload")]
    EmptyCommand,

    /// A bare-string payload was not a recognized token.
    #[error("unrecognized token: {0}")]
    UnknownToken(String),

    /// Payload was not valid UTF-8.
    #[error("payload is not valid UTF-8")]
    NotUtf8,

    /// A field was present but held an unusable value.
    #[error("failed to parse {field}: {message}")]
    InvalidValue {
        /// The field that failed to parse.
        field: &'static str,
        /// Description of the parsing failure.
        message: String,
    },
}

/// A specialized Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
