// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the Calaos bridge.
//!
//! This module provides the error hierarchy used across the library:
//! transport failures, wire-frame parsing, device state decoding, and
//! configuration loading. Nothing in this hierarchy is fatal to a running
//! session; transport failures are retried transparently and decode
//! failures drop the offending frame or value.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred on the websocket transport.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Error occurred while parsing a wire frame.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Error occurred while decoding a device state value.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Error occurred while loading the configuration.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The accessory hosting collaborator failed to start serving.
    #[error("hosting error: {0}")]
    Host(String),
}

/// Errors related to the websocket transport.
///
/// These are always retried transparently by the client's reconnect loop;
/// callers only ever see the single failed call's error.
#[derive(Debug, Error)]
pub enum TransportError {
    /// No live connection is available.
    #[error("websocket is not connected")]
    NotConnected,

    /// The underlying websocket operation failed.
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// The remote endpoint closed the connection.
    #[error("connection closed by remote")]
    ConnectionClosed,

    /// An internal channel was closed.
    #[error("channel closed: {0}")]
    ChannelClosed(String),
}

/// Errors related to parsing inbound wire frames.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Expected field is missing from the frame.
    #[error("missing field in frame: {0}")]
    MissingField(String),

    /// Unexpected frame format.
    #[error("unexpected frame format: {0}")]
    UnexpectedFormat(String),
}

/// Errors related to decoding device state strings.
///
/// Calaos encodes device state as free-form strings; these errors cover
/// the per-kind decode failures. Policy on failure is kind-dependent:
/// some adapters keep the prior value and report the error, others fall
/// back to a default.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: i64,
        /// Maximum allowed value.
        max: i64,
        /// The actual value that was provided.
        actual: i64,
    },

    /// A state string could not be parsed as a number.
    #[error("invalid numeric state: {0:?}")]
    InvalidNumber(String),

    /// A state string could not be parsed as a boolean.
    #[error("invalid boolean state: {0:?}")]
    InvalidBoolean(String),

    /// A command-style state string does not follow the expected grammar.
    #[error("invalid command state: {0:?}")]
    InvalidCommandState(String),
}

/// Errors related to loading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid JSON.
    #[error("failed to decode configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_error_display() {
        assert_eq!(
            TransportError::NotConnected.to_string(),
            "websocket is not connected"
        );
    }

    #[test]
    fn value_error_display() {
        let err = ValueError::OutOfRange {
            min: 0,
            max: 100,
            actual: 150,
        };
        assert_eq!(err.to_string(), "value 150 is out of range [0, 100]");
    }

    #[test]
    fn error_from_value_error() {
        let err: Error = ValueError::InvalidNumber("abc".to_string()).into();
        assert!(matches!(err, Error::Value(ValueError::InvalidNumber(_))));
    }

    #[test]
    fn parse_error_display() {
        let err = ParseError::MissingField("msg".to_string());
        assert_eq!(err.to_string(), "missing field in frame: msg");
    }
}
