// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Protocol error types.

use thiserror::Error;

/// Errors raised while decoding or encoding protocol lines.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The line is not valid JSON.
    #[error("Malformed line: {0}")]
    Malformed(#[source] serde_json::Error),

    /// The line's bytes are not UTF-8.
    #[error("Line is not valid UTF-8: {0}")]
    InvalidEncoding(String),

    /// The line is JSON but not an object.
    #[error("Message is not a JSON object")]
    NotAnObject,

    /// No string `type` field.
    #[error("Message has no `type` field")]
    MissingKind,

    /// A known message kind whose payload lacks a required field or has a
    /// field of the wrong type.
    #[error("Invalid {kind} payload: {message}")]
    InvalidPayload { kind: &'static str, message: String },

    /// Serialization of an outbound message failed.
    #[error("Failed to encode message: {0}")]
    Encode(#[source] serde_json::Error),
}

impl ProtocolError {
    pub fn invalid_payload(kind: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidPayload {
            kind,
            message: message.into(),
        }
    }
}

/// Result type for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;
