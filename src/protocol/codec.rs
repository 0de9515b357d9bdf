// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Line codec: one JSON object per line.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use super::error::{ProtocolError, ProtocolResult};
use super::messages::{InboundMessage, MessageKind, OutboundMessage};

/// Encode a message to a newline-terminated JSON string.
pub fn encode<T: Serialize>(msg: &T) -> ProtocolResult<String> {
    let mut json = serde_json::to_string(msg).map_err(ProtocolError::Encode)?;
    json.push('\n');
    Ok(json)
}

/// Decode a simulator message.
///
/// The `type` field selects the payload schema. Known kinds with missing or
/// mistyped required fields fail with [`ProtocolError::InvalidPayload`];
/// unknown kinds decode to [`InboundMessage::Unknown`].
pub fn decode_inbound(line: &str) -> ProtocolResult<InboundMessage> {
    let value: Value = serde_json::from_str(line.trim()).map_err(ProtocolError::Malformed)?;
    let Value::Object(map) = value else {
        return Err(ProtocolError::NotAnObject);
    };

    let kind = match map.get("type") {
        Some(Value::String(kind)) => kind.clone(),
        _ => return Err(ProtocolError::MissingKind),
    };

    let Some(known) = MessageKind::parse(&kind) else {
        return Ok(InboundMessage::Unknown { kind });
    };

    match known {
        MessageKind::Init => payload(known, map).map(InboundMessage::Init),
        MessageKind::NewTask => payload(known, map).map(InboundMessage::NewTask),
        MessageKind::RobotStatus => payload(known, map).map(InboundMessage::RobotStatus),
        MessageKind::Ack => payload(known, map).map(InboundMessage::Ack),
        MessageKind::EpisodeEnd => payload(known, map).map(InboundMessage::EpisodeEnd),
        MessageKind::Error => payload(known, map).map(InboundMessage::Error),
    }
}

/// Decode an agent message. Used by peers and tests.
pub fn decode_outbound(line: &str) -> ProtocolResult<OutboundMessage> {
    serde_json::from_str(line.trim()).map_err(ProtocolError::Malformed)
}

/// Encode a simulator message, e.g. for a scripted peer.
pub fn encode_inbound(msg: &InboundMessage) -> ProtocolResult<String> {
    let (kind, body) = match msg {
        InboundMessage::Init(p) => (MessageKind::Init.as_str(), to_object(p)?),
        InboundMessage::NewTask(p) => (MessageKind::NewTask.as_str(), to_object(p)?),
        InboundMessage::RobotStatus(p) => (MessageKind::RobotStatus.as_str(), to_object(p)?),
        InboundMessage::Ack(p) => (MessageKind::Ack.as_str(), to_object(p)?),
        InboundMessage::EpisodeEnd(p) => (MessageKind::EpisodeEnd.as_str(), to_object(p)?),
        InboundMessage::Error(p) => (MessageKind::Error.as_str(), to_object(p)?),
        InboundMessage::Unknown { kind } => (kind.as_str(), Map::new()),
    };

    let mut map = Map::with_capacity(body.len() + 1);
    map.insert("type".to_string(), Value::String(kind.to_string()));
    map.extend(body);
    encode(&Value::Object(map))
}

/// Decode every non-blank line of a buffer.
pub fn decode_lines(buffer: &str) -> Vec<ProtocolResult<InboundMessage>> {
    buffer
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(decode_inbound)
        .collect()
}

fn payload<T: DeserializeOwned>(kind: MessageKind, map: Map<String, Value>) -> ProtocolResult<T> {
    serde_json::from_value(Value::Object(map))
        .map_err(|e| ProtocolError::invalid_payload(kind.as_str(), e.to_string()))
}

fn to_object<T: Serialize>(payload: &T) -> ProtocolResult<Map<String, Value>> {
    match serde_json::to_value(payload).map_err(ProtocolError::Encode)? {
        Value::Object(map) => Ok(map),
        _ => Err(ProtocolError::NotAnObject),
    }
}
