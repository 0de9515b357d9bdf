// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Simulator protocol.
//!
//! Messages are newline-delimited JSON (NDJSON): each message is a complete
//! JSON object on a single line, discriminated by its `type` field.
//!
//! ## Simulator → Agent
//!
//! - `INIT` - Warehouse layout, product catalog, robot roster
//! - `NEW_TASK` - A task plus the current world snapshot
//! - `ROBOT_STATUS` - Robot event (completion, failure, low battery, ...)
//! - `ACK` - A decision was accepted
//! - `EPISODE_END` - Episode metrics
//! - `ERROR` - Simulator-side problem
//!
//! ## Agent → Simulator
//!
//! - `READY` - Handshake reply to `INIT`
//! - `ACTION_DECISION` - Robot assignment for a task
//! - `WAIT_DECISION` - Task deferred with a reason
//! - `RESET` - Request the next episode

pub mod codec;
pub mod error;
pub mod messages;

pub use codec::{decode_inbound, decode_lines, decode_outbound, encode, encode_inbound};
pub use error::{ProtocolError, ProtocolResult};
pub use messages::{
    AckPayload, Action, ActionKind, EpisodeEndPayload, EpisodeMetrics, ErrorPayload,
    InboundMessage, InitPayload, MessageKind, NewTaskPayload, OutboundMessage,
    RobotStatusPayload, StatusKind, Strategy, WaitReason,
};
