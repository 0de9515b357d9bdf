// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Warehouse agent - task assignment for a simulated robot warehouse.
//!
//! The agent talks to a warehouse simulator over a line-delimited JSON
//! protocol. For every task the simulator hands over, it picks a robot and a
//! shelf and answers with an action, or defers the task with a reason.
//!
//! # Architecture
//!
//! - [`protocol`] - Wire messages and the NDJSON codec
//! - [`world`] - Robots, shelves, tasks and topology as the simulator reports them
//! - [`engine`] - Stateless decision rules
//! - [`session`] - Handshake, event loop and episode cycle
//! - [`transport`] - Line channels over stdio or a Unix socket
//! - [`config`] - Configuration loading and merging
//! - [`telemetry`] - Logging setup and session metrics
//! - [`error`] - Error types and result aliases
//!
//! # Example
//!
//! ```rust,ignore
//! use warehouse_agent::engine::DecisionEngine;
//! use warehouse_agent::session::SessionRunner;
//! use warehouse_agent::transport;
//!
//! let summary = SessionRunner::new(transport::stdio(), DecisionEngine::default())
//!     .run()
//!     .await?;
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod protocol;
pub mod session;
pub mod telemetry;
pub mod transport;
pub mod world;

// Re-export commonly used types at crate root
pub use engine::{Decision, DecisionEngine, EngineConfig};
pub use error::{ConfigError, Result, SessionError};
pub use protocol::{InboundMessage, OutboundMessage, ProtocolError};
pub use session::{SessionRunner, SessionSummary, TerminationReason};
pub use transport::{LineChannel, PeerChannel};
pub use world::{Robot, Shelf, Task, TaskKind, WorldSnapshot};

/// Agent version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
