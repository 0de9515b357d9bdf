// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Session lifecycle state and per-run counters.

use std::fmt;

use crate::protocol::InitPayload;
use crate::world::{NodeKind, Product, WarehouseLayout};

/// Where the session is in the protocol lifecycle.
///
/// `AwaitingInit → Ready → Running → (EpisodeEnding → AwaitingInit)* → Terminated`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for `INIT`.
    AwaitingInit,
    /// `READY` has been sent.
    Ready,
    /// Handling tasks and events.
    Running,
    /// `EPISODE_END` received; counters not yet reset.
    EpisodeEnding,
    /// No further messages will be read or sent.
    Terminated(TerminationReason),
}

impl SessionState {
    pub fn is_terminated(&self) -> bool {
        matches!(self, Self::Terminated(_))
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AwaitingInit => write!(f, "awaiting_init"),
            Self::Ready => write!(f, "ready"),
            Self::Running => write!(f, "running"),
            Self::EpisodeEnding => write!(f, "episode_ending"),
            Self::Terminated(reason) => write!(f, "terminated({})", reason),
        }
    }
}

/// Why a session stopped without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    /// The peer closed its end of the channel.
    ChannelClosed,
    /// The process was asked to stop.
    Shutdown,
    /// The handshake after an episode boundary did not receive `INIT`.
    HandshakeFailed,
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::ChannelClosed => "channel closed",
            Self::Shutdown => "shutdown requested",
            Self::HandshakeFailed => "handshake failed",
        };
        f.write_str(s)
    }
}

/// Topology and catalog from the last `INIT`. Kept for diagnostics only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Topology {
    pub layout: WarehouseLayout,
    pub products: Vec<Product>,
    pub robot_count: usize,
}

impl Topology {
    pub fn from_init(init: InitPayload) -> Self {
        Self {
            robot_count: init.robots.len(),
            layout: init.warehouse_layout,
            products: init.products,
        }
    }

    pub fn node_count(&self) -> usize {
        self.layout.nodes.len()
    }

    pub fn shelf_count(&self) -> usize {
        self.layout.count_of(&NodeKind::Shelf)
    }
}

/// Mutable state owned by the control loop.
#[derive(Debug, Clone)]
pub struct Session {
    state: SessionState,
    completed_episodes: u32,
    task_count: u64,
    decisions_made: u64,
    topology: Option<Topology>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            state: SessionState::AwaitingInit,
            completed_episodes: 0,
            task_count: 0,
            decisions_made: 0,
            topology: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Episodes that reached `EPISODE_END`.
    pub fn completed_episodes(&self) -> u32 {
        self.completed_episodes
    }

    /// 1-based number of the episode in progress.
    pub fn current_episode(&self) -> u32 {
        self.completed_episodes + 1
    }

    /// Tasks received this episode.
    pub fn task_count(&self) -> u64 {
        self.task_count
    }

    /// Action decisions sent this episode. Waits are not counted.
    pub fn decisions_made(&self) -> u64 {
        self.decisions_made
    }

    pub fn topology(&self) -> Option<&Topology> {
        self.topology.as_ref()
    }

    /// True until the first handshake of the process has completed.
    pub fn is_first_handshake(&self) -> bool {
        self.completed_episodes == 0 && self.state == SessionState::AwaitingInit
    }

    /// `AwaitingInit → Ready` on a valid `INIT`.
    pub fn accept_init(&mut self, topology: Topology) {
        debug_assert_eq!(self.state, SessionState::AwaitingInit);
        self.topology = Some(topology);
        self.state = SessionState::Ready;
    }

    /// `Ready → Running`.
    pub fn start_running(&mut self) {
        debug_assert_eq!(self.state, SessionState::Ready);
        self.state = SessionState::Running;
    }

    /// Count a task and, for actions, a decision.
    pub fn record_task(&mut self, was_action: bool) {
        self.task_count += 1;
        if was_action {
            self.decisions_made += 1;
        }
    }

    /// `Running → EpisodeEnding`.
    pub fn end_episode(&mut self) {
        debug_assert_eq!(self.state, SessionState::Running);
        self.state = SessionState::EpisodeEnding;
    }

    /// `EpisodeEnding → AwaitingInit`. Zeroes the episode counters, advances
    /// the episode counter and returns the number to request in `RESET`.
    pub fn reset_episode(&mut self) -> u32 {
        self.completed_episodes += 1;
        self.task_count = 0;
        self.decisions_made = 0;
        self.topology = None;
        self.state = SessionState::AwaitingInit;
        self.current_episode()
    }

    pub fn terminate(&mut self, reason: TerminationReason) {
        self.state = SessionState::Terminated(reason);
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
