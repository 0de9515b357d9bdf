// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Session state machine.
//!
//! A [`SessionRunner`] owns the peer channel, the decision engine and the
//! [`Session`] counters, and walks the protocol lifecycle:
//!
//! ```text
//! AwaitingInit --INIT/READY--> Ready --> Running --EPISODE_END--> EpisodeEnding
//!      ^                                                              |
//!      +---------------------------RESET(n)---------------------------+
//! ```
//!
//! Any state moves to `Terminated` when the peer closes the channel or a
//! shutdown is requested. A failed handshake is an error on the first episode
//! and a clean stop on later ones.

mod machine;
mod state;

pub use machine::{SessionRunner, SessionSummary};
pub use state::{Session, SessionState, TerminationReason, Topology};
