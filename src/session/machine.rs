// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! The control loop: read a line, route it, answer it, repeat.

use std::time::Instant;

use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::engine::DecisionEngine;
use crate::error::SessionError;
use crate::protocol::{
    decode_inbound, encode, AckPayload, EpisodeEndPayload, ErrorPayload, InboundMessage,
    MessageKind, NewTaskPayload, OutboundMessage, ProtocolError, RobotStatusPayload,
};
use crate::telemetry::{Metrics, MetricsSnapshot};
use crate::transport::PeerChannel;

use super::state::{Session, SessionState, TerminationReason, Topology};

/// Result of a session that ended without an error.
#[derive(Debug, Clone)]
pub struct SessionSummary {
    pub reason: TerminationReason,
    pub completed_episodes: u32,
    pub metrics: MetricsSnapshot,
}

/// What the next read produced.
enum Incoming {
    Line(String),
    /// A line arrived but its bytes could not be read as text.
    Unreadable(String),
    Closed,
    Shutdown,
}

/// Why a read with a shutdown watch woke up.
enum Wake {
    Read(std::io::Result<Option<String>>),
    Signal,
    SenderGone,
}

/// Drives one [`Session`] over a [`PeerChannel`].
///
/// Strictly sequential: each inbound message is fully handled, including
/// writing any reply, before the next line is read.
pub struct SessionRunner<C> {
    channel: C,
    engine: DecisionEngine,
    session: Session,
    metrics: Metrics,
    log_messages: bool,
    message_seq: u64,
    shutdown: Option<watch::Receiver<bool>>,
}

impl<C: PeerChannel> SessionRunner<C> {
    pub fn new(channel: C, engine: DecisionEngine) -> Self {
        Self {
            channel,
            engine,
            session: Session::new(),
            metrics: Metrics::new(),
            log_messages: false,
            message_seq: 0,
            shutdown: None,
        }
    }

    /// Log every line sent and received at info level.
    pub fn with_message_logging(mut self, enabled: bool) -> Self {
        self.log_messages = enabled;
        self
    }

    /// Stop reading once the flag flips to `true`. Checked only between
    /// messages, so a reply in progress is always completed.
    pub fn with_shutdown(mut self, shutdown: watch::Receiver<bool>) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Run until the peer goes away, shutdown is requested, or a fatal
    /// protocol error occurs.
    pub async fn run(mut self) -> Result<SessionSummary, SessionError> {
        info!("Waiting for INIT message");

        let reason = loop {
            match self.session.state() {
                SessionState::AwaitingInit => self.await_init().await?,
                SessionState::Ready => {
                    info!(episode = self.session.current_episode(), "Entering main loop");
                    self.session.start_running();
                }
                SessionState::Running => self.step().await?,
                SessionState::EpisodeEnding => self.finish_episode().await?,
                SessionState::Terminated(reason) => break reason,
            }
        };

        let metrics = self.metrics.snapshot();
        info!(
            reason = %reason,
            episodes = self.session.completed_episodes(),
            summary = %metrics.format_summary(),
            "Session terminated"
        );

        Ok(SessionSummary {
            reason,
            completed_episodes: self.session.completed_episodes(),
            metrics,
        })
    }

    async fn await_init(&mut self) -> Result<(), SessionError> {
        let first = self.session.is_first_handshake();

        let line = match self.next_line().await? {
            Incoming::Line(line) => Ok(line),
            Incoming::Unreadable(reason) => Err(reason),
            Incoming::Closed => {
                info!("Connection closed before INIT");
                self.session.terminate(TerminationReason::ChannelClosed);
                return Ok(());
            }
            Incoming::Shutdown => {
                self.session.terminate(TerminationReason::Shutdown);
                return Ok(());
            }
        };

        let problem = match decode_incoming(line) {
            Ok(InboundMessage::Init(init)) => {
                self.metrics.record_inbound(MessageKind::Init.as_str());
                let topology = Topology::from_init(init);
                info!(
                    episode = self.session.current_episode(),
                    nodes = topology.node_count(),
                    shelves = topology.shelf_count(),
                    products = topology.products.len(),
                    robots = topology.robot_count,
                    "Initialized"
                );
                self.session.accept_init(topology);
                self.send(&OutboundMessage::Ready).await?;
                return Ok(());
            }
            Ok(other) => {
                self.metrics.record_inbound(other.kind_name());
                format!("expected INIT, got {}", other.kind_name())
            }
            Err(err) => {
                self.metrics.record_malformed();
                err.to_string()
            }
        };

        if first {
            error!(error = %problem, "Initial handshake failed");
            return Err(SessionError::HandshakeFailed(problem));
        }

        warn!(error = %problem, "Handshake for new episode failed; stopping");
        self.session.terminate(TerminationReason::HandshakeFailed);
        Ok(())
    }

    async fn step(&mut self) -> Result<(), SessionError> {
        let line = match self.next_line().await? {
            Incoming::Line(line) => Ok(line),
            Incoming::Unreadable(reason) => Err(reason),
            Incoming::Closed => {
                info!("Connection closed");
                self.session.terminate(TerminationReason::ChannelClosed);
                return Ok(());
            }
            Incoming::Shutdown => {
                self.session.terminate(TerminationReason::Shutdown);
                return Ok(());
            }
        };

        let message = match decode_incoming(line) {
            Ok(message) => message,
            Err(err) => {
                self.metrics.record_malformed();
                warn!(error = %err, "Dropping undecodable line");
                return Ok(());
            }
        };
        self.metrics.record_inbound(message.kind_name());

        match message {
            InboundMessage::NewTask(payload) => self.handle_task(payload).await?,
            InboundMessage::RobotStatus(status) => log_robot_status(&status),
            InboundMessage::Ack(ack) => log_ack(&ack),
            InboundMessage::EpisodeEnd(end) => {
                self.report_episode(&end);
                self.session.end_episode();
            }
            InboundMessage::Error(err) => log_sim_error(&err),
            InboundMessage::Init(_) => warn!("Unexpected INIT during an episode; ignoring"),
            InboundMessage::Unknown { kind } => warn!(kind = %kind, "Unknown message type"),
        }

        Ok(())
    }

    async fn handle_task(&mut self, payload: NewTaskPayload) -> Result<(), SessionError> {
        let NewTaskPayload { task, state, .. } = payload;
        debug!(
            task_id = %task.task_id,
            kind = %task.kind,
            product = task.product_id,
            robots = state.robots.len(),
            idle = state.idle_robot_count(),
            "New task"
        );

        let started = Instant::now();
        let decision = self.engine.decide(&task, &state);
        self.metrics.record_decision(decision.label(), started.elapsed());

        let was_action = decision.is_action();
        let reply = decision.into_message(task.task_id);
        self.send(&reply).await?;
        self.session.record_task(was_action);
        Ok(())
    }

    fn report_episode(&self, end: &EpisodeEndPayload) {
        let m = &end.metrics;
        info!(
            episode = self.session.current_episode(),
            orders_completed = m.orders_completed,
            orders_failed = m.orders_failed,
            total_distance = m.total_distance,
            avg_completion_time = m.avg_completion_time,
            robot_utilization = m.robot_utilization,
            tasks = self.session.task_count(),
            decisions = self.session.decisions_made(),
            "Episode ended"
        );
        info!(summary = %self.metrics.snapshot().format_summary(), "Metrics");
    }

    async fn finish_episode(&mut self) -> Result<(), SessionError> {
        let next = self.session.reset_episode();
        info!(episode = next, "Requesting next episode");
        self.send(&OutboundMessage::reset(next)).await
    }

    /// Encode fully before writing so an encode failure never leaves a
    /// partial line on the channel.
    async fn send(&mut self, message: &OutboundMessage) -> Result<(), SessionError> {
        let line = encode(message)?;
        self.message_seq += 1;
        if self.log_messages {
            info!(seq = self.message_seq, "SEND {}", line.trim_end());
        }
        self.channel.send_line(&line).await?;
        self.metrics.record_outbound();
        Ok(())
    }

    async fn next_line(&mut self) -> Result<Incoming, SessionError> {
        loop {
            let incoming = match self.shutdown.as_mut() {
                None => read_result(self.channel.recv_line().await)?,
                Some(rx) => {
                    if *rx.borrow() {
                        info!("Shutdown requested");
                        return Ok(Incoming::Shutdown);
                    }
                    let wake = tokio::select! {
                        res = self.channel.recv_line() => Wake::Read(res),
                        changed = rx.changed() => match changed {
                            Ok(()) => Wake::Signal,
                            Err(_) => Wake::SenderGone,
                        },
                    };
                    match wake {
                        Wake::Read(res) => read_result(res)?,
                        Wake::Signal => continue,
                        Wake::SenderGone => {
                            // No shutdown can arrive any more.
                            self.shutdown = None;
                            continue;
                        }
                    }
                }
            };

            if let Incoming::Line(ref line) = incoming {
                if line.trim().is_empty() {
                    continue;
                }
                self.message_seq += 1;
                if self.log_messages {
                    info!(seq = self.message_seq, "RECV {}", line);
                }
            }
            return Ok(incoming);
        }
    }
}

fn read_result(res: std::io::Result<Option<String>>) -> Result<Incoming, SessionError> {
    match res {
        Ok(Some(line)) => Ok(Incoming::Line(line)),
        Ok(None) => Ok(Incoming::Closed),
        Err(err) if err.kind() == std::io::ErrorKind::InvalidData => {
            Ok(Incoming::Unreadable(err.to_string()))
        }
        Err(err) => Err(err.into()),
    }
}

/// Decode a line, treating unreadable bytes like any other malformed input.
fn decode_incoming(line: Result<String, String>) -> Result<InboundMessage, ProtocolError> {
    match line {
        Ok(line) => decode_inbound(&line),
        Err(reason) => Err(ProtocolError::InvalidEncoding(reason)),
    }
}

fn log_robot_status(status: &RobotStatusPayload) {
    debug!(
        robot = status.robot_index,
        status = %status.status_type,
        task_id = %status.task_id,
        battery = ?status.battery,
        "Robot status"
    );
}

fn log_ack(ack: &AckPayload) {
    debug!(task_id = %ack.task_id, robot = ack.robot_index, "Task acknowledged by simulator");
}

fn log_sim_error(err: &ErrorPayload) {
    warn!(
        message = %err.message,
        task_id = ?err.task_id,
        code = ?err.error_code,
        "Error from simulator"
    );
}
