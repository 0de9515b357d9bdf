// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Message schemas for agent <-> simulator traffic.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::world::{
    NodeIndex, ProductId, Product, Robot, RobotIndex, Task, WarehouseLayout, WorldSnapshot, UNSET,
};

// ============================================================================
// Simulator -> Agent
// ============================================================================

/// Kinds of message the simulator sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Init,
    NewTask,
    RobotStatus,
    Ack,
    EpisodeEnd,
    Error,
}

impl MessageKind {
    pub const ALL: [MessageKind; 6] = [
        Self::Init,
        Self::NewTask,
        Self::RobotStatus,
        Self::Ack,
        Self::EpisodeEnd,
        Self::Error,
    ];

    /// Wire name (`type` field value).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "INIT",
            Self::NewTask => "NEW_TASK",
            Self::RobotStatus => "ROBOT_STATUS",
            Self::Ack => "ACK",
            Self::EpisodeEnd => "EPISODE_END",
            Self::Error => "ERROR",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == s)
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded inbound message.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    Init(InitPayload),
    NewTask(NewTaskPayload),
    RobotStatus(RobotStatusPayload),
    Ack(AckPayload),
    EpisodeEnd(EpisodeEndPayload),
    Error(ErrorPayload),
    /// A well-formed message whose `type` is not one we know.
    Unknown { kind: String },
}

impl InboundMessage {
    /// Wire name of this message's kind.
    pub fn kind_name(&self) -> &str {
        match self {
            Self::Init(_) => MessageKind::Init.as_str(),
            Self::NewTask(_) => MessageKind::NewTask.as_str(),
            Self::RobotStatus(_) => MessageKind::RobotStatus.as_str(),
            Self::Ack(_) => MessageKind::Ack.as_str(),
            Self::EpisodeEnd(_) => MessageKind::EpisodeEnd.as_str(),
            Self::Error(_) => MessageKind::Error.as_str(),
            Self::Unknown { kind } => kind,
        }
    }

    pub fn is_init(&self) -> bool {
        matches!(self, Self::Init(_))
    }
}

/// `INIT`: topology, catalog and robot roster for a new episode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InitPayload {
    #[serde(default)]
    pub timestamp: f64,
    pub warehouse_layout: WarehouseLayout,
    pub products: Vec<Product>,
    pub robots: Vec<Robot>,
}

/// `NEW_TASK`: a work item plus the world as it stands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTaskPayload {
    #[serde(default)]
    pub timestamp: f64,
    pub task: Task,
    pub state: WorldSnapshot,
}

/// Robot event kinds reported through `ROBOT_STATUS`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StatusKind {
    TaskComplete,
    TaskFailed,
    LowBattery,
    Stuck,
    HandoverReady,
    Charging,
    Other(String),
}

impl StatusKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::TaskComplete => "TASK_COMPLETE",
            Self::TaskFailed => "TASK_FAILED",
            Self::LowBattery => "LOW_BATTERY",
            Self::Stuck => "STUCK",
            Self::HandoverReady => "HANDOVER_READY",
            Self::Charging => "CHARGING",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for StatusKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "TASK_COMPLETE" => Self::TaskComplete,
            "TASK_FAILED" => Self::TaskFailed,
            "LOW_BATTERY" => Self::LowBattery,
            "STUCK" => Self::Stuck,
            "HANDOVER_READY" => Self::HandoverReady,
            "CHARGING" => Self::Charging,
            _ => Self::Other(s),
        }
    }
}

impl From<StatusKind> for String {
    fn from(kind: StatusKind) -> Self {
        match kind {
            StatusKind::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `ROBOT_STATUS`: observational robot event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RobotStatusPayload {
    pub status_type: StatusKind,
    #[serde(default = "unset")]
    pub robot_index: RobotIndex,
    #[serde(default)]
    pub task_id: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub robot_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_node: Option<NodeIndex>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battery: Option<f64>,
    #[serde(default)]
    pub timestamp: f64,
}

/// `ACK`: the simulator accepted a decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AckPayload {
    pub task_id: String,
    #[serde(default = "unset")]
    pub robot_index: RobotIndex,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_completion_time: Option<f64>,
}

/// Aggregate results of one episode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EpisodeMetrics {
    #[serde(default)]
    pub orders_completed: u32,
    #[serde(default)]
    pub orders_failed: u32,
    #[serde(default)]
    pub total_distance: f64,
    #[serde(default)]
    pub avg_completion_time: f64,
    #[serde(default)]
    pub robot_utilization: f64,
}

/// `EPISODE_END`: the simulation run finished.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EpisodeEndPayload {
    #[serde(default)]
    pub timestamp: f64,
    #[serde(default)]
    pub metrics: EpisodeMetrics,
}

/// `ERROR`: the simulator reports a problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorPayload {
    #[serde(default = "unknown_error")]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(default = "unset")]
    pub robot_index: RobotIndex,
}

// ============================================================================
// Agent -> Simulator
// ============================================================================

/// What a robot is told to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionKind {
    PickupAndDeliver,
    Restock,
    Charge,
    Handover,
    Wait,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PickupAndDeliver => "PICKUP_AND_DELIVER",
            Self::Restock => "RESTOCK",
            Self::Charge => "CHARGE",
            Self::Handover => "HANDOVER",
            Self::Wait => "WAIT",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Routing strategy attached to an action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    #[default]
    Direct,
}

/// A robot assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub robot_index: RobotIndex,
    pub action_type: ActionKind,
    pub product_id: ProductId,
    pub source_node: NodeIndex,
    pub target_node: NodeIndex,
    #[serde(default)]
    pub strategy: Strategy,
}

/// Why a task was deferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitReason {
    NoRobotsAvailable,
    ProductNotAvailable,
    NoShelfAvailable,
    LowPriorityDeferred,
    UnknownTaskType,
}

impl WaitReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoRobotsAvailable => "no_robots_available",
            Self::ProductNotAvailable => "product_not_available",
            Self::NoShelfAvailable => "no_shelf_available",
            Self::LowPriorityDeferred => "low_priority_deferred",
            Self::UnknownTaskType => "unknown_task_type",
        }
    }
}

impl fmt::Display for WaitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Messages sent from the agent to the simulator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutboundMessage {
    /// Handshake reply to `INIT`.
    Ready,

    /// Assign a robot to a task.
    ActionDecision { task_id: String, action: Action },

    /// Defer a task; the simulator resubmits it later.
    WaitDecision {
        task_id: String,
        reason: WaitReason,
        estimated_wait_time: f64,
    },

    /// Ask for the next episode.
    Reset { episode_number: u32 },
}

impl OutboundMessage {
    pub fn action(task_id: impl Into<String>, action: Action) -> Self {
        Self::ActionDecision {
            task_id: task_id.into(),
            action,
        }
    }

    pub fn wait(task_id: impl Into<String>, reason: WaitReason, estimated_wait_time: f64) -> Self {
        Self::WaitDecision {
            task_id: task_id.into(),
            reason,
            estimated_wait_time,
        }
    }

    pub fn reset(episode_number: u32) -> Self {
        Self::Reset { episode_number }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    pub fn is_decision(&self) -> bool {
        matches!(self, Self::ActionDecision { .. } | Self::WaitDecision { .. })
    }

    /// Task this message answers, if any.
    pub fn task_id(&self) -> Option<&str> {
        match self {
            Self::ActionDecision { task_id, .. } | Self::WaitDecision { task_id, .. } => {
                Some(task_id)
            }
            _ => None,
        }
    }
}

fn unset() -> i32 {
    UNSET
}

fn unknown_error() -> String {
    "Unknown error".to_string()
}
