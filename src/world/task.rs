// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Work items announced by the simulator.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{NodeIndex, ProductId, UNSET};

/// Kind of work a task represents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskKind {
    /// Pick a product from a shelf and deliver it to the task's target.
    CustomerOrder,
    /// Move goods from the loading dock onto a shelf of the agent's choosing.
    IncomingDelivery,
    /// Refill a specific shelf named by the simulator.
    RestockRequest,
    /// Anything else; answered with a wait.
    Unknown(String),
}

impl TaskKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::CustomerOrder => "CUSTOMER_ORDER",
            Self::IncomingDelivery => "INCOMING_DELIVERY",
            Self::RestockRequest => "RESTOCK_REQUEST",
            Self::Unknown(s) => s,
        }
    }
}

impl From<String> for TaskKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "CUSTOMER_ORDER" => Self::CustomerOrder,
            "INCOMING_DELIVERY" => Self::IncomingDelivery,
            "RESTOCK_REQUEST" => Self::RestockRequest,
            _ => Self::Unknown(s),
        }
    }
}

impl From<TaskKind> for String {
    fn from(kind: TaskKind) -> Self {
        match kind {
            TaskKind::Unknown(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single work item.
///
/// `task_id` and `task_type` are required; every other field falls back to
/// the protocol's sentinel value when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub task_id: String,
    #[serde(rename = "task_type")]
    pub kind: TaskKind,
    #[serde(default = "unset")]
    pub product_id: ProductId,
    #[serde(default = "one")]
    pub quantity: i32,
    #[serde(default = "unset")]
    pub source_node: NodeIndex,
    #[serde(default = "unset")]
    pub target_node: NodeIndex,
    #[serde(default = "normal")]
    pub priority: String,
    /// Opaque ordering hint; seconds or epoch depending on the simulator.
    #[serde(default)]
    pub deadline: f64,
}

impl Task {
    /// Create a task with sentinel values for everything but id and kind.
    pub fn new(task_id: impl Into<String>, kind: TaskKind) -> Self {
        Self {
            task_id: task_id.into(),
            kind,
            product_id: UNSET,
            quantity: 1,
            source_node: UNSET,
            target_node: UNSET,
            priority: normal(),
            deadline: 0.0,
        }
    }

    pub fn with_product(mut self, product_id: ProductId, quantity: i32) -> Self {
        self.product_id = product_id;
        self.quantity = quantity;
        self
    }

    pub fn with_nodes(mut self, source_node: NodeIndex, target_node: NodeIndex) -> Self {
        self.source_node = source_node;
        self.target_node = target_node;
        self
    }
}

fn unset() -> i32 {
    UNSET
}

fn one() -> i32 {
    1
}

fn normal() -> String {
    "normal".to_string()
}
