// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Robot records as reported by the simulator.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{NodeIndex, ProductId, RobotIndex, UNSET};

/// Operational status of a robot.
///
/// Unrecognized status strings are preserved in [`RobotStatus::Other`] so a
/// newer simulator never breaks decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RobotStatus {
    Idle,
    Moving,
    Carrying,
    Charging,
    Picking,
    Dropping,
    Other(String),
}

impl RobotStatus {
    /// Wire name of the status.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Idle => "Idle",
            Self::Moving => "Moving",
            Self::Carrying => "Carrying",
            Self::Charging => "Charging",
            Self::Picking => "Picking",
            Self::Dropping => "Dropping",
            Self::Other(s) => s,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

impl From<String> for RobotStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Idle" => Self::Idle,
            "Moving" => Self::Moving,
            "Carrying" => Self::Carrying,
            "Charging" => Self::Charging,
            "Picking" => Self::Picking,
            "Dropping" => Self::Dropping,
            _ => Self::Other(s),
        }
    }
}

impl From<RobotStatus> for String {
    fn from(status: RobotStatus) -> Self {
        match status {
            RobotStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for RobotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order a robot is currently carrying out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentOrder {
    #[serde(default = "unset")]
    pub product_id: ProductId,
    #[serde(default = "one")]
    pub quantity: i32,
    #[serde(default = "unset")]
    pub slot_index: i32,
}

/// A robot as seen in one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Robot {
    /// Simulator-assigned name, e.g. `robot_0`.
    #[serde(default)]
    pub id: String,
    /// Stable slot in the simulator's robot array; this is what decisions refer to.
    pub index: RobotIndex,
    #[serde(default = "unset")]
    pub current_node: NodeIndex,
    #[serde(default = "unset")]
    pub target_node: NodeIndex,
    /// Battery percentage, 0-100.
    pub battery: f64,
    pub status: RobotStatus,
    #[serde(default)]
    pub carrying: bool,
    #[serde(default)]
    pub has_order: bool,
    #[serde(default)]
    pub speed: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_order: Option<CurrentOrder>,
}

impl Robot {
    /// Build an idle robot parked at node 0. Mostly useful in tests.
    pub fn idle(index: RobotIndex, battery: f64) -> Self {
        Self {
            id: format!("robot_{}", index),
            index,
            current_node: 0,
            target_node: UNSET,
            battery,
            status: RobotStatus::Idle,
            carrying: false,
            has_order: false,
            speed: 1.0,
            current_order: None,
        }
    }

    /// Same robot with a different status.
    pub fn with_status(mut self, status: RobotStatus) -> Self {
        self.status = status;
        self
    }
}

fn unset() -> i32 {
    UNSET
}

fn one() -> i32 {
    1
}
