// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! World snapshot model.
//!
//! Typed, read-only views of the state blob the simulator attaches to every
//! task. The agent never mutates or caches these between decisions; each
//! `NEW_TASK` carries a fresh [`WorldSnapshot`].
//!
//! - [`robot`] - Robot records and operational status
//! - [`inventory`] - Shelves, slots and zone classification
//! - [`task`] - Work items and their kinds
//! - [`layout`] - Warehouse topology and product catalog sent with `INIT`

pub mod inventory;
pub mod layout;
pub mod robot;
pub mod task;

pub use inventory::{InventorySlot, Shelf, Zone};
pub use layout::{Edge, NodeInfo, NodeKind, Product, WarehouseLayout};
pub use robot::{CurrentOrder, Robot, RobotStatus};
pub use task::{Task, TaskKind};

use serde::{Deserialize, Deserializer, Serialize};

/// Index of a node in the warehouse graph. `-1` means "unset" on the wire.
pub type NodeIndex = i32;

/// Product identifier. `-1` means "unset" on the wire.
pub type ProductId = i32;

/// Stable slot of a robot in the simulator's robot array.
pub type RobotIndex = i32;

/// Wire sentinel for an absent node, product or robot.
pub const UNSET: i32 = -1;

/// World state delivered alongside a task.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    /// Simulation clock at the time the snapshot was taken.
    #[serde(default)]
    pub sim_time: f64,
    /// All robots, in simulator order.
    #[serde(default)]
    pub robots: Vec<Robot>,
    /// Every shelf with its slots.
    #[serde(default)]
    pub inventory: Vec<Shelf>,
    /// Facility sub-states arrive as `null` when the layout has no such node.
    #[serde(default, deserialize_with = "null_as_default")]
    pub loading_dock: LoadingDockState,
    #[serde(default, deserialize_with = "null_as_default")]
    pub front_desk: FrontDeskState,
    #[serde(default, deserialize_with = "null_as_default")]
    pub charging_station: ChargingStationState,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl WorldSnapshot {
    /// Number of robots currently reporting [`RobotStatus::Idle`].
    pub fn idle_robot_count(&self) -> usize {
        self.robots.iter().filter(|r| r.status.is_idle()).count()
    }

    /// Total number of slots across all shelves.
    pub fn slot_count(&self) -> usize {
        self.inventory.iter().map(|s| s.slots.len()).sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadingDockState {
    #[serde(default)]
    pub occupied: bool,
    #[serde(default)]
    pub delivery_count: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrontDeskState {
    #[serde(default)]
    pub pending_orders: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChargingStationState {
    /// Number of ports in use.
    #[serde(default)]
    pub occupied: i32,
    #[serde(default)]
    pub available_ports: i32,
}
