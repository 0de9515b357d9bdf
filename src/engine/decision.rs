// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Task dispatch: turns a task and a snapshot into a decision.

use tracing::debug;

use crate::protocol::{Action, ActionKind, OutboundMessage, Strategy, WaitReason};
use crate::world::{Task, TaskKind, WorldSnapshot};

use super::selection::{
    locate_restock_target, locate_stock, select_robot, ZoneBonus, DEFAULT_MIN_BATTERY,
};

/// Default wait estimate attached to every wait decision, in seconds.
pub const DEFAULT_WAIT_ESTIMATE_SECS: f64 = 10.0;

/// Tunables for the decision engine.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Robots below this battery percentage are never assigned.
    pub min_battery: f64,
    /// `estimated_wait_time` reported with wait decisions.
    pub wait_estimate_secs: f64,
    /// Zone weighting for restock placement.
    pub zone_bonus: ZoneBonus,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_battery: DEFAULT_MIN_BATTERY,
            wait_estimate_secs: DEFAULT_WAIT_ESTIMATE_SECS,
            zone_bonus: ZoneBonus::default(),
        }
    }
}

/// Outcome of deciding on one task.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// Assign a robot.
    Action(Action),
    /// Defer the task.
    Wait {
        reason: WaitReason,
        estimated_wait_time: f64,
    },
}

impl Decision {
    pub fn is_action(&self) -> bool {
        matches!(self, Self::Action(_))
    }

    /// Short label for diagnostics: the action kind or the wait reason.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Action(action) => action.action_type.as_str(),
            Self::Wait { reason, .. } => reason.as_str(),
        }
    }

    /// Wrap the decision in the message that answers `task_id`.
    pub fn into_message(self, task_id: impl Into<String>) -> OutboundMessage {
        match self {
            Self::Action(action) => OutboundMessage::action(task_id, action),
            Self::Wait {
                reason,
                estimated_wait_time,
            } => OutboundMessage::wait(task_id, reason, estimated_wait_time),
        }
    }
}

/// Greedy, stateless task assigner.
///
/// Every call is a pure function of the task and snapshot it is given.
#[derive(Debug, Clone, Default)]
pub struct DecisionEngine {
    config: EngineConfig,
}

impl DecisionEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Decide what to do with `task`.
    pub fn decide(&self, task: &Task, snapshot: &WorldSnapshot) -> Decision {
        match &task.kind {
            TaskKind::CustomerOrder => self.customer_order(task, snapshot),
            TaskKind::IncomingDelivery => self.incoming_delivery(task, snapshot),
            TaskKind::RestockRequest => self.restock_request(task, snapshot),
            TaskKind::Unknown(kind) => {
                debug!(task_id = %task.task_id, kind = %kind, "Unknown task type");
                self.wait(WaitReason::UnknownTaskType)
            }
        }
    }

    fn customer_order(&self, task: &Task, snapshot: &WorldSnapshot) -> Decision {
        let Some(robot) = select_robot(&snapshot.robots, self.config.min_battery) else {
            debug!(task_id = %task.task_id, "No robot available for customer order");
            return self.wait(WaitReason::NoRobotsAvailable);
        };

        let Some(stock) = locate_stock(&snapshot.inventory, task.product_id) else {
            debug!(
                task_id = %task.task_id,
                product_id = task.product_id,
                "Product not found in inventory"
            );
            return self.wait(WaitReason::ProductNotAvailable);
        };

        debug!(
            task_id = %task.task_id,
            robot = robot.index,
            source = stock.node,
            slot = stock.slot_index,
            target = task.target_node,
            "Assigning pickup"
        );
        self.action(robot.index, ActionKind::PickupAndDeliver, task, stock.node, task.target_node)
    }

    fn incoming_delivery(&self, task: &Task, snapshot: &WorldSnapshot) -> Decision {
        let Some(robot) = select_robot(&snapshot.robots, self.config.min_battery) else {
            debug!(task_id = %task.task_id, "No robot available for delivery");
            return self.wait(WaitReason::NoRobotsAvailable);
        };

        let Some(target) =
            locate_restock_target(&snapshot.inventory, task.product_id, &self.config.zone_bonus)
        else {
            debug!(
                task_id = %task.task_id,
                product_id = task.product_id,
                "No shelf can take the delivery"
            );
            return self.wait(WaitReason::NoShelfAvailable);
        };

        debug!(
            task_id = %task.task_id,
            robot = robot.index,
            dock = task.source_node,
            shelf = target.node,
            adjusted_fill_rate = target.adjusted_fill_rate,
            "Assigning delivery restock"
        );
        self.action(robot.index, ActionKind::Restock, task, task.source_node, target.node)
    }

    fn restock_request(&self, task: &Task, snapshot: &WorldSnapshot) -> Decision {
        let Some(robot) = select_robot(&snapshot.robots, self.config.min_battery) else {
            debug!(task_id = %task.task_id, "No robot available, deferring restock");
            return self.wait(WaitReason::LowPriorityDeferred);
        };

        self.action(
            robot.index,
            ActionKind::Restock,
            task,
            task.source_node,
            task.target_node,
        )
    }

    fn action(
        &self,
        robot_index: i32,
        action_type: ActionKind,
        task: &Task,
        source_node: i32,
        target_node: i32,
    ) -> Decision {
        Decision::Action(Action {
            robot_index,
            action_type,
            product_id: task.product_id,
            source_node,
            target_node,
            strategy: Strategy::Direct,
        })
    }

    fn wait(&self, reason: WaitReason) -> Decision {
        Decision::Wait {
            reason,
            estimated_wait_time: self.config.wait_estimate_secs,
        }
    }
}
