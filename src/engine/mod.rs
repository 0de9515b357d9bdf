// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Decision engine.
//!
//! Given a task and the world snapshot that came with it, pick a robot and
//! (where the task kind calls for it) a source or target shelf, or decide to
//! defer. The engine holds no state between calls.
//!
//! | Task kind | Needs | On success | On gap |
//! |---|---|---|---|
//! | `CUSTOMER_ORDER` | robot, stocked shelf | `PICKUP_AND_DELIVER` shelf → task target | `no_robots_available` / `product_not_available` |
//! | `INCOMING_DELIVERY` | robot, restock shelf | `RESTOCK` task source → shelf | `no_robots_available` / `no_shelf_available` |
//! | `RESTOCK_REQUEST` | robot | `RESTOCK` task source → task target | `low_priority_deferred` |
//! | other | - | - | `unknown_task_type` |

mod decision;
mod selection;

pub use decision::{Decision, DecisionEngine, EngineConfig, DEFAULT_WAIT_ESTIMATE_SECS};
pub use selection::{
    locate_restock_target, locate_stock, select_robot, RestockTarget, StockLocation, ZoneBonus,
    DEFAULT_MIN_BATTERY, RESTOCK_CEILING,
};
