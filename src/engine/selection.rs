// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Candidate search over a world snapshot.
//!
//! All searches are greedy scans in snapshot order. Ties always go to the
//! first candidate encountered, so repeated calls on the same snapshot give
//! the same answer.

use serde::{Deserialize, Serialize};

use crate::world::{NodeIndex, ProductId, Robot, Shelf, Zone};

/// Minimum battery percentage for a robot to take new work.
pub const DEFAULT_MIN_BATTERY: f64 = 30.0;

/// Adjusted fill rate a restock shelf must beat to be chosen at all.
pub const RESTOCK_CEILING: f64 = 1.0;

/// Penalty added to a slot's fill rate per zone when choosing where to restock.
///
/// Lower adjusted fill rates win, so smaller bonuses bias placement toward
/// that zone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneBonus {
    pub hot: f64,
    pub warm: f64,
    pub cold: f64,
    pub other: f64,
}

impl Default for ZoneBonus {
    fn default() -> Self {
        Self {
            hot: 0.0,
            warm: 0.1,
            cold: 0.2,
            other: 0.3,
        }
    }
}

impl ZoneBonus {
    pub fn for_zone(&self, zone: Zone) -> f64 {
        match zone {
            Zone::Hot => self.hot,
            Zone::Warm => self.warm,
            Zone::Cold => self.cold,
            Zone::Other => self.other,
        }
    }
}

/// Where a product can be picked from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StockLocation {
    pub node: NodeIndex,
    pub slot_index: i32,
    pub occupied: i32,
}

/// Where incoming goods should be shelved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RestockTarget {
    pub node: NodeIndex,
    pub slot_index: i32,
    pub adjusted_fill_rate: f64,
}

/// Pick the idle robot with the most battery, ignoring any below `min_battery`.
pub fn select_robot(robots: &[Robot], min_battery: f64) -> Option<&Robot> {
    let mut best: Option<&Robot> = None;

    for robot in robots {
        if !robot.status.is_idle() {
            continue;
        }
        // Written so that a NaN battery never qualifies.
        if !(robot.battery >= min_battery) {
            continue;
        }
        if best.map_or(true, |b| robot.battery > b.battery) {
            best = Some(robot);
        }
    }

    best
}

/// Find the slot holding the most units of `product_id`.
///
/// Slots with zero units are never returned, even when they list the product.
pub fn locate_stock(inventory: &[Shelf], product_id: ProductId) -> Option<StockLocation> {
    let mut best: Option<StockLocation> = None;
    let mut max_quantity = 0;

    for shelf in inventory {
        for slot in shelf.slots_for(product_id) {
            if slot.occupied > max_quantity {
                max_quantity = slot.occupied;
                best = Some(StockLocation {
                    node: shelf.node_index,
                    slot_index: slot.slot_index,
                    occupied: slot.occupied,
                });
            }
        }
    }

    best
}

/// Find the emptiest slot for `product_id`, weighted by zone.
///
/// Only slots whose adjusted fill rate is below [`RESTOCK_CEILING`] qualify.
pub fn locate_restock_target(
    inventory: &[Shelf],
    product_id: ProductId,
    bonus: &ZoneBonus,
) -> Option<RestockTarget> {
    let mut best: Option<RestockTarget> = None;
    let mut lowest = RESTOCK_CEILING;

    for shelf in inventory {
        let zone_bonus = bonus.for_zone(shelf.zone);
        for slot in shelf.slots_for(product_id) {
            let adjusted = slot.fill_rate + zone_bonus;
            if adjusted < lowest {
                lowest = adjusted;
                best = Some(RestockTarget {
                    node: shelf.node_index,
                    slot_index: slot.slot_index,
                    adjusted_fill_rate: adjusted,
                });
            }
        }
    }

    best
}
