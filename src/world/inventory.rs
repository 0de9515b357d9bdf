// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Shelves, slots and zones.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{NodeIndex, ProductId, UNSET};

/// Popularity zone of a shelf.
///
/// A missing zone decodes as [`Zone::Cold`]; any unrecognized name decodes as
/// [`Zone::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Zone {
    Hot,
    Warm,
    #[default]
    Cold,
    Other,
}

impl Zone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hot => "Hot",
            Self::Warm => "Warm",
            Self::Cold => "Cold",
            Self::Other => "Other",
        }
    }
}

impl From<String> for Zone {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Hot" => Self::Hot,
            "Warm" => Self::Warm,
            "Cold" => Self::Cold,
            _ => Self::Other,
        }
    }
}

impl From<Zone> for String {
    fn from(zone: Zone) -> Self {
        zone.as_str().to_string()
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One slot on a shelf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventorySlot {
    #[serde(default = "unset")]
    pub slot_index: i32,
    pub product_id: ProductId,
    /// Units currently stored.
    #[serde(default)]
    pub occupied: i32,
    #[serde(default)]
    pub capacity: i32,
    /// `occupied / capacity`, 0.0-1.0. Absent means "treat as full".
    #[serde(default = "full")]
    pub fill_rate: f64,
}

impl InventorySlot {
    pub fn new(slot_index: i32, product_id: ProductId, occupied: i32, fill_rate: f64) -> Self {
        Self {
            slot_index,
            product_id,
            occupied,
            capacity: 0,
            fill_rate,
        }
    }

    pub fn holds(&self, product_id: ProductId) -> bool {
        self.product_id == product_id
    }
}

/// A shelf node and its ordered slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shelf {
    pub node_index: NodeIndex,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub shelf_name: String,
    #[serde(default)]
    pub zone: Zone,
    #[serde(default)]
    pub slots: Vec<InventorySlot>,
}

impl Shelf {
    pub fn new(node_index: NodeIndex, zone: Zone, slots: Vec<InventorySlot>) -> Self {
        Self {
            node_index,
            shelf_name: String::new(),
            zone,
            slots,
        }
    }

    /// Slots holding `product_id`, in shelf order.
    pub fn slots_for(&self, product_id: ProductId) -> impl Iterator<Item = &InventorySlot> {
        self.slots.iter().filter(move |slot| slot.holds(product_id))
    }
}

fn unset() -> i32 {
    UNSET
}

fn full() -> f64 {
    1.0
}
