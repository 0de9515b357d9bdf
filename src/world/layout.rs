// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Warehouse topology and product catalog, as delivered by `INIT`.

use serde::{Deserialize, Serialize};

use super::{NodeIndex, ProductId, Zone};

/// Kind of location a graph node represents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeKind {
    Shelf,
    LoadingBay,
    FrontDesk,
    ChargingStation,
    Junction,
    Other(String),
}

impl From<String> for NodeKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Shelf" => Self::Shelf,
            "LoadingBay" => Self::LoadingBay,
            "FrontDesk" => Self::FrontDesk,
            "ChargingStation" => Self::ChargingStation,
            "Junction" => Self::Junction,
            _ => Self::Other(s),
        }
    }
}

impl From<NodeKind> for String {
    fn from(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Shelf => "Shelf".to_string(),
            NodeKind::LoadingBay => "LoadingBay".to_string(),
            NodeKind::FrontDesk => "FrontDesk".to_string(),
            NodeKind::ChargingStation => "ChargingStation".to_string(),
            NodeKind::Junction => "Junction".to_string(),
            NodeKind::Other(s) => s,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeInfo {
    pub index: NodeIndex,
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", default = "junction")]
    pub kind: NodeKind,
    #[serde(default)]
    pub zone: Zone,
    #[serde(default)]
    pub max_robots: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub from: NodeIndex,
    pub to: NodeIndex,
    #[serde(default)]
    pub distance: f64,
    #[serde(default)]
    pub directed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WarehouseLayout {
    #[serde(default)]
    pub nodes: Vec<NodeInfo>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl NodeInfo {
    pub fn new(index: NodeIndex, kind: NodeKind) -> Self {
        Self {
            index,
            id: format!("N{}", index),
            kind,
            zone: Zone::default(),
            max_robots: 1,
        }
    }
}

impl WarehouseLayout {
    /// Number of nodes of the given kind.
    pub fn count_of(&self, kind: &NodeKind) -> usize {
        self.nodes.iter().filter(|n| &n.kind == kind).count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub popularity: i32,
}

fn junction() -> NodeKind {
    NodeKind::Junction
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_decode() {
        let json = r#"{
            "nodes": [
                {"index": 0, "id": "dock", "type": "LoadingBay", "zone": "Other", "max_robots": 2},
                {"index": 1, "id": "S1", "type": "Shelf", "zone": "Hot", "max_robots": 1},
                {"index": 2, "id": "S2", "type": "Shelf", "zone": "Cold", "max_robots": 1}
            ],
            "edges": [{"from": 0, "to": 1, "distance": 2.5, "directed": false}]
        }"#;
        let layout: WarehouseLayout = serde_json::from_str(json).unwrap();
        assert_eq!(layout.nodes.len(), 3);
        assert_eq!(layout.count_of(&NodeKind::Shelf), 2);
        assert_eq!(layout.edges[0].distance, 2.5);
        assert_eq!(layout.nodes[1].zone, Zone::Hot);
    }

    #[test]
    fn test_unknown_node_kind() {
        let node: NodeInfo = serde_json::from_str(r#"{"index": 7, "type": "Elevator"}"#).unwrap();
        assert_eq!(node.kind, NodeKind::Other("Elevator".to_string()));
    }
}
