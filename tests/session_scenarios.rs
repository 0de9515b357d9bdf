// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! End-to-end sessions against a scripted simulator over an in-memory pipe.

use serde_json::{json, Value};
use tokio::io::{AsyncWriteExt, DuplexStream, ReadHalf, Sink, WriteHalf};
use tokio::task::JoinHandle;

use warehouse_agent::engine::{DecisionEngine, EngineConfig};
use warehouse_agent::protocol::{
    decode_outbound, Action, ActionKind, OutboundMessage, Strategy, WaitReason,
};
use warehouse_agent::session::{SessionRunner, SessionSummary, TerminationReason};
use warehouse_agent::transport::{LineChannel, PeerChannel};
use warehouse_agent::SessionError;

/// The simulator end of the pipe. Writes go straight to the pipe so tests
/// can send bytes that are not valid text.
struct Simulator {
    reader: LineChannel<ReadHalf<DuplexStream>, Sink>,
    writer: WriteHalf<DuplexStream>,
}

impl Simulator {
    async fn send(&mut self, message: Value) {
        self.send_raw(&message.to_string()).await;
    }

    async fn send_raw(&mut self, line: &str) {
        self.send_bytes(line.as_bytes()).await;
    }

    async fn send_bytes(&mut self, bytes: &[u8]) {
        let mut framed = bytes.to_vec();
        framed.push(b'\n');
        self.writer.write_all(&framed).await.unwrap();
        self.writer.flush().await.unwrap();
    }

    async fn recv_line(&mut self) -> String {
        self.reader
            .recv_line()
            .await
            .unwrap()
            .expect("agent closed the channel")
    }

    async fn recv(&mut self) -> OutboundMessage {
        decode_outbound(&self.recv_line().await).unwrap()
    }

    async fn handshake(&mut self) {
        self.send(init_message()).await;
        assert_eq!(self.recv().await, OutboundMessage::Ready);
    }
}

fn start_agent(
    engine: DecisionEngine,
) -> (Simulator, JoinHandle<Result<SessionSummary, SessionError>>) {
    let (agent_end, sim_end) = tokio::io::duplex(64 * 1024);

    let (r, w) = tokio::io::split(agent_end);
    let runner = SessionRunner::new(LineChannel::new(r, w), engine).with_message_logging(true);
    let handle = tokio::spawn(runner.run());

    let (r, w) = tokio::io::split(sim_end);
    let sim = Simulator {
        reader: LineChannel::new(r, tokio::io::sink()),
        writer: w,
    };
    (sim, handle)
}

fn init_message() -> Value {
    json!({
        "type": "INIT",
        "timestamp": 0.0,
        "warehouse_layout": {
            "nodes": [
                {"index": 1, "id": "DOCK", "type": "LoadingBay"},
                {"index": 3, "id": "S3", "type": "Shelf", "zone": "Hot"},
                {"index": 5, "id": "S5", "type": "Shelf", "zone": "Warm"},
                {"index": 8, "id": "S8", "type": "Shelf", "zone": "Cold"},
                {"index": 9, "id": "DESK", "type": "FrontDesk"}
            ],
            "edges": [{"from": 1, "to": 3, "distance": 4.0}]
        },
        "products": [{"id": 1, "name": "bolts"}, {"id": 2, "name": "nuts"}],
        "robots": [
            {"id": "robot_0", "index": 0, "battery": 80.0, "status": "Idle"},
            {"id": "robot_1", "index": 1, "battery": 20.0, "status": "Idle"}
        ]
    })
}

fn robot(index: i32, battery: f64, status: &str) -> Value {
    json!({"id": format!("robot_{}", index), "index": index, "current_node": 1, "battery": battery, "status": status})
}

fn task_message(task: Value, robots: Vec<Value>, inventory: Value) -> Value {
    json!({
        "type": "NEW_TASK",
        "timestamp": 12.5,
        "task": task,
        "state": {"sim_time": 12.5, "robots": robots, "inventory": inventory}
    })
}

fn customer_order(task_id: &str, product_id: i32, target: i32) -> Value {
    json!({
        "task_id": task_id,
        "task_type": "CUSTOMER_ORDER",
        "product_id": product_id,
        "quantity": 1,
        "target_node": target
    })
}

fn stocked_shelf() -> Value {
    json!([{"node_index": 5, "zone": "Warm", "slots": [
        {"slot_index": 0, "product_id": 1, "occupied": 3, "fill_rate": 0.6}
    ]}])
}

// ============================================================================
// Decision scenarios
// ============================================================================

#[tokio::test]
async fn test_customer_order_picks_strongest_idle_robot() {
    let (mut sim, agent) = start_agent(DecisionEngine::default());
    sim.handshake().await;

    sim.send(task_message(
        customer_order("T1", 1, 9),
        vec![robot(0, 80.0, "Idle"), robot(1, 20.0, "Idle")],
        stocked_shelf(),
    ))
    .await;

    let line = sim.recv_line().await;
    assert!(line.contains("\"strategy\":\"direct\""));
    assert_eq!(
        decode_outbound(&line).unwrap(),
        OutboundMessage::ActionDecision {
            task_id: "T1".to_string(),
            action: Action {
                robot_index: 0,
                action_type: ActionKind::PickupAndDeliver,
                product_id: 1,
                source_node: 5,
                target_node: 9,
                strategy: Strategy::Direct,
            },
        }
    );

    drop(sim);
    let summary = agent.await.unwrap().unwrap();
    assert_eq!(summary.reason, TerminationReason::ChannelClosed);
}

#[tokio::test]
async fn test_customer_order_waits_when_batteries_low() {
    let (mut sim, _agent) = start_agent(DecisionEngine::default());
    sim.handshake().await;

    sim.send(task_message(
        customer_order("T2", 1, 9),
        vec![robot(0, 25.0, "Idle"), robot(1, 20.0, "Idle")],
        stocked_shelf(),
    ))
    .await;

    assert_eq!(
        sim.recv().await,
        OutboundMessage::wait("T2", WaitReason::NoRobotsAvailable, 10.0)
    );
}

#[tokio::test]
async fn test_customer_order_waits_when_product_missing() {
    let (mut sim, _agent) = start_agent(DecisionEngine::default());
    sim.handshake().await;

    sim.send(task_message(
        customer_order("T3", 7, 9),
        vec![robot(0, 90.0, "Idle")],
        stocked_shelf(),
    ))
    .await;

    assert_eq!(
        sim.recv().await,
        OutboundMessage::wait("T3", WaitReason::ProductNotAvailable, 10.0)
    );
}

#[tokio::test]
async fn test_incoming_delivery_prefers_lower_adjusted_fill_rate() {
    let (mut sim, _agent) = start_agent(DecisionEngine::default());
    sim.handshake().await;

    let inventory = json!([
        {"node_index": 3, "zone": "Hot", "slots": [{"product_id": 2, "occupied": 19, "fill_rate": 0.95}]},
        {"node_index": 8, "zone": "Cold", "slots": [{"product_id": 2, "occupied": 14, "fill_rate": 0.7}]}
    ]);
    sim.send(task_message(
        json!({"task_id": "D1", "task_type": "INCOMING_DELIVERY", "product_id": 2, "quantity": 5, "source_node": 1}),
        vec![robot(0, 60.0, "Idle")],
        inventory,
    ))
    .await;

    match sim.recv().await {
        OutboundMessage::ActionDecision { task_id, action } => {
            assert_eq!(task_id, "D1");
            assert_eq!(action.action_type, ActionKind::Restock);
            assert_eq!(action.source_node, 1);
            assert_eq!(action.target_node, 8);
            assert_eq!(action.product_id, 2);
        }
        other => panic!("expected action, got {:?}", other),
    }
}

#[tokio::test]
async fn test_restock_request_and_unknown_task_type() {
    let (mut sim, _agent) = start_agent(DecisionEngine::default());
    sim.handshake().await;

    sim.send(task_message(
        json!({"task_id": "R1", "task_type": "RESTOCK_REQUEST", "product_id": 1, "source_node": 1, "target_node": 5}),
        vec![robot(0, 10.0, "Idle"), robot(1, 95.0, "Moving")],
        json!([]),
    ))
    .await;
    assert_eq!(
        sim.recv().await,
        OutboundMessage::wait("R1", WaitReason::LowPriorityDeferred, 10.0)
    );

    sim.send(task_message(
        json!({"task_id": "X1", "task_type": "TELEPORT"}),
        vec![robot(0, 99.0, "Idle")],
        json!([]),
    ))
    .await;
    assert_eq!(
        sim.recv().await,
        OutboundMessage::wait("X1", WaitReason::UnknownTaskType, 10.0)
    );
}

#[tokio::test]
async fn test_configured_thresholds_apply() {
    let engine = DecisionEngine::new(EngineConfig {
        min_battery: 10.0,
        wait_estimate_secs: 4.0,
        ..Default::default()
    });
    let (mut sim, _agent) = start_agent(engine);
    sim.handshake().await;

    sim.send(task_message(
        customer_order("T4", 1, 9),
        vec![robot(0, 15.0, "Idle")],
        stocked_shelf(),
    ))
    .await;
    assert!(sim.recv().await.is_decision());

    sim.send(task_message(customer_order("T5", 1, 9), vec![], stocked_shelf())).await;
    assert_eq!(
        sim.recv().await,
        OutboundMessage::wait("T5", WaitReason::NoRobotsAvailable, 4.0)
    );
}

#[tokio::test]
async fn test_task_with_null_facility_states() {
    let (mut sim, _agent) = start_agent(DecisionEngine::default());
    sim.handshake().await;

    // Facility sub-states are null when the layout has no such node.
    sim.send(json!({
        "type": "NEW_TASK",
        "timestamp": 40.0,
        "task": {
            "task_id": "N1",
            "task_type": "CUSTOMER_ORDER",
            "product_id": 1,
            "quantity": 1,
            "source_node": -1,
            "target_node": 9,
            "priority": "normal",
            "deadline": 0.0
        },
        "state": {
            "sim_time": 40.0,
            "robots": [{
                "id": "robot_0", "index": 0, "current_node": 1, "target_node": -1,
                "battery": 75.0, "status": "Idle", "carrying": false,
                "has_order": false, "speed": 1.0
            }],
            "inventory": [{
                "node_index": 5, "shelf_name": "S5", "zone": "Warm",
                "slots": [
                    {"slot_index": 0, "product_id": 1, "occupied": -1, "capacity": 10, "fill_rate": 0.0},
                    {"slot_index": 1, "product_id": 1, "occupied": 4, "capacity": 10, "fill_rate": 0.4}
                ]
            }],
            "loading_dock": null,
            "front_desk": null,
            "charging_station": null
        }
    }))
    .await;

    match sim.recv().await {
        OutboundMessage::ActionDecision { task_id, action } => {
            assert_eq!(task_id, "N1");
            assert_eq!(action.robot_index, 0);
            assert_eq!(action.source_node, 5);
            assert_eq!(action.target_node, 9);
        }
        other => panic!("expected action, got {:?}", other),
    }
}

// ============================================================================
// Lifecycle
// ============================================================================

#[tokio::test]
async fn test_decisions_follow_task_order() {
    let (mut sim, _agent) = start_agent(DecisionEngine::default());
    sim.handshake().await;

    for i in 0..5 {
        sim.send(task_message(
            customer_order(&format!("T{}", i), 1, 9),
            vec![robot(0, 80.0, "Idle")],
            stocked_shelf(),
        ))
        .await;
    }
    for i in 0..5 {
        let reply = sim.recv().await;
        assert_eq!(reply.task_id(), Some(format!("T{}", i).as_str()));
    }
}

#[tokio::test]
async fn test_events_and_noise_produce_no_replies() {
    let (mut sim, agent) = start_agent(DecisionEngine::default());
    sim.handshake().await;

    sim.send(json!({"type": "ROBOT_STATUS", "status_type": "TASK_COMPLETE", "robot_index": 0, "task_id": "T1"})).await;
    sim.send(json!({"type": "ACK", "task_id": "T1", "robot_index": 0})).await;
    sim.send(json!({"type": "ERROR", "message": "robot stuck", "robot_index": 1})).await;
    sim.send(json!({"type": "WEATHER_REPORT"})).await;
    sim.send_raw("this is not json").await;
    sim.send_raw("[1, 2, 3]").await;
    sim.send(json!({"type": "NEW_TASK", "task": {"task_type": "CUSTOMER_ORDER"}, "state": {}})).await;

    // The only reply is for this task.
    sim.send(task_message(
        customer_order("AFTER", 1, 9),
        vec![robot(0, 80.0, "Idle")],
        stocked_shelf(),
    ))
    .await;
    assert_eq!(sim.recv().await.task_id(), Some("AFTER"));

    drop(sim);
    let summary = agent.await.unwrap().unwrap();
    assert_eq!(summary.metrics.malformed, 3);
    assert_eq!(summary.metrics.inbound.get("WEATHER_REPORT"), Some(&1));
    assert_eq!(summary.metrics.inbound.get("ROBOT_STATUS"), Some(&1));
    assert_eq!(summary.metrics.total_decisions(), 1);
}

#[tokio::test]
async fn test_non_utf8_line_is_dropped() {
    let (mut sim, agent) = start_agent(DecisionEngine::default());
    sim.handshake().await;

    sim.send_bytes(b"\xff\xfe garbage").await;
    sim.send(task_message(
        customer_order("UTF", 1, 9),
        vec![robot(0, 80.0, "Idle")],
        stocked_shelf(),
    ))
    .await;
    assert_eq!(sim.recv().await.task_id(), Some("UTF"));

    drop(sim);
    let summary = agent.await.unwrap().unwrap();
    assert_eq!(summary.reason, TerminationReason::ChannelClosed);
    assert_eq!(summary.metrics.malformed, 1);
}

#[tokio::test]
async fn test_episode_cycle_requests_reset_and_rehandshakes() {
    let (mut sim, agent) = start_agent(DecisionEngine::default());
    sim.handshake().await;

    sim.send(task_message(
        customer_order("E1", 1, 9),
        vec![robot(0, 80.0, "Idle")],
        stocked_shelf(),
    ))
    .await;
    assert!(sim.recv().await.is_decision());

    sim.send(json!({"type": "EPISODE_END", "metrics": {"orders_completed": 1, "orders_failed": 0, "total_distance": 12.0}})).await;
    assert_eq!(sim.recv().await, OutboundMessage::reset(2));
    sim.handshake().await;

    sim.send(json!({"type": "EPISODE_END"})).await;
    assert_eq!(sim.recv().await, OutboundMessage::reset(3));
    sim.handshake().await;

    drop(sim);
    let summary = agent.await.unwrap().unwrap();
    assert_eq!(summary.completed_episodes, 2);
    assert_eq!(summary.reason, TerminationReason::ChannelClosed);
}

#[tokio::test]
async fn test_first_handshake_must_be_init() {
    let (mut sim, agent) = start_agent(DecisionEngine::default());
    sim.send(json!({"type": "ACK", "task_id": "T0"})).await;

    let result = agent.await.unwrap();
    assert!(matches!(result, Err(SessionError::HandshakeFailed(_))));
    assert_eq!(sim.reader.recv_line().await.unwrap(), None);
}

#[tokio::test]
async fn test_failed_rehandshake_stops_cleanly() {
    let (mut sim, agent) = start_agent(DecisionEngine::default());
    sim.handshake().await;

    sim.send(json!({"type": "EPISODE_END"})).await;
    assert_eq!(sim.recv().await, OutboundMessage::reset(2));
    sim.send(task_message(customer_order("LATE", 1, 9), vec![], json!([]))).await;

    let summary = agent.await.unwrap().unwrap();
    assert_eq!(summary.reason, TerminationReason::HandshakeFailed);
    assert_eq!(summary.completed_episodes, 1);
    assert_eq!(sim.reader.recv_line().await.unwrap(), None);
}

#[tokio::test]
async fn test_close_before_init_is_clean() {
    let (sim, agent) = start_agent(DecisionEngine::default());
    drop(sim);

    let summary = agent.await.unwrap().unwrap();
    assert_eq!(summary.reason, TerminationReason::ChannelClosed);
    assert_eq!(summary.metrics.outbound, 0);
}
