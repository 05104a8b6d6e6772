//! Tests for the workflow graph, its payload and card rendering.
mod common;
use common::*;
use flowcraft::graph::{NodeTypeRef, Position};
use flowcraft::prelude::*;
use serde_json::json;
use tokio_test::block_on;

fn configured_graph() -> (WorkflowGraph, NodeId, NodeId) {
    let descriptor = chat_descriptor();
    let mut form = FormSession::new(&descriptor);
    form.select_resource("message");
    form.select_operation("post").unwrap();
    form.set_input("channel", "#general").unwrap();

    let mut graph = WorkflowGraph::new();
    let trigger = graph.add_node(&bare_descriptor("schedule", "Schedule"), "Every day");
    let post = graph.add_configured(&descriptor, form.submit(&RequiredFields::None).unwrap());
    graph.connect(trigger, post).unwrap();
    (graph, trigger, post)
}

#[test]
fn test_add_node_assigns_sequential_ids_and_grid_positions() {
    let descriptor = chat_descriptor();
    let mut graph = WorkflowGraph::new();
    let ids: Vec<NodeId> = (0..5)
        .map(|_| graph.add_node(&descriptor, "Send a message"))
        .collect();

    let rendered: Vec<String> = ids.iter().map(ToString::to_string).collect();
    assert_eq!(rendered, vec!["node_0", "node_1", "node_2", "node_3", "node_4"]);
    assert_eq!(graph.len(), 5);

    let at = |i: usize| graph.node(ids[i]).unwrap().position;
    assert_eq!(at(0), Position { x: 100.0, y: 100.0 });
    assert_eq!(at(1), Position { x: 400.0, y: 100.0 });
    assert_eq!(at(3), Position { x: 100.0, y: 250.0 });
    assert_eq!(at(4), Position { x: 400.0, y: 250.0 });
}

#[test]
fn test_new_node_copies_type_and_starts_unconfigured() {
    let descriptor = chat_descriptor();
    let mut graph = WorkflowGraph::new();
    let id = graph.add_node(&descriptor, "Send a message");
    let node = graph.node(id).unwrap();

    assert_eq!(node.label, "Slack");
    assert_eq!(node.action, "Send a message");
    assert_eq!(
        node.node_type,
        NodeTypeRef {
            id: "64f0c0ffee".to_string(),
            display_name: "Slack".to_string(),
            color: Some("#4A154B".to_string()),
        }
    );
    assert!(node.config.is_empty());
}

#[test]
fn test_ids_are_not_reused_after_delete() {
    let mut graph = WorkflowGraph::new();
    let schedule = bare_descriptor("schedule", "Schedule");
    let first = graph.add_node(&schedule, "Every day");
    graph.add_node(&schedule, "Every hour");
    graph.delete_node(first).unwrap();

    let third = graph.add_node(&schedule, "Every week");
    assert_eq!(third.to_string(), "node_2");
    assert_eq!(graph.node(third).unwrap().position, Position { x: 700.0, y: 100.0 });
    assert!(graph.node(first).is_none());
}

#[test]
fn test_delete_removes_exactly_incident_edges() {
    let schedule = bare_descriptor("schedule", "Schedule");
    let mut graph = WorkflowGraph::new();
    let a = graph.add_node(&schedule, "a");
    let b = graph.add_node(&schedule, "b");
    let c = graph.add_node(&schedule, "c");
    let d = graph.add_node(&schedule, "d");
    graph.connect(a, b).unwrap();
    graph.connect(b, c).unwrap();
    graph.connect(c, b).unwrap();
    graph.connect(a, d).unwrap();
    graph.connect(b, b).unwrap();

    let removed = graph.delete_node(b).unwrap();
    assert_eq!(removed.id, b);
    assert!(graph.edges().iter().all(|e| e.source != b && e.target != b));
    assert_eq!(graph.edges(), [GraphEdge { source: a, target: d }]);
    assert_eq!(graph.len(), 3);

    assert!(graph.delete_node(b).is_none());
}

#[test]
fn test_connect_rejects_unknown_endpoints() {
    let mut graph = WorkflowGraph::new();
    let a = graph.add_node(&bare_descriptor("schedule", "Schedule"), "a");
    let ghost: NodeId = "node_42".parse().unwrap();

    assert_eq!(
        graph.connect(a, ghost),
        Err(GraphError::NodeNotFound {
            node_id: "node_42".to_string(),
            role: "edge target"
        })
    );
    assert!(matches!(
        graph.connect(ghost, a),
        Err(GraphError::NodeNotFound { role: "edge source", .. })
    ));
    assert!(graph.edges().is_empty());
}

#[test]
fn test_parallel_edges_and_disconnect() {
    let schedule = bare_descriptor("schedule", "Schedule");
    let mut graph = WorkflowGraph::new();
    let a = graph.add_node(&schedule, "a");
    let b = graph.add_node(&schedule, "b");
    graph.connect(a, b).unwrap();
    graph.connect(a, b).unwrap();
    graph.connect(b, a).unwrap();

    assert_eq!(graph.disconnect(a, b), 2);
    assert_eq!(graph.edges(), [GraphEdge { source: b, target: a }]);
    assert_eq!(graph.disconnect(a, b), 0);
}

#[test]
fn test_node_id_parsing() {
    assert_eq!("node_7".parse::<NodeId>().unwrap().index(), 7);
    assert_eq!(
        "node-7".parse::<NodeId>(),
        Err(GraphError::MalformedNodeId("node-7".to_string()))
    );
    assert!("node_".parse::<NodeId>().is_err());
}

#[test]
fn test_configure_replaces_config() {
    let (mut graph, trigger, _) = configured_graph();
    let mut config = std::collections::BTreeMap::new();
    config.insert("cron".to_string(), FieldValue::Text("0 9 * * *".to_string()));
    graph.configure(trigger, config.clone()).unwrap();
    assert_eq!(graph.node(trigger).unwrap().config, config);

    let ghost: NodeId = "node_9".parse().unwrap();
    assert!(graph.configure(ghost, config).is_err());
}

#[test]
fn test_payload_preserves_insertion_order_and_shape() {
    let (mut graph, _, _) = configured_graph();
    graph.rename("Daily digest");

    let payload = graph.to_payload();
    let types: Vec<_> = payload.nodes.iter().map(|n| n.node_type.as_str()).collect();
    assert_eq!(types, vec!["schedule", "64f0c0ffee"]);

    assert_eq!(
        serde_json::to_value(&payload).unwrap(),
        json!({
            "name": "Daily digest",
            "nodes": [
                {"type": "schedule", "data": {}},
                {"type": "64f0c0ffee", "data": {"channel": "#general"}}
            ],
            "edges": [{"source": "node_0", "target": "node_1"}]
        })
    );
}

#[test]
fn test_default_name() {
    let graph = WorkflowGraph::new();
    assert_eq!(graph.name(), "Untitled Workflow");
    assert!(graph.is_empty());
    assert!(graph.to_payload().nodes.is_empty());
}

#[test]
fn test_save_sends_payload_and_keeps_graph() {
    let (graph, _, _) = configured_graph();
    let store = RecordingStore::default();

    let created = block_on(graph.save(&store)).unwrap();
    assert_eq!(created["id"], "wf1");
    assert_eq!(store.workflows.lock().unwrap()[0], graph.to_payload());
    assert_eq!(graph.len(), 2);
}

#[test]
fn test_failed_save_surfaces_error_and_keeps_graph() {
    let (graph, _, _) = configured_graph();
    let store = RecordingStore {
        failing: true,
        ..RecordingStore::default()
    };

    let err = block_on(graph.save(&store)).unwrap_err();
    assert!(matches!(err, ClientError::Status { status: 503, .. }));
    assert_eq!(graph.len(), 2);
    assert_eq!(graph.edges().len(), 1);
}

#[test]
fn test_card_formatting() {
    let (graph, trigger, post) = configured_graph();
    let post = graph.node(post).unwrap();

    assert_eq!(
        NodeCardFormatter::format_card(post),
        "[node_1] Slack (#4A154B)\n  Send a message\n    channel: #general"
    );
    assert_eq!(
        NodeCardFormatter::format_inline(post),
        "node_1 Slack/Send a message {channel=#general}"
    );

    let trigger = graph.node(trigger).unwrap();
    assert_eq!(NodeCardFormatter::format_header(trigger), "[node_0] Schedule");
    assert_eq!(
        NodeCardFormatter::format_inline(trigger),
        "node_0 Schedule/Every day"
    );
}
