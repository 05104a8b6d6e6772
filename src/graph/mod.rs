//! The workflow graph being authored: configured nodes and the directed edges between them.
//!
//! Nodes live in an arena keyed by [`NodeId`]. Ids come from a counter owned by the graph,
//! so they are never reused within one editing session, and because the counter only grows,
//! iterating the arena yields nodes in insertion order.

use crate::backend::WorkflowStore;
use crate::error::{ClientError, GraphError};
use crate::form::{FieldValue, FormSubmission};
use crate::schema::NodeTypeDescriptor;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info, warn};

pub mod card;
mod layout;
mod payload;

pub use card::NodeCardFormatter;
pub use layout::*;
pub use payload::*;

const NODE_ID_PREFIX: &str = "node_";

/// Identifier of a node within one graph, rendered as `node_<n>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    /// The counter value this id was allocated from.
    pub fn index(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", NODE_ID_PREFIX, self.0)
    }
}

impl FromStr for NodeId {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix(NODE_ID_PREFIX)
            .and_then(|n| n.parse().ok())
            .map(NodeId)
            .ok_or_else(|| GraphError::MalformedNodeId(s.to_string()))
    }
}

/// The node type a graph node was created from. Borrowed by value, not owned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeTypeRef {
    pub id: String,
    pub display_name: String,
    pub color: Option<String>,
}

impl From<&NodeTypeDescriptor> for NodeTypeRef {
    fn from(descriptor: &NodeTypeDescriptor) -> Self {
        Self {
            id: descriptor.id.clone(),
            display_name: descriptor.display_name.clone(),
            color: descriptor.color.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub id: NodeId,
    pub node_type: NodeTypeRef,
    pub label: String,
    pub action: String,
    pub config: BTreeMap<String, FieldValue>,
    pub position: Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphEdge {
    pub source: NodeId,
    pub target: NodeId,
}

/// One workflow being edited.
#[derive(Debug, Clone)]
pub struct WorkflowGraph {
    name: String,
    nodes: BTreeMap<NodeId, GraphNode>,
    edges: Vec<GraphEdge>,
    next_id: u64,
    layout: GridLayout,
}

impl Default for WorkflowGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkflowGraph {
    pub const DEFAULT_NAME: &'static str = "Untitled Workflow";

    pub fn new() -> Self {
        Self::with_layout(GridLayout::default())
    }

    pub fn with_layout(layout: GridLayout) -> Self {
        Self {
            name: Self::DEFAULT_NAME.to_string(),
            nodes: BTreeMap::new(),
            edges: Vec::new(),
            next_id: 0,
            layout,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Appends an unconfigured node and returns its id.
    pub fn add_node(
        &mut self,
        node_type: impl Into<NodeTypeRef>,
        action: impl Into<String>,
    ) -> NodeId {
        let slot = self.next_id;
        self.next_id += 1;

        let id = NodeId(slot);
        let node_type = node_type.into();
        let node = GraphNode {
            id,
            label: node_type.display_name.clone(),
            node_type,
            action: action.into(),
            config: BTreeMap::new(),
            position: self.layout.position(slot),
        };
        debug!(node = %id, node_type = %node.node_type.id, action = %node.action, "node added");
        self.nodes.insert(id, node);
        id
    }

    /// Adds a node and applies a submitted configuration form to it in one step.
    pub fn add_configured(
        &mut self,
        descriptor: &NodeTypeDescriptor,
        submission: FormSubmission,
    ) -> NodeId {
        let id = self.add_node(descriptor, submission.action);
        if let Some(node) = self.nodes.get_mut(&id) {
            node.config = submission.values;
        }
        id
    }

    /// Replaces a node's configuration.
    pub fn configure(
        &mut self,
        id: NodeId,
        config: BTreeMap<String, FieldValue>,
    ) -> Result<(), GraphError> {
        let node = self.nodes.get_mut(&id).ok_or_else(|| GraphError::NodeNotFound {
            node_id: id.to_string(),
            role: "configuration target",
        })?;
        debug!(node = %id, fields = config.len(), "node configured");
        node.config = config;
        Ok(())
    }

    pub fn node(&self, id: NodeId) -> Option<&GraphNode> {
        self.nodes.get(&id)
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.values()
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn require(&self, id: NodeId, role: &'static str) -> Result<(), GraphError> {
        if self.nodes.contains_key(&id) {
            Ok(())
        } else {
            Err(GraphError::NodeNotFound {
                node_id: id.to_string(),
                role,
            })
        }
    }

    /// Appends a directed edge. Cycles, self-loops and parallel edges are allowed;
    /// both endpoints must exist.
    pub fn connect(&mut self, source: NodeId, target: NodeId) -> Result<(), GraphError> {
        self.require(source, "edge source")?;
        self.require(target, "edge target")?;
        debug!(%source, %target, "nodes connected");
        self.edges.push(GraphEdge { source, target });
        Ok(())
    }

    /// Removes every edge from `source` to `target`, returning how many were removed.
    pub fn disconnect(&mut self, source: NodeId, target: NodeId) -> usize {
        let before = self.edges.len();
        self.edges
            .retain(|e| !(e.source == source && e.target == target));
        before - self.edges.len()
    }

    /// Removes a node together with every edge that touches it.
    pub fn delete_node(&mut self, id: NodeId) -> Option<GraphNode> {
        let node = self.nodes.remove(&id)?;
        let before = self.edges.len();
        self.edges.retain(|e| e.source != id && e.target != id);
        debug!(node = %id, edges_removed = before - self.edges.len(), "node deleted");
        Some(node)
    }

    /// The persistence payload: nodes in insertion order, edges as plain endpoint pairs.
    pub fn to_payload(&self) -> WorkflowPayload {
        WorkflowPayload {
            name: self.name.clone(),
            nodes: self
                .nodes
                .values()
                .map(|n| PayloadNode {
                    node_type: n.node_type.id.clone(),
                    data: n.config.clone(),
                })
                .collect(),
            edges: self
                .edges
                .iter()
                .map(|e| PayloadEdge {
                    source: e.source.to_string(),
                    target: e.target.to_string(),
                })
                .collect(),
        }
    }

    /// Submits the graph to `store`. The graph is left untouched whatever the outcome.
    pub async fn save<S>(&self, store: &S) -> Result<Value, ClientError>
    where
        S: WorkflowStore + ?Sized,
    {
        let payload = self.to_payload();
        match store.save_workflow(&payload).await {
            Ok(created) => {
                info!(workflow = %self.name, nodes = payload.nodes.len(), "workflow saved");
                Ok(created)
            }
            Err(e) => {
                warn!(workflow = %self.name, error = %e, "failed to save workflow");
                Err(e)
            }
        }
    }
}
