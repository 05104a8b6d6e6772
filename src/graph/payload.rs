use crate::form::FieldValue;
use serde::Serialize;
use std::collections::BTreeMap;

/// Body of `POST /api/create-workflows`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowPayload {
    pub name: String,
    pub nodes: Vec<PayloadNode>,
    pub edges: Vec<PayloadEdge>,
}

/// A node as persisted: its node-type id and its configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayloadNode {
    #[serde(rename = "type")]
    pub node_type: String,
    pub data: BTreeMap<String, FieldValue>,
}

/// A directed connection as persisted; nothing beyond the endpoints is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PayloadEdge {
    pub source: String,
    pub target: String,
}
