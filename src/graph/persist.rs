//! JSON (de)serialization of the interaction graph.
//!
//! The format is embedded in the host project's save blob: node records carry
//! id, type, canvas position, the current input values keyed by socket name,
//! the bound object id, and any flattened type-specific state; connection
//! records carry the four endpoint fields.
//!
//! Loading is tolerant per item. An unknown node type is skipped with a
//! warning, a connection referencing a missing node or socket is dropped, and
//! a missing bound scene object loads with the binding cleared. The rest
//! of the graph always loads; the accumulated [`LoadReport`] feeds a one-time
//! summary warning in the UI.

use itertools::Itertools;
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::bridge::{HostBridge, ObjectId};
use crate::graph::InteractionGraph;
use crate::node::registry::NodeRegistry;
use crate::node::NodeId;
use crate::value::Value;

/// Serialized form of a whole graph.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GraphData {
    pub nodes: Vec<NodeData>,
    pub connections: Vec<ConnectionData>,
}

/// Serialized form of one node. Type-specific fields (e.g. an accumulated
/// animation phase) are flattened into the record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeData {
    pub id: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub inputs: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<ObjectId>,
    #[serde(flatten)]
    pub state: serde_json::Map<String, serde_json::Value>,
}

/// Serialized form of one connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionData {
    pub from_node_id: String,
    pub from_output_index: usize,
    pub to_node_id: String,
    pub to_input_index: usize,
}

/// Per-item inconsistencies encountered while loading a graph blob.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Nodes skipped entirely, as `(id, type, reason)`.
    pub skipped_nodes: Vec<(String, String, String)>,
    /// Connections dropped, with the reason.
    pub dropped_connections: Vec<(ConnectionData, String)>,
    /// Nodes whose bound object was not found in the scene. The binding is
    /// cleared on load; the node keeps computing its output unbound.
    pub unresolved_objects: Vec<(NodeId, ObjectId)>,
}

impl LoadReport {
    pub fn has_issues(&self) -> bool {
        !self.skipped_nodes.is_empty()
            || !self.dropped_connections.is_empty()
            || !self.unresolved_objects.is_empty()
    }

    /// One-line summary suitable for a one-time, non-blocking warning.
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if !self.skipped_nodes.is_empty() {
            let types = self
                .skipped_nodes
                .iter()
                .map(|(_, type_name, _)| type_name.as_str())
                .unique()
                .join(", ");
            parts.push(format!(
                "{} node(s) skipped (types: {})",
                self.skipped_nodes.len(),
                types
            ));
        }
        if !self.dropped_connections.is_empty() {
            parts.push(format!(
                "{} connection(s) dropped",
                self.dropped_connections.len()
            ));
        }
        if !self.unresolved_objects.is_empty() {
            let objects = self
                .unresolved_objects
                .iter()
                .map(|(_, object)| object.as_str())
                .unique()
                .join(", ");
            parts.push(format!("missing scene object(s): {}", objects));
        }
        if parts.is_empty() {
            "graph loaded cleanly".to_string()
        } else {
            format!("graph loaded with issues: {}", parts.join("; "))
        }
    }
}

impl InteractionGraph {
    /// Serializes the graph: nodes in insertion order, connections in
    /// creation order, input maps keyed deterministically.
    pub fn serialize(&self) -> GraphData {
        let nodes = self
            .nodes()
            .map(|node| NodeData {
                id: node.id().to_string(),
                type_name: node.type_name().to_string(),
                x: node.position().0,
                y: node.position().1,
                inputs: node
                    .inputs()
                    .iter()
                    .map(|s| (s.name.clone(), s.value.clone()))
                    .collect(),
                object: node.object().cloned(),
                state: node.save_state(),
            })
            .collect();
        let connections = self
            .connections()
            .iter()
            .map(|c| ConnectionData {
                from_node_id: c.from_node.to_string(),
                from_output_index: c.from_output,
                to_node_id: c.to_node.to_string(),
                to_input_index: c.to_input,
            })
            .collect();
        GraphData { nodes, connections }
    }

    pub fn to_json(&self) -> Result<String, crate::error::LoadError> {
        Ok(serde_json::to_string_pretty(&self.serialize())?)
    }

    /// Reconstructs a graph from its serialized form, reusing the registry's
    /// creation path and re-resolving scene-object bindings through the
    /// bridge. Always succeeds for well-formed data; per-item problems are
    /// collected into the returned [`LoadReport`].
    pub fn deserialize(
        data: &GraphData,
        registry: &NodeRegistry,
        bridge: &dyn HostBridge,
    ) -> (Self, LoadReport) {
        let mut graph = Self::new();
        let mut report = LoadReport::default();

        for record in &data.nodes {
            let mut node = match registry.create(&record.type_name, record.x, record.y) {
                Ok(node) => node,
                Err(e) => {
                    warn!("skipping node '{}': {}", record.id, e);
                    report.skipped_nodes.push((
                        record.id.clone(),
                        record.type_name.clone(),
                        e.to_string(),
                    ));
                    continue;
                }
            };
            node.restore_id(NodeId(record.id.clone()));

            for (name, value) in &record.inputs {
                let Some(index) = node.input_index(name) else {
                    warn!(
                        "node '{}' has no input '{}'; ignoring persisted value",
                        record.id, name
                    );
                    continue;
                };
                let socket = &mut node.inputs[index];
                if socket.data_type.accepts(value.data_type()) {
                    let value = value.coerce_to(socket.data_type);
                    socket.value = value.clone();
                    socket.default = value;
                }
            }

            if let Some(object) = &record.object {
                if bridge.object_exists(object) {
                    node.bind_object(Some(object.clone()));
                } else {
                    // Bind as null rather than failing the node every tick;
                    // the user re-binds from the report.
                    warn!(
                        "node '{}' was bound to missing scene object '{}'; binding cleared",
                        record.id, object
                    );
                    report
                        .unresolved_objects
                        .push((node.id().clone(), object.clone()));
                }
            }

            node.restore_state(&record.state);

            if let Err(e) = graph.add_node(node) {
                warn!("skipping node '{}': {}", record.id, e);
                report.skipped_nodes.push((
                    record.id.clone(),
                    record.type_name.clone(),
                    e.to_string(),
                ));
            }
        }

        for record in &data.connections {
            let from = NodeId(record.from_node_id.clone());
            let to = NodeId(record.to_node_id.clone());
            if let Err(e) = graph.add_connection(
                &from,
                record.from_output_index,
                &to,
                record.to_input_index,
            ) {
                warn!(
                    "dropping connection {} -> {}: {}",
                    record.from_node_id, record.to_node_id, e
                );
                report
                    .dropped_connections
                    .push((record.clone(), e.to_string()));
            }
        }

        // Mandatory post-load sync: object-property nodes re-read the live
        // object into their input defaults.
        let ids: Vec<NodeId> = graph.order.clone();
        for id in ids {
            if let Some(node) = graph.nodes.get_mut(&id) {
                node.resync(bridge);
            }
        }

        if report.has_issues() {
            warn!("{}", report.summary());
        }
        (graph, report)
    }

    pub fn from_json(
        json: &str,
        registry: &NodeRegistry,
        bridge: &dyn HostBridge,
    ) -> Result<(Self, LoadReport), crate::error::LoadError> {
        let data: GraphData = serde_json::from_str(json)?;
        Ok(Self::deserialize(&data, registry, bridge))
    }
}
