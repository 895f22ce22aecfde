//! The interaction graph: node and connection ownership, structural
//! mutations, dependency-respecting evaluation, and change notification.
//!
//! Cycle policy: connections that would create a cycle are rejected at
//! [`add_connection`](InteractionGraph::add_connection) time, so the graph is
//! always a DAG and evaluation is a plain topological walk.

use ahash::{AHashMap, AHashSet};
use log::{debug, error, warn};
use petgraph::algo::toposort;
use petgraph::graph::DiGraph;

use crate::bridge::HostBridge;
use crate::error::{GraphError, SocketKind};
use crate::node::{Node, NodeId, ProcessContext};
use crate::value::Value;

pub mod connection;
pub mod persist;

pub use connection::{Connection, ConnectionId};
pub use persist::{GraphData, LoadReport, NodeData};

/// One externally observable graph change. The host registers a listener and
/// debounces these into persistence writes; if an edit does not produce an
/// event it is silently lost on reload, so every mutation path must emit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent {
    NodeAdded(NodeId),
    NodeRemoved(NodeId),
    NodeMoved(NodeId),
    ObjectBound(NodeId),
    InputChanged { node: NodeId, input: String },
    ConnectionAdded(ConnectionId),
    ConnectionRemoved(ConnectionId),
    /// An evaluation pass wrote at least one scene-object property.
    Evaluated { writes: usize },
}

pub type ChangeListener = Box<dyn FnMut(&ChangeEvent)>;

/// Outcome of one evaluation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvalSummary {
    /// Nodes whose `process()` ran to completion.
    pub processed: usize,
    /// Nodes whose `process()` failed; their outputs kept the last good value.
    pub failed: usize,
    /// Nodes that wrote at least one scene-object property.
    pub writes: usize,
}

/// Owns the nodes and connections of one editor session.
pub struct InteractionGraph {
    pub(crate) nodes: AHashMap<NodeId, Node>,
    /// Insertion order; keeps evaluation and serialization deterministic.
    pub(crate) order: Vec<NodeId>,
    pub(crate) connections: Vec<Connection>,
    /// Ids of removed nodes. Never reused, so stale connections cannot be
    /// resurrected by re-adding a node under an old id.
    retired: AHashSet<NodeId>,
    eval_order: Option<Vec<NodeId>>,
    listener: Option<ChangeListener>,
    /// Per-node failure causes already logged, to keep evaluation errors from
    /// spamming once per frame.
    logged_failures: AHashSet<(NodeId, String)>,
}

impl Default for InteractionGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionGraph {
    pub fn new() -> Self {
        Self {
            nodes: AHashMap::new(),
            order: Vec::new(),
            connections: Vec::new(),
            retired: AHashSet::new(),
            eval_order: None,
            listener: None,
            logged_failures: AHashSet::new(),
        }
    }

    /// Registers the single change listener. The host wires this to its
    /// autosave debounce.
    pub fn set_change_listener(&mut self, listener: ChangeListener) {
        self.listener = Some(listener);
    }

    pub fn clear_change_listener(&mut self) {
        self.listener = None;
    }

    fn emit(&mut self, event: ChangeEvent) {
        if let Some(listener) = &mut self.listener {
            listener(&event);
        }
    }

    fn invalidate_eval_order(&mut self) {
        self.eval_order = None;
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.order.iter().filter_map(|id| self.nodes.get(id))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// The single connection terminating at the given input, if any.
    pub fn connection_to(&self, to_node: &NodeId, to_input: usize) -> Option<&Connection> {
        self.connections
            .iter()
            .find(|c| c.to_node == *to_node && c.to_input == to_input)
    }

    /// Inserts a node. The node already carries its identity; a colliding or
    /// previously retired id is an invariant violation, not a recoverable
    /// user error.
    pub fn add_node(&mut self, node: Node) -> Result<NodeId, GraphError> {
        let id = node.id().clone();
        if self.nodes.contains_key(&id) {
            return Err(GraphError::DuplicateNodeId { node_id: id });
        }
        if self.retired.contains(&id) {
            return Err(GraphError::NodeIdReused { node_id: id });
        }
        self.nodes.insert(id.clone(), node);
        self.order.push(id.clone());
        self.invalidate_eval_order();
        self.emit(ChangeEvent::NodeAdded(id.clone()));
        Ok(id)
    }

    /// Removes a node, cascading removal of every connection touching it.
    /// Removing an absent id is a no-op.
    pub fn remove_node(&mut self, id: &NodeId) -> Option<Node> {
        let node = self.nodes.remove(id)?;
        self.order.retain(|n| n != id);

        let (removed, kept): (Vec<Connection>, Vec<Connection>) = self
            .connections
            .drain(..)
            .partition(|c| c.touches(id));
        self.connections = kept;
        for connection in &removed {
            // The surviving endpoint's input falls back to its default.
            if connection.to_node != *id {
                self.reset_input(&connection.to_node, connection.to_input);
            }
            self.emit(ChangeEvent::ConnectionRemoved(connection.id.clone()));
        }

        self.retired.insert(id.clone());
        self.invalidate_eval_order();
        self.emit(ChangeEvent::NodeRemoved(id.clone()));
        Some(node)
    }

    /// Wires an output socket to an input socket.
    ///
    /// Validates endpoints, socket indices and data-type compatibility, and
    /// rejects connections that would create a cycle. If the target input is
    /// already fed, the old connection is silently replaced: last write wins,
    /// by policy. Re-creating an existing connection is a no-op.
    pub fn add_connection(
        &mut self,
        from_node: &NodeId,
        from_output: usize,
        to_node: &NodeId,
        to_input: usize,
    ) -> Result<ConnectionId, GraphError> {
        let from = self.nodes.get(from_node).ok_or_else(|| GraphError::NodeNotFound {
            node_id: from_node.clone(),
        })?;
        let to = self.nodes.get(to_node).ok_or_else(|| GraphError::NodeNotFound {
            node_id: to_node.clone(),
        })?;

        let output =
            from.outputs()
                .get(from_output)
                .ok_or_else(|| GraphError::SocketOutOfRange {
                    node_id: from_node.clone(),
                    kind: SocketKind::Output,
                    index: from_output,
                })?;
        let input = to
            .inputs()
            .get(to_input)
            .ok_or_else(|| GraphError::SocketOutOfRange {
                node_id: to_node.clone(),
                kind: SocketKind::Input,
                index: to_input,
            })?;

        if !input.data_type.accepts(output.data_type) {
            return Err(GraphError::TypeMismatch {
                from_node: from_node.clone(),
                from_output,
                from_type: output.data_type,
                to_node: to_node.clone(),
                to_input,
                to_type: input.data_type,
            });
        }

        // A cycle exists iff the target already reaches the source.
        if from_node == to_node || self.reaches(to_node, from_node) {
            return Err(GraphError::WouldCreateCycle {
                from_node: from_node.clone(),
                to_node: to_node.clone(),
            });
        }

        let connection = Connection::new(
            from_node.clone(),
            from_output,
            to_node.clone(),
            to_input,
        );
        let id = connection.id.clone();
        if self.connections.iter().any(|c| c.id == id) {
            return Ok(id);
        }

        // Single producer per input: drop whatever fed this socket before.
        if let Some(existing) = self.connection_to(to_node, to_input).cloned() {
            self.connections.retain(|c| c.id != existing.id);
            self.emit(ChangeEvent::ConnectionRemoved(existing.id));
        }

        self.connections.push(connection);
        self.invalidate_eval_order();
        self.emit(ChangeEvent::ConnectionAdded(id.clone()));
        Ok(id)
    }

    /// Removes a connection if present; removing an absent id is a no-op.
    pub fn remove_connection(&mut self, id: &ConnectionId) -> bool {
        let Some(index) = self.connections.iter().position(|c| c.id == *id) else {
            return false;
        };
        let connection = self.connections.remove(index);
        self.reset_input(&connection.to_node, connection.to_input);
        self.invalidate_eval_order();
        self.emit(ChangeEvent::ConnectionRemoved(connection.id));
        true
    }

    /// Moves a node on the canvas.
    pub fn set_position(&mut self, id: &NodeId, x: f32, y: f32) -> Result<(), GraphError> {
        let node = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| GraphError::NodeNotFound { node_id: id.clone() })?;
        node.set_position(x, y);
        self.emit(ChangeEvent::NodeMoved(id.clone()));
        Ok(())
    }

    /// Edits the value sitting on an unconnected input socket (also its new
    /// default, so the edit survives connect/disconnect cycles).
    pub fn set_input_value(
        &mut self,
        id: &NodeId,
        input: &str,
        value: Value,
    ) -> Result<(), GraphError> {
        let node = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| GraphError::NodeNotFound { node_id: id.clone() })?;
        let Some(index) = node.input_index(input) else {
            return Err(GraphError::NoSuchInput {
                node_id: id.clone(),
                name: input.to_string(),
            });
        };
        let socket = &mut node.inputs[index];
        if !socket.data_type.accepts(value.data_type()) {
            return Err(GraphError::ValueTypeMismatch {
                name: input.to_string(),
                expected: socket.data_type,
                value,
            });
        }
        let value = value.coerce_to(socket.data_type);
        socket.value = value.clone();
        socket.default = value;
        self.emit(ChangeEvent::InputChanged {
            node: id.clone(),
            input: input.to_string(),
        });
        Ok(())
    }

    /// Binds (or unbinds) a node to a scene object by stable identifier.
    pub fn bind_object(
        &mut self,
        id: &NodeId,
        object: Option<crate::bridge::ObjectId>,
    ) -> Result<(), GraphError> {
        let node = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| GraphError::NodeNotFound { node_id: id.clone() })?;
        node.bind_object(object);
        self.emit(ChangeEvent::ObjectBound(id.clone()));
        Ok(())
    }

    fn reset_input(&mut self, node_id: &NodeId, input: usize) {
        if let Some(node) = self.nodes.get_mut(node_id) {
            if let Some(socket) = node.inputs.get_mut(input) {
                socket.value = socket.default.clone();
            }
        }
    }

    /// Whether a directed path exists from `start` to `goal`.
    fn reaches(&self, start: &NodeId, goal: &NodeId) -> bool {
        let mut stack = vec![start];
        let mut seen: AHashSet<&NodeId> = AHashSet::new();
        while let Some(current) = stack.pop() {
            if current == goal {
                return true;
            }
            if !seen.insert(current) {
                continue;
            }
            for connection in &self.connections {
                if connection.from_node == *current {
                    stack.push(&connection.to_node);
                }
            }
        }
        false
    }

    /// The topological evaluation order, computed over the insertion-ordered
    /// node list so repeated passes without structural changes walk nodes
    /// identically.
    fn compute_eval_order(&self) -> Vec<NodeId> {
        let mut dependency_graph: DiGraph<NodeId, ()> = DiGraph::new();
        let mut indices = AHashMap::new();
        for id in &self.order {
            let index = dependency_graph.add_node(id.clone());
            indices.insert(id.clone(), index);
        }
        for connection in &self.connections {
            let (Some(&from), Some(&to)) = (
                indices.get(&connection.from_node),
                indices.get(&connection.to_node),
            ) else {
                continue;
            };
            dependency_graph.add_edge(from, to, ());
        }
        match toposort(&dependency_graph, None) {
            Ok(sorted) => sorted
                .into_iter()
                .map(|index| dependency_graph[index].clone())
                .collect(),
            Err(_) => {
                // Unreachable while add_connection rejects cycles; fall back
                // to insertion order rather than dropping the frame.
                error!("interaction graph contains a cycle; evaluating in insertion order");
                self.order.clone()
            }
        }
    }

    /// One evaluation pass: visits every node in dependency order, copies
    /// upstream outputs into connected inputs, and calls each node's
    /// `process()`. A failing node is logged (once per failure cause) and
    /// skipped; the rest of the pass continues.
    pub fn evaluate(&mut self, dt: f64, bridge: &mut dyn HostBridge) -> EvalSummary {
        let eval_order = match self.eval_order.take() {
            Some(order) => order,
            None => self.compute_eval_order(),
        };

        let mut summary = EvalSummary::default();
        for id in &eval_order {
            // Pull upstream values across connections, coercing to the
            // input socket's type.
            let mut incoming: Vec<(usize, Value)> = Vec::new();
            for connection in &self.connections {
                if connection.to_node != *id {
                    continue;
                }
                let Some(source) = self.nodes.get(&connection.from_node) else {
                    continue;
                };
                let Some(output) = source.outputs().get(connection.from_output) else {
                    continue;
                };
                let Some(target_type) = self
                    .nodes
                    .get(id)
                    .and_then(|n| n.inputs().get(connection.to_input))
                    .map(|s| s.data_type)
                else {
                    continue;
                };
                incoming.push((connection.to_input, output.value.coerce_to(target_type)));
            }

            let Some(node) = self.nodes.get_mut(id) else {
                continue;
            };
            for (index, value) in incoming {
                if let Some(socket) = node.inputs.get_mut(index) {
                    socket.value = value;
                }
            }

            let Node {
                inputs,
                outputs,
                object,
                behavior,
                ..
            } = node;
            let mut ctx = ProcessContext::new(inputs, outputs, object.as_ref(), bridge, dt);
            match behavior.process(&mut ctx) {
                Ok(()) => {
                    summary.processed += 1;
                    if ctx.wrote_scene() {
                        summary.writes += 1;
                    }
                }
                Err(e) => {
                    summary.failed += 1;
                    let key = (id.clone(), e.to_string());
                    if self.logged_failures.insert(key) {
                        warn!("node '{}' failed to evaluate: {}", id, e);
                    }
                }
            }
        }

        self.eval_order = Some(eval_order);
        debug!(
            "evaluation pass: processed={} failed={} writes={}",
            summary.processed, summary.failed, summary.writes
        );
        if summary.writes > 0 {
            self.emit(ChangeEvent::Evaluated {
                writes: summary.writes,
            });
        }
        summary
    }
}
