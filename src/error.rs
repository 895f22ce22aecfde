use crate::node::NodeId;
use crate::value::{DataType, Value};
use thiserror::Error;

/// Errors raised synchronously by structural graph mutations. The graph is
/// left unchanged when any of these is returned.
#[derive(Error, Debug, Clone)]
pub enum GraphError {
    #[error("No node type named '{type_name}' is registered")]
    UnknownNodeType { type_name: String },

    #[error("A node with id '{node_id}' already exists in the graph")]
    DuplicateNodeId { node_id: NodeId },

    #[error("Node id '{node_id}' was removed earlier and may not be reused")]
    NodeIdReused { node_id: NodeId },

    #[error("Node '{node_id}' not found")]
    NodeNotFound { node_id: NodeId },

    #[error("Node '{node_id}' has no {kind} socket at index {index}")]
    SocketOutOfRange {
        node_id: NodeId,
        kind: SocketKind,
        index: usize,
    },

    #[error("Node '{node_id}' has no input socket named '{name}'")]
    NoSuchInput { node_id: NodeId, name: String },

    #[error(
        "Cannot connect: output '{from_node}'[{from_output}] is {from_type}, \
         input '{to_node}'[{to_input}] expects {to_type}"
    )]
    TypeMismatch {
        from_node: NodeId,
        from_output: usize,
        from_type: DataType,
        to_node: NodeId,
        to_input: usize,
        to_type: DataType,
    },

    #[error("Cannot connect '{from_node}' to '{to_node}': the connection would create a cycle")]
    WouldCreateCycle { from_node: NodeId, to_node: NodeId },

    #[error("Value {value} is not assignable to input '{name}' of type {expected}")]
    ValueTypeMismatch {
        name: String,
        expected: DataType,
        value: Value,
    },
}

/// Which side of a node a socket index referred to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocketKind {
    Input,
    Output,
}

impl std::fmt::Display for SocketKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SocketKind::Input => f.write_str("input"),
            SocketKind::Output => f.write_str("output"),
        }
    }
}

/// Errors raised by a single node's `process()` call. These are caught at the
/// per-node boundary during an evaluation pass and never abort the pass.
#[derive(Error, Debug, Clone)]
pub enum EvaluationError {
    #[error("'{operation}' expected {expected} on input '{input}', but found value '{found}'")]
    TypeMismatch {
        operation: String,
        input: String,
        expected: DataType,
        found: Value,
    },

    #[error("'{operation}' attempted to divide by zero")]
    DivisionByZero { operation: String },
}

/// Errors raised while decoding a persisted graph blob. Per-item
/// inconsistencies inside a well-formed blob are not hard errors; they are
/// collected into a [`LoadReport`](crate::graph::LoadReport) instead.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to parse graph JSON: {0}")]
    Json(#[from] serde_json::Error),
}
