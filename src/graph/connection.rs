use std::fmt;

use crate::node::NodeId;

/// Identifier of a connection, deterministically derived from its four
/// endpoint fields. Two attempts to create the same wire therefore collide on
/// the same id and duplicates are naturally rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionId(String);

impl ConnectionId {
    pub(crate) fn derive(
        from_node: &NodeId,
        from_output: usize,
        to_node: &NodeId,
        to_input: usize,
    ) -> Self {
        Self(format!("{from_node}:{from_output}->{to_node}:{to_input}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A directed edge from one node's output socket to another node's input
/// socket. At most one connection terminates at a given input; an output may
/// fan out to many connections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub id: ConnectionId,
    pub from_node: NodeId,
    pub from_output: usize,
    pub to_node: NodeId,
    pub to_input: usize,
}

impl Connection {
    pub fn new(from_node: NodeId, from_output: usize, to_node: NodeId, to_input: usize) -> Self {
        let id = ConnectionId::derive(&from_node, from_output, &to_node, to_input);
        Self {
            id,
            from_node,
            from_output,
            to_node,
            to_input,
        }
    }

    /// Whether either endpoint references the given node.
    pub fn touches(&self, node_id: &NodeId) -> bool {
        self.from_node == *node_id || self.to_node == *node_id
    }
}
