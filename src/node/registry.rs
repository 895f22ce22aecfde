//! Maps node type names to constructors.
//!
//! The same `create` path serves interactive creation and deserialization,
//! which guarantees that every constructible node type is also a
//! reconstructible one.

use ahash::AHashMap;

use crate::error::GraphError;
use crate::node::{animation, math, object, time, Node};

/// Constructor for one node type: builds the node at a canvas position with
/// its full socket shape declared.
pub type NodeFactory = fn(x: f32, y: f32) -> Node;

pub struct NodeRegistry {
    factories: AHashMap<String, NodeFactory>,
}

impl NodeRegistry {
    /// An empty registry. Most callers want [`with_defaults`](Self::with_defaults).
    pub fn new() -> Self {
        Self {
            factories: AHashMap::new(),
        }
    }

    /// A registry with every built-in node type registered.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        time::register_time_nodes(&mut registry);
        math::register_math_nodes(&mut registry);
        animation::register_animation_nodes(&mut registry);
        object::register_object_nodes(&mut registry);
        registry
    }

    /// Registers a constructor, replacing any previous registration for the
    /// same type name.
    pub fn register(&mut self, type_name: impl Into<String>, factory: NodeFactory) {
        self.factories.insert(type_name.into(), factory);
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.factories.contains_key(type_name)
    }

    /// Constructs a node of the named type at the given canvas position.
    pub fn create(&self, type_name: &str, x: f32, y: f32) -> Result<Node, GraphError> {
        let factory = self
            .factories
            .get(type_name)
            .ok_or_else(|| GraphError::UnknownNodeType {
                type_name: type_name.to_string(),
            })?;
        Ok(factory(x, y))
    }

    /// Registered type names, sorted for stable display.
    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_knows_all_builtin_types() {
        let registry = NodeRegistry::with_defaults();
        for name in [
            "Clock", "Number", "Add", "Subtract", "Multiply", "Divide", "Mix", "Spin", "Pulse",
            "Float", "Fade", "Position", "Rotation", "Scale", "Opacity",
        ] {
            assert!(registry.contains(name), "missing {name}");
        }
    }

    #[test]
    fn unknown_type_is_rejected() {
        let registry = NodeRegistry::with_defaults();
        assert!(matches!(
            registry.create("Teleport", 0.0, 0.0),
            Err(GraphError::UnknownNodeType { .. })
        ));
    }

    #[test]
    fn created_nodes_carry_their_declared_socket_shape() {
        let registry = NodeRegistry::with_defaults();
        let node = registry.create("Add", 10.0, 20.0).unwrap();
        assert_eq!(node.type_name(), "Add");
        assert_eq!(node.position(), (10.0, 20.0));
        assert_eq!(node.inputs().len(), 2);
        assert_eq!(node.outputs().len(), 1);
    }
}
