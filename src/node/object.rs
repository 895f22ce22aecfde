//! Object-property nodes: write their (possibly animated) input values onto
//! the bound scene object each tick and mirror the written value to their
//! output socket.
//!
//! After deserialization these nodes re-read the live object's current value
//! into their input defaults instead of trusting the persisted values; the
//! object may have been edited independently since the graph was saved.

use crate::bridge::{HostBridge, ObjectId, PropertyKey};
use crate::error::EvaluationError;
use crate::node::registry::NodeRegistry;
use crate::node::socket::InputSocket;
use crate::node::{Node, NodeBehavior, ProcessContext};
use crate::value::{DataType, Value};

/// Shared behavior for the three vector transform properties.
struct TransformBehavior {
    operation: &'static str,
    key: PropertyKey,
}

impl NodeBehavior for TransformBehavior {
    fn process(&mut self, ctx: &mut ProcessContext<'_>) -> Result<(), EvaluationError> {
        let x = ctx.number(self.operation, "x")?;
        let y = ctx.number(self.operation, "y")?;
        let z = ctx.number(self.operation, "z")?;
        let value = Value::Vector([x, y, z]);
        ctx.set_output("value", value.clone());
        // Unbound, or bound to an object that no longer exists: the node
        // keeps computing its output but has no scene effect.
        ctx.write_object(self.key, value);
        Ok(())
    }

    fn resync(
        &mut self,
        inputs: &mut [InputSocket],
        object: Option<&ObjectId>,
        bridge: &dyn HostBridge,
    ) {
        let Some(id) = object else { return };
        let Some(Value::Vector([x, y, z])) = bridge.read_property(id, self.key) else {
            return;
        };
        for (name, live) in [("x", x), ("y", y), ("z", z)] {
            if let Some(socket) = inputs.iter_mut().find(|s| s.name == name) {
                socket.value = Value::Number(live);
                socket.default = Value::Number(live);
            }
        }
    }
}

fn transform_node(operation: &'static str, key: PropertyKey, x: f32, y: f32) -> Node {
    let default_axis = match key {
        PropertyKey::Scale => 1.0,
        _ => 0.0,
    };
    let mut node = Node::new(operation, x, y, Box::new(TransformBehavior { operation, key }));
    node.add_input("x", DataType::Number, Value::Number(default_axis))
        .add_input("y", DataType::Number, Value::Number(default_axis))
        .add_input("z", DataType::Number, Value::Number(default_axis))
        .add_output("value", DataType::Vector);
    node
}

pub(crate) fn position(x: f32, y: f32) -> Node {
    transform_node("Position", PropertyKey::Position, x, y)
}

pub(crate) fn rotation(x: f32, y: f32) -> Node {
    transform_node("Rotation", PropertyKey::Rotation, x, y)
}

pub(crate) fn scale(x: f32, y: f32) -> Node {
    transform_node("Scale", PropertyKey::Scale, x, y)
}

/// Drives the bound object's material opacity from a single scalar input.
struct OpacityBehavior;

impl NodeBehavior for OpacityBehavior {
    fn process(&mut self, ctx: &mut ProcessContext<'_>) -> Result<(), EvaluationError> {
        let value = ctx.number("Opacity", "value")?.clamp(0.0, 1.0);
        ctx.set_output("value", Value::Number(value));
        ctx.write_object(PropertyKey::Opacity, Value::Number(value));
        Ok(())
    }

    fn resync(
        &mut self,
        inputs: &mut [InputSocket],
        object: Option<&ObjectId>,
        bridge: &dyn HostBridge,
    ) {
        let Some(id) = object else { return };
        let Some(live @ Value::Number(_)) = bridge.read_property(id, PropertyKey::Opacity) else {
            return;
        };
        if let Some(socket) = inputs.iter_mut().find(|s| s.name == "value") {
            socket.value = live.clone();
            socket.default = live;
        }
    }
}

pub(crate) fn opacity(x: f32, y: f32) -> Node {
    let mut node = Node::new("Opacity", x, y, Box::new(OpacityBehavior));
    node.add_input("value", DataType::Number, Value::Number(1.0))
        .add_output("value", DataType::Number);
    node
}

pub(crate) fn register_object_nodes(registry: &mut NodeRegistry) {
    registry.register("Position", position);
    registry.register("Rotation", rotation);
    registry.register("Scale", scale);
    registry.register("Opacity", opacity);
}
