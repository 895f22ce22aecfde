//! Source nodes: no inputs, a time-derived output each tick.

use crate::error::EvaluationError;
use crate::node::registry::NodeRegistry;
use crate::node::{Node, NodeBehavior, ProcessContext};
use crate::value::{DataType, Value};

/// Monotonically accumulating clock. Elapsed time deliberately does not
/// survive save/load; a reloaded graph starts its clocks at zero.
#[derive(Default)]
struct ClockBehavior {
    elapsed: f64,
}

impl NodeBehavior for ClockBehavior {
    fn process(&mut self, ctx: &mut ProcessContext<'_>) -> Result<(), EvaluationError> {
        self.elapsed += ctx.dt();
        ctx.set_output("seconds", Value::Number(self.elapsed));
        ctx.set_output("delta", Value::Number(ctx.dt()));
        Ok(())
    }
}

pub(crate) fn clock(x: f32, y: f32) -> Node {
    let mut node = Node::new("Clock", x, y, Box::new(ClockBehavior::default()));
    node.add_output("seconds", DataType::Number)
        .add_output("delta", DataType::Number);
    node
}

/// Configured constant. The value lives on the (usually unconnected) input
/// socket, so it persists through the ordinary `inputs` map and is editable
/// from the canvas like any other socket value.
#[derive(Default)]
struct NumberBehavior;

impl NodeBehavior for NumberBehavior {
    fn process(&mut self, ctx: &mut ProcessContext<'_>) -> Result<(), EvaluationError> {
        let value = ctx.number("Number", "value")?;
        ctx.set_output("value", Value::Number(value));
        Ok(())
    }
}

pub(crate) fn number(x: f32, y: f32) -> Node {
    let mut node = Node::new("Number", x, y, Box::new(NumberBehavior));
    node.add_input("value", DataType::Number, Value::Number(0.0))
        .add_output("value", DataType::Number);
    node
}

pub(crate) fn register_time_nodes(registry: &mut NodeRegistry) {
    registry.register("Clock", clock);
    registry.register("Number", number);
}
