//! Pure math nodes: N numeric inputs, one output, no side effects, safe to
//! re-evaluate any number of times.

use crate::error::EvaluationError;
use crate::node::registry::NodeRegistry;
use crate::node::{Node, NodeBehavior, ProcessContext};
use crate::value::{DataType, Value};

/// Master macro defining the binary arithmetic node family: behavior struct,
/// constructor, and registration in one place.
macro_rules! define_binary_math_nodes {
    ( $( ($behavior:ident, $type_name:expr, $ctor:ident, $op:expr) ),* $(,)? ) => {
        $(
            #[derive(Default)]
            struct $behavior;

            impl NodeBehavior for $behavior {
                fn process(&mut self, ctx: &mut ProcessContext<'_>) -> Result<(), EvaluationError> {
                    let a = ctx.number($type_name, "a")?;
                    let b = ctx.number($type_name, "b")?;
                    let result: Result<f64, EvaluationError> = $op(a, b);
                    ctx.set_output("result", Value::Number(result?));
                    Ok(())
                }
            }

            pub(crate) fn $ctor(x: f32, y: f32) -> Node {
                let mut node = Node::new($type_name, x, y, Box::new($behavior));
                node.add_input("a", DataType::Number, Value::Number(0.0))
                    .add_input("b", DataType::Number, Value::Number(0.0))
                    .add_output("result", DataType::Number);
                node
            }
        )*

        pub(crate) fn register_math_nodes(registry: &mut NodeRegistry) {
            $( registry.register($type_name, $ctor); )*
            registry.register("Mix", mix);
        }
    };
}

define_binary_math_nodes! {
    (AddBehavior, "Add", add, |a, b| Ok(a + b)),
    (SubtractBehavior, "Subtract", subtract, |a, b| Ok(a - b)),
    (MultiplyBehavior, "Multiply", multiply, |a, b| Ok(a * b)),
    (DivideBehavior, "Divide", divide, |a: f64, b: f64| {
        if b == 0.0 {
            Err(EvaluationError::DivisionByZero { operation: "Divide".to_string() })
        } else {
            Ok(a / b)
        }
    }),
}

/// Linear interpolation between two vectors. The vector inputs accept scalar
/// upstreams through the documented broadcast coercion.
#[derive(Default)]
struct MixBehavior;

impl NodeBehavior for MixBehavior {
    fn process(&mut self, ctx: &mut ProcessContext<'_>) -> Result<(), EvaluationError> {
        let a = ctx.vector("Mix", "a")?;
        let b = ctx.vector("Mix", "b")?;
        let t = ctx.number("Mix", "t")?.clamp(0.0, 1.0);
        let result = [
            a[0] + (b[0] - a[0]) * t,
            a[1] + (b[1] - a[1]) * t,
            a[2] + (b[2] - a[2]) * t,
        ];
        ctx.set_output("result", Value::Vector(result));
        Ok(())
    }
}

pub(crate) fn mix(x: f32, y: f32) -> Node {
    let mut node = Node::new("Mix", x, y, Box::new(MixBehavior));
    node.add_input("a", DataType::Vector, Value::Vector([0.0, 0.0, 0.0]))
        .add_input("b", DataType::Vector, Value::Vector([1.0, 1.0, 1.0]))
        .add_input("t", DataType::Number, Value::Number(0.5))
        .add_output("result", DataType::Vector);
    node
}
