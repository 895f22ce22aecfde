//! Animation-behavior nodes: combine delta time with configured parameters
//! to produce a continuously varying output, typically feeding an
//! object-property node.
//!
//! All of these integrate with the tick's delta time rather than assuming a
//! fixed step, and all persist their accumulated phase so a saved animation
//! resumes where it left off.

use std::f64::consts::TAU;

use crate::error::EvaluationError;
use crate::node::registry::NodeRegistry;
use crate::node::{Node, NodeBehavior, ProcessContext};
use crate::value::{DataType, Value};

fn phase_state(phase: f64) -> serde_json::Map<String, serde_json::Value> {
    let mut state = serde_json::Map::new();
    state.insert("phase".to_string(), serde_json::json!(phase));
    state
}

fn restore_phase(state: &serde_json::Map<String, serde_json::Value>) -> Option<f64> {
    state.get("phase").and_then(|v| v.as_f64())
}

/// Accumulates an angle at a configurable angular speed (radians/second).
#[derive(Default)]
struct SpinBehavior {
    phase: f64,
}

impl NodeBehavior for SpinBehavior {
    fn process(&mut self, ctx: &mut ProcessContext<'_>) -> Result<(), EvaluationError> {
        let speed = ctx.number("Spin", "speed")?;
        self.phase += speed * ctx.dt();
        ctx.set_output("angle", Value::Number(self.phase));
        Ok(())
    }

    fn save_state(&self) -> serde_json::Map<String, serde_json::Value> {
        phase_state(self.phase)
    }

    fn restore_state(&mut self, state: &serde_json::Map<String, serde_json::Value>) {
        if let Some(phase) = restore_phase(state) {
            self.phase = phase;
        }
    }
}

pub(crate) fn spin(x: f32, y: f32) -> Node {
    let mut node = Node::new("Spin", x, y, Box::new(SpinBehavior::default()));
    node.add_input("speed", DataType::Number, Value::Number(1.0))
        .add_output("angle", DataType::Number);
    node
}

/// Raised-cosine pulse in `0..=amplitude`, plus a square-wave gate output for
/// boolean consumers.
#[derive(Default)]
struct PulseBehavior {
    phase: f64,
}

impl NodeBehavior for PulseBehavior {
    fn process(&mut self, ctx: &mut ProcessContext<'_>) -> Result<(), EvaluationError> {
        let frequency = ctx.number("Pulse", "frequency")?;
        let amplitude = ctx.number("Pulse", "amplitude")?;
        self.phase += frequency * ctx.dt();
        let wave = amplitude * 0.5 * (1.0 - (TAU * self.phase).cos());
        let gate = self.phase.rem_euclid(1.0) < 0.5;
        ctx.set_output("wave", Value::Number(wave));
        ctx.set_output("gate", Value::Bool(gate));
        Ok(())
    }

    fn save_state(&self) -> serde_json::Map<String, serde_json::Value> {
        phase_state(self.phase)
    }

    fn restore_state(&mut self, state: &serde_json::Map<String, serde_json::Value>) {
        if let Some(phase) = restore_phase(state) {
            self.phase = phase;
        }
    }
}

pub(crate) fn pulse(x: f32, y: f32) -> Node {
    let mut node = Node::new("Pulse", x, y, Box::new(PulseBehavior::default()));
    node.add_input("frequency", DataType::Number, Value::Number(1.0))
        .add_input("amplitude", DataType::Number, Value::Number(1.0))
        .add_output("wave", DataType::Number)
        .add_output("gate", DataType::Bool);
    node
}

/// Bobbing offset: a centered sine wave scaled by amplitude.
#[derive(Default)]
struct FloatBehavior {
    phase: f64,
}

impl NodeBehavior for FloatBehavior {
    fn process(&mut self, ctx: &mut ProcessContext<'_>) -> Result<(), EvaluationError> {
        let speed = ctx.number("Float", "speed")?;
        let amplitude = ctx.number("Float", "amplitude")?;
        self.phase += speed * ctx.dt();
        let offset = amplitude * (TAU * self.phase).sin();
        ctx.set_output("offset", Value::Number(offset));
        Ok(())
    }

    fn save_state(&self) -> serde_json::Map<String, serde_json::Value> {
        phase_state(self.phase)
    }

    fn restore_state(&mut self, state: &serde_json::Map<String, serde_json::Value>) {
        if let Some(phase) = restore_phase(state) {
            self.phase = phase;
        }
    }
}

pub(crate) fn float(x: f32, y: f32) -> Node {
    let mut node = Node::new("Float", x, y, Box::new(FloatBehavior::default()));
    node.add_input("speed", DataType::Number, Value::Number(1.0))
        .add_input("amplitude", DataType::Number, Value::Number(0.5))
        .add_output("offset", DataType::Number);
    node
}

/// Opacity oscillation in `0..=1`, starting fully opaque.
#[derive(Default)]
struct FadeBehavior {
    phase: f64,
}

impl NodeBehavior for FadeBehavior {
    fn process(&mut self, ctx: &mut ProcessContext<'_>) -> Result<(), EvaluationError> {
        let speed = ctx.number("Fade", "speed")?;
        self.phase += speed * ctx.dt();
        let opacity = 0.5 * (1.0 + (TAU * self.phase).cos());
        ctx.set_output("opacity", Value::Number(opacity));
        Ok(())
    }

    fn save_state(&self) -> serde_json::Map<String, serde_json::Value> {
        phase_state(self.phase)
    }

    fn restore_state(&mut self, state: &serde_json::Map<String, serde_json::Value>) {
        if let Some(phase) = restore_phase(state) {
            self.phase = phase;
        }
    }
}

pub(crate) fn fade(x: f32, y: f32) -> Node {
    let mut node = Node::new("Fade", x, y, Box::new(FadeBehavior::default()));
    node.add_input("speed", DataType::Number, Value::Number(1.0))
        .add_output("opacity", DataType::Number);
    node
}

pub(crate) fn register_animation_nodes(registry: &mut NodeRegistry) {
    registry.register("Spin", spin);
    registry.register("Pulse", pulse);
    registry.register("Float", float);
    registry.register("Fade", fade);
}
