//! Nodes: typed computational units with named input and output sockets.
//!
//! A [`Node`] pairs a fixed socket shape (declared once at construction) with
//! a [`NodeBehavior`], the per-type computation step invoked during each
//! evaluation pass. Behaviors are selected through the
//! [`NodeRegistry`](registry::NodeRegistry), which serves both interactive
//! creation and deserialization through the same path.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::bridge::{HostBridge, ObjectId, PropertyKey};
use crate::error::EvaluationError;
use crate::value::{DataType, Value};

pub mod registry;
pub mod socket;

pub(crate) mod animation;
pub(crate) mod math;
pub(crate) mod object;
pub(crate) mod time;

pub use socket::{InputSocket, OutputSocket};

/// Stable identifier of a node, unique within a graph and preserved across
/// save/load. Connections reference nodes by this id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    /// A fresh random identifier. Ids are never reused within a graph.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Per-type computation step. One implementation exists per registered node
/// type; the registry maps type names to constructors so every constructible
/// node is also reconstructible.
pub trait NodeBehavior: Send {
    /// Reads input sockets, computes, writes output sockets, and for bound
    /// nodes drives scene-object properties through the bridge. Must be
    /// synchronous and fast; it runs inline with the host's render loop.
    fn process(&mut self, ctx: &mut ProcessContext<'_>) -> Result<(), EvaluationError>;

    /// Type-specific fields to persist alongside the node record, e.g. an
    /// accumulated animation phase. Flattened into the node's JSON object.
    fn save_state(&self) -> serde_json::Map<String, serde_json::Value> {
        serde_json::Map::new()
    }

    /// Restores fields produced by [`save_state`](Self::save_state). Missing
    /// or malformed fields fall back to construction defaults.
    fn restore_state(&mut self, _state: &serde_json::Map<String, serde_json::Value>) {}

    /// Post-deserialize hook. Object-property nodes re-read the live object's
    /// current value into their input defaults here, because the object may
    /// have been modified independently since the graph was saved.
    fn resync(
        &mut self,
        _inputs: &mut [InputSocket],
        _object: Option<&ObjectId>,
        _bridge: &dyn HostBridge,
    ) {
    }
}

/// A typed unit in the interaction graph.
pub struct Node {
    pub(crate) id: NodeId,
    pub(crate) type_name: String,
    pub(crate) x: f32,
    pub(crate) y: f32,
    pub(crate) inputs: Vec<InputSocket>,
    pub(crate) outputs: Vec<OutputSocket>,
    pub(crate) object: Option<ObjectId>,
    pub(crate) behavior: Box<dyn NodeBehavior>,
}

// Behaviors are not Debug; show everything else.
impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("type_name", &self.type_name)
            .field("x", &self.x)
            .field("y", &self.y)
            .field("inputs", &self.inputs)
            .field("outputs", &self.outputs)
            .field("object", &self.object)
            .finish_non_exhaustive()
    }
}

impl Node {
    pub fn new(type_name: impl Into<String>, x: f32, y: f32, behavior: Box<dyn NodeBehavior>) -> Self {
        Self {
            id: NodeId::generate(),
            type_name: type_name.into(),
            x,
            y,
            inputs: Vec::new(),
            outputs: Vec::new(),
            object: None,
            behavior,
        }
    }

    /// Declares an input socket. Sockets are declared once, at construction;
    /// the shape is fixed for the node's lifetime.
    pub fn add_input(
        &mut self,
        name: impl Into<String>,
        data_type: DataType,
        default: Value,
    ) -> &mut Self {
        self.inputs.push(InputSocket::new(name, data_type, default));
        self
    }

    /// Declares an output socket.
    pub fn add_output(&mut self, name: impl Into<String>, data_type: DataType) -> &mut Self {
        self.outputs.push(OutputSocket::new(name, data_type));
        self
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    pub fn inputs(&self) -> &[InputSocket] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[OutputSocket] {
        &self.outputs
    }

    pub fn input_index(&self, name: &str) -> Option<usize> {
        self.inputs.iter().position(|s| s.name == name)
    }

    pub fn output_index(&self, name: &str) -> Option<usize> {
        self.outputs.iter().position(|s| s.name == name)
    }

    /// The value currently sitting on the named input socket: the upstream
    /// value copied in by the last evaluation pass, or the socket's own
    /// value when unconnected.
    pub fn input_value(&self, name: &str) -> Option<&Value> {
        self.inputs.iter().find(|s| s.name == name).map(|s| &s.value)
    }

    /// The value computed for the named output socket by the most recent
    /// `process()` call.
    pub fn output_value(&self, name: &str) -> Option<&Value> {
        self.outputs.iter().find(|s| s.name == name).map(|s| &s.value)
    }

    /// Binds the node to a scene object by stable identifier. Nodes never
    /// hold direct object references.
    pub fn bind_object(&mut self, id: Option<ObjectId>) {
        self.object = id;
    }

    pub fn object(&self) -> Option<&ObjectId> {
        self.object.as_ref()
    }

    pub(crate) fn set_position(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
    }

    // Deserialization only: ids are otherwise immutable once assigned.
    pub(crate) fn restore_id(&mut self, id: NodeId) {
        self.id = id;
    }

    pub(crate) fn save_state(&self) -> serde_json::Map<String, serde_json::Value> {
        self.behavior.save_state()
    }

    pub(crate) fn restore_state(&mut self, state: &serde_json::Map<String, serde_json::Value>) {
        self.behavior.restore_state(state);
    }

    pub(crate) fn resync(&mut self, bridge: &dyn HostBridge) {
        self.behavior
            .resync(&mut self.inputs, self.object.as_ref(), bridge);
    }
}

/// Everything a behavior may touch during one `process()` call: its own
/// sockets, the tick's delta time, and the injected host bridge.
pub struct ProcessContext<'a> {
    inputs: &'a [InputSocket],
    outputs: &'a mut [OutputSocket],
    object: Option<&'a ObjectId>,
    bridge: &'a mut dyn HostBridge,
    dt: f64,
    wrote: bool,
}

impl<'a> ProcessContext<'a> {
    pub(crate) fn new(
        inputs: &'a [InputSocket],
        outputs: &'a mut [OutputSocket],
        object: Option<&'a ObjectId>,
        bridge: &'a mut dyn HostBridge,
        dt: f64,
    ) -> Self {
        Self {
            inputs,
            outputs,
            object,
            bridge,
            dt,
            wrote: false,
        }
    }

    /// Seconds elapsed since the previous evaluation pass. Ticks arrive at
    /// irregular intervals; behaviors must integrate with this, not assume a
    /// fixed step.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn input(&self, name: &str) -> &Value {
        self.inputs
            .iter()
            .find(|s| s.name == name)
            .map(|s| &s.value)
            .unwrap_or(&Value::Null)
    }

    /// Reads a numeric input, reporting a node-local type mismatch otherwise.
    pub fn number(&self, operation: &str, name: &str) -> Result<f64, EvaluationError> {
        match self.input(name) {
            Value::Number(n) => Ok(*n),
            found => Err(EvaluationError::TypeMismatch {
                operation: operation.to_string(),
                input: name.to_string(),
                expected: DataType::Number,
                found: found.clone(),
            }),
        }
    }

    /// Reads a vector input. A scalar sitting on a vector socket (an
    /// unconnected default, typically) is broadcast.
    pub fn vector(&self, operation: &str, name: &str) -> Result<[f64; 3], EvaluationError> {
        match self.input(name) {
            Value::Vector(v) => Ok(*v),
            Value::Number(n) => Ok([*n, *n, *n]),
            found => Err(EvaluationError::TypeMismatch {
                operation: operation.to_string(),
                input: name.to_string(),
                expected: DataType::Vector,
                found: found.clone(),
            }),
        }
    }

    /// Stores a value for downstream consumers to read on their next
    /// evaluation. Pull-based: this never triggers recursive evaluation.
    pub fn set_output(&mut self, name: &str, value: Value) {
        if let Some(socket) = self.outputs.iter_mut().find(|s| s.name == name) {
            socket.value = value;
        }
    }

    pub fn object(&self) -> Option<&ObjectId> {
        self.object
    }

    /// Writes a property of the bound scene object through the bridge and
    /// notifies the host. Returns `false` (without error) when the node is
    /// unbound or the object no longer exists.
    pub fn write_object(&mut self, key: PropertyKey, value: Value) -> bool {
        let Some(id) = self.object else {
            return false;
        };
        if self.bridge.write_property(id, key, value) {
            self.bridge.notify_object_changed(id);
            self.wrote = true;
            true
        } else {
            false
        }
    }

    /// Reads a property of the bound scene object.
    pub fn read_object(&self, key: PropertyKey) -> Option<Value> {
        self.bridge.read_property(self.object?, key)
    }

    pub(crate) fn wrote_scene(&self) -> bool {
        self.wrote
    }
}
