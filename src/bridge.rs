//! The narrow interface between the interaction graph and its host editor.
//!
//! Nodes never hold direct references to scene objects and never reach into
//! editor internals; everything goes through [`HostBridge`], which is injected
//! wherever the graph needs it. Objects are addressed by stable string
//! identifiers so a serialized graph stays meaningful after objects are
//! deleted or recreated.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value::Value;

/// Stable identifier of a scene object, assigned by the host editor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub String);

impl ObjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ObjectId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// The scene-object properties the graph is allowed to read and drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKey {
    /// World position, a [`Value::Vector`].
    Position,
    /// Euler rotation in radians, a [`Value::Vector`].
    Rotation,
    /// Per-axis scale, a [`Value::Vector`].
    Scale,
    /// Material opacity in `0..=1`, a [`Value::Number`].
    Opacity,
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PropertyKey::Position => "position",
            PropertyKey::Rotation => "rotation",
            PropertyKey::Scale => "scale",
            PropertyKey::Opacity => "opacity",
        };
        f.write_str(name)
    }
}

/// The graph's only contact surface with the larger editor.
///
/// `read_property`/`write_property` return `None`/`false` for unknown objects
/// rather than failing: a node bound to a deleted object simply stops having
/// an effect until the object reappears.
pub trait HostBridge {
    fn object_exists(&self, id: &ObjectId) -> bool;

    fn read_property(&self, id: &ObjectId, key: PropertyKey) -> Option<Value>;

    /// Writes a property value. Returns `true` if the object existed and the
    /// value was applied.
    fn write_property(&mut self, id: &ObjectId, key: PropertyKey, value: Value) -> bool;

    /// Called once per object the graph wrote to during an evaluation pass,
    /// so the host's change tracking and undo systems can react.
    fn notify_object_changed(&mut self, id: &ObjectId);
}

/// One object's driveable state, as tracked by [`MemoryScene`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    #[serde(default)]
    pub position: [f64; 3],
    #[serde(default)]
    pub rotation: [f64; 3],
    #[serde(default = "SceneObject::unit_scale")]
    pub scale: [f64; 3],
    #[serde(default = "SceneObject::opaque")]
    pub opacity: f64,
}

impl SceneObject {
    fn unit_scale() -> [f64; 3] {
        [1.0, 1.0, 1.0]
    }

    fn opaque() -> f64 {
        1.0
    }
}

impl Default for SceneObject {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            rotation: [0.0; 3],
            scale: Self::unit_scale(),
            opacity: Self::opaque(),
        }
    }
}

/// In-memory [`HostBridge`] implementation backed by a plain object map.
///
/// Used by the CLI runner and the test suite; a real editor integration
/// implements [`HostBridge`] over its own scene store instead.
#[derive(Debug, Default)]
pub struct MemoryScene {
    objects: AHashMap<ObjectId, SceneObject>,
    changed: Vec<ObjectId>,
}

impl MemoryScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, object: SceneObject) {
        self.objects.insert(ObjectId::new(id), object);
    }

    pub fn remove(&mut self, id: &ObjectId) -> Option<SceneObject> {
        self.objects.remove(id)
    }

    pub fn object(&self, id: &ObjectId) -> Option<&SceneObject> {
        self.objects.get(id)
    }

    pub fn object_mut(&mut self, id: &ObjectId) -> Option<&mut SceneObject> {
        self.objects.get_mut(id)
    }

    pub fn objects(&self) -> impl Iterator<Item = (&ObjectId, &SceneObject)> {
        self.objects.iter()
    }

    /// Object-changed notifications received since the last call, in arrival
    /// order.
    pub fn take_change_notifications(&mut self) -> Vec<ObjectId> {
        std::mem::take(&mut self.changed)
    }
}

impl HostBridge for MemoryScene {
    fn object_exists(&self, id: &ObjectId) -> bool {
        self.objects.contains_key(id)
    }

    fn read_property(&self, id: &ObjectId, key: PropertyKey) -> Option<Value> {
        let object = self.objects.get(id)?;
        Some(match key {
            PropertyKey::Position => Value::Vector(object.position),
            PropertyKey::Rotation => Value::Vector(object.rotation),
            PropertyKey::Scale => Value::Vector(object.scale),
            PropertyKey::Opacity => Value::Number(object.opacity),
        })
    }

    fn write_property(&mut self, id: &ObjectId, key: PropertyKey, value: Value) -> bool {
        let Some(object) = self.objects.get_mut(id) else {
            return false;
        };
        match (key, value) {
            (PropertyKey::Position, Value::Vector(v)) => object.position = v,
            (PropertyKey::Rotation, Value::Vector(v)) => object.rotation = v,
            (PropertyKey::Scale, Value::Vector(v)) => object.scale = v,
            (PropertyKey::Opacity, Value::Number(n)) => object.opacity = n,
            _ => return false,
        }
        true
    }

    fn notify_object_changed(&mut self, id: &ObjectId) {
        self.changed.push(id.clone());
    }
}
