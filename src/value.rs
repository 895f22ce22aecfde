//! Values flowing through socket connections, and the socket type system.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A value sitting on a socket or traveling across a connection.
///
/// Serialized untagged, so persisted input maps read as plain JSON scalars
/// and arrays. Variant order matters for deserialization: `Bool` must come
/// before `Number` so `true` is not read as a number, and `Null` catches
/// JSON `null` last.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Number(f64),
    Vector([f64; 3]),
    Null,
}

impl Value {
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Bool(_) => DataType::Bool,
            Value::Number(_) => DataType::Number,
            Value::Vector(_) => DataType::Vector,
            Value::Null => DataType::Any,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_vector(&self) -> Option<[f64; 3]> {
        match self {
            Value::Vector(v) => Some(*v),
            _ => None,
        }
    }

    /// Adapts this value to the target type where an implicit conversion
    /// exists. The only conversion is the scalar broadcast `n -> [n, n, n]`;
    /// everything else passes through unchanged.
    pub fn coerce_to(&self, target: DataType) -> Value {
        match (self, target) {
            (Value::Number(n), DataType::Vector) => Value::Vector([*n, *n, *n]),
            _ => self.clone(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::Vector([x, y, z]) => write!(f, "({x}, {y}, {z})"),
            Value::Null => f.write_str("null"),
        }
    }
}

/// The static type of a socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    /// A scalar `f64`.
    Number,
    /// A 3-component `f64` vector.
    Vector,
    /// A boolean gate.
    Bool,
    /// Matches any type. Not used by socket declarations, but `Value::Null`
    /// reports it so an unset value passes type checks everywhere.
    Any,
}

impl DataType {
    /// Whether a value (or output socket) of type `from` may feed a socket of
    /// this type. Exact matches are accepted, `Any` matches on either side,
    /// and a `Number` broadcasts into a `Vector`.
    pub fn accepts(self, from: DataType) -> bool {
        self == from
            || self == DataType::Any
            || from == DataType::Any
            || (self == DataType::Vector && from == DataType::Number)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Number => "Number",
            DataType::Vector => "Vector",
            DataType::Bool => "Bool",
            DataType::Any => "Any",
        };
        f.write_str(name)
    }
}
