use crate::value::{DataType, Value};

/// A named input slot on a node.
///
/// `value` is whatever currently sits on the socket: either the upstream
/// output copied in during the last evaluation pass, or a user-edited /
/// default value when the socket is unconnected. `default` is restored when a
/// connection is removed and is the target of the post-load resync performed
/// by object-property nodes.
#[derive(Debug, Clone)]
pub struct InputSocket {
    pub name: String,
    pub data_type: DataType,
    pub value: Value,
    pub default: Value,
}

impl InputSocket {
    pub fn new(name: impl Into<String>, data_type: DataType, default: Value) -> Self {
        Self {
            name: name.into(),
            data_type,
            value: default.clone(),
            default,
        }
    }
}

/// A named output slot on a node, holding the value computed by the most
/// recent `process()` call for downstream consumers.
#[derive(Debug, Clone)]
pub struct OutputSocket {
    pub name: String,
    pub data_type: DataType,
    pub value: Value,
}

impl OutputSocket {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            value: Value::Null,
        }
    }
}
