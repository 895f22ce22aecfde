//! Prelude module for convenient imports
//!
//! Re-exports the most commonly used types so hosts can get at the core
//! functionality with a single `use sceneflow::prelude::*;`.

// Graph ownership and evaluation
pub use crate::graph::{
    ChangeEvent, Connection, ConnectionId, EvalSummary, GraphData, InteractionGraph, LoadReport,
};

// Nodes and their construction
pub use crate::node::registry::NodeRegistry;
pub use crate::node::{Node, NodeBehavior, NodeId, ProcessContext};

// Values and socket typing
pub use crate::value::{DataType, Value};

// Host bridge surface
pub use crate::bridge::{HostBridge, MemoryScene, ObjectId, PropertyKey, SceneObject};

// Canvas interaction
pub use crate::canvas::CanvasController;

// Error types
pub use crate::error::{EvaluationError, GraphError, LoadError};
