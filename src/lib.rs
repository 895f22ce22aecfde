//! # Sceneflow - Interaction Graph Engine for 3D Scene Editors
//!
//! **Sceneflow** is a node-based interaction graph engine: typed nodes with
//! named input/output sockets, directed connections, dependency-respecting
//! per-tick evaluation, and tolerant JSON persistence. It is the dataflow
//! core a scene editor embeds to let users wire up behaviors like "spin this
//! object" or "pulse that light" without writing code.
//!
//! ## Core Workflow
//!
//! The engine is host-agnostic. The editor implements the narrow
//! [`HostBridge`](bridge::HostBridge) trait over its own scene store; the
//! graph reads and drives scene-object properties only through that bridge,
//! addressing objects by stable identifiers. The primary workflow is:
//!
//! 1.  **Create nodes**: Use a [`NodeRegistry`](node::registry::NodeRegistry)
//!     to construct nodes by type name. The same path serves interactive
//!     creation and deserialization.
//! 2.  **Wire them up**: Add connections between output and input sockets.
//!     The graph validates types, enforces a single producer per input, and
//!     rejects cycles at connect time.
//! 3.  **Evaluate**: Call [`InteractionGraph::evaluate`](graph::InteractionGraph::evaluate)
//!     once per render tick. Nodes run in topological order; a failing node
//!     never takes the rest of the pass down with it.
//! 4.  **Persist**: Serialize into the host's save blob on change (the graph's
//!     change listener tells you when), and deserialize on project load:
//!     bindings are re-resolved and object-property nodes resync from the
//!     live scene.
//!
//! ## Quick Start
//!
//! ```rust
//! use sceneflow::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // The host side: a scene with one object.
//!     let mut scene = MemoryScene::new();
//!     scene.insert("cube-1", SceneObject::default());
//!
//!     // Build a graph: a clock driving the cube's Y rotation.
//!     let registry = NodeRegistry::with_defaults();
//!     let mut graph = InteractionGraph::new();
//!
//!     let clock = graph.add_node(registry.create("Clock", 0.0, 0.0)?)?;
//!     let rotation = graph.add_node(registry.create("Rotation", 300.0, 0.0)?)?;
//!     graph.bind_object(&rotation, Some(ObjectId::new("cube-1")))?;
//!
//!     // Clock's "seconds" output into Rotation's "y" input.
//!     graph.add_connection(&clock, 0, &rotation, 1)?;
//!
//!     // One simulated second of ticks.
//!     for _ in 0..60 {
//!         graph.evaluate(1.0 / 60.0, &mut scene);
//!     }
//!
//!     let cube = scene.object(&ObjectId::new("cube-1")).unwrap();
//!     assert!((cube.rotation[1] - 1.0).abs() < 1e-9);
//!
//!     // Persist and restore against the (possibly edited) live scene.
//!     let saved = graph.to_json()?;
//!     let (_restored, report) = InteractionGraph::from_json(&saved, &registry, &scene)?;
//!     assert!(!report.has_issues());
//!     Ok(())
//! }
//! ```

pub mod bridge;
pub mod canvas;
pub mod error;
pub mod graph;
pub mod node;
pub mod prelude;
pub mod value;
