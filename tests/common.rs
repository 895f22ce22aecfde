//! Common test utilities for building graphs and scenes.
use sceneflow::prelude::*;

/// A scene containing the named objects, all in their default state.
#[allow(dead_code)]
pub fn scene_with(objects: &[&str]) -> MemoryScene {
    let mut scene = MemoryScene::new();
    for id in objects {
        scene.insert(*id, SceneObject::default());
    }
    scene
}

/// Creates a node of the given type and adds it to the graph.
#[allow(dead_code)]
pub fn add_node(graph: &mut InteractionGraph, registry: &NodeRegistry, type_name: &str) -> NodeId {
    let node = registry
        .create(type_name, 0.0, 0.0)
        .expect("known node type");
    graph.add_node(node).expect("fresh node id")
}

/// The canonical driving scenario: a Clock whose accumulated seconds feed
/// the Y axis of a Rotation node bound to `object`.
#[allow(dead_code)]
pub fn clock_driving_rotation(
    registry: &NodeRegistry,
    object: &str,
) -> (InteractionGraph, NodeId, NodeId) {
    let mut graph = InteractionGraph::new();
    let clock = add_node(&mut graph, registry, "Clock");
    let rotation = add_node(&mut graph, registry, "Rotation");
    graph
        .bind_object(&rotation, Some(ObjectId::new(object)))
        .unwrap();
    // Clock output 0 is "seconds"; Rotation input 1 is "y".
    graph.add_connection(&clock, 0, &rotation, 1).unwrap();
    (graph, clock, rotation)
}

/// Unwraps a numeric output value.
#[allow(dead_code)]
pub fn number_output(graph: &InteractionGraph, id: &NodeId, name: &str) -> f64 {
    graph
        .node(id)
        .and_then(|n| n.output_value(name))
        .and_then(|v| v.as_number())
        .unwrap_or_else(|| panic!("output '{name}' of {id} is not a number"))
}
