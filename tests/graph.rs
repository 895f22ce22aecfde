//! Structural mutation invariants: single producer per input, cascade
//! delete, type checking, and connect-time cycle rejection.

mod common;

use common::*;
use sceneflow::prelude::*;

#[test]
fn single_producer_per_input() {
    let registry = NodeRegistry::with_defaults();
    let mut graph = InteractionGraph::new();
    let clock = add_node(&mut graph, &registry, "Clock");
    let number = add_node(&mut graph, &registry, "Number");
    let spin = add_node(&mut graph, &registry, "Spin");

    graph.add_connection(&clock, 0, &spin, 0).unwrap();
    graph.add_connection(&number, 0, &spin, 0).unwrap();

    // Connecting a second source replaced the first, silently.
    assert_eq!(graph.connections().len(), 1);
    let connection = graph.connection_to(&spin, 0).unwrap();
    assert_eq!(connection.from_node, number);
}

#[test]
fn reconnecting_the_same_wire_is_a_no_op() {
    let registry = NodeRegistry::with_defaults();
    let mut graph = InteractionGraph::new();
    let clock = add_node(&mut graph, &registry, "Clock");
    let spin = add_node(&mut graph, &registry, "Spin");

    let first = graph.add_connection(&clock, 0, &spin, 0).unwrap();
    let second = graph.add_connection(&clock, 0, &spin, 0).unwrap();
    assert_eq!(first, second);
    assert_eq!(graph.connections().len(), 1);
}

#[test]
fn cascade_delete_removes_exactly_the_touching_connections() {
    let registry = NodeRegistry::with_defaults();
    let mut graph = InteractionGraph::new();
    let clock = add_node(&mut graph, &registry, "Clock");
    let spin = add_node(&mut graph, &registry, "Spin");
    let add = add_node(&mut graph, &registry, "Add");
    let multiply = add_node(&mut graph, &registry, "Multiply");

    graph.add_connection(&clock, 0, &spin, 0).unwrap();
    graph.add_connection(&clock, 1, &add, 0).unwrap();
    graph.add_connection(&add, 0, &multiply, 0).unwrap();
    assert_eq!(graph.connections().len(), 3);

    graph.remove_node(&clock);

    // Only the Add -> Multiply wire survives.
    assert_eq!(graph.connections().len(), 1);
    assert_eq!(graph.connections()[0].from_node, add);
    assert!(graph.node(&clock).is_none());
}

#[test]
fn removing_an_absent_node_is_a_no_op() {
    let registry = NodeRegistry::with_defaults();
    let mut graph = InteractionGraph::new();
    let clock = add_node(&mut graph, &registry, "Clock");

    assert!(graph.remove_node(&clock).is_some());
    assert!(graph.remove_node(&clock).is_none());
    assert!(graph.remove_node(&NodeId::from("never-existed")).is_none());
}

#[test]
fn type_mismatch_is_rejected_and_graph_is_unchanged() {
    let registry = NodeRegistry::with_defaults();
    let mut graph = InteractionGraph::new();
    let pulse = add_node(&mut graph, &registry, "Pulse");
    let add = add_node(&mut graph, &registry, "Add");

    // Pulse output 1 is the Bool gate; Add input 0 is numeric.
    let result = graph.add_connection(&pulse, 1, &add, 0);
    assert!(matches!(result, Err(GraphError::TypeMismatch { .. })));
    assert!(graph.connections().is_empty());
}

#[test]
fn scalar_to_vector_broadcast_is_an_accepted_coercion() {
    let registry = NodeRegistry::with_defaults();
    let mut graph = InteractionGraph::new();
    let clock = add_node(&mut graph, &registry, "Clock");
    let mix = add_node(&mut graph, &registry, "Mix");

    // Number output into a Vector input.
    graph.add_connection(&clock, 0, &mix, 0).unwrap();
    assert_eq!(graph.connections().len(), 1);
}

#[test]
fn connections_to_unknown_nodes_or_sockets_are_rejected() {
    let registry = NodeRegistry::with_defaults();
    let mut graph = InteractionGraph::new();
    let clock = add_node(&mut graph, &registry, "Clock");
    let spin = add_node(&mut graph, &registry, "Spin");
    let ghost = NodeId::from("ghost");

    assert!(matches!(
        graph.add_connection(&ghost, 0, &spin, 0),
        Err(GraphError::NodeNotFound { .. })
    ));
    assert!(matches!(
        graph.add_connection(&clock, 7, &spin, 0),
        Err(GraphError::SocketOutOfRange { .. })
    ));
    assert!(matches!(
        graph.add_connection(&clock, 0, &spin, 7),
        Err(GraphError::SocketOutOfRange { .. })
    ));
    assert!(graph.connections().is_empty());
}

#[test]
fn cycles_are_rejected_at_connect_time() {
    let registry = NodeRegistry::with_defaults();
    let mut graph = InteractionGraph::new();
    let a = add_node(&mut graph, &registry, "Add");
    let b = add_node(&mut graph, &registry, "Add");
    let c = add_node(&mut graph, &registry, "Add");

    // Self-loop.
    assert!(matches!(
        graph.add_connection(&a, 0, &a, 0),
        Err(GraphError::WouldCreateCycle { .. })
    ));

    // Direct two-node cycle.
    graph.add_connection(&a, 0, &b, 0).unwrap();
    assert!(matches!(
        graph.add_connection(&b, 0, &a, 0),
        Err(GraphError::WouldCreateCycle { .. })
    ));

    // Transitive cycle through a chain.
    graph.add_connection(&b, 0, &c, 0).unwrap();
    assert!(matches!(
        graph.add_connection(&c, 0, &a, 0),
        Err(GraphError::WouldCreateCycle { .. })
    ));

    // The rejections left the valid wiring intact.
    assert_eq!(graph.connections().len(), 2);
}

#[test]
fn disconnecting_restores_the_edited_default() {
    let registry = NodeRegistry::with_defaults();
    let mut scene = scene_with(&[]);
    let mut graph = InteractionGraph::new();
    let number = add_node(&mut graph, &registry, "Number");
    let spin = add_node(&mut graph, &registry, "Spin");

    graph
        .set_input_value(&spin, "speed", Value::Number(5.0))
        .unwrap();
    let wire = graph.add_connection(&number, 0, &spin, 0).unwrap();

    // The connection feeds 0.0 over the edited value during evaluation.
    graph.evaluate(0.1, &mut scene);
    assert_eq!(
        graph.node(&spin).unwrap().input_value("speed"),
        Some(&Value::Number(0.0))
    );

    // Removing the wire falls back to the user's edit, not the built-in 1.0.
    graph.remove_connection(&wire);
    assert_eq!(
        graph.node(&spin).unwrap().input_value("speed"),
        Some(&Value::Number(5.0))
    );

    // And removing again is a no-op.
    assert!(!graph.remove_connection(&wire));
}

#[test]
fn editing_an_input_validates_its_type() {
    let registry = NodeRegistry::with_defaults();
    let mut graph = InteractionGraph::new();
    let spin = add_node(&mut graph, &registry, "Spin");

    assert!(matches!(
        graph.set_input_value(&spin, "speed", Value::Bool(true)),
        Err(GraphError::ValueTypeMismatch { .. })
    ));
    assert!(matches!(
        graph.set_input_value(&spin, "velocity", Value::Number(1.0)),
        Err(GraphError::NoSuchInput { .. })
    ));
}
