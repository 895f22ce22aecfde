//! Evaluation semantics: topological order, determinism, delta-time
//! integration, and per-node fault isolation.

mod common;

use common::*;
use sceneflow::prelude::*;

#[test]
fn add_then_multiply_chain() {
    let registry = NodeRegistry::with_defaults();
    let mut scene = scene_with(&[]);
    let mut graph = InteractionGraph::new();
    let add = add_node(&mut graph, &registry, "Add");
    let multiply = add_node(&mut graph, &registry, "Multiply");

    graph.set_input_value(&add, "a", Value::Number(2.0)).unwrap();
    graph.set_input_value(&add, "b", Value::Number(3.0)).unwrap();
    graph
        .set_input_value(&multiply, "b", Value::Number(4.0))
        .unwrap();
    graph.add_connection(&add, 0, &multiply, 0).unwrap();

    let summary = graph.evaluate(1.0 / 60.0, &mut scene);
    assert_eq!(summary.processed, 2);
    assert_eq!(summary.failed, 0);
    assert_eq!(number_output(&graph, &multiply, "result"), 20.0);
}

#[test]
fn evaluation_is_deterministic_for_pure_graphs() {
    let registry = NodeRegistry::with_defaults();
    let mut scene = scene_with(&[]);
    let mut graph = InteractionGraph::new();
    let add = add_node(&mut graph, &registry, "Add");
    let subtract = add_node(&mut graph, &registry, "Subtract");
    let divide = add_node(&mut graph, &registry, "Divide");

    graph.set_input_value(&add, "a", Value::Number(10.0)).unwrap();
    graph.set_input_value(&add, "b", Value::Number(5.0)).unwrap();
    graph
        .set_input_value(&subtract, "b", Value::Number(3.0))
        .unwrap();
    graph
        .set_input_value(&divide, "b", Value::Number(2.0))
        .unwrap();
    graph.add_connection(&add, 0, &subtract, 0).unwrap();
    graph.add_connection(&subtract, 0, &divide, 0).unwrap();

    graph.evaluate(0.016, &mut scene);
    let first = number_output(&graph, &divide, "result");
    assert_eq!(first, 6.0);

    // Repeated passes without structural changes reproduce the outputs.
    for _ in 0..10 {
        graph.evaluate(0.016, &mut scene);
        assert_eq!(number_output(&graph, &divide, "result"), first);
    }
}

#[test]
fn clock_drives_rotation_monotonically() {
    let registry = NodeRegistry::with_defaults();
    let mut scene = scene_with(&["cube"]);
    let (mut graph, _clock, _rotation) = clock_driving_rotation(&registry, "cube");

    let cube = ObjectId::new("cube");
    let mut elapsed = 0.0;
    let mut previous = 0.0;
    // Irregular tick intervals; the accumulated rotation must track the sum.
    for step in [0.016, 0.040, 0.002, 0.033, 0.250, 0.016] {
        elapsed += step;
        graph.evaluate(step, &mut scene);
        let y = scene.object(&cube).unwrap().rotation[1];
        assert!(y > previous, "rotation must increase monotonically");
        assert!((y - elapsed).abs() < 1e-9, "rotation tracks accumulated time");
        previous = y;
    }
}

#[test]
fn a_failing_node_does_not_halt_the_pass() {
    let registry = NodeRegistry::with_defaults();
    let mut scene = scene_with(&[]);
    let mut graph = InteractionGraph::new();
    let divide = add_node(&mut graph, &registry, "Divide");
    let add = add_node(&mut graph, &registry, "Add");

    graph.set_input_value(&divide, "a", Value::Number(1.0)).unwrap();
    graph.set_input_value(&divide, "b", Value::Number(2.0)).unwrap();
    graph.set_input_value(&add, "a", Value::Number(1.0)).unwrap();
    graph.set_input_value(&add, "b", Value::Number(1.0)).unwrap();

    graph.evaluate(0.016, &mut scene);
    assert_eq!(number_output(&graph, &divide, "result"), 0.5);

    // Now make the Divide node fail every pass.
    graph.set_input_value(&divide, "b", Value::Number(0.0)).unwrap();
    let summary = graph.evaluate(0.016, &mut scene);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.processed, 1);

    // The healthy node still ran; the failed node kept its last good output.
    assert_eq!(number_output(&graph, &add, "result"), 2.0);
    assert_eq!(number_output(&graph, &divide, "result"), 0.5);
}

#[test]
fn two_writers_on_one_object_resolve_by_evaluation_order() {
    // Wiring two Position nodes to the same object is a user-level modeling
    // hazard, not an error: the later node in the deterministic evaluation
    // order wins.
    let registry = NodeRegistry::with_defaults();
    let mut scene = scene_with(&["cube"]);
    let mut graph = InteractionGraph::new();
    let first = add_node(&mut graph, &registry, "Position");
    let second = add_node(&mut graph, &registry, "Position");
    let cube = ObjectId::new("cube");
    graph.bind_object(&first, Some(cube.clone())).unwrap();
    graph.bind_object(&second, Some(cube.clone())).unwrap();
    graph.set_input_value(&first, "x", Value::Number(1.0)).unwrap();
    graph.set_input_value(&second, "x", Value::Number(2.0)).unwrap();

    for _ in 0..3 {
        graph.evaluate(0.016, &mut scene);
        assert_eq!(scene.object(&cube).unwrap().position[0], 2.0);
    }
}

#[test]
fn broadcast_feeds_vector_inputs_from_scalar_outputs() {
    let registry = NodeRegistry::with_defaults();
    let mut scene = scene_with(&[]);
    let mut graph = InteractionGraph::new();
    let number = add_node(&mut graph, &registry, "Number");
    let mix = add_node(&mut graph, &registry, "Mix");

    graph.set_input_value(&number, "value", Value::Number(4.0)).unwrap();
    graph.set_input_value(&mix, "t", Value::Number(1.0)).unwrap();
    graph.add_connection(&number, 0, &mix, 1).unwrap();

    graph.evaluate(0.016, &mut scene);
    assert_eq!(
        graph.node(&mix).unwrap().output_value("result"),
        Some(&Value::Vector([4.0, 4.0, 4.0]))
    );
}

#[test]
fn property_node_whose_object_vanished_stops_having_an_effect() {
    let registry = NodeRegistry::with_defaults();
    let mut scene = scene_with(&["doomed"]);
    let mut graph = InteractionGraph::new();
    let position = add_node(&mut graph, &registry, "Position");
    let doomed = ObjectId::new("doomed");
    graph.bind_object(&position, Some(doomed.clone())).unwrap();
    graph.set_input_value(&position, "x", Value::Number(4.0)).unwrap();

    let summary = graph.evaluate(0.016, &mut scene);
    assert_eq!(summary.writes, 1);

    // Deleting the object mid-session is not a node failure; the write just
    // becomes a no-op until the object comes back.
    scene.remove(&doomed);
    let summary = graph.evaluate(0.016, &mut scene);
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.writes, 0);
    assert_eq!(
        graph.node(&position).unwrap().output_value("value"),
        Some(&Value::Vector([4.0, 0.0, 0.0]))
    );
}

#[test]
fn unbound_property_node_still_mirrors_to_its_output() {
    let registry = NodeRegistry::with_defaults();
    let mut scene = scene_with(&[]);
    let mut graph = InteractionGraph::new();
    let position = add_node(&mut graph, &registry, "Position");
    graph.set_input_value(&position, "y", Value::Number(3.0)).unwrap();

    let summary = graph.evaluate(0.016, &mut scene);
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.writes, 0);
    assert_eq!(
        graph.node(&position).unwrap().output_value("value"),
        Some(&Value::Vector([0.0, 3.0, 0.0]))
    );
}

#[test]
fn fade_drives_opacity_through_the_bridge() {
    let registry = NodeRegistry::with_defaults();
    let mut scene = scene_with(&["light"]);
    let mut graph = InteractionGraph::new();
    let fade = add_node(&mut graph, &registry, "Fade");
    let opacity = add_node(&mut graph, &registry, "Opacity");
    let light = ObjectId::new("light");
    graph.bind_object(&opacity, Some(light.clone())).unwrap();
    graph.add_connection(&fade, 0, &opacity, 0).unwrap();

    // A half period at speed 1.0 lands the cosine fade at zero opacity.
    graph.evaluate(0.5, &mut scene);
    let value = scene.object(&light).unwrap().opacity;
    assert!(value.abs() < 1e-9, "opacity={value}");
    assert!(!scene.take_change_notifications().is_empty());
}
