//! Canvas interaction: node layout, hit testing, and the pointer-gesture
//! state machine that turns drags into graph mutations.
//!
//! Presentation-free by design. The host editor draws nodes, pins and wires
//! however it likes using the geometry helpers here; this module only decides
//! what a pointer gesture means (drag-to-move, drag-to-connect, box-select,
//! disconnect) and applies the resulting mutation to the graph.

use ahash::AHashSet;

use crate::error::GraphError;
use crate::graph::InteractionGraph;
use crate::node::{Node, NodeId};

pub const NODE_WIDTH: f32 = 160.0;
pub const NODE_HEADER_HEIGHT: f32 = 26.0;
pub const SOCKET_ROW_HEIGHT: f32 = 20.0;
pub const SOCKET_RADIUS: f32 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    fn distance_to(&self, other: Point) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Point,
    pub max: Point,
}

impl Rect {
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            min: Point::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }
}

/// The body rectangle of a node, sized to fit its socket rows.
pub fn node_rect(node: &Node) -> Rect {
    let (x, y) = node.position();
    let rows = node.inputs().len().max(node.outputs().len()) as f32;
    let height = NODE_HEADER_HEIGHT + rows * SOCKET_ROW_HEIGHT;
    Rect {
        min: Point::new(x, y),
        max: Point::new(x + NODE_WIDTH, y + height),
    }
}

/// Center of an input pin, on the node's left edge.
pub fn input_pin(node: &Node, index: usize) -> Point {
    let (x, y) = node.position();
    Point::new(
        x,
        y + NODE_HEADER_HEIGHT + (index as f32 + 0.5) * SOCKET_ROW_HEIGHT,
    )
}

/// Center of an output pin, on the node's right edge.
pub fn output_pin(node: &Node, index: usize) -> Point {
    let (x, y) = node.position();
    Point::new(
        x + NODE_WIDTH,
        y + NODE_HEADER_HEIGHT + (index as f32 + 0.5) * SOCKET_ROW_HEIGHT,
    )
}

#[derive(Debug, Clone, PartialEq)]
pub enum HitTarget {
    InputPin(NodeId, usize),
    OutputPin(NodeId, usize),
    Node(NodeId),
    Background,
}

/// Topmost hit at a point. Pins win over node bodies; later-added nodes are
/// considered on top.
pub fn hit_test(graph: &InteractionGraph, point: Point) -> HitTarget {
    for node in graph.nodes().collect::<Vec<_>>().into_iter().rev() {
        for index in 0..node.inputs().len() {
            if input_pin(node, index).distance_to(point) <= SOCKET_RADIUS {
                return HitTarget::InputPin(node.id().clone(), index);
            }
        }
        for index in 0..node.outputs().len() {
            if output_pin(node, index).distance_to(point) <= SOCKET_RADIUS {
                return HitTarget::OutputPin(node.id().clone(), index);
            }
        }
        if node_rect(node).contains(point) {
            return HitTarget::Node(node.id().clone());
        }
    }
    HitTarget::Background
}

#[derive(Debug, Clone, PartialEq)]
enum Gesture {
    Idle,
    DragNode { node: NodeId, grab: Point },
    DragWire { from_node: NodeId, from_output: usize },
    BoxSelect { anchor: Point },
}

/// Translates pointer input into graph mutations and tracks the selection.
pub struct CanvasController {
    gesture: Gesture,
    selection: AHashSet<NodeId>,
    last_error: Option<GraphError>,
}

impl Default for CanvasController {
    fn default() -> Self {
        Self::new()
    }
}

impl CanvasController {
    pub fn new() -> Self {
        Self {
            gesture: Gesture::Idle,
            selection: AHashSet::new(),
            last_error: None,
        }
    }

    pub fn selection(&self) -> impl Iterator<Item = &NodeId> {
        self.selection.iter()
    }

    pub fn is_selected(&self, id: &NodeId) -> bool {
        self.selection.contains(id)
    }

    /// The error produced by the most recent rejected gesture, for the host
    /// to surface near the point of interaction.
    pub fn take_error(&mut self) -> Option<GraphError> {
        self.last_error.take()
    }

    pub fn pointer_down(&mut self, graph: &mut InteractionGraph, point: Point) {
        match hit_test(graph, point) {
            HitTarget::OutputPin(node, index) => {
                self.gesture = Gesture::DragWire {
                    from_node: node,
                    from_output: index,
                };
            }
            HitTarget::InputPin(node, index) => {
                // Grabbing a fed input detaches its wire and continues the
                // drag from the upstream pin, the usual rewire gesture.
                if let Some(connection) = graph.connection_to(&node, index).cloned() {
                    graph.remove_connection(&connection.id);
                    self.gesture = Gesture::DragWire {
                        from_node: connection.from_node,
                        from_output: connection.from_output,
                    };
                } else {
                    self.gesture = Gesture::Idle;
                }
            }
            HitTarget::Node(node) => {
                if !self.selection.contains(&node) {
                    self.selection.clear();
                    self.selection.insert(node.clone());
                }
                let (x, y) = graph.node(&node).map(|n| n.position()).unwrap_or_default();
                self.gesture = Gesture::DragNode {
                    node,
                    grab: Point::new(point.x - x, point.y - y),
                };
            }
            HitTarget::Background => {
                self.selection.clear();
                self.gesture = Gesture::BoxSelect { anchor: point };
            }
        }
    }

    pub fn pointer_move(&mut self, graph: &mut InteractionGraph, point: Point) {
        if let Gesture::DragNode { node, grab } = &self.gesture {
            let _ = graph.set_position(node, point.x - grab.x, point.y - grab.y);
        }
    }

    pub fn pointer_up(&mut self, graph: &mut InteractionGraph, point: Point) {
        match std::mem::replace(&mut self.gesture, Gesture::Idle) {
            Gesture::DragWire {
                from_node,
                from_output,
            } => {
                if let HitTarget::InputPin(to_node, to_input) = hit_test(graph, point) {
                    if let Err(e) =
                        graph.add_connection(&from_node, from_output, &to_node, to_input)
                    {
                        self.last_error = Some(e);
                    }
                }
                // Dropped on anything else: the wire is simply discarded.
            }
            Gesture::BoxSelect { anchor } => {
                let band = Rect::from_corners(anchor, point);
                self.selection = graph
                    .nodes()
                    .filter(|node| band.intersects(&node_rect(node)))
                    .map(|node| node.id().clone())
                    .collect();
            }
            Gesture::DragNode { .. } | Gesture::Idle => {}
        }
    }

    /// Deletes every selected node (cascading their connections).
    pub fn delete_selection(&mut self, graph: &mut InteractionGraph) {
        for id in std::mem::take(&mut self.selection) {
            graph.remove_node(&id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::registry::NodeRegistry;

    fn graph_with(types: &[(&str, f32, f32)]) -> (InteractionGraph, Vec<NodeId>) {
        let registry = NodeRegistry::with_defaults();
        let mut graph = InteractionGraph::new();
        let mut ids = Vec::new();
        for (type_name, x, y) in types {
            let node = registry.create(type_name, *x, *y).unwrap();
            ids.push(graph.add_node(node).unwrap());
        }
        (graph, ids)
    }

    #[test]
    fn drag_from_output_to_input_connects() {
        let (mut graph, ids) = graph_with(&[("Clock", 0.0, 0.0), ("Spin", 400.0, 0.0)]);
        let mut canvas = CanvasController::new();

        let from = output_pin(graph.node(&ids[0]).unwrap(), 0);
        let to = input_pin(graph.node(&ids[1]).unwrap(), 0);
        canvas.pointer_down(&mut graph, from);
        canvas.pointer_move(&mut graph, Point::new(200.0, 10.0));
        canvas.pointer_up(&mut graph, to);

        assert_eq!(graph.connections().len(), 1);
        assert!(canvas.take_error().is_none());
    }

    #[test]
    fn rejected_wire_surfaces_an_error_and_leaves_graph_unchanged() {
        let (mut graph, ids) = graph_with(&[("Pulse", 0.0, 0.0), ("Add", 400.0, 0.0)]);
        let mut canvas = CanvasController::new();

        // Pulse's second output is the Bool gate; Add's inputs are numeric.
        let from = output_pin(graph.node(&ids[0]).unwrap(), 1);
        let to = input_pin(graph.node(&ids[1]).unwrap(), 0);
        canvas.pointer_down(&mut graph, from);
        canvas.pointer_up(&mut graph, to);

        assert!(graph.connections().is_empty());
        assert!(matches!(
            canvas.take_error(),
            Some(GraphError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn dragging_a_node_body_moves_it() {
        let (mut graph, ids) = graph_with(&[("Clock", 100.0, 100.0)]);
        let mut canvas = CanvasController::new();

        canvas.pointer_down(&mut graph, Point::new(110.0, 110.0));
        canvas.pointer_move(&mut graph, Point::new(210.0, 160.0));
        canvas.pointer_up(&mut graph, Point::new(210.0, 160.0));

        assert_eq!(graph.node(&ids[0]).unwrap().position(), (200.0, 150.0));
    }

    #[test]
    fn box_select_then_delete_cascades() {
        let (mut graph, ids) =
            graph_with(&[("Clock", 0.0, 0.0), ("Spin", 400.0, 0.0), ("Add", 2000.0, 2000.0)]);
        graph.add_connection(&ids[0], 0, &ids[1], 0).unwrap();
        let mut canvas = CanvasController::new();

        canvas.pointer_down(&mut graph, Point::new(-50.0, -50.0));
        canvas.pointer_up(&mut graph, Point::new(700.0, 300.0));
        assert!(canvas.is_selected(&ids[0]) && canvas.is_selected(&ids[1]));
        assert!(!canvas.is_selected(&ids[2]));

        canvas.delete_selection(&mut graph);
        assert_eq!(graph.node_count(), 1);
        assert!(graph.connections().is_empty());
    }

    #[test]
    fn grabbing_a_fed_input_detaches_the_wire() {
        let (mut graph, ids) = graph_with(&[("Clock", 0.0, 0.0), ("Spin", 400.0, 0.0)]);
        graph.add_connection(&ids[0], 0, &ids[1], 0).unwrap();
        let mut canvas = CanvasController::new();

        let pin = input_pin(graph.node(&ids[1]).unwrap(), 0);
        canvas.pointer_down(&mut graph, pin);
        assert!(graph.connections().is_empty());

        // Dropping on the background discards the detached wire.
        canvas.pointer_up(&mut graph, Point::new(50.0, 600.0));
        assert!(graph.connections().is_empty());
    }
}
