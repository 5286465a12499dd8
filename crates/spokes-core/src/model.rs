//! Logical model of a hub-and-spoke diagram, plus the shape descriptors the
//! controller hands to a canvas.
//!
//! The tree is a tiny directed graph: one hub with an edge to each spoke.
//! It is never patched incrementally by the controller; every regeneration
//! builds a new one from a `RadialLayout` with fresh ids.

use crate::id::{NodeId, ShapeId};
use crate::layout::{MAX_SPOKES, RadialLayout};
use kurbo::{Point, Vec2};
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableDiGraph;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashMap;

// ─── Nodes ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeRole {
    Hub,
    Spoke,
}

impl NodeRole {
    /// Prefix used when minting ids for nodes of this role.
    pub fn id_prefix(self) -> &'static str {
        match self {
            NodeRole::Hub => "hub",
            NodeRole::Spoke => "spoke",
        }
    }
}

/// One point of the diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub label: String,
    pub position: Point,
    pub role: NodeRole,
}

impl Node {
    pub fn hub(position: Point) -> Self {
        Self {
            id: NodeId::with_prefix(NodeRole::Hub.id_prefix()),
            label: "Hub".into(),
            position,
            role: NodeRole::Hub,
        }
    }

    /// `ordinal` is 1-based, matching the label text.
    pub fn spoke(ordinal: usize, position: Point) -> Self {
        Self {
            id: NodeId::with_prefix(NodeRole::Spoke.id_prefix()),
            label: format!("Spoke {ordinal}"),
            position,
            role: NodeRole::Spoke,
        }
    }
}

// ─── Tree ────────────────────────────────────────────────────────────────

/// Exactly one hub plus its spokes.
///
/// Edges go from the hub to each spoke. Spokes have no children.
#[derive(Debug, Clone)]
pub struct Tree {
    pub graph: StableDiGraph<Node, ()>,

    /// The hub's index. Always present.
    pub hub: NodeIndex,

    /// Index from NodeId → NodeIndex for fast lookup.
    pub id_index: HashMap<NodeId, NodeIndex>,
}

impl Tree {
    /// A tree holding only a hub at `hub_position`.
    #[must_use]
    pub fn new(hub_position: Point) -> Self {
        let mut graph = StableDiGraph::new();
        let hub_node = Node::hub(hub_position);
        let hub_id = hub_node.id;
        let hub = graph.add_node(hub_node);

        let mut id_index = HashMap::new();
        id_index.insert(hub_id, hub);

        Self {
            graph,
            hub,
            id_index,
        }
    }

    /// Build a fresh tree from a computed layout. Every node gets a new id.
    #[must_use]
    pub fn from_layout(layout: &RadialLayout) -> Self {
        let mut tree = Self::new(layout.hub);
        for &position in &layout.spokes {
            tree.add_spoke(position);
        }
        tree
    }

    /// Append a spoke after the existing ones. Returns its index.
    pub fn add_spoke(&mut self, position: Point) -> NodeIndex {
        let node = Node::spoke(self.spoke_count() + 1, position);
        let id = node.id;
        let idx = self.graph.add_node(node);
        self.graph.add_edge(self.hub, idx, ());
        self.id_index.insert(id, idx);
        idx
    }

    pub fn hub(&self) -> &Node {
        &self.graph[self.hub]
    }

    pub fn hub_mut(&mut self) -> &mut Node {
        &mut self.graph[self.hub]
    }

    /// Children of a node in insertion order.
    ///
    /// Sorted by `NodeIndex` so the order does not depend on how petgraph
    /// walks its adjacency list.
    pub fn children(&self, idx: NodeIndex) -> SmallVec<[NodeIndex; MAX_SPOKES]> {
        let mut children: SmallVec<[NodeIndex; MAX_SPOKES]> = self
            .graph
            .neighbors_directed(idx, petgraph::Direction::Outgoing)
            .collect();
        children.sort();
        children
    }

    /// Spoke indices in insertion (= angular) order.
    pub fn spokes(&self) -> SmallVec<[NodeIndex; MAX_SPOKES]> {
        self.children(self.hub)
    }

    pub fn spoke_count(&self) -> usize {
        self.graph
            .neighbors_directed(self.hub, petgraph::Direction::Outgoing)
            .count()
    }

    /// Every node, hub first, then spokes in order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        std::iter::once(self.hub).chain(self.spokes()).map(|idx| &self.graph[idx])
    }

    pub fn get_by_id(&self, id: NodeId) -> Option<&Node> {
        self.id_index.get(&id).map(|idx| &self.graph[*idx])
    }

    pub fn get_by_id_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.id_index
            .get(&id)
            .copied()
            .map(|idx| &mut self.graph[idx])
    }

    pub fn index_of(&self, id: NodeId) -> Option<NodeIndex> {
        self.id_index.get(&id).copied()
    }

    /// Shift every spoke by `delta`, leaving the hub alone.
    pub fn translate_spokes(&mut self, delta: Vec2) {
        for idx in self.spokes() {
            self.graph[idx].position += delta;
        }
    }
}

// ─── Shapes ──────────────────────────────────────────────────────────────

/// The kinds of shape the diagram asks a canvas to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShapeKind {
    TextLabel,
    LineSegment,
    EllipseOutline,
}

/// Kind-specific shape properties. The shape's `position` is the label
/// anchor, the line start, or the ellipse center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ShapeProps {
    Label { text: String },
    Line { end: Point },
    Ellipse { radius: f64 },
}

impl ShapeProps {
    pub fn kind(&self) -> ShapeKind {
        match self {
            ShapeProps::Label { .. } => ShapeKind::TextLabel,
            ShapeProps::Line { .. } => ShapeKind::LineSegment,
            ShapeProps::Ellipse { .. } => ShapeKind::EllipseOutline,
        }
    }
}

/// Regeneration counter value stamped onto every shape a regeneration makes.
pub type Generation = u64;

/// Bookkeeping a canvas stores alongside a shape and echoes back in change
/// records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShapeMeta {
    /// `None` for shapes this diagram does not own.
    pub generation: Option<Generation>,
}

/// A request to create one shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeSpec {
    pub id: ShapeId,
    pub position: Point,
    pub props: ShapeProps,
    pub meta: ShapeMeta,
}

impl ShapeSpec {
    pub fn kind(&self) -> ShapeKind {
        self.props.kind()
    }

    /// Label shape for a diagram node.
    pub fn label(node: &Node, generation: Generation) -> Self {
        Self {
            id: node.id,
            position: node.position,
            props: ShapeProps::Label {
                text: node.label.clone(),
            },
            meta: ShapeMeta {
                generation: Some(generation),
            },
        }
    }
}
