pub mod id;
pub mod layout;
pub mod model;

pub use id::{NodeId, ShapeId};
pub use layout::{
    LayoutConfig, MAX_SPOKES, MIN_SPOKES, RadialLayout, Viewport, clamp_spoke_count,
    compute_layout, initial_hub,
};
pub use model::*;

// Re-export so downstream crates don't need direct petgraph/kurbo dependencies
pub use kurbo::{Circle, Line, Point, Vec2};
pub use petgraph::graph::NodeIndex;
