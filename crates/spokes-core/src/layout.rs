//! Radial layout solver.
//!
//! Maps (hub center, spoke count, config) to absolute positions for the hub,
//! each spoke, the optional boundary ring around the hub, and one connector
//! per spoke. The solver is a pure function: same inputs, bit-identical
//! geometry.

use kurbo::{Circle, Line, Point, Vec2};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::f64::consts::TAU;

/// Fewest spokes the diagram will draw.
pub const MIN_SPOKES: usize = 2;
/// Most spokes the diagram will draw.
pub const MAX_SPOKES: usize = 6;

/// Distance from the hub center to each spoke.
pub const DEFAULT_RADIUS: f64 = 100.0;
/// Radius of the boundary ring drawn around the hub.
pub const DEFAULT_RING_RADIUS: f64 = 30.0;
/// Hub position used when the viewport gives nothing to center on.
pub const DEFAULT_HUB: Point = Point::new(150.0, 150.0);

/// Visible region of the canvas, in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 300.0,
            height: 300.0,
        }
    }
}

impl Viewport {
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// A viewport with no area (or garbage values) cannot anchor the hub.
    pub fn is_degenerate(&self) -> bool {
        ![self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
    }
}

/// Where to put the hub when there is no previous tree to inherit from.
pub fn initial_hub(viewport: Viewport) -> Point {
    if viewport.is_degenerate() {
        DEFAULT_HUB
    } else {
        viewport.center()
    }
}

/// Geometry knobs for the radial layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Hub-to-spoke distance. Default: **100**.
    pub radius: f64,

    /// Radius of the ring around the hub. Connectors start on this ring
    /// instead of at the hub center. `None` draws no ring. Default: **30**.
    pub ring_radius: Option<f64>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            radius: DEFAULT_RADIUS,
            ring_radius: Some(DEFAULT_RING_RADIUS),
        }
    }
}

/// Output of `compute_layout`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadialLayout {
    pub hub: Point,
    /// Spoke positions in insertion order, starting at angle 0.
    pub spokes: SmallVec<[Point; MAX_SPOKES]>,
    pub ring: Option<Circle>,
    /// `connectors[i]` links the hub (or its ring) to `spokes[i]`.
    pub connectors: SmallVec<[Line; MAX_SPOKES]>,
}

/// Clamp an externally requested spoke count into `MIN_SPOKES..=MAX_SPOKES`.
pub fn clamp_spoke_count(requested: i64) -> usize {
    let clamped = requested.clamp(MIN_SPOKES as i64, MAX_SPOKES as i64) as usize;
    if clamped as i64 != requested {
        log::debug!("spoke count {requested} clamped to {clamped}");
    }
    clamped
}

/// Angle of spoke `index` out of `count`, in radians.
pub fn spoke_angle(index: usize, count: usize) -> f64 {
    TAU * index as f64 / count as f64
}

/// Lay out a hub with `spoke_count` spokes evenly around it.
pub fn compute_layout(hub: Point, spoke_count: usize, config: &LayoutConfig) -> RadialLayout {
    let count = spoke_count.clamp(MIN_SPOKES, MAX_SPOKES);
    let ring = config.ring_radius.map(|r| Circle::new(hub, r));

    let mut spokes = SmallVec::new();
    let mut connectors = SmallVec::new();
    for i in 0..count {
        let dir = Vec2::from_angle(spoke_angle(i, count));
        let spoke = hub + dir * config.radius;
        let start = match ring {
            Some(ring) => hub + dir * ring.radius,
            None => hub,
        };
        spokes.push(spoke);
        connectors.push(Line::new(start, spoke));
    }

    RadialLayout {
        hub,
        spokes,
        ring,
        connectors,
    }
}
