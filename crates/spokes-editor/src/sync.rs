//! Bidirectional sync engine: hub-and-spoke tree ↔ canvas shapes.
//!
//! - **Tree → Canvas**: every change to the logical model (a new spoke
//!   count, a moved hub) is applied by *regenerating*: the controller deletes
//!   the shapes it drew last time, lays the diagram out again, and creates a
//!   fresh shape set with fresh ids.
//!
//! - **Canvas → Tree**: the canvas reports edits through a `ChangeFeed`.
//!   Relevant records arm a debounce timer; when it fires the controller
//!   compares where the canvas says the hub and spokes are with where the
//!   tree thinks they are, and regenerates around any drift it finds.
//!
//! Every regeneration bumps a generation counter that is stamped into the
//! meta of each shape it creates. The echo of a regeneration (its own
//! `Created` records, and `Deleted` records for the previous generation)
//! therefore never looks like a user edit, so the controller cannot trigger
//! itself.

use crate::canvas::{Canvas, ChangeFeed, ChangeOp, ChangeRecord};
use crate::debounce::Debouncer;
use serde::{Deserialize, Serialize};
use spokes_core::layout::{MAX_SPOKES, MIN_SPOKES};
use spokes_core::{
    Generation, LayoutConfig, NodeId, NodeIndex, Point, RadialLayout, ShapeId, ShapeMeta,
    ShapeProps, ShapeSpec, Tree, Vec2, clamp_spoke_count, compute_layout, initial_hub,
};
use std::collections::HashMap;

// ─── Config ───────────────────────────────────────────────────────────────

/// Which shapes a regeneration deletes before drawing the new set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClearPolicy {
    /// Only shapes this controller created.
    #[default]
    Owned,
    /// Everything on the canvas.
    All,
}

/// Configuration for `SyncController`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Spokes drawn on first mount, clamped to 2..=6. Default: **2**.
    pub initial_spoke_count: usize,

    /// Coalescing window for change notifications, in ms. Default: **150**.
    pub debounce_ms: f64,

    /// Largest position difference still treated as "not moved".
    /// Default: **0** (any movement counts).
    pub drift_tolerance: f64,

    pub clear_policy: ClearPolicy,

    pub layout: LayoutConfig,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            initial_spoke_count: MIN_SPOKES,
            debounce_ms: 150.0,
            drift_tolerance: 0.0,
            clear_policy: ClearPolicy::Owned,
            layout: LayoutConfig::default(),
        }
    }
}

impl SyncConfig {
    /// Parse a (possibly partial) JSON config. Missing fields use defaults.
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("invalid sync config: {e}"))
    }
}

/// Counters for what the controller has done so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncStats {
    pub regenerations: u64,
    /// Drift comparisons run (one per fired debounce).
    pub comparisons: u64,
    /// Change records dropped as echoes, stale, or untracked.
    pub ignored: u64,
}

/// A discrepancy found by `reconcile`.
#[derive(Debug, Clone, Copy)]
enum Drift {
    Hub { reported: Point, delta: Vec2 },
    Spoke { idx: NodeIndex, reported: Point },
}

// ─── Controller ───────────────────────────────────────────────────────────

/// Owns the logical tree for one diagram and keeps the canvas in step with
/// it.
pub struct SyncController<C: Canvas> {
    /// The canvas this diagram is drawn on.
    pub canvas: C,

    config: SyncConfig,

    /// `None` until the first regeneration.
    tree: Option<Tree>,

    /// Last reported canvas position of each tracked node.
    bindings: HashMap<NodeId, Point>,

    /// Bumped at the start of every regeneration.
    generation: Generation,

    spoke_count: usize,

    /// Shapes created by the current generation, in creation order.
    owned: Vec<ShapeId>,

    feed: Option<ChangeFeed>,
    debounce: Debouncer,
    closed: bool,
    stats: SyncStats,
}

impl<C: Canvas> SyncController<C> {
    pub fn new(canvas: C, config: SyncConfig) -> Self {
        let spoke_count = config.initial_spoke_count.clamp(MIN_SPOKES, MAX_SPOKES);
        let debounce = Debouncer::new(config.debounce_ms);
        Self {
            canvas,
            config,
            tree: None,
            bindings: HashMap::new(),
            generation: 0,
            spoke_count,
            owned: Vec::new(),
            feed: None,
            debounce,
            closed: false,
            stats: SyncStats::default(),
        }
    }

    /// Subscribe to the canvas and draw the first diagram, centered on the
    /// viewport.
    pub fn initialize(&mut self) {
        self.closed = false;
        self.tree = None;
        self.regenerate(self.spoke_count);
    }

    /// Stop listening and cancel any pending comparison. Shapes stay on the
    /// canvas; later triggers are ignored until `initialize` is called again.
    pub fn shutdown(&mut self) {
        self.debounce.cancel();
        self.feed = None;
        self.closed = true;
        log::debug!("sync controller shut down at generation {}", self.generation);
    }

    // ─── Tree → Canvas direction ─────────────────────────────────────────

    /// The UI changed the spoke count. Clamps to 2..=6 and redraws.
    pub fn set_spoke_count(&mut self, requested: i64) {
        if self.closed {
            return;
        }
        self.spoke_count = clamp_spoke_count(requested);
        self.regenerate(self.spoke_count);
    }

    /// Clear and redraw the whole diagram with `spoke_count` spokes around
    /// the current hub (or the viewport center if there is no tree yet).
    /// The clamped count becomes the configured count for later redraws.
    pub fn regenerate(&mut self, spoke_count: usize) {
        if self.closed {
            return;
        }
        if self.feed.is_none() {
            self.feed = Some(self.canvas.subscribe());
        }

        let spoke_count = spoke_count.clamp(MIN_SPOKES, MAX_SPOKES);
        self.spoke_count = spoke_count;
        let anchor = match &self.tree {
            Some(tree) => tree.hub().position,
            None => initial_hub(self.canvas.viewport_bounds()),
        };

        self.generation += 1;
        self.debounce.cancel();
        self.clear_shapes();

        let layout = compute_layout(anchor, spoke_count, &self.config.layout);
        let tree = Tree::from_layout(&layout);
        self.create_shapes(&tree, &layout);

        self.bindings = tree
            .nodes()
            .filter_map(|node| {
                self.canvas
                    .get_shape(node.id)
                    .map(|shape| (node.id, shape.position))
            })
            .collect();
        self.tree = Some(tree);
        self.stats.regenerations += 1;

        log::debug!(
            "generation {}: {} spokes around ({:.1}, {:.1}), {} shapes",
            self.generation,
            spoke_count,
            anchor.x,
            anchor.y,
            self.owned.len()
        );
    }

    fn clear_shapes(&mut self) {
        let ids = match self.config.clear_policy {
            ClearPolicy::Owned => std::mem::take(&mut self.owned),
            ClearPolicy::All => {
                self.owned.clear();
                self.canvas.select_all()
            }
        };
        if !ids.is_empty() {
            self.canvas.delete_shapes(&ids);
        }
    }

    /// Creates hub label → ring → (spoke label, connector) per spoke.
    fn create_shapes(&mut self, tree: &Tree, layout: &RadialLayout) {
        let generation = self.generation;
        let meta = ShapeMeta {
            generation: Some(generation),
        };

        let mut specs = Vec::with_capacity(2 + 2 * layout.spokes.len());
        specs.push(ShapeSpec::label(tree.hub(), generation));
        if let Some(ring) = layout.ring {
            specs.push(ShapeSpec {
                id: NodeId::with_prefix("ring"),
                position: ring.center,
                props: ShapeProps::Ellipse {
                    radius: ring.radius,
                },
                meta,
            });
        }
        for (idx, line) in tree.spokes().into_iter().zip(&layout.connectors) {
            specs.push(ShapeSpec::label(&tree.graph[idx], generation));
            specs.push(ShapeSpec {
                id: NodeId::with_prefix("link"),
                position: line.p0,
                props: ShapeProps::Line { end: line.p1 },
                meta,
            });
        }

        for spec in specs {
            self.owned.push(spec.id);
            self.canvas.create_shape(spec);
        }
    }

    // ─── Canvas → Tree direction ─────────────────────────────────────────

    /// Drain the change feed, then run a comparison if the debounce window
    /// has elapsed. Returns `true` if the diagram was regenerated.
    pub fn pump(&mut self, now: f64) -> bool {
        let records = match &self.feed {
            Some(feed) => feed.drain(),
            None => Vec::new(),
        };
        for record in records {
            self.on_change(record, now);
        }
        self.tick(now)
    }

    /// Take one change notification. Returns `true` if it was relevant and
    /// (re)armed the debounce timer.
    pub fn on_change(&mut self, record: ChangeRecord, now: f64) -> bool {
        if self.closed {
            return false;
        }
        let relevant = record.generation == Some(self.generation)
            && record.op != ChangeOp::Created
            && self
                .tree
                .as_ref()
                .is_some_and(|tree| tree.index_of(record.shape).is_some());
        if !relevant {
            self.stats.ignored += 1;
            log::trace!(
                "ignoring {:?} of {} (generation {:?}, current {})",
                record.op,
                record.shape,
                record.generation,
                self.generation
            );
            return false;
        }

        match self.canvas.get_shape(record.shape) {
            Some(shape) if record.op == ChangeOp::Updated => {
                self.bindings.insert(record.shape, shape.position);
            }
            _ => {
                self.bindings.remove(&record.shape);
            }
        }
        self.debounce.poke(now);
        true
    }

    /// Fire the debounced comparison if it is due. Returns `true` if the
    /// diagram was regenerated.
    pub fn tick(&mut self, now: f64) -> bool {
        if self.closed || !self.debounce.fire_if_due(now) {
            return false;
        }
        self.reconcile()
    }

    /// Compare reported shape positions with the tree and regenerate around
    /// the first drift found: the hub first, then spokes in order. At most
    /// one regeneration per call.
    pub fn reconcile(&mut self) -> bool {
        if self.closed {
            return false;
        }
        self.stats.comparisons += 1;

        let Some(drift) = self.detect_drift() else {
            return false;
        };
        let Some(tree) = self.tree.as_mut() else {
            return false;
        };

        match drift {
            Drift::Hub { reported, delta } => {
                log::debug!("hub moved by ({:.1}, {:.1})", delta.x, delta.y);
                tree.translate_spokes(delta);
                tree.hub_mut().position = reported;
            }
            Drift::Spoke { idx, reported } => {
                let node = &mut tree.graph[idx];
                log::debug!(
                    "{} moved to ({:.1}, {:.1})",
                    node.label,
                    reported.x,
                    reported.y
                );
                node.position = reported;
            }
        }

        self.regenerate(self.spoke_count);
        true
    }

    /// Refresh bindings from the canvas, then return the first node whose
    /// binding has drifted from the tree. Shapes the canvas no longer has
    /// lose their binding and are skipped.
    fn detect_drift(&mut self) -> Option<Drift> {
        let tree = self.tree.as_ref()?;
        for node in tree.nodes() {
            match self.canvas.get_shape(node.id) {
                Some(shape) => {
                    self.bindings.insert(node.id, shape.position);
                }
                None => {
                    self.bindings.remove(&node.id);
                }
            }
        }

        let tolerance = self.config.drift_tolerance;
        let hub = tree.hub();
        if let Some(&reported) = self.bindings.get(&hub.id) {
            let delta = reported - hub.position;
            if delta.hypot() > tolerance {
                return Some(Drift::Hub { reported, delta });
            }
        }

        tree.spokes().into_iter().find_map(|idx| {
            let node = &tree.graph[idx];
            let &reported = self.bindings.get(&node.id)?;
            ((reported - node.position).hypot() > tolerance)
                .then_some(Drift::Spoke { idx, reported })
        })
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    pub fn tree(&self) -> Option<&Tree> {
        self.tree.as_ref()
    }

    pub fn bindings(&self) -> &HashMap<NodeId, Point> {
        &self.bindings
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// The configured (clamped) spoke count.
    pub fn spoke_count(&self) -> usize {
        self.spoke_count
    }

    /// Shapes drawn by the current generation, in creation order.
    pub fn owned_shapes(&self) -> &[ShapeId] {
        &self.owned
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn stats(&self) -> SyncStats {
        self.stats
    }

    /// Whether a debounced comparison is waiting to fire.
    pub fn is_settling(&self) -> bool {
        self.debounce.is_pending()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryCanvas;
    use spokes_core::{ShapeKind, Viewport};

    fn controller() -> SyncController<MemoryCanvas> {
        let mut ctl = SyncController::new(
            MemoryCanvas::new(Viewport::default()),
            SyncConfig::default(),
        );
        ctl.initialize();
        ctl
    }

    #[test]
    fn initialize_draws_hub_ring_and_spokes() {
        let ctl = controller();
        let kinds: Vec<ShapeKind> = ctl.canvas.shapes().map(|s| s.kind()).collect();
        assert_eq!(
            kinds,
            [
                ShapeKind::TextLabel,      // hub
                ShapeKind::EllipseOutline, // ring
                ShapeKind::TextLabel,
                ShapeKind::LineSegment,
                ShapeKind::TextLabel,
                ShapeKind::LineSegment,
            ]
        );
        assert_eq!(ctl.generation(), 1);
        assert_eq!(ctl.bindings().len(), 3);
        assert_eq!(ctl.owned_shapes(), ctl.canvas.select_all().as_slice());
    }

    #[test]
    fn no_ring_when_disabled() {
        let config = SyncConfig {
            layout: LayoutConfig {
                ring_radius: None,
                ..Default::default()
            },
            ..Default::default()
        };
        let mut ctl = SyncController::new(MemoryCanvas::default(), config);
        ctl.initialize();
        assert!(
            ctl.canvas
                .shapes()
                .all(|s| s.kind() != ShapeKind::EllipseOutline)
        );
        assert_eq!(ctl.canvas.len(), 5);
    }

    #[test]
    fn own_echo_is_ignored() {
        let mut ctl = controller();
        assert!(!ctl.pump(0.0));
        assert!(!ctl.is_settling());
        assert_eq!(ctl.stats().ignored, 6);
        assert_eq!(ctl.stats().comparisons, 0);
    }

    #[test]
    fn config_from_partial_json() {
        let config = SyncConfig::from_json(
            r#"{"initial_spoke_count": 5, "clear_policy": "all", "layout": {"radius": 60}}"#,
        )
        .unwrap();
        assert_eq!(config.initial_spoke_count, 5);
        assert_eq!(config.clear_policy, ClearPolicy::All);
        assert_eq!(config.layout.radius, 60.0);
        assert_eq!(config.debounce_ms, 150.0);

        let err = SyncConfig::from_json("{\"debounce_ms\": \"soon\"}").unwrap_err();
        assert!(err.starts_with("invalid sync config"), "{err}");
    }

    #[test]
    fn initial_count_is_clamped() {
        let config = SyncConfig {
            initial_spoke_count: 40,
            ..Default::default()
        };
        let mut ctl = SyncController::new(MemoryCanvas::default(), config);
        ctl.initialize();
        assert_eq!(ctl.spoke_count(), MAX_SPOKES);
        assert_eq!(ctl.tree().unwrap().spoke_count(), MAX_SPOKES);
    }

    #[test]
    fn clear_all_policy_removes_foreign_shapes() {
        let config = SyncConfig {
            clear_policy: ClearPolicy::All,
            ..Default::default()
        };
        let mut ctl = SyncController::new(MemoryCanvas::default(), config);
        ctl.canvas.create_shape(ShapeSpec {
            id: ShapeId::intern("sticky_note"),
            position: Point::new(0.0, 0.0),
            props: ShapeProps::Label {
                text: "note".into(),
            },
            meta: ShapeMeta::default(),
        });
        ctl.initialize();

        assert!(ctl.canvas.get_shape(ShapeId::intern("sticky_note")).is_none());
        assert_eq!(ctl.canvas.len(), ctl.owned_shapes().len());
    }

    #[test]
    fn shutdown_stops_everything() {
        let mut ctl = controller();
        let hub = ctl.tree().unwrap().hub().id;
        ctl.canvas.move_shape(hub, Point::new(10.0, 10.0));
        ctl.pump(0.0);
        assert!(ctl.is_settling());

        ctl.shutdown();
        assert!(!ctl.is_settling());
        assert!(!ctl.pump(1_000.0));
        ctl.set_spoke_count(5);
        assert_eq!(ctl.generation(), 1);

        // The canvas prunes the dropped feed on its next emit.
        ctl.canvas.move_shape(hub, Point::new(20.0, 20.0));
        assert_eq!(ctl.canvas.subscriber_count(), 0);
    }
}
