//! In-memory canvas.
//!
//! Keeps shapes in creation order and fans change records out to every
//! live subscriber. Backs the WASM widget (the page only paints what this
//! store holds) and the test suite.

use crate::canvas::{
    Canvas, ChangeFeed, ChangeOp, ChangeRecord, ChangeSink, ShapeRecord, change_channel,
};
use spokes_core::{Point, ShapeId, ShapeSpec, Viewport};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct MemoryCanvas {
    shapes: HashMap<ShapeId, ShapeRecord>,
    /// Creation order; `select_all` and `shapes` follow it.
    order: Vec<ShapeId>,
    sinks: Vec<ChangeSink>,
    viewport: Viewport,
}

impl MemoryCanvas {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            ..Default::default()
        }
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Move a shape the way a user drag would. Returns `false` if the shape
    /// does not exist.
    pub fn move_shape(&mut self, id: ShapeId, position: Point) -> bool {
        let Some(shape) = self.shapes.get_mut(&id) else {
            return false;
        };
        shape.position = position;
        let generation = shape.meta.generation;
        self.emit(ChangeRecord {
            shape: id,
            op: ChangeOp::Updated,
            generation,
        });
        true
    }

    /// Shapes in creation order.
    pub fn shapes(&self) -> impl Iterator<Item = &ShapeRecord> {
        self.order.iter().filter_map(|id| self.shapes.get(id))
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Number of subscribers still listening.
    pub fn subscriber_count(&self) -> usize {
        self.sinks.len()
    }

    fn emit(&mut self, record: ChangeRecord) {
        self.sinks.retain(|sink| sink.send(record));
    }
}

impl Canvas for MemoryCanvas {
    fn create_shape(&mut self, shape: ShapeSpec) {
        let record = ChangeRecord {
            shape: shape.id,
            op: ChangeOp::Created,
            generation: shape.meta.generation,
        };
        if self.shapes.insert(shape.id, shape.into()).is_none() {
            self.order.push(record.shape);
        }
        self.emit(record);
    }

    fn delete_shapes(&mut self, ids: &[ShapeId]) {
        for &id in ids {
            if let Some(removed) = self.shapes.remove(&id) {
                self.order.retain(|other| *other != id);
                self.emit(ChangeRecord {
                    shape: id,
                    op: ChangeOp::Deleted,
                    generation: removed.meta.generation,
                });
            }
        }
    }

    fn select_all(&self) -> Vec<ShapeId> {
        self.order.clone()
    }

    fn get_shape(&self, id: ShapeId) -> Option<ShapeRecord> {
        self.shapes.get(&id).cloned()
    }

    fn subscribe(&mut self) -> ChangeFeed {
        let (sink, feed) = change_channel();
        self.sinks.push(sink);
        feed
    }

    fn viewport_bounds(&self) -> Viewport {
        self.viewport
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spokes_core::{ShapeMeta, ShapeProps};

    fn label(name: &str, x: f64, y: f64) -> ShapeSpec {
        ShapeSpec {
            id: ShapeId::intern(name),
            position: Point::new(x, y),
            props: ShapeProps::Label { text: name.into() },
            meta: ShapeMeta {
                generation: Some(1),
            },
        }
    }

    #[test]
    fn create_get_delete() {
        let mut canvas = MemoryCanvas::default();
        canvas.create_shape(label("mem_a", 1.0, 2.0));
        canvas.create_shape(label("mem_b", 3.0, 4.0));

        assert_eq!(canvas.len(), 2);
        let a = canvas.get_shape(ShapeId::intern("mem_a")).unwrap();
        assert_eq!(a.position, Point::new(1.0, 2.0));

        canvas.delete_shapes(&[ShapeId::intern("mem_a"), ShapeId::intern("missing")]);
        assert_eq!(canvas.select_all(), vec![ShapeId::intern("mem_b")]);
        assert!(canvas.get_shape(ShapeId::intern("mem_a")).is_none());
    }

    #[test]
    fn changes_reach_every_subscriber() {
        let mut canvas = MemoryCanvas::default();
        let first = canvas.subscribe();
        let second = canvas.subscribe();

        canvas.create_shape(label("mem_c", 0.0, 0.0));
        assert!(canvas.move_shape(ShapeId::intern("mem_c"), Point::new(5.0, 5.0)));
        assert!(!canvas.move_shape(ShapeId::intern("mem_nope"), Point::new(5.0, 5.0)));

        for feed in [&first, &second] {
            let ops: Vec<ChangeOp> = feed.drain().into_iter().map(|r| r.op).collect();
            assert_eq!(ops, [ChangeOp::Created, ChangeOp::Updated]);
        }
    }

    #[test]
    fn dropped_feeds_are_pruned() {
        let mut canvas = MemoryCanvas::default();
        let feed = canvas.subscribe();
        assert_eq!(canvas.subscriber_count(), 1);

        drop(feed);
        canvas.create_shape(label("mem_d", 0.0, 0.0));
        assert_eq!(canvas.subscriber_count(), 0);
    }

    #[test]
    fn updates_carry_the_shape_generation() {
        let mut canvas = MemoryCanvas::default();
        let feed = canvas.subscribe();
        canvas.create_shape(label("mem_e", 0.0, 0.0));
        canvas.move_shape(ShapeId::intern("mem_e"), Point::new(1.0, 0.0));

        let records = feed.drain();
        assert!(records.iter().all(|r| r.generation == Some(1)));
    }
}
