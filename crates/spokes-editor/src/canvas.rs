//! The drawing-canvas capability the sync controller drives.
//!
//! The controller never renders anything itself. It creates and deletes
//! shapes through `Canvas`, reads back where the canvas says they are, and
//! listens to a `ChangeFeed` for edits made by anyone (itself included).

use spokes_core::{
    Generation, Point, ShapeId, ShapeKind, ShapeMeta, ShapeProps, ShapeSpec, Viewport,
};
use std::sync::mpsc::{Receiver, Sender, channel};

/// A live shape as the canvas currently reports it.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeRecord {
    pub id: ShapeId,
    pub position: Point,
    pub props: ShapeProps,
    pub meta: ShapeMeta,
}

impl ShapeRecord {
    pub fn kind(&self) -> ShapeKind {
        self.props.kind()
    }
}

impl From<ShapeSpec> for ShapeRecord {
    fn from(spec: ShapeSpec) -> Self {
        Self {
            id: spec.id,
            position: spec.position,
            props: spec.props,
            meta: spec.meta,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOp {
    Created,
    Updated,
    Deleted,
}

/// One entry of a change notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeRecord {
    pub shape: ShapeId,
    pub op: ChangeOp,
    /// Generation stamped in the shape's meta at the time of the change.
    pub generation: Option<Generation>,
}

/// Receiving end of a canvas subscription. Dropping it unsubscribes.
#[derive(Debug)]
pub struct ChangeFeed {
    rx: Receiver<ChangeRecord>,
}

/// Sending end kept by the canvas, one per subscriber.
#[derive(Debug, Clone)]
pub struct ChangeSink {
    tx: Sender<ChangeRecord>,
}

/// Open a subscription: the canvas keeps the sink, the subscriber the feed.
pub fn change_channel() -> (ChangeSink, ChangeFeed) {
    let (tx, rx) = channel();
    (ChangeSink { tx }, ChangeFeed { rx })
}

impl ChangeSink {
    /// Deliver a record. Returns `false` once the feed has been dropped, so
    /// the canvas can prune the sink.
    pub fn send(&self, record: ChangeRecord) -> bool {
        self.tx.send(record).is_ok()
    }
}

impl ChangeFeed {
    /// Take everything queued so far without blocking.
    pub fn drain(&self) -> Vec<ChangeRecord> {
        self.rx.try_iter().collect()
    }
}

/// What the controller needs from a drawing canvas.
pub trait Canvas {
    fn create_shape(&mut self, shape: ShapeSpec);

    /// Delete shapes by id. Unknown ids are ignored.
    fn delete_shapes(&mut self, ids: &[ShapeId]);

    /// Ids of every shape on the canvas, in creation order.
    fn select_all(&self) -> Vec<ShapeId>;

    fn get_shape(&self, id: ShapeId) -> Option<ShapeRecord>;

    /// Subscribe to change notifications for every shape.
    fn subscribe(&mut self) -> ChangeFeed;

    fn viewport_bounds(&self) -> Viewport;
}
