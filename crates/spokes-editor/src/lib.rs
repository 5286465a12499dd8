pub mod canvas;
pub mod debounce;
pub mod memory;
pub mod sync;

pub use canvas::{Canvas, ChangeFeed, ChangeOp, ChangeRecord, ShapeRecord};
pub use memory::MemoryCanvas;
pub use sync::{ClearPolicy, SyncConfig, SyncController, SyncStats};
