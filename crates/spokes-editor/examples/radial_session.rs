//! Scripted session against the in-memory canvas.
//!
//! Mounts a diagram, changes the spoke count, drags the hub, and prints the
//! shape set after each step. Run with `RUST_LOG=debug` to watch the
//! controller's decisions.

use spokes_core::{Point, ShapeProps, Viewport};
use spokes_editor::{MemoryCanvas, SyncConfig, SyncController};

fn dump(label: &str, ctl: &SyncController<MemoryCanvas>) {
    println!("── {label} (generation {})", ctl.generation());
    for shape in ctl.canvas.shapes() {
        let p = shape.position;
        match &shape.props {
            ShapeProps::Label { text } => println!("  {text:<8} at ({:.1}, {:.1})", p.x, p.y),
            ShapeProps::Line { end } => println!(
                "  line     ({:.1}, {:.1}) → ({:.1}, {:.1})",
                p.x, p.y, end.x, end.y
            ),
            ShapeProps::Ellipse { radius } => {
                println!("  ring     r={radius} at ({:.1}, {:.1})", p.x, p.y)
            }
        }
    }
}

fn main() {
    env_logger::init();

    let canvas = MemoryCanvas::new(Viewport {
        x: 0.0,
        y: 0.0,
        width: 300.0,
        height: 300.0,
    });
    let mut ctl = SyncController::new(canvas, SyncConfig::default());
    ctl.initialize();
    ctl.pump(0.0);
    dump("mounted", &ctl);

    ctl.set_spoke_count(3);
    ctl.pump(10.0);
    dump("three spokes", &ctl);

    // A drag gesture: many small moves, then the pointer rests
    let hub = ctl.tree().map(|t| t.hub().id);
    if let Some(hub) = hub {
        let mut now = 20.0;
        for step in 1..=10 {
            ctl.canvas
                .move_shape(hub, Point::new(150.0 + 4.0 * step as f64, 150.0));
            ctl.pump(now);
            now += 16.0;
        }
        ctl.pump(now + ctl.config().debounce_ms);
    }
    dump("after hub drag", &ctl);

    let stats = ctl.stats();
    println!(
        "regenerations={} comparisons={} ignored={}",
        stats.regenerations, stats.comparisons, stats.ignored
    );
    ctl.shutdown();
}
