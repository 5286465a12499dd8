//! WASM bridge for Spokes — embeds the hub-and-spoke widget in a web page.
//!
//! Compiled via `wasm-pack build --target web`. The page does the painting:
//! it forwards pointer drags through `drag_shape`, calls `pump_now` from
//! `requestAnimationFrame`, and repaints from `shapes_json` whenever a pump
//! or a count change reports that the diagram was regenerated.

mod console;

use spokes_core::{LayoutConfig, NodeId, Point, Viewport, clamp_spoke_count, compute_layout};
use spokes_editor::{MemoryCanvas, SyncConfig, SyncController};
use wasm_bindgen::prelude::*;

/// The widget handle held by the page. One per diagram.
#[wasm_bindgen]
pub struct SpokesWidget {
    controller: SyncController<MemoryCanvas>,
}

#[wasm_bindgen]
impl SpokesWidget {
    /// Mount a widget on a canvas of the given size with default settings.
    #[wasm_bindgen(constructor)]
    pub fn new(width: f64, height: f64) -> Self {
        Self::mount(width, height, SyncConfig::default())
    }

    /// Mount with a JSON config (any subset of the `SyncConfig` fields).
    pub fn with_config(
        width: f64,
        height: f64,
        config_json: &str,
    ) -> Result<SpokesWidget, JsValue> {
        let config = SyncConfig::from_json(config_json).map_err(|e| JsValue::from_str(&e))?;
        Ok(Self::mount(width, height, config))
    }

    /// The UI's +/- control changed the count. Clamped to 2..=6.
    pub fn set_spoke_count(&mut self, count: i32) {
        self.controller.set_spoke_count(i64::from(count));
    }

    pub fn spoke_count(&self) -> u32 {
        self.controller.spoke_count() as u32
    }

    /// Only affects where the hub goes when there is no diagram yet.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.controller.canvas.set_viewport(viewport(width, height));
    }

    /// The user dragged a shape to (x, y). Returns `false` for unknown ids.
    pub fn drag_shape(&mut self, id: &str, x: f64, y: f64) -> bool {
        self.controller
            .canvas
            .move_shape(NodeId::intern(id), Point::new(x, y))
    }

    /// Process pending canvas changes at `now_ms`. Returns `true` if the
    /// diagram was regenerated and needs repainting.
    pub fn pump(&mut self, now_ms: f64) -> bool {
        self.controller.pump(now_ms)
    }

    /// `pump` with the browser clock.
    pub fn pump_now(&mut self) -> bool {
        self.pump(js_sys::Date::now())
    }

    /// Current regeneration counter (as a JS number).
    pub fn generation(&self) -> f64 {
        self.controller.generation() as f64
    }

    /// Every shape on the canvas, in paint order:
    /// `[{"id","kind","x","y","props":{...},"generation"}]`.
    pub fn shapes_json(&self) -> String {
        let shapes: Vec<serde_json::Value> = self
            .controller
            .canvas
            .shapes()
            .map(|shape| {
                serde_json::json!({
                    "id": shape.id,
                    "kind": shape.kind(),
                    "x": shape.position.x,
                    "y": shape.position.y,
                    "props": shape.props,
                    "generation": shape.meta.generation,
                })
            })
            .collect();
        serde_json::Value::Array(shapes).to_string()
    }

    /// The logical tree: `{"hub":{...},"spokes":[{...}]}`.
    pub fn tree_json(&self) -> String {
        let Some(tree) = self.controller.tree() else {
            return "null".to_string();
        };
        let spokes: Vec<_> = tree.spokes().iter().map(|&idx| &tree.graph[idx]).collect();
        serde_json::json!({
            "hub": tree.hub(),
            "spokes": spokes,
        })
        .to_string()
    }

    /// Tear down: stops listening and cancels pending work. Shapes stay.
    pub fn shutdown(&mut self) {
        self.controller.shutdown();
    }
}

impl SpokesWidget {
    fn mount(width: f64, height: f64, config: SyncConfig) -> Self {
        console::install();

        let canvas = MemoryCanvas::new(viewport(width, height));
        let mut controller = SyncController::new(canvas, config);
        controller.initialize();
        log::info!(
            "spokes widget mounted: {}x{}, {} spokes",
            width,
            height,
            controller.spoke_count()
        );
        Self { controller }
    }
}

fn viewport(width: f64, height: f64) -> Viewport {
    Viewport {
        x: 0.0,
        y: 0.0,
        width,
        height,
    }
}

// ─── Standalone helpers (no widget needed) ───────────────────────────────

/// Preview the layout for a hub at (x, y) with `count` spokes, using the
/// default geometry. Returns the `RadialLayout` as JSON.
#[wasm_bindgen]
pub fn layout_json(x: f64, y: f64, count: i32) -> String {
    let layout = compute_layout(
        Point::new(x, y),
        clamp_spoke_count(i64::from(count)),
        &LayoutConfig::default(),
    );
    match serde_json::to_string(&layout) {
        Ok(json) => json,
        Err(e) => format!(r#"{{"error":"Serialization error: {e}"}}"#),
    }
}
