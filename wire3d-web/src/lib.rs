//! Wire3D Web - canvas wireframe viewer compiled to WASM
//!
//! The page owns the timer and pointer events and forwards them here; each
//! `render` paints the current frame into a 2D canvas context.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};
use wire3d_core::{
    animation::DEFAULT_STEP,
    view::{fit_scale, frame_transform},
    LineSink, Mesh, Orientation, Painter, Viewport,
};

/// Stroke style for a grey level.
fn grey_style(level: u8) -> String {
    format!("rgb({level},{level},{level})")
}

/// Line sink drawing straight into a canvas context.
struct CanvasSink<'a> {
    context: &'a CanvasRenderingContext2d,
}

impl LineSink for CanvasSink<'_> {
    fn select_grey(&mut self, level: u8) {
        self.context.set_stroke_style_str(&grey_style(level));
    }

    fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        // Half-pixel offsets keep one-pixel lines crisp.
        self.context.begin_path();
        self.context.move_to(x1 as f64 + 0.5, y1 as f64 + 0.5);
        self.context.line_to(x2 as f64 + 0.5, y2 as f64 + 0.5);
        self.context.stroke();
    }
}

#[wasm_bindgen]
pub struct WebViewer {
    mesh: Mesh,
    orientation: Orientation,
    painter: Painter,
    context: CanvasRenderingContext2d,
    viewport: Viewport,
    scale: f64,
    animate: bool,
    drag_from: Option<(f64, f64)>,
}

#[wasm_bindgen]
impl WebViewer {
    /// Load `obj_source` and bind to the canvas with id `canvas_id`.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str, obj_source: &str, scale: f64) -> Result<WebViewer, JsValue> {
        let mesh = Mesh::from_reader(obj_source.as_bytes())
            .map_err(|e| JsValue::from_str(&format!("Error in model: {e}")))?;

        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| JsValue::from_str("no document available"))?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("no element with id `{canvas_id}`")))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| JsValue::from_str(&format!("`{canvas_id}` is not a canvas")))?;
        let context = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        Ok(WebViewer {
            mesh,
            orientation: Orientation::default(),
            painter: Painter::new(),
            context,
            viewport: Viewport::new(canvas.width() as f64, canvas.height() as f64),
            scale,
            animate: true,
            drag_from: None,
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.mesh.vertex_count()
    }

    pub fn edge_count(&self) -> usize {
        self.mesh.edge_count()
    }

    /// Advance the animation by one step. Returns whether anything moved.
    pub fn tick(&mut self) -> bool {
        if self.animate {
            let (dx, dy, dz) = DEFAULT_STEP;
            self.orientation.spin(dx, dy, dz);
        }
        self.animate
    }

    pub fn toggle_animation(&mut self) -> bool {
        self.animate = !self.animate;
        self.animate
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport.width = width;
        self.viewport.height = height;
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) {
        self.drag_from = Some((x, y));
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        if let Some(from) = self.drag_from.replace((x, y)) {
            self.orientation.drag(from, (x, y), &self.viewport);
        }
    }

    pub fn pointer_up(&mut self) {
        self.drag_from = None;
    }

    /// Paint the current frame.
    pub fn render(&mut self) {
        self.context
            .clear_rect(0.0, 0.0, self.viewport.width, self.viewport.height);
        let Some(bounds) = self.mesh.bounds().copied() else {
            return;
        };

        let fit = fit_scale(&bounds, &self.viewport, self.scale);
        let transform = frame_transform(&bounds, &self.orientation, &self.viewport, fit);
        self.mesh.set_transformed(false);
        self.mesh.transform(&transform);

        let mut sink = CanvasSink {
            context: &self.context,
        };
        self.painter.paint(&mut sink, &self.mesh);
    }
}
