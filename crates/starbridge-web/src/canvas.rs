use glam::Vec2;
use starbridge::{Canvas, Rgba};
use web_sys::CanvasRenderingContext2d;

/// `Canvas` on top of a 2D rendering context.
///
/// Transform calls return `Result` in web-sys; they only fail on non-finite
/// input, so failures are logged at debug level and the frame continues.
pub struct Canvas2d {
    ctx: CanvasRenderingContext2d,
    size: Vec2,
}

impl Canvas2d {
    pub fn new(ctx: CanvasRenderingContext2d, size: Vec2) -> Self {
        Self { ctx, size }
    }

    pub fn set_size(&mut self, size: Vec2) {
        self.size = size;
    }

    fn trace_path(&self, points: &[Vec2]) {
        self.ctx.begin_path();
        if let Some((first, rest)) = points.split_first() {
            self.ctx.move_to(first.x as f64, first.y as f64);
            for p in rest {
                self.ctx.line_to(p.x as f64, p.y as f64);
            }
        }
    }
}

fn check(op: &str, result: Result<(), wasm_bindgen::JsValue>) {
    if let Err(e) = result {
        log::debug!("canvas {op} failed: {e:?}");
    }
}

impl Canvas for Canvas2d {
    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn translate(&mut self, offset: Vec2) {
        check("translate", self.ctx.translate(offset.x as f64, offset.y as f64));
    }

    fn rotate(&mut self, angle: f32) {
        check("rotate", self.ctx.rotate(angle as f64));
    }

    fn scale(&mut self, factor: Vec2) {
        check("scale", self.ctx.scale(factor.x as f64, factor.y as f64));
    }

    fn clear(&mut self, color: Rgba) {
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill_rect(0.0, 0.0, self.size.x as f64, self.size.y as f64);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.begin_path();
        check(
            "arc",
            self.ctx.arc(
                center.x as f64,
                center.y as f64,
                radius.max(0.0) as f64,
                0.0,
                std::f64::consts::TAU,
            ),
        );
        self.ctx.fill();
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Rgba) {
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx
            .fill_rect(origin.x as f64, origin.y as f64, size.x as f64, size.y as f64);
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Rgba) {
        if points.len() < 3 {
            return;
        }
        self.ctx.set_fill_style_str(&color.to_css());
        self.trace_path(points);
        self.ctx.close_path();
        self.ctx.fill();
    }

    fn stroke_polyline(&mut self, points: &[Vec2], width: f32, color: Rgba) {
        if points.len() < 2 {
            return;
        }
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.set_line_width(width as f64);
        self.ctx.set_line_cap("round");
        self.ctx.set_line_join("round");
        self.trace_path(points);
        self.ctx.stroke();
    }

    fn fill_text(&mut self, text: &str, origin: Vec2, size: f32, color: Rgba) {
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.set_font(&format!("{size}px sans-serif"));
        check("fill_text", self.ctx.fill_text(text, origin.x as f64, origin.y as f64));
    }
}
