//! Drawing backend contract.
//!
//! The core never rasterises anything itself. `World::render` issues primitive
//! shape calls against a `Canvas`; the web crate implements it on top of a
//! `CanvasRenderingContext2d`, and tests use [`RecordingCanvas`].

use glam::Vec2;

use super::color::Rgba;

/// Primitive 2D drawing surface with a transform stack.
pub trait Canvas {
    /// Push the current transform.
    fn save(&mut self);
    /// Pop the transform pushed by the matching `save`.
    fn restore(&mut self);
    fn translate(&mut self, offset: Vec2);
    fn rotate(&mut self, angle: f32);
    fn scale(&mut self, factor: Vec2);

    /// Fill the whole surface.
    fn clear(&mut self, color: Rgba);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);
    /// Fill an axis-aligned rectangle given its top-left corner.
    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Rgba);
    /// Fill a closed polygon.
    fn fill_polygon(&mut self, points: &[Vec2], color: Rgba);
    /// Stroke an open polyline.
    fn stroke_polyline(&mut self, points: &[Vec2], width: f32, color: Rgba);
    fn fill_text(&mut self, text: &str, origin: Vec2, size: f32, color: Rgba);
}

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Save,
    Restore,
    Translate(Vec2),
    Rotate(f32),
    Scale(Vec2),
    Clear(Rgba),
    Circle { center: Vec2, radius: f32, color: Rgba },
    Rect { origin: Vec2, size: Vec2, color: Rgba },
    Polygon { points: Vec<Vec2>, color: Rgba },
    Polyline { points: Vec<Vec2>, width: f32, color: Rgba },
    Text { text: String, origin: Vec2, size: f32, color: Rgba },
}

/// Canvas that records every call, for headless inspection.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    pub calls: Vec<DrawCall>,
    depth: usize,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current `save` nesting depth. Balanced rendering leaves this at 0.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn count(&self, pred: impl Fn(&DrawCall) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }
}

impl Canvas for RecordingCanvas {
    fn save(&mut self) {
        self.depth += 1;
        self.calls.push(DrawCall::Save);
    }

    fn restore(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.calls.push(DrawCall::Restore);
    }

    fn translate(&mut self, offset: Vec2) {
        self.calls.push(DrawCall::Translate(offset));
    }

    fn rotate(&mut self, angle: f32) {
        self.calls.push(DrawCall::Rotate(angle));
    }

    fn scale(&mut self, factor: Vec2) {
        self.calls.push(DrawCall::Scale(factor));
    }

    fn clear(&mut self, color: Rgba) {
        self.calls.push(DrawCall::Clear(color));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.calls.push(DrawCall::Circle { center, radius, color });
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Rgba) {
        self.calls.push(DrawCall::Rect { origin, size, color });
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Rgba) {
        self.calls.push(DrawCall::Polygon { points: points.to_vec(), color });
    }

    fn stroke_polyline(&mut self, points: &[Vec2], width: f32, color: Rgba) {
        self.calls.push(DrawCall::Polyline { points: points.to_vec(), width, color });
    }

    fn fill_text(&mut self, text: &str, origin: Vec2, size: f32, color: Rgba) {
        self.calls.push(DrawCall::Text {
            text: text.to_string(),
            origin,
            size,
            color,
        });
    }
}
