use glam::Vec2;
use starbridge::{AudioBackend, InputEvent, SimConfig, World};

use crate::audio::WebAudio;
use crate::canvas::Canvas2d;

/// Owns the world and the page-side backends it draws and plays through.
///
/// Lives in a `thread_local!` in `lib.rs`; the exported free functions reach
/// it through `with_runner`, since wasm-bindgen cannot export it directly.
pub struct Runner {
    world: World,
    canvas: Canvas2d,
}

/// Open a Web Audio context, or run silent when the browser refuses.
fn open_audio() -> Option<Box<dyn AudioBackend>> {
    match WebAudio::new() {
        Ok(audio) => Some(Box::new(audio)),
        Err(e) => {
            log::warn!("Web Audio unavailable, running silent: {e}");
            None
        }
    }
}

fn seed() -> u64 {
    (js_sys::Math::random() * u64::MAX as f64) as u64
}

impl Runner {
    pub fn new(config: SimConfig, canvas: Canvas2d) -> Self {
        Self {
            world: World::new(config, open_audio(), seed()),
            canvas,
        }
    }

    /// Replace the world with one built from `config`.
    pub fn reload(&mut self, config: SimConfig) {
        self.canvas.set_size(Vec2::new(config.width, config.height));
        self.world = World::new(config, open_audio(), seed());
    }

    pub fn push_input(&mut self, event: InputEvent) {
        self.world.push_input(event);
    }

    /// Animation callback. Draws only on processed ticks.
    pub fn tick(&mut self, timestamp_ms: f64) {
        if self.world.tick(timestamp_ms) {
            self.world.render(&mut self.canvas);
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.canvas.set_size(Vec2::new(width, height));
        self.world.resize(width, height);
    }

    pub fn world(&self) -> &World {
        &self.world
    }
}
