//! Page-facing exports.
//!
//! The page calls `game_init` once with the canvas id, forwards
//! `requestAnimationFrame` timestamps to `game_tick`, and pushes pointer, key
//! and hand-tracking events as they arrive. Events are queued and consumed at
//! the start of the next processed frame.

pub mod audio;
pub mod canvas;
pub mod runner;

use std::cell::RefCell;

use glam::Vec2;
use starbridge::{InputEvent, SimConfig};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::canvas::Canvas2d;
use crate::runner::Runner;

thread_local! {
    static RUNNER: RefCell<Option<Runner>> = const { RefCell::new(None) };
    static CONFIG: RefCell<Option<SimConfig>> = const { RefCell::new(None) };
}

/// Run `f` against the runner. `None` (and a warning) before `game_init`.
fn with_runner<R>(f: impl FnOnce(&mut Runner) -> R) -> Option<R> {
    RUNNER.with(|cell| {
        let mut borrow = cell.borrow_mut();
        match borrow.as_mut() {
            Some(runner) => Some(f(runner)),
            None => {
                log::warn!("starbridge not initialized; call game_init() first");
                None
            }
        }
    })
}

fn context_2d(canvas_id: &str, size: Vec2) -> Result<Canvas2d, JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let canvas = document
        .get_element_by_id(canvas_id)
        .ok_or_else(|| JsValue::from_str(&format!("no element with id {canvas_id:?}")))?
        .dyn_into::<web_sys::HtmlCanvasElement>()?;
    canvas.set_width(size.x as u32);
    canvas.set_height(size.y as u32);
    let ctx = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
        .dyn_into::<web_sys::CanvasRenderingContext2d>()?;
    Ok(Canvas2d::new(ctx, size))
}

#[wasm_bindgen]
pub fn game_init(canvas_id: &str) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let config = CONFIG.with(|cell| cell.borrow().clone()).unwrap_or_default();
    let canvas = context_2d(canvas_id, Vec2::new(config.width, config.height))?;
    let runner = Runner::new(config, canvas);

    RUNNER.with(|cell| {
        *cell.borrow_mut() = Some(runner);
    });
    log::info!("starbridge: initialized on #{canvas_id}");
    Ok(())
}

/// Apply JSON overrides to the defaults. Keeps the current settings when the
/// JSON does not parse. Rebuilds the world if it is already running.
#[wasm_bindgen]
pub fn game_load_config(json: &str) {
    let config = match SimConfig::from_json(json) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("ignoring invalid config: {e}");
            return;
        }
    };
    CONFIG.with(|cell| *cell.borrow_mut() = Some(config.clone()));
    RUNNER.with(|cell| {
        if let Some(runner) = cell.borrow_mut().as_mut() {
            runner.reload(config);
        }
    });
}

#[wasm_bindgen]
pub fn game_tick(timestamp_ms: f64) {
    with_runner(|r| r.tick(timestamp_ms));
}

#[wasm_bindgen]
pub fn game_pointer_down(x: f32, y: f32) {
    with_runner(|r| r.push_input(InputEvent::PointerDown { x, y }));
}

#[wasm_bindgen]
pub fn game_key_down(key_code: u32) {
    with_runner(|r| r.push_input(InputEvent::KeyDown { key_code }));
}

/// Flat `[x0, y0, x1, y1, ...]` keypoints of the first tracked hand.
#[wasm_bindgen]
pub fn game_hand_keypoints(keypoints: &[f32]) {
    match InputEvent::from_keypoints(keypoints) {
        Some(event) => {
            with_runner(|r| r.push_input(event));
        }
        None => log::debug!("ignoring {} hand keypoint values", keypoints.len()),
    }
}

#[wasm_bindgen]
pub fn game_hand_lost() {
    with_runner(|r| r.push_input(InputEvent::HandLost));
}

#[wasm_bindgen]
pub fn game_resize(width: f32, height: f32) {
    with_runner(|r| r.resize(width, height));
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn get_star_count() -> u32 {
    with_runner(|r| r.world().stars().len() as u32).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_particle_count() -> u32 {
    with_runner(|r| r.world().particles().len() as u32).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_wave_count() -> u32 {
    with_runner(|r| r.world().field().waves().len() as u32).unwrap_or(0)
}

#[wasm_bindgen]
pub fn is_tossing() -> bool {
    with_runner(|r| r.world().is_tossing()).unwrap_or(false)
}

#[wasm_bindgen]
pub fn is_audio_enabled() -> bool {
    with_runner(|r| r.world().audio().is_enabled()).unwrap_or(false)
}
