//! # scrollreel-wasm
//!
//! WebAssembly module for the scrollreel engine.
//! One player per page: the host feeds it frame bytes, scroll lifecycle
//! callbacks and display-refresh ticks, and copies [`pixels`] to its canvas.

mod player;

pub use player::{ProgressReport, WasmPlayer};

use scrollreel_playback::ScrollEvent;
use wasm_bindgen::prelude::*;

thread_local! {
    /// Global player instance for the main WASM thread.
    static PLAYER: std::cell::RefCell<WasmPlayer> =
        std::cell::RefCell::new(WasmPlayer::new(Default::default()));
}

fn with_player<F, R>(f: F) -> R
where
    F: FnOnce(&mut WasmPlayer) -> R,
{
    PLAYER.with(|p| f(&mut *p.borrow_mut()))
}

fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn progress_json(player: &WasmPlayer) -> Result<String, JsValue> {
    serde_json::to_string(&ProgressReport::from(player.load_progress())).map_err(to_js_error)
}

/// Reset the player for a sequence of `frame_count` stills drawn onto a
/// `width` x `height` surface (device pixels).
#[wasm_bindgen]
pub fn init(frame_count: u32, width: u32, height: u32) {
    with_player(|p| *p = WasmPlayer::with_frames(frame_count as usize, width, height));
}

/// Relative URL the host should fetch for frame `index`.
#[wasm_bindgen]
pub fn frame_source(index: u32) -> Option<String> {
    with_player(|p| p.frame_source(index as usize).map(str::to_string))
}

/// Hand over the fetched bytes of frame `index`.
///
/// Returns the load progress as JSON:
/// `{ completed, total, percent, label, complete }`.
#[wasm_bindgen]
pub fn load_frame(index: u32, data: &[u8]) -> Result<String, JsValue> {
    with_player(|p| {
        p.load_frame(index as usize, data).map_err(to_js_error)?;
        progress_json(p)
    })
}

/// Report that frame `index` could not be fetched. Counts toward completion.
#[wasm_bindgen]
pub fn fail_frame(index: u32, reason: &str) -> Result<String, JsValue> {
    with_player(|p| {
        p.fail_frame(index as usize, reason).map_err(to_js_error)?;
        progress_json(p)
    })
}

#[wasm_bindgen]
pub fn load_progress() -> Result<String, JsValue> {
    with_player(|p| progress_json(p))
}

#[wasm_bindgen]
pub fn scroll_update(progress: f64, now_ms: f64) {
    with_player(|p| p.scroll(ScrollEvent::Update(progress), now_ms));
}

#[wasm_bindgen]
pub fn scroll_enter(progress: f64, now_ms: f64) {
    with_player(|p| p.scroll(ScrollEvent::Enter(progress), now_ms));
}

#[wasm_bindgen]
pub fn scroll_enter_back(progress: f64, now_ms: f64) {
    with_player(|p| p.scroll(ScrollEvent::EnterBack(progress), now_ms));
}

#[wasm_bindgen]
pub fn scroll_leave(_progress: f64, now_ms: f64) {
    with_player(|p| p.scroll(ScrollEvent::Leave, now_ms));
}

#[wasm_bindgen]
pub fn scroll_complete(_progress: f64, now_ms: f64) {
    with_player(|p| p.scroll(ScrollEvent::Complete, now_ms));
}

/// Returns true when a re-render was scheduled.
#[wasm_bindgen]
pub fn resize(width: u32, height: u32) -> bool {
    with_player(|p| p.resize(width, height))
}

/// Call from `requestAnimationFrame`. Returns true when the canvas changed
/// and [`pixels`] should be copied again.
#[wasm_bindgen]
pub fn animation_frame(now_ms: f64) -> bool {
    with_player(|p| p.animation_frame(now_ms).changed_canvas())
}

/// RGBA bytes of the surface, `width * height * 4` long.
#[wasm_bindgen]
pub fn pixels() -> Vec<u8> {
    with_player(|p| p.pixels().data.clone())
}

#[wasm_bindgen]
pub fn surface_width() -> u32 {
    with_player(|p| p.surface_size().width)
}

#[wasm_bindgen]
pub fn surface_height() -> u32 {
    with_player(|p| p.surface_size().height)
}

#[wasm_bindgen]
pub fn current_frame() -> u32 {
    with_player(|p| p.current_frame().get() as u32)
}

/// `{ opacity, offset_y }` for the hero overlay at `progress`.
#[wasm_bindgen]
pub fn hero_style_json(progress: f64) -> Result<String, JsValue> {
    with_player(|p| serde_json::to_string(&p.hero_style(progress)).map_err(to_js_error))
}

/// Get the version string.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
