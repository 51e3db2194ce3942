pub mod runner;

pub use runner::SimRunner;

use std::cell::RefCell;

use billiards_core::{AssetManifest, InputEvent};
use wasm_bindgen::prelude::*;

thread_local! {
    static RUNNER: RefCell<Option<SimRunner>> = RefCell::new(None);
}

fn with_runner<R>(f: impl FnOnce(&mut SimRunner) -> R) -> R {
    RUNNER.with(|cell| {
        let mut borrow = cell.borrow_mut();
        let runner = borrow
            .as_mut()
            .expect("Simulation not initialized. Call game_init() first.");
        f(runner)
    })
}

/// Validate the asset manifest, rack the table and install the runner.
/// Start-up errors are logged once and returned to the host.
#[wasm_bindgen]
pub fn game_init(manifest_json: &str) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let runner = AssetManifest::from_json(manifest_json)
        .and_then(SimRunner::new)
        .map_err(|e| {
            log::error!("billiards: start-up failed: {}", e);
            JsValue::from_str(&e.to_string())
        })?;

    RUNNER.with(|cell| {
        *cell.borrow_mut() = Some(runner);
    });
    log::info!("billiards: initialized");
    Ok(())
}

#[wasm_bindgen]
pub fn game_tick(dt: f32) {
    with_runner(|r| r.tick(dt));
}

#[wasm_bindgen]
pub fn game_pointer_down(x: f32, y: f32) {
    with_runner(|r| r.push_input(InputEvent::PointerDown { x, y }));
}

#[wasm_bindgen]
pub fn game_pointer_up(x: f32, y: f32) {
    with_runner(|r| r.push_input(InputEvent::PointerUp { x, y }));
}

#[wasm_bindgen]
pub fn game_pointer_move(x: f32, y: f32) {
    with_runner(|r| r.push_input(InputEvent::PointerMove { x, y }));
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn get_instances_ptr() -> *const f32 {
    with_runner(|r| r.instances_ptr())
}

#[wasm_bindgen]
pub fn get_instance_count() -> u32 {
    with_runner(|r| r.instance_count())
}

#[wasm_bindgen]
pub fn get_game_events_ptr() -> *const f32 {
    with_runner(|r| r.game_events_ptr())
}

#[wasm_bindgen]
pub fn get_game_events_len() -> u32 {
    with_runner(|r| r.game_events_len())
}

#[wasm_bindgen]
pub fn get_world_width() -> f32 {
    with_runner(|r| r.world_width())
}

#[wasm_bindgen]
pub fn get_world_height() -> f32 {
    with_runner(|r| r.world_height())
}

/// Labels, power bar, tray and banner for the current frame as JSON.
#[wasm_bindgen]
pub fn game_frame_json() -> String {
    with_runner(|r| r.frame_json())
}

#[wasm_bindgen]
pub fn game_table_image() -> String {
    with_runner(|r| r.table_image().to_string())
}

/// Image path for a ball's presentation number, if the manifest has one.
#[wasm_bindgen]
pub fn game_ball_image(number: u8) -> Option<String> {
    with_runner(|r| r.ball_image(number).map(str::to_string))
}
