/// Pixel Vigil - Chrome Extension for watching Tracks beacons
/// Built with Rust + WASM

mod background;
pub mod error;
pub mod event;
pub mod host;
pub mod message;
pub mod pixel;
pub mod screenshot;
pub mod storage;
pub mod store;

pub use background::{
    init_background, is_paused, on_request_completed, on_runtime_message, toggle_paused,
};

use wasm_bindgen::prelude::*;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}
