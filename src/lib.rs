/// Urly Shortener - browser extension for the urly.fi link shortener
/// Built with Rust + WASM + Yew

mod background;
pub mod controller;
pub mod endpoint;
pub mod events;
pub mod interception;
pub mod menu;
pub mod preferences;
pub mod shorten;
pub mod storage;
pub mod ui;

use wasm_bindgen::prelude::*;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Start the background page runtime
#[wasm_bindgen]
pub fn start_background() -> Result<(), JsValue> {
    background::start().map_err(|e| JsValue::from_str(&e.to_string()))
}

// Start the Yew app for the options page
#[wasm_bindgen]
pub fn start_options() {
    yew::Renderer::<ui::options::OptionsPage>::new().render();
}
