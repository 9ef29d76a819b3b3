#![forbid(unsafe_code)]
//! Browser bindings for the loot wheel.
//!
//! Persists configuration in `localStorage`, ticks reels on
//! `requestAnimationFrame`, and exposes the [`LootWheel`] class to the page.
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

pub mod dom;
pub mod frame;
pub mod storage;
pub mod wheel;

pub use wheel::LootWheel;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    dom::init_logging(log::LevelFilter::Info);
}
