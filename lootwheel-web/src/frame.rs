//! `requestAnimationFrame` tick source.
use crate::dom;
use lootwheel_core::{TickCallback, TickScheduler};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;

/// Ticks on browser animation frames, timed by `performance.now()`.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnimationFrameScheduler;

impl TickScheduler for AnimationFrameScheduler {
    fn now(&self) -> f64 {
        dom::window()
            .and_then(|win| win.performance())
            .map_or(0.0, |perf| perf.now())
    }

    fn request_tick(&self, callback: TickCallback) {
        let Some(win) = dom::window() else {
            log::error!("no window; animation frame dropped");
            return;
        };
        let frame = Closure::once_into_js(move |timestamp: f64| callback(timestamp));
        if let Err(err) = win.request_animation_frame(frame.unchecked_ref()) {
            log::error!(
                "requestAnimationFrame failed: {}",
                dom::js_error_message(&err)
            );
        }
    }
}
