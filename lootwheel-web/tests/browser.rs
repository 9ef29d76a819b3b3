#![cfg(target_arch = "wasm32")]

use lootwheel_core::constants::{STATE_STORAGE_KEY, WEIGHTS_STORAGE_KEY};
use lootwheel_core::{Catalog, Category, ConfigStorage, ConfigStore, TickScheduler};
use lootwheel_web::LootWheel;
use lootwheel_web::frame::AnimationFrameScheduler;
use lootwheel_web::storage::LocalStorageBackend;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

fn fresh_backend() -> LocalStorageBackend {
    let backend = LocalStorageBackend::open().expect("localStorage");
    backend.clear(STATE_STORAGE_KEY);
    backend.clear(WEIGHTS_STORAGE_KEY);
    backend
}

#[wasm_bindgen_test]
fn backend_round_trips_raw_records() {
    let backend = fresh_backend();
    assert_eq!(backend.read(STATE_STORAGE_KEY).expect("read"), None);
    backend.write(STATE_STORAGE_KEY, "{}").expect("write");
    assert_eq!(
        backend.read(STATE_STORAGE_KEY).expect("read").as_deref(),
        Some("{}")
    );
    backend.clear(STATE_STORAGE_KEY);
}

#[wasm_bindgen_test]
fn store_edits_survive_a_reload() {
    let backend = fresh_backend();
    let mut store = ConfigStore::load(backend.clone(), Catalog::builtin());
    store
        .set_candidate_enabled(Category::FSkills, "F1", false)
        .expect("toggle saves");
    store
        .set_weight(Category::Heroes, "迦南", 55.55)
        .expect("weight saves");

    let reloaded = ConfigStore::load(backend, Catalog::builtin());
    assert_eq!(reloaded.eligible(Category::FSkills), vec!["F2".to_string()]);
    assert!((reloaded.weight(Category::Heroes, "迦南") - 55.6).abs() < 1e-9);
}

#[wasm_bindgen_test]
fn frame_clock_is_running() {
    assert!(AnimationFrameScheduler.now() > 0.0);
}

#[wasm_bindgen_test]
fn wheel_rejects_unknown_categories_and_starts_spins() {
    fresh_backend();
    let mut wheel = LootWheel::new().expect("wheel builds");
    let bad = serde_wasm_bindgen::to_value(&vec!["boots"]).expect("array");
    assert!(wheel.spin(bad, false).is_err());

    let outcome = wheel.spin_all().expect("spin starts");
    let status = js_sys::Reflect::get(&outcome, &JsValue::from_str("status")).expect("status");
    assert_eq!(status.as_string().as_deref(), Some("started"));
    assert!(wheel.is_spinning());
}
