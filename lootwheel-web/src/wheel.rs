//! The `LootWheel` class exported to the page.
use crate::frame::AnimationFrameScheduler;
use crate::storage::{LocalStorageBackend, WebStorageError};
use lootwheel_core::{
    Catalog, Category, ConfigError, ConfigStore, ReelTiming, SpinError, SpinEvent, SpinListener,
    WheelSession, probabilities,
};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;
use thiserror::Error;
use wasm_bindgen::prelude::*;

#[derive(Debug, Error)]
pub enum WheelError {
    #[error(transparent)]
    Storage(#[from] WebStorageError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Spin(#[from] SpinError),
    #[error("unknown category {0:?}")]
    UnknownCategory(String),
    #[error("invalid argument: {0}")]
    Argument(String),
    #[error("seed must be a non-negative integer, got {0}")]
    InvalidSeed(f64),
}

impl From<WheelError> for JsValue {
    fn from(err: WheelError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}

/// Resolve category names passed from the page, keeping request order.
///
/// # Errors
/// Returns [`WheelError::UnknownCategory`] for a name that is neither a
/// record key nor a spinner id.
pub fn parse_categories(names: &[String]) -> Result<Vec<Category>, WheelError> {
    names
        .iter()
        .map(|name| Category::parse(name).ok_or_else(|| WheelError::UnknownCategory(name.clone())))
        .collect()
}

/// Convert a page-supplied seed into the integer seed.
///
/// # Errors
/// Returns [`WheelError::InvalidSeed`] for negative, fractional or
/// non-finite values.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn seed_from_js(value: Option<f64>) -> Result<Option<u64>, WheelError> {
    match value {
        None => Ok(None),
        Some(raw) if raw.is_finite() && raw >= 0.0 && raw.fract() == 0.0 => Ok(Some(raw as u64)),
        Some(raw) => Err(WheelError::InvalidSeed(raw)),
    }
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|err| WheelError::Argument(err.to_string()).into())
}

fn category(name: &str) -> Result<Category, WheelError> {
    Category::parse(name).ok_or_else(|| WheelError::UnknownCategory(name.to_string()))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn entropy_seed() -> u64 {
    let high = (js_sys::Math::random() * f64::from(u32::MAX)) as u64;
    let low = (js_sys::Math::random() * f64::from(u32::MAX)) as u64;
    (high << 32) | low
}

type Session = WheelSession<LocalStorageBackend, AnimationFrameScheduler>;

/// A loot wheel bound to `localStorage` and animation frames.
#[wasm_bindgen]
pub struct LootWheel {
    session: Session,
    listener: Rc<RefCell<Option<js_sys::Function>>>,
}

#[wasm_bindgen]
impl LootWheel {
    /// Load the saved configuration and build an idle wheel.
    ///
    /// # Errors
    /// Returns an error if `localStorage` cannot be opened.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<Self, JsValue> {
        let storage = LocalStorageBackend::open().map_err(WheelError::from)?;
        let store = ConfigStore::load(storage, Catalog::builtin());
        let listener: Rc<RefCell<Option<js_sys::Function>>> = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&listener);
        let forward: SpinListener = Rc::new(move |event: &SpinEvent| {
            let Some(callback) = sink.borrow().clone() else {
                return;
            };
            match to_js(event) {
                Ok(value) => {
                    if let Err(err) = callback.call1(&JsValue::NULL, &value) {
                        log::error!("event listener threw: {}", crate::dom::js_error_message(&err));
                    }
                }
                Err(err) => log::error!(
                    "could not convert spin event: {}",
                    crate::dom::js_error_message(&err)
                ),
            }
        });
        let session = WheelSession::new(
            store,
            Rc::new(AnimationFrameScheduler),
            ReelTiming::default(),
            SmallRng::seed_from_u64(entropy_seed()),
            forward,
        );
        log::info!("loot wheel ready: {}", session.store().title());
        Ok(Self { session, listener })
    }

    /// Register the callback receiving reel progress, completion and
    /// nothing-to-spin events. Pass `undefined` to detach.
    #[wasm_bindgen(js_name = onEvent)]
    pub fn on_event(&self, callback: Option<js_sys::Function>) {
        *self.listener.borrow_mut() = callback;
    }

    /// Spin the named categories; returns the spin outcome.
    ///
    /// # Errors
    /// Returns an error for unknown category names.
    pub fn spin(&mut self, categories: JsValue, primary: bool) -> Result<JsValue, JsValue> {
        let names: Vec<String> = serde_wasm_bindgen::from_value(categories)
            .map_err(|err| WheelError::Argument(err.to_string()))?;
        let categories = parse_categories(&names)?;
        let outcome = self
            .session
            .spin(&categories, primary)
            .map_err(WheelError::from)?;
        to_js(&outcome)
    }

    /// Spin every enabled category.
    ///
    /// # Errors
    /// Returns an error only if a drawn target cannot be placed on its reel.
    #[wasm_bindgen(js_name = spinAll)]
    pub fn spin_all(&mut self) -> Result<JsValue, JsValue> {
        let outcome = self.session.spin_all().map_err(WheelError::from)?;
        to_js(&outcome)
    }

    #[wasm_bindgen(js_name = isSpinning)]
    #[must_use]
    pub fn is_spinning(&self) -> bool {
        self.session.is_spinning()
    }

    #[must_use]
    pub fn title(&self) -> String {
        self.session.store().title().to_string()
    }

    /// # Errors
    /// Returns an error for a blank title or a failed save.
    #[wasm_bindgen(js_name = setTitle)]
    pub fn set_title(&mut self, title: &str) -> Result<(), JsValue> {
        Ok(self
            .session
            .store_mut()
            .set_title(title)
            .map_err(WheelError::from)?)
    }

    /// # Errors
    /// Returns an error if the state cannot be saved.
    #[wasm_bindgen(js_name = resetTitle)]
    pub fn reset_title(&mut self) -> Result<(), JsValue> {
        Ok(self
            .session
            .store_mut()
            .reset_title()
            .map_err(WheelError::from)?)
    }

    /// # Errors
    /// Returns an error for an unknown category or a failed save.
    #[wasm_bindgen(js_name = setCategoryEnabled)]
    pub fn set_category_enabled(
        &mut self,
        category_name: &str,
        enabled: bool,
    ) -> Result<(), JsValue> {
        let category = category(category_name)?;
        Ok(self
            .session
            .store_mut()
            .set_category_enabled(category, enabled)
            .map_err(WheelError::from)?)
    }

    /// # Errors
    /// Returns an error for an unknown category or candidate, or a failed save.
    #[wasm_bindgen(js_name = setCandidateEnabled)]
    pub fn set_candidate_enabled(
        &mut self,
        category_name: &str,
        candidate: &str,
        enabled: bool,
    ) -> Result<(), JsValue> {
        let category = category(category_name)?;
        Ok(self
            .session
            .store_mut()
            .set_candidate_enabled(category, candidate, enabled)
            .map_err(WheelError::from)?)
    }

    /// Set a weight; returns the stored (rounded) value.
    ///
    /// # Errors
    /// Returns an error for an unknown candidate, an out-of-range value or a
    /// failed save.
    #[wasm_bindgen(js_name = setWeight)]
    pub fn set_weight(
        &mut self,
        category_name: &str,
        candidate: &str,
        value: f64,
    ) -> Result<f64, JsValue> {
        let category = category(category_name)?;
        Ok(self
            .session
            .store_mut()
            .set_weight(category, candidate, value)
            .map_err(WheelError::from)?)
    }

    /// # Errors
    /// Returns an error if the weights cannot be saved.
    #[wasm_bindgen(js_name = resetWeights)]
    pub fn reset_weights(&mut self) -> Result<(), JsValue> {
        Ok(self
            .session
            .store_mut()
            .reset_weights()
            .map_err(WheelError::from)?)
    }

    /// # Errors
    /// Returns an error for a non-positive multiplier or a failed save.
    #[wasm_bindgen(js_name = setBaseMultiplier)]
    pub fn set_base_multiplier(&mut self, multiplier: f64) -> Result<(), JsValue> {
        Ok(self
            .session
            .store_mut()
            .set_base_multiplier(multiplier)
            .map_err(WheelError::from)?)
    }

    /// # Errors
    /// Returns an error if the state cannot be saved.
    #[wasm_bindgen(js_name = setQuadraticCorrection)]
    pub fn set_quadratic_correction(&mut self, enabled: bool) -> Result<(), JsValue> {
        Ok(self
            .session
            .store_mut()
            .set_quadratic_correction(enabled)
            .map_err(WheelError::from)?)
    }

    /// Set or clear (`undefined`) the selection seed.
    ///
    /// # Errors
    /// Returns an error for a non-integer seed or a failed save.
    #[wasm_bindgen(js_name = setSeed)]
    pub fn set_seed(&mut self, seed: Option<f64>) -> Result<(), JsValue> {
        let seed = seed_from_js(seed)?;
        Ok(self
            .session
            .store_mut()
            .set_seed(seed)
            .map_err(WheelError::from)?)
    }

    /// Restore the factory general state. Weights are kept.
    ///
    /// # Errors
    /// Returns an error if the state cannot be saved.
    pub fn reset(&mut self) -> Result<(), JsValue> {
        Ok(self.session.store_mut().reset().map_err(WheelError::from)?)
    }

    /// The persisted general state record.
    ///
    /// # Errors
    /// Returns an error if the state cannot be converted.
    pub fn state(&self) -> Result<JsValue, JsValue> {
        to_js(self.session.store().state())
    }

    /// The persisted weight table.
    ///
    /// # Errors
    /// Returns an error if the weights cannot be converted.
    pub fn weights(&self) -> Result<JsValue, JsValue> {
        to_js(self.session.store().weights())
    }

    /// # Errors
    /// Returns an error if the catalog cannot be converted.
    pub fn catalog(&self) -> Result<JsValue, JsValue> {
        to_js(self.session.store().catalog())
    }

    /// Enabled candidates of a category, in catalog order.
    ///
    /// # Errors
    /// Returns an error for an unknown category.
    pub fn eligible(&self, category_name: &str) -> Result<JsValue, JsValue> {
        let category = category(category_name)?;
        to_js(&self.session.store().eligible(category))
    }

    /// Current selection probability of each enabled candidate.
    ///
    /// # Errors
    /// Returns an error for an unknown category.
    pub fn probabilities(&self, category_name: &str) -> Result<JsValue, JsValue> {
        let category = category(category_name)?;
        let store = self.session.store();
        let eligible = store.eligible(category);
        let shares = probabilities(
            &eligible,
            store.category_weights(category),
            store.randomness(),
        );
        let rows: Vec<(String, f64)> = eligible.into_iter().zip(shares).collect();
        to_js(&rows)
    }

    /// Result board rows for the enabled categories.
    ///
    /// # Errors
    /// Returns an error if the board cannot be converted.
    pub fn board(&self) -> Result<JsValue, JsValue> {
        to_js(&self.session.board())
    }

    /// Per-reel phase, offset and transform for rendering.
    ///
    /// # Errors
    /// Returns an error if the snapshots cannot be converted.
    pub fn snapshots(&self) -> Result<JsValue, JsValue> {
        to_js(&self.session.snapshots())
    }
}
