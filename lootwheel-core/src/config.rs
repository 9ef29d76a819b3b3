//! Persisted wheel configuration: general state plus the weight table.
//!
//! Both records are loaded once, reconciled against the catalog, and written
//! back whole after every user edit.
use crate::ConfigStorage;
use crate::catalog::{Catalog, Category};
use crate::constants::{
    DEFAULT_TITLE, DEFAULT_WEIGHT, STATE_STORAGE_KEY, WEIGHT_MAX, WEIGHT_MIN, WEIGHT_PRECISION,
    WEIGHTS_STORAGE_KEY,
};
use crate::selection::{self, CategoryWeights, RandomnessConfig, SelectionError};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;

/// Weight overrides for every category.
pub type WeightTable = BTreeMap<Category, CategoryWeights>;

static NO_WEIGHTS: CategoryWeights = BTreeMap::new();

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("{candidate:?} is not a {category} candidate")]
    UnknownCandidate {
        category: Category,
        candidate: String,
    },
    #[error("weight {0} must be a number between 0 and 200")]
    InvalidWeight(f64),
    #[error("base weight multiplier {0} must be a positive number")]
    InvalidMultiplier(f64),
}

/// The general state record: title, toggles and shaping parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneralState {
    pub title: String,
    pub disabled_categories: Vec<Category>,
    pub disabled_items: BTreeMap<Category, Vec<String>>,
    pub random_config: RandomnessConfig,
}

impl Default for GeneralState {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            disabled_categories: Vec::new(),
            disabled_items: Category::ALL
                .into_iter()
                .map(|category| (category, Vec::new()))
                .collect(),
            random_config: RandomnessConfig::default(),
        }
    }
}

impl GeneralState {
    /// Build the state from a stored record, keeping every field that still
    /// parses and dropping entries that do not.
    fn from_record(record: &Map<String, Value>) -> Self {
        let mut state = Self::default();
        if let Some(title) = record.get("title").and_then(Value::as_str) {
            state.title = title.to_string();
        }
        if let Some(Value::Array(items)) = record.get("disabledCategories") {
            state.disabled_categories = items.iter().filter_map(category_entry).collect();
        }
        if let Some(Value::Object(items)) = record.get("disabledItems") {
            for (key, value) in items {
                let Some(category) = Category::parse(key) else {
                    log::warn!("dropping disabled items of unknown category {key:?}");
                    continue;
                };
                let names: Vec<String> = value
                    .as_array()
                    .map(|names| {
                        names
                            .iter()
                            .filter_map(Value::as_str)
                            .map(str::to_string)
                            .collect()
                    })
                    .unwrap_or_default();
                state.disabled_items.insert(category, names);
            }
        }
        if let Some(Value::Object(shaping)) = record.get("randomConfig") {
            let config = &mut state.random_config;
            if let Some(multiplier) = shaping
                .get("baseWeightMultiplier")
                .and_then(Value::as_f64)
            {
                config.base_weight_multiplier = multiplier;
            }
            if let Some(quadratic) = shaping
                .get("quadraticCorrection")
                .and_then(Value::as_bool)
            {
                config.quadratic_correction = quadratic;
            }
            config.seed = match shaping.get("seed") {
                None | Some(Value::Null) => None,
                Some(seed) => seed.as_u64().or_else(|| {
                    log::warn!("ignoring stored seed {seed}: not a non-negative integer");
                    None
                }),
            };
        }
        state
    }

    /// Fill gaps a partially written record may leave behind.
    fn normalize(&mut self) {
        if self.title.trim().is_empty() {
            self.title = DEFAULT_TITLE.to_string();
        }
        let mut seen = Vec::with_capacity(self.disabled_categories.len());
        self.disabled_categories.retain(|category| {
            if seen.contains(category) {
                false
            } else {
                seen.push(*category);
                true
            }
        });
        for category in Category::ALL {
            self.disabled_items.entry(category).or_default();
        }
        let multiplier = self.random_config.base_weight_multiplier;
        if !(multiplier.is_finite() && multiplier > 0.0) {
            self.random_config.base_weight_multiplier =
                RandomnessConfig::default().base_weight_multiplier;
        }
    }
}

/// Round a weight to the stored precision.
#[must_use]
pub fn round_weight(value: f64) -> f64 {
    (value * WEIGHT_PRECISION).round() / WEIGHT_PRECISION
}

/// Configuration store backed by a key/value [`ConfigStorage`].
#[derive(Debug)]
pub struct ConfigStore<S: ConfigStorage> {
    storage: S,
    catalog: Catalog,
    state: GeneralState,
    weights: WeightTable,
    /// Seed cursor for this session; advances per draw, never persisted.
    live_seed: Option<u64>,
}

impl<S: ConfigStorage> ConfigStore<S> {
    /// Load both records, falling back to defaults for any record that is
    /// missing, unreadable or malformed.
    pub fn load(storage: S, catalog: Catalog) -> Self {
        let mut state = read_record(&storage, STATE_STORAGE_KEY)
            .map_or_else(GeneralState::default, |record| GeneralState::from_record(&record));
        state.normalize();
        let weights = read_record(&storage, WEIGHTS_STORAGE_KEY)
            .map(weights_from_record)
            .unwrap_or_default();
        let live_seed = state.random_config.seed;

        let mut store = Self {
            storage,
            catalog,
            state,
            weights,
            live_seed,
        };
        if store.reconcile_weights()
            && let Err(err) = store.save_weights()
        {
            log::warn!("failed to persist reconciled weights: {err}");
        }
        store
    }

    /// Insert the default weight for every catalog candidate without one.
    /// Returns whether anything was added.
    fn reconcile_weights(&mut self) -> bool {
        let mut updated = false;
        for category in Category::ALL {
            let table = self.weights.entry(category).or_insert_with(|| {
                updated = true;
                CategoryWeights::new()
            });
            for candidate in self.catalog.candidates(category) {
                if !table.contains_key(candidate) {
                    table.insert(candidate.clone(), DEFAULT_WEIGHT);
                    updated = true;
                }
            }
        }
        updated
    }

    fn write<T: Serialize>(&self, key: &str, value: &T) -> Result<(), ConfigError> {
        let json = serde_json::to_string(value)?;
        self.storage
            .write(key, &json)
            .map_err(|err| ConfigError::Storage(err.to_string()))
    }

    /// Persist the general state record.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be serialized or written.
    pub fn save_state(&self) -> Result<(), ConfigError> {
        self.write(STATE_STORAGE_KEY, &self.state)
    }

    /// Persist the weights record.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be serialized or written.
    pub fn save_weights(&self) -> Result<(), ConfigError> {
        self.write(WEIGHTS_STORAGE_KEY, &self.weights)
    }

    fn ensure_candidate(&self, category: Category, candidate: &str) -> Result<(), ConfigError> {
        if self.catalog.contains(category, candidate) {
            Ok(())
        } else {
            Err(ConfigError::UnknownCandidate {
                category,
                candidate: candidate.to_string(),
            })
        }
    }

    // Queries -----------------------------------------------------------------

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub const fn state(&self) -> &GeneralState {
        &self.state
    }

    #[must_use]
    pub const fn weights(&self) -> &WeightTable {
        &self.weights
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.state.title
    }

    #[must_use]
    pub const fn randomness(&self) -> &RandomnessConfig {
        &self.state.random_config
    }

    #[must_use]
    pub fn is_category_enabled(&self, category: Category) -> bool {
        !self.state.disabled_categories.contains(&category)
    }

    /// Enabled categories in spin-all order.
    #[must_use]
    pub fn enabled_categories(&self) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|category| self.is_category_enabled(*category))
            .collect()
    }

    #[must_use]
    pub fn is_candidate_enabled(&self, category: Category, candidate: &str) -> bool {
        self.state
            .disabled_items
            .get(&category)
            .is_none_or(|disabled| !disabled.iter().any(|item| item == candidate))
    }

    /// Catalog candidates of a category that are not disabled, in catalog order.
    #[must_use]
    pub fn eligible(&self, category: Category) -> Vec<String> {
        self.catalog
            .candidates(category)
            .iter()
            .filter(|candidate| self.is_candidate_enabled(category, candidate))
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn category_weights(&self, category: Category) -> &CategoryWeights {
        self.weights.get(&category).unwrap_or(&NO_WEIGHTS)
    }

    #[must_use]
    pub fn weight(&self, category: Category, candidate: &str) -> f64 {
        selection::resolve_weight(self.category_weights(category), candidate)
    }

    /// Draw a target for `category` from its eligible set.
    ///
    /// Seeded draws advance the session seed cursor; the persisted seed is
    /// left untouched so a reload replays the same sequence.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::NoEligibleCandidates`] when every candidate
    /// of the category is disabled.
    pub fn draw<R: Rng + ?Sized>(
        &mut self,
        category: Category,
        rng: &mut R,
    ) -> Result<String, SelectionError> {
        let eligible = self.eligible(category);
        let mut shaping = RandomnessConfig {
            seed: self.live_seed,
            ..self.state.random_config.clone()
        };
        let pick = selection::select(&eligible, self.category_weights(category), &mut shaping, rng)?
            .to_string();
        self.live_seed = shaping.seed;
        Ok(pick)
    }

    // Mutations ---------------------------------------------------------------

    /// Set the wheel title; surrounding whitespace is trimmed.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed title is empty or cannot be saved.
    pub fn set_title(&mut self, title: &str) -> Result<(), ConfigError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ConfigError::EmptyTitle);
        }
        self.state.title = title.to_string();
        self.save_state()
    }

    /// # Errors
    ///
    /// Returns an error if the state cannot be saved.
    pub fn reset_title(&mut self) -> Result<(), ConfigError> {
        self.state.title = DEFAULT_TITLE.to_string();
        self.save_state()
    }

    /// Include or exclude a whole category from spin-all.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be saved.
    pub fn set_category_enabled(
        &mut self,
        category: Category,
        enabled: bool,
    ) -> Result<(), ConfigError> {
        let disabled = &mut self.state.disabled_categories;
        if enabled {
            disabled.retain(|item| *item != category);
        } else if !disabled.contains(&category) {
            disabled.push(category);
        }
        self.save_state()
    }

    /// Include or exclude one candidate from its category's eligible set.
    ///
    /// # Errors
    ///
    /// Returns an error if the candidate is not in the catalog or the state
    /// cannot be saved.
    pub fn set_candidate_enabled(
        &mut self,
        category: Category,
        candidate: &str,
        enabled: bool,
    ) -> Result<(), ConfigError> {
        self.ensure_candidate(category, candidate)?;
        let disabled = self.state.disabled_items.entry(category).or_default();
        if enabled {
            disabled.retain(|item| item != candidate);
        } else if !disabled.iter().any(|item| item == candidate) {
            disabled.push(candidate.to_string());
        }
        self.save_state()
    }

    /// Set a candidate's weight, rounded to one decimal.
    ///
    /// # Errors
    ///
    /// Returns an error if the candidate is unknown, the value is outside
    /// `0..=200`, or the weights cannot be saved.
    pub fn set_weight(
        &mut self,
        category: Category,
        candidate: &str,
        value: f64,
    ) -> Result<f64, ConfigError> {
        self.ensure_candidate(category, candidate)?;
        if !value.is_finite() || !(WEIGHT_MIN..=WEIGHT_MAX).contains(&value) {
            return Err(ConfigError::InvalidWeight(value));
        }
        let rounded = round_weight(value);
        self.weights
            .entry(category)
            .or_default()
            .insert(candidate.to_string(), rounded);
        self.save_weights()?;
        Ok(rounded)
    }

    /// Put every catalog candidate back at the default weight.
    ///
    /// # Errors
    ///
    /// Returns an error if the weights cannot be saved.
    pub fn reset_weights(&mut self) -> Result<(), ConfigError> {
        for category in Category::ALL {
            let table = self.weights.entry(category).or_default();
            for candidate in self.catalog.candidates(category) {
                table.insert(candidate.clone(), DEFAULT_WEIGHT);
            }
        }
        self.save_weights()
    }

    /// # Errors
    ///
    /// Returns an error if the multiplier is not a positive finite number or
    /// the state cannot be saved.
    pub fn set_base_multiplier(&mut self, multiplier: f64) -> Result<(), ConfigError> {
        if !(multiplier.is_finite() && multiplier > 0.0) {
            return Err(ConfigError::InvalidMultiplier(multiplier));
        }
        self.state.random_config.base_weight_multiplier = multiplier;
        self.save_state()
    }

    /// # Errors
    ///
    /// Returns an error if the state cannot be saved.
    pub fn set_quadratic_correction(&mut self, enabled: bool) -> Result<(), ConfigError> {
        self.state.random_config.quadratic_correction = enabled;
        self.save_state()
    }

    /// Set or clear the seed; restarts the session seed cursor.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be saved.
    pub fn set_seed(&mut self, seed: Option<u64>) -> Result<(), ConfigError> {
        self.state.random_config.seed = seed;
        self.live_seed = seed;
        self.save_state()
    }

    /// Restore the factory general state and rewrite it.
    ///
    /// Weights are reset separately through [`Self::reset_weights`].
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be saved.
    pub fn reset(&mut self) -> Result<(), ConfigError> {
        self.state = GeneralState::default();
        self.live_seed = None;
        self.save_state()
    }
}

fn read_record<S: ConfigStorage>(storage: &S, key: &str) -> Option<Map<String, Value>> {
    let raw = match storage.read(key) {
        Ok(raw) => raw?,
        Err(err) => {
            log::warn!("could not read {key}: {err}; using defaults");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(record) => Some(record),
        Err(err) => {
            log::warn!("discarding malformed {key} record: {err}");
            None
        }
    }
}

fn category_entry(value: &Value) -> Option<Category> {
    let category = Category::deserialize(value).ok();
    if category.is_none() {
        log::warn!("dropping unknown category {value}");
    }
    category
}

/// Keep the weights of known categories; numeric entries only.
fn weights_from_record(record: Map<String, Value>) -> WeightTable {
    record
        .into_iter()
        .filter_map(|(key, value)| {
            let Some(category) = Category::parse(&key) else {
                log::warn!("dropping weights of unknown category {key:?}");
                return None;
            };
            let Value::Object(entries) = value else {
                log::warn!("dropping malformed weights of {category}");
                return None;
            };
            let weights = entries
                .into_iter()
                .filter_map(|(candidate, weight)| Some((candidate, weight.as_f64()?)))
                .collect();
            Some((category, weights))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use std::io;

    fn fresh() -> (MemoryStorage, ConfigStore<MemoryStorage>) {
        let storage = MemoryStorage::new();
        let store = ConfigStore::load(storage.clone(), Catalog::builtin());
        (storage, store)
    }

    #[test]
    fn defaults_use_canonical_shaping() {
        let (_, store) = fresh();
        let shaping = store.randomness();
        assert!((shaping.base_weight_multiplier - 3.0).abs() < f64::EPSILON);
        assert!(shaping.quadratic_correction);
        assert_eq!(shaping.seed, None);
        assert_eq!(store.title(), DEFAULT_TITLE);
        assert_eq!(store.enabled_categories(), Category::ALL.to_vec());
    }

    #[test]
    fn first_load_writes_reconciled_weights() {
        let (storage, store) = fresh();
        let raw = storage.record(WEIGHTS_STORAGE_KEY).expect("weights persisted");
        let saved: WeightTable = serde_json::from_str(&raw).unwrap();
        assert_eq!(&saved, store.weights());
        assert!((store.weight(Category::Heroes, "迦南") - 100.0).abs() < f64::EPSILON);
        assert!(storage.record(STATE_STORAGE_KEY).is_none());
    }

    #[test]
    fn malformed_records_fall_back_to_defaults() {
        let storage = MemoryStorage::new()
            .with_record(STATE_STORAGE_KEY, "{not json")
            .with_record(WEIGHTS_STORAGE_KEY, "[1, 2");
        let store = ConfigStore::load(storage, Catalog::builtin());
        assert_eq!(store.state(), &GeneralState::default());
        assert_eq!(store.category_weights(Category::FSkills).len(), 2);
    }

    #[test]
    fn partial_state_record_keeps_present_fields() {
        let storage = MemoryStorage::new().with_record(
            STATE_STORAGE_KEY,
            r#"{"title":"Friday","disabledCategories":["spinner-ult"]}"#,
        );
        let store = ConfigStore::load(storage, Catalog::builtin());
        assert_eq!(store.title(), "Friday");
        assert!(!store.is_category_enabled(Category::Ultimates));
        assert!(store.state().disabled_items.contains_key(&Category::Heroes));
        assert!(store.randomness().quadratic_correction);
    }

    #[test]
    fn unknown_keys_do_not_discard_stored_weights() {
        let storage = MemoryStorage::new().with_record(
            WEIGHTS_STORAGE_KEY,
            r#"{"heroes":{"迦南":12.5,"note":"x"},"armor":{"x":1}}"#,
        );
        let store = ConfigStore::load(storage.clone(), Catalog::builtin());
        assert!((store.weight(Category::Heroes, "迦南") - 12.5).abs() < f64::EPSILON);
        assert!((store.weight(Category::Ultimates, "V1") - 100.0).abs() < f64::EPSILON);

        let reloaded = ConfigStore::load(storage, Catalog::builtin());
        assert!((reloaded.weight(Category::Heroes, "迦南") - 12.5).abs() < f64::EPSILON);
    }

    #[test]
    fn unreadable_state_fields_are_dropped_one_by_one() {
        let storage = MemoryStorage::new().with_record(
            STATE_STORAGE_KEY,
            r#"{
                "title": "Keep",
                "disabledCategories": ["ultimates", "armor"],
                "disabledItems": {"heroes": ["迦南"], "armor": ["x"]},
                "randomConfig": {
                    "baseWeightMultiplier": 2,
                    "quadraticCorrection": false,
                    "seed": -4
                }
            }"#,
        );
        let store = ConfigStore::load(storage, Catalog::builtin());
        assert_eq!(store.title(), "Keep");
        assert_eq!(store.state().disabled_categories, vec![Category::Ultimates]);
        assert!(!store.is_candidate_enabled(Category::Heroes, "迦南"));
        let shaping = store.randomness();
        assert!((shaping.base_weight_multiplier - 2.0).abs() < f64::EPSILON);
        assert!(!shaping.quadratic_correction);
        assert_eq!(shaping.seed, None);
    }

    #[test]
    fn toggles_persist_and_shape_eligibility() {
        let (storage, mut store) = fresh();
        store.set_candidate_enabled(Category::FSkills, "F1", false).unwrap();
        store.set_candidate_enabled(Category::FSkills, "F1", false).unwrap();
        assert_eq!(store.eligible(Category::FSkills), vec!["F2".to_string()]);
        assert_eq!(store.state().disabled_items[&Category::FSkills].len(), 1);

        store.set_category_enabled(Category::Heroes, false).unwrap();
        let reloaded = ConfigStore::load(storage.clone(), Catalog::builtin());
        assert!(!reloaded.is_category_enabled(Category::Heroes));
        assert_eq!(reloaded.eligible(Category::FSkills), vec!["F2".to_string()]);

        store.set_candidate_enabled(Category::FSkills, "F1", true).unwrap();
        store.set_category_enabled(Category::Heroes, true).unwrap();
        let reloaded = ConfigStore::load(storage, Catalog::builtin());
        assert_eq!(reloaded.eligible(Category::FSkills).len(), 2);
        assert!(reloaded.is_category_enabled(Category::Heroes));
    }

    #[test]
    fn unknown_candidates_are_rejected() {
        let (_, mut store) = fresh();
        let err = store
            .set_candidate_enabled(Category::Heroes, "F1", false)
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownCandidate { .. }));
        assert!(store.set_weight(Category::Ultimates, "V9", 10.0).is_err());
    }

    #[test]
    fn weights_round_and_validate() {
        let (_, mut store) = fresh();
        let stored = store.set_weight(Category::Ultimates, "V1", 37.26).unwrap();
        assert!((stored - 37.3).abs() < 1e-9);
        assert!((store.weight(Category::Ultimates, "V1") - 37.3).abs() < 1e-9);
        assert!(matches!(
            store.set_weight(Category::Ultimates, "V1", -1.0),
            Err(ConfigError::InvalidWeight(_))
        ));
        assert!(store.set_weight(Category::Ultimates, "V1", f64::NAN).is_err());
        assert!(store.set_weight(Category::Ultimates, "V1", 200.1).is_err());

        store.reset_weights().unwrap();
        assert!((store.weight(Category::Ultimates, "V1") - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn title_edits_trim_and_reset() {
        let (_, mut store) = fresh();
        assert!(matches!(store.set_title("   "), Err(ConfigError::EmptyTitle)));
        store.set_title("  Night Run ").unwrap();
        assert_eq!(store.title(), "Night Run");
        store.reset_title().unwrap();
        assert_eq!(store.title(), DEFAULT_TITLE);
    }

    #[test]
    fn reset_restores_factory_state() {
        let (storage, mut store) = fresh();
        store.set_title("Custom").unwrap();
        store.set_base_multiplier(5.5).unwrap();
        store.set_quadratic_correction(false).unwrap();
        store.set_seed(Some(9)).unwrap();
        store.set_category_enabled(Category::FSkills, false).unwrap();
        assert!(store.set_base_multiplier(0.0).is_err());

        store.reset().unwrap();
        assert_eq!(store.state(), &GeneralState::default());
        let saved: GeneralState =
            serde_json::from_str(&storage.record(STATE_STORAGE_KEY).unwrap()).unwrap();
        assert_eq!(saved, GeneralState::default());
    }

    #[test]
    fn seeded_draws_do_not_rewrite_the_stored_seed() {
        let (storage, mut store) = fresh();
        store.set_seed(Some(1234)).unwrap();
        let mut rng = SmallRng::seed_from_u64(0);
        let first: Vec<String> = (0..5)
            .map(|_| store.draw(Category::Heroes, &mut rng).unwrap())
            .collect();
        assert_eq!(store.randomness().seed, Some(1234));

        let mut replay = ConfigStore::load(storage, Catalog::builtin());
        let second: Vec<String> = (0..5)
            .map(|_| replay.draw(Category::Heroes, &mut rng).unwrap())
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn draw_reports_empty_categories() {
        let (_, mut store) = fresh();
        store.set_candidate_enabled(Category::Ultimates, "V1", false).unwrap();
        store.set_candidate_enabled(Category::Ultimates, "V2", false).unwrap();
        let mut rng = SmallRng::seed_from_u64(3);
        assert_eq!(
            store.draw(Category::Ultimates, &mut rng),
            Err(SelectionError::NoEligibleCandidates)
        );
    }

    #[derive(Debug, Clone, Copy)]
    struct ReadOnlyStorage;

    impl ConfigStorage for ReadOnlyStorage {
        type Error = io::Error;

        fn read(&self, _key: &str) -> Result<Option<String>, Self::Error> {
            Ok(None)
        }

        fn write(&self, _key: &str, _value: &str) -> Result<(), Self::Error> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "quota exceeded"))
        }
    }

    #[test]
    fn storage_failures_surface_on_edit_but_not_on_load() {
        let mut store = ConfigStore::load(ReadOnlyStorage, Catalog::builtin());
        assert_eq!(store.eligible(Category::RangedWeapons).len(), 5);
        let err = store.set_title("New").unwrap_err();
        assert!(matches!(err, ConfigError::Storage(ref msg) if msg.contains("quota")));
    }
}
