//! Centralized tuning constants for the loot wheel: selection defaults, reel
//! geometry and animation timing.

// Storage keys -------------------------------------------------------------
pub const WEIGHTS_STORAGE_KEY: &str = "kled_random_weights";
pub const STATE_STORAGE_KEY: &str = "randomGeneratorState";

// Presentation defaults ----------------------------------------------------
pub const DEFAULT_TITLE: &str = "克烈无间";
pub const NOT_DRAWN_LABEL: &str = "未抽取";

// Selection ----------------------------------------------------------------
pub const DEFAULT_WEIGHT: f64 = 100.0;
pub const WEIGHT_MIN: f64 = 0.0;
pub const WEIGHT_MAX: f64 = 200.0;
/// Weights are stored with one decimal of precision.
pub const WEIGHT_PRECISION: f64 = 10.0;
/// Divisor of the quadratic correction, `w * w / QUADRATIC_SCALE`.
pub const QUADRATIC_SCALE: f64 = 100.0;
pub const DEFAULT_BASE_WEIGHT_MULTIPLIER: f64 = 3.0;
pub const DEFAULT_QUADRATIC_CORRECTION: bool = true;

// Reel geometry ------------------------------------------------------------
pub const ITEM_HEIGHT_PX: f64 = 50.0;
pub const VISIBLE_ITEMS: usize = 4;
pub const MIN_RENDERED_ITEMS: usize = 150;
/// Fraction of the target's occurrences to skip before picking a landing slot.
pub const TARGET_OCCURRENCE_FRACTION: f64 = 0.7;

// Reel timing --------------------------------------------------------------
pub const SPIN_DURATION_MS: f64 = 4_000.0;
pub const SETTLE_DURATION_MS: f64 = 1_500.0;
pub const STAGGER_DELAY_MS: f64 = 200.0;
pub const CONSTANT_SCROLL_SPEED_PX_PER_SEC: f64 = 1_200.0;
/// `(duration_ms, ms_per_item)` pairs for the decelerating run phase.
pub const SPIN_STAGES: [(f64, f64); 4] = [
    (1_000.0, 30.0),
    (1_500.0, 60.0),
    (1_000.0, 120.0),
    (500.0, 200.0),
];
