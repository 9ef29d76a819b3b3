//! Weighted selection engine.
//!
//! Turns per-candidate weights plus the global shaping parameters into a
//! single draw. The only side effect is advancing the seed when seeded
//! selection is active.
use crate::constants::{
    DEFAULT_BASE_WEIGHT_MULTIPLIER, DEFAULT_QUADRATIC_CORRECTION, DEFAULT_WEIGHT, QUADRATIC_SCALE,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Per-candidate weights of one category.
pub type CategoryWeights = BTreeMap<String, f64>;

/// Global shaping parameters applied on top of per-candidate weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RandomnessConfig {
    pub base_weight_multiplier: f64,
    pub quadratic_correction: bool,
    pub seed: Option<u64>,
}

impl Default for RandomnessConfig {
    fn default() -> Self {
        Self {
            base_weight_multiplier: DEFAULT_BASE_WEIGHT_MULTIPLIER,
            quadratic_correction: DEFAULT_QUADRATIC_CORRECTION,
            seed: None,
        }
    }
}

impl RandomnessConfig {
    /// Apply the quadratic correction and multiplier to a resolved weight.
    #[must_use]
    pub fn shape(&self, weight: f64) -> f64 {
        let weight = weight.max(0.0);
        let corrected = if self.quadratic_correction {
            weight * weight / QUADRATIC_SCALE
        } else {
            weight
        };
        corrected * self.base_weight_multiplier
    }

    /// Produce a unit roll in `[0, 1)`, advancing the seed when one is set.
    fn roll_unit<R: Rng + ?Sized>(&mut self, rng: &mut R) -> f64 {
        match self.seed {
            Some(seed) => {
                self.seed = Some(seed.wrapping_add(1));
                ChaCha20Rng::seed_from_u64(seed).r#gen::<f64>()
            }
            None => rng.r#gen::<f64>(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("no eligible candidates to select from")]
    NoEligibleCandidates,
}

/// Weight of a candidate, falling back to the default when unset.
#[must_use]
pub fn resolve_weight(weights: &CategoryWeights, candidate: &str) -> f64 {
    weights.get(candidate).copied().unwrap_or(DEFAULT_WEIGHT)
}

/// Shaped weight of every eligible candidate, in order.
#[must_use]
pub fn effective_weights(
    eligible: &[String],
    weights: &CategoryWeights,
    shaping: &RandomnessConfig,
) -> Vec<f64> {
    eligible
        .iter()
        .map(|candidate| shaping.shape(resolve_weight(weights, candidate)))
        .collect()
}

/// Selection probability of every eligible candidate, in order.
///
/// Mirrors the uniform fallback of [`select`] when the shaped total is zero.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn probabilities(
    eligible: &[String],
    weights: &CategoryWeights,
    shaping: &RandomnessConfig,
) -> Vec<f64> {
    if eligible.is_empty() {
        return Vec::new();
    }
    let shaped = effective_weights(eligible, weights, shaping);
    let total: f64 = shaped.iter().sum();
    if usable_total(total) {
        shaped.iter().map(|weight| weight / total).collect()
    } else {
        vec![1.0 / eligible.len() as f64; eligible.len()]
    }
}

fn usable_total(total: f64) -> bool {
    total.is_finite() && total > 0.0
}

/// Walk the weights until the roll falls inside one; the last index wins
/// when rounding pushes the roll past every bucket.
fn pick_index(shaped: &[f64], roll: f64) -> usize {
    let mut remaining = roll;
    for (idx, weight) in shaped.iter().enumerate() {
        if remaining < *weight {
            return idx;
        }
        remaining -= weight;
    }
    shaped.len().saturating_sub(1)
}

/// Draw one candidate from `eligible`.
///
/// `rng` supplies the roll unless `shaping.seed` is set, in which case the
/// roll comes from a ChaCha20 stream keyed by the seed and the seed advances.
///
/// # Errors
///
/// Returns [`SelectionError::NoEligibleCandidates`] if `eligible` is empty.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn select<'a, R: Rng + ?Sized>(
    eligible: &'a [String],
    weights: &CategoryWeights,
    shaping: &mut RandomnessConfig,
    rng: &mut R,
) -> Result<&'a str, SelectionError> {
    if eligible.is_empty() {
        return Err(SelectionError::NoEligibleCandidates);
    }

    let shaped = effective_weights(eligible, weights, shaping);
    let total: f64 = shaped.iter().sum();
    let unit = shaping.roll_unit(rng);

    let idx = if usable_total(total) {
        pick_index(&shaped, unit * total)
    } else {
        log::debug!("selection total weight {total} unusable; falling back to uniform");
        ((unit * eligible.len() as f64) as usize).min(eligible.len() - 1)
    };
    Ok(eligible[idx].as_str())
}
