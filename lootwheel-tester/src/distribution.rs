//! Empirical draw distribution against the engine's reported probabilities.
use lootwheel_core::{Category, ConfigStorage, ConfigStore, SelectionError, probabilities};
use rand::Rng;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize)]
pub struct ShareRow {
    pub candidate: String,
    pub count: usize,
    pub expected: f64,
    pub observed: f64,
    pub drift: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DistributionReport {
    pub category: Category,
    pub draws: usize,
    pub tolerance: f64,
    pub rows: Vec<ShareRow>,
    pub max_drift: f64,
    /// Draws that landed outside the eligible set.
    pub strays: usize,
    pub passed: bool,
}

/// Draw `draws` times from `category` and compare shares.
///
/// An empty eligible set yields a passing report with no rows.
#[allow(clippy::cast_precision_loss)]
pub fn sample_category<S, R>(
    store: &mut ConfigStore<S>,
    category: Category,
    draws: usize,
    tolerance: f64,
    rng: &mut R,
) -> DistributionReport
where
    S: ConfigStorage,
    R: Rng + ?Sized,
{
    let eligible = store.eligible(category);
    let expected = probabilities(
        &eligible,
        store.category_weights(category),
        store.randomness(),
    );

    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for _ in 0..draws {
        match store.draw(category, rng) {
            Ok(pick) => *counts.entry(pick).or_insert(0) += 1,
            Err(SelectionError::NoEligibleCandidates) => break,
        }
    }

    let total = draws.max(1) as f64;
    let rows: Vec<ShareRow> = eligible
        .iter()
        .zip(&expected)
        .map(|(candidate, expected)| {
            let count = counts.remove(candidate).unwrap_or_default();
            let observed = count as f64 / total;
            ShareRow {
                candidate: candidate.clone(),
                count,
                expected: *expected,
                observed,
                drift: (observed - expected).abs(),
            }
        })
        .collect();
    let strays = counts.values().sum();
    let max_drift = rows.iter().map(|row| row.drift).fold(0.0, f64::max);
    log::debug!("{category}: max drift {max_drift:.4} over {draws} draws");

    DistributionReport {
        category,
        draws,
        tolerance,
        rows,
        max_drift,
        strays,
        passed: strays == 0 && max_drift <= tolerance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lootwheel_core::{Catalog, MemoryStorage};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn builtin_shares_stay_within_tolerance() {
        let mut store = ConfigStore::load(MemoryStorage::new(), Catalog::builtin());
        let mut rng = SmallRng::seed_from_u64(1337);
        let report = sample_category(&mut store, Category::Ultimates, 10_000, 0.02, &mut rng);
        assert!(report.passed, "{report:?}");
        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.rows.iter().map(|row| row.count).sum::<usize>(), 10_000);
        assert_eq!(report.strays, 0);
    }

    #[test]
    fn disabled_candidates_get_no_row() {
        let mut store = ConfigStore::load(MemoryStorage::new(), Catalog::builtin());
        store
            .set_candidate_enabled(Category::FSkills, "F2", false)
            .unwrap();
        let mut rng = SmallRng::seed_from_u64(3);
        let report = sample_category(&mut store, Category::FSkills, 500, 0.02, &mut rng);
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].count, 500);
        assert!((report.rows[0].expected - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_category_reports_nothing() {
        let mut store = ConfigStore::load(MemoryStorage::new(), Catalog::builtin());
        for candidate in ["V1", "V2"] {
            store
                .set_candidate_enabled(Category::Ultimates, candidate, false)
                .unwrap();
        }
        let mut rng = SmallRng::seed_from_u64(3);
        let report = sample_category(&mut store, Category::Ultimates, 100, 0.02, &mut rng);
        assert!(report.rows.is_empty());
        assert!(report.passed);
    }
}
