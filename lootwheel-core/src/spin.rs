//! Spin orchestration across reels.
use crate::ConfigStorage;
use crate::catalog::Category;
use crate::config::ConfigStore;
use crate::constants::NOT_DRAWN_LABEL;
use crate::reel::{ReelController, ReelError, ReelEvent, ReelSnapshot, ReelTiming};
use crate::selection::SelectionError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpinError {
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error(transparent)]
    Reel(#[from] ReelError),
}

/// What a spin request did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum SpinOutcome {
    /// Reels were started for these categories, in request order.
    Started { categories: Vec<Category> },
    /// A spin was already in flight; nothing changed.
    AlreadySpinning,
    /// Every requested category had an empty eligible set.
    NoEligibleCandidates,
    /// Spin-all was requested while every category is disabled.
    NoEnabledCategories,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpinResult {
    pub category: Category,
    pub candidate: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpinSummary {
    pub primary: bool,
    pub results: Vec<SpinResult>,
}

/// Signals delivered to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SpinEvent {
    Reel { event: ReelEvent },
    Complete { summary: SpinSummary },
    NoEligibleCandidates { requested: Vec<Category> },
    NoEnabledCategories,
}

/// One row of the aggregate result board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardEntry {
    pub category: Category,
    pub label: &'static str,
    pub candidate: Option<String>,
}

impl BoardEntry {
    /// Text shown on the board: the candidate or the not-drawn marker.
    #[must_use]
    pub fn text(&self) -> &str {
        self.candidate.as_deref().unwrap_or(NOT_DRAWN_LABEL)
    }
}

#[derive(Debug, Clone)]
struct InFlight {
    primary: bool,
    order: Vec<Category>,
    results: Vec<SpinResult>,
    finished: BTreeSet<Category>,
}

/// Drives every reel of a spin and reports a single completion.
#[derive(Debug, Clone, Default)]
pub struct SpinOrchestrator {
    timing: ReelTiming,
    reels: BTreeMap<Category, ReelController>,
    displayed: BTreeMap<Category, String>,
    in_flight: Option<InFlight>,
}

impl SpinOrchestrator {
    #[must_use]
    pub fn new(timing: ReelTiming) -> Self {
        Self {
            timing,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn is_spinning(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Last finished result of a category, cleared while it spins.
    #[must_use]
    pub fn displayed(&self, category: Category) -> Option<&str> {
        self.displayed.get(&category).map(String::as_str)
    }

    #[must_use]
    pub fn reel(&self, category: Category) -> Option<&ReelController> {
        self.reels.get(&category)
    }

    #[must_use]
    pub fn snapshots(&self) -> Vec<ReelSnapshot> {
        self.reels.values().map(ReelController::snapshot).collect()
    }

    /// Result board rows for `enabled` categories, in the order given.
    #[must_use]
    pub fn board(&self, enabled: &[Category]) -> Vec<BoardEntry> {
        enabled
            .iter()
            .map(|category| BoardEntry {
                category: *category,
                label: category.label(),
                candidate: self.displayed.get(category).cloned(),
            })
            .collect()
    }

    /// Spin every enabled category, staggered.
    ///
    /// # Errors
    ///
    /// See [`Self::spin`].
    pub fn spin_all<S, R>(
        &mut self,
        store: &mut ConfigStore<S>,
        now: f64,
        rng: &mut R,
    ) -> Result<SpinOutcome, SpinError>
    where
        S: ConfigStorage,
        R: Rng + ?Sized,
    {
        if self.is_spinning() {
            return Ok(SpinOutcome::AlreadySpinning);
        }
        let enabled = store.enabled_categories();
        if enabled.is_empty() {
            return Ok(SpinOutcome::NoEnabledCategories);
        }
        self.spin(store, &enabled, true, now, rng)
    }

    /// Spin `categories`. Primary spins stagger reel starts by request
    /// position; single-reel spins start at once.
    ///
    /// # Errors
    ///
    /// Fails only if a drawn target cannot be placed on its reel, which the
    /// eligibility filter rules out.
    #[allow(clippy::cast_precision_loss)]
    pub fn spin<S, R>(
        &mut self,
        store: &mut ConfigStore<S>,
        categories: &[Category],
        primary: bool,
        now: f64,
        rng: &mut R,
    ) -> Result<SpinOutcome, SpinError>
    where
        S: ConfigStorage,
        R: Rng + ?Sized,
    {
        if self.is_spinning() {
            log::debug!("spin ignored: another spin is in flight");
            return Ok(SpinOutcome::AlreadySpinning);
        }

        let mut order: Vec<Category> = Vec::with_capacity(categories.len());
        let mut eligible_sets = Vec::with_capacity(categories.len());
        for category in categories {
            if order.contains(category) {
                continue;
            }
            let eligible = store.eligible(*category);
            if eligible.is_empty() {
                log::debug!("skipping {category}: no eligible candidates");
                continue;
            }
            order.push(*category);
            eligible_sets.push(eligible);
        }
        if order.is_empty() {
            return Ok(SpinOutcome::NoEligibleCandidates);
        }

        let mut results = Vec::with_capacity(order.len());
        for category in &order {
            let candidate = store.draw(*category, rng)?;
            results.push(SpinResult {
                category: *category,
                candidate,
            });
        }

        for (index, (result, eligible)) in results.iter().zip(&eligible_sets).enumerate() {
            let category = result.category;
            let stale = self
                .reels
                .get(&category)
                .is_none_or(|reel| reel.eligible() != eligible.as_slice());
            if stale {
                let reel = ReelController::new(category, eligible, self.timing.clone())?;
                self.reels.insert(category, reel);
            }
            let delay = if primary {
                index as f64 * self.timing.stagger_ms
            } else {
                0.0
            };
            if let Some(reel) = self.reels.get_mut(&category) {
                reel.start(&result.candidate, now, delay)?;
            }
            self.displayed.remove(&category);
        }

        log::debug!(
            "spin started ({}) for {:?}",
            if primary { "primary" } else { "single" },
            order
        );
        self.in_flight = Some(InFlight {
            primary,
            order: order.clone(),
            results,
            finished: BTreeSet::new(),
        });
        Ok(SpinOutcome::Started { categories: order })
    }

    /// Advance every reel of the current spin to `now`.
    ///
    /// Emits a single [`SpinEvent::Complete`] once the last reel finishes.
    pub fn tick(&mut self, now: f64) -> Vec<SpinEvent> {
        let Some(flight) = self.in_flight.as_mut() else {
            return Vec::new();
        };

        let mut events = Vec::new();
        for category in &flight.order {
            let Some(reel) = self.reels.get_mut(category) else {
                continue;
            };
            for event in reel.advance(now) {
                if let ReelEvent::Finished {
                    category,
                    candidate,
                } = &event
                {
                    self.displayed.insert(*category, candidate.clone());
                    flight.finished.insert(*category);
                }
                events.push(SpinEvent::Reel { event });
            }
        }

        if flight.finished.len() == flight.order.len()
            && let Some(flight) = self.in_flight.take()
        {
            log::debug!("spin complete: {} reel(s)", flight.results.len());
            events.push(SpinEvent::Complete {
                summary: SpinSummary {
                    primary: flight.primary,
                    results: flight.results,
                },
            });
        }
        events
    }
}
