//! Reel animation controller.
//!
//! A reel scrolls through a looping strip of candidate labels and settles
//! exactly on a pre-chosen target. Offsets are scroll distances in pixels,
//! measured from the top of the strip to the item under the center line.
use crate::catalog::Category;
use crate::constants::{
    CONSTANT_SCROLL_SPEED_PX_PER_SEC, ITEM_HEIGHT_PX, MIN_RENDERED_ITEMS, SETTLE_DURATION_MS,
    SPIN_DURATION_MS, SPIN_STAGES, STAGGER_DELAY_MS, TARGET_OCCURRENCE_FRACTION, VISIBLE_ITEMS,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum number of full copies of the eligible list on a strip, so a
/// backward wrap by one copy always lands on rendered items.
const MIN_STRIP_COPIES: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReelError {
    #[error("reel {0} has no eligible candidates to render")]
    EmptyStrip(Category),
    #[error("target {candidate:?} is not on the {category} reel")]
    TargetNotOnStrip {
        category: Category,
        candidate: String,
    },
}

/// One sub-phase of the run: scroll one item every `ms_per_item` for
/// `duration_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeedStage {
    pub duration_ms: f64,
    pub ms_per_item: f64,
}

/// Geometry and timing of a reel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReelTiming {
    pub item_height: f64,
    pub visible_items: usize,
    pub min_rendered_items: usize,
    pub settle_duration_ms: f64,
    pub stagger_ms: f64,
    pub stages: Vec<SpeedStage>,
}

impl Default for ReelTiming {
    fn default() -> Self {
        Self::staged()
    }
}

impl ReelTiming {
    /// Fast start that slows down in steps before settling.
    #[must_use]
    pub fn staged() -> Self {
        Self {
            item_height: ITEM_HEIGHT_PX,
            visible_items: VISIBLE_ITEMS,
            min_rendered_items: MIN_RENDERED_ITEMS,
            settle_duration_ms: SETTLE_DURATION_MS,
            stagger_ms: STAGGER_DELAY_MS,
            stages: SPIN_STAGES
                .iter()
                .map(|(duration_ms, ms_per_item)| SpeedStage {
                    duration_ms: *duration_ms,
                    ms_per_item: *ms_per_item,
                })
                .collect(),
        }
    }

    /// Single constant-speed run phase.
    #[must_use]
    pub fn constant() -> Self {
        Self {
            stages: vec![SpeedStage {
                duration_ms: SPIN_DURATION_MS,
                ms_per_item: ITEM_HEIGHT_PX / CONSTANT_SCROLL_SPEED_PX_PER_SEC * 1_000.0,
            }],
            ..Self::staged()
        }
    }

    /// Length of the running phase.
    #[must_use]
    pub fn run_duration_ms(&self) -> f64 {
        self.stages.iter().map(|stage| stage.duration_ms).sum()
    }

    /// Distance scrolled after `elapsed_ms` of running.
    #[must_use]
    pub fn distance_at(&self, elapsed_ms: f64) -> f64 {
        let mut remaining = elapsed_ms.max(0.0);
        let mut distance = 0.0;
        for stage in &self.stages {
            if remaining <= 0.0 {
                break;
            }
            let spent = remaining.min(stage.duration_ms);
            if stage.ms_per_item > 0.0 {
                distance += spent * self.item_height / stage.ms_per_item;
            }
            remaining -= spent;
        }
        distance
    }

    /// Pixel offset from the top of the viewport to the center slot.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn center_offset(&self) -> f64 {
        (self.visible_items as f64 / 2.0).mul_add(self.item_height, -self.item_height / 2.0)
    }
}

/// Repeat `eligible` until the strip is long enough to run without
/// visibly running out.
#[must_use]
pub fn build_strip(eligible: &[String], min_len: usize) -> Vec<String> {
    if eligible.is_empty() {
        return Vec::new();
    }
    let mut strip = Vec::with_capacity(min_len.max(eligible.len() * MIN_STRIP_COPIES));
    let mut copies = 0;
    while strip.len() < min_len || copies < MIN_STRIP_COPIES {
        strip.extend_from_slice(eligible);
        copies += 1;
    }
    strip
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReelPhase {
    Idle,
    Waiting,
    Running,
    Settling,
    Done,
}

impl ReelPhase {
    #[must_use]
    pub const fn in_flight(self) -> bool {
        matches!(self, Self::Waiting | Self::Running | Self::Settling)
    }
}

/// Progress signals a reel emits while advancing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ReelEvent {
    Started {
        category: Category,
    },
    #[serde(rename_all = "camelCase")]
    Settling {
        category: Category,
        target_offset: f64,
    },
    Finished {
        category: Category,
        candidate: String,
    },
}

/// Presentation view of a reel at one instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReelSnapshot {
    pub category: Category,
    pub phase: ReelPhase,
    pub offset: f64,
    pub translate_y: f64,
    pub elapsed_ms: f64,
    pub displayed: String,
}

#[derive(Debug, Clone)]
pub struct ReelController {
    category: Category,
    timing: ReelTiming,
    eligible: Vec<String>,
    strip: Vec<String>,
    phase: ReelPhase,
    offset: f64,
    target: Option<String>,
    target_offset: f64,
    start_at: f64,
    elapsed_ms: f64,
    run_origin: f64,
    settle_from: f64,
    settle_started_at: f64,
}

impl ReelController {
    /// Build an idle reel over `eligible`, centered on the first item of the
    /// second copy.
    ///
    /// # Errors
    ///
    /// Returns [`ReelError::EmptyStrip`] when `eligible` is empty.
    #[allow(clippy::cast_precision_loss)]
    pub fn new(
        category: Category,
        eligible: &[String],
        timing: ReelTiming,
    ) -> Result<Self, ReelError> {
        let strip = build_strip(eligible, timing.min_rendered_items);
        if strip.is_empty() {
            return Err(ReelError::EmptyStrip(category));
        }
        let offset = eligible.len() as f64 * timing.item_height;
        Ok(Self {
            category,
            timing,
            eligible: eligible.to_vec(),
            strip,
            phase: ReelPhase::Idle,
            offset,
            target: None,
            target_offset: offset,
            start_at: 0.0,
            elapsed_ms: 0.0,
            run_origin: offset,
            settle_from: offset,
            settle_started_at: 0.0,
        })
    }

    #[must_use]
    pub const fn category(&self) -> Category {
        self.category
    }

    #[must_use]
    pub const fn phase(&self) -> ReelPhase {
        self.phase
    }

    #[must_use]
    pub const fn offset(&self) -> f64 {
        self.offset
    }

    #[must_use]
    pub fn eligible(&self) -> &[String] {
        &self.eligible
    }

    #[must_use]
    pub fn strip(&self) -> &[String] {
        &self.strip
    }

    #[must_use]
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    #[must_use]
    pub const fn timing(&self) -> &ReelTiming {
        &self.timing
    }

    #[allow(clippy::cast_precision_loss)]
    fn cycle_len(&self) -> f64 {
        self.eligible.len() as f64 * self.timing.item_height
    }

    #[allow(clippy::cast_precision_loss)]
    fn wrap_threshold(&self) -> f64 {
        self.strip.len() as f64 * self.timing.item_height / 2.0
    }

    /// Value for the strip's `translateY` so the current offset sits on the
    /// center line.
    #[must_use]
    pub fn translate_y(&self) -> f64 {
        self.timing.center_offset() - self.offset
    }

    /// Strip index of the item nearest the center line.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn centered_index(&self) -> usize {
        let raw = (self.offset / self.timing.item_height).round().max(0.0) as usize;
        raw % self.strip.len()
    }

    /// Label currently under the center line.
    #[must_use]
    pub fn displayed(&self) -> &str {
        &self.strip[self.centered_index()]
    }

    #[must_use]
    pub fn snapshot(&self) -> ReelSnapshot {
        ReelSnapshot {
            category: self.category,
            phase: self.phase,
            offset: self.offset,
            translate_y: self.translate_y(),
            elapsed_ms: self.elapsed_ms,
            displayed: self.displayed().to_string(),
        }
    }

    /// Landing index for `target`: the occurrence ~70% through the strip.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn landing_index(&self, target: &str) -> Option<usize> {
        let occurrences: Vec<usize> = self
            .strip
            .iter()
            .enumerate()
            .filter(|(_, label)| *label == target)
            .map(|(idx, _)| idx)
            .collect();
        let pick = (occurrences.len() as f64 * TARGET_OCCURRENCE_FRACTION).floor() as usize;
        occurrences
            .get(pick.min(occurrences.len().saturating_sub(1)))
            .copied()
    }

    /// Arm the reel to run toward `target`, beginning `delay_ms` after `now`.
    ///
    /// Returns `Ok(false)` without changing anything if the reel is already
    /// in flight.
    ///
    /// # Errors
    ///
    /// Returns [`ReelError::TargetNotOnStrip`] if `target` is not rendered on
    /// this reel.
    #[allow(clippy::cast_precision_loss)]
    pub fn start(&mut self, target: &str, now: f64, delay_ms: f64) -> Result<bool, ReelError> {
        if self.phase.in_flight() {
            return Ok(false);
        }
        let index = self
            .landing_index(target)
            .ok_or_else(|| ReelError::TargetNotOnStrip {
                category: self.category,
                candidate: target.to_string(),
            })?;
        self.target = Some(target.to_string());
        self.target_offset = index as f64 * self.timing.item_height;
        self.start_at = now + delay_ms.max(0.0);
        self.elapsed_ms = 0.0;
        self.phase = ReelPhase::Waiting;
        log::trace!(
            "reel {} armed for {target} at index {index}, start {:.0}ms",
            self.category,
            self.start_at
        );
        Ok(true)
    }

    /// Move to `position`, wrapping back by whole copies of the eligible list
    /// whenever the midpoint of the strip is passed.
    fn scroll_to(&mut self, position: f64) {
        let cycle = self.cycle_len();
        let threshold = self.wrap_threshold();
        self.offset = position;
        while self.offset > threshold {
            self.offset -= cycle;
            self.run_origin -= cycle;
        }
    }

    /// Advance the reel to time `now`, returning every transition crossed.
    pub fn advance(&mut self, now: f64) -> Vec<ReelEvent> {
        let mut events = Vec::new();
        loop {
            match self.phase {
                ReelPhase::Idle | ReelPhase::Done => break,
                ReelPhase::Waiting => {
                    if now < self.start_at {
                        break;
                    }
                    self.run_origin = self.offset;
                    self.phase = ReelPhase::Running;
                    log::trace!("reel {} running", self.category);
                    events.push(ReelEvent::Started {
                        category: self.category,
                    });
                }
                ReelPhase::Running => {
                    let run_ms = self.timing.run_duration_ms();
                    let elapsed = now - self.start_at;
                    if elapsed < run_ms {
                        self.elapsed_ms = elapsed;
                        self.scroll_to(self.run_origin + self.timing.distance_at(elapsed));
                        break;
                    }
                    self.elapsed_ms = run_ms;
                    self.scroll_to(self.run_origin + self.timing.distance_at(run_ms));
                    self.settle_from = self.offset;
                    self.settle_started_at = self.start_at + run_ms;
                    self.phase = ReelPhase::Settling;
                    log::trace!(
                        "reel {} settling from {:.1} to {:.1}",
                        self.category,
                        self.settle_from,
                        self.target_offset
                    );
                    events.push(ReelEvent::Settling {
                        category: self.category,
                        target_offset: self.target_offset,
                    });
                }
                ReelPhase::Settling => {
                    let duration = self.timing.settle_duration_ms;
                    let since = now - self.settle_started_at;
                    self.elapsed_ms = self.timing.run_duration_ms() + since.min(duration);
                    if duration > 0.0 && since < duration {
                        let eased = ease_out_cubic(since / duration);
                        let distance = self.target_offset - self.settle_from;
                        self.offset = distance.mul_add(eased, self.settle_from);
                        break;
                    }
                    self.offset = self.target_offset;
                    self.phase = ReelPhase::Done;
                    let candidate = self.target.clone().unwrap_or_default();
                    log::trace!("reel {} done on {candidate}", self.category);
                    events.push(ReelEvent::Finished {
                        category: self.category,
                        candidate,
                    });
                    break;
                }
            }
        }
        events
    }
}

fn ease_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}
