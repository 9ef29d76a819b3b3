//! Full spins on a fake clock, checking every reel settles on its draw.
use lootwheel_core::{
    ConfigStorage, ConfigStore, ManualScheduler, ReelPhase, ReelTiming, SpinError, SpinEvent,
    SpinListener, SpinOutcome, TickScheduler, WheelSession,
};
use rand::rngs::SmallRng;
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;

pub const FRAME_MS: f64 = 16.0;
const MAX_FRAMES_PER_SPIN: usize = 5_000;

#[derive(Debug, Clone, Default, Serialize)]
pub struct SimulationReport {
    pub spins: usize,
    pub completed: usize,
    pub reels_checked: usize,
    pub longest_spin_ms: f64,
    pub mismatches: Vec<String>,
    pub passed: bool,
}

/// Run `spins` spin-all rounds and verify each settle.
///
/// # Errors
///
/// Propagates spin failures from the orchestrator.
pub fn simulate_spins<S: ConfigStorage>(
    store: ConfigStore<S>,
    timing: ReelTiming,
    rng: SmallRng,
    spins: usize,
) -> Result<SimulationReport, SpinError> {
    let scheduler = Rc::new(ManualScheduler::new());
    let events: Rc<RefCell<Vec<SpinEvent>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    let listener: SpinListener =
        Rc::new(move |event: &SpinEvent| sink.borrow_mut().push(event.clone()));
    let mut session = WheelSession::new(store, Rc::clone(&scheduler), timing, rng, listener);

    let mut report = SimulationReport {
        spins,
        ..SimulationReport::default()
    };
    for round in 0..spins {
        events.borrow_mut().clear();
        let started_at = scheduler.now();
        match session.spin_all()? {
            SpinOutcome::Started { .. } => {}
            other => {
                report
                    .mismatches
                    .push(format!("round {round}: spin did not start ({other:?})"));
                continue;
            }
        }
        scheduler.run_until_idle(FRAME_MS, MAX_FRAMES_PER_SPIN);
        report.longest_spin_ms = report.longest_spin_ms.max(scheduler.now() - started_at);

        let events = events.borrow();
        let completions: Vec<_> = events
            .iter()
            .filter_map(|event| match event {
                SpinEvent::Complete { summary } => Some(summary),
                _ => None,
            })
            .collect();
        let [summary] = completions.as_slice() else {
            report.mismatches.push(format!(
                "round {round}: expected one completion, saw {}",
                completions.len()
            ));
            continue;
        };
        report.completed += 1;

        let snapshots = session.snapshots();
        for result in &summary.results {
            report.reels_checked += 1;
            let Some(snapshot) = snapshots.iter().find(|s| s.category == result.category) else {
                report
                    .mismatches
                    .push(format!("round {round}: no reel for {}", result.category));
                continue;
            };
            if snapshot.phase != ReelPhase::Done || snapshot.displayed != result.candidate {
                report.mismatches.push(format!(
                    "round {round}: {} shows {:?} ({:?}), drew {:?}",
                    result.category, snapshot.displayed, snapshot.phase, result.candidate
                ));
            }
        }
    }
    report.passed = report.mismatches.is_empty();
    log::debug!(
        "simulated {} spins, {} reels checked",
        report.spins,
        report.reels_checked
    );
    Ok(report)
}
