//! A wheel wired to a config store, a frame scheduler and a listener.
use crate::ConfigStorage;
use crate::catalog::Category;
use crate::config::ConfigStore;
use crate::reel::{ReelSnapshot, ReelTiming};
use crate::scheduler::{SpinListener, TickScheduler, drive};
use crate::spin::{BoardEntry, SpinError, SpinEvent, SpinOrchestrator, SpinOutcome};
use rand::rngs::SmallRng;
use std::cell::RefCell;
use std::rc::Rc;

pub struct WheelSession<S: ConfigStorage, T: TickScheduler + 'static> {
    store: ConfigStore<S>,
    orchestrator: Rc<RefCell<SpinOrchestrator>>,
    scheduler: Rc<T>,
    rng: SmallRng,
    listener: SpinListener,
}

impl<S: ConfigStorage, T: TickScheduler + 'static> WheelSession<S, T> {
    pub fn new(
        store: ConfigStore<S>,
        scheduler: Rc<T>,
        timing: ReelTiming,
        rng: SmallRng,
        listener: SpinListener,
    ) -> Self {
        Self {
            store,
            orchestrator: Rc::new(RefCell::new(SpinOrchestrator::new(timing))),
            scheduler,
            rng,
            listener,
        }
    }

    #[must_use]
    pub const fn store(&self) -> &ConfigStore<S> {
        &self.store
    }

    /// Config edits go through here; they take effect on the next spin.
    pub const fn store_mut(&mut self) -> &mut ConfigStore<S> {
        &mut self.store
    }

    #[must_use]
    pub fn is_spinning(&self) -> bool {
        self.orchestrator.borrow().is_spinning()
    }

    /// Spin `categories` and start ticking until every reel is done.
    ///
    /// # Errors
    ///
    /// See [`SpinOrchestrator::spin`].
    pub fn spin(
        &mut self,
        categories: &[Category],
        primary: bool,
    ) -> Result<SpinOutcome, SpinError> {
        let now = self.scheduler.now();
        let outcome = self.orchestrator.borrow_mut().spin(
            &mut self.store,
            categories,
            primary,
            now,
            &mut self.rng,
        )?;
        self.follow(&outcome, categories);
        Ok(outcome)
    }

    /// Spin every enabled category.
    ///
    /// # Errors
    ///
    /// See [`SpinOrchestrator::spin`].
    pub fn spin_all(&mut self) -> Result<SpinOutcome, SpinError> {
        let now = self.scheduler.now();
        let requested = self.store.enabled_categories();
        let outcome = self
            .orchestrator
            .borrow_mut()
            .spin_all(&mut self.store, now, &mut self.rng)?;
        self.follow(&outcome, &requested);
        Ok(outcome)
    }

    /// Start ticking a started spin, or tell the listener why nothing started.
    fn follow(&self, outcome: &SpinOutcome, requested: &[Category]) {
        match outcome {
            SpinOutcome::Started { .. } => drive(
                Rc::clone(&self.orchestrator),
                Rc::clone(&self.scheduler),
                Rc::clone(&self.listener),
            ),
            SpinOutcome::NoEligibleCandidates => {
                (self.listener)(&SpinEvent::NoEligibleCandidates {
                    requested: requested.to_vec(),
                });
            }
            SpinOutcome::NoEnabledCategories => (self.listener)(&SpinEvent::NoEnabledCategories),
            SpinOutcome::AlreadySpinning => {}
        }
    }

    #[must_use]
    pub fn displayed(&self, category: Category) -> Option<String> {
        self.orchestrator
            .borrow()
            .displayed(category)
            .map(str::to_string)
    }

    #[must_use]
    pub fn board(&self) -> Vec<BoardEntry> {
        self.orchestrator
            .borrow()
            .board(&self.store.enabled_categories())
    }

    #[must_use]
    pub fn snapshots(&self) -> Vec<ReelSnapshot> {
        self.orchestrator.borrow().snapshots()
    }
}
