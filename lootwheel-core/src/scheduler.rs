//! Frame tick abstraction and the driver loop that feeds it.
use crate::spin::{SpinEvent, SpinOrchestrator};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

/// Callback invoked with the frame timestamp in milliseconds.
pub type TickCallback = Box<dyn FnOnce(f64)>;

/// Source of per-frame callbacks, like `requestAnimationFrame`.
pub trait TickScheduler {
    /// Current clock reading in milliseconds.
    fn now(&self) -> f64;

    /// Run `callback` once on the next frame.
    fn request_tick(&self, callback: TickCallback);
}

/// Fake clock that runs queued frames on demand.
#[derive(Default)]
pub struct ManualScheduler {
    now: Cell<f64>,
    queue: RefCell<VecDeque<TickCallback>>,
}

impl ManualScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Move the clock forward by `dt_ms` and run the frames queued before
    /// the call. Frames requested from inside a callback wait for the next
    /// advance. Returns how many callbacks ran.
    pub fn advance(&self, dt_ms: f64) -> usize {
        self.now.set(self.now.get() + dt_ms);
        let batch: Vec<TickCallback> = self.queue.borrow_mut().drain(..).collect();
        let ran = batch.len();
        let now = self.now.get();
        for callback in batch {
            callback(now);
        }
        ran
    }

    /// Advance frame by frame until nothing is queued or `max_frames` ran.
    /// Returns the number of frames advanced.
    pub fn run_until_idle(&self, frame_ms: f64, max_frames: usize) -> usize {
        let mut frames = 0;
        while self.pending() > 0 && frames < max_frames {
            self.advance(frame_ms);
            frames += 1;
        }
        frames
    }
}

impl TickScheduler for ManualScheduler {
    fn now(&self) -> f64 {
        self.now.get()
    }

    fn request_tick(&self, callback: TickCallback) {
        self.queue.borrow_mut().push_back(callback);
    }
}

/// Receives every event a spin produces.
pub type SpinListener = Rc<dyn Fn(&SpinEvent)>;

/// Tick `orchestrator` on every frame while a spin is in flight.
///
/// Events are collected before `listener` runs, so the listener may start a
/// new spin from a completion event.
pub fn drive<S>(
    orchestrator: Rc<RefCell<SpinOrchestrator>>,
    scheduler: Rc<S>,
    listener: SpinListener,
) where
    S: TickScheduler + 'static,
{
    let next = Rc::clone(&scheduler);
    scheduler.request_tick(Box::new(move |now| {
        let (events, spinning) = {
            let mut orchestrator = orchestrator.borrow_mut();
            let events = orchestrator.tick(now);
            (events, orchestrator.is_spinning())
        };
        for event in &events {
            listener(event);
        }
        if spinning {
            drive(orchestrator, next, listener);
        }
    }));
}
