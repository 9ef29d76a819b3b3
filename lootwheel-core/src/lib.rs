//! Loot wheel engine.
//!
//! Platform-agnostic core of the wheel: the item catalog, the persisted
//! configuration store, weighted selection, reel animation and the spin
//! orchestrator. Hosts provide storage through [`ConfigStorage`] and frame
//! callbacks through [`TickScheduler`].

pub mod catalog;
pub mod config;
pub mod constants;
pub mod reel;
pub mod scheduler;
pub mod selection;
pub mod session;
pub mod spin;
pub mod storage;

pub use catalog::{Catalog, CatalogError, Category};
pub use config::{ConfigError, ConfigStore, GeneralState, WeightTable, round_weight};
pub use reel::{
    ReelController, ReelError, ReelEvent, ReelPhase, ReelSnapshot, ReelTiming, SpeedStage,
    build_strip,
};
pub use scheduler::{ManualScheduler, SpinListener, TickCallback, TickScheduler, drive};
pub use selection::{
    CategoryWeights, RandomnessConfig, SelectionError, effective_weights, probabilities, select,
};
pub use session::WheelSession;
pub use spin::{
    BoardEntry, SpinError, SpinEvent, SpinOrchestrator, SpinOutcome, SpinResult, SpinSummary,
};
pub use storage::MemoryStorage;

/// Key/value persistence for the configuration records.
pub trait ConfigStorage {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read a raw record.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Replace a raw record.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the write.
    fn write(&self, key: &str, value: &str) -> Result<(), Self::Error>;
}
