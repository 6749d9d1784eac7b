//! Inventory-tiered market making for the RIT ALGO2 case.
//!
//! # Architecture
//!
//! ```text
//! SessionRunner (tick gate, shutdown token)
//!   └─ SubmissionCycle (one pass per mode)
//!        ├─ TierSelector: position → tier parameters
//!        ├─ LadderLevel / Quote: offsets around the last close
//!        ├─ scalp_orders: step inside a wide book
//!        ├─ GuardAction: keep exactly one pair resting
//!        └─ Pacer: fixed delays between waves
//! ```
//!
//! Every variant is a `StrategyConfig`; `Preset` builds the known ones.

pub mod config;
pub mod cycle;
pub mod error;
pub mod guard;
pub mod ladder;
pub mod pacer;
pub mod runner;
pub mod scalp;
pub mod tier;

pub use config::{
    BoundaryRule, DataErrorPolicy, GuardConfig, Preset, ScalpConfig, StrategyConfig, StrategyMode,
    TierSizing, TierTable,
};
pub use cycle::{CycleStats, SubmissionCycle};
pub use error::{StrategyError, StrategyResult};
pub use guard::GuardAction;
pub use ladder::{build_ladder, effective_depth, LadderLevel, Quote};
pub use pacer::{Pacer, RecordingPacer, TokioPacer};
pub use runner::{ExitReason, SessionRunner, SessionSummary};
pub use scalp::{scalp_orders, scalp_quantities};
pub use tier::{Tier, TierParameters, TierSelector};
