//! High-level business logic.
//!
//! Services tie the pure engine to the repository: they load the committed
//! corpus, run the engine's decision functions, and write accepted results
//! back, serializing every check-then-commit sequence per period.
//!
//! - [`periods`]: period lifecycle commands and reconciliation
//! - [`batches`]: batch publication, including all-or-nothing generation
//! - [`scheduling`]: event proposal/withdrawal and the per-period locks
//! - [`generator`]: automatic timetable fill for pending cases
//! - [`reconciler`]: the polling driver that commits due timed transitions

pub mod batches;
pub mod generator;
pub mod periods;
pub mod reconciler;
pub mod scheduling;

pub use scheduling::PeriodLocks;
