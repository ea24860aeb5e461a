//! Scheduling engine.
//!
//! Pure decision logic with no persistence or transport concerns:
//!
//! - [`interval`]: half-open time-interval arithmetic
//! - [`conflict`]: room and person double-booking detection
//! - [`capacity`]: role exclusivity and advisor load ceilings
//! - [`period_machine`]: academic period lifecycle transitions
//! - [`batch_machine`]: defense schedule batch lifecycle transitions
//! - [`slots`]: candidate slot enumeration from working-hours settings
//! - [`error`]: the structured rejection taxonomy shared by all of the above
//!
//! Everything here is synchronous and side-effect free over its inputs; the
//! service layer owns loading the committed corpus, serializing commits, and
//! writing accepted results back.

pub mod batch_machine;
pub mod capacity;
pub mod conflict;
pub mod error;
pub mod interval;
pub mod period_machine;
pub mod slots;

pub use capacity::{check_capacity, AdvisorLoads, CapacityViolation};
pub use conflict::{find_conflicts, ConflictFinding, ConflictReason};
pub use error::{GenerationFailure, ScheduleError, StateError, ValidationError};
pub use interval::overlaps;
