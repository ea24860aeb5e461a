//! Repository trait definitions for storage operations.
//!
//! This module provides a collection of focused repository traits that
//! abstract storage operations. By splitting responsibilities across multiple
//! traits, implementations can be more focused and testable.
//!
//! # Module Organization
//!
//! - [`error`]: Error types for repository operations
//! - [`period`]: Academic period rows and the single-active lookup
//! - [`event`]: The committed defense-event corpus
//! - [`batch`]: Per-period schedule batch rows
//!
//! # Convenience Trait Bound
//!
//! For functions that need all repository capabilities, use the
//! [`FullRepository`] trait bound:
//!
//! ```ignore
//! async fn my_service(repo: &dyn FullRepository) -> RepositoryResult<()> {
//!     let period = repo.get_period(period_id).await?;
//!     let events = repo.list_events_for_period(period.id).await?;
//!     Ok(())
//! }
//! ```

pub mod batch;
pub mod error;
pub mod event;
pub mod period;

// Re-export error types
pub use error::{RepositoryError, RepositoryResult};

// Re-export all traits
pub use batch::BatchRepository;
pub use event::EventRepository;
pub use period::{NewPeriod, PeriodRepository};

/// Composite trait bound for a complete repository implementation.
///
/// This trait is automatically implemented for any type that implements all
/// three repository traits. Use this as a convenient bound when you need
/// access to every storage operation.
pub trait FullRepository: PeriodRepository + EventRepository + BatchRepository {}

// Blanket implementation: any type implementing all three traits
// automatically implements FullRepository
impl<T> FullRepository for T where T: PeriodRepository + EventRepository + BatchRepository {}
