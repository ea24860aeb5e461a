//! Defense event repository trait.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::api::{EventId, PeriodId};
use crate::models::event::DefenseEvent;

/// Repository trait for the committed defense-event corpus.
///
/// The corpus for one period is the only mutable shared state in the
/// scheduling subsystem. Conflict and capacity decisions read it, and commits
/// append to it; the service layer serializes that read-then-decide-then-write
/// sequence per period.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Insert a validated event and return it with its assigned id.
    async fn insert_event(&self, event: &DefenseEvent) -> RepositoryResult<DefenseEvent>;

    /// Retrieve a single event by id.
    async fn get_event(&self, event_id: EventId) -> RepositoryResult<DefenseEvent>;

    /// All committed events of a period.
    async fn list_events_for_period(
        &self,
        period_id: PeriodId,
    ) -> RepositoryResult<Vec<DefenseEvent>>;

    /// Remove a withdrawn event from the corpus.
    async fn delete_event(&self, event_id: EventId) -> RepositoryResult<()>;
}
