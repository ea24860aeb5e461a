//! In-memory local repository implementation.
//!
//! This module provides a local implementation of all repository traits
//! suitable for unit testing and local development. All data is stored in
//! memory using HashMaps behind `parking_lot` locks, providing fast,
//! deterministic, and isolated execution. Locks are never held across await
//! points.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::api::{BatchId, EventId, PeriodId};
use crate::db::repository::{
    BatchRepository, EventRepository, NewPeriod, PeriodRepository, RepositoryError,
    RepositoryResult,
};
use crate::models::batch::ScheduleBatch;
use crate::models::event::DefenseEvent;
use crate::models::period::{Period, PeriodStatus};

/// In-memory repository.
///
/// # Example
/// ```ignore
/// let repo = LocalRepository::new();
/// let period = repo.create_period(new_period).await?;
/// ```
#[derive(Default)]
pub struct LocalRepository {
    periods: RwLock<HashMap<PeriodId, Period>>,
    events: RwLock<HashMap<EventId, DefenseEvent>>,
    batches: RwLock<HashMap<PeriodId, ScheduleBatch>>,
    next_period_id: AtomicI64,
    next_event_id: AtomicI64,
    next_batch_id: AtomicI64,
}

impl LocalRepository {
    pub fn new() -> Self {
        Self {
            periods: RwLock::new(HashMap::new()),
            events: RwLock::new(HashMap::new()),
            batches: RwLock::new(HashMap::new()),
            next_period_id: AtomicI64::new(1),
            next_event_id: AtomicI64::new(1),
            next_batch_id: AtomicI64::new(1),
        }
    }

    fn alloc_period_id(&self) -> PeriodId {
        PeriodId::new(self.next_period_id.fetch_add(1, Ordering::SeqCst))
    }

    fn alloc_event_id(&self) -> EventId {
        EventId::new(self.next_event_id.fetch_add(1, Ordering::SeqCst))
    }

    fn alloc_batch_id(&self) -> BatchId {
        BatchId::new(self.next_batch_id.fetch_add(1, Ordering::SeqCst))
    }
}

#[async_trait]
impl PeriodRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(true)
    }

    async fn create_period(&self, new_period: NewPeriod) -> RepositoryResult<Period> {
        let mut periods = self.periods.write();

        if periods
            .values()
            .any(|p| p.academic_year == new_period.academic_year)
        {
            return Err(RepositoryError::ValidationError(format!(
                "a period for academic year {} already exists",
                new_period.academic_year
            )));
        }

        let period = Period {
            id: self.alloc_period_id(),
            academic_year: new_period.academic_year,
            name: new_period.name,
            status: PeriodStatus::Preparing,
            scheduled_open: new_period.scheduled_open,
            opened_at: None,
            closed_at: None,
            closing_note: None,
            settings_snapshot: new_period.settings_snapshot,
        };
        periods.insert(period.id, period.clone());
        Ok(period)
    }

    async fn get_period(&self, period_id: PeriodId) -> RepositoryResult<Period> {
        self.periods
            .read()
            .get(&period_id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(format!("period {} not found", period_id)))
    }

    async fn list_periods(&self) -> RepositoryResult<Vec<Period>> {
        let mut periods: Vec<Period> = self.periods.read().values().cloned().collect();
        periods.sort_by(|a, b| b.academic_year.cmp(&a.academic_year));
        Ok(periods)
    }

    async fn find_active_period(&self) -> RepositoryResult<Option<Period>> {
        Ok(self
            .periods
            .read()
            .values()
            .find(|p| p.status == PeriodStatus::Active)
            .cloned())
    }

    async fn update_period(&self, period: &Period) -> RepositoryResult<()> {
        let mut periods = self.periods.write();
        if !periods.contains_key(&period.id) {
            return Err(RepositoryError::NotFound(format!(
                "period {} not found",
                period.id
            )));
        }
        periods.insert(period.id, period.clone());
        Ok(())
    }

    async fn delete_period(&self, period_id: PeriodId) -> RepositoryResult<()> {
        if self.periods.write().remove(&period_id).is_none() {
            return Err(RepositoryError::NotFound(format!(
                "period {} not found",
                period_id
            )));
        }
        // Cascade: the period's events and batch row go with it.
        self.events
            .write()
            .retain(|_, event| event.period_id != period_id);
        self.batches.write().remove(&period_id);
        Ok(())
    }
}

#[async_trait]
impl EventRepository for LocalRepository {
    async fn insert_event(&self, event: &DefenseEvent) -> RepositoryResult<DefenseEvent> {
        if event.id.is_some() {
            return Err(RepositoryError::ValidationError(
                "event to insert must not carry an id".to_string(),
            ));
        }
        let id = self.alloc_event_id();
        let mut stored = event.clone();
        stored.id = Some(id);
        self.events.write().insert(id, stored.clone());
        Ok(stored)
    }

    async fn get_event(&self, event_id: EventId) -> RepositoryResult<DefenseEvent> {
        self.events
            .read()
            .get(&event_id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(format!("event {} not found", event_id)))
    }

    async fn list_events_for_period(
        &self,
        period_id: PeriodId,
    ) -> RepositoryResult<Vec<DefenseEvent>> {
        let mut events: Vec<DefenseEvent> = self
            .events
            .read()
            .values()
            .filter(|e| e.period_id == period_id)
            .cloned()
            .collect();
        events.sort_by_key(|e| (e.slot.date, e.slot.start, e.slot.room.value()));
        Ok(events)
    }

    async fn delete_event(&self, event_id: EventId) -> RepositoryResult<()> {
        if self.events.write().remove(&event_id).is_none() {
            return Err(RepositoryError::NotFound(format!(
                "event {} not found",
                event_id
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl BatchRepository for LocalRepository {
    async fn ensure_batch(&self, period_id: PeriodId) -> RepositoryResult<ScheduleBatch> {
        if !self.periods.read().contains_key(&period_id) {
            return Err(RepositoryError::NotFound(format!(
                "period {} not found",
                period_id
            )));
        }
        let mut batches = self.batches.write();
        let batch = batches
            .entry(period_id)
            .or_insert_with(|| ScheduleBatch::new(self.alloc_batch_id(), period_id));
        Ok(batch.clone())
    }

    async fn update_batch(&self, batch: &ScheduleBatch) -> RepositoryResult<()> {
        let mut batches = self.batches.write();
        if !batches.contains_key(&batch.period_id) {
            return Err(RepositoryError::NotFound(format!(
                "no batch for period {}",
                batch.period_id
            )));
        }
        batches.insert(batch.period_id, batch.clone());
        Ok(())
    }

    async fn list_batches(&self) -> RepositoryResult<Vec<ScheduleBatch>> {
        Ok(self.batches.read().values().cloned().collect())
    }
}
