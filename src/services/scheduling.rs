//! Event proposal and withdrawal.
//!
//! The conflict and capacity checks in the engine are pure; what makes them
//! safe is that every check-then-commit sequence for a period runs under that
//! period's lock. Two proposals for different periods proceed in parallel,
//! two for the same period serialize.

use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use crate::api::{CaseId, EventId, PeriodId, RoomId};
use crate::db::repository::FullRepository;
use crate::engine::batch_machine;
use crate::engine::capacity::{check_capacity, AdvisorLoads};
use crate::engine::conflict::find_conflicts;
use crate::engine::error::{ScheduleError, StateError, ValidationError};
use crate::engine::period_machine;
use crate::models::event::{Assignment, DefenseEvent, TimeSlot};
use crate::models::period::PeriodStatus;
use crate::models::time::ClockTime;

/// One async mutex per period, created on first use.
///
/// The outer map lock is a short synchronous `parking_lot` lock and is never
/// held across an await point; callers clone the `Arc` out and await on the
/// inner lock.
#[derive(Default)]
pub struct PeriodLocks {
    inner: Mutex<HashMap<PeriodId, Arc<tokio::sync::Mutex<()>>>>,
}

impl PeriodLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// The commit lock for a period, creating it on first use.
    pub fn lock_for(&self, period_id: PeriodId) -> Arc<tokio::sync::Mutex<()>> {
        self.inner
            .lock()
            .entry(period_id)
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }

    /// Drop the lock entry of a deleted period.
    pub fn forget(&self, period_id: PeriodId) {
        self.inner.lock().remove(&period_id);
    }
}

/// A proposed defense event, as received from a caller.
#[derive(Debug, Clone)]
pub struct ProposeEvent {
    pub period_id: PeriodId,
    pub case_id: CaseId,
    pub room: RoomId,
    pub date: NaiveDate,
    pub start: ClockTime,
    pub end: ClockTime,
    pub assignments: Vec<Assignment>,
}

impl ProposeEvent {
    fn into_candidate(self) -> DefenseEvent {
        DefenseEvent {
            id: None,
            period_id: self.period_id,
            case_id: self.case_id,
            slot: TimeSlot {
                room: self.room,
                date: self.date,
                start: self.start,
                end: self.end,
            },
            assignments: self.assignments,
        }
    }
}

/// Validate a proposal against the committed corpus and commit it.
///
/// Order of checks: window shape, period state, batch mutability, then under
/// the period lock: conflicts against every committed event, capacity rules
/// against loads derived from the corpus. A rejection at any point leaves the
/// corpus untouched.
pub async fn propose_event(
    repo: &dyn FullRepository,
    locks: &PeriodLocks,
    proposal: ProposeEvent,
    now: DateTime<Utc>,
) -> Result<DefenseEvent, ScheduleError> {
    if proposal.end <= proposal.start {
        return Err(ValidationError::InvalidWindow {
            start: proposal.start,
            end: proposal.end,
        }
        .into());
    }

    let period = ensure_period_active(repo, proposal.period_id, now).await?;

    let lock = locks.lock_for(period.id);
    let _guard = lock.lock().await;

    // Read under the lock: a publication holding the lock ahead of this
    // proposal may have flipped the batch while the proposal waited.
    let batch = repo.ensure_batch(period.id).await?;
    if !batch_machine::is_mutable(&batch) {
        return Err(StateError::BatchPublished { period: period.id }.into());
    }

    let committed = repo.list_events_for_period(period.id).await?;
    let candidate = proposal.into_candidate();

    let findings = find_conflicts(&candidate, &committed);
    if !findings.is_empty() {
        return Err(ScheduleError::Conflict { findings });
    }

    let loads = AdvisorLoads::from_events(&committed);
    check_capacity(&candidate, &loads, &period.settings_snapshot)?;

    let stored = repo.insert_event(&candidate).await?;
    if let Some(id) = stored.id {
        info!(
            event_id = %id,
            case_id = %stored.case_id,
            period_id = %period.id,
            "defense event committed"
        );
    }
    Ok(stored)
}

/// Withdraw a committed event, freeing its slot and advisor load.
///
/// Allowed any time before the period's batch is PUBLISHED.
pub async fn withdraw_event(
    repo: &dyn FullRepository,
    locks: &PeriodLocks,
    event_id: EventId,
) -> Result<(), ScheduleError> {
    let event = repo.get_event(event_id).await?;

    let lock = locks.lock_for(event.period_id);
    let _guard = lock.lock().await;

    // Same ordering as proposals: mutability is only trustworthy once the
    // period lock is held.
    let batch = repo.ensure_batch(event.period_id).await?;
    if !batch_machine::is_mutable(&batch) {
        return Err(StateError::BatchPublished {
            period: event.period_id,
        }
        .into());
    }

    repo.delete_event(event_id).await?;
    info!(event_id = %event_id, period_id = %event.period_id, "defense event withdrawn");
    Ok(())
}

/// Load a period and require it to be effectively ACTIVE at `now`.
///
/// A due automatic activation noticed here is committed before proceeding,
/// so the read path itself performs the flip when the poller has not yet.
/// The flip is refused while a different period holds ACTIVE.
pub(crate) async fn ensure_period_active(
    repo: &dyn FullRepository,
    period_id: PeriodId,
    now: DateTime<Utc>,
) -> Result<crate::models::period::Period, ScheduleError> {
    let mut period = repo.get_period(period_id).await?;
    if period_machine::effective_status(&period, now) == PeriodStatus::Active
        && period.status != PeriodStatus::Active
    {
        if let Some(active) = repo.find_active_period().await? {
            if active.id != period.id {
                return Err(StateError::AnotherPeriodActive { period: active.id }.into());
            }
        }
        if period_machine::reconcile(&mut period, now) {
            repo.update_period(&period).await?;
            info!(period_id = %period.id, "scheduled activation committed on read");
        }
    }
    if !period.is_active() {
        return Err(StateError::PeriodNotActive { period: period.id }.into());
    }
    Ok(period)
}
