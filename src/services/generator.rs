//! Automatic timetable fill.
//!
//! Walks the candidate slots of the requested dates and places pending cases
//! into free slots, picking the least-loaded examiners from the pool. Every
//! placement goes through the same conflict and capacity validation as a
//! manual proposal; cases that cannot be placed are reported, not forced.

use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashMap;
use tracing::info;

use crate::api::{CaseId, PeriodId, PersonId, RoomId};
use crate::db::repository::FullRepository;
use crate::engine::batch_machine;
use crate::engine::capacity::{check_capacity, AdvisorLoads};
use crate::engine::conflict::{find_conflicts, slot_is_free};
use crate::engine::error::{ScheduleError, StateError};
use crate::engine::slots::generate_slots;
use crate::models::event::{Assignment, DefenseEvent, Role, TimeSlot};
use crate::services::scheduling::{ensure_period_active, PeriodLocks};

const EXAMINER_ROLES: [Role; 3] = [Role::Examiner1, Role::Examiner2, Role::Examiner3];
const ADVISOR_ROLES: [Role; 2] = [Role::Advisor1, Role::Advisor2];

/// A case awaiting a slot, with its advisors already fixed.
#[derive(Debug, Clone)]
pub struct PendingCase {
    pub case_id: CaseId,
    pub advisors: Vec<PersonId>,
}

/// Result of one generation run.
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub scheduled: Vec<DefenseEvent>,
    pub unplaced: Vec<CaseId>,
}

/// Place pending cases into the period's free slots.
///
/// Slots are visited in date order, then per room in start order. For each
/// free slot the first still-pending case whose committee can be formed and
/// validated is committed there. Examiners are drawn from `examiner_pool`
/// by ascending committed examiner load, skipping the case's advisors and
/// anyone already booked in an overlapping window.
pub async fn auto_schedule(
    repo: &dyn FullRepository,
    locks: &PeriodLocks,
    period_id: PeriodId,
    pending: Vec<PendingCase>,
    examiner_pool: &[PersonId],
    rooms: &[RoomId],
    dates: &[NaiveDate],
    now: DateTime<Utc>,
) -> Result<GenerationOutcome, ScheduleError> {
    let period = ensure_period_active(repo, period_id, now).await?;

    let lock = locks.lock_for(period_id);
    let _guard = lock.lock().await;

    // Checked under the lock so a concurrent publication cannot slip in
    // between the check and the commits below.
    let batch = repo.ensure_batch(period_id).await?;
    if !batch_machine::is_mutable(&batch) {
        return Err(StateError::BatchPublished { period: period_id }.into());
    }

    let mut committed = repo.list_events_for_period(period_id).await?;
    let mut examiner_loads = examiner_load_counts(&committed);
    let mut remaining = pending;
    let mut scheduled = Vec::new();

    let settings = &period.settings_snapshot;
    let examiners_needed = settings.examiners_per_event.min(EXAMINER_ROLES.len());

    for &date in dates {
        if remaining.is_empty() {
            break;
        }
        for slot in generate_slots(date, rooms, settings) {
            if remaining.is_empty() {
                break;
            }
            if !slot_room_is_free(&slot, &committed) {
                continue;
            }

            let placed = remaining.iter().enumerate().find_map(|(idx, case)| {
                try_place(
                    case,
                    &slot,
                    period_id,
                    examiner_pool,
                    &examiner_loads,
                    examiners_needed,
                    &committed,
                    settings,
                )
                .map(|candidate| (idx, candidate))
            });

            if let Some((idx, candidate)) = placed {
                remaining.remove(idx);
                let stored = repo.insert_event(&candidate).await?;
                for examiner in stored.examiners() {
                    *examiner_loads.entry(examiner).or_insert(0) += 1;
                }
                committed.push(stored.clone());
                scheduled.push(stored);
            }
        }
    }

    let unplaced: Vec<CaseId> = remaining.iter().map(|c| c.case_id).collect();
    info!(
        period_id = %period_id,
        placed = scheduled.len(),
        unplaced = unplaced.len(),
        "automatic generation finished"
    );
    Ok(GenerationOutcome {
        scheduled,
        unplaced,
    })
}

/// Build and validate a candidate for one case in one slot. `None` when no
/// valid committee exists for the slot.
fn try_place(
    case: &PendingCase,
    slot: &TimeSlot,
    period_id: PeriodId,
    examiner_pool: &[PersonId],
    examiner_loads: &HashMap<PersonId, u32>,
    examiners_needed: usize,
    committed: &[DefenseEvent],
    settings: &crate::config::SchedulingSettings,
) -> Option<DefenseEvent> {
    // A case carrying more advisors than there are advisor roles can never
    // form a valid committee; it is reported as unplaced, never truncated.
    if case.advisors.len() > ADVISOR_ROLES.len() {
        return None;
    }

    let examiners = pick_examiners(
        case,
        slot,
        examiner_pool,
        examiner_loads,
        examiners_needed,
        committed,
    )?;

    let mut assignments: Vec<Assignment> = case
        .advisors
        .iter()
        .zip(ADVISOR_ROLES)
        .map(|(&person, role)| Assignment::new(person, role))
        .collect();
    assignments.extend(
        examiners
            .iter()
            .zip(EXAMINER_ROLES)
            .map(|(&person, role)| Assignment::new(person, role)),
    );

    let candidate = DefenseEvent {
        id: None,
        period_id,
        case_id: case.case_id,
        slot: *slot,
        assignments,
    };

    if !find_conflicts(&candidate, committed).is_empty() {
        return None;
    }
    let loads = AdvisorLoads::from_events(committed);
    check_capacity(&candidate, &loads, settings).ok()?;
    Some(candidate)
}

/// Least-loaded examiners from the pool that are free for the slot and not
/// advising the case. `None` when the pool cannot fill the committee.
fn pick_examiners(
    case: &PendingCase,
    slot: &TimeSlot,
    pool: &[PersonId],
    loads: &HashMap<PersonId, u32>,
    needed: usize,
    committed: &[DefenseEvent],
) -> Option<Vec<PersonId>> {
    let mut candidates: Vec<PersonId> = pool
        .iter()
        .copied()
        .filter(|p| !case.advisors.contains(p))
        .filter(|p| person_is_free(*p, slot, committed))
        .collect();
    if candidates.len() < needed {
        return None;
    }
    // Stable sort so equal loads fall back to pool order.
    candidates.sort_by_key(|p| loads.get(p).copied().unwrap_or(0));
    candidates.truncate(needed);
    Some(candidates)
}

fn person_is_free(person: PersonId, slot: &TimeSlot, committed: &[DefenseEvent]) -> bool {
    !committed.iter().any(|event| {
        event.slot.date == slot.date
            && event.involves(person)
            && crate::engine::interval::overlaps(
                slot.start,
                slot.end,
                event.slot.start,
                event.slot.end,
            )
    })
}

fn slot_room_is_free(slot: &TimeSlot, committed: &[DefenseEvent]) -> bool {
    let probe = DefenseEvent {
        id: None,
        period_id: PeriodId::new(0),
        case_id: CaseId::new(0),
        slot: *slot,
        assignments: Vec::new(),
    };
    slot_is_free(&probe, committed)
}

fn examiner_load_counts(events: &[DefenseEvent]) -> HashMap<PersonId, u32> {
    let mut counts = HashMap::new();
    for event in events {
        for examiner in event.examiners() {
            *counts.entry(examiner).or_insert(0) += 1;
        }
    }
    counts
}
