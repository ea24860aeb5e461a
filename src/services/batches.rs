//! Batch publication.
//!
//! Publication is the point of no return for a period's timetable. Before
//! flipping to PUBLISHED, every committed event is re-validated against the
//! rest of the corpus; a single stale event vetoes the whole batch and the
//! batch stays SCHEDULED with the failures reported. On success the event
//! set is fingerprinted and the batch becomes immutable.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::api::PeriodId;
use crate::db::checksum::calculate_checksum;
use crate::db::repository::{FullRepository, RepositoryError};
use crate::engine::batch_machine;
use crate::engine::capacity::{check_capacity, AdvisorLoads};
use crate::engine::conflict::find_conflicts;
use crate::engine::error::{GenerationFailure, ScheduleError};
use crate::models::batch::ScheduleBatch;
use crate::services::scheduling::PeriodLocks;

/// The batch row for a period, created lazily on first read.
pub async fn get_batch_status(
    repo: &dyn FullRepository,
    period_id: PeriodId,
) -> Result<ScheduleBatch, ScheduleError> {
    Ok(repo.ensure_batch(period_id).await?)
}

/// Arm (or re-arm) a future automatic publication.
pub async fn schedule_batch_publish(
    repo: &dyn FullRepository,
    period_id: PeriodId,
    instant: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<ScheduleBatch, ScheduleError> {
    let mut batch = repo.ensure_batch(period_id).await?;
    batch_machine::schedule_publish(&mut batch, instant, now)?;
    repo.update_batch(&batch).await?;
    info!(period_id = %period_id, publish_at = %instant, "batch publication scheduled");
    Ok(batch)
}

/// Disarm a pending publication.
pub async fn cancel_batch_schedule(
    repo: &dyn FullRepository,
    period_id: PeriodId,
) -> Result<ScheduleBatch, ScheduleError> {
    let mut batch = repo.ensure_batch(period_id).await?;
    batch_machine::cancel_schedule(&mut batch)?;
    repo.update_batch(&batch).await?;
    info!(period_id = %period_id, "batch publication cancelled");
    Ok(batch)
}

/// Publish a period's timetable now.
///
/// Runs the final integrity re-check under the period lock so no proposal
/// can slip in between validation and the flip. All-or-nothing: either every
/// event still passes and the batch flips to PUBLISHED, or nothing changes.
pub async fn publish_batch_now(
    repo: &dyn FullRepository,
    locks: &PeriodLocks,
    period_id: PeriodId,
    now: DateTime<Utc>,
) -> Result<ScheduleBatch, ScheduleError> {
    let lock = locks.lock_for(period_id);
    let _guard = lock.lock().await;

    let mut batch = repo.ensure_batch(period_id).await?;
    if !batch_machine::is_mutable(&batch) {
        return Err(crate::engine::error::StateError::BatchPublished { period: period_id }.into());
    }

    let period = repo.get_period(period_id).await?;
    let events = repo.list_events_for_period(period_id).await?;

    let mut failures = Vec::new();
    for event in &events {
        let event_id = match event.id {
            Some(id) => id,
            None => continue,
        };

        let findings = find_conflicts(event, &events);
        if !findings.is_empty() {
            failures.push(GenerationFailure {
                event_id,
                case_id: event.case_id,
                detail: format!("{} conflict(s) with other committed events", findings.len()),
            });
            continue;
        }

        let loads = AdvisorLoads::from_events_excluding(&events, Some(event_id));
        if let Err(violation) = check_capacity(event, &loads, &period.settings_snapshot) {
            failures.push(GenerationFailure {
                event_id,
                case_id: event.case_id,
                detail: violation.to_string(),
            });
        }
    }

    if !failures.is_empty() {
        warn!(
            period_id = %period_id,
            failed = failures.len(),
            "batch publication vetoed by integrity re-check"
        );
        return Err(ScheduleError::Generation { failures });
    }

    let snapshot = serde_json::to_string(&events)
        .map_err(|e| RepositoryError::InternalError(format!("snapshot serialization: {e}")))?;
    let checksum = calculate_checksum(&snapshot);

    batch_machine::mark_published(&mut batch, now, checksum)?;
    repo.update_batch(&batch).await?;
    info!(period_id = %period_id, events = events.len(), "batch published");
    Ok(batch)
}

/// Attempt every due scheduled publication. Returns the period ids that
/// published.
///
/// A due batch whose integrity re-check fails stays SCHEDULED; the failure
/// is logged and the next pass retries once the corpus is repaired.
pub async fn reconcile_batches(
    repo: &dyn FullRepository,
    locks: &PeriodLocks,
    now: DateTime<Utc>,
) -> Result<Vec<PeriodId>, ScheduleError> {
    let mut published = Vec::new();

    for batch in repo.list_batches().await? {
        if !batch_machine::is_publish_due(&batch, now) {
            continue;
        }
        match publish_batch_now(repo, locks, batch.period_id, now).await {
            Ok(_) => published.push(batch.period_id),
            Err(ScheduleError::Generation { failures }) => {
                warn!(
                    period_id = %batch.period_id,
                    failed = failures.len(),
                    "due publication left SCHEDULED, events no longer valid"
                );
            }
            Err(err) => return Err(err),
        }
    }

    Ok(published)
}
