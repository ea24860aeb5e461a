//! Defense schedule batch state machine.
//!
//! NOT_SCHEDULED → SCHEDULED → PUBLISHED. Unlike the period machine, the
//! batch machine never flips state purely from the clock: publication is
//! gated on a generation step (the final integrity re-check of the committed
//! corpus), so the machine only exposes [`is_publish_due`] and the service
//! layer calls [`mark_published`] once generation succeeds. A due batch whose
//! generation keeps failing stays SCHEDULED with the error surfaced.

use chrono::{DateTime, Utc};

use crate::engine::error::{ScheduleError, StateError, ValidationError};
use crate::models::batch::{BatchStatus, ScheduleBatch};

/// Whether an armed publication instant has been reached.
pub fn is_publish_due(batch: &ScheduleBatch, now: DateTime<Utc>) -> bool {
    batch.status == BatchStatus::Scheduled
        && batch
            .scheduled_publish
            .map(|instant| now >= instant)
            .unwrap_or(false)
}

/// Arm (or re-arm) a future automatic publication.
///
/// Re-arming while already SCHEDULED simply moves the instant, matching the
/// behavior of updating an existing scheduling row.
pub fn schedule_publish(
    batch: &mut ScheduleBatch,
    instant: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<(), ScheduleError> {
    if batch.status == BatchStatus::Published {
        return Err(StateError::BatchPublished {
            period: batch.period_id,
        }
        .into());
    }
    if instant <= now {
        return Err(ValidationError::PastInstant { instant }.into());
    }
    batch.status = BatchStatus::Scheduled;
    batch.scheduled_publish = Some(instant);
    Ok(())
}

/// Disarm a pending publication, returning to NOT_SCHEDULED.
pub fn cancel_schedule(batch: &mut ScheduleBatch) -> Result<(), StateError> {
    if batch.status == BatchStatus::Published {
        return Err(StateError::BatchPublished {
            period: batch.period_id,
        });
    }
    if batch.status != BatchStatus::Scheduled {
        return Err(StateError::BatchNotScheduled {
            period: batch.period_id,
        });
    }
    batch.status = BatchStatus::NotScheduled;
    batch.scheduled_publish = None;
    Ok(())
}

/// Commit a successful publication. Only the service layer calls this, and
/// only after generation succeeded. PUBLISHED is terminal.
pub fn mark_published(
    batch: &mut ScheduleBatch,
    generated_at: DateTime<Utc>,
    checksum: String,
) -> Result<(), StateError> {
    if batch.status == BatchStatus::Published {
        return Err(StateError::BatchPublished {
            period: batch.period_id,
        });
    }
    batch.status = BatchStatus::Published;
    batch.scheduled_publish = None;
    batch.generated_at = Some(generated_at);
    batch.checksum = Some(checksum);
    Ok(())
}

/// Whether events of this batch's period may still be proposed, edited, or
/// withdrawn.
pub fn is_mutable(batch: &ScheduleBatch) -> bool {
    !batch.is_published()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{BatchId, PeriodId};
    use chrono::Duration;

    fn batch() -> ScheduleBatch {
        ScheduleBatch::new(BatchId::new(1), PeriodId::new(1))
    }

    #[test]
    fn test_schedule_and_cancel() {
        let now = Utc::now();
        let mut b = batch();

        schedule_publish(&mut b, now + Duration::hours(3), now).unwrap();
        assert_eq!(b.status, BatchStatus::Scheduled);

        cancel_schedule(&mut b).unwrap();
        assert_eq!(b.status, BatchStatus::NotScheduled);
        assert!(b.scheduled_publish.is_none());
    }

    #[test]
    fn test_cancel_requires_scheduled() {
        let mut b = batch();
        assert_eq!(
            cancel_schedule(&mut b),
            Err(StateError::BatchNotScheduled { period: b.period_id })
        );
    }

    #[test]
    fn test_rearming_moves_the_instant() {
        let now = Utc::now();
        let first = now + Duration::hours(1);
        let second = now + Duration::hours(2);

        let mut b = batch();
        schedule_publish(&mut b, first, now).unwrap();
        schedule_publish(&mut b, second, now).unwrap();
        assert_eq!(b.scheduled_publish, Some(second));
    }

    #[test]
    fn test_past_instant_rejected() {
        let now = Utc::now();
        let mut b = batch();
        let err = schedule_publish(&mut b, now - Duration::seconds(1), now).unwrap_err();
        assert_eq!(err.code(), "PAST_INSTANT");
        assert_eq!(b.status, BatchStatus::NotScheduled);
    }

    #[test]
    fn test_publish_due_only_when_armed_and_reached() {
        let now = Utc::now();
        let target = now + Duration::minutes(30);

        let mut b = batch();
        assert!(!is_publish_due(&b, now));

        schedule_publish(&mut b, target, now).unwrap();
        assert!(!is_publish_due(&b, now));
        assert!(is_publish_due(&b, target));
        assert!(is_publish_due(&b, target + Duration::seconds(1)));
    }

    #[test]
    fn test_published_is_terminal() {
        let now = Utc::now();
        let mut b = batch();
        schedule_publish(&mut b, now + Duration::hours(1), now).unwrap();
        mark_published(&mut b, now, "abc123".to_string()).unwrap();

        assert_eq!(b.status, BatchStatus::Published);
        assert_eq!(b.generated_at, Some(now));
        assert!(b.scheduled_publish.is_none());
        assert!(!is_mutable(&b));

        assert!(mark_published(&mut b, now, "def".to_string()).is_err());
        assert!(cancel_schedule(&mut b).is_err());
        assert!(schedule_publish(&mut b, now + Duration::hours(1), now).is_err());
    }
}
