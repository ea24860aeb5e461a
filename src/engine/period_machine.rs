//! Academic period state machine.
//!
//! PREPARING → ACTIVE → CLOSED, with an optional future open instant while
//! PREPARING. There is no background timer: [`effective_status`] computes the
//! state a reader should observe at `now`, and [`reconcile`] commits the flip
//! the first time a caller path notices the instant has passed. Calling
//! `reconcile` repeatedly with the same `now` is safe; the flip happens at
//! most once because the status field only advances.

use chrono::{DateTime, Utc};

use crate::engine::error::{ScheduleError, StateError, ValidationError};
use crate::models::period::{Period, PeriodStatus};

/// Pure evaluation of the state a reader should observe at `now`.
///
/// A PREPARING period whose scheduled open instant has passed reads as
/// ACTIVE even before any writer has committed the flip.
pub fn effective_status(period: &Period, now: DateTime<Utc>) -> PeriodStatus {
    match (period.status, period.scheduled_open) {
        (PeriodStatus::Preparing, Some(instant)) if now >= instant => PeriodStatus::Active,
        (status, _) => status,
    }
}

/// Commit a due automatic activation. Returns `true` when the authoritative
/// state flipped during this call, `false` when there was nothing to do.
pub fn reconcile(period: &mut Period, now: DateTime<Utc>) -> bool {
    match (period.status, period.scheduled_open) {
        (PeriodStatus::Preparing, Some(instant)) if now >= instant => {
            period.status = PeriodStatus::Active;
            // The activation is attributed to the target instant, not to
            // whichever poll happened to notice it.
            period.opened_at = Some(instant);
            period.scheduled_open = None;
            true
        }
        _ => false,
    }
}

/// Arm a future automatic activation. The period stays in PREPARING.
pub fn schedule_open(
    period: &mut Period,
    instant: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<(), ScheduleError> {
    if period.status != PeriodStatus::Preparing {
        return Err(StateError::PeriodNotPreparing { period: period.id }.into());
    }
    if instant <= now {
        return Err(ValidationError::PastInstant { instant }.into());
    }
    period.scheduled_open = Some(instant);
    Ok(())
}

/// Disarm a pending scheduled activation.
pub fn cancel_schedule(period: &mut Period) -> Result<(), StateError> {
    if period.status != PeriodStatus::Preparing {
        return Err(StateError::PeriodNotPreparing { period: period.id });
    }
    if period.scheduled_open.is_none() {
        return Err(StateError::PeriodNotArmed { period: period.id });
    }
    period.scheduled_open = None;
    Ok(())
}

/// Activate immediately, clearing any pending scheduled instant.
pub fn open_now(period: &mut Period, now: DateTime<Utc>) -> Result<(), StateError> {
    if period.status != PeriodStatus::Preparing {
        return Err(StateError::PeriodNotPreparing { period: period.id });
    }
    period.status = PeriodStatus::Active;
    period.opened_at = Some(now);
    period.scheduled_open = None;
    Ok(())
}

/// Close an active period. Irreversible.
pub fn close(period: &mut Period, note: Option<String>, now: DateTime<Utc>) -> Result<(), StateError> {
    if period.status != PeriodStatus::Active {
        return Err(StateError::PeriodNotActive { period: period.id });
    }
    period.status = PeriodStatus::Closed;
    period.closed_at = Some(now);
    period.closing_note = note;
    Ok(())
}

/// Hard removal is only allowed once a period is CLOSED.
pub fn ensure_deletable(period: &Period) -> Result<(), StateError> {
    if period.status != PeriodStatus::Closed {
        return Err(StateError::PeriodNotClosed { period: period.id });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::PeriodId;
    use crate::config::SchedulingSettings;
    use chrono::Duration;

    fn period() -> Period {
        Period {
            id: PeriodId::new(1),
            academic_year: 2025,
            name: "Defense Period 2025".to_string(),
            status: PeriodStatus::Preparing,
            scheduled_open: None,
            opened_at: None,
            closed_at: None,
            closing_note: None,
            settings_snapshot: SchedulingSettings::default(),
        }
    }

    #[test]
    fn test_scheduled_open_flips_exactly_once() {
        let t0 = Utc::now();
        let target = t0 + Duration::hours(1);

        let mut p = period();
        schedule_open(&mut p, target, t0).unwrap();

        // Before the instant: still PREPARING, nothing committed.
        assert_eq!(effective_status(&p, t0), PeriodStatus::Preparing);
        assert!(!reconcile(&mut p, t0));
        assert_eq!(p.status, PeriodStatus::Preparing);

        // After the instant: effective view reads ACTIVE even before commit.
        let later = target + Duration::seconds(1);
        assert_eq!(effective_status(&p, later), PeriodStatus::Active);

        // First reconcile commits; repeats are no-ops with the same result.
        assert!(reconcile(&mut p, later));
        assert_eq!(p.status, PeriodStatus::Active);
        assert_eq!(p.opened_at, Some(target));
        assert!(p.scheduled_open.is_none());

        assert!(!reconcile(&mut p, later));
        assert_eq!(p.status, PeriodStatus::Active);
    }

    #[test]
    fn test_schedule_open_rejects_past_instant() {
        let now = Utc::now();
        let mut p = period();
        let err = schedule_open(&mut p, now - Duration::minutes(5), now).unwrap_err();
        assert_eq!(err.code(), "PAST_INSTANT");
        assert!(p.scheduled_open.is_none());

        // Exactly-now is also rejected; "strictly in the future".
        let err = schedule_open(&mut p, now, now).unwrap_err();
        assert_eq!(err.code(), "PAST_INSTANT");
    }

    #[test]
    fn test_open_now_clears_pending_schedule() {
        let now = Utc::now();
        let mut p = period();
        schedule_open(&mut p, now + Duration::days(1), now).unwrap();

        open_now(&mut p, now).unwrap();
        assert_eq!(p.status, PeriodStatus::Active);
        assert!(p.scheduled_open.is_none());
        assert_eq!(p.opened_at, Some(now));
    }

    #[test]
    fn test_cancel_schedule() {
        let now = Utc::now();
        let mut p = period();

        // Nothing armed yet.
        assert_eq!(
            cancel_schedule(&mut p),
            Err(StateError::PeriodNotArmed { period: p.id })
        );

        schedule_open(&mut p, now + Duration::hours(2), now).unwrap();
        cancel_schedule(&mut p).unwrap();
        assert!(p.scheduled_open.is_none());
        assert_eq!(p.status, PeriodStatus::Preparing);
    }

    #[test]
    fn test_closed_is_terminal() {
        let now = Utc::now();
        let mut p = period();
        open_now(&mut p, now).unwrap();
        close(&mut p, Some("wrapped up".to_string()), now).unwrap();

        assert_eq!(p.status, PeriodStatus::Closed);
        assert_eq!(p.closing_note.as_deref(), Some("wrapped up"));

        // No transition leads out of CLOSED.
        assert!(open_now(&mut p, now).is_err());
        assert!(close(&mut p, None, now).is_err());
        assert!(schedule_open(&mut p, now + Duration::hours(1), now).is_err());
        assert!(!reconcile(&mut p, now + Duration::days(365)));

        // But deletion becomes allowed.
        assert!(ensure_deletable(&p).is_ok());
    }

    #[test]
    fn test_delete_requires_closed() {
        let p = period();
        assert_eq!(
            ensure_deletable(&p),
            Err(StateError::PeriodNotClosed { period: p.id })
        );
    }

    #[test]
    fn test_close_requires_active() {
        let now = Utc::now();
        let mut p = period();
        assert_eq!(
            close(&mut p, None, now),
            Err(StateError::PeriodNotActive { period: p.id })
        );
    }
}
