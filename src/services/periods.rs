//! Period lifecycle commands and reconciliation.
//!
//! At most one period is ACTIVE at any instant. Activation, whether manual
//! or by a due scheduled instant, is refused while another period holds
//! ACTIVE; a due instant that cannot be honored stays armed and is retried
//! on the next reconciliation pass.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::api::PeriodId;
use crate::config::SchedulingSettings;
use crate::db::repository::{FullRepository, NewPeriod};
use crate::engine::error::{ScheduleError, StateError, ValidationError};
use crate::engine::period_machine;
use crate::models::period::{Period, PeriodStatus};

/// A period together with the state a reader should observe at `now`.
#[derive(Debug, Clone)]
pub struct PeriodStatusView {
    pub period: Period,
    pub effective_status: PeriodStatus,
}

/// Create a PREPARING period, snapshotting the scheduling settings.
///
/// The snapshot freezes capacity ceilings and slot parameters for the
/// period's whole life; later changes to the process-wide settings do not
/// reach existing periods. An optional open instant may be armed at creation.
pub async fn create_period(
    repo: &dyn FullRepository,
    academic_year: i32,
    name: String,
    scheduled_open: Option<DateTime<Utc>>,
    settings: &SchedulingSettings,
    now: DateTime<Utc>,
) -> Result<Period, ScheduleError> {
    if let Some(instant) = scheduled_open {
        if instant <= now {
            return Err(ValidationError::PastInstant { instant }.into());
        }
    }

    let period = repo
        .create_period(NewPeriod {
            academic_year,
            name,
            scheduled_open,
            settings_snapshot: settings.clone(),
        })
        .await?;
    info!(period_id = %period.id, academic_year, "period created");
    Ok(period)
}

/// Activate a period immediately.
pub async fn open_period_now(
    repo: &dyn FullRepository,
    period_id: PeriodId,
    now: DateTime<Utc>,
) -> Result<Period, ScheduleError> {
    let mut period = repo.get_period(period_id).await?;

    if let Some(active) = repo.find_active_period().await? {
        if active.id != period_id {
            return Err(StateError::AnotherPeriodActive { period: active.id }.into());
        }
    }

    period_machine::open_now(&mut period, now)?;
    repo.update_period(&period).await?;
    info!(period_id = %period.id, "period opened");
    Ok(period)
}

/// Arm a future automatic activation.
pub async fn schedule_period_open(
    repo: &dyn FullRepository,
    period_id: PeriodId,
    instant: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<Period, ScheduleError> {
    let mut period = repo.get_period(period_id).await?;
    period_machine::schedule_open(&mut period, instant, now)?;
    repo.update_period(&period).await?;
    info!(period_id = %period.id, open_at = %instant, "period activation scheduled");
    Ok(period)
}

/// Disarm a pending scheduled activation.
pub async fn cancel_period_schedule(
    repo: &dyn FullRepository,
    period_id: PeriodId,
) -> Result<Period, ScheduleError> {
    let mut period = repo.get_period(period_id).await?;
    period_machine::cancel_schedule(&mut period)?;
    repo.update_period(&period).await?;
    info!(period_id = %period.id, "scheduled activation cancelled");
    Ok(period)
}

/// Close an active period. Irreversible.
pub async fn close_period(
    repo: &dyn FullRepository,
    period_id: PeriodId,
    note: Option<String>,
    now: DateTime<Utc>,
) -> Result<Period, ScheduleError> {
    let mut period = repo.get_period(period_id).await?;

    // A due activation that was never read still counts as ACTIVE here.
    if period_machine::reconcile(&mut period, now) {
        repo.update_period(&period).await?;
    }

    period_machine::close(&mut period, note, now)?;
    repo.update_period(&period).await?;
    info!(period_id = %period.id, "period closed");
    Ok(period)
}

/// Delete a CLOSED period, cascading to its events and batch row.
pub async fn delete_period(
    repo: &dyn FullRepository,
    locks: &super::PeriodLocks,
    period_id: PeriodId,
) -> Result<(), ScheduleError> {
    let period = repo.get_period(period_id).await?;
    period_machine::ensure_deletable(&period)?;
    repo.delete_period(period_id).await?;
    locks.forget(period_id);
    info!(period_id = %period_id, "period deleted");
    Ok(())
}

/// Read a period's effective state at `now`.
///
/// Pure with respect to storage: the commit of a due flip is left to the
/// reconciler or to the next mutating path that notices it.
pub async fn get_period_status(
    repo: &dyn FullRepository,
    period_id: PeriodId,
    now: DateTime<Utc>,
) -> Result<PeriodStatusView, ScheduleError> {
    let period = repo.get_period(period_id).await?;
    let effective_status = period_machine::effective_status(&period, now);
    Ok(PeriodStatusView {
        period,
        effective_status,
    })
}

/// List every period, newest academic year first.
pub async fn list_periods(repo: &dyn FullRepository) -> Result<Vec<Period>, ScheduleError> {
    Ok(repo.list_periods().await?)
}

/// Commit every due scheduled activation. Returns the ids that flipped.
///
/// The single-ACTIVE invariant is enforced here too: once one period
/// activates, further due candidates are skipped with a warning and stay
/// armed for a later pass.
pub async fn reconcile_periods(
    repo: &dyn FullRepository,
    now: DateTime<Utc>,
) -> Result<Vec<PeriodId>, ScheduleError> {
    let mut opened = Vec::new();

    for period in repo.list_periods().await? {
        let mut period = period;
        if period_machine::effective_status(&period, now) != PeriodStatus::Active
            || period.status == PeriodStatus::Active
        {
            continue;
        }

        if let Some(active) = repo.find_active_period().await? {
            warn!(
                period_id = %period.id,
                active_period_id = %active.id,
                "due activation skipped, another period is ACTIVE"
            );
            continue;
        }

        if period_machine::reconcile(&mut period, now) {
            repo.update_period(&period).await?;
            info!(period_id = %period.id, "scheduled activation committed");
            opened.push(period.id);
        }
    }

    Ok(opened)
}
