//! Polling reconciliation driver.
//!
//! There are no durable timers: armed instants live in storage and this
//! driver polls every 15 seconds, committing whatever became due. When the
//! earliest upcoming instant lands within the next hour and before the next
//! tick, a one-shot sleep targets it exactly so transitions land on time
//! rather than up to a poll interval late.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::db::repository::FullRepository;
use crate::engine::error::ScheduleError;
use crate::models::batch::BatchStatus;
use crate::models::period::PeriodStatus;
use crate::services::scheduling::PeriodLocks;
use crate::services::{batches, periods};

/// Steady-state poll interval.
pub const POLL_INTERVAL: Duration = Duration::from_secs(15);

/// How far ahead the one-shot sleep is allowed to target an instant.
fn one_shot_horizon() -> ChronoDuration {
    ChronoDuration::hours(1)
}

/// What one pass committed.
#[derive(Debug, Default)]
pub struct PassOutcome {
    pub opened: Vec<crate::api::PeriodId>,
    pub published: Vec<crate::api::PeriodId>,
}

/// Run one reconciliation pass at `now`: commit due period activations, then
/// attempt due batch publications. Idempotent; a second call with the same
/// `now` finds nothing left to do.
pub async fn run_reconcile_pass(
    repo: &dyn FullRepository,
    locks: &PeriodLocks,
    now: DateTime<Utc>,
) -> Result<PassOutcome, ScheduleError> {
    let opened = periods::reconcile_periods(repo, now).await?;
    let published = batches::reconcile_batches(repo, locks, now).await?;

    if !opened.is_empty() || !published.is_empty() {
        info!(
            opened = opened.len(),
            published = published.len(),
            "reconciliation pass committed transitions"
        );
    }
    Ok(PassOutcome { opened, published })
}

/// Earliest armed instant still in the future, across period activations and
/// batch publications. `None` when nothing is armed.
pub async fn next_transition_instant(
    repo: &dyn FullRepository,
    now: DateTime<Utc>,
) -> Result<Option<DateTime<Utc>>, ScheduleError> {
    let mut earliest: Option<DateTime<Utc>> = None;
    let mut consider = |instant: DateTime<Utc>| {
        if instant > now && earliest.map(|e| instant < e).unwrap_or(true) {
            earliest = Some(instant);
        }
    };

    for period in repo.list_periods().await? {
        if period.status == PeriodStatus::Preparing {
            if let Some(instant) = period.scheduled_open {
                consider(instant);
            }
        }
    }
    for batch in repo.list_batches().await? {
        if batch.status == BatchStatus::Scheduled {
            if let Some(instant) = batch.scheduled_publish {
                consider(instant);
            }
        }
    }

    Ok(earliest)
}

/// Spawn the background reconciliation loop.
///
/// The loop never exits on its own; pass errors are logged and the next tick
/// retries.
pub fn spawn_reconciler(repo: Arc<dyn FullRepository>, locks: Arc<PeriodLocks>) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(interval_secs = POLL_INTERVAL.as_secs(), "reconciler started");
        loop {
            let now = Utc::now();
            if let Err(err) = run_reconcile_pass(repo.as_ref(), &locks, now).await {
                error!(error = %err, "reconciliation pass failed");
            }

            let sleep_for = match next_transition_instant(repo.as_ref(), now).await {
                Ok(Some(target)) if target - now <= one_shot_horizon() => {
                    match (target - now).to_std() {
                        Ok(lead) if lead < POLL_INTERVAL => {
                            debug!(target = %target, "one-shot sleep to exact instant");
                            lead
                        }
                        _ => POLL_INTERVAL,
                    }
                }
                Ok(_) => POLL_INTERVAL,
                Err(err) => {
                    error!(error = %err, "failed to compute next transition instant");
                    POLL_INTERVAL
                }
            };
            tokio::time::sleep(sleep_for).await;
        }
    })
}
