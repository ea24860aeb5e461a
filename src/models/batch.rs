//! Defense schedule batch domain type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::{BatchId, PeriodId};

/// Lifecycle status of a period's defense schedule batch.
///
/// PUBLISHED is terminal; re-generation requires a superseding batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BatchStatus {
    NotScheduled,
    Scheduled,
    Published,
}

/// The complete set of defense events generated/published together for one
/// period. The batch row tracks publication state; the events themselves live
/// in the committed-event corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleBatch {
    pub id: BatchId,
    pub period_id: PeriodId,
    pub status: BatchStatus,
    /// Future instant at which the batch should auto-publish.
    /// Only meaningful while status is SCHEDULED.
    pub scheduled_publish: Option<DateTime<Utc>>,
    /// Set exactly once, when publication succeeds.
    pub generated_at: Option<DateTime<Utc>>,
    /// SHA-256 checksum of the published event snapshot.
    pub checksum: Option<String>,
}

impl ScheduleBatch {
    /// Fresh unscheduled batch for a period.
    pub fn new(id: BatchId, period_id: PeriodId) -> Self {
        Self {
            id,
            period_id,
            status: BatchStatus::NotScheduled,
            scheduled_publish: None,
            generated_at: None,
            checksum: None,
        }
    }

    pub fn is_published(&self) -> bool {
        self.status == BatchStatus::Published
    }
}
