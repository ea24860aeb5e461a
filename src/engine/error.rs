//! Structured rejection taxonomy for the scheduling engine.
//!
//! Four recoverable families plus repository propagation. No error here is
//! fatal to the process: a rejected proposal leaves the corpus unchanged and
//! the caller corrects its input.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::{CaseId, EventId, PeriodId};
use crate::db::repository::RepositoryError;
use crate::engine::capacity::CapacityViolation;
use crate::engine::conflict::ConflictFinding;
use crate::models::time::ClockTime;

/// Input rejected before any conflict or capacity check ran.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationError {
    #[error("invalid time window: end {end} is not after start {start}")]
    InvalidWindow { start: ClockTime, end: ClockTime },

    #[error("instant {instant} is not strictly in the future")]
    PastInstant { instant: DateTime<Utc> },
}

/// An operation applied against the wrong lifecycle state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StateError {
    #[error("period {period} is not in PREPARING")]
    PeriodNotPreparing { period: PeriodId },

    #[error("period {period} is not ACTIVE")]
    PeriodNotActive { period: PeriodId },

    #[error("period {period} must be CLOSED first")]
    PeriodNotClosed { period: PeriodId },

    #[error("period {period} has no scheduled open instant")]
    PeriodNotArmed { period: PeriodId },

    #[error("another period ({period}) is already ACTIVE")]
    AnotherPeriodActive { period: PeriodId },

    #[error("the schedule batch for period {period} is already PUBLISHED")]
    BatchPublished { period: PeriodId },

    #[error("the schedule batch for period {period} has no scheduled publication")]
    BatchNotScheduled { period: PeriodId },
}

/// One event that failed the final integrity re-check during batch
/// generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationFailure {
    pub event_id: EventId,
    pub case_id: CaseId,
    pub detail: String,
}

/// Top-level rejection type for every engine and service operation.
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("scheduling conflict: {} clash(es) with committed events", findings.len())]
    Conflict { findings: Vec<ConflictFinding> },

    #[error(transparent)]
    Capacity(#[from] CapacityViolation),

    #[error(transparent)]
    State(#[from] StateError),

    #[error("batch generation failed: {} event(s) no longer valid", failures.len())]
    Generation { failures: Vec<GenerationFailure> },

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ScheduleError {
    /// Stable machine-readable code for API payloads.
    pub fn code(&self) -> &'static str {
        match self {
            ScheduleError::Validation(ValidationError::InvalidWindow { .. }) => "INVALID_WINDOW",
            ScheduleError::Validation(ValidationError::PastInstant { .. }) => "PAST_INSTANT",
            ScheduleError::Conflict { .. } => "SCHEDULE_CONFLICT",
            ScheduleError::Capacity(violation) => violation.code(),
            ScheduleError::State(StateError::BatchPublished { .. }) => "BATCH_PUBLISHED",
            ScheduleError::State(StateError::AnotherPeriodActive { .. }) => "PERIOD_ALREADY_ACTIVE",
            ScheduleError::State(_) => "INVALID_STATE",
            ScheduleError::Generation { .. } => "GENERATION_FAILED",
            ScheduleError::Repository(_) => "REPOSITORY_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = ScheduleError::Validation(ValidationError::PastInstant {
            instant: Utc::now(),
        });
        assert_eq!(err.code(), "PAST_INSTANT");

        let err = ScheduleError::State(StateError::BatchPublished {
            period: PeriodId::new(1),
        });
        assert_eq!(err.code(), "BATCH_PUBLISHED");

        let err = ScheduleError::Capacity(CapacityViolation::ExaminerCountOutOfRange {
            count: 0,
            max: 4,
        });
        assert_eq!(err.code(), "EXAMINER_COUNT_OUT_OF_RANGE");

        let err = ScheduleError::Generation { failures: vec![] };
        assert_eq!(err.code(), "GENERATION_FAILED");
    }
}
