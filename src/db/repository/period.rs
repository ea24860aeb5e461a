//! Period repository trait for lifecycle storage operations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::error::RepositoryResult;
use crate::api::PeriodId;
use crate::config::SchedulingSettings;
use crate::models::period::Period;

/// Fields for creating a new period row. Periods are always created in
/// PREPARING; activation goes through the state machine.
#[derive(Debug, Clone)]
pub struct NewPeriod {
    pub academic_year: i32,
    pub name: String,
    pub scheduled_open: Option<DateTime<Utc>>,
    pub settings_snapshot: SchedulingSettings,
}

/// Repository trait for academic period storage.
///
/// The storage layer holds rows; every lifecycle rule lives in the engine and
/// service layers. The one structural duty here is answering "which period is
/// ACTIVE" from authoritative state, because the single-active invariant is
/// checked against this answer before any activation commits.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait PeriodRepository: Send + Sync {
    /// Check if the storage backend is healthy.
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Insert a new period in PREPARING and return it with its assigned id.
    ///
    /// Rejects a duplicate academic year with a validation error.
    async fn create_period(&self, new_period: NewPeriod) -> RepositoryResult<Period>;

    /// Retrieve a period by id.
    async fn get_period(&self, period_id: PeriodId) -> RepositoryResult<Period>;

    /// List all periods, newest academic year first.
    async fn list_periods(&self) -> RepositoryResult<Vec<Period>>;

    /// The single ACTIVE period, if any.
    async fn find_active_period(&self) -> RepositoryResult<Option<Period>>;

    /// Replace a period row with updated state.
    async fn update_period(&self, period: &Period) -> RepositoryResult<()>;

    /// Hard-remove a period row. Callers must have verified the period is
    /// CLOSED via [`crate::engine::period_machine::ensure_deletable`].
    async fn delete_period(&self, period_id: PeriodId) -> RepositoryResult<()>;
}
