//! Schedule batch repository trait.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::api::PeriodId;
use crate::models::batch::ScheduleBatch;

/// Repository trait for per-period schedule batch rows.
///
/// Every period owns exactly one current batch; it is created lazily in
/// NOT_SCHEDULED on first access so callers never see an absent row.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait BatchRepository: Send + Sync {
    /// The period's current batch, created in NOT_SCHEDULED if absent.
    async fn ensure_batch(&self, period_id: PeriodId) -> RepositoryResult<ScheduleBatch>;

    /// Replace a batch row with updated state.
    async fn update_batch(&self, batch: &ScheduleBatch) -> RepositoryResult<()>;

    /// All batch rows across periods; the reconciliation driver scans these
    /// for due publications.
    async fn list_batches(&self) -> RepositoryResult<Vec<ScheduleBatch>>;
}
