//! Application state for the HTTP server.

use std::sync::Arc;

use crate::config::SchedulingSettings;
use crate::db::repository::FullRepository;
use crate::services::PeriodLocks;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for storage operations
    pub repository: Arc<dyn FullRepository>,
    /// Per-period commit serialization locks
    pub locks: Arc<PeriodLocks>,
    /// Process-wide scheduling settings, snapshotted into new periods
    pub settings: Arc<SchedulingSettings>,
}

impl AppState {
    /// Create a new application state with the given repository and settings.
    pub fn new(repository: Arc<dyn FullRepository>, settings: SchedulingSettings) -> Self {
        Self {
            repository,
            locks: Arc::new(PeriodLocks::new()),
            settings: Arc::new(settings),
        }
    }
}
