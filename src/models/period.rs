//! Academic period domain type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::PeriodId;
use crate::config::SchedulingSettings;

/// Lifecycle status of an academic period.
///
/// At most one period is ACTIVE system-wide. CLOSED is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PeriodStatus {
    Preparing,
    Active,
    Closed,
}

/// A bounded academic cycle during which defense scheduling may occur.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Period {
    pub id: PeriodId,
    /// Academic-year label, e.g. 2025 for "2025/2026".
    pub academic_year: i32,
    pub name: String,
    pub status: PeriodStatus,
    /// Future instant at which the period should auto-activate.
    /// Only meaningful while status is PREPARING.
    pub scheduled_open: Option<DateTime<Utc>>,
    pub opened_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    pub closing_note: Option<String>,
    /// Scheduling settings captured when the period was created, so that
    /// later global settings edits do not change validation mid-period.
    pub settings_snapshot: SchedulingSettings,
}

impl Period {
    pub fn is_active(&self) -> bool {
        self.status == PeriodStatus::Active
    }
}
