//! Data Transfer Objects for the HTTP API.
//!
//! Request and response bodies for the REST surface. Domain types already
//! serialize cleanly; the DTOs here flatten ids to raw integers and keep the
//! wire shape stable independent of internal struct layout.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::api::{CaseId, PersonId, RoomId};
use crate::models::batch::{BatchStatus, ScheduleBatch};
use crate::models::event::{Assignment, DefenseEvent, Role};
use crate::models::period::{Period, PeriodStatus};
use crate::models::time::ClockTime;
use crate::services::generator::{GenerationOutcome, PendingCase};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
}

// =============================================================================
// Periods
// =============================================================================

/// Request body for creating a period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePeriodRequest {
    pub academic_year: i32,
    pub name: String,
    /// Optional future activation instant, armed at creation.
    #[serde(default)]
    pub scheduled_open: Option<DateTime<Utc>>,
}

/// Request body carrying a single future instant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleInstantRequest {
    pub instant: DateTime<Utc>,
}

/// Request body for closing a period.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ClosePeriodRequest {
    #[serde(default)]
    pub note: Option<String>,
}

/// A period as exposed over the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodDto {
    pub id: i64,
    pub academic_year: i32,
    pub name: String,
    pub status: PeriodStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_open: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opened_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closing_note: Option<String>,
}

impl From<Period> for PeriodDto {
    fn from(p: Period) -> Self {
        Self {
            id: p.id.value(),
            academic_year: p.academic_year,
            name: p.name,
            status: p.status,
            scheduled_open: p.scheduled_open,
            opened_at: p.opened_at,
            closed_at: p.closed_at,
            closing_note: p.closing_note,
        }
    }
}

/// Response for the period list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodListResponse {
    pub periods: Vec<PeriodDto>,
    pub total: usize,
}

/// Response for the period status endpoint: stored row plus the state a
/// reader should observe right now.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodStatusResponse {
    pub period: PeriodDto,
    pub effective_status: PeriodStatus,
}

// =============================================================================
// Events
// =============================================================================

/// One person/role pair in a proposal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentDto {
    pub person: i64,
    pub role: Role,
}

impl From<AssignmentDto> for Assignment {
    fn from(dto: AssignmentDto) -> Self {
        Assignment::new(PersonId::new(dto.person), dto.role)
    }
}

/// Request body for proposing a defense event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposeEventRequest {
    pub case_id: i64,
    pub room: i64,
    pub date: NaiveDate,
    pub start: ClockTime,
    pub end: ClockTime,
    pub assignments: Vec<AssignmentDto>,
}

/// A committed defense event as exposed over the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDto {
    pub id: i64,
    pub period_id: i64,
    pub case_id: i64,
    pub room: i64,
    pub date: NaiveDate,
    pub start: ClockTime,
    pub end: ClockTime,
    pub assignments: Vec<AssignmentDto>,
}

impl From<DefenseEvent> for EventDto {
    fn from(e: DefenseEvent) -> Self {
        Self {
            id: e.id.map(|id| id.value()).unwrap_or_default(),
            period_id: e.period_id.value(),
            case_id: e.case_id.value(),
            room: e.slot.room.value(),
            date: e.slot.date,
            start: e.slot.start,
            end: e.slot.end,
            assignments: e
                .assignments
                .into_iter()
                .map(|a| AssignmentDto {
                    person: a.person.value(),
                    role: a.role,
                })
                .collect(),
        }
    }
}

/// Response for the committed corpus endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventListResponse {
    pub events: Vec<EventDto>,
    pub total: usize,
}

// =============================================================================
// Batch
// =============================================================================

/// The batch row as exposed over the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchDto {
    pub period_id: i64,
    pub status: BatchStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_publish: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
}

impl From<ScheduleBatch> for BatchDto {
    fn from(b: ScheduleBatch) -> Self {
        Self {
            period_id: b.period_id.value(),
            status: b.status,
            scheduled_publish: b.scheduled_publish,
            generated_at: b.generated_at,
            checksum: b.checksum,
        }
    }
}

// =============================================================================
// Automatic generation
// =============================================================================

/// One pending case in a generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingCaseDto {
    pub case_id: i64,
    pub advisors: Vec<i64>,
}

impl From<PendingCaseDto> for PendingCase {
    fn from(dto: PendingCaseDto) -> Self {
        PendingCase {
            case_id: CaseId::new(dto.case_id),
            advisors: dto.advisors.into_iter().map(PersonId::new).collect(),
        }
    }
}

/// Request body for the automatic timetable fill.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub cases: Vec<PendingCaseDto>,
    pub examiner_pool: Vec<i64>,
    pub rooms: Vec<i64>,
    pub dates: Vec<NaiveDate>,
}

impl GenerateRequest {
    pub fn rooms(&self) -> Vec<RoomId> {
        self.rooms.iter().copied().map(RoomId::new).collect()
    }

    pub fn examiner_pool(&self) -> Vec<PersonId> {
        self.examiner_pool
            .iter()
            .copied()
            .map(PersonId::new)
            .collect()
    }
}

/// Response for the automatic timetable fill.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub scheduled: Vec<EventDto>,
    pub unplaced: Vec<i64>,
}

impl From<GenerationOutcome> for GenerateResponse {
    fn from(outcome: GenerationOutcome) -> Self {
        Self {
            scheduled: outcome.scheduled.into_iter().map(Into::into).collect(),
            unplaced: outcome.unplaced.into_iter().map(|c| c.value()).collect(),
        }
    }
}
