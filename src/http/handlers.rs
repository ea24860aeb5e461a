//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the service
//! layer for business logic. The current instant is taken once per request
//! and threaded through so a single request observes one consistent `now`.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use super::dto::{
    BatchDto, ClosePeriodRequest, CreatePeriodRequest, EventDto, EventListResponse,
    GenerateRequest, GenerateResponse, HealthResponse, PeriodDto, PeriodListResponse,
    PeriodStatusResponse, ProposeEventRequest, ScheduleInstantRequest,
};
use super::error::AppError;
use super::state::AppState;
use crate::api::{CaseId, EventId, PeriodId, RoomId};
use crate::services::{batches, generator, periods, scheduling};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match state.repository.health_check().await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Periods
// =============================================================================

/// GET /v1/periods
pub async fn list_periods(State(state): State<AppState>) -> HandlerResult<PeriodListResponse> {
    let all = periods::list_periods(state.repository.as_ref()).await?;
    let periods: Vec<PeriodDto> = all.into_iter().map(Into::into).collect();
    let total = periods.len();
    Ok(Json(PeriodListResponse { periods, total }))
}

/// POST /v1/periods
pub async fn create_period(
    State(state): State<AppState>,
    Json(request): Json<CreatePeriodRequest>,
) -> Result<(StatusCode, Json<PeriodDto>), AppError> {
    let period = periods::create_period(
        state.repository.as_ref(),
        request.academic_year,
        request.name,
        request.scheduled_open,
        &state.settings,
        Utc::now(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(period.into())))
}

/// GET /v1/periods/{id}/status
pub async fn get_period_status(
    State(state): State<AppState>,
    Path(period_id): Path<i64>,
) -> HandlerResult<PeriodStatusResponse> {
    let view = periods::get_period_status(
        state.repository.as_ref(),
        PeriodId::new(period_id),
        Utc::now(),
    )
    .await?;
    Ok(Json(PeriodStatusResponse {
        period: view.period.into(),
        effective_status: view.effective_status,
    }))
}

/// POST /v1/periods/{id}/open
pub async fn open_period(
    State(state): State<AppState>,
    Path(period_id): Path<i64>,
) -> HandlerResult<PeriodDto> {
    let period = periods::open_period_now(
        state.repository.as_ref(),
        PeriodId::new(period_id),
        Utc::now(),
    )
    .await?;
    Ok(Json(period.into()))
}

/// POST /v1/periods/{id}/schedule-open
pub async fn schedule_period_open(
    State(state): State<AppState>,
    Path(period_id): Path<i64>,
    Json(request): Json<ScheduleInstantRequest>,
) -> HandlerResult<PeriodDto> {
    let period = periods::schedule_period_open(
        state.repository.as_ref(),
        PeriodId::new(period_id),
        request.instant,
        Utc::now(),
    )
    .await?;
    Ok(Json(period.into()))
}

/// POST /v1/periods/{id}/cancel-schedule
pub async fn cancel_period_schedule(
    State(state): State<AppState>,
    Path(period_id): Path<i64>,
) -> HandlerResult<PeriodDto> {
    let period =
        periods::cancel_period_schedule(state.repository.as_ref(), PeriodId::new(period_id))
            .await?;
    Ok(Json(period.into()))
}

/// POST /v1/periods/{id}/close
pub async fn close_period(
    State(state): State<AppState>,
    Path(period_id): Path<i64>,
    Json(request): Json<ClosePeriodRequest>,
) -> HandlerResult<PeriodDto> {
    let period = periods::close_period(
        state.repository.as_ref(),
        PeriodId::new(period_id),
        request.note,
        Utc::now(),
    )
    .await?;
    Ok(Json(period.into()))
}

/// DELETE /v1/periods/{id}
pub async fn delete_period(
    State(state): State<AppState>,
    Path(period_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    periods::delete_period(
        state.repository.as_ref(),
        &state.locks,
        PeriodId::new(period_id),
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Events
// =============================================================================

/// POST /v1/periods/{id}/events
pub async fn propose_event(
    State(state): State<AppState>,
    Path(period_id): Path<i64>,
    Json(request): Json<ProposeEventRequest>,
) -> Result<(StatusCode, Json<EventDto>), AppError> {
    let proposal = scheduling::ProposeEvent {
        period_id: PeriodId::new(period_id),
        case_id: CaseId::new(request.case_id),
        room: RoomId::new(request.room),
        date: request.date,
        start: request.start,
        end: request.end,
        assignments: request.assignments.into_iter().map(Into::into).collect(),
    };

    let stored = scheduling::propose_event(
        state.repository.as_ref(),
        &state.locks,
        proposal,
        Utc::now(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(stored.into())))
}

/// GET /v1/periods/{id}/events
pub async fn list_events(
    State(state): State<AppState>,
    Path(period_id): Path<i64>,
) -> HandlerResult<EventListResponse> {
    let events = state
        .repository
        .list_events_for_period(PeriodId::new(period_id))
        .await?;
    let events: Vec<EventDto> = events.into_iter().map(Into::into).collect();
    let total = events.len();
    Ok(Json(EventListResponse { events, total }))
}

/// DELETE /v1/events/{id}
pub async fn withdraw_event(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    scheduling::withdraw_event(
        state.repository.as_ref(),
        &state.locks,
        EventId::new(event_id),
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /v1/periods/{id}/generate
pub async fn generate_schedule(
    State(state): State<AppState>,
    Path(period_id): Path<i64>,
    Json(request): Json<GenerateRequest>,
) -> HandlerResult<GenerateResponse> {
    let rooms = request.rooms();
    let pool = request.examiner_pool();
    let dates = request.dates.clone();
    let cases = request.cases.into_iter().map(Into::into).collect();

    let outcome = generator::auto_schedule(
        state.repository.as_ref(),
        &state.locks,
        PeriodId::new(period_id),
        cases,
        &pool,
        &rooms,
        &dates,
        Utc::now(),
    )
    .await?;
    Ok(Json(outcome.into()))
}

// =============================================================================
// Batch
// =============================================================================

/// GET /v1/periods/{id}/batch/status
pub async fn get_batch_status(
    State(state): State<AppState>,
    Path(period_id): Path<i64>,
) -> HandlerResult<BatchDto> {
    let batch =
        batches::get_batch_status(state.repository.as_ref(), PeriodId::new(period_id)).await?;
    Ok(Json(batch.into()))
}

/// POST /v1/periods/{id}/batch/schedule
pub async fn schedule_batch_publish(
    State(state): State<AppState>,
    Path(period_id): Path<i64>,
    Json(request): Json<ScheduleInstantRequest>,
) -> HandlerResult<BatchDto> {
    let batch = batches::schedule_batch_publish(
        state.repository.as_ref(),
        PeriodId::new(period_id),
        request.instant,
        Utc::now(),
    )
    .await?;
    Ok(Json(batch.into()))
}

/// POST /v1/periods/{id}/batch/cancel
pub async fn cancel_batch_schedule(
    State(state): State<AppState>,
    Path(period_id): Path<i64>,
) -> HandlerResult<BatchDto> {
    let batch =
        batches::cancel_batch_schedule(state.repository.as_ref(), PeriodId::new(period_id))
            .await?;
    Ok(Json(batch.into()))
}

/// POST /v1/periods/{id}/batch/publish
pub async fn publish_batch(
    State(state): State<AppState>,
    Path(period_id): Path<i64>,
) -> HandlerResult<BatchDto> {
    let batch = batches::publish_batch_now(
        state.repository.as_ref(),
        &state.locks,
        PeriodId::new(period_id),
        Utc::now(),
    )
    .await?;
    Ok(Json(batch.into()))
}
