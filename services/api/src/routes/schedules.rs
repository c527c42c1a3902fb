//! Schedule management handlers

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::{
    error::ApiError,
    middleware::AuthEmployee,
    models::{NewSchedule, Position, UpdateSchedule},
    state::AppState,
    validation,
};

/// Query parameters for the date-range listing
#[derive(Debug, Deserialize)]
pub struct DateRangeQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// List shifts: admins see everything, employees only their own
pub async fn list_schedules(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthEmployee>,
) -> Result<impl IntoResponse, ApiError> {
    let schedules = state
        .schedule_repository
        .get_all(auth.schedule_filter())
        .await
        .map_err(|e| {
            error!("Failed to list schedules: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(schedules))
}

/// List the authenticated employee's own shifts
pub async fn my_schedules(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthEmployee>,
) -> Result<impl IntoResponse, ApiError> {
    let schedules = state
        .schedule_repository
        .get_all(Some(auth.id))
        .await
        .map_err(|e| {
            error!("Failed to list schedules: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(schedules))
}

/// List one employee's shifts; employees can only ask for their own
pub async fn schedules_by_employee(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthEmployee>,
    Path(employee_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    if !auth.can_access(employee_id) {
        return Err(ApiError::Forbidden(
            "Access denied. You can only view your own data.".to_string(),
        ));
    }

    let schedules = state
        .schedule_repository
        .get_all(Some(employee_id))
        .await
        .map_err(|e| {
            error!("Failed to list employee schedules: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(schedules))
}

/// List shifts in an inclusive day range, with the ownership filter
pub async fn schedules_by_date_range(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthEmployee>,
    Query(query): Query<DateRangeQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (Some(start_date), Some(end_date)) = (query.start_date, query.end_date) else {
        return Err(ApiError::BadRequest(
            "Start date and end date are required.".to_string(),
        ));
    };

    let schedules = state
        .schedule_repository
        .get_by_date_range(start_date, end_date, auth.schedule_filter())
        .await
        .map_err(|e| {
            error!("Failed to list schedules by date range: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(schedules))
}

/// Get one shift; employees can only fetch their own
pub async fn get_schedule(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthEmployee>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let schedule = state
        .schedule_repository
        .get(id)
        .await
        .map_err(|e| {
            error!("Failed to get schedule: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound(format!("No schedule matches ID {}", id)))?;

    if !auth.can_access(schedule.employee.id) {
        return Err(ApiError::Forbidden(
            "Access denied. You can only view your own data.".to_string(),
        ));
    }

    Ok(Json(schedule))
}

/// Create a new shift (admin only). Rejected with 409 when it overlaps an
/// existing shift for the same employee and date.
pub async fn create_schedule(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthEmployee>,
    Json(payload): Json<NewSchedule>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_admin()?;

    validation::validate_time_range(&payload.start_time, &payload.end_time)
        .map_err(ApiError::BadRequest)?;
    if let Some(note) = payload.note.as_deref() {
        validation::validate_note(note).map_err(ApiError::BadRequest)?;
    }

    let schedule = state.schedule_repository.create(&payload).await?;

    Ok((StatusCode::CREATED, Json(schedule)))
}

/// Update a shift (admin only). Timing changes re-run the conflict check
/// with the edited shift excluded from the existing set.
pub async fn update_schedule(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthEmployee>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSchedule>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_admin()?;

    if let Some(start_time) = payload.start_time.as_deref() {
        validation::validate_time(start_time).map_err(ApiError::BadRequest)?;
    }
    if let Some(end_time) = payload.end_time.as_deref() {
        validation::validate_time(end_time).map_err(ApiError::BadRequest)?;
    }
    if let Some(note) = payload.note.as_deref() {
        validation::validate_note(note).map_err(ApiError::BadRequest)?;
    }

    let schedule = state.schedule_repository.update(id, &payload).await?;

    Ok(Json(schedule))
}

/// Delete a shift (admin only)
pub async fn delete_schedule(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthEmployee>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_admin()?;

    let deleted = state.schedule_repository.delete(id).await.map_err(|e| {
        error!("Failed to delete schedule: {}", e);
        ApiError::InternalServerError
    })?;

    if !deleted {
        return Err(ApiError::NotFound(format!("No schedule matches ID {}", id)));
    }

    Ok(Json(json!({"message": "Schedule deleted successfully"})))
}

/// Delete all of one employee's shifts on one date (admin only)
pub async fn delete_employee_day(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthEmployee>,
    Path((employee_id, date)): Path<(Uuid, NaiveDate)>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_admin()?;

    let deleted = state
        .schedule_repository
        .delete_for_employee_day(employee_id, date)
        .await
        .map_err(|e| {
            error!("Failed to delete schedules: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(json!({"deleted_count": deleted})))
}

/// The fixed position vocabulary
pub async fn list_positions() -> impl IntoResponse {
    let positions: Vec<&'static str> = Position::ALL.iter().map(|p| p.as_str()).collect();
    Json(positions)
}
