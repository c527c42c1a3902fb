//! Employee management handlers

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    error::ApiError,
    middleware::AuthEmployee,
    models::{EmployeeResponse, NewEmployee, UpdateEmployee},
    state::AppState,
    validation,
};

/// List all employees (admin only), newest first
pub async fn list_employees(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthEmployee>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_admin()?;

    let employees = state.employee_repository.get_all().await.map_err(|e| {
        error!("Failed to list employees: {}", e);
        ApiError::InternalServerError
    })?;

    let employees: Vec<EmployeeResponse> =
        employees.into_iter().map(EmployeeResponse::from).collect();

    Ok(Json(employees))
}

/// Create a new employee (admin only)
pub async fn create_employee(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthEmployee>,
    Json(payload): Json<NewEmployee>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_admin()?;

    validation::validate_name(&payload.name).map_err(ApiError::BadRequest)?;
    validation::validate_email(&payload.email).map_err(ApiError::BadRequest)?;
    validation::validate_phone(&payload.phone).map_err(ApiError::BadRequest)?;
    validation::validate_password(&payload.password).map_err(ApiError::BadRequest)?;
    if let Some(color) = payload.color.as_deref() {
        validation::validate_color(color).map_err(ApiError::BadRequest)?;
    }

    let duplicate = state
        .employee_repository
        .email_taken(&payload.email, None)
        .await
        .map_err(|e| {
            error!("Failed to check for duplicate email: {}", e);
            ApiError::InternalServerError
        })?;

    if duplicate {
        return Err(ApiError::Conflict("Email already exists".to_string()));
    }

    let employee = state
        .employee_repository
        .create(&payload)
        .await
        .map_err(|e| {
            error!("Failed to create employee: {}", e);
            ApiError::InternalServerError
        })?;

    Ok((StatusCode::CREATED, Json(EmployeeResponse::from(employee))))
}

/// Get one employee; employees can only fetch their own record
pub async fn get_employee(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthEmployee>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    if !auth.can_access(id) {
        return Err(ApiError::Forbidden(
            "Access denied. You can only view your own data.".to_string(),
        ));
    }

    let employee = state
        .employee_repository
        .find_by_id(id)
        .await
        .map_err(|e| {
            error!("Failed to get employee: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound(format!("No employee matches ID {}", id)))?;

    Ok(Json(EmployeeResponse::from(employee)))
}

/// Update an employee (admin only); a provided password is re-hashed
pub async fn update_employee(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthEmployee>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateEmployee>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_admin()?;

    if let Some(name) = payload.name.as_deref() {
        validation::validate_name(name).map_err(ApiError::BadRequest)?;
    }
    if let Some(phone) = payload.phone.as_deref() {
        validation::validate_phone(phone).map_err(ApiError::BadRequest)?;
    }
    if let Some(color) = payload.color.as_deref() {
        validation::validate_color(color).map_err(ApiError::BadRequest)?;
    }
    if let Some(password) = payload.password.as_deref() {
        validation::validate_password(password).map_err(ApiError::BadRequest)?;
    }

    if let Some(email) = payload.email.as_deref() {
        validation::validate_email(email).map_err(ApiError::BadRequest)?;

        let duplicate = state
            .employee_repository
            .email_taken(email, Some(id))
            .await
            .map_err(|e| {
                error!("Failed to check for duplicate email: {}", e);
                ApiError::InternalServerError
            })?;

        if duplicate {
            return Err(ApiError::Conflict("Email already exists".to_string()));
        }
    }

    let employee = state
        .employee_repository
        .update(id, &payload)
        .await
        .map_err(|e| {
            error!("Failed to update employee: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound(format!("No employee matches ID {}", id)))?;

    Ok(Json(EmployeeResponse::from(employee)))
}

/// Delete an employee (admin only); their shifts are removed by the
/// cascade on the schedules table
pub async fn delete_employee(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthEmployee>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_admin()?;

    let deleted = state.employee_repository.delete(id).await.map_err(|e| {
        error!("Failed to delete employee: {}", e);
        ApiError::InternalServerError
    })?;

    if !deleted {
        return Err(ApiError::NotFound(format!("No employee matches ID {}", id)));
    }

    info!("Deleted employee {} by {}", id, auth.email);
    Ok(Json(json!({"message": "Employee deleted successfully"})))
}

/// Get the authenticated employee's own profile
pub async fn my_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthEmployee>,
) -> Result<impl IntoResponse, ApiError> {
    let employee = state
        .employee_repository
        .find_by_id(auth.id)
        .await
        .map_err(|e| {
            error!("Failed to get profile: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Employee not found".to_string()))?;

    Ok(Json(EmployeeResponse::from(employee)))
}
