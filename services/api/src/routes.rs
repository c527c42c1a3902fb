//! Scheduling service routes
//!
//! Login, refresh and logout are public; everything else sits behind the
//! auth middleware. Management-only handlers additionally gate on the
//! Admin role of the authenticated employee.

use axum::{
    Extension, Json, Router,
    extract::State,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{delete, get, post},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::{
    error::ApiError,
    jwt::{TokenType, unix_now},
    middleware::{AuthEmployee, auth_middleware},
    models::{Employee, EmployeeResponse, NewEmployee},
    state::AppState,
    validation,
};

pub mod employees;
pub mod schedules;

/// Request for employee login
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request carrying a refresh token (refresh and logout)
#[derive(Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// The signed-in employee block returned alongside tokens
#[derive(Serialize)]
pub struct UserInfo {
    pub id: uuid::Uuid,
    pub name: String,
    pub email: String,
    pub color: String,
    pub roles: Vec<i32>,
}

impl From<&Employee> for UserInfo {
    fn from(employee: &Employee) -> Self {
        UserInfo {
            id: employee.id,
            name: employee.name.clone(),
            email: employee.email.clone(),
            color: employee.color.clone(),
            roles: employee.roles.values(),
        }
    }
}

/// Response for a successful login
#[derive(Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub user: UserInfo,
}

/// Response for a successful token refresh
#[derive(Serialize)]
pub struct RefreshTokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub user: UserInfo,
}

/// Request for employee registration
#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub color: String,
    #[serde(default)]
    pub is_admin: bool,
}

/// Create the router for the scheduling service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/auth/register", post(register))
        .route(
            "/employees",
            get(employees::list_employees).post(employees::create_employee),
        )
        .route("/employees/me/profile", get(employees::my_profile))
        .route(
            "/employees/:id",
            get(employees::get_employee)
                .put(employees::update_employee)
                .delete(employees::delete_employee),
        )
        .route(
            "/schedules",
            get(schedules::list_schedules).post(schedules::create_schedule),
        )
        .route("/schedules/my-schedules", get(schedules::my_schedules))
        .route("/schedules/date-range", get(schedules::schedules_by_date_range))
        .route(
            "/schedules/employee/:employee_id",
            get(schedules::schedules_by_employee),
        )
        .route(
            "/schedules/employee/:employee_id/date/:date",
            delete(schedules::delete_employee_day),
        )
        .route(
            "/schedules/:id",
            get(schedules::get_schedule)
                .put(schedules::update_schedule)
                .delete(schedules::delete_schedule),
        )
        .route("/positions", get(schedules::list_positions))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh_token))
        .route("/auth/logout", post(logout))
        .merge(protected_routes)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database = common::database::health_check(&state.db_pool)
        .await
        .unwrap_or(false);
    let status = if database { "ok" } else { "degraded" };

    Json(serde_json::json!({
        "status": status,
        "service": "scheduly-api",
        "database": database,
    }))
}

/// Employee login endpoint
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::BadRequest(
            "Email and password are required.".to_string(),
        ));
    }

    info!("Login attempt for {}", payload.email);

    if !state.rate_limiter.is_allowed(&payload.email).await {
        return Err(ApiError::TooManyRequests);
    }

    let employee = state
        .employee_repository
        .find_by_email(&payload.email)
        .await
        .map_err(|e| {
            error!("Failed to look up employee: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::Unauthorized)?;

    let password_ok = state
        .employee_repository
        .verify_password(&employee, &payload.password)
        .map_err(|e| {
            error!("Failed to verify password: {}", e);
            ApiError::InternalServerError
        })?;

    if !password_ok {
        return Err(ApiError::Unauthorized);
    }

    state.rate_limiter.reset(&payload.email).await;

    let access_token = state
        .jwt_service
        .generate_access_token(&employee)
        .map_err(|e| {
            error!("Failed to generate access token: {}", e);
            ApiError::InternalServerError
        })?;

    let refresh_token = state
        .jwt_service
        .generate_refresh_token(&employee)
        .map_err(|e| {
            error!("Failed to generate refresh token: {}", e);
            ApiError::InternalServerError
        })?;

    // Persist the refresh credential on the employee record
    state
        .employee_repository
        .set_refresh_token(employee.id, Some(&refresh_token))
        .await
        .map_err(|e| {
            error!("Failed to store refresh token: {}", e);
            ApiError::InternalServerError
        })?;

    info!("Employee logged in: {}", employee.email);

    let response = TokenResponse {
        access_token,
        refresh_token,
        token_type: "Bearer".to_string(),
        expires_in: state.jwt_service.access_token_expiry(),
        user: UserInfo::from(&employee),
    };

    Ok((StatusCode::OK, Json(response)))
}

/// Refresh token endpoint: re-issues an access token for the employee
/// holding this refresh credential
pub async fn refresh_token(
    State(state): State<AppState>,
    Json(payload): Json<RefreshTokenRequest>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Token refresh request");

    let employee = state
        .employee_repository
        .find_by_refresh_token(&payload.refresh_token)
        .await
        .map_err(|e| {
            error!("Failed to look up refresh token: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::Forbidden("Invalid refresh token".to_string()))?;

    let claims = state
        .jwt_service
        .validate_token(&payload.refresh_token)
        .map_err(|_| ApiError::Forbidden("Invalid refresh token".to_string()))?;

    if claims.token_type != TokenType::Refresh || claims.sub != employee.id {
        return Err(ApiError::Forbidden("Invalid refresh token".to_string()));
    }

    let is_blacklisted = state
        .jwt_service
        .is_token_blacklisted(&state.redis_pool, &payload.refresh_token)
        .await
        .map_err(|e| {
            error!("Failed to check token blacklist: {}", e);
            ApiError::InternalServerError
        })?;

    if is_blacklisted {
        return Err(ApiError::Forbidden("Invalid refresh token".to_string()));
    }

    let access_token = state
        .jwt_service
        .generate_access_token(&employee)
        .map_err(|e| {
            error!("Failed to generate access token: {}", e);
            ApiError::InternalServerError
        })?;

    let response = RefreshTokenResponse {
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: state.jwt_service.access_token_expiry(),
        user: UserInfo::from(&employee),
    };

    Ok((StatusCode::OK, Json(response)))
}

/// Logout endpoint: clears the stored refresh credential and blacklists
/// the token for its remaining lifetime
pub async fn logout(
    State(state): State<AppState>,
    Json(payload): Json<RefreshTokenRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(employee) = state
        .employee_repository
        .find_by_refresh_token(&payload.refresh_token)
        .await
        .map_err(|e| {
            error!("Failed to look up refresh token: {}", e);
            ApiError::InternalServerError
        })?
    {
        state
            .employee_repository
            .set_refresh_token(employee.id, None)
            .await
            .map_err(|e| {
                error!("Failed to clear refresh token: {}", e);
                ApiError::InternalServerError
            })?;

        info!("Employee logged out: {}", employee.email);
    }

    // An unparseable token has nothing left to revoke
    if let Ok(claims) = state.jwt_service.validate_token(&payload.refresh_token) {
        let now = unix_now().map_err(|e| {
            error!("Failed to get current time: {}", e);
            ApiError::InternalServerError
        })?;

        let expiry = claims.exp.saturating_sub(now);
        state
            .jwt_service
            .blacklist_token(&state.redis_pool, &payload.refresh_token, expiry)
            .await
            .map_err(|e| {
                error!("Failed to blacklist token: {}", e);
                ApiError::InternalServerError
            })?;
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Employee registration endpoint, restricted to admins
pub async fn register(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthEmployee>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_admin()?;

    validation::validate_name(&payload.name).map_err(ApiError::BadRequest)?;
    validation::validate_email(&payload.email).map_err(ApiError::BadRequest)?;
    validation::validate_phone(&payload.phone).map_err(ApiError::BadRequest)?;
    validation::validate_password(&payload.password).map_err(ApiError::BadRequest)?;
    validation::validate_color(&payload.color).map_err(ApiError::BadRequest)?;

    let duplicate = state
        .employee_repository
        .email_taken(&payload.email, None)
        .await
        .map_err(|e| {
            error!("Failed to check for duplicate email: {}", e);
            ApiError::InternalServerError
        })?;

    if duplicate {
        return Err(ApiError::Conflict("Email already exists.".to_string()));
    }

    let new_employee = NewEmployee {
        name: payload.name.clone(),
        email: payload.email,
        phone: payload.phone,
        password: payload.password,
        color: Some(payload.color),
        is_admin: payload.is_admin,
    };

    let employee = state
        .employee_repository
        .create(&new_employee)
        .await
        .map_err(|e| {
            error!("Failed to create employee: {}", e);
            ApiError::InternalServerError
        })?;

    info!(
        "New employee created: {} ({}) by {}",
        employee.name, employee.email, auth.email
    );

    let body = serde_json::json!({
        "success": format!("New employee {} created successfully!", payload.name),
        "employee": EmployeeResponse::from(employee),
    });

    Ok((StatusCode::CREATED, Json(body)))
}
