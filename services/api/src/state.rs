//! Application state shared across handlers

use common::cache::RedisPool;
use sqlx::PgPool;

use crate::jwt::JwtService;
use crate::rate_limiter::RateLimiter;
use crate::repositories::{EmployeeRepository, ScheduleRepository};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub redis_pool: RedisPool,
    pub jwt_service: JwtService,
    pub employee_repository: EmployeeRepository,
    pub schedule_repository: ScheduleRepository,
    pub rate_limiter: RateLimiter,
}
