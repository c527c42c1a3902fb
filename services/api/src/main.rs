use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

mod conflict;
mod error;
mod jwt;
mod middleware;
mod models;
mod rate_limiter;
mod repositories;
mod routes;
mod state;
mod validation;

use common::cache::{RedisConfig, RedisPool};
use common::database::{self, DatabaseConfig};
use tokio::net::TcpListener;

use crate::jwt::{JwtConfig, JwtService};
use crate::rate_limiter::{RateLimiter, RateLimiterConfig};
use crate::repositories::{EmployeeRepository, ScheduleRepository};
use crate::state::AppState;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting scheduling service");

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = database::init_pool(&db_config).await?;

    if database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    database::run_migrations(&pool, &MIGRATOR).await?;

    // Initialize Redis for token revocation
    let redis_config = RedisConfig::from_env()?;
    let redis_pool = RedisPool::new(&redis_config).await?;

    // Initialize JWT service
    let jwt_config = JwtConfig::from_env()?;
    let jwt_service = JwtService::new(jwt_config)?;

    let employee_repository = EmployeeRepository::new(pool.clone());
    let schedule_repository = ScheduleRepository::new(pool.clone());
    let rate_limiter = RateLimiter::new(RateLimiterConfig::default());

    let app_state = AppState {
        db_pool: pool,
        redis_pool,
        jwt_service,
        employee_repository,
        schedule_repository,
        rate_limiter,
    };

    info!("Scheduling service initialized successfully");

    // Start the web server
    let app = routes::create_router(app_state);

    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "3500".to_string());
    let addr = format!("{}:{}", host, port);

    let listener = TcpListener::bind(&addr).await?;
    info!("Scheduling service listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
