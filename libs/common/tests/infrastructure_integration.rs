//! Integration tests for the infrastructure components
//!
//! These tests verify that the PostgreSQL database and Redis cache are
//! properly configured and accessible. They only run when the matching
//! environment variables are exported, so a plain `cargo test` stays
//! green on machines without the infrastructure.

use common::{
    cache::{RedisConfig, RedisPool},
    database::{DatabaseConfig, health_check, init_pool},
};
use sqlx::Row;

#[tokio::test]
async fn test_database_connectivity() -> Result<(), Box<dyn std::error::Error>> {
    if std::env::var("DATABASE_URL").is_err() {
        return Ok(());
    }

    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    assert!(health_check(&pool).await?, "Database health check failed");

    let row = sqlx::query("SELECT 1 as result").fetch_one(&pool).await?;
    let result: i32 = row.get("result");
    assert_eq!(result, 1, "PostgreSQL simple query test failed");

    Ok(())
}

#[tokio::test]
async fn test_cache_connectivity() -> Result<(), Box<dyn std::error::Error>> {
    if std::env::var("REDIS_URL").is_err() {
        return Ok(());
    }

    let redis_config = RedisConfig::from_env()?;
    let redis_pool = RedisPool::new(&redis_config).await?;

    assert!(
        redis_pool.health_check().await?,
        "Redis health check failed"
    );

    let test_key = "infrastructure_test_key";
    redis_pool.set(test_key, "present", Some(10)).await?;

    let retrieved = redis_pool.get(test_key).await?;
    assert_eq!(retrieved, Some("present".to_string()));

    redis_pool.delete(test_key).await?;
    let retrieved = redis_pool.get(test_key).await?;
    assert_eq!(retrieved, None, "Redis delete operation failed");

    Ok(())
}
