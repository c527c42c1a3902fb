//! Repositories for database operations

use anyhow::Result;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::info;
use uuid::Uuid;

use crate::models::{Employee, NewEmployee, RoleSet, UpdateEmployee};

pub mod schedule;

pub use schedule::ScheduleRepository;

const EMPLOYEE_COLUMNS: &str =
    "id, name, email, phone, color, password_hash, refresh_token, roles, created_at, updated_at";

/// Employee repository
#[derive(Clone)]
pub struct EmployeeRepository {
    pool: PgPool,
}

impl EmployeeRepository {
    /// Create a new employee repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new employee with a hashed password
    pub async fn create(&self, new_employee: &NewEmployee) -> Result<Employee> {
        info!("Creating new employee: {}", new_employee.email);

        let password_hash = hash_password(&new_employee.password)?;
        let roles = serde_json::to_value(RoleSet::new(new_employee.is_admin))?;
        let color = new_employee.color.as_deref().unwrap_or("#3b82f6");

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO employees (name, email, phone, color, password_hash, roles)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {EMPLOYEE_COLUMNS}
            "#,
        ))
        .bind(&new_employee.name)
        .bind(&new_employee.email)
        .bind(&new_employee.phone)
        .bind(color)
        .bind(&password_hash)
        .bind(&roles)
        .fetch_one(&self.pool)
        .await?;

        employee_from_row(&row)
    }

    /// Find an employee by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Employee>> {
        let row = sqlx::query(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE id = $1",
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(employee_from_row).transpose()
    }

    /// Find an employee by email
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Employee>> {
        let row = sqlx::query(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE email = $1",
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(employee_from_row).transpose()
    }

    /// Find the employee holding a refresh token
    pub async fn find_by_refresh_token(&self, refresh_token: &str) -> Result<Option<Employee>> {
        let row = sqlx::query(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE refresh_token = $1",
        ))
        .bind(refresh_token)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(employee_from_row).transpose()
    }

    /// Get all employees, newest first
    pub async fn get_all(&self) -> Result<Vec<Employee>> {
        let rows = sqlx::query(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees ORDER BY created_at DESC",
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(employee_from_row).collect()
    }

    /// True when another employee already uses this email
    pub async fn email_taken(&self, email: &str, exclude: Option<Uuid>) -> Result<bool> {
        let row = sqlx::query(
            "SELECT 1 FROM employees WHERE email = $1 AND ($2::uuid IS NULL OR id <> $2)",
        )
        .bind(email)
        .bind(exclude)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.is_some())
    }

    /// Apply a partial update; a provided password is re-hashed
    pub async fn update(&self, id: Uuid, changes: &UpdateEmployee) -> Result<Option<Employee>> {
        let password_hash = changes
            .password
            .as_deref()
            .map(hash_password)
            .transpose()?;

        let row = sqlx::query(&format!(
            r#"
            UPDATE employees
            SET name = COALESCE($2, name),
                email = COALESCE($3, email),
                phone = COALESCE($4, phone),
                color = COALESCE($5, color),
                password_hash = COALESCE($6, password_hash),
                updated_at = now()
            WHERE id = $1
            RETURNING {EMPLOYEE_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(changes.name.as_deref())
        .bind(changes.email.as_deref())
        .bind(changes.phone.as_deref())
        .bind(changes.color.as_deref())
        .bind(password_hash.as_deref())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(employee_from_row).transpose()
    }

    /// Delete an employee; dependent shifts are removed by the cascade
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Store or clear the employee's refresh credential
    pub async fn set_refresh_token(&self, id: Uuid, refresh_token: Option<&str>) -> Result<()> {
        sqlx::query("UPDATE employees SET refresh_token = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(refresh_token)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Verify an employee's password against the stored hash
    pub fn verify_password(&self, employee: &Employee, password: &str) -> Result<bool> {
        let parsed_hash = PasswordHash::new(&employee.password_hash)
            .map_err(|e| anyhow::anyhow!("Failed to parse password hash: {}", e))?;

        let argon2 = Argon2::default();
        let result = argon2.verify_password(password.as_bytes(), &parsed_hash);

        Ok(result.is_ok())
    }
}

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
        .to_string();

    Ok(hash)
}

fn employee_from_row(row: &PgRow) -> Result<Employee> {
    let roles_json: serde_json::Value = row.get("roles");
    let roles: RoleSet = serde_json::from_value(roles_json)
        .map_err(|e| anyhow::anyhow!("Malformed roles document: {}", e))?;

    Ok(Employee {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        phone: row.get("phone"),
        color: row.get("color"),
        password_hash: row.get("password_hash"),
        refresh_token: row.get("refresh_token"),
        roles,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}
