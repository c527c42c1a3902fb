//! Schedule repository for database operations
//!
//! Conflict-checked writes run inside a transaction holding an advisory
//! lock keyed on (employee, date), so two concurrent writes for the same
//! employee and day cannot both pass the overlap check.

use anyhow::Result;
use chrono::NaiveDate;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, Row, Transaction};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::conflict;
use crate::models::schedule::{
    EmployeeSummary, NewSchedule, Position, Schedule, ScheduleResponse, UpdateSchedule,
};

/// Error type for conflict-checked schedule writes
#[derive(Error, Debug)]
pub enum ScheduleWriteError {
    /// The target employee does not exist
    #[error("Employee not found")]
    EmployeeNotFound,

    /// The shift being updated does not exist
    #[error("Schedule not found")]
    NotFound,

    /// The effective interval is inverted or zero-length
    #[error("Start time must be before end time")]
    InvalidTimeRange,

    /// The candidate interval overlaps an existing shift
    #[error("Conflicting schedule {id} from {start} to {end}")]
    Conflict { id: Uuid, start: String, end: String },

    /// Underlying database failure
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    /// Row mapping or other internal failure
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

const JOINED_SELECT: &str = r#"
    SELECT s.id, s.employee_id, s.date, s.start_time, s.end_time, s.position,
           s.note, s.status, s.created_at, s.updated_at,
           e.name AS employee_name, e.email AS employee_email, e.color AS employee_color
    FROM schedules s
    JOIN employees e ON e.id = s.employee_id
"#;

/// Schedule repository
#[derive(Clone)]
pub struct ScheduleRepository {
    pool: PgPool,
}

impl ScheduleRepository {
    /// Create a new schedule repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new shift after checking it against the employee's existing
    /// shifts on that date.
    pub async fn create(&self, new: &NewSchedule) -> Result<ScheduleResponse, ScheduleWriteError> {
        if new.start_time >= new.end_time {
            return Err(ScheduleWriteError::InvalidTimeRange);
        }

        let mut tx = self.pool.begin().await?;
        lock_employee_day(&mut tx, new.employee_id, new.date).await?;

        let employee_exists = sqlx::query("SELECT 1 FROM employees WHERE id = $1")
            .bind(new.employee_id)
            .fetch_optional(&mut *tx)
            .await?
            .is_some();
        if !employee_exists {
            return Err(ScheduleWriteError::EmployeeNotFound);
        }

        let existing = shifts_for_day(&mut tx, new.employee_id, new.date, None).await?;
        if let Some(hit) = conflict::find_conflict(&new.start_time, &new.end_time, &existing) {
            return Err(ScheduleWriteError::Conflict {
                id: hit.id,
                start: hit.start_time.clone(),
                end: hit.end_time.clone(),
            });
        }

        let row = sqlx::query(
            r#"
            INSERT INTO schedules (employee_id, date, start_time, end_time, position, note, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(new.employee_id)
        .bind(new.date)
        .bind(&new.start_time)
        .bind(&new.end_time)
        .bind(new.position.as_str())
        .bind(new.note.as_deref().unwrap_or(""))
        .bind(new.status.as_deref().unwrap_or("scheduled"))
        .fetch_one(&mut *tx)
        .await?;
        let id: Uuid = row.get("id");

        let response = fetch_response(&mut tx, id).await?;
        tx.commit().await?;

        info!("Created shift {} for employee {}", id, new.employee_id);
        Ok(response)
    }

    /// Apply a partial update. When the employee, date or either time bound
    /// changes, the effective interval is re-checked against the employee's
    /// other shifts on the effective date (the edited shift excluded).
    pub async fn update(
        &self,
        id: Uuid,
        changes: &UpdateSchedule,
    ) -> Result<ScheduleResponse, ScheduleWriteError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            r#"
            SELECT id, employee_id, date, start_time, end_time, position,
                   note, status, created_at, updated_at
            FROM schedules
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        let current = match row {
            Some(row) => shift_from_row(&row)?,
            None => return Err(ScheduleWriteError::NotFound),
        };

        let employee_id = changes.employee_id.unwrap_or(current.employee_id);
        let date = changes.date.unwrap_or(current.date);
        let start_time = changes.start_time.as_deref().unwrap_or(&current.start_time);
        let end_time = changes.end_time.as_deref().unwrap_or(&current.end_time);

        let timing_changed = changes.employee_id.is_some()
            || changes.date.is_some()
            || changes.start_time.is_some()
            || changes.end_time.is_some();

        if timing_changed {
            if start_time >= end_time {
                return Err(ScheduleWriteError::InvalidTimeRange);
            }

            lock_employee_day(&mut tx, employee_id, date).await?;

            if employee_id != current.employee_id {
                let employee_exists = sqlx::query("SELECT 1 FROM employees WHERE id = $1")
                    .bind(employee_id)
                    .fetch_optional(&mut *tx)
                    .await?
                    .is_some();
                if !employee_exists {
                    return Err(ScheduleWriteError::EmployeeNotFound);
                }
            }

            let existing = shifts_for_day(&mut tx, employee_id, date, Some(id)).await?;
            if let Some(hit) = conflict::find_conflict(start_time, end_time, &existing) {
                return Err(ScheduleWriteError::Conflict {
                    id: hit.id,
                    start: hit.start_time.clone(),
                    end: hit.end_time.clone(),
                });
            }
        }

        sqlx::query(
            r#"
            UPDATE schedules
            SET employee_id = COALESCE($2, employee_id),
                date = COALESCE($3, date),
                start_time = COALESCE($4, start_time),
                end_time = COALESCE($5, end_time),
                position = COALESCE($6, position),
                note = COALESCE($7, note),
                status = COALESCE($8, status),
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(changes.employee_id)
        .bind(changes.date)
        .bind(changes.start_time.as_deref())
        .bind(changes.end_time.as_deref())
        .bind(changes.position.map(|p| p.as_str()))
        .bind(changes.note.as_deref())
        .bind(changes.status.as_deref())
        .execute(&mut *tx)
        .await?;

        let response = fetch_response(&mut tx, id).await?;
        tx.commit().await?;

        info!("Updated shift {}", id);
        Ok(response)
    }

    /// Get a shift by ID, joined with its employee
    pub async fn get(&self, id: Uuid) -> Result<Option<ScheduleResponse>> {
        let row = sqlx::query(&format!("{JOINED_SELECT} WHERE s.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(response_from_row).transpose()
    }

    /// Get all shifts, optionally filtered to one employee, ordered by
    /// date then start time
    pub async fn get_all(&self, employee_filter: Option<Uuid>) -> Result<Vec<ScheduleResponse>> {
        let rows = sqlx::query(&format!(
            r#"
            {JOINED_SELECT}
            WHERE ($1::uuid IS NULL OR s.employee_id = $1)
            ORDER BY s.date, s.start_time
            "#,
        ))
        .bind(employee_filter)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(response_from_row).collect()
    }

    /// Get shifts in an inclusive day range, optionally filtered to one
    /// employee
    pub async fn get_by_date_range(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
        employee_filter: Option<Uuid>,
    ) -> Result<Vec<ScheduleResponse>> {
        let rows = sqlx::query(&format!(
            r#"
            {JOINED_SELECT}
            WHERE s.date BETWEEN $1 AND $2
              AND ($3::uuid IS NULL OR s.employee_id = $3)
            ORDER BY s.date, s.start_time
            "#,
        ))
        .bind(start_date)
        .bind(end_date)
        .bind(employee_filter)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(response_from_row).collect()
    }

    /// Delete a shift by ID
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM schedules WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete all of one employee's shifts on one date; returns how many
    /// were removed
    pub async fn delete_for_employee_day(
        &self,
        employee_id: Uuid,
        date: NaiveDate,
    ) -> Result<u64> {
        let result = sqlx::query("DELETE FROM schedules WHERE employee_id = $1 AND date = $2")
            .bind(employee_id)
            .bind(date)
            .execute(&self.pool)
            .await?;

        info!(
            "Deleted {} shifts for employee {} on {}",
            result.rows_affected(),
            employee_id,
            date
        );
        Ok(result.rows_affected())
    }
}

/// Serialize conflict-checked writes per (employee, date)
async fn lock_employee_day(
    tx: &mut Transaction<'_, Postgres>,
    employee_id: Uuid,
    date: NaiveDate,
) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
        .bind(format!("{}/{}", employee_id, date))
        .execute(&mut **tx)
        .await?;

    Ok(())
}

/// Load the employee's shifts on one date, minus the shift being edited
async fn shifts_for_day(
    tx: &mut Transaction<'_, Postgres>,
    employee_id: Uuid,
    date: NaiveDate,
    exclude: Option<Uuid>,
) -> Result<Vec<Schedule>> {
    let rows = sqlx::query(
        r#"
        SELECT id, employee_id, date, start_time, end_time, position,
               note, status, created_at, updated_at
        FROM schedules
        WHERE employee_id = $1 AND date = $2 AND ($3::uuid IS NULL OR id <> $3)
        ORDER BY start_time
        "#,
    )
    .bind(employee_id)
    .bind(date)
    .bind(exclude)
    .fetch_all(&mut **tx)
    .await?;

    rows.iter().map(shift_from_row).collect()
}

async fn fetch_response(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
) -> Result<ScheduleResponse> {
    let row = sqlx::query(&format!("{JOINED_SELECT} WHERE s.id = $1"))
        .bind(id)
        .fetch_one(&mut **tx)
        .await?;

    response_from_row(&row)
}

fn parse_position(row: &PgRow) -> Result<Position> {
    let raw: String = row.get("position");
    raw.parse()
        .map_err(|e: String| anyhow::anyhow!("Malformed position column: {}", e))
}

fn shift_from_row(row: &PgRow) -> Result<Schedule> {
    Ok(Schedule {
        id: row.get("id"),
        employee_id: row.get("employee_id"),
        date: row.get("date"),
        start_time: row.get("start_time"),
        end_time: row.get("end_time"),
        position: parse_position(row)?,
        note: row.get("note"),
        status: row.get("status"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

fn response_from_row(row: &PgRow) -> Result<ScheduleResponse> {
    Ok(ScheduleResponse {
        id: row.get("id"),
        employee: EmployeeSummary {
            id: row.get("employee_id"),
            name: row.get("employee_name"),
            email: row.get("employee_email"),
            color: row.get("employee_color"),
        },
        date: row.get("date"),
        start_time: row.get("start_time"),
        end_time: row.get("end_time"),
        position: parse_position(row)?,
        note: row.get("note"),
        status: row.get("status"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewEmployee, UpdateSchedule};
    use crate::repositories::EmployeeRepository;

    static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();

    #[tokio::test]
    async fn conflict_checked_writes_against_live_database() -> Result<()> {
        // Requires a reachable Postgres; opt in by exporting DATABASE_URL.
        let Ok(url) = std::env::var("DATABASE_URL") else {
            return Ok(());
        };

        let pool = PgPool::connect(&url).await?;
        MIGRATOR.run(&pool).await?;

        let employees = EmployeeRepository::new(pool.clone());
        let schedules = ScheduleRepository::new(pool.clone());

        let employee = employees
            .create(&NewEmployee {
                name: "Integration Tester".to_string(),
                email: format!("{}@kiosk.example", Uuid::new_v4()),
                phone: "3055550134".to_string(),
                password: "Sunrise7pass".to_string(),
                color: None,
                is_admin: false,
            })
            .await?;

        let date = chrono::NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        let first = schedules
            .create(&NewSchedule {
                employee_id: employee.id,
                date,
                start_time: "09:00".to_string(),
                end_time: "13:00".to_string(),
                position: Position::Register,
                note: None,
                status: None,
            })
            .await
            .expect("first shift should be accepted");

        let overlapping = schedules
            .create(&NewSchedule {
                employee_id: employee.id,
                date,
                start_time: "12:00".to_string(),
                end_time: "15:00".to_string(),
                position: Position::CoffeeStation,
                note: None,
                status: None,
            })
            .await;
        assert!(matches!(
            overlapping,
            Err(ScheduleWriteError::Conflict { .. })
        ));

        let back_to_back = schedules
            .create(&NewSchedule {
                employee_id: employee.id,
                date,
                start_time: "13:00".to_string(),
                end_time: "15:00".to_string(),
                position: Position::CoffeeStation,
                note: None,
                status: None,
            })
            .await
            .expect("back-to-back shift should be accepted");

        // A no-op edit must not conflict with itself
        let edited = schedules
            .update(
                first.id,
                &UpdateSchedule {
                    start_time: Some("09:00".to_string()),
                    end_time: Some("13:00".to_string()),
                    ..Default::default()
                },
            )
            .await
            .expect("no-op edit should be accepted");
        assert_eq!(edited.start_time, "09:00");

        // Moving the second shift onto the first must be rejected
        let moved = schedules
            .update(
                back_to_back.id,
                &UpdateSchedule {
                    start_time: Some("10:00".to_string()),
                    end_time: Some("11:00".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(moved, Err(ScheduleWriteError::Conflict { .. })));

        // Deleting the employee cascades through their shifts
        employees.delete(employee.id).await?;
        assert!(schedules.get(first.id).await?.is_none());
        assert!(schedules.get(back_to_back.id).await?.is_none());

        Ok(())
    }
}
