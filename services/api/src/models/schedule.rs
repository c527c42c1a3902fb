//! Shift model for the scheduling service

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Maximum length of a shift note
pub const MAX_NOTE_LEN: usize = 200;

/// Fixed vocabulary of work positions a shift can be assigned to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Position {
    Open,
    #[serde(rename = "Coffee-station")]
    CoffeeStation,
    Mid,
    Merchandise,
    Register,
    #[serde(rename = "Day-off")]
    DayOff,
}

impl Position {
    /// All positions, in display order
    pub const ALL: [Position; 6] = [
        Position::Open,
        Position::CoffeeStation,
        Position::Mid,
        Position::Merchandise,
        Position::Register,
        Position::DayOff,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Position::Open => "Open",
            Position::CoffeeStation => "Coffee-station",
            Position::Mid => "Mid",
            Position::Merchandise => "Merchandise",
            Position::Register => "Register",
            Position::DayOff => "Day-off",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Position {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| format!("Unknown position: {}", s))
    }
}

/// Shift entity: one scheduled work interval for one employee on one date.
/// Times are zero-padded "HH:MM" strings, so lexicographic order matches
/// chronological order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub position: Position,
    pub note: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New shift creation payload
#[derive(Debug, Clone, Deserialize)]
pub struct NewSchedule {
    pub employee_id: Uuid,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub position: Position,
    pub note: Option<String>,
    pub status: Option<String>,
}

/// Shift update payload; absent fields are left unchanged. Changing the
/// employee, date or either time bound re-runs the conflict check.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSchedule {
    pub employee_id: Option<Uuid>,
    pub date: Option<NaiveDate>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub position: Option<Position>,
    pub note: Option<String>,
    pub status: Option<String>,
}

/// The owning employee's display fields, embedded in schedule responses
#[derive(Debug, Clone, Serialize)]
pub struct EmployeeSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub color: String,
}

/// Shift as returned to clients, joined with its employee's display fields
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleResponse {
    pub id: Uuid,
    pub employee: EmployeeSummary,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub position: Position,
    pub note: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_names_round_trip_parse() {
        assert_eq!("Coffee-station".parse::<Position>(), Ok(Position::CoffeeStation));
        assert_eq!("Day-off".parse::<Position>(), Ok(Position::DayOff));
        assert!("Barista".parse::<Position>().is_err());
    }

    #[test]
    fn position_serde_uses_display_names() {
        let json = serde_json::to_string(&Position::CoffeeStation).unwrap();
        assert_eq!(json, "\"Coffee-station\"");

        let parsed: Position = serde_json::from_str("\"Day-off\"").unwrap();
        assert_eq!(parsed, Position::DayOff);
    }
}
