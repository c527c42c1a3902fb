//! Shift conflict detection
//!
//! A shift occupies the half-open interval [start, end) on its day. Two
//! shifts for the same employee on the same date conflict when their
//! intervals overlap. Times are zero-padded "HH:MM" strings, so comparing
//! them as strings compares them chronologically and no parsing is needed.
//!
//! This module is pure: callers load the relevant shifts (same employee,
//! same date, minus the shift being edited on update) and reject inverted
//! or malformed intervals before asking for a verdict.

use crate::models::schedule::Schedule;

/// True when the half-open intervals [s1, e1) and [s2, e2) overlap.
///
/// Back-to-back intervals (one ends exactly where the other starts) do
/// not overlap.
pub fn intervals_overlap(s1: &str, e1: &str, s2: &str, e2: &str) -> bool {
    s1 < e2 && s2 < e1
}

/// Find the first existing shift whose interval overlaps the candidate
/// [start, end), for error reporting.
pub fn find_conflict<'a>(
    start: &str,
    end: &str,
    existing: &'a [Schedule],
) -> Option<&'a Schedule> {
    existing
        .iter()
        .find(|shift| intervals_overlap(start, end, &shift.start_time, &shift.end_time))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::schedule::Position;
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    fn shift(start: &str, end: &str) -> Schedule {
        Schedule {
            id: Uuid::new_v4(),
            employee_id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            start_time: start.to_string(),
            end_time: end.to_string(),
            position: Position::Register,
            note: String::new(),
            status: "scheduled".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    /// Equivalent three-condition formulation: candidate start inside
    /// existing, candidate end inside existing, or candidate containing
    /// existing.
    fn three_condition_overlap(s1: &str, e1: &str, s2: &str, e2: &str) -> bool {
        (s2 <= s1 && e2 > s1) || (s2 < e1 && e2 >= e1) || (s2 >= s1 && e2 <= e1)
    }

    /// Every half-hour slot between 06:00 and 22:00
    fn time_grid() -> Vec<String> {
        (6..=22)
            .flat_map(|h| [format!("{:02}:00", h), format!("{:02}:30", h)])
            .filter(|t| t.as_str() <= "22:00")
            .collect()
    }

    #[test]
    fn half_open_test_agrees_with_three_condition_formulation() {
        let grid = time_grid();
        for (i, s1) in grid.iter().enumerate() {
            for e1 in &grid[i + 1..] {
                for (j, s2) in grid.iter().enumerate() {
                    for e2 in &grid[j + 1..] {
                        assert_eq!(
                            intervals_overlap(s1, e1, s2, e2),
                            three_condition_overlap(s1, e1, s2, e2),
                            "disagreement on [{},{}) vs [{},{})",
                            s1,
                            e1,
                            s2,
                            e2
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn empty_existing_set_never_conflicts() {
        assert!(find_conflict("09:00", "17:00", &[]).is_none());
    }

    #[test]
    fn back_to_back_shifts_do_not_conflict() {
        let existing = [shift("09:00", "10:00")];
        // Candidate starts exactly when the existing shift ends
        assert!(find_conflict("10:00", "11:00", &existing).is_none());
        // Candidate ends exactly when the existing shift starts
        assert!(find_conflict("08:00", "09:00", &existing).is_none());
    }

    #[test]
    fn containment_conflicts_both_ways() {
        let existing = [shift("10:00", "11:00")];
        assert!(find_conflict("09:00", "12:00", &existing).is_some());

        let existing = [shift("09:00", "12:00")];
        assert!(find_conflict("10:00", "11:00", &existing).is_some());
    }

    #[test]
    fn identical_interval_conflicts() {
        let existing = [shift("09:00", "10:00")];
        assert!(find_conflict("09:00", "10:00", &existing).is_some());
    }

    #[test]
    fn partial_overlap_conflicts() {
        let existing = [shift("09:00", "13:00")];
        assert!(find_conflict("12:00", "15:00", &existing).is_some());
        assert!(find_conflict("07:00", "09:30", &existing).is_some());
    }

    #[test]
    fn reports_the_colliding_shift() {
        let first = shift("08:00", "09:00");
        let second = shift("09:00", "13:00");
        let existing = [first.clone(), second.clone()];

        let hit = find_conflict("12:00", "15:00", &existing).expect("expected a conflict");
        assert_eq!(hit.id, second.id);

        assert!(find_conflict("13:00", "15:00", &existing).is_none());
    }

    #[test]
    fn update_excludes_the_edited_shift() {
        let edited = shift("09:00", "10:00");
        let other = shift("11:00", "12:00");
        let all = [edited.clone(), other.clone()];

        // A no-op edit re-checked against the full set would self-conflict
        assert!(find_conflict(&edited.start_time, &edited.end_time, &all).is_some());

        // The caller excludes the edited shift, so it does not
        let without_edited: Vec<Schedule> =
            all.iter().filter(|s| s.id != edited.id).cloned().collect();
        assert!(
            find_conflict(&edited.start_time, &edited.end_time, &without_edited).is_none()
        );
    }
}
