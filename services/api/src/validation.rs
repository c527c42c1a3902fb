//! Input validation utilities

use crate::models::schedule::MAX_NOTE_LEN;
use regex::Regex;
use std::sync::OnceLock;

/// Validate an employee display name
pub fn validate_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Name is required".to_string());
    }

    if name.len() > 100 {
        return Err("Name must be at most 100 characters long".to_string());
    }

    Ok(())
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 254 {
        return Err("Email must be at most 254 characters long".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Validate a phone number
pub fn validate_phone(phone: &str) -> Result<(), String> {
    if phone.is_empty() {
        return Err("Phone is required".to_string());
    }

    static PHONE_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = PHONE_REGEX.get_or_init(|| {
        Regex::new(r"^\+?[0-9][0-9 ()\-]{5,18}$").expect("Failed to compile phone regex")
    });

    if !regex.is_match(phone) {
        return Err("Invalid phone number".to_string());
    }

    Ok(())
}

/// Validate password
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }

    if password.len() < 8 {
        return Err("Password must be at least 8 characters long".to_string());
    }

    if password.len() > 128 {
        return Err("Password must be at most 128 characters long".to_string());
    }

    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if !has_upper {
        return Err("Password must contain at least one uppercase letter".to_string());
    }

    if !has_lower {
        return Err("Password must contain at least one lowercase letter".to_string());
    }

    if !has_digit {
        return Err("Password must contain at least one digit".to_string());
    }

    Ok(())
}

/// Validate a display color (hex "#rrggbb")
pub fn validate_color(color: &str) -> Result<(), String> {
    static COLOR_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = COLOR_REGEX.get_or_init(|| {
        Regex::new(r"^#[0-9a-fA-F]{6}$").expect("Failed to compile color regex")
    });

    if !regex.is_match(color) {
        return Err("Color must be a hex value like #3b82f6".to_string());
    }

    Ok(())
}

/// Validate a zero-padded "HH:MM" time-of-day string
pub fn validate_time(time: &str) -> Result<(), String> {
    static TIME_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = TIME_REGEX.get_or_init(|| {
        Regex::new(r"^([01][0-9]|2[0-3]):[0-5][0-9]$").expect("Failed to compile time regex")
    });

    if !regex.is_match(time) {
        return Err(format!("Invalid time: {} (expected zero-padded HH:MM)", time));
    }

    Ok(())
}

/// Validate a shift interval: both bounds well-formed and start strictly
/// before end. Inverted and zero-length intervals are rejected here, before
/// any conflict check runs.
pub fn validate_time_range(start: &str, end: &str) -> Result<(), String> {
    validate_time(start)?;
    validate_time(end)?;

    if start >= end {
        return Err("Start time must be before end time".to_string());
    }

    Ok(())
}

/// Validate a shift note
pub fn validate_note(note: &str) -> Result<(), String> {
    if note.chars().count() > MAX_NOTE_LEN {
        return Err(format!("Note must be at most {} characters long", MAX_NOTE_LEN));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation() {
        assert!(validate_email("ana@kiosk.example").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("two@@kiosk.example").is_err());
    }

    #[test]
    fn password_validation() {
        assert!(validate_password("Sunrise7pass").is_ok());
        assert!(validate_password("short1A").is_err());
        assert!(validate_password("alllowercase1").is_err());
        assert!(validate_password("ALLUPPERCASE1").is_err());
        assert!(validate_password("NoDigitsHere").is_err());
    }

    #[test]
    fn phone_validation() {
        assert!(validate_phone("+1 305-555-0134").is_ok());
        assert!(validate_phone("3055550134").is_ok());
        assert!(validate_phone("").is_err());
        assert!(validate_phone("call me").is_err());
    }

    #[test]
    fn color_validation() {
        assert!(validate_color("#3b82f6").is_ok());
        assert!(validate_color("#ABCDEF").is_ok());
        assert!(validate_color("3b82f6").is_err());
        assert!(validate_color("#3b82f").is_err());
        assert!(validate_color("blue").is_err());
    }

    #[test]
    fn time_validation() {
        assert!(validate_time("00:00").is_ok());
        assert!(validate_time("09:30").is_ok());
        assert!(validate_time("23:59").is_ok());
        assert!(validate_time("24:00").is_err());
        assert!(validate_time("9:30").is_err());
        assert!(validate_time("09:60").is_err());
        assert!(validate_time("0930").is_err());
    }

    #[test]
    fn time_range_rejects_inverted_and_zero_length() {
        assert!(validate_time_range("09:00", "17:00").is_ok());
        assert!(validate_time_range("09:00", "09:00").is_err());
        assert!(validate_time_range("17:00", "09:00").is_err());
        assert!(validate_time_range("09:00", "25:00").is_err());
    }

    #[test]
    fn note_length_bound() {
        assert!(validate_note("").is_ok());
        assert!(validate_note(&"x".repeat(200)).is_ok());
        assert!(validate_note(&"x".repeat(201)).is_err());
    }
}
