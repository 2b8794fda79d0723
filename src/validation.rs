//! Input rules shared by the handlers. Every function returns the normalized
//! value or a `BadRequest` naming the offending field.

use std::sync::OnceLock;

use regex::Regex;

use crate::errors::{AppError, AppResult};

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"))
}

fn phone_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9]{10}$").expect("phone pattern compiles"))
}

/// Trims and checks the character count against `min..=max`.
pub fn text(raw: &str, label: &str, min: usize, max: usize) -> AppResult<String> {
    let value = raw.trim();
    let len = value.chars().count();

    if len < min || len > max {
        return Err(AppError::bad_request(if min <= 1 {
            format!("{label} is required and cannot exceed {max} characters")
        } else {
            format!("{label} must be between {min} and {max} characters")
        }));
    }

    Ok(value.to_string())
}

/// Lowercased and trimmed.
pub fn email(raw: &str) -> AppResult<String> {
    let value = raw.trim().to_lowercase();
    if !email_regex().is_match(&value) {
        return Err(AppError::bad_request("please provide a valid email"));
    }
    Ok(value)
}

pub fn person_name(raw: &str) -> AppResult<String> {
    text(raw, "name", 2, 50)
}

pub fn teacher_name(raw: &str) -> AppResult<String> {
    text(raw, "teacher name", 1, 50)
}

pub fn title(raw: &str, label: &str) -> AppResult<String> {
    text(raw, label, 3, 100)
}

pub fn description(raw: &str) -> AppResult<String> {
    text(raw, "description", 10, 500)
}

pub fn venue(raw: &str) -> AppResult<String> {
    text(raw, "venue", 1, 200)
}

/// Blank input clears the phone number.
pub fn phone(raw: Option<&str>) -> AppResult<Option<String>> {
    match raw.map(str::trim).filter(|p| !p.is_empty()) {
        None => Ok(None),
        Some(value) if phone_regex().is_match(value) => Ok(Some(value.to_string())),
        Some(_) => Err(AppError::bad_request("phone number must be exactly 10 digits")),
    }
}

pub fn year(value: i64) -> AppResult<i64> {
    if !(1..=4).contains(&value) {
        return Err(AppError::bad_request("year must be between 1 and 4"));
    }
    Ok(value)
}

pub fn non_negative(value: i64, label: &str) -> AppResult<i64> {
    if value < 0 {
        return Err(AppError::bad_request(format!("{label} cannot be negative")));
    }
    Ok(value)
}

/// Trims entries and drops the blank ones.
pub fn tags(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_normalized() {
        assert_eq!(email("  John.Doe@Student.EDU ").unwrap(), "john.doe@student.edu");
        assert!(email("not-an-email").is_err());
        assert!(email("a@b").is_err());
    }

    #[test]
    fn name_bounds() {
        assert!(person_name("J").is_err());
        assert_eq!(person_name("  Jo ").unwrap(), "Jo");
        assert!(person_name(&"x".repeat(51)).is_err());
    }

    #[test]
    fn title_and_description_bounds() {
        assert!(title("ab", "award title").is_err());
        assert!(title("Hackathon Win", "award title").is_ok());
        assert!(description("too short").is_err());
        assert!(description("Long enough description").is_ok());
        assert!(description(&"x".repeat(501)).is_err());
    }

    #[test]
    fn phone_must_be_ten_digits() {
        assert_eq!(phone(Some("9876543210")).unwrap().as_deref(), Some("9876543210"));
        assert_eq!(phone(Some("  ")).unwrap(), None);
        assert!(phone(Some("98765-43210")).is_err());
        assert!(phone(Some("123")).is_err());
    }

    #[test]
    fn year_and_counts() {
        assert!(year(0).is_err());
        assert!(year(5).is_err());
        assert_eq!(year(4).unwrap(), 4);
        assert!(non_negative(-1, "points").is_err());
        assert_eq!(non_negative(0, "points").unwrap(), 0);
    }

    #[test]
    fn venue_is_required() {
        assert!(venue("   ").is_err());
        assert_eq!(venue(" Main Hall ").unwrap(), "Main Hall");
    }

    #[test]
    fn tags_drop_blanks() {
        assert_eq!(tags(vec![" ai ".into(), "".into(), "web".into()]), vec!["ai", "web"]);
    }
}
