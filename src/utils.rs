use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{DateTime, Utc};
use rand_core::OsRng;

use crate::errors::AppError;

const MIN_PASSWORD_LENGTH: usize = 8;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AppError::bad_request(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }

    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !(has_lower && has_upper && has_digit) {
        return Err(AppError::bad_request(
            "password must contain at least one uppercase letter, one lowercase letter, and one number",
        ));
    }

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| AppError::internal(format!("failed to hash password: {err}")))
}

pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|err| AppError::internal(format!("invalid password hash: {err}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

pub fn utc_now() -> DateTime<Utc> {
    Utc::now()
}

/// String lists (tags, skills, interests) live in a single TEXT column as a JSON array.
pub fn encode_list(values: &[String]) -> Result<String, AppError> {
    serde_json::to_string(values).map_err(|err| AppError::internal(format!("failed to encode list: {err}")))
}

pub fn decode_list(raw: &str) -> Result<Vec<String>, AppError> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(raw).map_err(|err| AppError::internal(format!("invalid stored list: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_weak_passwords() {
        assert!(matches!(hash_password("Sh0rt"), Err(AppError::BadRequest(_))));
        assert!(matches!(hash_password("alllowercase1"), Err(AppError::BadRequest(_))));
        assert!(matches!(hash_password("NoDigitsHere"), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn hash_then_verify() {
        let hash = hash_password("Password123").unwrap();
        assert!(verify_password("Password123", &hash).unwrap());
        assert!(!verify_password("Password124", &hash).unwrap());
    }

    #[test]
    fn list_columns_tolerate_empty_text() {
        assert!(decode_list("").unwrap().is_empty());
        let encoded = encode_list(&["IoT".to_string(), "Robotics".to_string()]).unwrap();
        assert_eq!(decode_list(&encoded).unwrap(), vec!["IoT", "Robotics"]);
    }
}
