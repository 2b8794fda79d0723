use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::field::{parse_stored, Field};
use crate::utils::decode_list;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Admin,
    #[serde(rename = "superadmin")]
    SuperAdmin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Admin => "admin",
            Role::SuperAdmin => "superadmin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Role::Student),
            "admin" => Ok(Role::Admin),
            "superadmin" => Ok(Role::SuperAdmin),
            other => Err(AppError::bad_request(format!("invalid role: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub is_approved: bool,
    pub is_active: bool,
    /// Students only.
    pub department: Option<Field>,
    /// Students only, 1 to 4.
    pub year: Option<i64>,
    pub skills: Vec<String>,
    pub interests: Vec<String>,
    /// Admins only.
    pub field: Option<Field>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct DbUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub is_approved: bool,
    pub is_active: bool,
    pub department: Option<String>,
    pub year: Option<i64>,
    pub skills: String,
    pub interests: String,
    pub field: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<DbUser> for User {
    type Error = AppError;

    fn try_from(value: DbUser) -> Result<Self, Self::Error> {
        let role = parse_stored::<Role>(Some(value.role))?
            .ok_or_else(|| AppError::internal("user without role"))?;

        Ok(User {
            id: value.id,
            name: value.name,
            email: value.email,
            role,
            is_approved: value.is_approved,
            is_active: value.is_active,
            department: parse_stored(value.department)?,
            year: value.year,
            skills: decode_list(&value.skills)?,
            interests: decode_list(&value.interests)?,
            field: parse_stored(value.field)?,
            created_at: value.created_at,
            updated_at: value.updated_at,
        })
    }
}

/// Compact projection embedded in achievement listings.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StudentSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub department: Option<Field>,
    pub year: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "John Doe")]
    pub name: String,
    #[schema(example = "john.doe@student.edu")]
    pub email: String,
    #[schema(example = "Password123")]
    pub password: String,
    pub role: Role,
    pub department: Option<Field>,
    #[schema(example = 2)]
    pub year: Option<i64>,
    pub field: Option<Field>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "john.doe@student.edu")]
    pub email: String,
    #[schema(example = "Password123")]
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ProfileUpdateRequest {
    pub name: Option<String>,
    pub department: Option<Field>,
    pub year: Option<i64>,
    pub skills: Option<Vec<String>>,
    pub interests: Option<Vec<String>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    pub requires_login: bool,
    pub user: User,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_wire_names() {
        assert_eq!(serde_json::to_string(&Role::SuperAdmin).unwrap(), "\"superadmin\"");
        assert_eq!(serde_json::to_string(&Role::Student).unwrap(), "\"student\"");
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert!("root".parse::<Role>().is_err());
    }

    #[test]
    fn db_user_converts_lists_and_enums() {
        let now = Utc::now();
        let db = DbUser {
            id: Uuid::new_v4(),
            name: "John Doe".into(),
            email: "john@student.edu".into(),
            password_hash: "x".into(),
            role: "student".into(),
            is_approved: true,
            is_active: true,
            department: Some("Computer Science".into()),
            year: Some(2),
            skills: "[\"Rust\"]".into(),
            interests: "[]".into(),
            field: None,
            created_at: now,
            updated_at: now,
        };

        let user = User::try_from(db).unwrap();
        assert_eq!(user.role, Role::Student);
        assert_eq!(user.department, Some(Field::ComputerScience));
        assert_eq!(user.skills, vec!["Rust"]);
        assert!(user.field.is_none());
    }
}
