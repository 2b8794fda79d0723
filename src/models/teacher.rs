use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::field::{parse_stored, Field};

pub const DEFAULT_DESIGNATION: &str = "Assistant Professor";

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Teacher {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub field: Field,
    pub department: Field,
    pub phone: Option<String>,
    pub designation: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct DbTeacher {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub field: String,
    pub department: String,
    pub phone: Option<String>,
    pub designation: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<DbTeacher> for Teacher {
    type Error = AppError;

    fn try_from(value: DbTeacher) -> Result<Self, Self::Error> {
        let field = parse_stored(Some(value.field))?.ok_or_else(|| AppError::internal("teacher without field"))?;
        let department =
            parse_stored(Some(value.department))?.ok_or_else(|| AppError::internal("teacher without department"))?;

        Ok(Teacher {
            id: value.id,
            name: value.name,
            email: value.email,
            field,
            department,
            phone: value.phone,
            designation: value.designation,
            is_active: value.is_active,
            created_at: value.created_at,
            updated_at: value.updated_at,
        })
    }
}

/// Assignment projection embedded in activities.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TeacherSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub field: Field,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TeacherCreateRequest {
    #[schema(example = "Dr. Robert Wilson")]
    pub name: String,
    #[schema(example = "robert.wilson@university.edu")]
    pub email: String,
    pub field: Field,
    pub department: Field,
    #[schema(example = "1234567890")]
    pub phone: Option<String>,
    #[schema(example = "Professor")]
    pub designation: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct TeacherUpdateRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub field: Option<Field>,
    pub department: Option<Field>,
    pub phone: Option<String>,
    pub designation: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TeacherListQuery {
    pub field: Option<Field>,
}
