use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::field::{parse_stored, Field};
use crate::models::teacher::TeacherSummary;
use crate::models::user::UserSummary;
use crate::utils::decode_list;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Category {
    Sports,
    Cultural,
    Technical,
    Arts,
    #[serde(rename = "Social Service")]
    SocialService,
    Academic,
    Leadership,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Sports,
        Category::Cultural,
        Category::Technical,
        Category::Arts,
        Category::SocialService,
        Category::Academic,
        Category::Leadership,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Sports => "Sports",
            Category::Cultural => "Cultural",
            Category::Technical => "Technical",
            Category::Arts => "Arts",
            Category::SocialService => "Social Service",
            Category::Academic => "Academic",
            Category::Leadership => "Leadership",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| AppError::bad_request(format!("invalid category: {s}")))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Activity {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub field: Field,
    pub assigned_teacher_id: Uuid,
    pub assigned_teacher: Option<TeacherSummary>,
    pub created_by: Uuid,
    pub creator: Option<UserSummary>,
    pub event_date: DateTime<Utc>,
    pub venue: String,
    /// 0 means unlimited.
    pub max_participants: i64,
    pub tags: Vec<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Activity row joined with its teacher and creator.
#[derive(Debug, Clone, FromRow)]
pub struct DbActivity {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub field: String,
    pub assigned_teacher_id: Uuid,
    pub created_by: Uuid,
    pub event_date: DateTime<Utc>,
    pub venue: String,
    pub max_participants: i64,
    pub tags: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub teacher_name: Option<String>,
    pub teacher_email: Option<String>,
    pub teacher_field: Option<String>,
    pub creator_name: Option<String>,
    pub creator_email: Option<String>,
}

impl TryFrom<DbActivity> for Activity {
    type Error = AppError;

    fn try_from(value: DbActivity) -> Result<Self, Self::Error> {
        let category =
            parse_stored(Some(value.category))?.ok_or_else(|| AppError::internal("activity without category"))?;
        let field = parse_stored(Some(value.field))?.ok_or_else(|| AppError::internal("activity without field"))?;

        let assigned_teacher = match (value.teacher_name, value.teacher_email, parse_stored(value.teacher_field)?) {
            (Some(name), Some(email), Some(field)) => Some(TeacherSummary {
                id: value.assigned_teacher_id,
                name,
                email,
                field,
            }),
            _ => None,
        };

        let creator = match (value.creator_name, value.creator_email) {
            (Some(name), Some(email)) => Some(UserSummary {
                id: value.created_by,
                name,
                email,
            }),
            _ => None,
        };

        Ok(Activity {
            id: value.id,
            title: value.title,
            description: value.description,
            category,
            field,
            assigned_teacher_id: value.assigned_teacher_id,
            assigned_teacher,
            created_by: value.created_by,
            creator,
            event_date: value.event_date,
            venue: value.venue,
            max_participants: value.max_participants,
            tags: decode_list(&value.tags)?,
            is_active: value.is_active,
            created_at: value.created_at,
            updated_at: value.updated_at,
        })
    }
}

/// Projection embedded in achievement listings.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ActivitySummary {
    pub id: Uuid,
    pub title: String,
    pub category: Category,
    pub field: Field,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ActivityCreateRequest {
    #[schema(example = "Inter-College Hackathon")]
    pub title: String,
    #[schema(example = "24-hour hackathon open to all departments.")]
    pub description: String,
    pub category: Category,
    pub field: Field,
    pub assigned_teacher: Uuid,
    #[schema(format = DateTime, example = "2026-11-20T09:00:00Z")]
    pub event_date: DateTime<Utc>,
    #[schema(example = "Main Auditorium")]
    pub venue: String,
    #[schema(example = 0)]
    pub max_participants: Option<i64>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ActivityUpdateRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub field: Option<Field>,
    pub assigned_teacher: Option<Uuid>,
    #[schema(format = DateTime)]
    pub event_date: Option<DateTime<Utc>>,
    pub venue: Option<String>,
    pub max_participants: Option<i64>,
    pub tags: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ActivityListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub category: Option<Category>,
    pub field: Option<Field>,
    /// Case-insensitive match against title and description.
    pub search: Option<String>,
}
