use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::activity::{ActivitySummary, Category};
use crate::models::field::{parse_stored, Field};
use crate::models::user::{StudentSummary, UserSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AchievementStatus {
    Pending,
    Approved,
    Rejected,
}

impl AchievementStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AchievementStatus::Pending => "pending",
            AchievementStatus::Approved => "approved",
            AchievementStatus::Rejected => "rejected",
        }
    }
}

impl Default for AchievementStatus {
    fn default() -> Self {
        AchievementStatus::Pending
    }
}

impl fmt::Display for AchievementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AchievementStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(AchievementStatus::Pending),
            "approved" => Ok(AchievementStatus::Approved),
            "rejected" => Ok(AchievementStatus::Rejected),
            other => Err(AppError::bad_request(format!("invalid status: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Position {
    #[serde(rename = "1st")]
    First,
    #[serde(rename = "2nd")]
    Second,
    #[serde(rename = "3rd")]
    Third,
    Winner,
    #[serde(rename = "Runner-up")]
    RunnerUp,
    Participation,
    #[serde(rename = "Special Recognition")]
    SpecialRecognition,
}

impl Position {
    pub const ALL: [Position; 7] = [
        Position::First,
        Position::Second,
        Position::Third,
        Position::Winner,
        Position::RunnerUp,
        Position::Participation,
        Position::SpecialRecognition,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Position::First => "1st",
            Position::Second => "2nd",
            Position::Third => "3rd",
            Position::Winner => "Winner",
            Position::RunnerUp => "Runner-up",
            Position::Participation => "Participation",
            Position::SpecialRecognition => "Special Recognition",
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::Participation
    }
}

impl FromStr for Position {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|position| position.as_str() == s)
            .ok_or_else(|| AppError::bad_request(format!("invalid position: {s}")))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Achievement {
    pub id: Uuid,
    pub student_id: Uuid,
    pub student: Option<StudentSummary>,
    pub activity_id: Option<Uuid>,
    pub activity: Option<ActivitySummary>,
    pub award_title: String,
    pub description: String,
    pub position: Position,
    pub certificate_url: String,
    pub proof_document: String,
    pub status: AchievementStatus,
    pub remarks: Option<String>,
    pub approved_by: Option<Uuid>,
    pub approver: Option<UserSummary>,
    pub approved_at: Option<DateTime<Utc>>,
    pub points: i64,
    pub is_highlighted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Achievement row joined with its student, activity and reviewer.
#[derive(Debug, Clone, FromRow)]
pub struct DbAchievement {
    pub id: Uuid,
    pub student_id: Uuid,
    pub activity_id: Option<Uuid>,
    pub award_title: String,
    pub description: String,
    pub position: String,
    pub certificate_url: String,
    pub proof_document: String,
    pub status: String,
    pub remarks: Option<String>,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTime<Utc>>,
    pub points: i64,
    pub is_highlighted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub student_name: Option<String>,
    pub student_email: Option<String>,
    pub student_department: Option<String>,
    pub student_year: Option<i64>,
    pub activity_title: Option<String>,
    pub activity_category: Option<String>,
    pub activity_field: Option<String>,
    pub approver_name: Option<String>,
    pub approver_email: Option<String>,
}

impl TryFrom<DbAchievement> for Achievement {
    type Error = AppError;

    fn try_from(value: DbAchievement) -> Result<Self, Self::Error> {
        let position =
            parse_stored(Some(value.position))?.ok_or_else(|| AppError::internal("achievement without position"))?;
        let status =
            parse_stored(Some(value.status))?.ok_or_else(|| AppError::internal("achievement without status"))?;

        let student = match (value.student_name, value.student_email) {
            (Some(name), Some(email)) => Some(StudentSummary {
                id: value.student_id,
                name,
                email,
                department: parse_stored(value.student_department)?,
                year: value.student_year,
            }),
            _ => None,
        };

        let activity_category: Option<Category> = parse_stored(value.activity_category)?;
        let activity_field: Option<Field> = parse_stored(value.activity_field)?;
        let activity = match (value.activity_id, value.activity_title, activity_category, activity_field) {
            (Some(id), Some(title), Some(category), Some(field)) => Some(ActivitySummary {
                id,
                title,
                category,
                field,
            }),
            _ => None,
        };

        let approver = match (value.approved_by, value.approver_name, value.approver_email) {
            (Some(id), Some(name), Some(email)) => Some(UserSummary { id, name, email }),
            _ => None,
        };

        Ok(Achievement {
            id: value.id,
            student_id: value.student_id,
            student,
            activity_id: value.activity_id,
            activity,
            award_title: value.award_title,
            description: value.description,
            position,
            certificate_url: value.certificate_url,
            proof_document: value.proof_document,
            status,
            remarks: value.remarks,
            approved_by: value.approved_by,
            approver,
            approved_at: value.approved_at,
            points: value.points,
            is_highlighted: value.is_highlighted,
            created_at: value.created_at,
            updated_at: value.updated_at,
        })
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AchievementCreateRequest {
    /// Target student; required for admins, ignored for students.
    pub student: Option<Uuid>,
    pub activity: Option<Uuid>,
    #[schema(example = "Hackathon Win")]
    pub award_title: String,
    #[schema(example = "First place at the inter-college hackathon.")]
    pub description: String,
    pub position: Option<Position>,
    pub certificate_url: Option<String>,
    pub proof_document: Option<String>,
    /// Admins only.
    pub points: Option<i64>,
    /// Admins only.
    pub is_highlighted: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct StatusUpdateRequest {
    pub status: AchievementStatus,
    #[schema(example = "Verified")]
    pub remarks: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AchievementListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<AchievementStatus>,
    /// Ignored for students, who only ever see their own records.
    pub student: Option<Uuid>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize, ToSchema, FromRow)]
pub struct StatusOverview {
    pub total: i64,
    pub approved: i64,
    pub pending: i64,
    pub rejected: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryCount {
    pub category: Category,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AchievementStats {
    pub overview: StatusOverview,
    pub by_category: Vec<CategoryCount>,
}
