use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::authz::AchievementScope;
use crate::errors::{AppError, AppResult};
use crate::models::achievement::{
    Achievement, AchievementStatus, CategoryCount, DbAchievement, Position, StatusOverview,
};
use crate::models::activity::Category;
use crate::models::PageRequest;
use crate::workflow::ReviewTransition;

const ACHIEVEMENT_SELECT: &str = "SELECT a.id, a.student_id, a.activity_id, a.award_title, a.description, \
     a.position, a.certificate_url, a.proof_document, a.status, a.remarks, a.approved_by, a.approved_at, \
     a.points, a.is_highlighted, a.created_at, a.updated_at, \
     s.name AS student_name, s.email AS student_email, s.department AS student_department, s.year AS student_year, \
     act.title AS activity_title, act.category AS activity_category, act.field AS activity_field, \
     ap.name AS approver_name, ap.email AS approver_email \
     FROM achievements a \
     LEFT JOIN users s ON s.id = a.student_id \
     LEFT JOIN activities act ON act.id = a.activity_id \
     LEFT JOIN users ap ON ap.id = a.approved_by";

/// Student joined as `s`. A department scope never matches an unresolvable student.
const SCOPE_FILTER: &str = "(? IS NULL OR a.student_id = ?) AND (? IS NULL OR s.department = ?)";

const LIST_FILTER: &str = "(? IS NULL OR a.status = ?) AND (? IS NULL OR a.student_id = ?)";

/// Bind values for [`SCOPE_FILTER`].
fn scope_binds(scope: AchievementScope) -> (Option<Uuid>, Option<&'static str>) {
    match scope {
        AchievementScope::Own(student_id) => (Some(student_id), None),
        AchievementScope::Department(field) => (None, Some(field.as_str())),
        AchievementScope::Unrestricted => (None, None),
    }
}

#[derive(Debug, Clone)]
pub struct NewAchievement {
    pub student_id: Uuid,
    pub activity_id: Option<Uuid>,
    pub award_title: String,
    pub description: String,
    pub position: Position,
    pub certificate_url: String,
    pub proof_document: String,
    pub points: i64,
    pub is_highlighted: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AchievementFilter {
    pub status: Option<AchievementStatus>,
    pub student: Option<Uuid>,
}

pub async fn insert(pool: &SqlitePool, new: NewAchievement) -> AppResult<Achievement> {
    let id = Uuid::new_v4();
    let now = crate::utils::utc_now();

    sqlx::query(
        "INSERT INTO achievements (id, student_id, activity_id, award_title, description, position, certificate_url, \
         proof_document, status, points, is_highlighted, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, 'pending', ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(new.student_id)
    .bind(new.activity_id)
    .bind(&new.award_title)
    .bind(&new.description)
    .bind(new.position.as_str())
    .bind(&new.certificate_url)
    .bind(&new.proof_document)
    .bind(new.points)
    .bind(new.is_highlighted)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    tracing::info!(achievement_id = %id, student_id = %new.student_id, "achievement submitted");

    get(pool, id).await
}

pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> AppResult<Option<Achievement>> {
    let sql = format!("{ACHIEVEMENT_SELECT} WHERE a.id = ?");
    let row = sqlx::query_as::<_, DbAchievement>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.map(Achievement::try_from).transpose()
}

pub async fn get(pool: &SqlitePool, id: Uuid) -> AppResult<Achievement> {
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("achievement not found"))
}

/// Newest first, restricted to `scope`.
pub async fn list(
    pool: &SqlitePool,
    scope: AchievementScope,
    filter: AchievementFilter,
    page: PageRequest,
) -> AppResult<(Vec<Achievement>, i64)> {
    let (own, department) = scope_binds(scope);
    let status = filter.status.map(|s| s.as_str());

    let sql = format!(
        "{ACHIEVEMENT_SELECT} WHERE {SCOPE_FILTER} AND {LIST_FILTER} ORDER BY a.created_at DESC LIMIT ? OFFSET ?"
    );
    let rows = sqlx::query_as::<_, DbAchievement>(&sql)
        .bind(own)
        .bind(own)
        .bind(department)
        .bind(department)
        .bind(status)
        .bind(status)
        .bind(filter.student)
        .bind(filter.student)
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(pool)
        .await?;

    let count_sql = format!(
        "SELECT COUNT(1) FROM achievements a LEFT JOIN users s ON s.id = a.student_id \
         WHERE {SCOPE_FILTER} AND {LIST_FILTER}"
    );
    let total: i64 = sqlx::query_scalar(&count_sql)
        .bind(own)
        .bind(own)
        .bind(department)
        .bind(department)
        .bind(status)
        .bind(status)
        .bind(filter.student)
        .bind(filter.student)
        .fetch_one(pool)
        .await?;

    let achievements = rows.into_iter().map(Achievement::try_from).collect::<Result<Vec<_>, _>>()?;
    Ok((achievements, total))
}

/// Applies a review only while the record is still pending. Returns whether
/// this call won the transition.
pub async fn apply_review(
    pool: &SqlitePool,
    id: Uuid,
    transition: &ReviewTransition,
    now: DateTime<Utc>,
) -> AppResult<bool> {
    let result = sqlx::query(
        "UPDATE achievements SET status = ?, remarks = ?, approved_by = ?, approved_at = ?, updated_at = ? \
         WHERE id = ? AND status = 'pending'",
    )
    .bind(transition.status.as_str())
    .bind(transition.remarks.as_deref())
    .bind(transition.approved_by)
    .bind(transition.approved_at)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}

pub async fn status_overview(pool: &SqlitePool, scope: AchievementScope) -> AppResult<StatusOverview> {
    let (own, department) = scope_binds(scope);

    let sql = format!(
        "SELECT \
           COUNT(1) AS total, \
           COUNT(CASE WHEN a.status = 'approved' THEN 1 END) AS approved, \
           COUNT(CASE WHEN a.status = 'pending' THEN 1 END) AS pending, \
           COUNT(CASE WHEN a.status = 'rejected' THEN 1 END) AS rejected \
         FROM achievements a LEFT JOIN users s ON s.id = a.student_id \
         WHERE {SCOPE_FILTER}"
    );
    let overview = sqlx::query_as::<_, StatusOverview>(&sql)
        .bind(own)
        .bind(own)
        .bind(department)
        .bind(department)
        .fetch_one(pool)
        .await?;

    Ok(overview)
}

/// Achievements per activity category. Records without an activity are not counted.
pub async fn per_category(pool: &SqlitePool, scope: AchievementScope) -> AppResult<Vec<CategoryCount>> {
    let (own, department) = scope_binds(scope);

    let sql = format!(
        "SELECT act.category, COUNT(1) AS count \
         FROM achievements a \
         JOIN activities act ON act.id = a.activity_id \
         LEFT JOIN users s ON s.id = a.student_id \
         WHERE {SCOPE_FILTER} \
         GROUP BY act.category ORDER BY count DESC, act.category ASC"
    );
    let rows: Vec<(String, i64)> = sqlx::query_as(&sql)
        .bind(own)
        .bind(own)
        .bind(department)
        .bind(department)
        .fetch_all(pool)
        .await?;

    rows.into_iter()
        .map(|(category, count)| {
            let category = category
                .parse::<Category>()
                .map_err(|_| AppError::internal(format!("stored activity has unknown category {category}")))?;
            Ok(CategoryCount { category, count })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::field::Field;

    #[test]
    fn scope_binds_match_filter_columns() {
        let id = Uuid::new_v4();
        assert_eq!(scope_binds(AchievementScope::Own(id)), (Some(id), None));
        assert_eq!(
            scope_binds(AchievementScope::Department(Field::Civil)),
            (None, Some("Civil"))
        );
        assert_eq!(scope_binds(AchievementScope::Unrestricted), (None, None));
    }
}
