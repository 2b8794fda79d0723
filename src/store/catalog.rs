//! Teachers and activities.

use sqlx::SqlitePool;
use uuid::Uuid;

use super::{conflict_on_unique, like_pattern};
use crate::errors::{AppError, AppResult};
use crate::models::activity::{Activity, Category, DbActivity};
use crate::models::field::Field;
use crate::models::teacher::{DbTeacher, Teacher};
use crate::models::{FieldCount, PageRequest};
use crate::utils::encode_list;

const TEACHER_COLUMNS: &str = "id, name, email, field, department, phone, designation, is_active, created_at, updated_at";

const ACTIVITY_SELECT: &str = "SELECT a.id, a.title, a.description, a.category, a.field, a.assigned_teacher_id, \
     a.created_by, a.event_date, a.venue, a.max_participants, a.tags, a.is_active, a.created_at, a.updated_at, \
     t.name AS teacher_name, t.email AS teacher_email, t.field AS teacher_field, \
     u.name AS creator_name, u.email AS creator_email \
     FROM activities a \
     LEFT JOIN teachers t ON t.id = a.assigned_teacher_id \
     LEFT JOIN users u ON u.id = a.created_by";

const ACTIVITY_FILTER: &str = "(? IS NULL OR a.category = ?) AND (? IS NULL OR a.field = ?) \
     AND (? IS NULL OR lower(a.title) LIKE ? ESCAPE '\\' OR lower(a.description) LIKE ? ESCAPE '\\')";

pub async fn find_teacher(pool: &SqlitePool, id: Uuid) -> AppResult<Option<Teacher>> {
    let sql = format!("SELECT {TEACHER_COLUMNS} FROM teachers WHERE id = ?");
    let row = sqlx::query_as::<_, DbTeacher>(&sql).bind(id).fetch_optional(pool).await?;

    row.map(Teacher::try_from).transpose()
}

pub async fn get_teacher(pool: &SqlitePool, id: Uuid) -> AppResult<Teacher> {
    find_teacher(pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("teacher not found"))
}

pub async fn list_teachers(pool: &SqlitePool, field: Option<Field>) -> AppResult<Vec<Teacher>> {
    let field = field.map(|f| f.as_str());
    let sql = format!("SELECT {TEACHER_COLUMNS} FROM teachers WHERE (? IS NULL OR field = ?) ORDER BY name ASC");
    let rows = sqlx::query_as::<_, DbTeacher>(&sql)
        .bind(field)
        .bind(field)
        .fetch_all(pool)
        .await?;

    rows.into_iter().map(Teacher::try_from).collect()
}

/// Active teachers assignable to an activity of `field`. Every active teacher
/// qualifies for `General`.
pub async fn teachers_for_field(pool: &SqlitePool, field: Field) -> AppResult<Vec<Teacher>> {
    let filter = (!field.is_general()).then(|| field.as_str());
    let sql = format!(
        "SELECT {TEACHER_COLUMNS} FROM teachers WHERE is_active = 1 AND (? IS NULL OR field = ?) ORDER BY name ASC"
    );
    let rows = sqlx::query_as::<_, DbTeacher>(&sql)
        .bind(filter)
        .bind(filter)
        .fetch_all(pool)
        .await?;

    rows.into_iter().map(Teacher::try_from).collect()
}

pub async fn insert_teacher(pool: &SqlitePool, teacher: &Teacher) -> AppResult<()> {
    sqlx::query(
        "INSERT INTO teachers (id, name, email, field, department, phone, designation, is_active, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(teacher.id)
    .bind(&teacher.name)
    .bind(&teacher.email)
    .bind(teacher.field.as_str())
    .bind(teacher.department.as_str())
    .bind(teacher.phone.as_deref())
    .bind(&teacher.designation)
    .bind(teacher.is_active)
    .bind(teacher.created_at)
    .bind(teacher.updated_at)
    .execute(pool)
    .await
    .map_err(|err| conflict_on_unique(err, "teacher email already in use"))?;

    tracing::info!(teacher_id = %teacher.id, field = %teacher.field, "teacher created");
    Ok(())
}

pub async fn update_teacher(pool: &SqlitePool, teacher: &Teacher) -> AppResult<()> {
    sqlx::query(
        "UPDATE teachers SET name = ?, email = ?, field = ?, department = ?, phone = ?, designation = ?, \
         is_active = ?, updated_at = ? WHERE id = ?",
    )
    .bind(&teacher.name)
    .bind(&teacher.email)
    .bind(teacher.field.as_str())
    .bind(teacher.department.as_str())
    .bind(teacher.phone.as_deref())
    .bind(&teacher.designation)
    .bind(teacher.is_active)
    .bind(teacher.updated_at)
    .bind(teacher.id)
    .execute(pool)
    .await
    .map_err(|err| conflict_on_unique(err, "teacher email already in use"))?;

    Ok(())
}

#[derive(Debug, Clone, Default)]
pub struct ActivityFilter {
    pub category: Option<Category>,
    pub field: Option<Field>,
    pub search: Option<String>,
}

pub async fn find_activity(pool: &SqlitePool, id: Uuid) -> AppResult<Option<Activity>> {
    let sql = format!("{ACTIVITY_SELECT} WHERE a.id = ?");
    let row = sqlx::query_as::<_, DbActivity>(&sql).bind(id).fetch_optional(pool).await?;

    row.map(Activity::try_from).transpose()
}

pub async fn get_activity(pool: &SqlitePool, id: Uuid) -> AppResult<Activity> {
    find_activity(pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("activity not found"))
}

/// Newest first.
pub async fn list_activities(
    pool: &SqlitePool,
    filter: &ActivityFilter,
    page: PageRequest,
) -> AppResult<(Vec<Activity>, i64)> {
    let category = filter.category.map(|c| c.as_str());
    let field = filter.field.map(|f| f.as_str());
    let search = like_pattern(filter.search.as_deref());

    let sql = format!("{ACTIVITY_SELECT} WHERE {ACTIVITY_FILTER} ORDER BY a.created_at DESC LIMIT ? OFFSET ?");
    let rows = sqlx::query_as::<_, DbActivity>(&sql)
        .bind(category)
        .bind(category)
        .bind(field)
        .bind(field)
        .bind(search.as_deref())
        .bind(search.as_deref())
        .bind(search.as_deref())
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(pool)
        .await?;

    let count_sql = format!("SELECT COUNT(1) FROM activities a WHERE {ACTIVITY_FILTER}");
    let total: i64 = sqlx::query_scalar(&count_sql)
        .bind(category)
        .bind(category)
        .bind(field)
        .bind(field)
        .bind(search.as_deref())
        .bind(search.as_deref())
        .bind(search.as_deref())
        .fetch_one(pool)
        .await?;

    let activities = rows.into_iter().map(Activity::try_from).collect::<Result<Vec<_>, _>>()?;
    Ok((activities, total))
}

pub async fn insert_activity(pool: &SqlitePool, activity: &Activity) -> AppResult<()> {
    sqlx::query(
        "INSERT INTO activities (id, title, description, category, field, assigned_teacher_id, created_by, event_date, \
         venue, max_participants, tags, is_active, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(activity.id)
    .bind(&activity.title)
    .bind(&activity.description)
    .bind(activity.category.as_str())
    .bind(activity.field.as_str())
    .bind(activity.assigned_teacher_id)
    .bind(activity.created_by)
    .bind(activity.event_date)
    .bind(&activity.venue)
    .bind(activity.max_participants)
    .bind(encode_list(&activity.tags)?)
    .bind(activity.is_active)
    .bind(activity.created_at)
    .bind(activity.updated_at)
    .execute(pool)
    .await?;

    tracing::info!(activity_id = %activity.id, field = %activity.field, "activity created");
    Ok(())
}

pub async fn update_activity(pool: &SqlitePool, activity: &Activity) -> AppResult<()> {
    sqlx::query(
        "UPDATE activities SET title = ?, description = ?, category = ?, field = ?, assigned_teacher_id = ?, \
         event_date = ?, venue = ?, max_participants = ?, tags = ?, is_active = ?, updated_at = ? WHERE id = ?",
    )
    .bind(&activity.title)
    .bind(&activity.description)
    .bind(activity.category.as_str())
    .bind(activity.field.as_str())
    .bind(activity.assigned_teacher_id)
    .bind(activity.event_date)
    .bind(&activity.venue)
    .bind(activity.max_participants)
    .bind(encode_list(&activity.tags)?)
    .bind(activity.is_active)
    .bind(activity.updated_at)
    .bind(activity.id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Hard delete. Achievements pointing at the activity keep existing with the
/// reference cleared by the foreign key.
pub async fn delete_activity(pool: &SqlitePool, id: Uuid) -> AppResult<bool> {
    let result = sqlx::query("DELETE FROM activities WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() == 1)
}

/// Activities assigned to `teacher_id` that a teacher of `field` could not hold.
/// `General` activities accept any teacher and are never counted.
pub async fn count_mismatched_assignments(pool: &SqlitePool, teacher_id: Uuid, field: Field) -> AppResult<i64> {
    let total: i64 = sqlx::query_scalar(
        "SELECT COUNT(1) FROM activities WHERE assigned_teacher_id = ? AND field <> 'General' AND field <> ?",
    )
    .bind(teacher_id)
    .bind(field.as_str())
    .fetch_one(pool)
    .await?;
    Ok(total)
}

pub async fn count_activities(pool: &SqlitePool, field: Option<Field>) -> AppResult<i64> {
    let field = field.map(|f| f.as_str());
    let total: i64 = sqlx::query_scalar("SELECT COUNT(1) FROM activities WHERE (? IS NULL OR field = ?)")
        .bind(field)
        .bind(field)
        .fetch_one(pool)
        .await?;
    Ok(total)
}

/// Activities per field, largest first.
pub async fn activities_per_field(pool: &SqlitePool, field: Option<Field>) -> AppResult<Vec<FieldCount>> {
    let filter = field.map(|f| f.as_str());
    let rows: Vec<(String, i64)> = sqlx::query_as(
        "SELECT field, COUNT(1) AS count FROM activities WHERE (? IS NULL OR field = ?) \
         GROUP BY field ORDER BY count DESC, field ASC",
    )
    .bind(filter)
    .bind(filter)
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|(field, count)| {
            let field = field
                .parse::<Field>()
                .map_err(|_| AppError::internal(format!("stored activity has unknown field {field}")))?;
            Ok(FieldCount { field, count })
        })
        .collect()
}
