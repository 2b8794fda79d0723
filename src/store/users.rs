use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use super::conflict_on_unique;
use crate::authz::StudentScope;
use crate::errors::{AppError, AppResult};
use crate::models::field::Field;
use crate::models::user::{DbUser, Role, User};
use crate::models::{PageRequest, SystemStats};
use crate::utils::{encode_list, utc_now};

const USER_COLUMNS: &str = "id, name, email, password_hash, role, is_approved, is_active, department, year, \
                            skills, interests, field, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub is_approved: bool,
    pub department: Option<Field>,
    pub year: Option<i64>,
    pub field: Option<Field>,
}

pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> AppResult<Option<User>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?");
    let row = sqlx::query_as::<_, DbUser>(&sql).bind(id).fetch_optional(pool).await?;

    row.map(User::try_from).transpose()
}

pub async fn get(pool: &SqlitePool, id: Uuid) -> AppResult<User> {
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("user not found"))
}

/// Includes the password hash, for credential checks only.
pub async fn find_credentials(pool: &SqlitePool, email: &str) -> AppResult<Option<DbUser>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?");
    let row = sqlx::query_as::<_, DbUser>(&sql).bind(email).fetch_optional(pool).await?;
    Ok(row)
}

pub async fn email_taken(pool: &SqlitePool, email: &str) -> AppResult<bool> {
    let taken: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = ?)")
        .bind(email)
        .fetch_one(pool)
        .await?;
    Ok(taken)
}

pub async fn insert(pool: &SqlitePool, new: NewUser) -> AppResult<User> {
    let id = Uuid::new_v4();
    let now = utc_now();

    sqlx::query(
        "INSERT INTO users (id, name, email, password_hash, role, is_approved, is_active, department, year, \
         skills, interests, field, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, 1, ?, ?, '[]', '[]', ?, ?, ?)",
    )
    .bind(id)
    .bind(&new.name)
    .bind(&new.email)
    .bind(&new.password_hash)
    .bind(new.role.as_str())
    .bind(new.is_approved)
    .bind(new.department.map(|d| d.as_str()))
    .bind(new.year)
    .bind(new.field.map(|f| f.as_str()))
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .map_err(|err| conflict_on_unique(err, "email already in use"))?;

    tracing::info!(user_id = %id, role = %new.role, "user created");

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::internal("inserted user could not be reloaded"))
}

/// Writes the profile attributes of `user` back.
pub async fn save_profile(pool: &SqlitePool, user: &User) -> AppResult<User> {
    sqlx::query(
        "UPDATE users SET name = ?, department = ?, year = ?, skills = ?, interests = ?, updated_at = ? WHERE id = ?",
    )
    .bind(&user.name)
    .bind(user.department.map(|d| d.as_str()))
    .bind(user.year)
    .bind(encode_list(&user.skills)?)
    .bind(encode_list(&user.interests)?)
    .bind(utc_now())
    .bind(user.id)
    .execute(pool)
    .await?;

    get(pool, user.id).await
}

pub async fn list_students(pool: &SqlitePool, scope: StudentScope, page: PageRequest) -> AppResult<(Vec<User>, i64)> {
    let department = scope.field().map(|f| f.as_str());

    let sql = format!(
        "SELECT {USER_COLUMNS} FROM users WHERE role = 'student' AND (? IS NULL OR department = ?) \
         ORDER BY name ASC LIMIT ? OFFSET ?"
    );
    let rows = sqlx::query_as::<_, DbUser>(&sql)
        .bind(department)
        .bind(department)
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(pool)
        .await?;

    let students = rows.into_iter().map(User::try_from).collect::<Result<Vec<_>, _>>()?;
    let total = count_students(pool, scope).await?;

    Ok((students, total))
}

pub async fn count_students(pool: &SqlitePool, scope: StudentScope) -> AppResult<i64> {
    let department = scope.field().map(|f| f.as_str());

    let total: i64 =
        sqlx::query_scalar("SELECT COUNT(1) FROM users WHERE role = 'student' AND (? IS NULL OR department = ?)")
            .bind(department)
            .bind(department)
            .fetch_one(pool)
            .await?;
    Ok(total)
}

pub async fn list_all(pool: &SqlitePool, page: PageRequest) -> AppResult<(Vec<User>, i64)> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC LIMIT ? OFFSET ?");
    let rows = sqlx::query_as::<_, DbUser>(&sql)
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(pool)
        .await?;

    let users = rows.into_iter().map(User::try_from).collect::<Result<Vec<_>, _>>()?;
    let total: i64 = sqlx::query_scalar("SELECT COUNT(1) FROM users").fetch_one(pool).await?;

    Ok((users, total))
}

pub async fn pending_admins(pool: &SqlitePool) -> AppResult<Vec<User>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE role = 'admin' AND is_approved = 0 ORDER BY created_at ASC");
    let rows = sqlx::query_as::<_, DbUser>(&sql).fetch_all(pool).await?;

    rows.into_iter().map(User::try_from).collect()
}

/// Conditional on the account still being an unapproved admin. Returns
/// whether this call performed the approval.
pub async fn mark_approved(pool: &SqlitePool, id: Uuid, now: DateTime<Utc>) -> AppResult<bool> {
    let result = sqlx::query(
        "UPDATE users SET is_approved = 1, updated_at = ? WHERE id = ? AND role = 'admin' AND is_approved = 0",
    )
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Only ever removes unapproved admins.
pub async fn remove_unapproved_admin(pool: &SqlitePool, id: Uuid) -> AppResult<bool> {
    let result = sqlx::query("DELETE FROM users WHERE id = ? AND role = 'admin' AND is_approved = 0")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() == 1)
}

pub async fn set_active(pool: &SqlitePool, id: Uuid, is_active: bool, now: DateTime<Utc>) -> AppResult<User> {
    sqlx::query("UPDATE users SET is_active = ?, updated_at = ? WHERE id = ?")
        .bind(is_active)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;

    get(pool, id).await
}

pub async fn system_stats(pool: &SqlitePool) -> AppResult<SystemStats> {
    let stats = sqlx::query_as::<_, SystemStats>(
        "SELECT \
           COUNT(1) AS total_users, \
           COUNT(CASE WHEN role = 'student' THEN 1 END) AS total_students, \
           COUNT(CASE WHEN role = 'admin' AND is_approved = 1 THEN 1 END) AS total_admins, \
           COUNT(CASE WHEN role = 'admin' AND is_approved = 0 THEN 1 END) AS pending_admins, \
           COUNT(CASE WHEN is_active = 1 THEN 1 END) AS active_users \
         FROM users",
    )
    .fetch_one(pool)
    .await?;

    Ok(stats)
}

pub async fn find_superadmin(pool: &SqlitePool) -> AppResult<Option<User>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE role = 'superadmin' ORDER BY created_at ASC LIMIT 1");
    let row = sqlx::query_as::<_, DbUser>(&sql).fetch_optional(pool).await?;

    row.map(User::try_from).transpose()
}
