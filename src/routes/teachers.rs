use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use crate::app::AppState;
use crate::authz::{self, Action, Actor};
use crate::errors::{AppError, AppResult};
use crate::models::teacher::{
    Teacher, TeacherCreateRequest, TeacherListQuery, TeacherUpdateRequest, DEFAULT_DESIGNATION,
};
use crate::models::ApiResponse;
use crate::store::catalog;
use crate::utils::utc_now;
use crate::validation;

#[utoipa::path(
    get,
    path = "/teachers",
    tag = "Teachers",
    security(("bearerAuth" = [])),
    params(TeacherListQuery),
    responses((status = 200, description = "Teachers sorted by name", body = crate::models::TeacherListEnvelope))
)]
pub async fn list_teachers(
    State(state): State<AppState>,
    actor: Actor,
    Query(query): Query<TeacherListQuery>,
) -> AppResult<Json<ApiResponse<Vec<Teacher>>>> {
    authz::authorize(&actor, Action::ListTeachers)?;
    let teachers = catalog::list_teachers(&state.pool, query.field).await?;
    Ok(Json(ApiResponse::ok(teachers)))
}

#[utoipa::path(
    post,
    path = "/teachers",
    tag = "Teachers",
    security(("bearerAuth" = [])),
    request_body = TeacherCreateRequest,
    responses(
        (status = 201, description = "Teacher created", body = crate::models::TeacherEnvelope),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Admins only"),
        (status = 409, description = "Email already in use")
    )
)]
pub async fn create_teacher(
    State(state): State<AppState>,
    actor: Actor,
    Json(payload): Json<TeacherCreateRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Teacher>>)> {
    authz::authorize(&actor, Action::ManageTeachers)?;

    let designation = payload
        .designation
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or(DEFAULT_DESIGNATION)
        .to_string();

    let now = utc_now();
    let teacher = Teacher {
        id: Uuid::new_v4(),
        name: validation::teacher_name(&payload.name)?,
        email: validation::email(&payload.email)?,
        field: payload.field.require_department()?,
        department: payload.department.require_department()?,
        phone: validation::phone(payload.phone.as_deref())?,
        designation,
        is_active: true,
        created_at: now,
        updated_at: now,
    };

    catalog::insert_teacher(&state.pool, &teacher).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message("Teacher created successfully", teacher)),
    ))
}

#[utoipa::path(
    put,
    path = "/teachers/{id}",
    tag = "Teachers",
    security(("bearerAuth" = [])),
    params(("id" = Uuid, Path, description = "Teacher id")),
    request_body = TeacherUpdateRequest,
    responses(
        (status = 200, description = "Teacher updated", body = crate::models::TeacherEnvelope),
        (status = 400, description = "Invalid input, or a field change that strands assigned activities"),
        (status = 403, description = "Admins only"),
        (status = 404, description = "Teacher not found"),
        (status = 409, description = "Email already in use")
    )
)]
pub async fn update_teacher(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
    Json(payload): Json<TeacherUpdateRequest>,
) -> AppResult<Json<ApiResponse<Teacher>>> {
    authz::authorize(&actor, Action::ManageTeachers)?;

    let mut teacher = catalog::get_teacher(&state.pool, id).await?;

    if let Some(name) = payload.name.as_deref() {
        teacher.name = validation::teacher_name(name)?;
    }
    if let Some(email) = payload.email.as_deref() {
        teacher.email = validation::email(email)?;
    }
    if let Some(field) = payload.field {
        let field = field.require_department()?;
        if field != teacher.field {
            let stranded = catalog::count_mismatched_assignments(&state.pool, teacher.id, field).await?;
            if stranded > 0 {
                return Err(AppError::bad_request(format!(
                    "teacher is assigned to {stranded} activities outside {field}; reassign them first"
                )));
            }
        }
        teacher.field = field;
    }
    if let Some(department) = payload.department {
        teacher.department = department.require_department()?;
    }
    if payload.phone.is_some() {
        teacher.phone = validation::phone(payload.phone.as_deref())?;
    }
    if let Some(designation) = payload.designation.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
        teacher.designation = designation.to_string();
    }
    if let Some(is_active) = payload.is_active {
        teacher.is_active = is_active;
    }

    teacher.updated_at = utc_now();
    catalog::update_teacher(&state.pool, &teacher).await?;

    Ok(Json(ApiResponse::with_message("Teacher updated successfully", teacher)))
}
