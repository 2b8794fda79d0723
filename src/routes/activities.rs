use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use crate::app::AppState;
use crate::authz::{self, Action, Actor};
use crate::errors::{AppError, AppResult};
use crate::models::activity::{Activity, ActivityCreateRequest, ActivityListQuery, ActivityUpdateRequest};
use crate::models::field::Field;
use crate::models::teacher::Teacher;
use crate::models::{ApiResponse, Page, PageRequest, Pagination};
use crate::store::catalog::{self, ActivityFilter};
use crate::utils::utc_now;
use crate::validation;

#[utoipa::path(
    get,
    path = "/activities",
    tag = "Activities",
    security(("bearerAuth" = [])),
    params(ActivityListQuery),
    responses((status = 200, description = "Activities, newest first", body = crate::models::ActivityPageEnvelope))
)]
pub async fn list_activities(
    State(state): State<AppState>,
    actor: Actor,
    Query(query): Query<ActivityListQuery>,
) -> AppResult<Json<ApiResponse<Page<Activity>>>> {
    authz::authorize(&actor, Action::ListActivities)?;

    let filter = ActivityFilter {
        category: query.category,
        field: query.field,
        search: query.search,
    };
    let page = PageRequest::new(query.page, query.limit);

    let (items, total) = catalog::list_activities(&state.pool, &filter, page).await?;

    Ok(Json(ApiResponse::ok(Page {
        items,
        pagination: Pagination::new(page, total),
    })))
}

#[utoipa::path(
    get,
    path = "/activities/{id}",
    tag = "Activities",
    security(("bearerAuth" = [])),
    params(("id" = Uuid, Path, description = "Activity id")),
    responses(
        (status = 200, description = "Activity detail", body = crate::models::ActivityEnvelope),
        (status = 404, description = "Activity not found")
    )
)]
pub async fn get_activity(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Activity>>> {
    authz::authorize(&actor, Action::ListActivities)?;
    let activity = catalog::get_activity(&state.pool, id).await?;
    Ok(Json(ApiResponse::ok(activity)))
}

#[utoipa::path(
    post,
    path = "/activities",
    tag = "Activities",
    security(("bearerAuth" = [])),
    request_body = ActivityCreateRequest,
    responses(
        (status = 201, description = "Activity created", body = crate::models::ActivityEnvelope),
        (status = 400, description = "Invalid input or teacher outside the activity field"),
        (status = 403, description = "Admins only"),
        (status = 404, description = "Teacher not found")
    )
)]
pub async fn create_activity(
    State(state): State<AppState>,
    actor: Actor,
    Json(payload): Json<ActivityCreateRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Activity>>)> {
    authz::authorize(&actor, Action::ManageActivities)?;

    let title = validation::title(&payload.title, "title")?;
    let description = validation::description(&payload.description)?;
    let venue = validation::venue(&payload.venue)?;
    let max_participants = validation::non_negative(payload.max_participants.unwrap_or(0), "max participants")?;

    let teacher = catalog::get_teacher(&state.pool, payload.assigned_teacher).await?;
    authz::ensure_teacher_assignment(payload.field, teacher.field)?;

    let now = utc_now();
    let activity = Activity {
        id: Uuid::new_v4(),
        title,
        description,
        category: payload.category,
        field: payload.field,
        assigned_teacher_id: teacher.id,
        assigned_teacher: None,
        created_by: actor.user_id,
        creator: None,
        event_date: payload.event_date,
        venue,
        max_participants,
        tags: validation::tags(payload.tags.unwrap_or_default()),
        is_active: true,
        created_at: now,
        updated_at: now,
    };

    catalog::insert_activity(&state.pool, &activity).await?;
    let activity = catalog::get_activity(&state.pool, activity.id).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message("Activity created successfully", activity)),
    ))
}

#[utoipa::path(
    put,
    path = "/activities/{id}",
    tag = "Activities",
    security(("bearerAuth" = [])),
    params(("id" = Uuid, Path, description = "Activity id")),
    request_body = ActivityUpdateRequest,
    responses(
        (status = 200, description = "Activity updated", body = crate::models::ActivityEnvelope),
        (status = 400, description = "Invalid input or teacher outside the activity field"),
        (status = 403, description = "Admins only"),
        (status = 404, description = "Activity or teacher not found")
    )
)]
pub async fn update_activity(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
    Json(payload): Json<ActivityUpdateRequest>,
) -> AppResult<Json<ApiResponse<Activity>>> {
    authz::authorize(&actor, Action::ManageActivities)?;

    let mut activity = catalog::get_activity(&state.pool, id).await?;

    if let Some(title) = payload.title.as_deref() {
        activity.title = validation::title(title, "title")?;
    }
    if let Some(description) = payload.description.as_deref() {
        activity.description = validation::description(description)?;
    }
    if let Some(venue) = payload.venue.as_deref() {
        activity.venue = validation::venue(venue)?;
    }
    if let Some(max_participants) = payload.max_participants {
        activity.max_participants = validation::non_negative(max_participants, "max participants")?;
    }
    if let Some(category) = payload.category {
        activity.category = category;
    }
    if let Some(field) = payload.field {
        activity.field = field;
    }
    if let Some(teacher_id) = payload.assigned_teacher {
        activity.assigned_teacher_id = teacher_id;
    }
    if let Some(event_date) = payload.event_date {
        activity.event_date = event_date;
    }
    if let Some(tags) = payload.tags {
        activity.tags = validation::tags(tags);
    }
    if let Some(is_active) = payload.is_active {
        activity.is_active = is_active;
    }

    let teacher = catalog::get_teacher(&state.pool, activity.assigned_teacher_id).await?;
    authz::ensure_teacher_assignment(activity.field, teacher.field)?;

    activity.updated_at = utc_now();
    catalog::update_activity(&state.pool, &activity).await?;

    let activity = catalog::get_activity(&state.pool, id).await?;
    Ok(Json(ApiResponse::with_message("Activity updated successfully", activity)))
}

#[utoipa::path(
    delete,
    path = "/activities/{id}",
    tag = "Activities",
    security(("bearerAuth" = [])),
    params(("id" = Uuid, Path, description = "Activity id")),
    responses(
        (status = 200, description = "Activity deleted"),
        (status = 403, description = "Admins only"),
        (status = 404, description = "Activity not found")
    )
)]
pub async fn delete_activity(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<()>>> {
    authz::authorize(&actor, Action::ManageActivities)?;

    if !catalog::delete_activity(&state.pool, id).await? {
        return Err(AppError::not_found("activity not found"));
    }

    tracing::info!(activity_id = %id, deleted_by = %actor.user_id, "activity deleted");
    Ok(Json(ApiResponse::with_message("Activity deleted successfully", ())))
}

#[utoipa::path(
    get,
    path = "/activities/teachers/{field}",
    tag = "Activities",
    security(("bearerAuth" = [])),
    params(("field" = String, Path, description = "Field name, e.g. `Computer Science` or `General`")),
    responses(
        (status = 200, description = "Active teachers assignable to the field", body = crate::models::TeacherListEnvelope),
        (status = 400, description = "Unknown field")
    )
)]
pub async fn teachers_by_field(
    State(state): State<AppState>,
    actor: Actor,
    Path(field): Path<String>,
) -> AppResult<Json<ApiResponse<Vec<Teacher>>>> {
    authz::authorize(&actor, Action::ListFieldTeachers)?;

    let field: Field = field.parse()?;
    let teachers = catalog::teachers_for_field(&state.pool, field).await?;

    Ok(Json(ApiResponse::ok(teachers)))
}
