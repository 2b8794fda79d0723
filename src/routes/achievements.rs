use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use crate::app::AppState;
use crate::authz::{self, Action, Actor};
use crate::errors::{AppError, AppResult};
use crate::models::achievement::{
    Achievement, AchievementCreateRequest, AchievementListQuery, AchievementStats, StatusUpdateRequest,
};
use crate::models::user::Role;
use crate::models::{ApiResponse, Page, PageRequest, Pagination};
use crate::store::achievements::{self, AchievementFilter, NewAchievement};
use crate::store::{catalog, users};
use crate::utils::utc_now;
use crate::validation;
use crate::workflow;

#[utoipa::path(
    get,
    path = "/achievements",
    tag = "Achievements",
    security(("bearerAuth" = [])),
    params(AchievementListQuery),
    responses(
        (status = 200, description = "Achievements visible to the caller, newest first", body = crate::models::AchievementPageEnvelope),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn list_achievements(
    State(state): State<AppState>,
    actor: Actor,
    Query(query): Query<AchievementListQuery>,
) -> AppResult<Json<ApiResponse<Page<Achievement>>>> {
    authz::authorize(&actor, Action::ListAchievements)?;
    let scope = authz::achievement_scope(&actor)?;

    let filter = AchievementFilter {
        status: query.status,
        student: if actor.role == Role::Student { None } else { query.student },
    };
    let page = PageRequest::new(query.page, query.limit);

    let (items, total) = achievements::list(&state.pool, scope, filter, page).await?;

    Ok(Json(ApiResponse::ok(Page {
        items,
        pagination: Pagination::new(page, total),
    })))
}

#[utoipa::path(
    post,
    path = "/achievements",
    tag = "Achievements",
    security(("bearerAuth" = [])),
    request_body = AchievementCreateRequest,
    responses(
        (status = 201, description = "Achievement submitted for review", body = crate::models::AchievementEnvelope),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Target student outside the caller's field"),
        (status = 404, description = "Student or activity not found")
    )
)]
pub async fn create_achievement(
    State(state): State<AppState>,
    actor: Actor,
    Json(payload): Json<AchievementCreateRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Achievement>>)> {
    authz::authorize(&actor, Action::CreateAchievement)?;
    let student_id = authz::creation_target(&actor, payload.student)?;

    if actor.role != Role::Student {
        let student = users::get(&state.pool, student_id).await?;
        if student.role != Role::Student {
            return Err(AppError::bad_request("achievements can only be recorded for students"));
        }
        if !authz::achievement_scope(&actor)?.admits(student.id, student.department) {
            return Err(AppError::forbidden("student is outside your field"));
        }
    }

    let award_title = validation::title(&payload.award_title, "award title")?;
    let description = validation::description(&payload.description)?;

    if let Some(activity_id) = payload.activity {
        catalog::get_activity(&state.pool, activity_id).await?;
    }

    let (points, is_highlighted) = if authz::may_curate(&actor) {
        (
            validation::non_negative(payload.points.unwrap_or(0), "points")?,
            payload.is_highlighted.unwrap_or(false),
        )
    } else {
        (0, false)
    };

    let achievement = achievements::insert(
        &state.pool,
        NewAchievement {
            student_id,
            activity_id: payload.activity,
            award_title,
            description,
            position: payload.position.unwrap_or_default(),
            certificate_url: payload.certificate_url.unwrap_or_default().trim().to_string(),
            proof_document: payload.proof_document.unwrap_or_default().trim().to_string(),
            points,
            is_highlighted,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message("Achievement submitted successfully", achievement)),
    ))
}

#[utoipa::path(
    put,
    path = "/achievements/{id}/status",
    tag = "Achievements",
    security(("bearerAuth" = [])),
    params(("id" = Uuid, Path, description = "Achievement id")),
    request_body = StatusUpdateRequest,
    responses(
        (status = 200, description = "Achievement reviewed", body = crate::models::AchievementEnvelope),
        (status = 400, description = "Invalid target status or missing remarks"),
        (status = 403, description = "Caller may not review this achievement"),
        (status = 404, description = "Achievement not found"),
        (status = 409, description = "Achievement already reviewed")
    )
)]
pub async fn update_status(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
    Json(payload): Json<StatusUpdateRequest>,
) -> AppResult<Json<ApiResponse<Achievement>>> {
    authz::authorize(&actor, Action::ReviewAchievement)?;
    let scope = authz::achievement_scope(&actor)?;

    let achievement = achievements::get(&state.pool, id).await?;
    let student_department = achievement.student.as_ref().and_then(|s| s.department);
    if !scope.admits(achievement.student_id, student_department) {
        return Err(AppError::forbidden("achievement is outside your field"));
    }

    let now = utc_now();
    let transition = workflow::review(
        achievement.status,
        payload.status,
        payload.remarks.as_deref(),
        actor.user_id,
        now,
    )?;

    if !achievements::apply_review(&state.pool, id, &transition, now).await? {
        return Err(AppError::conflict("achievement has already been reviewed"));
    }

    tracing::info!(
        achievement_id = %id,
        reviewer = %actor.user_id,
        status = %transition.status,
        "achievement reviewed"
    );

    let achievement = achievements::get(&state.pool, id).await?;
    Ok(Json(ApiResponse::with_message(
        format!("Achievement {} successfully", transition.status),
        achievement,
    )))
}

#[utoipa::path(
    get,
    path = "/achievements/stats",
    tag = "Achievements",
    security(("bearerAuth" = [])),
    responses((status = 200, description = "Status and category counts within the caller's scope", body = crate::models::AchievementStatsEnvelope))
)]
pub async fn achievement_stats(
    State(state): State<AppState>,
    actor: Actor,
) -> AppResult<Json<ApiResponse<AchievementStats>>> {
    authz::authorize(&actor, Action::ViewAchievementStats)?;
    let scope = authz::achievement_scope(&actor)?;

    let overview = achievements::status_overview(&state.pool, scope).await?;
    let by_category = achievements::per_category(&state.pool, scope).await?;

    Ok(Json(ApiResponse::ok(AchievementStats { overview, by_category })))
}
