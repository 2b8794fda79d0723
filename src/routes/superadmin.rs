use axum::extract::{Path, Query, State};
use axum::Json;
use uuid::Uuid;

use crate::app::AppState;
use crate::authz::{self, Action, Actor};
use crate::errors::{AppError, AppResult};
use crate::models::user::{User, UserListQuery};
use crate::models::{ApiResponse, Page, PageRequest, Pagination, SystemStats};
use crate::store::users;
use crate::utils::utc_now;
use crate::workflow::account::{self, AccountDecision, AccountTransition};

#[utoipa::path(
    get,
    path = "/superadmin/pending-admins",
    tag = "Superadmin",
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Admin accounts awaiting approval, oldest first", body = crate::models::UserListEnvelope),
        (status = 403, description = "Superadmin only")
    )
)]
pub async fn pending_admins(State(state): State<AppState>, actor: Actor) -> AppResult<Json<ApiResponse<Vec<User>>>> {
    authz::authorize(&actor, Action::ManageAccounts)?;
    let admins = users::pending_admins(&state.pool).await?;
    Ok(Json(ApiResponse::ok(admins)))
}

#[utoipa::path(
    put,
    path = "/superadmin/approve-admin/{id}",
    tag = "Superadmin",
    security(("bearerAuth" = [])),
    params(("id" = Uuid, Path, description = "Admin user id")),
    responses(
        (status = 200, description = "Admin approved", body = crate::models::UserEnvelope),
        (status = 400, description = "Target is not an admin"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Admin already approved")
    )
)]
pub async fn approve_admin(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<User>>> {
    authz::authorize(&actor, Action::ManageAccounts)?;

    let approved = decide(&state, &actor, id, AccountDecision::Approve)
        .await?
        .ok_or_else(|| AppError::internal("approval removed the account"))?;

    Ok(Json(ApiResponse::with_message("Admin approved successfully", approved)))
}

#[utoipa::path(
    delete,
    path = "/superadmin/reject-admin/{id}",
    tag = "Superadmin",
    security(("bearerAuth" = [])),
    params(("id" = Uuid, Path, description = "Admin user id")),
    responses(
        (status = 200, description = "Admin rejected and removed"),
        (status = 400, description = "Target is not an admin"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Admin already approved")
    )
)]
pub async fn reject_admin(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<()>>> {
    authz::authorize(&actor, Action::ManageAccounts)?;

    decide(&state, &actor, id, AccountDecision::Reject).await?;

    Ok(Json(ApiResponse::with_message("Admin rejected and removed", ())))
}

/// Returns the approved account, or `None` when the decision removed it.
async fn decide(state: &AppState, actor: &Actor, id: Uuid, decision: AccountDecision) -> AppResult<Option<User>> {
    let target = users::get(&state.pool, id).await?;

    match account::decide(&target, decision)? {
        AccountTransition::MarkApproved => {
            if !users::mark_approved(&state.pool, id, utc_now()).await? {
                return Err(AppError::conflict("admin account is already approved"));
            }
            tracing::info!(admin_id = %id, approved_by = %actor.user_id, "admin approved");
            users::get(&state.pool, id).await.map(Some)
        }
        AccountTransition::Remove => {
            if !users::remove_unapproved_admin(&state.pool, id).await? {
                return Err(AppError::conflict("admin account is already approved"));
            }
            tracing::info!(admin_id = %id, rejected_by = %actor.user_id, "admin rejected and removed");
            Ok(None)
        }
    }
}

#[utoipa::path(
    put,
    path = "/superadmin/toggle-user/{id}",
    tag = "Superadmin",
    security(("bearerAuth" = [])),
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "Activation flipped", body = crate::models::UserEnvelope),
        (status = 400, description = "Superadmins cannot be deactivated"),
        (status = 404, description = "User not found")
    )
)]
pub async fn toggle_user(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<User>>> {
    authz::authorize(&actor, Action::ManageAccounts)?;

    let target = users::get(&state.pool, id).await?;
    let is_active = account::toggle_active(&target)?;
    let user = users::set_active(&state.pool, id, is_active, utc_now()).await?;

    tracing::info!(user_id = %id, is_active, by = %actor.user_id, "user activation toggled");

    let message = if user.is_active {
        "User activated successfully"
    } else {
        "User deactivated successfully"
    };
    Ok(Json(ApiResponse::with_message(message, user)))
}

#[utoipa::path(
    get,
    path = "/superadmin/all-users",
    tag = "Superadmin",
    security(("bearerAuth" = [])),
    params(UserListQuery),
    responses(
        (status = 200, description = "Every account, newest first", body = crate::models::UserPageEnvelope),
        (status = 403, description = "Superadmin only")
    )
)]
pub async fn all_users(
    State(state): State<AppState>,
    actor: Actor,
    Query(query): Query<UserListQuery>,
) -> AppResult<Json<ApiResponse<Page<User>>>> {
    authz::authorize(&actor, Action::ManageAccounts)?;
    let page = PageRequest::new(query.page, query.limit);

    let (items, total) = users::list_all(&state.pool, page).await?;

    Ok(Json(ApiResponse::ok(Page {
        items,
        pagination: Pagination::new(page, total),
    })))
}

#[utoipa::path(
    get,
    path = "/superadmin/stats",
    tag = "Superadmin",
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Account counts", body = crate::models::SystemStatsEnvelope),
        (status = 403, description = "Superadmin only")
    )
)]
pub async fn system_stats(State(state): State<AppState>, actor: Actor) -> AppResult<Json<ApiResponse<SystemStats>>> {
    authz::authorize(&actor, Action::ManageAccounts)?;
    let stats = users::system_stats(&state.pool).await?;
    Ok(Json(ApiResponse::ok(stats)))
}
