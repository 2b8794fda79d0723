use axum::extract::{Query, State};
use axum::Json;

use crate::app::AppState;
use crate::authz::{self, Action, Actor};
use crate::errors::AppResult;
use crate::models::user::{User, UserListQuery};
use crate::models::{ApiResponse, Page, PageRequest, Pagination};
use crate::store::users;

#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    security(("bearerAuth" = [])),
    params(UserListQuery),
    responses(
        (status = 200, description = "Students visible to the caller, sorted by name", body = crate::models::UserPageEnvelope),
        (status = 403, description = "Admins only")
    )
)]
pub async fn list_students(
    State(state): State<AppState>,
    actor: Actor,
    Query(query): Query<UserListQuery>,
) -> AppResult<Json<ApiResponse<Page<User>>>> {
    authz::authorize(&actor, Action::ListStudents)?;
    let scope = authz::student_scope(&actor)?;
    let page = PageRequest::new(query.page, query.limit);

    let (items, total) = users::list_students(&state.pool, scope, page).await?;

    Ok(Json(ApiResponse::ok(Page {
        items,
        pagination: Pagination::new(page, total),
    })))
}
