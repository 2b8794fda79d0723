use axum::extract::State;
use axum::Json;

use crate::app::AppState;
use crate::authz::{self, Action, Actor};
use crate::errors::AppResult;
use crate::models::{ApiResponse, DashboardOverview, DashboardReport};
use crate::store::{achievements, catalog, users};

#[utoipa::path(
    get,
    path = "/reports/dashboard",
    tag = "Reports",
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Dashboard counts, restricted to the admin's field", body = crate::models::DashboardEnvelope),
        (status = 403, description = "Admins only")
    )
)]
pub async fn dashboard(State(state): State<AppState>, actor: Actor) -> AppResult<Json<ApiResponse<DashboardReport>>> {
    authz::authorize(&actor, Action::ViewDashboard)?;
    let student_scope = authz::student_scope(&actor)?;
    let achievement_scope = authz::achievement_scope(&actor)?;
    let field = student_scope.field();

    let total_students = users::count_students(&state.pool, student_scope).await?;
    let total_activities = catalog::count_activities(&state.pool, field).await?;
    let status = achievements::status_overview(&state.pool, achievement_scope).await?;
    let field_stats = catalog::activities_per_field(&state.pool, field).await?;
    let category_stats = achievements::per_category(&state.pool, achievement_scope).await?;

    Ok(Json(ApiResponse::ok(DashboardReport {
        overview: DashboardOverview {
            total_students,
            total_activities,
            total_achievements: status.total,
            pending_approvals: status.pending,
        },
        field_stats,
        category_stats,
    })))
}
