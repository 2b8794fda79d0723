use std::sync::Arc;

use axum::{routing::get, Json, Router};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::openapi::server::Server;
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::models;
use crate::routes;

pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

#[derive(OpenApi)]
#[openapi(
	paths(
		routes::auth::register,
		routes::auth::login,
		routes::auth::me,
		routes::auth::update_profile,
		routes::auth::logout,
		routes::achievements::list_achievements,
		routes::achievements::create_achievement,
		routes::achievements::update_status,
		routes::achievements::achievement_stats,
		routes::activities::list_activities,
		routes::activities::get_activity,
		routes::activities::create_activity,
		routes::activities::update_activity,
		routes::activities::delete_activity,
		routes::activities::teachers_by_field,
		routes::teachers::list_teachers,
		routes::teachers::create_teacher,
		routes::teachers::update_teacher,
		routes::users::list_students,
		routes::reports::dashboard,
		routes::superadmin::pending_admins,
		routes::superadmin::approve_admin,
		routes::superadmin::reject_admin,
		routes::superadmin::toggle_user,
		routes::superadmin::all_users,
		routes::superadmin::system_stats,
		routes::health::health
	),
	components(
		schemas(
			models::field::Field,
			models::user::Role,
			models::user::User,
			models::user::StudentSummary,
			models::user::UserSummary,
			models::user::RegisterRequest,
			models::user::RegisterResponse,
			models::user::LoginRequest,
			models::user::AuthResponse,
			models::user::ProfileUpdateRequest,
			models::teacher::Teacher,
			models::teacher::TeacherSummary,
			models::teacher::TeacherCreateRequest,
			models::teacher::TeacherUpdateRequest,
			models::activity::Category,
			models::activity::Activity,
			models::activity::ActivitySummary,
			models::activity::ActivityCreateRequest,
			models::activity::ActivityUpdateRequest,
			models::achievement::AchievementStatus,
			models::achievement::Position,
			models::achievement::Achievement,
			models::achievement::AchievementCreateRequest,
			models::achievement::StatusUpdateRequest,
			models::achievement::StatusOverview,
			models::achievement::CategoryCount,
			models::achievement::AchievementStats,
			models::Pagination,
			models::FieldCount,
			models::DashboardOverview,
			models::DashboardReport,
			models::SystemStats,
			models::AchievementPage,
			models::ActivityPage,
			models::UserPage,
			models::AchievementEnvelope,
			models::AchievementPageEnvelope,
			models::AchievementStatsEnvelope,
			models::ActivityEnvelope,
			models::ActivityPageEnvelope,
			models::TeacherEnvelope,
			models::TeacherListEnvelope,
			models::UserEnvelope,
			models::UserListEnvelope,
			models::UserPageEnvelope,
			models::RegisterEnvelope,
			models::AuthEnvelope,
			models::DashboardEnvelope,
			models::SystemStatsEnvelope,
			routes::health::HealthResponse
		)
	),
	modifiers(&SecurityAddon),
	tags(
		(name = "Auth", description = "Registration, login and profile"),
		(name = "Achievements", description = "Achievement submission and review"),
		(name = "Activities", description = "Activity catalog"),
		(name = "Teachers", description = "Teacher records"),
		(name = "Users", description = "Student listing"),
		(name = "Reports", description = "Dashboard statistics"),
		(name = "Superadmin", description = "Admin approval and account management"),
		(name = "Health", description = "Liveness")
	)
)]
pub struct ApiDoc;

/// Registers the `bearerAuth` scheme referenced by the protected paths.
struct SecurityAddon;

impl Modify for SecurityAddon {
	fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
		let components = openapi.components.get_or_insert_with(Default::default);
		components.add_security_scheme(
			"bearerAuth",
			SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).bearer_format("JWT").build()),
		);
	}
}

pub fn build_openapi(port: u16) -> utoipa::openapi::OpenApi {
	let mut doc = ApiDoc::openapi();
	doc.servers = Some(vec![Server::new(format!("http://localhost:{port}"))]);
	doc
}

/// JSON document plus Swagger UI at `/docs`.
pub fn swagger_routes(doc: utoipa::openapi::OpenApi) -> Router {
	let swagger_config = utoipa_swagger_ui::Config::new([OPENAPI_JSON_PATH])
		.try_it_out_enabled(true)
		.persist_authorization(true);

	let doc = Arc::new(doc);
	let json_route = get(move || {
		let doc = Arc::clone(&doc);
		async move { Json((*doc).clone()) }
	});

	Router::new()
		.route(OPENAPI_JSON_PATH, json_route)
		.merge(SwaggerUi::new("/docs").config(swagger_config))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn document_lists_review_path_and_bearer_scheme() {
		let doc = build_openapi(8000);
		assert!(doc.paths.paths.contains_key("/achievements/{id}/status"));
		assert!(doc.paths.paths.contains_key("/superadmin/reject-admin/{id}"));

		let components = doc.components.expect("components present");
		assert!(components.security_schemes.contains_key("bearerAuth"));
	}

	#[test]
	fn responses_describe_the_success_envelope() {
		let doc = serde_json::to_value(build_openapi(8000)).expect("serializable document");

		let list = &doc["paths"]["/achievements"]["get"]["responses"]["200"]["content"]["application/json"]["schema"];
		assert_eq!(list["$ref"], "#/components/schemas/AchievementPageEnvelope");

		let schemas = &doc["components"]["schemas"];
		let envelope = &schemas["AchievementPageEnvelope"]["properties"];
		assert!(envelope["success"].is_object());
		assert!(envelope["message"].is_object());
		assert_eq!(envelope["data"]["$ref"], "#/components/schemas/AchievementPage");

		let page = &schemas["AchievementPage"]["properties"];
		assert_eq!(page["items"]["items"]["$ref"], "#/components/schemas/Achievement");
		assert_eq!(page["pagination"]["$ref"], "#/components/schemas/Pagination");

		let teachers = &schemas["TeacherListEnvelope"]["properties"]["data"];
		assert_eq!(teachers["type"], "array");

		let me = &doc["paths"]["/auth/me"]["get"]["responses"]["200"]["content"]["application/json"]["schema"];
		assert_eq!(me["$ref"], "#/components/schemas/UserEnvelope");
	}
}
