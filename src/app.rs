use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use axum::routing::{delete, get, post, put};
use axum::Router;
use sqlx::SqlitePool;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::docs;
use crate::errors::AppError;
use crate::jwt::JwtConfig;
use crate::routes::{achievements, activities, auth, health, reports, superadmin, teachers, users};

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub jwt: Arc<JwtConfig>,
}

impl AppState {
    pub fn new(pool: SqlitePool, jwt: JwtConfig) -> Self {
        Self {
            pool,
            jwt: Arc::new(jwt),
        }
    }
}

pub async fn create_app(pool: SqlitePool) -> Result<Router, AppError> {
    let jwt_config = JwtConfig::from_env()?;
    let state = AppState::new(pool, jwt_config);

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/me", get(auth::me))
        .route("/profile", put(auth::update_profile))
        .route("/logout", post(auth::logout));

    let achievement_routes = Router::new()
        .route("/", get(achievements::list_achievements).post(achievements::create_achievement))
        .route("/stats", get(achievements::achievement_stats))
        .route("/:id/status", put(achievements::update_status));

    let activity_routes = Router::new()
        .route("/", get(activities::list_activities).post(activities::create_activity))
        .route("/teachers/:field", get(activities::teachers_by_field))
        .route(
            "/:id",
            get(activities::get_activity)
                .put(activities::update_activity)
                .delete(activities::delete_activity),
        );

    let teacher_routes = Router::new()
        .route("/", get(teachers::list_teachers).post(teachers::create_teacher))
        .route("/:id", put(teachers::update_teacher));

    let superadmin_routes = Router::new()
        .route("/pending-admins", get(superadmin::pending_admins))
        .route("/approve-admin/:id", put(superadmin::approve_admin))
        .route("/reject-admin/:id", delete(superadmin::reject_admin))
        .route("/toggle-user/:id", put(superadmin::toggle_user))
        .route("/all-users", get(superadmin::all_users))
        .route("/stats", get(superadmin::system_stats));

    let router = Router::new()
        .nest("/auth", auth_routes)
        .nest("/achievements", achievement_routes)
        .nest("/activities", activity_routes)
        .nest("/teachers", teacher_routes)
        .route("/users", get(users::list_students))
        .route("/reports/dashboard", get(reports::dashboard))
        .nest("/superadmin", superadmin_routes)
        .route("/api/health", get(health::health))
        .with_state(state)
        .merge(docs::swagger_routes(docs::build_openapi(app_port())))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http());

    Ok(router)
}

pub fn app_port() -> u16 {
    std::env::var("APP_PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8000)
}

/// `FRONTEND_URL` pins the allowed origin; without it any origin is accepted.
fn cors_layer() -> CorsLayer {
    let origin = std::env::var("FRONTEND_URL")
        .ok()
        .and_then(|url| HeaderValue::from_str(url.trim_end_matches('/')).ok())
        .map(AllowOrigin::exact)
        .unwrap_or_else(|| AllowOrigin::from(Any));

    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_origin(origin)
        .allow_headers(Any)
}
