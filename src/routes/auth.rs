use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::app::AppState;
use crate::authz::{self, Actor};
use crate::errors::{AppError, AppResult};
use crate::models::user::{
    AuthResponse, LoginRequest, ProfileUpdateRequest, RegisterRequest, RegisterResponse, Role, User,
};
use crate::models::ApiResponse;
use crate::store::users::{self, NewUser};
use crate::utils::{hash_password, verify_password};
use crate::validation;

#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered, log in to obtain a token", body = crate::models::RegisterEnvelope),
        (status = 400, description = "Invalid input or role"),
        (status = 409, description = "Email already in use")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<RegisterResponse>>)> {
    let name = validation::person_name(&payload.name)?;
    let email = validation::email(&payload.email)?;

    let new_user = match payload.role {
        Role::Student => {
            let department = payload
                .department
                .ok_or_else(|| AppError::bad_request("department is required for students"))?
                .require_department()?;
            let year = payload
                .year
                .ok_or_else(|| AppError::bad_request("year is required for students"))
                .and_then(validation::year)?;

            NewUser {
                name,
                email,
                password_hash: hash_password(&payload.password)?,
                role: Role::Student,
                is_approved: true,
                department: Some(department),
                year: Some(year),
                field: None,
            }
        }
        Role::Admin => {
            let field = payload
                .field
                .ok_or_else(|| AppError::bad_request("field is required for admins"))?;

            NewUser {
                name,
                email,
                password_hash: hash_password(&payload.password)?,
                role: Role::Admin,
                is_approved: false,
                department: None,
                year: None,
                field: Some(field),
            }
        }
        Role::SuperAdmin => {
            return Err(AppError::bad_request("superadmin accounts cannot be self-registered"));
        }
    };

    if users::email_taken(&state.pool, &new_user.email).await? {
        return Err(AppError::conflict("email already in use"));
    }

    let user = users::insert(&state.pool, new_user).await?;

    let message = match user.role {
        Role::Admin => "Registration successful. Your account is pending approval by System Administrator.",
        _ => "Registration successful. Please log in.",
    };

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            message,
            RegisterResponse {
                requires_login: true,
                user,
            },
        )),
    ))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = crate::models::AuthEnvelope),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "Account pending approval or deactivated")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<AuthResponse>>> {
    let email = payload.email.trim().to_lowercase();

    let db_user = users::find_credentials(&state.pool, &email)
        .await?
        .ok_or_else(|| AppError::unauthorized("invalid credentials"))?;
    let password_hash = db_user.password_hash.clone();
    let user = User::try_from(db_user)?;

    // Pending admins are told so whatever password they sent.
    if let Err(err) = authz::ensure_approved(&user) {
        tracing::warn!(user_id = %user.id, "login refused: admin pending approval");
        return Err(err);
    }

    if !verify_password(&payload.password, &password_hash)? {
        tracing::warn!(user_id = %user.id, "login refused: wrong password");
        return Err(AppError::unauthorized("invalid credentials"));
    }

    if let Err(err) = authz::ensure_active(&user) {
        tracing::warn!(user_id = %user.id, "login refused: account deactivated");
        return Err(err);
    }

    let token = state.jwt.encode(user.id)?;
    tracing::info!(user_id = %user.id, role = %user.role, "login");

    Ok(Json(ApiResponse::with_message("Login successful", AuthResponse { token, user })))
}

#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "Auth",
    security(("bearerAuth" = [])),
    responses((status = 200, description = "Current user", body = crate::models::UserEnvelope))
)]
pub async fn me(State(state): State<AppState>, actor: Actor) -> AppResult<Json<ApiResponse<User>>> {
    let user = users::get(&state.pool, actor.user_id).await?;
    Ok(Json(ApiResponse::ok(user)))
}

#[utoipa::path(
    put,
    path = "/auth/profile",
    tag = "Auth",
    security(("bearerAuth" = [])),
    request_body = ProfileUpdateRequest,
    responses(
        (status = 200, description = "Profile updated", body = crate::models::UserEnvelope),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn update_profile(
    State(state): State<AppState>,
    actor: Actor,
    Json(payload): Json<ProfileUpdateRequest>,
) -> AppResult<Json<ApiResponse<User>>> {
    let mut user = users::get(&state.pool, actor.user_id).await?;

    if let Some(name) = payload.name.as_deref() {
        user.name = validation::person_name(name)?;
    }

    // Student-only attributes are ignored for other roles.
    if user.role == Role::Student {
        if let Some(department) = payload.department {
            user.department = Some(department.require_department()?);
        }
        if let Some(year) = payload.year {
            user.year = Some(validation::year(year)?);
        }
        if let Some(skills) = payload.skills {
            user.skills = validation::tags(skills);
        }
        if let Some(interests) = payload.interests {
            user.interests = validation::tags(interests);
        }
    }

    let user = users::save_profile(&state.pool, &user).await?;
    Ok(Json(ApiResponse::with_message("Profile updated successfully", user)))
}

#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "Auth",
    security(("bearerAuth" = [])),
    responses((status = 200, description = "Logout acknowledged"))
)]
pub async fn logout(actor: Actor) -> AppResult<Json<ApiResponse<()>>> {
    tracing::info!(user_id = %actor.user_id, "logout");
    Ok(Json(ApiResponse::with_message("Logged out", ())))
}
