use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::app::AppState;
use crate::errors::AppError;
use crate::jwt::AuthUser;
use crate::models::field::Field;
use crate::models::user::{Role, User};
use crate::store;

/// The authenticated identity performing a request.
///
/// Built from the user record re-loaded on every request, so approval and
/// activation changes apply to tokens that were issued earlier.
#[derive(Debug, Clone)]
pub struct Actor {
    pub user_id: Uuid,
    pub role: Role,
    /// Admin scope.
    pub field: Option<Field>,
    /// Student scope.
    pub department: Option<Field>,
}

impl Actor {
    pub fn from_user(user: &User) -> Self {
        Self {
            user_id: user.id,
            role: user.role,
            field: user.field,
            department: user.department,
        }
    }

    pub fn student(user_id: Uuid, department: Field) -> Self {
        Self {
            user_id,
            role: Role::Student,
            field: None,
            department: Some(department),
        }
    }

    pub fn admin(user_id: Uuid, field: Field) -> Self {
        Self {
            user_id,
            role: Role::Admin,
            field: Some(field),
            department: None,
        }
    }

    pub fn superadmin(user_id: Uuid) -> Self {
        Self {
            user_id,
            role: Role::SuperAdmin,
            field: None,
            department: None,
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Actor {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth = AuthUser::from_request_parts(parts, state).await?;

        let user = store::users::find_by_id(&state.pool, auth.user_id)
            .await?
            .ok_or_else(|| AppError::unauthorized("account no longer exists"))?;

        super::admit(&user)?;

        Ok(Actor::from_user(&user))
    }
}
