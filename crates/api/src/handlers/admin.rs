//! Handlers for staff account management (`/admin/users`).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use validator::Validate;
use lodge_core::error::CoreError;
use lodge_core::roles::Role;
use lodge_db::models::user::{CreateUser, UserResponse};
use lodge_db::repositories::UserRepo;

use crate::auth::password::{hash_password, validate_password_strength};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{Authorized, UserManagementArea};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /admin/users`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(email)]
    pub email: String,
    pub password: String,
    #[validate(length(min = 1, max = 255))]
    pub full_name: String,
    #[serde(default = "default_role")]
    pub role: Role,
}

fn default_role() -> Role {
    Role::User
}

/// GET /api/v1/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    _auth: Authorized<UserManagementArea>,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let users = UserRepo::list_with_profiles(&state.pool).await?;
    Ok(Json(DataResponse { data: users }))
}

/// POST /api/v1/admin/users
///
/// Create a staff account and its profile. A duplicate email is a 409.
pub async fn create_user(
    State(state): State<AppState>,
    auth: Authorized<UserManagementArea>,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let input = CreateUserRequest {
        email: input.email.trim().to_string(),
        full_name: input.full_name.trim().to_string(),
        ..input
    };
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;
    validate_password_strength(&input.password)?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create_with_profile(
        &state.pool,
        &CreateUser {
            email: input.email,
            password_hash,
            role: input.role,
            full_name: input.full_name.clone(),
        },
    )
    .await?;

    tracing::info!(
        admin_id = auth.session.user_id,
        user_id = user.id,
        role = %user.role,
        "User created",
    );

    Ok((
        StatusCode::CREATED,
        Json(UserResponse {
            id: user.id,
            email: user.email,
            full_name: input.full_name,
            role: user.role,
            is_active: user.is_active,
            last_login_at: user.last_login_at,
            created_at: user.created_at,
        }),
    ))
}
