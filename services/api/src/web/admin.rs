//! services/api/src/web/admin.rs
//!
//! Account management endpoints. These sit behind the `require_admin`
//! middleware, so every handler here can assume an admin caller.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use scholarmind_core::domain::{UserRecord, UserRole};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::web::state::AppState;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    /// Either "user" or "admin".
    pub role: String,
}

#[derive(Serialize, ToSchema)]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
    pub role: String,
}

impl UserSummary {
    fn of(user: UserRecord) -> Self {
        Self {
            id: user.id,
            username: user.username,
            role: user.role.as_str().to_string(),
        }
    }
}

//=========================================================================================
// Handlers
//=========================================================================================

/// List every registered account.
#[utoipa::path(
    get,
    path = "/admin/users",
    responses(
        (status = 200, description = "All registered accounts", body = [UserSummary]),
        (status = 401, description = "Not logged in"),
        (status = 403, description = "Caller is not an admin"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_users_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let users = app_state.credentials.list_users().await.map_err(|e| {
        error!("Failed to list users: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to list users".to_string(),
        )
    })?;

    let summaries: Vec<UserSummary> = users.into_iter().map(UserSummary::of).collect();
    Ok(Json(summaries))
}

/// Create an account with an explicit role.
#[utoipa::path(
    post,
    path = "/admin/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Account created", body = UserSummary),
        (status = 400, description = "Invalid request"),
        (status = 401, description = "Not logged in"),
        (status = 403, description = "Caller is not an admin"),
        (status = 409, description = "Username already exists"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_user_handler(
    State(app_state): State<Arc<AppState>>,
    Json(req): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let username = req.username.trim();
    if username.is_empty() || req.password.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "Please fill all fields".to_string(),
        ));
    }
    let role = UserRole::from_str(&req.role).ok_or((
        StatusCode::BAD_REQUEST,
        "Role must be 'user' or 'admin'".to_string(),
    ))?;

    let created = app_state
        .credentials
        .create_user(username, &req.password, role)
        .await
        .map_err(|e| {
            error!("Failed to create user: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to create user".to_string(),
            )
        })?;
    if !created {
        return Err((
            StatusCode::CONFLICT,
            "Username already exists".to_string(),
        ));
    }

    info!("Admin created account '{}' with role {}", username, role.as_str());

    // Look the row back up so the response carries the generated id.
    let user = app_state
        .credentials
        .authenticate(username, &req.password)
        .await
        .map_err(|e| {
            error!("Failed to load new user: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to create user".to_string(),
            )
        })?
        .ok_or((
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to create user".to_string(),
        ))?;

    Ok((StatusCode::CREATED, Json(UserSummary::of(user))))
}
