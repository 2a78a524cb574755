//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use chrono::{DateTime, Utc};
use scholarmind_core::domain::HistoryEntry;
use scholarmind_core::ports::DEFAULT_HISTORY_LIMIT;
use serde::Serialize;
use std::sync::Arc;
use tracing::error;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

use crate::web::{admin, auth};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::signup_handler,
        auth::login_handler,
        auth::logout_handler,
        list_history_handler,
        get_history_content_handler,
        admin::list_users_handler,
        admin::create_user_handler,
    ),
    components(
        schemas(
            auth::SignupRequest,
            auth::LoginRequest,
            auth::AuthResponse,
            HistoryItem,
            HistoryContentResponse,
            admin::CreateUserRequest,
            admin::UserSummary,
        )
    ),
    tags(
        (name = "ScholarMind API", description = "API endpoints for the AI research assistant.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// One row of a user's research history. The generated text is fetched
/// separately by id.
#[derive(Serialize, ToSchema)]
pub struct HistoryItem {
    id: Uuid,
    topic: String,
    content_type: String,
    created_at: DateTime<Utc>,
}

impl HistoryItem {
    fn of(entry: HistoryEntry) -> Self {
        Self {
            id: entry.id,
            topic: entry.topic,
            content_type: entry.content_type.key().to_string(),
            created_at: entry.created_at,
        }
    }
}

/// The stored text of one archived artifact.
#[derive(Serialize, ToSchema)]
pub struct HistoryContentResponse {
    id: Uuid,
    content: String,
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// List the authenticated user's research history, newest first.
#[utoipa::path(
    get,
    path = "/history",
    responses(
        (status = 200, description = "The user's archived artifacts", body = [HistoryItem]),
        (status = 401, description = "Not logged in"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_history_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let entries = app_state
        .archive
        .list_history(user_id, DEFAULT_HISTORY_LIMIT)
        .await
        .map_err(|e| {
            error!("Failed to list history for user {}: {:?}", user_id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to load history".to_string(),
            )
        })?;

    let items: Vec<HistoryItem> = entries.into_iter().map(HistoryItem::of).collect();
    Ok(Json(items))
}

/// Fetch the stored text of one archived artifact.
///
/// Entries belonging to other users are indistinguishable from missing ones.
#[utoipa::path(
    get,
    path = "/history/{id}",
    params(
        ("id" = Uuid, Path, description = "The id of the archived artifact.")
    ),
    responses(
        (status = 200, description = "The stored content", body = HistoryContentResponse),
        (status = 401, description = "Not logged in"),
        (status = 404, description = "No such entry for this user"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_history_content_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let content = app_state
        .archive
        .get_content(user_id, id)
        .await
        .map_err(|e| {
            error!("Failed to load history entry {}: {:?}", id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to load content".to_string(),
            )
        })?;

    match content {
        Some(content) => Ok(Json(HistoryContentResponse { id, content })),
        None => Err((StatusCode::NOT_FOUND, "History entry not found".to_string())),
    }
}
