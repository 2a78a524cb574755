//! crates/scholarmind_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases or APIs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{ContentType, HistoryEntry, UserRecord, UserRole};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
    #[error("Unauthorized")]
    Unauthorized,
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

/// Failure of a single text generation call. Transport faults, quota errors,
/// and model-side refusals all collapse into this one kind; the orchestrator
/// treats every cause the same way and retries.
#[derive(Debug, Clone, thiserror::Error)]
#[error("text generation failed: {0}")]
pub struct GenerationError(pub String);

/// How many history entries a listing returns unless the caller narrows it.
pub const DEFAULT_HISTORY_LIMIT: u32 = 50;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Produces model text for a fully rendered prompt.
    async fn generate_text(&self, prompt: &str) -> Result<String, GenerationError>;
}

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Checks a username/password pair. `None` means the pair does not match
    /// any account; the caller cannot tell a missing user from a bad password.
    async fn authenticate(&self, username: &str, password: &str)
        -> PortResult<Option<UserRecord>>;

    /// Registers an account. Returns `false` when the username is already
    /// taken, in which case the existing account is left untouched.
    async fn create_user(&self, username: &str, password: &str, role: UserRole)
        -> PortResult<bool>;

    async fn list_users(&self) -> PortResult<Vec<UserRecord>>;

    async fn get_user(&self, user_id: Uuid) -> PortResult<Option<UserRecord>>;

    // --- Browser auth sessions (cookies) ---
    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()>;

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid>;

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()>;
}

#[async_trait]
pub trait ResearchArchive: Send + Sync {
    /// Stores one generated artifact for a user.
    async fn save(
        &self,
        user_id: Uuid,
        topic: &str,
        content_type: ContentType,
        text: &str,
    ) -> PortResult<()>;

    /// Lists a user's archived artifacts, newest first.
    async fn list_history(&self, user_id: Uuid, limit: u32) -> PortResult<Vec<HistoryEntry>>;

    /// Fetches the stored text of one artifact owned by `user_id`, or `None`
    /// when no such entry exists for that user.
    async fn get_content(&self, user_id: Uuid, id: Uuid) -> PortResult<Option<String>>;
}
