//! crates/scholarmind_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The six kinds of research content the assistant can produce for a topic.
///
/// The lower-case key of each variant is a stable identifier: it selects the
/// prompt template, names the artifact in fallback messages, and is what gets
/// persisted in the archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Questions,
    Literature,
    Future,
    References,
    Abstract,
    Analysis,
}

impl ContentType {
    pub const ALL: [ContentType; 6] = [
        ContentType::Questions,
        ContentType::Literature,
        ContentType::Future,
        ContentType::References,
        ContentType::Abstract,
        ContentType::Analysis,
    ];

    /// The stable lower-case key for prompts, persistence, and messages.
    pub fn key(&self) -> &'static str {
        match self {
            ContentType::Questions => "questions",
            ContentType::Literature => "literature",
            ContentType::Future => "future",
            ContentType::References => "references",
            ContentType::Abstract => "abstract",
            ContentType::Analysis => "analysis",
        }
    }

    /// Looks a content type up by its stable key, e.g. when reading archived
    /// rows back from storage.
    pub fn from_key(key: &str) -> Option<ContentType> {
        ContentType::ALL.into_iter().find(|ct| ct.key() == key)
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

// Access level of an account. Admins can manage other accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Admin => "admin",
        }
    }

    pub fn from_str(value: &str) -> Option<UserRole> {
        match value {
            "user" => Some(UserRole::User),
            "admin" => Some(UserRole::Admin),
            _ => None,
        }
    }
}

// Represents an account - used throughout the app. Never carries the
// password hash; that stays inside the credential store.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: Uuid,
    pub username: String,
    pub role: UserRole,
}

impl UserRecord {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// One archived research artifact, as listed in a user's history. The
/// generated text itself is fetched separately by id.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub topic: String,
    pub content_type: ContentType,
    pub created_at: DateTime<Utc>,
}

/// The result of one content generation call. `succeeded` is false when the
/// text is a static fallback rather than model output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOutcome {
    pub text: String,
    pub succeeded: bool,
    pub attempts_used: u32,
}
