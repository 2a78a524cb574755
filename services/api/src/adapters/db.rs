//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `CredentialStore` and `ResearchArchive` ports from the `core` crate.
//! It handles all interactions with the PostgreSQL database using `sqlx`, and it
//! is the only place that ever sees a password hash.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use scholarmind_core::domain::{ContentType, HistoryEntry, UserRecord, UserRole};
use scholarmind_core::ports::{CredentialStore, PortError, PortResult, ResearchArchive};
use sqlx::{FromRow, PgPool};
use tracing::info;
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `CredentialStore` and
/// `ResearchArchive` ports.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Creates the bootstrap admin account unless some admin already exists.
    /// Called once at startup so a fresh database is usable immediately.
    pub async fn ensure_admin_user(&self, username: &str, password: &str) -> PortResult<()> {
        let have_admin: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE role = 'admin')")
                .fetch_one(&self.pool)
                .await
                .map_err(|e| PortError::Unexpected(e.to_string()))?;
        if have_admin {
            return Ok(());
        }
        if self.create_user(username, password, UserRole::Admin).await? {
            info!("Created bootstrap admin account '{}'", username);
        }
        Ok(())
    }

    fn hash_password(password: &str) -> PortResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PortError::Unexpected(format!("Failed to hash password: {}", e)))
    }

    // A hash that does not parse counts as a failed login, not an error.
    fn verify_password(password: &str, stored_hash: &str) -> bool {
        PasswordHash::new(stored_hash)
            .map(|parsed| {
                Argon2::default()
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct UserAuthRecord {
    id: Uuid,
    username: String,
    password_hash: String,
    role: String,
}
impl UserAuthRecord {
    fn to_domain(self) -> PortResult<UserRecord> {
        let role = UserRole::from_str(&self.role).ok_or_else(|| {
            PortError::Unexpected(format!("Unknown role '{}' for user {}", self.role, self.id))
        })?;
        Ok(UserRecord {
            id: self.id,
            username: self.username,
            role,
        })
    }
}

#[derive(FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    role: String,
}
impl UserRow {
    fn to_domain(self) -> PortResult<UserRecord> {
        let role = UserRole::from_str(&self.role).ok_or_else(|| {
            PortError::Unexpected(format!("Unknown role '{}' for user {}", self.role, self.id))
        })?;
        Ok(UserRecord {
            id: self.id,
            username: self.username,
            role,
        })
    }
}

#[derive(FromRow)]
struct HistoryRow {
    id: Uuid,
    topic: String,
    content_type: String,
    created_at: DateTime<Utc>,
}
impl HistoryRow {
    fn to_domain(self) -> PortResult<HistoryEntry> {
        let content_type = ContentType::from_key(&self.content_type).ok_or_else(|| {
            PortError::Unexpected(format!(
                "Unknown content type '{}' in history entry {}",
                self.content_type, self.id
            ))
        })?;
        Ok(HistoryEntry {
            id: self.id,
            topic: self.topic,
            content_type,
            created_at: self.created_at,
        })
    }
}

#[derive(FromRow)]
struct AuthSessionRow {
    user_id: Uuid,
    expires_at: DateTime<Utc>,
}

//=========================================================================================
// `CredentialStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl CredentialStore for DbAdapter {
    async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> PortResult<Option<UserRecord>> {
        let record = sqlx::query_as::<_, UserAuthRecord>(
            "SELECT id, username, password_hash, role FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        match record {
            Some(record) if Self::verify_password(password, &record.password_hash) => {
                Ok(Some(record.to_domain()?))
            }
            _ => Ok(None),
        }
    }

    async fn create_user(
        &self,
        username: &str,
        password: &str,
        role: UserRole,
    ) -> PortResult<bool> {
        let password_hash = Self::hash_password(password)?;
        // ON CONFLICT DO NOTHING keeps an existing account untouched; zero
        // rows affected is how a duplicate username reports itself.
        let result = sqlx::query(
            "INSERT INTO users (id, username, password_hash, role) VALUES ($1, $2, $3, $4)
             ON CONFLICT (username) DO NOTHING",
        )
        .bind(Uuid::new_v4())
        .bind(username)
        .bind(&password_hash)
        .bind(role.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        Ok(result.rows_affected() == 1)
    }

    async fn list_users(&self) -> PortResult<Vec<UserRecord>> {
        let rows = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, role FROM users ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        rows.into_iter().map(|row| row.to_domain()).collect()
    }

    async fn get_user(&self, user_id: Uuid) -> PortResult<Option<UserRecord>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, role FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        row.map(|row| row.to_domain()).transpose()
    }

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()> {
        sqlx::query("INSERT INTO auth_sessions (id, user_id, expires_at) VALUES ($1, $2, $3)")
            .bind(session_id)
            .bind(user_id)
            .bind(expires_at)
            .execute(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(())
    }

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid> {
        let row = sqlx::query_as::<_, AuthSessionRow>(
            "SELECT user_id, expires_at FROM auth_sessions WHERE id = $1",
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        match row {
            Some(row) if row.expires_at > Utc::now() => Ok(row.user_id),
            Some(_) => {
                // Expired; remove the row before rejecting.
                self.delete_auth_session(session_id).await?;
                Err(PortError::Unauthorized)
            }
            None => Err(PortError::Unauthorized),
        }
    }

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()> {
        sqlx::query("DELETE FROM auth_sessions WHERE id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(())
    }
}

//=========================================================================================
// `ResearchArchive` Trait Implementation
//=========================================================================================

#[async_trait]
impl ResearchArchive for DbAdapter {
    async fn save(
        &self,
        user_id: Uuid,
        topic: &str,
        content_type: ContentType,
        text: &str,
    ) -> PortResult<()> {
        sqlx::query(
            "INSERT INTO research_history (id, user_id, topic, content_type, content)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(topic)
        .bind(content_type.key())
        .bind(text)
        .execute(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(())
    }

    async fn list_history(&self, user_id: Uuid, limit: u32) -> PortResult<Vec<HistoryEntry>> {
        let rows = sqlx::query_as::<_, HistoryRow>(
            "SELECT id, topic, content_type, created_at FROM research_history
             WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2",
        )
        .bind(user_id)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        rows.into_iter().map(|row| row.to_domain()).collect()
    }

    async fn get_content(&self, user_id: Uuid, id: Uuid) -> PortResult<Option<String>> {
        sqlx::query_scalar::<_, String>(
            "SELECT content FROM research_history WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))
    }
}
