//! Contract tests for `CredentialStore`, run against an in-memory
//! implementation. Any real store has to show these same behaviors,
//! most importantly that a duplicate registration reports `false` and
//! leaves the original account untouched.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use scholarmind_core::domain::{UserRecord, UserRole};
use scholarmind_core::ports::{CredentialStore, PortError, PortResult};

#[derive(Clone)]
struct Account {
    id: Uuid,
    password: String,
    role: UserRole,
}

#[derive(Default)]
struct MemoryCredentialStore {
    accounts: Mutex<HashMap<String, Account>>,
    sessions: Mutex<HashMap<String, (Uuid, DateTime<Utc>)>>,
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> PortResult<Option<UserRecord>> {
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts.get(username).and_then(|account| {
            (account.password == password).then(|| UserRecord {
                id: account.id,
                username: username.to_string(),
                role: account.role,
            })
        }))
    }

    async fn create_user(
        &self,
        username: &str,
        password: &str,
        role: UserRole,
    ) -> PortResult<bool> {
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.contains_key(username) {
            return Ok(false);
        }
        accounts.insert(
            username.to_string(),
            Account {
                id: Uuid::new_v4(),
                password: password.to_string(),
                role,
            },
        );
        Ok(true)
    }

    async fn list_users(&self) -> PortResult<Vec<UserRecord>> {
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts
            .iter()
            .map(|(username, account)| UserRecord {
                id: account.id,
                username: username.clone(),
                role: account.role,
            })
            .collect())
    }

    async fn get_user(&self, user_id: Uuid) -> PortResult<Option<UserRecord>> {
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts
            .iter()
            .find(|(_, account)| account.id == user_id)
            .map(|(username, account)| UserRecord {
                id: account.id,
                username: username.clone(),
                role: account.role,
            }))
    }

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()> {
        self.sessions
            .lock()
            .unwrap()
            .insert(session_id.to_string(), (user_id, expires_at));
        Ok(())
    }

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid> {
        let sessions = self.sessions.lock().unwrap();
        match sessions.get(session_id) {
            Some((user_id, expires_at)) if *expires_at > Utc::now() => Ok(*user_id),
            _ => Err(PortError::Unauthorized),
        }
    }

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()> {
        self.sessions.lock().unwrap().remove(session_id);
        Ok(())
    }
}

#[tokio::test]
async fn created_account_authenticates_with_its_password() {
    let store = MemoryCredentialStore::default();
    assert!(store.create_user("ada", "s3cret", UserRole::User).await.unwrap());

    let record = store.authenticate("ada", "s3cret").await.unwrap();
    assert_eq!(record.as_ref().map(|r| r.username.as_str()), Some("ada"));
    assert_eq!(record.map(|r| r.role), Some(UserRole::User));
}

#[tokio::test]
async fn wrong_password_and_unknown_username_both_yield_none() {
    let store = MemoryCredentialStore::default();
    store.create_user("ada", "s3cret", UserRole::User).await.unwrap();

    assert!(store.authenticate("ada", "wrong").await.unwrap().is_none());
    assert!(store.authenticate("nobody", "s3cret").await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_username_reports_false_and_keeps_the_original() {
    let store = MemoryCredentialStore::default();
    assert!(store.create_user("ada", "original", UserRole::User).await.unwrap());

    // Second registration under the same name must not take.
    assert!(!store.create_user("ada", "intruder", UserRole::Admin).await.unwrap());

    let record = store.authenticate("ada", "original").await.unwrap();
    assert_eq!(record.map(|r| r.role), Some(UserRole::User));
    assert!(store.authenticate("ada", "intruder").await.unwrap().is_none());
    assert_eq!(store.list_users().await.unwrap().len(), 1);
}

#[tokio::test]
async fn auth_session_round_trip_and_logout() {
    let store = MemoryCredentialStore::default();
    store.create_user("ada", "s3cret", UserRole::User).await.unwrap();
    let user = store
        .authenticate("ada", "s3cret")
        .await
        .unwrap()
        .expect("account exists");

    let expires = Utc::now() + Duration::days(30);
    store.create_auth_session("cookie-1", user.id, expires).await.unwrap();
    assert_eq!(store.validate_auth_session("cookie-1").await.unwrap(), user.id);

    store.delete_auth_session("cookie-1").await.unwrap();
    assert!(matches!(
        store.validate_auth_session("cookie-1").await,
        Err(PortError::Unauthorized)
    ));
}

#[tokio::test]
async fn expired_auth_session_is_rejected() {
    let store = MemoryCredentialStore::default();
    store.create_user("ada", "s3cret", UserRole::User).await.unwrap();
    let user = store
        .authenticate("ada", "s3cret")
        .await
        .unwrap()
        .expect("account exists");

    let expired = Utc::now() - Duration::minutes(1);
    store.create_auth_session("stale", user.id, expired).await.unwrap();
    assert!(matches!(
        store.validate_auth_session("stale").await,
        Err(PortError::Unauthorized)
    ));
}
