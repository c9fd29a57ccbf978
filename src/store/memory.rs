use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{NewUser, RefreshSession, StoreError, StoreResult, User, UserStore, normalize_email};

/// In-memory `UserStore` used for local runs and tests. The RwLock is
/// the only serialization point, which gives the same last-write-wins
/// behavior a relational row would.
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<Uuid, User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn update<F>(&self, id: &Uuid, apply: F) -> StoreResult<()>
    where
        F: FnOnce(&mut User),
    {
        let mut users = self.users.write().await;
        let user = users.get_mut(id).ok_or(StoreError::NotFound { id: *id })?;
        apply(user);
        user.updated_at = Utc::now();
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_id(&self, id: &Uuid) -> StoreResult<Option<User>> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn create(&self, new_user: NewUser) -> StoreResult<User> {
        let email = normalize_email(&new_user.email);
        let mut users = self.users.write().await;

        if users.values().any(|u| u.username == new_user.username) {
            return Err(StoreError::Duplicate { field: "username" });
        }

        if users.values().any(|u| u.email == email) {
            return Err(StoreError::Duplicate { field: "email" });
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: new_user.username,
            email,
            password_hash: new_user.password_hash,
            role: new_user.role,
            is_active: true,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            last_login_at: None,
            refresh_token_hash: None,
            refresh_token_expires_at: None,
            created_at: now,
            updated_at: now,
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn set_last_login(&self, id: &Uuid, at: DateTime<Utc>) -> StoreResult<()> {
        self.update(id, |user| user.last_login_at = Some(at)).await
    }

    async fn set_refresh_session(
        &self,
        id: &Uuid,
        session: Option<RefreshSession>,
    ) -> StoreResult<()> {
        self.update(id, |user| match session {
            Some(session) => {
                user.refresh_token_hash = Some(session.token_hash);
                user.refresh_token_expires_at = Some(session.expires_at);
            }
            None => {
                user.refresh_token_hash = None;
                user.refresh_token_expires_at = None;
            }
        })
        .await
    }

    async fn set_active(&self, id: &Uuid, active: bool) -> StoreResult<()> {
        self.update(id, |user| user.is_active = active).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    use crate::auth::Role;

    use super::*;

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            role: Role::User,
            first_name: None,
            last_name: None,
        }
    }

    #[tokio::test]
    async fn create_rejects_duplicate_username() {
        let store = MemoryUserStore::new();
        store.create(new_user("alice", "alice@example.com")).await.unwrap();

        let err = store
            .create(new_user("alice", "other@example.com"))
            .await
            .expect_err("create should fail");
        assert!(matches!(err, StoreError::Duplicate { field: "username" }));
    }

    #[tokio::test]
    async fn duplicate_username_wins_when_both_fields_collide() {
        let store = MemoryUserStore::new();
        store.create(new_user("alice", "alice@example.com")).await.unwrap();

        let err = store
            .create(new_user("alice", "alice@example.com"))
            .await
            .expect_err("create should fail");
        assert!(matches!(err, StoreError::Duplicate { field: "username" }));
    }

    #[tokio::test]
    async fn create_rejects_duplicate_email_case_insensitively() {
        let store = MemoryUserStore::new();
        store.create(new_user("alice", "alice@example.com")).await.unwrap();

        let err = store
            .create(new_user("bob", "  Alice@Example.COM "))
            .await
            .expect_err("create should fail");
        assert!(matches!(err, StoreError::Duplicate { field: "email" }));
    }

    #[tokio::test]
    async fn emails_are_stored_normalized() {
        let store = MemoryUserStore::new();
        let user = store
            .create(new_user("alice", " Alice@Example.com "))
            .await
            .unwrap();

        assert_eq!(user.email, "alice@example.com");
        let found = store.find_by_email("alice@example.com").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(user.id));
    }

    #[tokio::test]
    async fn refresh_pair_is_set_and_cleared_together() {
        let store = MemoryUserStore::new();
        let user = store.create(new_user("alice", "alice@example.com")).await.unwrap();

        store
            .set_refresh_session(
                &user.id,
                Some(RefreshSession {
                    token_hash: "hash-1".to_string(),
                    expires_at: Utc::now() + Duration::days(7),
                }),
            )
            .await
            .unwrap();

        let stored = store.find_by_id(&user.id).await.unwrap().unwrap();
        assert!(stored.refresh_token_hash.is_some());
        assert!(stored.refresh_token_expires_at.is_some());

        store.set_refresh_session(&user.id, None).await.unwrap();

        let cleared = store.find_by_id(&user.id).await.unwrap().unwrap();
        assert!(cleared.refresh_token_hash.is_none());
        assert!(cleared.refresh_token_expires_at.is_none());
    }

    #[tokio::test]
    async fn set_last_login_propagates_not_found() {
        let store = MemoryUserStore::new();
        let missing_id = Uuid::new_v4();

        let err = store
            .set_last_login(&missing_id, Utc::now())
            .await
            .expect_err("update should fail");
        assert!(matches!(err, StoreError::NotFound { id } if id == missing_id));
    }

    #[tokio::test]
    async fn set_active_flips_the_flag() {
        let store = MemoryUserStore::new();
        let user = store.create(new_user("alice", "alice@example.com")).await.unwrap();
        assert!(user.is_active);

        store.set_active(&user.id, false).await.unwrap();

        let stored = store.find_by_id(&user.id).await.unwrap().unwrap();
        assert!(!stored.is_active);
    }
}
