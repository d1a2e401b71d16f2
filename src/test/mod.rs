//! In-memory stand-ins for the PostgreSQL repositories and the Redis cache.

use std::{
    collections::HashMap,
    sync::Mutex,
    time::{Duration, Instant},
};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    api::error::{DbErrorMeta, SystemError},
    configs::Cache,
    modules::{
        friend::{
            model::{FriendRequestFilter, NewFriendRequest},
            repository::FriendRequestRepository,
            schema::{FriendRequestEntity, FriendRequestStatus},
        },
        user::{model::InsertUser, repository::UserRepository, schema::UserEntity},
    },
    utils::AuthConfig,
};

pub fn test_auth_config() -> AuthConfig {
    AuthConfig {
        secret: "test-secret".into(),
        access_token_expiration: 900,
        refresh_token_expiration: 3600,
    }
}

fn unique_violation(constraint: &str) -> SystemError {
    SystemError::Conflict(Some(DbErrorMeta { constraint: Some(constraint.into()) }))
}

#[derive(Default)]
pub struct MemoryUserRepository {
    users: Mutex<Vec<UserEntity>>,
}

impl MemoryUserRepository {
    fn insert(&self, user: &InsertUser) -> Result<UserEntity, SystemError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email.eq_ignore_ascii_case(&user.email)) {
            return Err(unique_violation("users_email"));
        }

        let now = Utc::now();
        let entity = UserEntity {
            id: Uuid::now_v7(),
            email: user.email.clone(),
            name: user.name.clone(),
            hash_password: user.hash_password.clone(),
            is_active: true,
            is_staff: false,
            created_at: now,
            updated_at: now,
        };
        users.push(entity.clone());
        Ok(entity)
    }

    pub fn remove(&self, id: &Uuid) {
        self.users.lock().unwrap().retain(|u| u.id != *id);
    }

    fn by_name(&self, query: &str) -> Vec<UserEntity> {
        let query = query.to_lowercase();
        let mut users: Vec<_> = self
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.name.to_lowercase().contains(&query))
            .cloned()
            .collect();
        users.sort_by(|a, b| (&a.name, a.id).cmp(&(&b.name, b.id)));
        users
    }
}

/// Adds a user without hashing a password.
pub fn seed_user(repo: &MemoryUserRepository, email: &str, name: &str) -> UserEntity {
    repo.insert(&InsertUser {
        email: email.into(),
        name: name.into(),
        hash_password: "not-a-hash".into(),
    })
    .unwrap()
}

#[async_trait::async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<UserEntity>, SystemError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == *id).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<UserEntity>, SystemError> {
        let mut users: Vec<_> =
            self.users.lock().unwrap().iter().filter(|u| ids.contains(&u.id)).cloned().collect();
        users.sort_by(|a, b| (&a.name, a.id).cmp(&(&b.name, b.id)));
        Ok(users)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>, SystemError> {
        let email = email.to_lowercase();
        Ok(self.users.lock().unwrap().iter().find(|u| u.email.to_lowercase() == email).cloned())
    }

    async fn create(&self, user: &InsertUser) -> Result<UserEntity, SystemError> {
        self.insert(user)
    }

    async fn search_by_name(
        &self,
        query: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<UserEntity>, SystemError> {
        let skip = usize::try_from(offset).unwrap_or(0);
        let take = usize::try_from(limit).unwrap_or(0);
        Ok(self.by_name(query).into_iter().skip(skip).take(take).collect())
    }

    async fn count_by_name(&self, query: &str) -> Result<i64, SystemError> {
        Ok(self.by_name(query).len() as i64)
    }
}

#[derive(Default)]
pub struct MemoryFriendRepository {
    requests: Mutex<Vec<FriendRequestEntity>>,
}

#[async_trait::async_trait]
impl FriendRequestRepository for MemoryFriendRepository {
    async fn create(&self, request: &NewFriendRequest) -> Result<FriendRequestEntity, SystemError> {
        let mut requests = self.requests.lock().unwrap();
        if requests
            .iter()
            .any(|r| r.sender_id == request.sender_id && r.receiver_id == request.receiver_id)
        {
            return Err(unique_violation("friend_requests_pair"));
        }

        let entity = FriendRequestEntity {
            id: request.id,
            sender_id: request.sender_id,
            receiver_id: request.receiver_id,
            status: FriendRequestStatus::Sent,
            created_at: request.created_at,
        };
        requests.push(entity.clone());
        Ok(entity)
    }

    async fn find_by_id(&self, request_id: &Uuid) -> Result<Option<FriendRequestEntity>, SystemError> {
        Ok(self.requests.lock().unwrap().iter().find(|r| r.id == *request_id).cloned())
    }

    async fn find_by_pair(
        &self,
        sender_id: &Uuid,
        receiver_id: &Uuid,
    ) -> Result<Option<FriendRequestEntity>, SystemError> {
        Ok(self
            .requests
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.sender_id == *sender_id && r.receiver_id == *receiver_id)
            .cloned())
    }

    async fn find_all(
        &self,
        filter: &FriendRequestFilter,
    ) -> Result<Vec<FriendRequestEntity>, SystemError> {
        let mut matched: Vec<_> = self
            .requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| filter.sender_id.map_or(true, |id| r.sender_id == id))
            .filter(|r| filter.receiver_id.map_or(true, |id| r.receiver_id == id))
            .filter(|r| filter.status.map_or(true, |s| r.status == s))
            .cloned()
            .collect();
        matched.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(matched)
    }

    async fn update_status(
        &self,
        request_id: &Uuid,
        status: FriendRequestStatus,
        expected: Option<FriendRequestStatus>,
    ) -> Result<Option<FriendRequestEntity>, SystemError> {
        let mut requests = self.requests.lock().unwrap();
        let Some(request) = requests
            .iter_mut()
            .find(|r| r.id == *request_id && expected.map_or(true, |s| r.status == s))
        else {
            return Ok(None);
        };
        request.status = status;
        Ok(Some(request.clone()))
    }

    async fn count_sent_since(
        &self,
        sender_id: &Uuid,
        since: DateTime<Utc>,
    ) -> Result<i64, SystemError> {
        Ok(self
            .requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.sender_id == *sender_id && r.created_at >= since)
            .count() as i64)
    }
}

#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, (Vec<u8>, Instant)>>,
}

#[async_trait::async_trait]
impl Cache for MemoryCache {
    async fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, SystemError> {
        let mut entries = self.entries.lock().unwrap();
        match entries.get(key) {
            Some((_, expires_at)) if *expires_at <= Instant::now() => {
                entries.remove(key);
                Ok(None)
            }
            Some((value, _)) => Ok(Some(value.clone())),
            None => Ok(None),
        }
    }

    async fn set_bytes(&self, key: &str, value: Vec<u8>, expiration: u64) -> Result<(), SystemError> {
        let expires_at = Instant::now() + Duration::from_secs(expiration);
        self.entries.lock().unwrap().insert(key.to_string(), (value, expires_at));
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), SystemError> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configs::{get_json, set_json};

    #[actix_web::test]
    async fn friend_store_rejects_a_second_row_for_an_ordered_pair() {
        let repo = MemoryFriendRepository::default();
        let (a, b) = (Uuid::now_v7(), Uuid::now_v7());
        let new = |sender, receiver| NewFriendRequest {
            id: Uuid::now_v7(),
            sender_id: sender,
            receiver_id: receiver,
            created_at: Utc::now(),
        };

        repo.create(&new(a, b)).await.unwrap();
        repo.create(&new(b, a)).await.unwrap();
        let err = repo.create(&new(a, b)).await.unwrap_err();

        assert!(matches!(err, SystemError::Conflict(_)));
    }

    #[actix_web::test]
    async fn compare_and_set_only_updates_expected_status() {
        let repo = MemoryFriendRepository::default();
        let created = repo
            .create(&NewFriendRequest {
                id: Uuid::now_v7(),
                sender_id: Uuid::now_v7(),
                receiver_id: Uuid::now_v7(),
                created_at: Utc::now(),
            })
            .await
            .unwrap();

        let accepted = repo
            .update_status(&created.id, FriendRequestStatus::Accepted, Some(FriendRequestStatus::Sent))
            .await
            .unwrap();
        assert!(accepted.is_some());

        let again = repo
            .update_status(&created.id, FriendRequestStatus::Rejected, Some(FriendRequestStatus::Sent))
            .await
            .unwrap();
        assert!(again.is_none());
    }

    #[actix_web::test]
    async fn cache_expires_entries() {
        let cache = MemoryCache::default();
        set_json(&cache, "live", &1u32, 60).await.unwrap();
        set_json(&cache, "dead", &2u32, 0).await.unwrap();

        assert_eq!(get_json::<_, u32>(&cache, "live").await.unwrap(), Some(1));
        assert_eq!(get_json::<_, u32>(&cache, "dead").await.unwrap(), None);

        cache.delete("live").await.unwrap();
        assert_eq!(get_json::<_, u32>(&cache, "live").await.unwrap(), None);
    }
}
