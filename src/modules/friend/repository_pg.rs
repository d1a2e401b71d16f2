use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    api::error,
    modules::friend::{
        model::{FriendRequestFilter, NewFriendRequest},
        repository::FriendRequestRepository,
        schema::{FriendRequestEntity, FriendRequestStatus},
    },
};

#[derive(Clone)]
pub struct FriendRepositoryPg {
    pool: sqlx::PgPool,
}

impl FriendRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl FriendRequestRepository for FriendRepositoryPg {
    async fn create(
        &self,
        request: &NewFriendRequest,
    ) -> Result<FriendRequestEntity, error::SystemError> {
        let request = sqlx::query_as::<_, FriendRequestEntity>(
            r#"
            INSERT INTO friend_requests (id, sender_id, receiver_id, status, created_at)
            VALUES ($1, $2, $3, 'sent', $4)
            RETURNING *
            "#,
        )
        .bind(request.id)
        .bind(request.sender_id)
        .bind(request.receiver_id)
        .bind(request.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(request)
    }

    async fn find_by_id(
        &self,
        request_id: &Uuid,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError> {
        let request =
            sqlx::query_as::<_, FriendRequestEntity>("SELECT * FROM friend_requests WHERE id = $1")
                .bind(request_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(request)
    }

    async fn find_by_pair(
        &self,
        sender_id: &Uuid,
        receiver_id: &Uuid,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError> {
        let request = sqlx::query_as::<_, FriendRequestEntity>(
            "SELECT * FROM friend_requests WHERE sender_id = $1 AND receiver_id = $2",
        )
        .bind(sender_id)
        .bind(receiver_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    async fn find_all(
        &self,
        filter: &FriendRequestFilter,
    ) -> Result<Vec<FriendRequestEntity>, error::SystemError> {
        let mut query =
            sqlx::QueryBuilder::<sqlx::Postgres>::new("SELECT * FROM friend_requests WHERE TRUE");

        if let Some(sender_id) = filter.sender_id {
            query.push(" AND sender_id = ").push_bind(sender_id);
        }
        if let Some(receiver_id) = filter.receiver_id {
            query.push(" AND receiver_id = ").push_bind(receiver_id);
        }
        if let Some(status) = filter.status {
            query.push(" AND status = ").push_bind(status);
        }
        query.push(" ORDER BY created_at DESC, id DESC");

        let requests =
            query.build_query_as::<FriendRequestEntity>().fetch_all(&self.pool).await?;

        Ok(requests)
    }

    async fn update_status(
        &self,
        request_id: &Uuid,
        status: FriendRequestStatus,
        expected: Option<FriendRequestStatus>,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError> {
        let request = sqlx::query_as::<_, FriendRequestEntity>(
            r#"
            UPDATE friend_requests
            SET status = $2
            WHERE id = $1
              AND ($3::friend_request_status IS NULL OR status = $3)
            RETURNING *
            "#,
        )
        .bind(request_id)
        .bind(status)
        .bind(expected)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    async fn count_sent_since(
        &self,
        sender_id: &Uuid,
        since: DateTime<Utc>,
    ) -> Result<i64, error::SystemError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM friend_requests WHERE sender_id = $1 AND created_at >= $2",
        )
        .bind(sender_id)
        .bind(since)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
