use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::api::error;
use crate::modules::friend::model::{FriendRequestFilter, NewFriendRequest};
use crate::modules::friend::schema::{FriendRequestEntity, FriendRequestStatus};

#[async_trait::async_trait]
pub trait FriendRequestRepository: Send + Sync {
    /// Inserts a `sent` row. A second row for the same ordered pair fails with
    /// `SystemError::Conflict`, also under concurrent inserts.
    async fn create(
        &self,
        request: &NewFriendRequest,
    ) -> Result<FriendRequestEntity, error::SystemError>;

    async fn find_by_id(
        &self,
        request_id: &Uuid,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError>;

    /// Ordered lookup: `(a, b)` does not match a row for `(b, a)`.
    async fn find_by_pair(
        &self,
        sender_id: &Uuid,
        receiver_id: &Uuid,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError>;

    /// Newest first.
    async fn find_all(
        &self,
        filter: &FriendRequestFilter,
    ) -> Result<Vec<FriendRequestEntity>, error::SystemError>;

    /// Sets `status`. With `expected`, only updates a row currently in that status.
    /// `None` when no row was updated.
    async fn update_status(
        &self,
        request_id: &Uuid,
        status: FriendRequestStatus,
        expected: Option<FriendRequestStatus>,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError>;

    async fn count_sent_since(
        &self,
        sender_id: &Uuid,
        since: DateTime<Utc>,
    ) -> Result<i64, error::SystemError>;
}
