use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::modules::{friend::schema::FriendRequestStatus, user::model::UserResponse};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FriendRequestBody {
    pub receiver: Uuid,
}

/// Kept loose so that a malformed `action` is judged only after the request
/// lookup and the receiver check.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RespondBody {
    #[serde(default)]
    pub action: Option<serde_json::Value>,
}

impl RespondBody {
    pub fn action(&self) -> Option<&str> {
        self.action.as_ref().and_then(serde_json::Value::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FriendRequestAction {
    Accept,
    Reject,
}

impl FriendRequestAction {
    pub fn status(self) -> FriendRequestStatus {
        match self {
            FriendRequestAction::Accept => FriendRequestStatus::Accepted,
            FriendRequestAction::Reject => FriendRequestStatus::Rejected,
        }
    }
}

impl std::str::FromStr for FriendRequestAction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "accept" => Ok(FriendRequestAction::Accept),
            "reject" => Ok(FriendRequestAction::Reject),
            _ => Err(()),
        }
    }
}

pub struct NewFriendRequest {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Conjunction of optional column filters; `None` means "any".
#[derive(Debug, Clone, Default)]
pub struct FriendRequestFilter {
    pub sender_id: Option<Uuid>,
    pub receiver_id: Option<Uuid>,
    pub status: Option<FriendRequestStatus>,
}

impl FriendRequestFilter {
    pub fn sent_by(user_id: Uuid) -> Self {
        Self { sender_id: Some(user_id), ..Default::default() }
    }

    pub fn received_by(user_id: Uuid) -> Self {
        Self { receiver_id: Some(user_id), ..Default::default() }
    }

    pub fn with_status(mut self, status: FriendRequestStatus) -> Self {
        self.status = Some(status);
        self
    }
}

#[derive(Debug, Serialize)]
pub struct RespondResponse {
    pub status: FriendRequestStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct PendingFriendRequestResponse {
    pub id: Uuid,
    pub sender: UserResponse,
    pub status: FriendRequestStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
