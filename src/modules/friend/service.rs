use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use log::info;
use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        friend::{
            error::FriendRequestError,
            model::{
                FriendRequestAction, FriendRequestFilter, NewFriendRequest,
                PendingFriendRequestResponse,
            },
            repository::FriendRequestRepository,
            schema::{FriendRequestEntity, FriendRequestStatus},
            throttle::{RateLimitPolicy, RateLimiter},
        },
        user::{model::UserResponse, repository::UserRepository},
    },
    utils::clock::Clock,
};

/// Friend request state machine. Holds no mutable state of its own: every
/// decision is made against the repositories and the clock.
pub struct FriendService<R, U>
where
    R: FriendRequestRepository,
    U: UserRepository + Send + Sync,
{
    friend_repo: Arc<R>,
    user_repo: Arc<U>,
    limiter: RateLimiter<R>,
    clock: Arc<dyn Clock>,
    strict_transitions: bool,
}

impl<R, U> Clone for FriendService<R, U>
where
    R: FriendRequestRepository,
    U: UserRepository + Send + Sync,
{
    fn clone(&self) -> Self {
        FriendService {
            friend_repo: self.friend_repo.clone(),
            user_repo: self.user_repo.clone(),
            limiter: self.limiter.clone(),
            clock: self.clock.clone(),
            strict_transitions: self.strict_transitions,
        }
    }
}

impl<R, U> FriendService<R, U>
where
    R: FriendRequestRepository,
    U: UserRepository + Send + Sync,
{
    pub fn with_dependencies(
        friend_repo: Arc<R>,
        user_repo: Arc<U>,
        clock: Arc<dyn Clock>,
        policy: RateLimitPolicy,
    ) -> Self {
        let limiter = RateLimiter::new(friend_repo.clone(), clock.clone(), policy);
        FriendService { friend_repo, user_repo, limiter, clock, strict_transitions: false }
    }

    /// Refuse to answer a request that is no longer `sent`.
    pub fn with_strict_transitions(mut self, strict: bool) -> Self {
        self.strict_transitions = strict;
        self
    }

    pub async fn send_request(
        &self,
        sender_id: Uuid,
        receiver_id: Uuid,
    ) -> Result<FriendRequestEntity, FriendRequestError> {
        if sender_id == receiver_id {
            return Err(FriendRequestError::SelfRequest);
        }

        if self.user_repo.find_by_id(&receiver_id).await?.is_none() {
            return Err(FriendRequestError::ReceiverNotFound);
        }

        // the reverse pair (receiver -> sender) may coexist as its own row
        if self.friend_repo.find_by_pair(&sender_id, &receiver_id).await?.is_some() {
            return Err(FriendRequestError::DuplicateRequest);
        }

        if !self.limiter.can_send(&sender_id).await? {
            return Err(FriendRequestError::RateLimited);
        }

        let new_request = NewFriendRequest {
            id: Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext)),
            sender_id,
            receiver_id,
            created_at: self.clock.now(),
        };

        match self.friend_repo.create(&new_request).await {
            Ok(request) => {
                info!("Friend request {} sent: {} -> {}", request.id, sender_id, receiver_id);
                Ok(request)
            }
            // lost a race against a concurrent insert of the same pair
            Err(error::SystemError::Conflict(_)) => Err(FriendRequestError::DuplicateRequest),
            Err(err) => Err(err.into()),
        }
    }

    /// Answers a request as `acting_user_id`. Only the receiver may answer.
    ///
    /// Unless strict transitions are enabled, answering an already answered
    /// request overwrites its status.
    pub async fn respond(
        &self,
        request_id: Uuid,
        acting_user_id: Uuid,
        action: Option<&str>,
    ) -> Result<FriendRequestStatus, FriendRequestError> {
        let request = self
            .friend_repo
            .find_by_id(&request_id)
            .await?
            .ok_or(FriendRequestError::NotFound)?;

        if request.receiver_id != acting_user_id {
            return Err(FriendRequestError::Unauthorized);
        }

        let action = action
            .and_then(|a| a.parse::<FriendRequestAction>().ok())
            .ok_or(FriendRequestError::InvalidAction)?;

        let expected = if self.strict_transitions {
            if request.status != FriendRequestStatus::Sent {
                return Err(FriendRequestError::InvalidTransition(request.status));
            }
            Some(FriendRequestStatus::Sent)
        } else {
            None
        };

        let updated = match self
            .friend_repo
            .update_status(&request_id, action.status(), expected)
            .await?
        {
            Some(updated) => updated,
            None if expected.is_some() => {
                let current = self
                    .friend_repo
                    .find_by_id(&request_id)
                    .await?
                    .ok_or(FriendRequestError::NotFound)?;
                return Err(FriendRequestError::InvalidTransition(current.status));
            }
            None => return Err(FriendRequestError::NotFound),
        };

        info!("Friend request {} {} by {}", updated.id, updated.status, acting_user_id);
        Ok(updated.status)
    }

    /// Users joined to `user_id` by an accepted request in either direction.
    pub async fn list_friends(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<UserResponse>, FriendRequestError> {
        let sent = FriendRequestFilter::sent_by(user_id).with_status(FriendRequestStatus::Accepted);
        let received =
            FriendRequestFilter::received_by(user_id).with_status(FriendRequestStatus::Accepted);

        let (sent, received) = tokio::try_join!(
            self.friend_repo.find_all(&sent),
            self.friend_repo.find_all(&received),
        )?;

        let friend_ids: Vec<Uuid> = sent
            .iter()
            .map(|r| r.receiver_id)
            .chain(received.iter().map(|r| r.sender_id))
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        let friends = self.user_repo.find_by_ids(&friend_ids).await?;
        Ok(friends.into_iter().map(UserResponse::from).collect())
    }

    /// Requests waiting on `user_id`, newest first.
    pub async fn list_pending(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<PendingFriendRequestResponse>, FriendRequestError> {
        let filter = FriendRequestFilter::received_by(user_id).with_status(FriendRequestStatus::Sent);
        let requests = self.friend_repo.find_all(&filter).await?;

        let sender_ids: Vec<Uuid> =
            requests.iter().map(|r| r.sender_id).collect::<HashSet<_>>().into_iter().collect();
        let senders: HashMap<Uuid, UserResponse> = self
            .user_repo
            .find_by_ids(&sender_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, UserResponse::from(u)))
            .collect();

        Ok(requests
            .into_iter()
            .filter_map(|r| {
                senders.get(&r.sender_id).map(|sender| PendingFriendRequestResponse {
                    id: r.id,
                    sender: sender.clone(),
                    status: r.status,
                    created_at: r.created_at,
                })
            })
            .collect())
    }
}
