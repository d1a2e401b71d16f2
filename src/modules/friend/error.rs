use crate::api::error;

use crate::modules::friend::schema::FriendRequestStatus;

#[derive(thiserror::Error, Debug)]
pub enum FriendRequestError {
    #[error("Cannot send a friend request to yourself")]
    SelfRequest,
    #[error("Receiver does not exist")]
    ReceiverNotFound,
    #[error("Friend request already sent")]
    DuplicateRequest,
    #[error("Too many friend requests, try again later")]
    RateLimited,
    #[error("Friend request not found")]
    NotFound,
    #[error("You are not allowed to respond to this friend request")]
    Unauthorized,
    #[error("Action must be 'accept' or 'reject'")]
    InvalidAction,
    #[error("Friend request is already {0}")]
    InvalidTransition(FriendRequestStatus),
    #[error(transparent)]
    Store(#[from] error::SystemError),
}

impl From<FriendRequestError> for error::Error {
    fn from(value: FriendRequestError) -> Self {
        match value {
            FriendRequestError::SelfRequest
            | FriendRequestError::ReceiverNotFound
            | FriendRequestError::DuplicateRequest
            | FriendRequestError::RateLimited
            | FriendRequestError::InvalidAction
            | FriendRequestError::InvalidTransition(_) => error::Error::bad_request(value.to_string()),
            FriendRequestError::NotFound => error::Error::not_found(value.to_string()),
            FriendRequestError::Unauthorized => error::Error::forbidden(value.to_string()),
            FriendRequestError::Store(err) => err.into(),
        }
    }
}
