use actix_web::{web, HttpRequest};
use uuid::Uuid;

use crate::{
    api::{error, success},
    middlewares::get_claims,
    modules::{
        friend::{
            model::{FriendRequestBody, PendingFriendRequestResponse, RespondBody, RespondResponse},
            repository::FriendRequestRepository,
            schema::FriendRequestEntity,
            service::FriendService,
        },
        user::{model::UserResponse, repository::UserRepository},
    },
    utils::ValidatedJson,
};

pub async fn send_friend_request<R, U>(
    friend_service: web::Data<FriendService<R, U>>,
    body: ValidatedJson<FriendRequestBody>,
    req: HttpRequest,
) -> Result<success::Success<FriendRequestEntity>, error::Error>
where
    R: FriendRequestRepository + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    let sender_id = get_claims(&req)?.sub;
    let request = friend_service.send_request(sender_id, body.0.receiver).await?;

    Ok(success::Success::created(Some(request)).message("Friend request sent successfully."))
}

/// A missing or unreadable body is treated as a body without `action`.
pub async fn respond_friend_request<R, U>(
    friend_service: web::Data<FriendService<R, U>>,
    request_id: web::Path<Uuid>,
    body: Option<web::Json<RespondBody>>,
    req: HttpRequest,
) -> Result<success::Success<RespondResponse>, error::Error>
where
    R: FriendRequestRepository + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    let user_id = get_claims(&req)?.sub;
    let body = body.map(web::Json::into_inner).unwrap_or_default();
    let status = friend_service.respond(request_id.into_inner(), user_id, body.action()).await?;

    Ok(success::Success::ok(Some(RespondResponse { status }))
        .message(format!("Friend request {status} successfully.")))
}

pub async fn list_pending_requests<R, U>(
    friend_service: web::Data<FriendService<R, U>>,
    req: HttpRequest,
) -> Result<success::Success<Vec<PendingFriendRequestResponse>>, error::Error>
where
    R: FriendRequestRepository + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    let user_id = get_claims(&req)?.sub;
    let pending = friend_service.list_pending(user_id).await?;

    Ok(success::Success::ok(Some(pending))
        .message("List of pending friend requests retrieved successfully."))
}

pub async fn list_friends<R, U>(
    friend_service: web::Data<FriendService<R, U>>,
    req: HttpRequest,
) -> Result<success::Success<Vec<UserResponse>>, error::Error>
where
    R: FriendRequestRepository + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    let user_id = get_claims(&req)?.sub;
    let friends = friend_service.list_friends(user_id).await?;

    Ok(success::Success::ok(Some(friends)).message("List of friends retrieved successfully."))
}
