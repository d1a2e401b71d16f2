use crate::{
    api::error,
    modules::{
        friend::{handle::*, repository::FriendRequestRepository, repository_pg::FriendRepositoryPg},
        user::{repository::UserRepository, repository_pg::UserRepositoryPg},
    },
};
use actix_web::web::{self, scope, PathConfig, ServiceConfig};
use actix_web::Scope;

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(friends_scope::<FriendRepositoryPg, UserRepositoryPg>());
}

pub fn friends_scope<R, U>() -> Scope
where
    R: FriendRequestRepository + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    scope("/friends")
        .app_data(PathConfig::default().error_handler(|_, _| {
            error::Error::not_found("Friend request not found.").into()
        }))
        .route("/requests", web::post().to(send_friend_request::<R, U>))
        .route("/requests/pending", web::get().to(list_pending_requests::<R, U>))
        .route("/requests/{request_id}", web::patch().to(respond_friend_request::<R, U>))
        .route("", web::get().to(list_friends::<R, U>))
}
