use actix_web::{get, post, web, HttpRequest};
use uuid::Uuid;

use crate::api::{error, success};
use crate::middlewares::get_claims;
use crate::modules::user::{model, service::UserService};
use crate::utils::{ValidatedJson, ValidatedQuery};

#[post("/signup")]
pub async fn sign_up(
    user_service: web::Data<UserService>,
    user_data: ValidatedJson<model::SignUpModel>,
) -> Result<success::Success<model::SignUpResponse>, error::Error> {
    let response = user_service.sign_up(user_data.0).await?;
    Ok(success::Success::created(Some(response)).message("User signed up successfully."))
}

#[post("/login")]
pub async fn sign_in(
    user_service: web::Data<UserService>,
    user_data: ValidatedJson<model::SignInModel>,
) -> Result<success::Success<model::SignInResponse>, error::Error> {
    let tokens = user_service.sign_in(user_data.0).await?;
    Ok(success::Success::ok(Some(model::SignInResponse { tokens }))
        .message("User logged in successfully."))
}

#[post("/refresh")]
pub async fn refresh(
    user_service: web::Data<UserService>,
    body: ValidatedJson<model::RefreshTokenModel>,
) -> Result<success::Success<model::SignInResponse>, error::Error> {
    let tokens = user_service.refresh(&body.0.refresh_token).await?;
    Ok(success::Success::ok(Some(model::SignInResponse { tokens })).message("Token refreshed."))
}

#[post("/logout")]
pub async fn sign_out(
    user_service: web::Data<UserService>,
    body: ValidatedJson<model::RefreshTokenModel>,
) -> Result<success::Success<()>, error::Error> {
    user_service.sign_out(&body.0.refresh_token).await?;
    Ok(success::Success::no_content())
}

#[get("/search")]
pub async fn search_users(
    user_service: web::Data<UserService>,
    query: ValidatedQuery<model::SearchQuery>,
) -> Result<success::Success<model::Page<model::UserResponse>>, error::Error> {
    let query = query.0;
    let page = user_service.search(query.q.as_deref(), query.page.unwrap_or(1)).await?;
    Ok(success::Success::ok(Some(page)).message("User search results."))
}

#[get("/profile")]
pub async fn get_profile(
    user_service: web::Data<UserService>,
    req: HttpRequest,
) -> Result<success::Success<model::UserResponse>, error::Error> {
    let id = get_claims(&req)?.sub;
    let user = user_service.get_by_id(id).await?;
    Ok(success::Success::ok(Some(user)).message("Profile retrieved successfully"))
}

#[get("/{id:[0-9a-fA-F-]{36}}")]
pub async fn get_user(
    user_service: web::Data<UserService>,
    user_id: web::Path<Uuid>,
) -> Result<success::Success<model::UserResponse>, error::Error> {
    let user = user_service.get_by_id(user_id.into_inner()).await?;
    Ok(success::Success::ok(Some(user)).message("User retrieved successfully"))
}
