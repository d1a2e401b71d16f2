use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::modules::user::schema::UserEntity;

#[derive(Deserialize, Validate)]
pub struct SignUpModel {
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: String,
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: String,
}

#[derive(Deserialize, Validate)]
pub struct SignInModel {
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,
    #[validate(length(min = 1, message = "Password cannot be empty"))]
    pub password: String,
}

#[derive(Deserialize, Validate)]
pub struct RefreshTokenModel {
    #[validate(length(min = 1, message = "Refresh token cannot be empty"))]
    pub refresh_token: String,
}

#[derive(Deserialize, Validate)]
pub struct SearchQuery {
    pub q: Option<String>,
    #[validate(range(min = 1, message = "Page must be a positive integer"))]
    pub page: Option<u32>,
}

pub struct InsertUser {
    pub email: String,
    pub name: String,
    pub hash_password: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct UserResponse {
    pub id: uuid::Uuid,
    pub email: String,
    pub name: String,
}

impl From<UserEntity> for UserResponse {
    fn from(entity: UserEntity) -> Self {
        UserResponse { id: entity.id, email: entity.email, name: entity.name }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthTokens {
    pub access: String,
    pub refresh: String,
}

#[derive(Serialize)]
pub struct SignUpResponse {
    pub user: UserResponse,
    pub tokens: AuthTokens,
}

#[derive(Serialize)]
pub struct SignInResponse {
    pub tokens: AuthTokens,
}

/// One page of a 1-based paginated listing.
#[derive(Debug, Serialize)]
pub struct Page<T: Serialize> {
    pub count: i64,
    pub page: u32,
    pub page_size: i64,
    pub next: Option<u32>,
    pub previous: Option<u32>,
    pub results: Vec<T>,
}

impl<T: Serialize> Page<T> {
    pub fn empty(page_size: i64) -> Self {
        Page { count: 0, page: 1, page_size, next: None, previous: None, results: Vec::new() }
    }

    pub fn new(results: Vec<T>, count: i64, page: u32, page_size: i64) -> Self {
        let next = (i64::from(page) * page_size < count).then_some(page + 1);
        let previous = (page > 1).then(|| page - 1);
        Page { count, page, page_size, next, previous, results }
    }
}
