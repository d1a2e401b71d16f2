use log::info;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::error;
use crate::configs::{get_json, set_json, Cache};
use crate::constants::{SEARCH_PAGE_SIZE, USER_CACHE_TTL};
use crate::modules::user::model::{
    AuthTokens, InsertUser, Page, SignInModel, SignUpModel, SignUpResponse, UserResponse,
};
use crate::modules::user::repository::UserRepository;
use crate::utils::{hash_password, verify_password, AuthConfig, Claims, TypeClaims};

#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository + Send + Sync>,
    cache: Arc<dyn Cache>,
    auth: AuthConfig,
}

fn refresh_key(jti: &Uuid) -> String {
    format!("refresh_token:{jti}")
}

impl UserService {
    pub fn with_dependencies(
        repo: Arc<dyn UserRepository + Send + Sync>,
        cache: Arc<dyn Cache>,
        auth: AuthConfig,
    ) -> Self {
        info!("UserService initialized with dependencies");
        UserService { repo, cache, auth }
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<UserResponse, error::SystemError> {
        let key = format!("user:{}", id);
        if let Some(cached_user) = get_json::<_, UserResponse>(self.cache.as_ref(), &key).await? {
            info!("User {} found in cache", id);
            return Ok(cached_user);
        }
        let user_entity = self.repo.find_by_id(&id).await?;
        if let Some(entity) = user_entity {
            let user = UserResponse::from(entity);
            set_json(self.cache.as_ref(), &key, &user, USER_CACHE_TTL).await?;
            info!("User {} cached", id);
            Ok(user)
        } else {
            Err(error::SystemError::not_found("User not found"))
        }
    }

    pub async fn sign_up(&self, user: SignUpModel) -> Result<SignUpResponse, error::SystemError> {
        let hash_password = hash_password(&user.password)?;

        let new_user = InsertUser {
            email: user.email.trim().to_lowercase(),
            name: user.name.trim().to_lowercase(),
            hash_password,
        };

        let created = self.repo.create(&new_user).await?;
        info!("User {} signed up", created.id);

        let tokens = self.issue_tokens(&created.id).await?;
        Ok(SignUpResponse { user: UserResponse::from(created), tokens })
    }

    pub async fn sign_in(&self, user: SignInModel) -> Result<AuthTokens, error::SystemError> {
        let user_entity = self
            .repo
            .find_by_email(user.email.trim())
            .await?
            .ok_or_else(|| error::SystemError::bad_request("Invalid credentials."))?;

        let valid = verify_password(&user_entity.hash_password, &user.password)?;
        if !valid || !user_entity.is_active {
            return Err(error::SystemError::bad_request("Invalid credentials."));
        }

        self.issue_tokens(&user_entity.id).await
    }

    /// Rotates a refresh token: the presented session is revoked and a new pair issued.
    pub async fn refresh(&self, refresh_token: &str) -> Result<AuthTokens, error::SystemError> {
        let (claims, jti) = self.decode_refresh(refresh_token)?;

        let key = refresh_key(&jti);
        let owner = get_json::<_, Uuid>(self.cache.as_ref(), &key).await?;
        if owner != Some(claims.sub) {
            return Err(error::SystemError::unauthorized("Refresh token revoked or expired"));
        }

        self.cache.delete(&key).await?;
        self.issue_tokens(&claims.sub).await
    }

    pub async fn sign_out(&self, refresh_token: &str) -> Result<(), error::SystemError> {
        let (_, jti) = self.decode_refresh(refresh_token)?;
        self.cache.delete(&refresh_key(&jti)).await
    }

    /// Exact email match wins; otherwise a paginated name search. No query, no results.
    pub async fn search(
        &self,
        query: Option<&str>,
        page: u32,
    ) -> Result<Page<UserResponse>, error::SystemError> {
        let Some(query) = query.map(str::trim).filter(|q| !q.is_empty()) else {
            return Ok(Page::empty(SEARCH_PAGE_SIZE));
        };

        if let Some(user) = self.repo.find_by_email(query).await? {
            if page > 1 {
                return Err(error::SystemError::not_found("Invalid page."));
            }
            return Ok(Page::new(vec![UserResponse::from(user)], 1, 1, SEARCH_PAGE_SIZE));
        }

        let offset = i64::from(page.saturating_sub(1)) * SEARCH_PAGE_SIZE;
        let (count, users) = tokio::try_join!(
            self.repo.count_by_name(query),
            self.repo.search_by_name(query, SEARCH_PAGE_SIZE, offset),
        )?;

        if page > 1 && offset >= count {
            return Err(error::SystemError::not_found("Invalid page."));
        }

        let results = users.into_iter().map(UserResponse::from).collect();
        Ok(Page::new(results, count, page, SEARCH_PAGE_SIZE))
    }

    fn decode_refresh(&self, token: &str) -> Result<(Claims, Uuid), error::SystemError> {
        let claims = Claims::decode(token, self.auth.secret.as_bytes())
            .map_err(|_| error::SystemError::unauthorized("Refresh token invalid or expired"))?;

        match (&claims._type, claims.jti) {
            (Some(TypeClaims::RefreshToken), Some(jti)) => Ok((claims, jti)),
            _ => Err(error::SystemError::unauthorized("Refresh token invalid or expired")),
        }
    }

    async fn issue_tokens(&self, user_id: &Uuid) -> Result<AuthTokens, error::SystemError> {
        let secret = self.auth.secret.as_bytes();

        let access = Claims::new(user_id, self.auth.access_token_expiration)
            .with_type(TypeClaims::AccessToken)
            .encode(secret)?;

        let jti = Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext));
        let refresh = Claims::new(user_id, self.auth.refresh_token_expiration)
            .with_jti(jti)
            .with_type(TypeClaims::RefreshToken)
            .encode(secret)?;

        set_json(self.cache.as_ref(), &refresh_key(&jti), user_id, self.auth.refresh_token_expiration)
            .await?;

        Ok(AuthTokens { access, refresh })
    }
}
