use actix_web::{
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    http::header,
    middleware::Next,
    web, Error, HttpMessage, HttpRequest,
};

use crate::{
    api::error,
    utils::{AuthConfig, Claims, TypeClaims},
};

pub async fn authentication<B>(
    req: ServiceRequest,
    next: Next<B>,
) -> Result<ServiceResponse<B>, Error>
where
    B: MessageBody + 'static,
{
    let auth = req.headers().get(header::AUTHORIZATION).and_then(|h| h.to_str().ok());
    let token = match auth.and_then(|h| h.strip_prefix("Bearer ")) {
        Some(t) => t,
        None => {
            return Err(error::Error::unauthorized("Token Invalid or Expired").into());
        }
    };

    let config = req.app_data::<web::Data<AuthConfig>>().ok_or_else(|| {
        log::error!("AuthConfig missing from app data");
        error::Error::internal_server_error()
    })?;

    let claims = Claims::decode(token, config.secret.as_bytes())
        .map_err(|_| error::Error::unauthorized("Token Invalid or Expired"))?;

    if claims._type != Some(TypeClaims::AccessToken) {
        return Err(error::Error::unauthorized("Token Invalid or Expired").into());
    }

    req.extensions_mut().insert(claims);

    next.call(req).await
}

pub fn get_claims(req: &HttpRequest) -> Result<Claims, error::Error> {
    let extensions = req.extensions();

    let claims = extensions
        .get::<Claims>()
        .ok_or_else(|| error::Error::unauthorized("Unauthorized"))?
        .clone();

    Ok(claims)
}
