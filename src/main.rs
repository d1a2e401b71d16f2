use actix_cors::Cors;
use actix_web::{
    self, http::header, middleware::{from_fn, Logger}, web, App, HttpServer,
};
use std::sync::{Arc, LazyLock};

use crate::{
    configs::{connect_database, RedisCache},
    middlewares::authentication,
    modules::{
        friend::{repository_pg::FriendRepositoryPg, service::FriendService, throttle::RateLimitPolicy},
        user::{repository_pg::UserRepositoryPg, service::UserService},
    },
    utils::{clock::SystemClock, AuthConfig},
};

mod api;
mod configs;
mod constants;
mod middlewares;
mod modules;
#[cfg(test)]
mod test;
mod utils;

pub static ENV: LazyLock<constants::Env> = LazyLock::new(|| {
    dotenvy::dotenv().ok();
    env_logger::init();
    log::info!("Environment variables loaded from .env file");
    constants::Env::default()
});

#[actix_web::get("/")]
async fn health_check() -> &'static str {
    "Server is running"
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let db_pool =
        connect_database().await.map_err(|_| std::io::Error::other("Database connection error"))?;

    let redis_pool =
        RedisCache::new().await.map_err(|_| std::io::Error::other("Redis connection error"))?;

    let auth_config = AuthConfig::from_env(&ENV);
    let user_repo = Arc::new(UserRepositoryPg::new(db_pool.clone()));
    let friend_repo = Arc::new(FriendRepositoryPg::new(db_pool.clone()));

    let user_service = web::Data::new(UserService::with_dependencies(
        user_repo.clone(),
        Arc::new(redis_pool),
        auth_config.clone(),
    ));
    let friend_service = web::Data::new(
        FriendService::with_dependencies(
            friend_repo,
            user_repo,
            Arc::new(SystemClock),
            RateLimitPolicy::new(ENV.friend_request_limit, ENV.friend_request_window),
        )
        .with_strict_transitions(ENV.friend_request_strict_transitions),
    );
    let auth_config = web::Data::new(auth_config);

    log::info!("Starting server at http://{}:{}", ENV.ip.as_str(), ENV.port);
    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(ENV.frontend_url.as_str())
            .allowed_methods(vec!["GET", "POST", "PATCH"])
            .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE])
            .supports_credentials();

        App::new()
            .wrap(Logger::default())
            .wrap(cors)
            .app_data(auth_config.clone())
            .app_data(user_service.clone())
            .app_data(friend_service.clone())
            .service(health_check)
            .service(
                web::scope("/api").configure(modules::user::route::public_api_configure).service(
                    web::scope("")
                        .wrap(from_fn(authentication))
                        .configure(modules::user::route::configure)
                        .configure(modules::friend::route::configure),
                ),
            )
    })
    .bind((ENV.ip.as_str(), ENV.port))?
    .workers(ENV.workers)
    .run()
    .await
}
