mod application;
mod data;
mod domain;
mod infrastructure;
mod presentation;
mod server;

use std::sync::Arc;

use actix_web::web;
use anyhow::Context;
use application::auth_service::AuthService;
use application::post_service::PostService;
use data::post_repository::PostgresPostRepository;
use data::session_repository::PostgresSessionRepository;
use data::user_repository::PostgresUserRepository;
use infrastructure::config::AppConfig;
use infrastructure::database::{create_pool, run_migrations};
use infrastructure::logging::init_logging;
use infrastructure::security::SessionKeys;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = AppConfig::from_env().context("invalid configuration")?;
    let pool = create_pool(&config.database_url, config.database_max_connections)
        .await
        .context("failed to connect to database")?;
    run_migrations(&pool)
        .await
        .context("failed to run migrations")?;

    let user_repo = Arc::new(PostgresUserRepository::new(pool.clone()));
    let session_repo = Arc::new(PostgresSessionRepository::new(pool.clone()));
    let post_repo = Arc::new(PostgresPostRepository::new(pool));

    let auth_service = web::Data::new(AuthService::new(
        user_repo,
        session_repo,
        SessionKeys::new(
            &config.session_secret,
            chrono::Duration::hours(config.session_ttl_hours),
        ),
    ));
    let post_service = web::Data::new(PostService::new(post_repo));

    server::start_http_server(config, auth_service, post_service).await
}
