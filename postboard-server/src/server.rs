use crate::application::auth_service::AuthService;
use crate::application::post_service::PostService;
use crate::data::post_repository::PostRepository;
use crate::data::session_repository::SessionRepository;
use crate::data::user_repository::UserRepository;
use crate::domain::error::DomainError;
use crate::infrastructure::config::AppConfig;
use crate::presentation::handlers::{auth, home, post};
use crate::presentation::middleware::{RequestIdMiddleware, SessionAuth, TimingMiddleware};
use crate::presentation::utils::CookiePolicy;
use actix_cors::Cors;
use actix_web::middleware::{DefaultHeaders, Logger};
use actix_web::{App, HttpResponse, HttpServer, Responder, web};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

/// Registers the full route table.
pub fn routes<U, S, P>(
    auth_service: web::Data<AuthService<U, S>>,
    post_service: web::Data<PostService<P>>,
    policy: CookiePolicy,
) -> impl FnOnce(&mut web::ServiceConfig)
where
    U: UserRepository + 'static,
    S: SessionRepository + 'static,
    P: PostRepository + 'static,
{
    move |cfg| {
        cfg.app_data(auth_service.clone())
            .app_data(post_service)
            .app_data(web::Data::new(policy))
            .app_data(json_config())
            .app_data(query_config())
            .app_data(path_config())
            .route("/health", web::get().to(health))
            .service(
                web::resource(vec!["/", "/home/index"])
                    .wrap(SessionAuth::optional(auth_service.clone()))
                    .route(web::get().to(home::index)),
            )
            .service(
                web::scope("/users")
                    .route("", web::post().to(auth::register::<U, S>))
                    .route("/sign_up", web::get().to(auth::sign_up_form))
                    .route("/sign_in", web::get().to(auth::sign_in_form))
                    .route("/sign_in", web::post().to(auth::sign_in::<U, S>))
                    .route("/sign_out", web::delete().to(auth::sign_out::<U, S>)),
            )
            .service(
                web::scope("/posts")
                    .wrap(SessionAuth::required(auth_service))
                    .route("", web::get().to(post::list_posts::<P>))
                    .route("", web::post().to(post::create_post::<P>))
                    .route("/new", web::get().to(post::new_post))
                    .route("/{id}", web::get().to(post::show_post::<P>))
                    .route("/{id}", web::patch().to(post::update_post::<P>))
                    .route("/{id}", web::put().to(post::update_post::<P>))
                    .route("/{id}", web::delete().to(post::delete_post::<P>))
                    .route("/{id}/edit", web::get().to(post::edit_post::<P>)),
            );
    }
}

pub async fn start_http_server<U, S, P>(
    config: AppConfig,
    auth_service: web::Data<AuthService<U, S>>,
    post_service: web::Data<PostService<P>>,
) -> anyhow::Result<()>
where
    U: UserRepository + 'static,
    S: SessionRepository + 'static,
    P: PostRepository + 'static,
{
    let bind_address = (config.host.clone(), config.port);
    let policy = CookiePolicy {
        secure: config.cookie_secure,
    };

    info!(host = %bind_address.0, port = bind_address.1, "HTTP server starting");

    HttpServer::new(move || {
        let cors = build_cors(&config);

        App::new()
            .wrap(Logger::default())
            .wrap(TimingMiddleware)
            .wrap(RequestIdMiddleware)
            .wrap(
                DefaultHeaders::new()
                    .add(("X-Content-Type-Options", "nosniff"))
                    .add(("Referrer-Policy", "no-referrer"))
                    .add(("Permissions-Policy", "geolocation=()"))
                    .add(("Cross-Origin-Opener-Policy", "same-origin")),
            )
            .wrap(cors)
            .configure(routes(auth_service.clone(), post_service.clone(), policy))
    })
    .bind(bind_address)?
    .run()
    .await
    .map_err(anyhow::Error::new)?;

    info!("HTTP server stopped");
    Ok(())
}

fn build_cors(config: &AppConfig) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE"])
        .allowed_headers(vec![
            actix_web::http::header::CONTENT_TYPE,
            actix_web::http::header::AUTHORIZATION,
        ])
        .supports_credentials()
        .max_age(3600);

    for origin in &config.cors_origins {
        cors = if origin == "*" {
            cors.allow_any_origin()
        } else {
            cors.allowed_origin(origin)
        };
    }

    cors
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| DomainError::validation(err.to_string()).into())
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| DomainError::validation(err.to_string()).into())
}

/// Unparseable ids can never match a record, so they are reported as missing.
fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|_err, req| {
        let raw = req.match_info().get("id").unwrap_or_default().to_string();
        DomainError::MalformedId(raw).into()
    })
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}

async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        timestamp: Utc::now(),
    })
}
