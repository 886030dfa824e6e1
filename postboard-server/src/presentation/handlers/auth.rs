use crate::application::auth_service::AuthService;
use crate::data::session_repository::SessionRepository;
use crate::data::user_repository::UserRepository;
use crate::domain::error::DomainError;
use crate::presentation::dto::{
    AuthResponse, RegisterRequest, SIGN_IN_FORM, SIGN_UP_FORM, SignInRequest, UserPayload,
};
use crate::presentation::utils::{
    CookiePolicy, removal_cookie, request_id, session_cookie, session_token,
};
use actix_web::{HttpRequest, HttpResponse, web};
use tracing::info;

pub async fn register<U, S>(
    req: HttpRequest,
    service: web::Data<AuthService<U, S>>,
    policy: web::Data<CookiePolicy>,
    payload: web::Json<UserPayload<RegisterRequest>>,
) -> Result<HttpResponse, DomainError>
where
    U: UserRepository + 'static,
    S: SessionRepository + 'static,
{
    let form = payload.into_inner().into_inner();
    let signed = service
        .register(
            &form.email,
            &form.password,
            form.password_confirmation.as_deref(),
        )
        .await?;

    info!(
        request_id = %request_id(&req),
        user_id = %signed.user.id,
        "user signed up"
    );

    let cookie = session_cookie(signed.token.clone(), signed.expires_in, **policy);
    Ok(HttpResponse::Created()
        .cookie(cookie)
        .json(AuthResponse::from(signed)))
}

pub async fn sign_in<U, S>(
    req: HttpRequest,
    service: web::Data<AuthService<U, S>>,
    policy: web::Data<CookiePolicy>,
    payload: web::Json<UserPayload<SignInRequest>>,
) -> Result<HttpResponse, DomainError>
where
    U: UserRepository + 'static,
    S: SessionRepository + 'static,
{
    let form = payload.into_inner().into_inner();
    let signed = service.sign_in(&form.email, &form.password).await?;

    info!(
        request_id = %request_id(&req),
        user_id = %signed.user.id,
        "user signed in"
    );

    let cookie = session_cookie(signed.token.clone(), signed.expires_in, **policy);
    Ok(HttpResponse::Ok()
        .cookie(cookie)
        .json(AuthResponse::from(signed)))
}

pub async fn sign_out<U, S>(
    req: HttpRequest,
    service: web::Data<AuthService<U, S>>,
    policy: web::Data<CookiePolicy>,
) -> Result<HttpResponse, DomainError>
where
    U: UserRepository + 'static,
    S: SessionRepository + 'static,
{
    if let Some(token) = session_token(&req) {
        service.sign_out(&token).await?;
    }

    Ok(HttpResponse::NoContent()
        .cookie(removal_cookie(**policy))
        .finish())
}

pub async fn sign_up_form() -> HttpResponse {
    HttpResponse::Ok().json(SIGN_UP_FORM)
}

pub async fn sign_in_form() -> HttpResponse {
    HttpResponse::Ok().json(SIGN_IN_FORM)
}
