use crate::presentation::dto::{HomeResponse, UserResponse};
use crate::presentation::utils::AuthenticatedUser;
use actix_web::HttpResponse;

pub async fn index(user: Option<AuthenticatedUser>) -> HttpResponse {
    let user = user.map(|user| UserResponse {
        id: user.id,
        email: user.email,
        created_at: user.created_at,
    });
    HttpResponse::Ok().json(HomeResponse {
        message: "Welcome to Postboard",
        user,
    })
}
