use crate::application::post_service::PostService;
use crate::data::post_repository::PostRepository;
use crate::domain::error::DomainError;
use crate::domain::post::PostFilter;
use crate::presentation::dto::{ListPostsQuery, ListPostsResponse, NEW_POST_FORM, PostPayload};
use crate::presentation::utils::{AuthenticatedUser, request_id};
use actix_web::http::header::LOCATION;
use actix_web::{HttpRequest, HttpResponse, web};
use tracing::info;
use uuid::Uuid;

pub async fn list_posts<P: PostRepository + 'static>(
    req: HttpRequest,
    user: AuthenticatedUser,
    posts: web::Data<PostService<P>>,
    query: web::Query<ListPostsQuery>,
) -> Result<HttpResponse, DomainError> {
    let filter = PostFilter::from(&*query);
    let found = posts.get_posts(filter).await?;

    info!(
        request_id = %request_id(&req),
        user_id = %user.id,
        count = found.len(),
        "posts retrieved"
    );

    Ok(HttpResponse::Ok().json(ListPostsResponse {
        posts: found,
        limit: filter.effective_limit(),
        offset: filter.effective_offset(),
    }))
}

pub async fn new_post(_user: AuthenticatedUser) -> HttpResponse {
    HttpResponse::Ok().json(NEW_POST_FORM)
}

pub async fn create_post<P: PostRepository + 'static>(
    req: HttpRequest,
    user: AuthenticatedUser,
    posts: web::Data<PostService<P>>,
    payload: web::Json<PostPayload>,
) -> Result<HttpResponse, DomainError> {
    let post = posts
        .create_post(user.id, payload.into_inner().into())
        .await?;

    info!(
        request_id = %request_id(&req),
        user_id = %user.id,
        post_id = %post.id,
        "post created"
    );

    Ok(HttpResponse::Created()
        .insert_header((LOCATION, format!("/posts/{}", post.id)))
        .json(post))
}

pub async fn show_post<P: PostRepository + 'static>(
    _user: AuthenticatedUser,
    posts: web::Data<PostService<P>>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let post = posts.get_post(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// The edit form is pre-filled with the current post.
pub async fn edit_post<P: PostRepository + 'static>(
    user: AuthenticatedUser,
    posts: web::Data<PostService<P>>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    show_post(user, posts, path).await
}

pub async fn update_post<P: PostRepository + 'static>(
    req: HttpRequest,
    user: AuthenticatedUser,
    posts: web::Data<PostService<P>>,
    path: web::Path<Uuid>,
    payload: web::Json<PostPayload>,
) -> Result<HttpResponse, DomainError> {
    let post_id = path.into_inner();
    let post = posts
        .update_post(user.id, post_id, payload.into_inner().into())
        .await?;

    info!(
        request_id = %request_id(&req),
        user_id = %user.id,
        post_id = %post_id,
        "post updated"
    );

    Ok(HttpResponse::Ok().json(post))
}

pub async fn delete_post<P: PostRepository + 'static>(
    req: HttpRequest,
    user: AuthenticatedUser,
    posts: web::Data<PostService<P>>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let post_id = path.into_inner();
    posts.delete_post(user.id, post_id).await?;

    info!(
        request_id = %request_id(&req),
        user_id = %user.id,
        post_id = %post_id,
        "post deleted"
    );

    Ok(HttpResponse::NoContent().finish())
}
