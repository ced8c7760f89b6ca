use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, OriginalUri, Path, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use warbler_core::{PostId, UserId};

use crate::app::errors::ApiError;
use crate::app::{AppServices, dto, errors};
use crate::authz::require_principal;
use crate::context::RequestIdentity;

pub async fn create_post(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<RequestIdentity>,
    OriginalUri(uri): OriginalUri,
    body: Result<Json<dto::PostContentRequest>, JsonRejection>,
) -> Response {
    errors::respond(&uri, create(&services, &identity, body))
}

fn create(
    services: &AppServices,
    identity: &RequestIdentity,
    body: Result<Json<dto::PostContentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let principal = require_principal(identity)?;
    let body = read_body(body)?;
    let post = services.posts.create(principal, &body.content)?;
    Ok((StatusCode::CREATED, Json(dto::PostResponse::from(post))))
}

/// Bodies are only looked at once the caller is known.
fn read_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

pub async fn get_post(
    Extension(services): Extension<Arc<AppServices>>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<String>,
) -> Response {
    errors::respond(&uri, fetch(&services, &id))
}

fn fetch(services: &AppServices, id: &str) -> Result<impl IntoResponse, ApiError> {
    let id: PostId = id.parse()?;
    let post = services.posts.get(id)?;
    Ok(Json(dto::PostResponse::from(post)))
}

pub async fn list_user_posts(
    Extension(services): Extension<Arc<AppServices>>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<String>,
) -> Response {
    errors::respond(&uri, list_by_owner(&services, &id))
}

fn list_by_owner(services: &AppServices, owner_id: &str) -> Result<impl IntoResponse, ApiError> {
    let owner_id: UserId = owner_id.parse()?;
    let posts: Vec<dto::PostResponse> = services
        .posts
        .list_by_owner(owner_id)
        .into_iter()
        .map(dto::PostResponse::from)
        .collect();
    Ok(Json(posts))
}

pub async fn update_post(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<RequestIdentity>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<String>,
    body: Result<Json<dto::PostContentRequest>, JsonRejection>,
) -> Response {
    errors::respond(&uri, update(&services, &identity, &id, body))
}

fn update(
    services: &AppServices,
    identity: &RequestIdentity,
    id: &str,
    body: Result<Json<dto::PostContentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let principal = require_principal(identity)?;
    let body = read_body(body)?;
    let id: PostId = id.parse()?;
    let post = services.posts.update(principal, id, &body.content)?;
    Ok(Json(dto::PostResponse::from(post)))
}

pub async fn delete_post(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<RequestIdentity>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<String>,
) -> Response {
    errors::respond(&uri, delete(&services, &identity, &id))
}

fn delete(
    services: &AppServices,
    identity: &RequestIdentity,
    id: &str,
) -> Result<impl IntoResponse, ApiError> {
    let principal = require_principal(identity)?;
    let id: PostId = id.parse()?;
    services.posts.delete(principal, id)?;
    Ok(StatusCode::NO_CONTENT)
}
