use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, OriginalUri},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use warbler_infra::NewPrincipal;

use crate::app::errors::ApiError;
use crate::app::{AppServices, dto, errors};
use crate::authz::require_principal;
use crate::context::RequestIdentity;

pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    OriginalUri(uri): OriginalUri,
    Json(body): Json<dto::RegisterRequest>,
) -> Response {
    errors::respond(&uri, register_principal(&services, body).await)
}

async fn register_principal(
    services: &AppServices,
    body: dto::RegisterRequest,
) -> Result<impl IntoResponse, ApiError> {
    let new = NewPrincipal::new(body.username, body.email, body.password)?;
    let principal = services.principals.register(new).await?;
    Ok((StatusCode::CREATED, Json(dto::PrincipalResponse::from(&principal))))
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    OriginalUri(uri): OriginalUri,
    Json(body): Json<dto::LoginRequest>,
) -> Response {
    errors::respond(&uri, issue_for_credentials(&services, body).await)
}

async fn issue_for_credentials(
    services: &AppServices,
    body: dto::LoginRequest,
) -> Result<impl IntoResponse, ApiError> {
    let name_or_email = body.username_or_email.trim();
    let Some(principal) = services
        .principals
        .authenticate(name_or_email, &body.password)
        .await?
    else {
        tracing::warn!("login rejected: invalid credentials");
        return Err(ApiError::InvalidCredentials);
    };

    let issued = services
        .issuer
        .issue(&principal, services.token_ttl, services.clock.now())?;

    tracing::info!(principal_id = %principal.id, "login succeeded");
    Ok(Json(dto::JwtResponse::new(issued, &principal)))
}

pub async fn me(
    Extension(identity): Extension<RequestIdentity>,
    OriginalUri(uri): OriginalUri,
) -> Response {
    let result = require_principal(&identity).map(|p| Json(dto::MeResponse::from(p)));
    errors::respond(&uri, result)
}
