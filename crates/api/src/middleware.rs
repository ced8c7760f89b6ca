use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{HeaderMap, Request},
    middleware::Next,
    response::Response,
};

use warbler_auth::{Clock, TokenValidator};
use warbler_core::UserId;
use warbler_infra::PrincipalStore;

use crate::context::RequestIdentity;

#[derive(Clone)]
pub struct AuthState {
    pub validator: Arc<TokenValidator>,
    pub principals: Arc<dyn PrincipalStore>,
    pub clock: Arc<dyn Clock>,
    pub lookup_timeout: Duration,
}

/// Bind the request identity.
///
/// Never rejects: every failure leaves the identity slot empty and the
/// request continues. Protected handlers decide what an empty slot means.
pub async fn bind_identity(
    State(state): State<AuthState>,
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Response {
    // Set at most once.
    let already_bound = req
        .extensions()
        .get::<RequestIdentity>()
        .is_some_and(RequestIdentity::is_authenticated);

    if !already_bound {
        let identity = resolve_identity(&state, req.headers()).await;
        req.extensions_mut().insert(identity);
    }

    next.run(req).await
}

async fn resolve_identity(state: &AuthState, headers: &HeaderMap) -> RequestIdentity {
    let Some(token) = extract_bearer(headers) else {
        return RequestIdentity::anonymous();
    };

    let subject = match state.validator.validate(token, state.clock.now()) {
        Ok(subject) => subject,
        Err(err) => {
            tracing::warn!(kind = err.kind(), "rejected bearer token");
            return RequestIdentity::anonymous();
        }
    };

    let principal_id = match subject.parse::<UserId>() {
        Ok(id) => id,
        Err(_) => {
            tracing::warn!(kind = "invalid_subject", "rejected bearer token");
            return RequestIdentity::anonymous();
        }
    };

    match tokio::time::timeout(state.lookup_timeout, state.principals.load_by_id(principal_id)).await {
        Ok(Ok(Some(principal))) => {
            tracing::debug!(principal_id = %principal.id, "bound request identity");
            RequestIdentity::authenticated(principal)
        }
        Ok(Ok(None)) => {
            tracing::warn!(%principal_id, kind = "principal_not_found", "token subject did not resolve");
            RequestIdentity::anonymous()
        }
        Ok(Err(err)) => {
            tracing::warn!(%principal_id, kind = "store_error", error = %err, "principal lookup failed");
            RequestIdentity::anonymous()
        }
        Err(_) => {
            tracing::warn!(
                %principal_id,
                kind = "lookup_timeout",
                timeout_ms = state.lookup_timeout.as_millis() as u64,
                "principal lookup abandoned"
            );
            RequestIdentity::anonymous()
        }
    }
}

/// Extract the token from `Authorization: Bearer <token>`.
///
/// The scheme is matched case-sensitively with exactly one space.
fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(axum::http::header::AUTHORIZATION)?;
    let header = header.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?;
    if token.is_empty() {
        return None;
    }
    Some(token)
}
