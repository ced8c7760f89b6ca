//! API-side authentication guard for protected handlers.

use warbler_auth::Principal;

use crate::app::errors::ApiError;
use crate::context::RequestIdentity;

/// Require a bound principal.
///
/// Call at the top of every protected handler; an empty identity slot maps
/// to the unauthenticated rejection.
pub fn require_principal(identity: &RequestIdentity) -> Result<&Principal, ApiError> {
    identity.principal().ok_or(ApiError::Unauthenticated)
}
