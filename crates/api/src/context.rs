use warbler_auth::Principal;

/// Identity slot for a request.
///
/// Inserted by the identity binder on every request, empty when no valid
/// bearer token resolved to a principal. Handlers receive it explicitly and
/// pass the principal into service calls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestIdentity {
    principal: Option<Principal>,
}

impl RequestIdentity {
    pub fn anonymous() -> Self {
        Self { principal: None }
    }

    pub fn authenticated(principal: Principal) -> Self {
        Self {
            principal: Some(principal),
        }
    }

    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.principal.is_some()
    }
}
