use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use warbler_core::UserId;

use crate::Role;

/// Identity of an authenticated actor.
///
/// An immutable snapshot produced by the principal store; loaded per request
/// and never cached across requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub roles: BTreeSet<Role>,
}

impl Principal {
    /// Create a principal carrying the default role set.
    pub fn new(id: UserId, username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            email: email.into(),
            roles: BTreeSet::from([Role::User]),
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}
