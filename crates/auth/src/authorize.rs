use serde::Serialize;
use thiserror::Error;

use warbler_core::UserId;

/// Outcome of comparing the acting principal with a resource owner.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct OwnershipDecision {
    pub allowed: bool,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OwnershipError {
    #[error("principal {principal_id} is not the owner ({owner_id})")]
    NotOwner {
        principal_id: UserId,
        owner_id: UserId,
    },
}

/// Decide whether `principal_id` may mutate a resource owned by `owner_id`.
pub fn decide(principal_id: UserId, owner_id: UserId) -> OwnershipDecision {
    OwnershipDecision {
        allowed: principal_id == owner_id,
    }
}

/// Authorize a mutation on a resource owned by `owner_id`.
///
/// - No IO
/// - No panics
/// - Call after the target resource has been loaded and its owner located
pub fn authorize(principal_id: UserId, owner_id: UserId) -> Result<(), OwnershipError> {
    if decide(principal_id, owner_id).allowed {
        Ok(())
    } else {
        Err(OwnershipError::NotOwner {
            principal_id,
            owner_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_is_allowed() {
        let a = UserId::new();
        assert_eq!(authorize(a, a), Ok(()));
        assert!(decide(a, a).allowed);
    }

    #[test]
    fn non_owner_is_denied_with_both_ids() {
        let a = UserId::new();
        let b = UserId::new();
        assert!(!decide(b, a).allowed);
        assert_eq!(
            authorize(b, a),
            Err(OwnershipError::NotOwner {
                principal_id: b,
                owner_id: a,
            })
        );
    }
}
