/// Caller identity and capability checks
///
/// Every store operation runs on behalf of an authenticated caller whose
/// identity (id + role) was established by the external auth collaborator.
/// The store trusts that identity and never re-derives it.
///
/// Authorization is a single capability check, not a role hierarchy:
/// a caller may mutate a resource iff they own it or their role is ADMIN.
///
/// # Example
///
/// ```
/// use cadence_store::authz::{can_mutate, Caller};
/// use cadence_store::models::user::UserRole;
///
/// let owner = Caller::new("alice", UserRole::User);
/// let admin = Caller::new("root", UserRole::Admin);
///
/// assert!(can_mutate(&owner, "alice"));
/// assert!(!can_mutate(&owner, "bob"));
/// assert!(can_mutate(&admin, "bob"));
/// ```

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::models::user::UserRole;

/// Authenticated caller context
///
/// Built by the API's session middleware and threaded through every store
/// operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Caller {
    /// The authenticated user's id
    pub user_id: String,

    /// The authenticated user's role
    pub role: UserRole,
}

impl Caller {
    /// Creates a caller context
    pub fn new(user_id: impl Into<String>, role: UserRole) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }

    /// Checks if the caller bypasses ownership checks
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// The capability check: owner or ADMIN
pub fn can_mutate(caller: &Caller, owner_id: &str) -> bool {
    caller.user_id == owner_id || caller.is_admin()
}

/// Fails with `Authorization` unless the caller owns the resource or is ADMIN
///
/// Used for mutations and for read scoping alike: list operations are
/// limited to the requesting user's own resources unless the role is
/// ADMIN.
pub fn require_owner_or_admin(caller: &Caller, owner_id: &str, what: &str) -> Result<(), StoreError> {
    if can_mutate(caller, owner_id) {
        Ok(())
    } else {
        Err(StoreError::authorization(format!(
            "{} belongs to another user",
            what
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_can_mutate() {
        let caller = Caller::new("alice", UserRole::User);
        assert!(can_mutate(&caller, "alice"));
        assert!(require_owner_or_admin(&caller, "alice", "task").is_ok());
    }

    #[test]
    fn test_non_owner_cannot_mutate() {
        let caller = Caller::new("alice", UserRole::User);
        assert!(!can_mutate(&caller, "bob"));

        let err = require_owner_or_admin(&caller, "bob", "task").unwrap_err();
        assert!(matches!(err, StoreError::Authorization(_)));
    }

    #[test]
    fn test_admin_bypasses_ownership() {
        let caller = Caller::new("root", UserRole::Admin);
        assert!(can_mutate(&caller, "bob"));
        assert!(require_owner_or_admin(&caller, "bob", "task").is_ok());
    }

    #[test]
    fn test_restricted_has_no_extra_capability() {
        let caller = Caller::new("carol", UserRole::Restricted);
        assert!(can_mutate(&caller, "carol"));
        assert!(!can_mutate(&caller, "bob"));
    }
}
