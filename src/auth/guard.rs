//! Role Guard
//! Mission: Enforce a per-route role allow-list after the auth gate

use crate::auth::{
    error::AuthError,
    models::{Identity, Role},
};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::warn;

/// Allow-list of roles for a group of routes.
#[derive(Debug, Clone)]
pub struct RoleGuard {
    allowed: Arc<[Role]>,
}

/// Build a guard admitting only `allowed`.
///
/// ```ignore
/// router.route_layer(middleware::from_fn_with_state(
///     require_roles(&[Role::Support, Role::Admin]),
///     role_guard,
/// ))
/// ```
pub fn require_roles(allowed: &[Role]) -> RoleGuard {
    RoleGuard {
        allowed: Arc::from(allowed),
    }
}

impl RoleGuard {
    pub fn allows(&self, role: Role) -> bool {
        self.allowed.contains(&role)
    }

    pub fn check(&self, identity: Option<&Identity>) -> Result<(), AuthError> {
        let identity = identity.ok_or(AuthError::Unauthenticated)?;
        if !self.allows(identity.role) {
            warn!(
                identity = %identity.label(),
                allowed = ?self.allowed,
                "Role not permitted"
            );
            return Err(AuthError::Forbidden);
        }
        Ok(())
    }
}

/// Middleware form of [`RoleGuard::check`]. Must run after the auth gate.
pub async fn role_guard(
    State(guard): State<RoleGuard>,
    req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    guard.check(req.extensions().get::<Identity>())?;
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Account, Support, UserRecord};

    fn support_identity(id: i64) -> Identity {
        Identity {
            role: Role::Support,
            record: UserRecord::Support(Support {
                account: Account {
                    id,
                    email: "support@example.com".to_string(),
                    full_name: "Sam".to_string(),
                    password_hash: String::new(),
                    is_active: true,
                    created_at: String::new(),
                    updated_at: String::new(),
                },
                department: None,
            }),
        }
    }

    #[test]
    fn test_missing_identity_is_unauthenticated() {
        let guard = require_roles(&[Role::Admin]);
        assert!(matches!(guard.check(None), Err(AuthError::Unauthenticated)));
    }

    #[test]
    fn test_role_outside_allow_list_is_forbidden() {
        let guard = require_roles(&[Role::Admin]);
        let identity = support_identity(7);
        assert!(matches!(
            guard.check(Some(&identity)),
            Err(AuthError::Forbidden)
        ));
    }

    #[test]
    fn test_role_in_allow_list_passes() {
        let guard = require_roles(&[Role::Support, Role::Admin]);
        let identity = support_identity(7);
        assert!(guard.check(Some(&identity)).is_ok());
        assert!(guard.allows(Role::Admin));
        assert!(!guard.allows(Role::CareGiver));
    }
}
