//! Authentication Models
//! Mission: Define roles, token claims and the per-request identity

use crate::store::UserRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of user roles. Each role owns a disjoint record partition.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Support,
    CareGiver,
    CareRecipient,
}

impl Role {
    pub const ALL: [Role; 4] = [
        Role::Admin,
        Role::Support,
        Role::CareGiver,
        Role::CareRecipient,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Support => "support",
            Role::CareGiver => "care_giver",
            Role::CareRecipient => "care_recipient",
        }
    }

    /// Parse a role tag. Tags are case-sensitive; anything outside the set is `None`.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "admin" => Some(Role::Admin),
            "support" => Some(Role::Support),
            "care_giver" => Some(Role::CareGiver),
            "care_recipient" => Some(Role::CareRecipient),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JWT Claims payload
///
/// `role` stays a raw string so a token minted with an unknown tag still
/// decodes and can be rejected by the resolver.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub sub: String, // subject id within the role partition
    pub role: String,
    pub iat: usize,
    pub exp: usize,
}

impl Claims {
    pub fn subject_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

/// Identity attached to the request by the auth gate.
#[derive(Debug, Clone)]
pub struct Identity {
    pub role: Role,
    pub record: UserRecord,
}

impl Identity {
    pub fn id(&self) -> i64 {
        self.record.id()
    }

    /// `role#id`, e.g. `support#7`.
    pub fn label(&self) -> String {
        format!("{}#{}", self.role, self.id())
    }
}

/// Login request body
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub role: String,
    pub email: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_in: usize, // seconds until expiration
    pub role: Role,
    pub user: UserRecord,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serialization() {
        let json = serde_json::to_string(&Role::CareGiver).unwrap();
        assert_eq!(json, r#""care_giver""#);

        let role: Role = serde_json::from_str(r#""care_recipient""#).unwrap();
        assert_eq!(role, Role::CareRecipient);
    }

    #[test]
    fn test_role_parse_is_closed() {
        for role in Role::ALL {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("ADMIN"), None);
        assert_eq!(Role::parse("superuser"), None);
        assert_eq!(Role::parse(""), None);
    }

    #[test]
    fn test_claims_subject_id() {
        let claims = Claims {
            sub: "42".to_string(),
            role: "admin".to_string(),
            iat: 0,
            exp: 0,
        };
        assert_eq!(claims.subject_id(), Some(42));

        let bad = Claims {
            sub: "abc".to_string(),
            ..claims
        };
        assert_eq!(bad.subject_id(), None);
    }
}
