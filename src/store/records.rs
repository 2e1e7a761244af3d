//! Role-partitioned user records.

use crate::auth::Role;
use serde::{Deserialize, Serialize};

/// Fields every partition shares.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub email: String,
    pub full_name: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // bcrypt hash - never serialize
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Admin {
    #[serde(flatten)]
    pub account: Account,
    pub is_super_admin: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Support {
    #[serde(flatten)]
    pub account: Account,
    pub department: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CareGiver {
    #[serde(flatten)]
    pub account: Account,
    pub headline: Option<String>,
    pub bio: Option<String>,
    pub city: Option<String>,
    pub hourly_rate_cents: Option<i64>,
    pub subscription_status: SubscriptionStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CareRecipient {
    #[serde(flatten)]
    pub account: Account,
    pub city: Option<String>,
    pub care_needs: Option<String>,
}

/// Billing state of a care giver's marketplace subscription.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    #[default]
    None,
    Trialing,
    Active,
    PastDue,
    Canceled,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::None => "none",
            SubscriptionStatus::Trialing => "trialing",
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::PastDue => "past_due",
            SubscriptionStatus::Canceled => "canceled",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "trialing" => SubscriptionStatus::Trialing,
            "active" => SubscriptionStatus::Active,
            "past_due" => SubscriptionStatus::PastDue,
            "canceled" => SubscriptionStatus::Canceled,
            _ => SubscriptionStatus::None,
        }
    }
}

/// A user record from exactly one partition.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum UserRecord {
    Admin(Admin),
    Support(Support),
    CareGiver(CareGiver),
    CareRecipient(CareRecipient),
}

impl UserRecord {
    pub fn role(&self) -> Role {
        match self {
            UserRecord::Admin(_) => Role::Admin,
            UserRecord::Support(_) => Role::Support,
            UserRecord::CareGiver(_) => Role::CareGiver,
            UserRecord::CareRecipient(_) => Role::CareRecipient,
        }
    }

    pub fn account(&self) -> &Account {
        match self {
            UserRecord::Admin(r) => &r.account,
            UserRecord::Support(r) => &r.account,
            UserRecord::CareGiver(r) => &r.account,
            UserRecord::CareRecipient(r) => &r.account,
        }
    }

    pub fn id(&self) -> i64 {
        self.account().id
    }

    pub fn is_active(&self) -> bool {
        self.account().is_active
    }
}

/// Input for creating an account in any partition.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
    pub is_active: bool,
}

/// Partial update applied by a care giver to their own profile.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CareGiverProfileUpdate {
    pub full_name: Option<String>,
    pub headline: Option<String>,
    pub bio: Option<String>,
    pub city: Option<String>,
    pub hourly_rate_cents: Option<i64>,
}

/// 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    pub const DEFAULT_LIMIT: u32 = 20;
    pub const MAX_LIMIT: u32 = 100;

    /// Clamp raw query values into range.
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit
                .unwrap_or(Self::DEFAULT_LIMIT)
                .clamp(1, Self::MAX_LIMIT),
        }
    }

    pub fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.limit as u64
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total: u64) -> Self {
        let limit = request.limit as u64;
        Self {
            items,
            page: request.page,
            limit: request.limit,
            total,
            total_pages: total.div_ceil(limit),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct PartitionCount {
    pub total: u64,
    pub active: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn account(id: i64) -> Account {
        Account {
            id,
            email: "ada@example.com".to_string(),
            full_name: "Ada".to_string(),
            password_hash: "hash".to_string(),
            is_active: true,
            created_at: "2025-01-01T00:00:00Z".to_string(),
            updated_at: "2025-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_record_serializes_tagged_without_password() {
        let record = UserRecord::Support(Support {
            account: account(7),
            department: Some("billing".to_string()),
        });

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["role"], json!("support"));
        assert_eq!(value["id"], json!(7));
        assert_eq!(value["department"], json!("billing"));
        assert!(value.get("password_hash").is_none());
    }

    #[test]
    fn test_record_accessors() {
        let mut acc = account(3);
        acc.is_active = false;
        let record = UserRecord::CareRecipient(CareRecipient {
            account: acc,
            city: None,
            care_needs: None,
        });

        assert_eq!(record.role(), Role::CareRecipient);
        assert_eq!(record.id(), 3);
        assert!(!record.is_active());
    }

    #[test]
    fn test_page_request_clamps() {
        assert_eq!(PageRequest::new(None, None), PageRequest { page: 1, limit: 20 });
        assert_eq!(PageRequest::new(Some(0), Some(0)), PageRequest { page: 1, limit: 1 });
        assert_eq!(PageRequest::new(Some(3), Some(500)).limit, 100);
        assert_eq!(PageRequest::new(Some(3), Some(10)).offset(), 20);
    }

    #[test]
    fn test_page_total_pages() {
        let page: Page<i64> = Page::new(vec![], PageRequest::new(Some(1), Some(10)), 21);
        assert_eq!(page.total_pages, 3);

        let empty: Page<i64> = Page::new(vec![], PageRequest::default(), 0);
        assert_eq!(empty.total_pages, 0);
    }

    #[test]
    fn test_subscription_status_parse() {
        assert_eq!(SubscriptionStatus::parse("past_due"), SubscriptionStatus::PastDue);
        assert_eq!(SubscriptionStatus::parse("garbage"), SubscriptionStatus::None);
        assert_eq!(SubscriptionStatus::Active.as_str(), "active");
    }
}
