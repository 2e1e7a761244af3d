//! User record storage, one partition per role.

pub mod records;
pub mod sqlite;

pub use records::{
    Account, Admin, CareGiver, CareGiverProfileUpdate, CareRecipient, NewAccount, Page,
    PageRequest, PartitionCount, SubscriptionStatus, Support, UserRecord,
};
pub use sqlite::{Database, PartitionStore};

use crate::auth::Role;
use anyhow::Result;
use async_trait::async_trait;

/// Lookup and maintenance operations over a single role partition.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// The partition this store serves.
    fn role(&self) -> Role;

    async fn find_by_id(&self, id: i64) -> Result<Option<UserRecord>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>>;

    /// Records ordered by id ascending.
    async fn list(&self, page: PageRequest) -> Result<Page<UserRecord>>;

    /// Flip the activation flag. Returns `false` when no row matched.
    async fn set_active(&self, id: i64, active: bool) -> Result<bool>;

    async fn count(&self) -> Result<PartitionCount>;
}
