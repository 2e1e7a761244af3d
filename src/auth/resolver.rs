//! Role Resolver
//! Mission: Map a role tag to the record partition that owns it

use crate::auth::{error::AuthError, models::Role};
use crate::store::{Database, RecordStore};
use std::sync::Arc;

/// One store per role. A subject id is only looked up in its own partition.
#[derive(Clone)]
pub struct RoleResolver {
    admins: Arc<dyn RecordStore>,
    supports: Arc<dyn RecordStore>,
    care_givers: Arc<dyn RecordStore>,
    care_recipients: Arc<dyn RecordStore>,
}

impl RoleResolver {
    pub fn new(
        admins: Arc<dyn RecordStore>,
        supports: Arc<dyn RecordStore>,
        care_givers: Arc<dyn RecordStore>,
        care_recipients: Arc<dyn RecordStore>,
    ) -> Self {
        Self {
            admins,
            supports,
            care_givers,
            care_recipients,
        }
    }

    /// Wire every partition to its table in `db`.
    pub fn from_database(db: &Database) -> Self {
        Self::new(
            Arc::new(db.partition(Role::Admin)),
            Arc::new(db.partition(Role::Support)),
            Arc::new(db.partition(Role::CareGiver)),
            Arc::new(db.partition(Role::CareRecipient)),
        )
    }

    /// Resolve a raw role tag (as carried in a token) to its partition.
    pub fn resolve(&self, tag: &str) -> Result<(Role, &dyn RecordStore), AuthError> {
        let role = Role::parse(tag).ok_or(AuthError::UnknownRole)?;
        Ok((role, self.store(role)))
    }

    pub fn store(&self, role: Role) -> &dyn RecordStore {
        match role {
            Role::Admin => self.admins.as_ref(),
            Role::Support => self.supports.as_ref(),
            Role::CareGiver => self.care_givers.as_ref(),
            Role::CareRecipient => self.care_recipients.as_ref(),
        }
    }
}
