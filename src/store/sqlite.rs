//! User Storage
//! Mission: Persist the four role partitions in SQLite

use crate::auth::Role;
use crate::store::{
    Account, Admin, CareGiver, CareGiverProfileUpdate, CareRecipient, NewAccount, Page,
    PageRequest, PartitionCount, RecordStore, SubscriptionStatus, Support, UserRecord,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

const ACCOUNT_COLUMNS: &str =
    "id, email, full_name, password_hash, is_active, created_at, updated_at";

fn table(role: Role) -> &'static str {
    match role {
        Role::Admin => "admins",
        Role::Support => "supports",
        Role::CareGiver => "care_givers",
        Role::CareRecipient => "care_recipients",
    }
}

/// Role-specific columns, selected after `ACCOUNT_COLUMNS`.
fn profile_columns(role: Role) -> &'static str {
    match role {
        Role::Admin => "is_super_admin",
        Role::Support => "department",
        Role::CareGiver => "headline, bio, city, hourly_rate_cents, subscription_status",
        Role::CareRecipient => "city, care_needs",
    }
}

fn select_sql(role: Role) -> String {
    format!(
        "SELECT {}, {} FROM {}",
        ACCOUNT_COLUMNS,
        profile_columns(role),
        table(role)
    )
}

fn map_row(role: Role, row: &Row<'_>) -> rusqlite::Result<UserRecord> {
    let account = Account {
        id: row.get(0)?,
        email: row.get(1)?,
        full_name: row.get(2)?,
        password_hash: row.get(3)?,
        is_active: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    };

    let record = match role {
        Role::Admin => UserRecord::Admin(Admin {
            account,
            is_super_admin: row.get(7)?,
        }),
        Role::Support => UserRecord::Support(Support {
            account,
            department: row.get(7)?,
        }),
        Role::CareGiver => UserRecord::CareGiver(CareGiver {
            account,
            headline: row.get(7)?,
            bio: row.get(8)?,
            city: row.get(9)?,
            hourly_rate_cents: row.get(10)?,
            subscription_status: SubscriptionStatus::parse(&row.get::<_, String>(11)?),
        }),
        Role::CareRecipient => UserRecord::CareRecipient(CareRecipient {
            account,
            city: row.get(7)?,
            care_needs: row.get(8)?,
        }),
    };

    Ok(record)
}

/// Shared SQLite handle for every partition.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open (or create) the database file and initialize the schema
    pub fn open(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path)
            .with_context(|| format!("open database at {}", db_path))?;
        conn.pragma_update(None, "journal_mode", "WAL").ok();
        conn.pragma_update(None, "synchronous", "NORMAL").ok();
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("open in-memory database")?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS admins (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                email TEXT UNIQUE NOT NULL COLLATE NOCASE,
                full_name TEXT NOT NULL,
                password_hash TEXT NOT NULL,
                is_active INTEGER NOT NULL DEFAULT 1,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                is_super_admin INTEGER NOT NULL DEFAULT 0
            );
            CREATE TABLE IF NOT EXISTS supports (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                email TEXT UNIQUE NOT NULL COLLATE NOCASE,
                full_name TEXT NOT NULL,
                password_hash TEXT NOT NULL,
                is_active INTEGER NOT NULL DEFAULT 1,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                department TEXT
            );
            CREATE TABLE IF NOT EXISTS care_givers (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                email TEXT UNIQUE NOT NULL COLLATE NOCASE,
                full_name TEXT NOT NULL,
                password_hash TEXT NOT NULL,
                is_active INTEGER NOT NULL DEFAULT 1,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                headline TEXT,
                bio TEXT,
                city TEXT,
                hourly_rate_cents INTEGER,
                subscription_status TEXT NOT NULL DEFAULT 'none'
            );
            CREATE TABLE IF NOT EXISTS care_recipients (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                email TEXT UNIQUE NOT NULL COLLATE NOCASE,
                full_name TEXT NOT NULL,
                password_hash TEXT NOT NULL,
                is_active INTEGER NOT NULL DEFAULT 1,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                city TEXT,
                care_needs TEXT
            );",
        )
        .context("Failed to initialize schema")?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Store handle for one partition.
    pub fn partition(&self, role: Role) -> PartitionStore {
        PartitionStore {
            db: self.clone(),
            role,
        }
    }

    /// Insert an account into `role`'s partition. Profile columns take their defaults.
    pub async fn insert(&self, role: Role, account: NewAccount) -> Result<UserRecord> {
        let conn = self.conn.lock().await;
        let now = Utc::now().to_rfc3339();

        conn.execute(
            &format!(
                "INSERT INTO {} (email, full_name, password_hash, is_active, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
                table(role)
            ),
            params![
                account.email.trim(),
                account.full_name,
                account.password_hash,
                account.is_active,
                now,
            ],
        )
        .with_context(|| format!("Failed to insert {} {}", role, account.email))?;

        let id = conn.last_insert_rowid();
        let record = conn
            .query_row(
                &format!("{} WHERE id = ?1", select_sql(role)),
                params![id],
                |row| map_row(role, row),
            )
            .context("Failed to read back inserted record")?;

        info!("✅ Created {}#{} ({})", role, id, record.account().email);
        Ok(record)
    }

    /// Seed a super admin when the admin partition is empty. Returns whether one was created.
    ///
    /// The emptiness check and the insert share one transaction.
    pub async fn seed_default_admin(&self, email: &str, password_hash: String) -> Result<bool> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction().context("Failed to begin seed transaction")?;

        let existing: i64 = tx.query_row("SELECT COUNT(*) FROM admins", [], |row| row.get(0))?;
        if existing > 0 {
            return Ok(false);
        }

        let now = Utc::now().to_rfc3339();
        tx.execute(
            "INSERT INTO admins
                (email, full_name, password_hash, is_active, created_at, updated_at, is_super_admin)
             VALUES (?1, 'Administrator', ?2, 1, ?3, ?3, 1)",
            params![email.trim(), password_hash, now],
        )
        .context("Failed to create default admin")?;
        tx.commit().context("Failed to commit default admin")?;

        info!("🔐 Default admin created ({})", email);
        warn!("⚠️  ROTATE THE SEEDED ADMIN PASSWORD IN PRODUCTION!");
        Ok(true)
    }

    /// Apply a care giver's own profile edit. Returns `None` when the id is unknown.
    pub async fn update_care_giver_profile(
        &self,
        id: i64,
        update: &CareGiverProfileUpdate,
    ) -> Result<Option<UserRecord>> {
        let conn = self.conn.lock().await;
        let now = Utc::now().to_rfc3339();

        let rows = conn
            .execute(
                "UPDATE care_givers SET
                    full_name = COALESCE(?2, full_name),
                    headline = COALESCE(?3, headline),
                    bio = COALESCE(?4, bio),
                    city = COALESCE(?5, city),
                    hourly_rate_cents = COALESCE(?6, hourly_rate_cents),
                    updated_at = ?7
                 WHERE id = ?1",
                params![
                    id,
                    update.full_name,
                    update.headline,
                    update.bio,
                    update.city,
                    update.hourly_rate_cents,
                    now,
                ],
            )
            .context("Failed to update care giver profile")?;

        if rows == 0 {
            return Ok(None);
        }

        let record = conn.query_row(
            &format!("{} WHERE id = ?1", select_sql(Role::CareGiver)),
            params![id],
            |row| map_row(Role::CareGiver, row),
        )?;
        Ok(Some(record))
    }

    /// Record a care giver's billing state. Returns `None` when the id is unknown.
    pub async fn set_subscription_status(
        &self,
        id: i64,
        status: SubscriptionStatus,
    ) -> Result<Option<UserRecord>> {
        let conn = self.conn.lock().await;

        let rows = conn
            .execute(
                "UPDATE care_givers SET subscription_status = ?2, updated_at = ?3 WHERE id = ?1",
                params![id, status.as_str(), Utc::now().to_rfc3339()],
            )
            .context("Failed to update subscription status")?;
        if rows == 0 {
            return Ok(None);
        }

        info!("care_giver#{} subscription_status set to {}", id, status.as_str());
        let record = conn.query_row(
            &format!("{} WHERE id = ?1", select_sql(Role::CareGiver)),
            params![id],
            |row| map_row(Role::CareGiver, row),
        )?;
        Ok(Some(record))
    }
}

/// `RecordStore` over one table of the shared database.
#[derive(Clone)]
pub struct PartitionStore {
    db: Database,
    role: Role,
}

#[async_trait]
impl RecordStore for PartitionStore {
    fn role(&self) -> Role {
        self.role
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<UserRecord>> {
        let conn = self.db.conn.lock().await;
        let role = self.role;

        conn.query_row(
            &format!("{} WHERE id = ?1", select_sql(role)),
            params![id],
            |row| map_row(role, row),
        )
        .optional()
        .with_context(|| format!("Failed to load {}#{}", role, id))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        let conn = self.db.conn.lock().await;
        let role = self.role;

        conn.query_row(
            &format!("{} WHERE email = ?1", select_sql(role)),
            params![email.trim()],
            |row| map_row(role, row),
        )
        .optional()
        .with_context(|| format!("Failed to look up {} by email", role))
    }

    async fn list(&self, page: PageRequest) -> Result<Page<UserRecord>> {
        let conn = self.db.conn.lock().await;
        let role = self.role;

        let total: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", table(role)),
            [],
            |row| row.get(0),
        )?;

        let mut stmt = conn.prepare_cached(&format!(
            "{} ORDER BY id ASC LIMIT ?1 OFFSET ?2",
            select_sql(role)
        ))?;
        let items = stmt
            .query_map(params![page.limit as i64, page.offset() as i64], |row| {
                map_row(role, row)
            })?
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("Failed to list {}", table(role)))?;

        Ok(Page::new(items, page, total.max(0) as u64))
    }

    async fn set_active(&self, id: i64, active: bool) -> Result<bool> {
        let conn = self.db.conn.lock().await;

        let rows = conn.execute(
            &format!(
                "UPDATE {} SET is_active = ?2, updated_at = ?3 WHERE id = ?1",
                table(self.role)
            ),
            params![id, active, Utc::now().to_rfc3339()],
        )?;

        if rows > 0 {
            info!("{}#{} is_active set to {}", self.role, id, active);
        }
        Ok(rows > 0)
    }

    async fn count(&self) -> Result<PartitionCount> {
        let conn = self.db.conn.lock().await;

        let (total, active): (i64, i64) = conn.query_row(
            &format!(
                "SELECT COUNT(*), COALESCE(SUM(is_active), 0) FROM {}",
                table(self.role)
            ),
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        Ok(PartitionCount {
            total: total.max(0) as u64,
            active: active.max(0) as u64,
        })
    }
}
