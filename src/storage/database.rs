//! SQLite ledger for leads and payments
//!
//! Both tables are append-only: triggers abort any UPDATE or DELETE.

use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use std::path::Path;

use crate::config::Settings;
use crate::storage::models::{LeadRecord, PaymentRecord, PaymentMethod, PaymentStatus};

/// Database wrapper for bluesdr
pub struct Database {
    conn: Connection,
}

const CURRENT_SCHEMA_VERSION: i64 = 1;

impl Database {
    /// Open or create the database
    pub fn open(settings: &Settings) -> Result<Self> {
        let db_path = settings.database_path();

        // Ensure parent directory exists
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        Self::open_path(&db_path)
    }

    /// Open database at a specific path (useful for testing)
    pub fn open_path(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;

        let db = Self { conn };
        db.initialize()?;

        Ok(db)
    }

    /// Open an in-memory database (for testing)
    #[cfg(test)]
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Initialize database schema
    fn initialize(&self) -> Result<()> {
        // Concurrent sessions append to the same file.
        self.conn.busy_timeout(std::time::Duration::from_secs(5))?;

        let current_version = self.schema_version()?;
        if current_version > CURRENT_SCHEMA_VERSION {
            anyhow::bail!(
                "Database schema version {} is newer than supported version {}",
                current_version,
                CURRENT_SCHEMA_VERSION
            );
        }

        if current_version < 1 {
            self.migrate_to_v1()?;
            self.set_schema_version(1)?;
            tracing::debug!("Database schema created at version 1");
        }

        Ok(())
    }

    /// Current schema version tracked in PRAGMA user_version.
    pub fn schema_version(&self) -> Result<i64> {
        Ok(self
            .conn
            .query_row("PRAGMA user_version;", [], |row| row.get(0))?)
    }

    fn set_schema_version(&self, version: i64) -> Result<()> {
        self.conn
            .execute(&format!("PRAGMA user_version = {}", version), [])?;
        Ok(())
    }

    fn migrate_to_v1(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS leads (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                recorded_at TEXT NOT NULL,
                name TEXT NOT NULL,
                origin TEXT NOT NULL,
                status TEXT NOT NULL,
                pain_point TEXT NOT NULL,
                estimated_value TEXT NOT NULL,
                notes TEXT NOT NULL
            );

            CREATE TRIGGER IF NOT EXISTS leads_no_update BEFORE UPDATE ON leads BEGIN
                SELECT RAISE(ABORT, 'leads are append-only');
            END;

            CREATE TRIGGER IF NOT EXISTS leads_no_delete BEFORE DELETE ON leads BEGIN
                SELECT RAISE(ABORT, 'leads are append-only');
            END;
            "#,
        )?;

        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS payments (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                recorded_at TEXT NOT NULL,
                client TEXT NOT NULL,
                service TEXT NOT NULL,
                value REAL NOT NULL,
                status TEXT NOT NULL,
                method TEXT NOT NULL,
                document_ref TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_payments_status
                ON payments(status);

            CREATE TRIGGER IF NOT EXISTS payments_no_update BEFORE UPDATE ON payments BEGIN
                SELECT RAISE(ABORT, 'payments are append-only');
            END;

            CREATE TRIGGER IF NOT EXISTS payments_no_delete BEFORE DELETE ON payments BEGIN
                SELECT RAISE(ABORT, 'payments are append-only');
            END;
            "#,
        )?;

        Ok(())
    }

    /// Append a lead row and return its id
    pub fn insert_lead(&self, lead: &LeadRecord) -> Result<i64> {
        self.conn.execute(
            r#"
            INSERT INTO leads (recorded_at, name, origin, status, pain_point, estimated_value, notes)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                lead.timestamp,
                lead.name,
                lead.origin,
                lead.status,
                lead.pain_point,
                lead.estimated_value,
                lead.notes,
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    /// Leads, most recent first
    pub fn list_leads(&self, limit: usize) -> Result<Vec<LeadRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, recorded_at, name, origin, status, pain_point, estimated_value, notes
             FROM leads
             ORDER BY id DESC
             LIMIT ?1",
        )?;

        let leads = stmt
            .query_map(params![limit as i64], Self::row_to_lead)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(leads)
    }

    /// Every lead in append order
    pub fn all_leads(&self) -> Result<Vec<LeadRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, recorded_at, name, origin, status, pain_point, estimated_value, notes
             FROM leads
             ORDER BY id ASC",
        )?;

        let leads = stmt
            .query_map([], Self::row_to_lead)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(leads)
    }

    /// Append a payment row and return its id
    pub fn insert_payment(&self, payment: &PaymentRecord) -> Result<i64> {
        self.conn.execute(
            r#"
            INSERT INTO payments (recorded_at, client, service, value, status, method, document_ref)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                payment.timestamp,
                payment.client,
                payment.service,
                payment.value,
                payment.status.as_str(),
                payment.method.as_str(),
                payment.document_ref,
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    /// Payments, most recent first
    pub fn list_payments(&self, limit: usize) -> Result<Vec<PaymentRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, recorded_at, client, service, value, status, method, document_ref
             FROM payments
             ORDER BY id DESC
             LIMIT ?1",
        )?;

        let payments = stmt
            .query_map(params![limit as i64], |row| Ok(Self::row_to_payment(row)))?
            .collect::<rusqlite::Result<Vec<_>>>()?
            .into_iter()
            .collect::<Result<Vec<_>>>()?;

        Ok(payments)
    }

    /// Every payment in append order
    pub fn all_payments(&self) -> Result<Vec<PaymentRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, recorded_at, client, service, value, status, method, document_ref
             FROM payments
             ORDER BY id ASC",
        )?;

        let payments = stmt
            .query_map([], |row| Ok(Self::row_to_payment(row)))?
            .collect::<rusqlite::Result<Vec<_>>>()?
            .into_iter()
            .collect::<Result<Vec<_>>>()?;

        Ok(payments)
    }

    fn row_to_lead(row: &rusqlite::Row) -> rusqlite::Result<LeadRecord> {
        Ok(LeadRecord {
            id: row.get(0)?,
            timestamp: row.get(1)?,
            name: row.get(2)?,
            origin: row.get(3)?,
            status: row.get(4)?,
            pain_point: row.get(5)?,
            estimated_value: row.get(6)?,
            notes: row.get(7)?,
        })
    }

    fn row_to_payment(row: &rusqlite::Row) -> Result<PaymentRecord> {
        let status: String = row.get(5)?;
        let method: String = row.get(6)?;

        Ok(PaymentRecord {
            id: row.get(0)?,
            timestamp: row.get(1)?,
            client: row.get(2)?,
            service: row.get(3)?,
            value: row.get(4)?,
            status: status
                .parse::<PaymentStatus>()
                .map_err(|e| anyhow::anyhow!(e))?,
            method: method
                .parse::<PaymentMethod>()
                .map_err(|e| anyhow::anyhow!(e))?,
            document_ref: row.get(7)?,
        })
    }

    /// Get database statistics
    pub fn get_stats(&self) -> Result<DatabaseStats> {
        let total_leads: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM leads", [], |row| row.get(0))?;

        let total_payments: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM payments", [], |row| row.get(0))?;

        Ok(DatabaseStats {
            total_leads: total_leads as usize,
            total_payments: total_payments as usize,
        })
    }
}

/// Database statistics
#[derive(Debug, Clone)]
pub struct DatabaseStats {
    pub total_leads: usize,
    pub total_payments: usize,
}
