//! Database schema migrations for SQLite.
//!
//! We use a simple versioned migration system. Each migration is a SQL string
//! that transforms the schema from version N to N+1.

use rusqlite::Connection;

use crate::error::{Result, StoreError};

/// Current schema version.
pub const CURRENT_VERSION: u32 = 1;

/// Initialize or migrate the database schema.
///
/// This function is idempotent - it can be called multiple times safely.
pub fn migrate(conn: &mut Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at INTEGER NOT NULL
        )",
        [],
    )?;

    let current: u32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;

    if current < CURRENT_VERSION {
        let tx = conn.transaction()?;

        for version in (current + 1)..=CURRENT_VERSION {
            apply_migration(&tx, version)?;

            tx.execute(
                "INSERT INTO schema_migrations (version, applied_at) VALUES (?1, ?2)",
                rusqlite::params![version, crate::now_millis()],
            )?;
        }

        tx.commit()?;
    }

    Ok(())
}

/// Apply a specific migration version.
fn apply_migration(conn: &Connection, version: u32) -> Result<()> {
    match version {
        1 => apply_v1(conn),
        _ => Err(StoreError::Migration(format!(
            "unknown migration version: {}",
            version
        ))),
    }
}

/// Migration v1: Initial schema.
fn apply_v1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- One row per DHT target: the latest accepted mutable record
        CREATE TABLE records (
            target BLOB PRIMARY KEY,          -- 20 bytes, SHA-1 of public_key
            public_key BLOB NOT NULL,         -- 32 bytes, Ed25519 public key
            seq INTEGER NOT NULL,             -- record sequence (u64 stored bitwise)
            value BLOB NOT NULL,              -- CBOR-encoded Value
            signature BLOB NOT NULL,          -- 64 bytes, Ed25519 signature
            stored_at INTEGER NOT NULL,       -- local time the current seq was accepted
            refreshed_at INTEGER NOT NULL     -- local time of the latest put (republish)
        );

        CREATE INDEX idx_records_refreshed ON records(refreshed_at);
        "#,
    )?;

    Ok(())
}
