use anyhow::{Context, Result};
use rusqlite::Connection;

/// Creates the workout tables if they do not exist yet.
///
/// Idempotent; existing tables are left untouched.
pub fn ensure_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(include_str!("schemas/schema.sql"))
        .context("failed to execute schema.sql")
}
