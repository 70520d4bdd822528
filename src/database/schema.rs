use rusqlite::{Connection, Result};

/// Initialize the schema: a flat key/value table for the session.
///
/// Keys are plain strings; readers fall back to defaults for missing keys,
/// so adding a key never needs a migration.
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS session (
            key TEXT PRIMARY KEY NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )?;

    Ok(())
}
