//! Database migrations
//!
//! Schema for units and conversion factors registered at runtime.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
        tracing::info!("Applied schema migration v1");
    }

    Ok(())
}

/// Migration v1: registered units and factors
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- CUSTOM UNITS
        -- Named units added on top of the built-in table
        -- ============================================
        CREATE TABLE custom_units (
            symbol TEXT PRIMARY KEY,             -- case-sensitive, e.g. "cal"
            name TEXT NOT NULL,
            category TEXT NOT NULL DEFAULT 'other'
                CHECK(category IN ('mass', 'volume', 'length', 'ratio', 'other')),
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- ============================================
        -- CONVERSION FACTORS
        -- One directed edge: factor = target units per 1 base unit.
        -- Stored as TEXT so decimals survive exactly.
        -- ============================================
        CREATE TABLE conversion_factors (
            base_unit TEXT NOT NULL,
            target_unit TEXT NOT NULL,
            factor TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),

            PRIMARY KEY (base_unit, target_unit)
        );

        CREATE INDEX idx_conversion_factors_target ON conversion_factors(target_unit);
        "#,
    )?;

    Ok(())
}

/// Get the current schema version
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);
    Ok(version)
}

/// Check if the database needs migration
pub fn needs_migration(conn: &Connection) -> DbResult<bool> {
    let current = get_schema_version(conn)?;
    Ok(current < SCHEMA_VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(needs_migration(&conn).unwrap());

        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
        assert!(!needs_migration(&conn).unwrap());
    }

    #[test]
    fn test_category_constraint() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        let bad = conn.execute(
            "INSERT INTO custom_units (symbol, name, category) VALUES ('x', 'x', 'speed')",
            [],
        );
        assert!(bad.is_err());
    }
}
