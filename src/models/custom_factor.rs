//! Custom conversion factor model
//!
//! Directed factor edges registered at runtime. The factor is kept as the
//! exact decimal text the caller supplied.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};

/// A persisted conversion factor: `factor` target units per 1 base unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomFactor {
    pub base_unit: String,
    pub target_unit: String,
    pub factor: String,
    pub created_at: String,
    pub updated_at: String,
}

impl CustomFactor {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            base_unit: row.get("base_unit")?,
            target_unit: row.get("target_unit")?,
            factor: row.get("factor")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Get the edge for a unit pair
    pub fn get(conn: &Connection, base_unit: &str, target_unit: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM conversion_factors WHERE base_unit = ?1 AND target_unit = ?2",
        )?;

        let result = stmt.query_row(params![base_unit, target_unit], Self::from_row);
        match result {
            Ok(factor) => Ok(Some(factor)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List all edges in registration order
    pub fn list(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM conversion_factors
             ORDER BY created_at ASC, target_unit ASC, base_unit ASC",
        )?;
        let factors = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(factors)
    }

    /// Insert or overwrite an edge (upsert)
    pub fn upsert(
        conn: &Connection,
        base_unit: &str,
        target_unit: &str,
        factor: &str,
    ) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO conversion_factors (base_unit, target_unit, factor)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(base_unit, target_unit) DO UPDATE SET
                factor = excluded.factor,
                updated_at = datetime('now')
            "#,
            params![base_unit, target_unit, factor],
        )?;

        Self::get(conn, base_unit, target_unit)?.ok_or_else(|| {
            DbError::NotFound(format!("factor {} per {}", target_unit, base_unit))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    #[test]
    fn test_upsert_overwrites_same_direction() {
        let db = Database::migrated_in_memory();
        let conn = db.get_conn().unwrap();

        CustomFactor::upsert(&conn, "oz", "g", "28.35").unwrap();
        let updated = CustomFactor::upsert(&conn, "oz", "g", "28.349523125").unwrap();
        assert_eq!(updated.factor, "28.349523125");
        assert_eq!(CustomFactor::list(&conn).unwrap().len(), 1);
    }

    #[test]
    fn test_directions_are_separate_rows() {
        let db = Database::migrated_in_memory();
        let conn = db.get_conn().unwrap();

        CustomFactor::upsert(&conn, "oz", "g", "28.35").unwrap();
        CustomFactor::upsert(&conn, "g", "oz", "0.035274").unwrap();
        assert_eq!(CustomFactor::list(&conn).unwrap().len(), 2);
        assert!(CustomFactor::get(&conn, "g", "lb").unwrap().is_none());
    }
}
