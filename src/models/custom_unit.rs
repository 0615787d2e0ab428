//! Custom unit model
//!
//! Named units registered at runtime.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::conversion::UnitCategory;
use crate::db::{DbError, DbResult};

/// A persisted unit registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomUnit {
    pub symbol: String,
    pub name: String,
    pub category: UnitCategory,
    pub created_at: String,
    pub updated_at: String,
}

impl CustomUnit {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let category: String = row.get("category")?;
        Ok(Self {
            symbol: row.get("symbol")?,
            name: row.get("name")?,
            category: UnitCategory::from_str(&category).unwrap_or(UnitCategory::Other),
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Get a unit by symbol
    pub fn get(conn: &Connection, symbol: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM custom_units WHERE symbol = ?1")?;

        let result = stmt.query_row([symbol], Self::from_row);
        match result {
            Ok(unit) => Ok(Some(unit)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List all units in registration order
    pub fn list(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt =
            conn.prepare("SELECT * FROM custom_units ORDER BY created_at ASC, symbol ASC")?;
        let units = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(units)
    }

    /// Insert or rename a unit (upsert)
    pub fn upsert(
        conn: &Connection,
        symbol: &str,
        name: &str,
        category: UnitCategory,
    ) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO custom_units (symbol, name, category)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(symbol) DO UPDATE SET
                name = excluded.name,
                category = excluded.category,
                updated_at = datetime('now')
            "#,
            params![symbol, name, category.as_str()],
        )?;

        Self::get(conn, symbol)?.ok_or_else(|| DbError::NotFound(format!("unit '{}'", symbol)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    #[test]
    fn test_upsert_and_get() {
        let db = Database::migrated_in_memory();
        let conn = db.get_conn().unwrap();

        let unit = CustomUnit::upsert(&conn, "cal", "calorie", UnitCategory::Other).unwrap();
        assert_eq!(unit.symbol, "cal");
        assert_eq!(unit.name, "calorie");

        let renamed = CustomUnit::upsert(&conn, "cal", "small calorie", UnitCategory::Other).unwrap();
        assert_eq!(renamed.name, "small calorie");
        assert_eq!(CustomUnit::list(&conn).unwrap().len(), 1);

        assert!(CustomUnit::get(&conn, "CAL").unwrap().is_none());
    }

    #[test]
    fn test_list_keeps_category() {
        let db = Database::migrated_in_memory();
        let conn = db.get_conn().unwrap();

        CustomUnit::upsert(&conn, "fur", "furlong", UnitCategory::Length).unwrap();
        CustomUnit::upsert(&conn, "st", "stone", UnitCategory::Mass).unwrap();

        let units = CustomUnit::list(&conn).unwrap();
        assert_eq!(units.len(), 2);
        let stone = units.iter().find(|u| u.symbol == "st").unwrap();
        assert_eq!(stone.category, UnitCategory::Mass);
    }
}
