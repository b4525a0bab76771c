//! Operator table operations.

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{Database, DbResult};
use crate::models::Operator;

fn map_operator_row(row: &Row<'_>) -> rusqlite::Result<Operator> {
    Ok(Operator {
        id: row.get(0)?,
        name: row.get(1)?,
        role: row.get(2)?,
        created_at: row.get(3)?,
    })
}

/// Insert a new operator.
pub fn insert_operator(conn: &Connection, operator: &Operator) -> DbResult<()> {
    conn.execute(
        "INSERT INTO operators (id, name, role, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![operator.id, operator.name, operator.role, operator.created_at],
    )?;
    Ok(())
}

/// Get an operator by id.
pub fn find_operator(conn: &Connection, id: &str) -> DbResult<Option<Operator>> {
    conn.query_row(
        "SELECT id, name, role, created_at FROM operators WHERE id = ?",
        [id],
        map_operator_row,
    )
    .optional()
    .map_err(Into::into)
}

impl Database {
    /// List all operators.
    pub fn list_operators(&self) -> DbResult<Vec<Operator>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, role, created_at FROM operators ORDER BY name")?;
        let rows = stmt.query_map([], map_operator_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_find() {
        let db = Database::open_in_memory().unwrap();

        let operator = Operator::new("Гульнора".into(), "operator".into());
        insert_operator(db.conn(), &operator).unwrap();

        let found = find_operator(db.conn(), &operator.id).unwrap().unwrap();
        assert_eq!(found.name, "Гульнора");

        assert!(find_operator(db.conn(), "missing").unwrap().is_none());
    }
}
