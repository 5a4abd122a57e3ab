use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::models::Dialog;

pub fn insert_dialog(conn: &Connection) -> Result<Dialog, DatabaseError> {
    conn.execute(
        "INSERT INTO dialogs (created_at) VALUES (datetime('now'))",
        [],
    )?;
    let id = conn.last_insert_rowid();
    get_dialog(conn, id)?.ok_or(DatabaseError::NotFound {
        entity_type: "dialog".to_string(),
        id: id.to_string(),
    })
}

pub fn get_dialog(conn: &Connection, id: i64) -> Result<Option<Dialog>, DatabaseError> {
    let result = conn.query_row(
        "SELECT id, created_at FROM dialogs WHERE id = ?1",
        params![id],
        |row| {
            Ok(Dialog {
                id: row.get(0)?,
                created_at: row.get(1)?,
            })
        },
    );

    match result {
        Ok(dialog) => Ok(Some(dialog)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Remove a dialog; its messages go with it. Returns false when the
/// dialog did not exist.
pub fn delete_dialog(conn: &Connection, id: i64) -> Result<bool, DatabaseError> {
    let affected = conn.execute("DELETE FROM dialogs WHERE id = ?1", params![id])?;
    Ok(affected > 0)
}
