use std::str::FromStr;

use chrono::NaiveDateTime;
use rusqlite::{params, Connection, Row};

use crate::db::DatabaseError;
use crate::models::{ChatModel, Message, NewMessage, Role};

/// Raw column values before enum validation.
struct MessageRow {
    id: i64,
    dialog_id: i64,
    role: String,
    content: String,
    model: Option<String>,
    reply_to: Option<i64>,
    created_at: NaiveDateTime,
}

fn read_row(row: &Row) -> rusqlite::Result<MessageRow> {
    Ok(MessageRow {
        id: row.get(0)?,
        dialog_id: row.get(1)?,
        role: row.get(2)?,
        content: row.get(3)?,
        model: row.get(4)?,
        reply_to: row.get(5)?,
        created_at: row.get(6)?,
    })
}

fn message_from_row(row: MessageRow) -> Result<Message, DatabaseError> {
    Ok(Message {
        id: row.id,
        dialog_id: row.dialog_id,
        role: Role::from_str(&row.role)?,
        content: row.content,
        model: row.model.as_deref().map(ChatModel::from_str).transpose()?,
        reply_to: row.reply_to,
        created_at: row.created_at,
    })
}

pub fn insert_message(conn: &Connection, new: &NewMessage) -> Result<Message, DatabaseError> {
    conn.execute(
        "INSERT INTO messages (dialog_id, role, content, model, reply_to, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, datetime('now'))",
        params![
            new.dialog_id,
            new.role.as_str(),
            new.content,
            new.model.as_ref().map(|m| m.as_str()),
            new.reply_to,
        ],
    )?;
    let id = conn.last_insert_rowid();
    get_message(conn, id)?.ok_or(DatabaseError::NotFound {
        entity_type: "message".to_string(),
        id: id.to_string(),
    })
}

pub fn get_message(conn: &Connection, id: i64) -> Result<Option<Message>, DatabaseError> {
    let result = conn.query_row(
        "SELECT id, dialog_id, role, content, model, reply_to, created_at
         FROM messages WHERE id = ?1",
        params![id],
        read_row,
    );

    match result {
        Ok(row) => Ok(Some(message_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Remove a message, returning the removed row. Any reply pointing at it
/// is removed by the cascade.
pub fn delete_message(conn: &Connection, id: i64) -> Result<Option<Message>, DatabaseError> {
    let Some(message) = get_message(conn, id)? else {
        return Ok(None);
    };
    conn.execute("DELETE FROM messages WHERE id = ?1", params![id])?;
    Ok(Some(message))
}

/// All messages of a dialog, oldest first.
pub fn dialog_messages(conn: &Connection, dialog_id: i64) -> Result<Vec<Message>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, dialog_id, role, content, model, reply_to, created_at
         FROM messages WHERE dialog_id = ?1 ORDER BY id ASC",
    )?;
    let rows = stmt.query_map(params![dialog_id], read_row)?;

    let mut messages = Vec::new();
    for row in rows {
        messages.push(message_from_row(row?)?);
    }
    Ok(messages)
}

/// The newest `limit` messages of a dialog, still oldest first.
pub fn last_dialog_messages(
    conn: &Connection,
    dialog_id: i64,
    limit: i64,
) -> Result<Vec<Message>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, dialog_id, role, content, model, reply_to, created_at
         FROM messages WHERE dialog_id = ?1 ORDER BY id DESC LIMIT ?2",
    )?;
    let rows = stmt.query_map(params![dialog_id, limit], read_row)?;

    let mut messages = Vec::new();
    for row in rows {
        messages.push(message_from_row(row?)?);
    }
    messages.reverse();
    Ok(messages)
}

/// The message a reply answers, via its reply_to link.
pub fn find_request(conn: &Connection, reply_id: i64) -> Result<Option<Message>, DatabaseError> {
    let Some(reply) = get_message(conn, reply_id)? else {
        return Ok(None);
    };
    match reply.reply_to {
        Some(request_id) => get_message(conn, request_id),
        None => Ok(None),
    }
}

/// The reply answering a message, if one exists. At most one can, since
/// reply_to is unique.
pub fn find_reply(conn: &Connection, message_id: i64) -> Result<Option<Message>, DatabaseError> {
    let result = conn.query_row(
        "SELECT id, dialog_id, role, content, model, reply_to, created_at
         FROM messages WHERE reply_to = ?1",
        params![message_id],
        read_row,
    );

    match result {
        Ok(row) => Ok(Some(message_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;
    use crate::db::repository::{delete_dialog, insert_dialog};

    fn user_message(dialog_id: i64, content: &str) -> NewMessage {
        NewMessage {
            dialog_id,
            role: Role::User,
            content: content.to_string(),
            model: None,
            reply_to: None,
        }
    }

    fn reply_message(dialog_id: i64, content: &str, reply_to: i64) -> NewMessage {
        NewMessage {
            dialog_id,
            role: Role::Assistant,
            content: content.to_string(),
            model: Some(ChatModel::Gemma3),
            reply_to: Some(reply_to),
        }
    }

    #[test]
    fn insert_and_fetch_message() {
        let conn = open_in_memory().unwrap();
        let dialog = insert_dialog(&conn).unwrap();

        let message = insert_message(&conn, &user_message(dialog.id, "hello")).unwrap();
        assert_eq!(message.role, Role::User);
        assert!(message.model.is_none());

        let fetched = get_message(&conn, message.id).unwrap().unwrap();
        assert_eq!(fetched.content, "hello");
        assert_eq!(fetched.dialog_id, dialog.id);
    }

    #[test]
    fn history_is_ordered_oldest_first() {
        let conn = open_in_memory().unwrap();
        let dialog = insert_dialog(&conn).unwrap();
        for content in ["one", "two", "three"] {
            insert_message(&conn, &user_message(dialog.id, content)).unwrap();
        }

        let history = dialog_messages(&conn, dialog.id).unwrap();
        let contents: Vec<&str> = history.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, ["one", "two", "three"]);
    }

    #[test]
    fn last_messages_keep_chronological_order() {
        let conn = open_in_memory().unwrap();
        let dialog = insert_dialog(&conn).unwrap();
        for content in ["one", "two", "three", "four"] {
            insert_message(&conn, &user_message(dialog.id, content)).unwrap();
        }

        let tail = last_dialog_messages(&conn, dialog.id, 2).unwrap();
        let contents: Vec<&str> = tail.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, ["three", "four"]);
    }

    #[test]
    fn deleting_dialog_removes_messages() {
        let conn = open_in_memory().unwrap();
        let dialog = insert_dialog(&conn).unwrap();
        let message = insert_message(&conn, &user_message(dialog.id, "hello")).unwrap();

        delete_dialog(&conn, dialog.id).unwrap();
        assert!(get_message(&conn, message.id).unwrap().is_none());
    }

    #[test]
    fn deleting_request_cascades_to_reply() {
        let conn = open_in_memory().unwrap();
        let dialog = insert_dialog(&conn).unwrap();
        let request = insert_message(&conn, &user_message(dialog.id, "question")).unwrap();
        let reply =
            insert_message(&conn, &reply_message(dialog.id, "answer", request.id)).unwrap();

        delete_message(&conn, request.id).unwrap();
        assert!(get_message(&conn, reply.id).unwrap().is_none());
    }

    #[test]
    fn second_reply_to_same_request_is_rejected() {
        let conn = open_in_memory().unwrap();
        let dialog = insert_dialog(&conn).unwrap();
        let request = insert_message(&conn, &user_message(dialog.id, "question")).unwrap();
        insert_message(&conn, &reply_message(dialog.id, "first", request.id)).unwrap();

        let result = insert_message(&conn, &reply_message(dialog.id, "second", request.id));
        assert!(result.is_err());
    }

    #[test]
    fn request_and_reply_are_linked_both_ways() {
        let conn = open_in_memory().unwrap();
        let dialog = insert_dialog(&conn).unwrap();
        let request = insert_message(&conn, &user_message(dialog.id, "question")).unwrap();
        let reply =
            insert_message(&conn, &reply_message(dialog.id, "answer", request.id)).unwrap();

        let found_request = find_request(&conn, reply.id).unwrap().unwrap();
        assert_eq!(found_request.id, request.id);

        let found_reply = find_reply(&conn, request.id).unwrap().unwrap();
        assert_eq!(found_reply.id, reply.id);
        assert_eq!(found_reply.model, Some(ChatModel::Gemma3));

        assert!(find_request(&conn, request.id).unwrap().is_none());
        assert!(find_reply(&conn, reply.id).unwrap().is_none());
    }

    #[test]
    fn delete_returns_removed_message() {
        let conn = open_in_memory().unwrap();
        let dialog = insert_dialog(&conn).unwrap();
        let message = insert_message(&conn, &user_message(dialog.id, "bye")).unwrap();

        let removed = delete_message(&conn, message.id).unwrap().unwrap();
        assert_eq!(removed.content, "bye");
        assert!(delete_message(&conn, message.id).unwrap().is_none());
    }
}
