//! Direct message CRUD, with no model calls involved.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::api::{ApiContext, ApiError};
use crate::db::repository;
use crate::models::{Message, NewMessage};

#[derive(Deserialize)]
pub struct MessageQuery {
    pub message_id: i64,
}

pub async fn create(
    State(ctx): State<ApiContext>,
    Json(new): Json<NewMessage>,
) -> Result<Json<Message>, ApiError> {
    let conn = ctx.db()?;
    if repository::get_dialog(&conn, new.dialog_id)?.is_none() {
        return Err(ApiError::NotFound(format!(
            "dialog {} not found",
            new.dialog_id
        )));
    }
    let message = repository::insert_message(&conn, &new)?;
    Ok(Json(message))
}

pub async fn get(
    State(ctx): State<ApiContext>,
    Query(query): Query<MessageQuery>,
) -> Result<Json<Message>, ApiError> {
    let conn = ctx.db()?;
    let message = repository::get_message(&conn, query.message_id)?
        .ok_or_else(|| ApiError::NotFound("Message not found".to_string()))?;
    Ok(Json(message))
}

pub async fn delete(
    State(ctx): State<ApiContext>,
    Query(query): Query<MessageQuery>,
) -> Result<Json<Message>, ApiError> {
    let conn = ctx.db()?;
    let message = repository::delete_message(&conn, query.message_id)?
        .ok_or_else(|| ApiError::NotFound("Message not found".to_string()))?;
    Ok(Json(message))
}
