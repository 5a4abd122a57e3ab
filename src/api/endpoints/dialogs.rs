use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::api::{ApiContext, ApiError};
use crate::db::repository;
use crate::models::Dialog;

#[derive(Deserialize)]
pub struct DialogQuery {
    pub dialog_id: i64,
}

pub async fn create(State(ctx): State<ApiContext>) -> Result<Json<Dialog>, ApiError> {
    let conn = ctx.db()?;
    let dialog = repository::insert_dialog(&conn)?;
    Ok(Json(dialog))
}

pub async fn get(
    State(ctx): State<ApiContext>,
    Query(query): Query<DialogQuery>,
) -> Result<Json<Dialog>, ApiError> {
    let conn = ctx.db()?;
    let dialog = repository::get_dialog(&conn, query.dialog_id)?
        .ok_or_else(|| ApiError::NotFound("Dialog not found".to_string()))?;
    Ok(Json(dialog))
}
