use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::ApiContext;
use crate::config;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub index_ready: bool,
}

pub async fn check(State(ctx): State<ApiContext>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: config::APP_VERSION,
        index_ready: ctx.retriever.is_some(),
    })
}
