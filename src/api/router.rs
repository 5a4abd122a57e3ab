use axum::routing::{delete, get, post};
use axum::Router;
use regex::Regex;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

use super::endpoints;
use super::types::ApiContext;
use crate::config::ConfigError;

/// Build the service router with every endpoint nested under /api.
pub fn api_router(ctx: ApiContext) -> Router {
    let routes = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/dialog/create_dialog", post(endpoints::dialogs::create))
        .route("/dialog/get_dialog", get(endpoints::dialogs::get))
        .route("/message/create", post(endpoints::messages::create))
        .route("/message/get", get(endpoints::messages::get))
        .route("/message/delete", delete(endpoints::messages::delete))
        .route("/chat/create_message", post(endpoints::chat::create_message))
        .route("/chat/chat_completion", get(endpoints::chat::chat_completion))
        .route("/chat/get_history", get(endpoints::chat::get_history))
        .route("/chat/delete_message", delete(endpoints::chat::delete_message))
        .route("/chat/regenerate", post(endpoints::chat::regenerate))
        .with_state(ctx);

    Router::new().nest("/api", routes)
}

/// CORS layer admitting origins that match the configured pattern.
/// Methods and headers mirror the request, since credentials rule out
/// wildcards.
pub fn cors_layer(origin_pattern: &str) -> Result<CorsLayer, ConfigError> {
    let origin_regex = Regex::new(origin_pattern)?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(move |origin, _| {
            origin
                .to_str()
                .map(|o| origin_regex.is_match(o))
                .unwrap_or(false)
        }))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true))
}
