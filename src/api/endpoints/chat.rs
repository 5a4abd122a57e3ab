//! Conversation flow: user turns in, pipeline-generated replies out.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::api::{ApiContext, ApiError};
use crate::db::repository;
use crate::llm::ChatMessage;
use crate::models::{ChatModel, Message, NewMessage, Role};
use crate::pipeline::{prompts, ConditionalPipeline};

/// Validation-stage model for fresh completions.
const COMPLETION_VALIDATION_MODEL: ChatModel = ChatModel::Gemma3;

/// Validation-stage model when regenerating an existing reply.
const REGENERATE_VALIDATION_MODEL: ChatModel = ChatModel::Llama33;

#[derive(Deserialize)]
pub struct CreateMessageRequest {
    pub dialog_id: i64,
    pub message: String,
}

#[derive(Deserialize)]
pub struct CompletionQuery {
    pub dialog_id: i64,
    pub model: ChatModel,
}

#[derive(Deserialize)]
pub struct HistoryQuery {
    pub dialog_id: i64,
    /// Newest messages to return; 0 means the whole dialog.
    #[serde(default)]
    pub amount: i64,
}

#[derive(Deserialize)]
pub struct DeleteQuery {
    pub message_id: i64,
}

#[derive(Deserialize)]
pub struct RegenerateQuery {
    pub response_id: i64,
}

/// Append a user turn to a dialog. Rejected while the previous user
/// turn is still unanswered.
pub async fn create_message(
    State(ctx): State<ApiContext>,
    Json(request): Json<CreateMessageRequest>,
) -> Result<Json<Message>, ApiError> {
    let conn = ctx.db()?;
    if repository::get_dialog(&conn, request.dialog_id)?.is_none() {
        return Err(ApiError::NotFound(format!(
            "dialog {} not found",
            request.dialog_id
        )));
    }

    let history = repository::dialog_messages(&conn, request.dialog_id)?;
    if history.last().is_some_and(|m| m.role == Role::User) {
        return Err(ApiError::BadRequest(
            "last message is already a user message".to_string(),
        ));
    }

    let message = repository::insert_message(
        &conn,
        &NewMessage {
            dialog_id: request.dialog_id,
            role: Role::User,
            content: request.message,
            model: None,
            reply_to: None,
        },
    )?;
    Ok(Json(message))
}

/// Run the conditional pipeline over the dialog and persist the reply,
/// linked to the user message it answers.
pub async fn chat_completion(
    State(ctx): State<ApiContext>,
    Query(query): Query<CompletionQuery>,
) -> Result<Json<Message>, ApiError> {
    let (history, request_id) = {
        let conn = ctx.db()?;
        if repository::get_dialog(&conn, query.dialog_id)?.is_none() {
            return Err(ApiError::NotFound(format!(
                "dialog {} not found",
                query.dialog_id
            )));
        }

        let history = repository::dialog_messages(&conn, query.dialog_id)?;
        let last = history.last().filter(|m| m.role == Role::User).ok_or_else(|| {
            ApiError::BadRequest("last message is already an AI reply".to_string())
        })?;
        (to_turns(&history), last.id)
    };

    let pipeline = build_pipeline(&ctx, COMPLETION_VALIDATION_MODEL, query.model.clone());
    let reply = pipeline.run(&history).await?;

    let conn = ctx.db()?;
    let message = repository::insert_message(
        &conn,
        &NewMessage {
            dialog_id: query.dialog_id,
            role: Role::Assistant,
            content: reply,
            model: Some(query.model),
            reply_to: Some(request_id),
        },
    )?;
    Ok(Json(message))
}

/// Dialog history, oldest first. `amount` keeps only the newest turns.
pub async fn get_history(
    State(ctx): State<ApiContext>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<Message>>, ApiError> {
    let conn = ctx.db()?;
    if repository::get_dialog(&conn, query.dialog_id)?.is_none() {
        return Err(ApiError::NotFound(format!(
            "dialog {} not found",
            query.dialog_id
        )));
    }

    let messages = if query.amount <= 0 {
        repository::dialog_messages(&conn, query.dialog_id)?
    } else {
        repository::last_dialog_messages(&conn, query.dialog_id, query.amount)?
    };
    Ok(Json(messages))
}

/// Remove a message if it exists; removing an absent one is not an
/// error.
pub async fn delete_message(
    State(ctx): State<ApiContext>,
    Query(query): Query<DeleteQuery>,
) -> Result<StatusCode, ApiError> {
    let conn = ctx.db()?;
    repository::delete_message(&conn, query.message_id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Replace a generated reply: drop it, re-run the pipeline over the
/// remaining history with the same model, and link the new reply to the
/// original request.
pub async fn regenerate(
    State(ctx): State<ApiContext>,
    Query(query): Query<RegenerateQuery>,
) -> Result<Json<Message>, ApiError> {
    let (history, request_id, dialog_id, model) = {
        let conn = ctx.db()?;
        let response = repository::get_message(&conn, query.response_id)?.ok_or_else(|| {
            ApiError::NotFound(format!("Message not found: {}", query.response_id))
        })?;

        let request = repository::find_request(&conn, query.response_id)?
            .ok_or_else(|| ApiError::BadRequest("message is not response".to_string()))?;
        let model = response
            .model
            .ok_or_else(|| ApiError::BadRequest("message has no model recorded".to_string()))?;

        repository::delete_message(&conn, response.id)?;
        let history = repository::dialog_messages(&conn, response.dialog_id)?;
        (to_turns(&history), request.id, response.dialog_id, model)
    };

    let pipeline = build_pipeline(&ctx, REGENERATE_VALIDATION_MODEL, model.clone());
    let reply = pipeline.run(&history).await?;

    let conn = ctx.db()?;
    let message = repository::insert_message(
        &conn,
        &NewMessage {
            dialog_id,
            role: Role::Assistant,
            content: reply,
            model: Some(model),
            reply_to: Some(request_id),
        },
    )?;
    Ok(Json(message))
}

fn build_pipeline(
    ctx: &ApiContext,
    validation_model: ChatModel,
    generation_model: ChatModel,
) -> ConditionalPipeline {
    let pipeline = ConditionalPipeline::new(
        ctx.llm.clone(),
        prompts::SCHEMA_VALIDATION_PROMPT,
        validation_model,
        generation_model,
    )
    .with_generation_prompt(prompts::SCHEMA_GENERATION_PROMPT);

    match &ctx.retriever {
        Some(retriever) => pipeline.with_retriever(retriever.clone()),
        None => pipeline,
    }
}

fn to_turns(history: &[Message]) -> Vec<ChatMessage> {
    history
        .iter()
        .map(|m| ChatMessage {
            role: m.role.clone(),
            content: m.content.clone(),
        })
        .collect()
}
