use std::sync::Arc;

use crate::llm::{ChatCompletion, ChatMessage};
use crate::models::{ChatModel, Role};
use crate::rag::{Retriever, DEFAULT_TOP_K};

use super::prompts;
use super::verdict::parse_verdict;
use super::PipelineError;

/// Sampling temperature for both stages unless overridden.
pub const DEFAULT_TEMPERATURE: f32 = 0.4;

/// Two-stage conditional workflow. A validation model first judges
/// whether the conversation carries enough information to answer; only
/// a positive verdict reaches the generation model. The caller gets the
/// validator's explanation otherwise.
///
/// The pipeline never looks at roles: it forwards whatever history it
/// is given, and callers decide whose turn it is.
pub struct ConditionalPipeline {
    client: Arc<dyn ChatCompletion>,
    retriever: Option<Arc<Retriever>>,
    validation_prompt: String,
    generation_prompt: Option<String>,
    validation_model: ChatModel,
    generation_model: ChatModel,
    validation_temperature: f32,
    generation_temperature: f32,
}

impl ConditionalPipeline {
    pub fn new(
        client: Arc<dyn ChatCompletion>,
        validation_prompt: impl Into<String>,
        validation_model: ChatModel,
        generation_model: ChatModel,
    ) -> Self {
        Self {
            client,
            retriever: None,
            validation_prompt: validation_prompt.into(),
            generation_prompt: None,
            validation_model,
            generation_model,
            validation_temperature: DEFAULT_TEMPERATURE,
            generation_temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Ground both stages in retrieved documentation context.
    pub fn with_retriever(mut self, retriever: Arc<Retriever>) -> Self {
        self.retriever = Some(retriever);
        self
    }

    /// Replace the default generation-stage system prompt.
    pub fn with_generation_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.generation_prompt = Some(prompt.into());
        self
    }

    pub fn with_temperatures(mut self, validation: f32, generation: f32) -> Self {
        self.validation_temperature = validation;
        self.generation_temperature = generation;
        self
    }

    /// Run the workflow over `history` (oldest first) and produce the
    /// reply text: the generator's answer when the request validates,
    /// the validator's explanation when it does not.
    pub async fn run(&self, history: &[ChatMessage]) -> Result<String, PipelineError> {
        let verdict = self.validate(history).await?.into_verdict();

        if !verdict.is_valid {
            return Ok(verdict
                .message
                .unwrap_or_else(|| prompts::FALLBACK_VERDICT_MESSAGE.to_string()));
        }

        self.generate(history).await
    }

    async fn validate(
        &self,
        history: &[ChatMessage],
    ) -> Result<super::VerdictOutcome, PipelineError> {
        let instructions = prompts::validation_instructions(&self.validation_prompt);
        let system = self.compile_stage_prompt(&instructions, history).await?;
        let messages = with_system(system, history);

        let raw = self
            .client
            .complete(&messages, &self.validation_model, self.validation_temperature)
            .await?;

        Ok(parse_verdict(&raw))
    }

    async fn generate(&self, history: &[ChatMessage]) -> Result<String, PipelineError> {
        let instructions = self
            .generation_prompt
            .as_deref()
            .unwrap_or(prompts::DEFAULT_GENERATION_PROMPT);
        let system = self.compile_stage_prompt(instructions, history).await?;
        let messages = with_system(system, history);

        let reply = self
            .client
            .complete(&messages, &self.generation_model, self.generation_temperature)
            .await?;

        Ok(reply)
    }

    /// Stage instructions, prefixed with retrieved context when a
    /// retriever is attached. Retrieval runs once per stage, querying
    /// with the newest history entry, so each stage sees fresh context.
    async fn compile_stage_prompt(
        &self,
        instructions: &str,
        history: &[ChatMessage],
    ) -> Result<String, PipelineError> {
        let Some(retriever) = &self.retriever else {
            return Ok(instructions.to_string());
        };
        let Some(query) = history.last() else {
            return Ok(instructions.to_string());
        };

        let context = retriever.retrieve(&query.content, DEFAULT_TOP_K).await?;
        Ok(prompts::with_context(&context, instructions))
    }
}

fn with_system(system: String, history: &[ChatMessage]) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() + 1);
    messages.push(ChatMessage {
        role: Role::System,
        content: system,
    });
    messages.extend_from_slice(history);
    messages
}
