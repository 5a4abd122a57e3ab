pub mod conditional;
pub mod prompts;
pub mod verdict;

pub use conditional::{ConditionalPipeline, DEFAULT_TEMPERATURE};
pub use verdict::{parse_verdict, Verdict, VerdictOutcome};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("model call failed: {0}")]
    Llm(#[from] crate::llm::LlmError),
    #[error("retrieval failed: {0}")]
    Retrieval(#[from] crate::rag::RagError),
}
