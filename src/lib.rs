pub mod api;
pub mod config;
pub mod db;
pub mod llm;
pub mod models;
pub mod pipeline;
pub mod rag;

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber. RUST_LOG wins over the
/// built-in default filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}
